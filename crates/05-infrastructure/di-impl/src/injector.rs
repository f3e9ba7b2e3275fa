//! 依赖注入器
//!
//! 遍历已注册的实例，为每个可注入的空字段按类型查找 Bean 并填充。
//! 注入只写空字段，所以重复执行的结果与执行一次相同。

use di_abstractions::BeanRegistry;
use ioc_common::{BeanRef, FieldDescriptor, TypeDescriptor};
use tracing::{debug, trace};

/// 单个字段的注入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionOutcome {
    /// 静态字段、不可重新赋值的字段或没有注入点的字段
    Skipped,
    /// 字段已经有值
    AlreadyFilled,
    /// 本次填充成功
    Injected,
    /// 容器中没有匹配的 Bean，字段保持为空
    Unresolved,
}

/// 注入统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionReport {
    pub injected: usize,
    pub already_filled: usize,
    pub unresolved: usize,
    pub skipped: usize,
}

impl InjectionReport {
    fn record(&mut self, outcome: InjectionOutcome) {
        match outcome {
            InjectionOutcome::Skipped => self.skipped += 1,
            InjectionOutcome::AlreadyFilled => self.already_filled += 1,
            InjectionOutcome::Injected => self.injected += 1,
            InjectionOutcome::Unresolved => self.unresolved += 1,
        }
    }

    fn merge(&mut self, other: InjectionReport) {
        self.injected += other.injected;
        self.already_filled += other.already_filled;
        self.unresolved += other.unresolved;
        self.skipped += other.skipped;
    }
}

/// 依赖注入器
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyInjector;

impl DependencyInjector {
    pub fn new() -> Self {
        Self
    }

    /// 为注册表中的所有实例注入依赖
    pub fn inject_all(&self, registry: &dyn BeanRegistry) -> InjectionReport {
        let mut report = InjectionReport::default();
        // 快照遍历，填充字段时不持有注册表的锁
        for entry in registry.entries() {
            report.merge(self.inject_instance(registry, &entry.descriptor, &entry.instance));
        }
        debug!(
            "依赖注入完毕: 注入 {}, 已有值 {}, 未解析 {}",
            report.injected, report.already_filled, report.unresolved
        );
        report
    }

    /// 为单个实例注入依赖
    pub fn inject_instance(
        &self,
        registry: &dyn BeanRegistry,
        descriptor: &TypeDescriptor,
        instance: &BeanRef,
    ) -> InjectionReport {
        let mut report = InjectionReport::default();
        for field in &descriptor.fields {
            report.record(self.inject_field(registry, descriptor, field, instance));
        }
        report
    }

    /// 注入单个字段
    pub fn inject_field(
        &self,
        registry: &dyn BeanRegistry,
        owner: &TypeDescriptor,
        field: &FieldDescriptor,
        instance: &BeanRef,
    ) -> InjectionOutcome {
        if field.modifiers.is_static || field.modifiers.is_final {
            return InjectionOutcome::Skipped;
        }
        let Some(point) = field.slot.and_then(|accessor| accessor(instance)) else {
            return InjectionOutcome::Skipped;
        };
        if point.is_filled() {
            return InjectionOutcome::AlreadyFilled;
        }

        let view = registry
            .lookup_by_type(&field.target)
            .and_then(|entry| entry.view(&field.target));
        match view {
            Some(view) if point.fill(&view) => {
                trace!("注入字段: {}.{} <- {}", owner.name, field.name, field.target);
                InjectionOutcome::Injected
            }
            // 并发填充时另一方先写入
            Some(_) if point.is_filled() => InjectionOutcome::AlreadyFilled,
            Some(_) => {
                debug!(
                    "字段 {}.{} 无法接收类型为 {} 的 Bean，保持为空",
                    owner.name, field.name, field.target
                );
                InjectionOutcome::Unresolved
            }
            None => {
                debug!(
                    "字段 {}.{} 没有找到类型为 {} 的 Bean，保持为空",
                    owner.name, field.name, field.target
                );
                InjectionOutcome::Unresolved
            }
        }
    }
}
