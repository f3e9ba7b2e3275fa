//! 应用上下文
//!
//! 容器的对外门面：`init` 依次完成类型发现、实例化、依赖注入和配置类加载，
//! 之后通过 `get_bean*` / `set_bean*` 访问容器。

use crate::builder::ContextBuilder;
use crate::error::{ContextError, ContextResult};
use crate::settings::ContextSettings;
use di_abstractions::{package_contains, BeanResolver, ClassDiscovery, ScanOptions, TypedBeanResolver};
use di_impl::BeanContainer;
use ioc_common::{
    BeanEntry, BeanError, BeanRef, BeanResult, Component, MarkerKind, TypeDescriptor, TypeKey,
};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// 容器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerState {
    /// 尚未扫描
    Unscanned,
    /// 已发现并分类类型
    Classified,
    /// 已实例化带组件标记的类型
    Instantiated,
    /// 已完成依赖注入
    Injected,
    /// 已加载配置类
    ConfigurationLoaded,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unscanned => "unscanned",
            Self::Classified => "classified",
            Self::Instantiated => "instantiated",
            Self::Injected => "injected",
            Self::ConfigurationLoaded => "configuration-loaded",
        };
        f.write_str(name)
    }
}

/// 应用上下文
pub struct ApplicationContext {
    container: BeanContainer,
    discovery: Box<dyn ClassDiscovery>,
    settings: ContextSettings,
    identifiers: RwLock<BTreeSet<String>>,
    state: RwLock<ContainerState>,
    started: AtomicBool,
}

impl ApplicationContext {
    pub fn new(
        container: BeanContainer,
        discovery: Box<dyn ClassDiscovery>,
        settings: ContextSettings,
    ) -> Self {
        Self {
            container,
            discovery,
            settings,
            identifiers: RwLock::new(BTreeSet::new()),
            state: RwLock::new(ContainerState::Unscanned),
            started: AtomicBool::new(false),
        }
    }

    /// 创建构建器
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    /// 初始化容器
    ///
    /// 只能调用一次，之后的调用（包括并发的调用）返回 `AlreadyInitialized`。
    /// 失败时不回滚：状态停在最后完成的阶段，已注册的 Bean 保留，上下文不能重新初始化。
    pub fn init(&self) -> ContextResult<()> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(ContextError::AlreadyInitialized);
        }
        info!("开始初始化 IoC 容器，发现器: {}", self.discovery.name());

        let options = ScanOptions {
            include_packages: self.settings.scan_packages.clone(),
            exclude_packages: self.settings.filter_packages.clone(),
        };
        let identifiers = self.discovery.discover(&options)?;
        debug!("发现类型: {:?}", identifiers);
        *self.identifiers.write() = identifiers.clone();
        self.set_state(ContainerState::Classified);

        self.container.instantiate(&identifiers)?;
        self.set_state(ContainerState::Instantiated);

        self.container.inject_all();
        self.set_state(ContainerState::Injected);
        self.show_beans();

        if self.settings.load_configuration {
            self.container.load_configuration()?;
            self.set_state(ContainerState::ConfigurationLoaded);
        }
        info!("IoC 容器初始化完毕，共 {} 个 Bean", self.container.len());
        Ok(())
    }

    /// 当前状态
    pub fn state(&self) -> ContainerState {
        *self.state.read()
    }

    fn set_state(&self, state: ContainerState) {
        debug!("容器状态: {}", state);
        *self.state.write() = state;
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    pub fn container(&self) -> &BeanContainer {
        &self.container
    }

    /// `init` 发现的类型标识符
    pub fn identifiers(&self) -> BTreeSet<String> {
        self.identifiers.read().clone()
    }

    /// 按类型获取 Bean
    pub fn get_bean<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.container.resolve::<T>()
    }

    /// 按注册键获取 Bean
    pub fn get_bean_named<T: ?Sized + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.container.resolve_named::<T>(name)
    }

    /// 按类型获取 Bean，`force_new` 为 `true` 时返回一个不注册的新实例
    pub fn get_bean_forced<T: ?Sized + 'static>(&self, force_new: bool) -> BeanResult<Option<Arc<T>>> {
        if !force_new {
            return Ok(self.get_bean::<T>());
        }
        let entry = self.container.create_detached(self.declared::<T>()?)?;
        Ok(entry.typed::<T>())
    }

    /// 按类型注册新实例
    pub fn set_bean<T: ?Sized + 'static>(&self) -> BeanResult<BeanEntry> {
        self.container.set_bean_type(self.declared::<T>()?, false)
    }

    /// 按类型注册新实例，`force_new` 为 `true` 时替换已有实例
    pub fn set_bean_forced<T: ?Sized + 'static>(&self, force_new: bool) -> BeanResult<BeanEntry> {
        self.container.set_bean_type(self.declared::<T>()?, force_new)
    }

    /// 注册已有实例，注册键由实例的类型决定
    pub fn set_bean_instance<C: Component>(&self, instance: Arc<C>) -> BeanResult<Arc<C>> {
        let descriptor = self.container.descriptor_of::<C>();
        self.container.set_bean_instance(
            Arc::clone(&descriptor),
            descriptor,
            Arc::clone(&instance) as BeanRef,
        )?;
        Ok(instance)
    }

    /// 以声明的类型 `D` 注册已有实例，注册键由 `D` 决定
    pub fn set_bean_as<D: ?Sized + 'static, C: Component>(
        &self,
        instance: Arc<C>,
    ) -> BeanResult<Arc<C>> {
        self.container.set_bean_instance(
            self.declared::<D>()?,
            self.container.descriptor_of::<C>(),
            Arc::clone(&instance) as BeanRef,
        )?;
        Ok(instance)
    }

    /// 全部 Bean，按注册顺序
    pub fn get_all_beans(&self) -> Vec<BeanEntry> {
        self.container.entries()
    }

    /// 运行期类型带有指定标记的 Bean
    pub fn get_beans_with_marker(&self, kind: MarkerKind) -> Vec<BeanEntry> {
        self.container.beans_with_marker(kind)
    }

    /// 带有指定标记的已知类型
    pub fn get_types_with_marker(&self, kind: MarkerKind) -> Vec<Arc<TypeDescriptor>> {
        self.container.types_with_marker(kind)
    }

    /// 为带有指定标记的已知类型创建并注册实例
    pub fn create_beans_with_marker(&self, kind: MarkerKind) -> BeanResult<Vec<BeanEntry>> {
        self.container.create_beans_with_marker(kind)
    }

    /// `init` 发现的类型中位于指定包内的类型
    pub fn get_types_in_packages(&self, packages: &[&str]) -> BeanResult<Vec<Arc<TypeDescriptor>>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }
        self.identifiers
            .read()
            .iter()
            .filter(|identifier| {
                packages
                    .iter()
                    .any(|package| package_contains(package, identifier))
            })
            .map(|identifier| self.container.catalog().resolve(identifier))
            .collect()
    }

    /// 移除实例的所有注册键
    pub fn remove_bean(&self, instance: &BeanRef) -> Vec<String> {
        self.container.remove_bean(instance)
    }

    /// 以 debug 级别输出全部 Bean
    pub fn show_beans(&self) {
        for entry in self.container.entries() {
            debug!("beanName: {}, bean: {}", entry.key, entry.type_name());
        }
    }

    fn declared<T: ?Sized + 'static>(&self) -> BeanResult<Arc<TypeDescriptor>> {
        self.container
            .declared_descriptor::<T>()
            .ok_or_else(|| BeanError::TypeResolution {
                identifier: std::any::type_name::<T>().to_string(),
            })
    }
}

impl BeanResolver for ApplicationContext {
    fn resolve_by_type(&self, key: &TypeKey) -> Option<BeanEntry> {
        self.container.lookup(key)
    }

    fn resolve_by_name(&self, name: &str) -> Option<BeanEntry> {
        self.container.lookup_named(name)
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("state", &self.state())
            .field("discovery", &self.discovery.name())
            .field("settings", &self.settings)
            .field("container", &self.container)
            .finish()
    }
}
