//! Bean 解析器抽象接口
//!
//! 提供按类型、按名称解析 Bean 的能力

use ioc_common::{BeanEntry, TypeKey};
use std::sync::Arc;

/// Bean 解析器 trait
pub trait BeanResolver: Send + Sync {
    /// 按类型解析
    fn resolve_by_type(&self, key: &TypeKey) -> Option<BeanEntry>;

    /// 按注册键解析
    fn resolve_by_name(&self, name: &str) -> Option<BeanEntry>;
}

/// [`BeanResolver`] 的类型化辅助 trait
pub trait TypedBeanResolver {
    /// 解析 `T`，`T` 可以是具体类型或 `dyn Trait`
    fn resolve<T: ?Sized + 'static>(&self) -> Option<Arc<T>>;

    /// 按注册键解析并转换为 `T`
    fn resolve_named<T: ?Sized + 'static>(&self, name: &str) -> Option<Arc<T>>;
}

impl<R: BeanResolver + ?Sized> TypedBeanResolver for R {
    fn resolve<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.resolve_by_type(&TypeKey::of::<T>())
            .and_then(|entry| entry.typed::<T>())
    }

    fn resolve_named<T: ?Sized + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.resolve_by_name(name)
            .and_then(|entry| entry.typed::<T>())
    }
}
