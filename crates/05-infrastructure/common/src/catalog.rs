//! 类型目录
//!
//! 类型标识符到类型描述符的映射，相当于类加载器：发现器给出的标识符
//! 都要经过这里解析成描述符。`#[derive(Component)]` 会在程序启动时把
//! 描述符登记到全局目录中。

use crate::component::Component;
use crate::errors::{BeanError, BeanResult};
use crate::metadata::{TypeDescriptor, TypeKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::Arc;
use tracing::debug;

/// 全局类型目录
static GLOBAL_TYPE_CATALOG: Lazy<Arc<TypeCatalog>> = Lazy::new(|| Arc::new(TypeCatalog::new()));

/// 类型目录
#[derive(Debug, Default)]
pub struct TypeCatalog {
    by_name: DashMap<String, Arc<TypeDescriptor>>,
    by_id: DashMap<TypeId, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取全局类型目录
    pub fn global() -> Arc<TypeCatalog> {
        Arc::clone(&GLOBAL_TYPE_CATALOG)
    }

    /// 登记类型描述符，同名类型已存在时保留先登记的描述符
    pub fn register(&self, descriptor: TypeDescriptor) -> Arc<TypeDescriptor> {
        let descriptor = match self.by_name.entry(descriptor.name.clone()) {
            Entry::Occupied(existing) => {
                debug!("类型已登记，忽略重复登记: {}", descriptor.name);
                return Arc::clone(existing.get());
            }
            Entry::Vacant(vacant) => {
                let descriptor = Arc::new(descriptor);
                vacant.insert(Arc::clone(&descriptor));
                descriptor
            }
        };
        self.by_id
            .entry(descriptor.key.id())
            .or_insert_with(|| Arc::clone(&descriptor));
        debug!("登记类型: {}", descriptor.name);
        descriptor
    }

    /// 登记组件类型
    pub fn register_type<C: Component>(&self) -> Arc<TypeDescriptor> {
        self.register(C::descriptor())
    }

    /// 将类型标识符解析为描述符
    pub fn resolve(&self, identifier: &str) -> BeanResult<Arc<TypeDescriptor>> {
        self.get(identifier).ok_or_else(|| BeanError::TypeResolution {
            identifier: identifier.to_string(),
        })
    }

    pub fn get(&self, identifier: &str) -> Option<Arc<TypeDescriptor>> {
        self.by_name
            .get(identifier)
            .map(|descriptor| Arc::clone(descriptor.value()))
    }

    pub fn by_key(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        self.by_type_id(key.id())
    }

    pub fn by_type_id(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.by_id
            .get(&type_id)
            .map(|descriptor| Arc::clone(descriptor.value()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.by_name.contains_key(identifier)
    }

    /// 所有已登记的类型标识符，按字典序排列
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
