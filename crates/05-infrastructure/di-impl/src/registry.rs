//! 默认 Bean 注册表实现

use di_abstractions::{BeanRegistry, BeanResolver};
use indexmap::map::Entry;
use indexmap::IndexMap;
use ioc_common::{
    BeanEntry, BeanError, BeanRef, BeanResult, MarkerKind, TypeDescriptor, TypeKey,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// 默认 Bean 注册表
///
/// 使用有序映射保存记录，按类型查找时的"第一个匹配"与注册顺序一致。
#[derive(Debug, Default)]
pub struct DefaultBeanRegistry {
    beans: RwLock<IndexMap<String, BeanEntry>>,
    known_types: RwLock<IndexMap<TypeKey, Arc<TypeDescriptor>>>,
}

impl DefaultBeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求的类型是否可以实例化；未知类型按是否为定长类型判断
    fn is_instantiable(&self, key: &TypeKey) -> bool {
        self.known_types
            .read()
            .get(key)
            .map_or(key.is_sized(), |descriptor| descriptor.can_instantiate())
    }
}

impl BeanRegistry for DefaultBeanRegistry {
    fn register(
        &self,
        key: &str,
        descriptor: Arc<TypeDescriptor>,
        instance: BeanRef,
    ) -> BeanResult<BeanEntry> {
        let entry = {
            let mut beans = self.beans.write();
            match beans.entry(key.to_string()) {
                Entry::Occupied(existing) => {
                    return Err(BeanError::duplicate(key, existing.get().type_name()));
                }
                Entry::Vacant(vacant) => vacant
                    .insert(BeanEntry::new(key, Arc::clone(&descriptor), instance))
                    .clone(),
            }
        };
        self.add_known_type(descriptor);
        info!("注册 Bean: {} ({})", entry.key, entry.type_name());
        Ok(entry)
    }

    fn replace(
        &self,
        key: &str,
        descriptor: Arc<TypeDescriptor>,
        instance: BeanRef,
    ) -> (BeanEntry, Option<BeanEntry>) {
        let entry = BeanEntry::new(key, Arc::clone(&descriptor), instance);
        // 替换保留原有的注册位置
        let previous = self.beans.write().insert(key.to_string(), entry.clone());
        self.add_known_type(descriptor);
        match &previous {
            Some(old) => info!(
                "替换 Bean: {} ({} -> {})",
                key,
                old.type_name(),
                entry.type_name()
            ),
            None => info!("注册 Bean: {} ({})", entry.key, entry.type_name()),
        }
        (entry, previous)
    }

    fn lookup_by_key(&self, key: &str) -> Option<BeanEntry> {
        self.beans.read().get(key).cloned()
    }

    fn lookup_by_type(&self, key: &TypeKey) -> Option<BeanEntry> {
        let instantiable = self.is_instantiable(key);
        let beans = self.beans.read();
        if let Some(exact) = beans.values().find(|entry| entry.descriptor.key == *key) {
            return Some(exact.clone());
        }
        if instantiable {
            return None;
        }
        beans
            .values()
            .find(|entry| entry.descriptor.is_assignable_to(key))
            .cloned()
    }

    fn all_of_marker(&self, kind: MarkerKind) -> Vec<BeanEntry> {
        self.beans
            .read()
            .values()
            .filter(|entry| entry.descriptor.has_marker(kind))
            .cloned()
            .collect()
    }

    fn remove(&self, instance: &BeanRef) -> Vec<String> {
        let mut removed = Vec::new();
        self.beans.write().retain(|key, entry| {
            if entry.is_instance(instance) {
                removed.push(key.clone());
                false
            } else {
                true
            }
        });
        for key in &removed {
            info!("移除 Bean: {}", key);
        }
        removed
    }

    fn remove_key(&self, key: &str) -> Option<BeanEntry> {
        let removed = self.beans.write().shift_remove(key);
        if removed.is_some() {
            info!("移除 Bean: {}", key);
        }
        removed
    }

    fn contains_key(&self, key: &str) -> bool {
        self.beans.read().contains_key(key)
    }

    fn entries(&self) -> Vec<BeanEntry> {
        self.beans.read().values().cloned().collect()
    }

    fn add_known_type(&self, descriptor: Arc<TypeDescriptor>) -> bool {
        match self.known_types.write().entry(descriptor.key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                debug!("登记已知类型: {}", descriptor.name);
                vacant.insert(descriptor);
                true
            }
        }
    }

    fn known_types(&self) -> Vec<Arc<TypeDescriptor>> {
        self.known_types.read().values().cloned().collect()
    }

    fn known_type(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>> {
        self.known_types.read().get(key).cloned()
    }

    fn len(&self) -> usize {
        self.beans.read().len()
    }
}

impl BeanResolver for DefaultBeanRegistry {
    fn resolve_by_type(&self, key: &TypeKey) -> Option<BeanEntry> {
        self.lookup_by_type(key)
    }

    fn resolve_by_name(&self, name: &str) -> Option<BeanEntry> {
        self.lookup_by_key(name)
    }
}
