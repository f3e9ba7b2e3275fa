//! Bean 注册表抽象接口

use ioc_common::{BeanEntry, BeanRef, BeanResult, MarkerKind, TypeDescriptor, TypeKey};
use std::sync::Arc;

/// Bean 注册表 trait
///
/// 注册键到实例的权威映射，以及容器知道的全部类型。
/// 一个键最多对应一个实例；遍历顺序即注册顺序。
pub trait BeanRegistry: Send + Sync {
    /// 注册实例，键已存在时返回 `BeanError::DuplicateBean`
    fn register(
        &self,
        key: &str,
        descriptor: Arc<TypeDescriptor>,
        instance: BeanRef,
    ) -> BeanResult<BeanEntry>;

    /// 注册实例，键已存在时在同一次写操作中替换旧实例并返回旧记录
    fn replace(
        &self,
        key: &str,
        descriptor: Arc<TypeDescriptor>,
        instance: BeanRef,
    ) -> (BeanEntry, Option<BeanEntry>);

    /// 按注册键查找
    fn lookup_by_key(&self, key: &str) -> Option<BeanEntry>;

    /// 按类型查找
    ///
    /// 精确类型匹配优先；请求的类型不可实例化且没有精确匹配时，
    /// 返回第一个可以赋值给该类型的实例。
    fn lookup_by_type(&self, key: &TypeKey) -> Option<BeanEntry>;

    /// 运行期类型带有指定标记的全部实例
    fn all_of_marker(&self, kind: MarkerKind) -> Vec<BeanEntry>;

    /// 移除指向该实例的所有键，返回被移除的键
    fn remove(&self, instance: &BeanRef) -> Vec<String>;

    /// 按键移除
    fn remove_key(&self, key: &str) -> Option<BeanEntry>;

    fn contains_key(&self, key: &str) -> bool;

    /// 当前全部记录，按注册顺序
    fn entries(&self) -> Vec<BeanEntry>;

    /// 记录一个已知类型，之前未知时返回 `true`
    fn add_known_type(&self, descriptor: Arc<TypeDescriptor>) -> bool;

    /// 全部已知类型，按登记顺序
    fn known_types(&self) -> Vec<Arc<TypeDescriptor>>;

    fn known_type(&self, key: &TypeKey) -> Option<Arc<TypeDescriptor>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
