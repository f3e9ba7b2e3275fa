//! 实例化守卫

use ioc_common::{BeanError, BeanRef, BeanResult, TypeDescriptor};
use tracing::debug;

/// 类型是否可以直接实例化
///
/// 接口、抽象类型、基本类型和数组都不能实例化。
pub fn can_instantiate(descriptor: &TypeDescriptor) -> bool {
    descriptor.can_instantiate()
}

/// 通过无参构造函数创建实例
pub fn new_default(descriptor: &TypeDescriptor) -> BeanResult<BeanRef> {
    if !can_instantiate(descriptor) {
        return Err(BeanError::instantiation(
            &descriptor.name,
            format!("{:?} 类型不能实例化", descriptor.shape),
        ));
    }
    let constructor = descriptor
        .constructor
        .ok_or_else(|| BeanError::instantiation(&descriptor.name, "缺少无参构造函数"))?;

    let instance =
        constructor().map_err(|e| BeanError::instantiation(&descriptor.name, e.to_string()))?;
    if !descriptor.matches_instance(&instance) {
        return Err(BeanError::instantiation(
            &descriptor.name,
            "构造函数返回了其他类型的实例",
        ));
    }

    debug!("实例化: {}", descriptor.name);
    Ok(instance)
}
