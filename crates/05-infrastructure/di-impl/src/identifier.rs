//! Bean 标识符解析
//!
//! 根据组件标记判断类型是否由容器管理，并计算注册键。

use ioc_common::{BeanError, BeanResult, TypeDescriptor};

/// 类型分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// 是否带有组件标记（由容器自动实例化）
    pub is_managed: bool,
    /// 注册键：标记的别名，未指定别名时为简短类型名
    pub key: String,
}

/// 对类型进行分类
///
/// 同一类型上出现多于一个组件标记时返回 [`BeanError::Conflict`]。
pub fn classify(descriptor: &TypeDescriptor) -> BeanResult<Classification> {
    match descriptor.markers.as_slice() {
        [] => Ok(Classification {
            is_managed: false,
            key: descriptor.simple_name().to_string(),
        }),
        [marker] => Ok(Classification {
            is_managed: true,
            key: marker
                .explicit_alias()
                .unwrap_or_else(|| descriptor.simple_name())
                .to_string(),
        }),
        markers => {
            let names: Vec<String> = markers.iter().map(|m| m.kind.to_string()).collect();
            Err(BeanError::conflict(
                &descriptor.name,
                format!("不能同时声明多个组件标记: {}", names.join(", ")),
            ))
        }
    }
}

/// 计算注册键
pub fn bean_name(descriptor: &TypeDescriptor) -> BeanResult<String> {
    classify(descriptor).map(|classification| classification.key)
}
