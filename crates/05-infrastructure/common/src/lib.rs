//! # IoC Common
//!
//! 这个 crate 提供了 IoC 容器各层共享的类型和工具。
//!
//! ## 核心组件
//!
//! - [`TypeDescriptor`] - 以显式元数据描述一个类型（形态、组件标记、可注入字段、接口、工厂方法）
//! - [`Component`] - 提供类型描述符的组件 trait
//! - [`Autowired`] - 可自动装配的写一次字段
//! - [`TypeCatalog`] - 类型标识符到描述符的目录
//! - [`BeanError`] - Bean 解析错误
//!
//! ## 设计原则
//!
//! - 元数据在编译期生成，运行期不做反射
//! - 实例以 `Arc<dyn Any + Send + Sync>` 保存，通过视图函数转换为具体类型或 `dyn Trait`
//! - 注入只写入空字段，已有值的字段保持不变

pub mod catalog;
pub mod component;
pub mod errors;
pub mod metadata;

pub use catalog::*;
pub use component::*;
pub use errors::*;
pub use metadata::*;

/// 供过程宏生成的代码使用
#[doc(hidden)]
pub mod __private {
    pub use ctor;
}
