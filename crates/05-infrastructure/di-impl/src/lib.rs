//! # 依赖注入具体实现
//!
//! 提供 Bean 注册表、依赖注入器和 Bean 容器的具体实现
//!
//! - [`identifier`] - 组件标记分类与注册键计算
//! - [`guard`] - 实例化守卫
//! - [`DefaultBeanRegistry`] - 有序、线程安全的 Bean 注册表
//! - [`DependencyInjector`] - 字段注入
//! - [`BeanContainer`] - 批量实例化、手动注册、配置类加载

pub mod container;
pub mod guard;
pub mod identifier;
pub mod injector;
pub mod registry;

pub use container::BeanContainer;
pub use identifier::{bean_name, classify, Classification};
pub use injector::{DependencyInjector, InjectionOutcome, InjectionReport};
pub use registry::DefaultBeanRegistry;
