//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义 Bean 注册和解析、类型发现的核心接口。
//!
//! ## 核心接口
//!
//! - [`BeanRegistry`] - Bean 注册表接口
//! - [`BeanResolver`] - Bean 解析器接口
//! - [`ClassDiscovery`] - 类型发现器接口

pub mod registry;
pub mod resolver;
pub mod scanner;

pub use registry::*;
pub use resolver::*;
pub use scanner::*;
