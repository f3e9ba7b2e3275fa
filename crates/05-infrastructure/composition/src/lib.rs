//! # IoC 应用上下文
//!
//! 这个 crate 是 IoC 容器的组合层，负责把类型发现、Bean 容器、配置和日志
//! 组合成一个可直接使用的应用上下文。
//!
//! ## 主要功能
//!
//! - **上下文构建器**: 使用构建者模式组装发现器、类型目录和注册表
//! - **类型发现**: 基于类型目录或源码目录发现类型标识符
//! - **环境配置**: 通过 `config` crate 读取环境变量覆盖值
//! - **日志初始化**: 开发、生产两种预设
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use ioc_context::{ApplicationContext, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationContext::builder()
//!         .scan_package("demo")
//!         .load_configuration(true)
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!     context.init()?;
//!
//!     for bean in context.get_all_beans() {
//!         println!("{} -> {}", bean.key, bean.type_name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod settings;

// 重新导出主要类型
pub use builder::ContextBuilder;
pub use context::{ApplicationContext, ContainerState};
pub use discovery::{package_to_path, path_to_type_name, CatalogDiscovery, DirectoryDiscovery};
pub use error::{ContextError, ContextResult};
pub use logging::LoggingConfig;
pub use settings::ContextSettings;
