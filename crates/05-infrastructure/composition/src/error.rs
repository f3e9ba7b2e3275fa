//! 应用上下文错误类型

use ioc_common::{BeanError, DiscoveryError};
use thiserror::Error;

/// 应用上下文错误
#[derive(Error, Debug)]
pub enum ContextError {
    /// Bean 解析错误
    #[error(transparent)]
    Bean(#[from] BeanError),

    /// 类型发现错误
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// 环境配置加载失败
    #[error("上下文配置加载失败: {source}")]
    Settings {
        #[from]
        source: config::ConfigError,
    },

    #[error("日志初始化失败: {message}")]
    LoggingInit { message: String },

    /// 重复调用 `init`
    #[error("应用上下文已经初始化")]
    AlreadyInitialized,
}

/// 上下文结果类型
pub type ContextResult<T> = Result<T, ContextError>;
