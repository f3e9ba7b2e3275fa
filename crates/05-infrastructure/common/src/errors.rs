//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 组件代码（构造函数、工厂方法）返回的通用错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Bean 解析错误类型
#[derive(Error, Debug)]
pub enum BeanError {
    /// 同一类型上存在多个组件标记，或工厂方法被声明为静态
    #[error("组件标记冲突: {type_name}, 原因: {message}")]
    Conflict { type_name: String, message: String },

    /// 注册键已存在于容器中
    #[error("Bean 已存在: key={key}, 类型: {type_name}")]
    DuplicateBean { key: String, type_name: String },

    /// 缺少无参构造函数，或构造过程失败
    #[error("Bean 实例化失败: {type_name}, 原因: {message}")]
    Instantiation { type_name: String, message: String },

    /// 工厂方法参数无法从容器中解析
    #[error("依赖无法解析: 方法 {method} 的参数 {parameter} 不在容器中")]
    UnresolvedDependency { method: String, parameter: String },

    /// 类型标识符无法解析为已登记的类型
    #[error("类型不存在: {identifier}")]
    TypeResolution { identifier: String },
}

impl BeanError {
    /// 创建标记冲突错误
    pub fn conflict(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 创建重复 Bean 错误
    pub fn duplicate(key: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::DuplicateBean {
            key: key.into(),
            type_name: type_name.into(),
        }
    }

    /// 创建实例化错误
    pub fn instantiation(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Instantiation {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}

/// 类型发现错误类型
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("扫描根目录不存在: {}", path.display())]
    RootNotFound { path: PathBuf },

    #[error("扫描目录读取失败: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("目录遍历失败: {}, 原因: {message}", path.display())]
    Walk { path: PathBuf, message: String },
}

/// 结果类型别名
pub type BeanResult<T> = Result<T, BeanError>;
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
