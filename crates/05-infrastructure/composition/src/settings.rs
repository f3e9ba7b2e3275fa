//! 应用上下文配置
//!
//! 只从环境变量读取覆盖值，例如前缀为 `IOC` 时：
//!
//! ```text
//! IOC_SCAN_PACKAGES=demo::service,demo::dao
//! IOC_FILTER_PACKAGES=demo::legacy
//! IOC_LOAD_CONFIGURATION=true
//! IOC_ROOT_DIR=/opt/app/src
//! IOC_SUFFIX=rs
//! ```

use crate::error::ContextResult;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// 默认的源文件后缀
pub const DEFAULT_SUFFIX: &str = "rs";

/// 应用上下文配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// 扫描的包，为空表示全部
    pub scan_packages: Vec<String>,
    /// 排除的包
    pub filter_packages: Vec<String>,
    /// 初始化时是否加载配置类
    pub load_configuration: bool,
    /// 目录发现的根目录，未设置时使用类型目录发现
    pub root_dir: Option<PathBuf>,
    /// 目录发现的文件后缀
    pub suffix: String,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            scan_packages: Vec::new(),
            filter_packages: Vec::new(),
            load_configuration: false,
            root_dir: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl ContextSettings {
    /// 从带前缀的环境变量加载
    pub fn from_env(prefix: &str) -> ContextResult<Self> {
        Self::load(prefix, None)
    }

    /// 从给定的变量表加载，变量名与环境变量相同
    pub fn from_vars(prefix: &str, vars: HashMap<String, String>) -> ContextResult<Self> {
        Self::load(prefix, Some(vars))
    }

    fn load(prefix: &str, vars: Option<HashMap<String, String>>) -> ContextResult<Self> {
        let environment = config::Environment::with_prefix(prefix)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("scan_packages")
            .with_list_parse_key("filter_packages")
            .source(vars);

        let settings: ContextSettings = config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        debug!("上下文配置: {:?}", settings);
        Ok(settings)
    }
}
