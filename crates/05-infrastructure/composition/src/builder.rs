//! 应用上下文构建器

use crate::context::ApplicationContext;
use crate::discovery::{CatalogDiscovery, DirectoryDiscovery};
use crate::error::ContextResult;
use crate::logging::LoggingConfig;
use crate::settings::ContextSettings;
use di_abstractions::{BeanRegistry, ClassDiscovery};
use di_impl::BeanContainer;
use ioc_common::TypeCatalog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// 应用上下文构建器
///
/// 先应用配置，再应用显式的构建器调用
pub struct ContextBuilder {
    settings: ContextSettings,
    /// 类型目录，未设置时使用全局目录
    catalog: Option<Arc<TypeCatalog>>,
    /// 自定义发现器
    discovery: Option<Box<dyn ClassDiscovery>>,
    /// 自定义注册表
    registry: Option<Arc<dyn BeanRegistry>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    logging_config: LoggingConfig,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            settings: ContextSettings::default(),
            catalog: None,
            discovery: None,
            registry: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 从带前缀的环境变量读取配置
    pub fn from_env(prefix: &str) -> ContextResult<Self> {
        info!("读取环境变量配置，前缀: {}", prefix);
        Ok(Self::new().with_settings(ContextSettings::from_env(prefix)?))
    }

    /// 替换全部配置
    pub fn with_settings(mut self, settings: ContextSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 添加扫描的包
    pub fn scan_package<S: Into<String>>(mut self, package: S) -> Self {
        self.settings.scan_packages.push(package.into());
        self
    }

    /// 添加排除的包
    pub fn filter_package<S: Into<String>>(mut self, package: S) -> Self {
        self.settings.filter_packages.push(package.into());
        self
    }

    /// 初始化时是否加载配置类
    pub fn load_configuration(mut self, enabled: bool) -> Self {
        self.settings.load_configuration = enabled;
        self
    }

    /// 使用目录发现
    pub fn with_root_dir<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.settings.root_dir = Some(root.into());
        self
    }

    /// 目录发现的文件后缀
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.settings.suffix = suffix.into();
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// 使用自定义发现器
    pub fn with_discovery<D: ClassDiscovery + 'static>(mut self, discovery: D) -> Self {
        debug!("使用自定义发现器: {}", discovery.name());
        self.discovery = Some(Box::new(discovery));
        self
    }

    /// 使用自定义注册表
    pub fn with_registry(mut self, registry: Arc<dyn BeanRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建应用上下文，不执行 `init`
    pub fn build(self) -> ContextResult<ApplicationContext> {
        // 只有在明确配置了日志时才初始化日志，避免测试中重复初始化
        if self.logging_enabled {
            self.logging_config.init()?;
        }

        let catalog = self.catalog.unwrap_or_else(TypeCatalog::global);
        let discovery: Box<dyn ClassDiscovery> = match (self.discovery, &self.settings.root_dir) {
            (Some(discovery), _) => discovery,
            (None, Some(root)) => Box::new(
                DirectoryDiscovery::new(root.clone()).with_suffix(self.settings.suffix.clone()),
            ),
            (None, None) => Box::new(CatalogDiscovery::new(Arc::clone(&catalog))),
        };
        let container = match self.registry {
            Some(registry) => BeanContainer::with_registry(registry, catalog),
            None => BeanContainer::new(catalog),
        };

        info!("应用上下文构建完成，发现器: {}", discovery.name());
        Ok(ApplicationContext::new(container, discovery, self.settings))
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
