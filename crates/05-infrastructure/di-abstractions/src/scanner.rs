//! 类型发现抽象接口
//!
//! 发现器是容器的外部协作者：根据包含、排除的包前缀给出一组类型标识符，
//! 容器只负责把这些标识符解析成类型并分类。

use ioc_common::DiscoveryResult;
use std::collections::BTreeSet;

/// 类型发现器 trait
pub trait ClassDiscovery: Send + Sync {
    /// 发现类型标识符
    fn discover(&self, options: &ScanOptions) -> DiscoveryResult<BTreeSet<String>>;

    /// 获取发现器名称
    fn name(&self) -> &str;
}

/// 扫描选项
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// 包含的包，为空表示全部
    pub include_packages: Vec<String>,
    /// 排除的包
    pub exclude_packages: Vec<String>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加包含的包
    pub fn include<S: Into<String>>(mut self, package: S) -> Self {
        self.include_packages.push(package.into());
        self
    }

    /// 添加排除的包
    pub fn exclude<S: Into<String>>(mut self, package: S) -> Self {
        self.exclude_packages.push(package.into());
        self
    }

    /// 标识符是否满足包含、排除条件
    pub fn matches(&self, identifier: &str) -> bool {
        let included = self.include_packages.is_empty()
            || self
                .include_packages
                .iter()
                .any(|package| package_contains(package, identifier));
        included
            && !self
                .exclude_packages
                .iter()
                .any(|package| package_contains(package, identifier))
    }
}

/// 将 `a.b.c` 形式的包名规范化为 `a::b::c`
pub fn normalize_package(package: &str) -> String {
    package
        .trim()
        .trim_matches(|c| c == '.' || c == ':')
        .replace('.', "::")
}

/// 标识符是否位于包内（包本身或其子路径）
pub fn package_contains(package: &str, identifier: &str) -> bool {
    let package = normalize_package(package);
    if package.is_empty() {
        return true;
    }
    identifier == package
        || identifier
            .strip_prefix(package.as_str())
            .is_some_and(|rest| rest.starts_with("::"))
}
