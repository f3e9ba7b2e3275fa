//! 类型发现器实现
//!
//! - [`CatalogDiscovery`] 列出类型目录中登记的标识符
//! - [`DirectoryDiscovery`] 遍历源码目录，把 `a/b/Type.rs` 转换为 `a::b::Type`

use di_abstractions::{normalize_package, ClassDiscovery, ScanOptions};
use ioc_common::{DiscoveryError, DiscoveryResult, TypeCatalog};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// 基于类型目录的发现器
#[derive(Debug, Clone)]
pub struct CatalogDiscovery {
    catalog: Arc<TypeCatalog>,
}

impl CatalogDiscovery {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self { catalog }
    }
}

impl ClassDiscovery for CatalogDiscovery {
    fn discover(&self, options: &ScanOptions) -> DiscoveryResult<BTreeSet<String>> {
        let identifiers: BTreeSet<String> = self
            .catalog
            .names()
            .into_iter()
            .filter(|name| options.matches(name))
            .collect();
        debug!("类型目录发现 {} 个类型", identifiers.len());
        Ok(identifiers)
    }

    fn name(&self) -> &str {
        "catalog"
    }
}

/// 基于目录遍历的发现器
#[derive(Debug, Clone)]
pub struct DirectoryDiscovery {
    root: PathBuf,
    suffix: String,
}

impl DirectoryDiscovery {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            suffix: crate::settings::DEFAULT_SUFFIX.to_string(),
        }
    }

    /// 设置文件后缀（不含 `.`）
    pub fn with_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.suffix = suffix.into().trim_start_matches('.').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn has_suffix(&self, path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(self.suffix.as_str())
    }
}

impl ClassDiscovery for DirectoryDiscovery {
    fn discover(&self, options: &ScanOptions) -> DiscoveryResult<BTreeSet<String>> {
        if !self.root.is_dir() {
            return Err(DiscoveryError::RootNotFound {
                path: self.root.clone(),
            });
        }
        info!("开始扫描目录: {}", self.root.display());

        let scan_roots: Vec<PathBuf> = if options.include_packages.is_empty() {
            vec![self.root.clone()]
        } else {
            options
                .include_packages
                .iter()
                .map(|package| package_to_path(&self.root, package))
                .collect()
        };
        let excluded: Vec<PathBuf> = options
            .exclude_packages
            .iter()
            .map(|package| package_to_path(&self.root, package))
            .collect();

        let mut identifiers = BTreeSet::new();
        for scan_root in scan_roots {
            if !scan_root.is_dir() {
                warn!("扫描目录不存在，跳过: {}", scan_root.display());
                continue;
            }
            let walker = WalkDir::new(&scan_root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|entry| !excluded.iter().any(|dir| entry.path().starts_with(dir)));
            for entry in walker {
                let entry = entry.map_err(|e| DiscoveryError::Walk {
                    path: e
                        .path()
                        .map_or_else(|| scan_root.clone(), Path::to_path_buf),
                    message: e.to_string(),
                })?;
                if !entry.file_type().is_file() || !self.has_suffix(entry.path()) {
                    continue;
                }
                if let Some(identifier) = path_to_type_name(&self.root, entry.path()) {
                    identifiers.insert(identifier);
                }
            }
        }

        info!("扫描完毕，发现 {} 个类型", identifiers.len());
        Ok(identifiers)
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// 将包名转换为根目录下的路径
pub fn package_to_path(root: &Path, package: &str) -> PathBuf {
    normalize_package(package)
        .split("::")
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// 将根目录下的文件路径转换为类型标识符
pub fn path_to_type_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<&str>>>()?;
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("::"))
}
