//! Packaged resource lookup.
//!
//! Resources are addressed by `(package, resource_path)`. The store only
//! answers existence and physical location; reads happen at serve time.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::AssetError;

/// Key-value view over packaged resources.
pub trait ResourceStore: Send + Sync + fmt::Debug {
    /// True when `resource_path` names a regular file inside `package`.
    fn exists(&self, package: &str, resource_path: &str) -> bool;

    /// Physical location of `resource_path` inside `package`.
    fn filename(&self, package: &str, resource_path: &str) -> Result<PathBuf, AssetError>;
}

/// Store backed by one directory per package.
#[derive(Debug, Clone, Default)]
pub struct PackageStore {
    roots: HashMap<String, PathBuf>,
}

impl PackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.insert(name, root);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, root: impl Into<PathBuf>) {
        self.roots.insert(name.into(), root.into());
    }

    pub fn root(&self, package: &str) -> Option<&Path> {
        self.roots.get(package).map(PathBuf::as_path)
    }
}

impl ResourceStore for PackageStore {
    fn exists(&self, package: &str, resource_path: &str) -> bool {
        self.filename(package, resource_path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    fn filename(&self, package: &str, resource_path: &str) -> Result<PathBuf, AssetError> {
        let root = self
            .root(package)
            .ok_or_else(|| AssetError::UnknownPackage(package.to_string()))?;
        Ok(root.join(resource_path.trim_start_matches('/')))
    }
}

impl<K, V> FromIterator<(K, V)> for PackageStore
where
    K: Into<String>,
    V: Into<PathBuf>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = PackageStore::new();
        for (name, root) in iter {
            store.insert(name, root);
        }
        store
    }
}
