//! Asset location: subpath → physical resource.
//!
//! # Responsibilities
//! - Parse `package:dir` path specs
//! - Build the candidate resource path under the docroot
//! - Prefer a template-suffixed variant when one exists
//! - Tell raw filesystem assets apart from packaged ones
//!
//! # Design Decisions
//! - Subpaths arrive already validated by `security::path`
//! - Raw filesystem serving requires an absolute docroot and no package
//! - Existence is checked here; serving happens in the view

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::store::ResourceStore;
use crate::error::{AssetError, ConfigurationError};

/// Suffix marking a resource for rendering.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".mak";

/// Parsed `path_spec`: where a view's resources live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub package_name: Option<String>,
    pub docroot: String,
}

impl PathSpec {
    /// Parse `path_spec`, falling back to `package_name` for bare paths.
    ///
    /// An absolute path is a raw filesystem docroot only when no package is
    /// given; with a package it is a path inside that package.
    pub fn parse(path_spec: &str, package_name: Option<&str>) -> Result<Self, ConfigurationError> {
        if package_name.is_none() && Path::new(path_spec).is_absolute() {
            return Ok(Self {
                package_name: None,
                docroot: path_spec.to_string(),
            });
        }

        if let Some((package, docroot)) = path_spec.split_once(':') {
            if !package.is_empty() {
                return Ok(Self {
                    package_name: Some(package.to_string()),
                    docroot: docroot.to_string(),
                });
            }
        }

        match package_name {
            Some(package) if !package.is_empty() => Ok(Self {
                package_name: Some(package.to_string()),
                docroot: path_spec.to_string(),
            }),
            _ => Err(ConfigurationError::MissingPackage {
                path_spec: path_spec.to_string(),
            }),
        }
    }

    /// True when resources are plain files under an absolute docroot.
    pub fn is_raw(&self) -> bool {
        self.package_name.is_none() && Path::new(&self.docroot).is_absolute()
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package_name {
            Some(package) => write!(f, "{}:{}", package, self.docroot),
            None => f.write_str(&self.docroot),
        }
    }
}

/// How a located resource is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Static,
    Render,
}

/// A resource that exists and is ready to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Logical path inside the package (or the absolute path in raw mode).
    pub resource_path: String,
    /// Physical file.
    pub file_path: PathBuf,
    pub kind: AssetKind,
}

#[derive(Debug, Clone)]
pub struct AssetResolver {
    spec: PathSpec,
    template_suffix: String,
    store: Arc<dyn ResourceStore>,
}

impl AssetResolver {
    pub fn new(spec: PathSpec, store: Arc<dyn ResourceStore>) -> Self {
        Self {
            spec,
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            store,
        }
    }

    pub fn with_template_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.template_suffix = suffix.into();
        self
    }

    pub fn spec(&self) -> &PathSpec {
        &self.spec
    }

    /// `docroot/subpath`, never doubling the separator.
    pub fn candidate(&self, subpath: &str) -> String {
        format!("{}/{}", self.spec.docroot.trim_end_matches('/'), subpath)
    }

    /// Locate `subpath` (already secured) without checking existence of the
    /// final choice. Returns the chosen resource path and its kind.
    fn locate(&self, subpath: &str) -> (String, AssetKind) {
        let candidate = self.candidate(subpath);
        let package = match &self.spec.package_name {
            Some(package) => package,
            None => return (candidate, AssetKind::Static),
        };

        let templated = format!("{}{}", candidate, self.template_suffix);
        if self.store.exists(package, &templated) {
            (templated, AssetKind::Render)
        } else {
            (candidate, AssetKind::Static)
        }
    }

    fn file_path(&self, resource_path: &str) -> Result<PathBuf, AssetError> {
        match &self.spec.package_name {
            Some(package) => self.store.filename(package, resource_path),
            None => Ok(PathBuf::from(resource_path)),
        }
    }

    fn exists(&self, resource_path: &str) -> bool {
        match &self.spec.package_name {
            Some(package) => self.store.exists(package, resource_path),
            None => Path::new(resource_path).is_file(),
        }
    }

    /// Resolve `subpath`, returning `None` when nothing servable exists.
    pub fn resolve(&self, subpath: &str) -> Result<Option<ResolvedAsset>, AssetError> {
        if self.spec.package_name.is_none() && !self.spec.is_raw() {
            return Ok(None);
        }

        let (resource_path, kind) = self.locate(subpath);
        if !self.exists(&resource_path) {
            return Ok(None);
        }

        let file_path = self.file_path(&resource_path)?;
        Ok(Some(ResolvedAsset {
            resource_path,
            file_path,
            kind,
        }))
    }

    /// Physical location `subpath` maps to, whether or not it exists.
    pub fn path_for(&self, subpath: &str) -> Result<PathBuf, AssetError> {
        let (resource_path, _) = self.locate(subpath);
        self.file_path(&resource_path)
    }

    /// Fully-qualified template name for a located resource.
    pub fn template_name(&self, resource_path: &str) -> String {
        match &self.spec.package_name {
            Some(package) => format!("{}:{}", package, resource_path),
            None => resource_path.to_string(),
        }
    }

    /// Strip the template suffix from `name`, if present.
    pub fn untemplated<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(self.template_suffix.as_str()).unwrap_or(name)
    }
}
