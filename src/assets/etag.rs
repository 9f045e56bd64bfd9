//! ETag computation and conditional-request matching.
//!
//! # Responsibilities
//! - Produce a validator token from resource metadata or configuration
//! - Prefix the token with the cache region when enabled
//! - Compare the token with an `If-None-Match` header
//!
//! # Design Decisions
//! - Closed set of strategies plus one explicit extension point (`Custom`)
//! - The resource is known to exist before an ETag is computed

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use axum::http::request::Parts;

use crate::assets::cache::CacheRegion;
use crate::error::AssetError;

/// User-supplied token source for [`EtagStrategy::Custom`].
pub trait EtagSource: Send + Sync {
    fn token(
        &self,
        resource_path: &str,
        cache_region: CacheRegion,
        file_path: &Path,
        request: &Parts,
    ) -> Result<String, AssetError>;
}

/// How the raw token is obtained.
#[derive(Clone)]
pub enum EtagStrategy {
    /// Last modification time of the physical file, in seconds.
    FileModTime,
    /// A fixed string, typically a deployment version.
    StaticValue(String),
    Custom(Arc<dyn EtagSource>),
}

impl fmt::Debug for EtagStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtagStrategy::FileModTime => f.write_str("FileModTime"),
            EtagStrategy::StaticValue(v) => f.debug_tuple("StaticValue").field(v).finish(),
            EtagStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// ETag generator attached to an asset view.
#[derive(Debug, Clone)]
pub struct Etagger {
    strategy: EtagStrategy,
    include_region: bool,
}

impl Etagger {
    pub fn new(strategy: EtagStrategy) -> Self {
        Self {
            strategy,
            include_region: true,
        }
    }

    pub fn file_mod_time() -> Self {
        Self::new(EtagStrategy::FileModTime)
    }

    pub fn static_value(value: impl Into<String>) -> Self {
        Self::new(EtagStrategy::StaticValue(value.into()))
    }

    pub fn custom(source: Arc<dyn EtagSource>) -> Self {
        Self::new(EtagStrategy::Custom(source))
    }

    /// Whether the cache region is prefixed onto the token (default: yes).
    pub fn with_region(mut self, include_region: bool) -> Self {
        self.include_region = include_region;
        self
    }

    pub fn strategy(&self) -> &EtagStrategy {
        &self.strategy
    }

    /// Compute the ETag value, unquoted.
    pub fn compute(
        &self,
        resource_path: &str,
        cache_region: CacheRegion,
        file_path: &Path,
        request: &Parts,
    ) -> Result<String, AssetError> {
        let token = match &self.strategy {
            EtagStrategy::FileModTime => mtime_token(file_path)?,
            EtagStrategy::StaticValue(value) => value.clone(),
            EtagStrategy::Custom(source) => {
                source.token(resource_path, cache_region, file_path, request)?
            }
        };

        if self.include_region {
            Ok(format!("{}-{}", cache_region, token))
        } else {
            Ok(token)
        }
    }
}

fn mtime_token(file_path: &Path) -> Result<String, AssetError> {
    let modified = std::fs::metadata(file_path)
        .and_then(|m| m.modified())
        .map_err(|e| AssetError::io(file_path, e))?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).unwrap_or_default();
    Ok(since_epoch.as_secs_f64().to_string())
}

fn unquote(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(tag)
}

/// True when an `If-None-Match` value matches `etag`, ignoring quoting.
pub fn if_none_match(header: &str, etag: &str) -> bool {
    let etag = unquote(etag);
    header
        .split(',')
        .map(str::trim)
        .any(|candidate| candidate == "*" || unquote(candidate) == etag)
}
