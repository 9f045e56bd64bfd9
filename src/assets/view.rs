//! The asset request pipeline.
//!
//! # Data Flow
//! ```text
//! (cache_region, subpath segments, request)
//!     → CacheRegion::from_str          (400 on unknown region)
//!     → SecurePathCache::validate      (None → NotFound)
//!     → AssetResolver::resolve         (None → NotFound)
//!     → Static: serve_raw              (file + content type [+ ETag])
//!     → Render: serve_maybe_rendered   (ETag check → 304, or render)
//! ```
//!
//! # Design Decisions
//! - Immutable after construction; shared across requests via `Arc`
//! - Blocking I/O only; the HTTP layer runs this on the blocking pool
//! - Security and existence failures are outcomes, everything else is an error

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, request::Parts};

use crate::assets::cache::{self, CacheRegion, UsernameResolver};
use crate::assets::content_type::{self, ContentType};
use crate::assets::etag::{self, Etagger};
use crate::assets::render::{RenderContext, TemplateRef, TemplateRenderer};
use crate::assets::resolver::{AssetKind, AssetResolver, PathSpec, ResolvedAsset};
use crate::assets::store::ResourceStore;
use crate::error::AssetError;
use crate::security::SecurePathCache;

/// What the pipeline decided to send back.
#[derive(Debug)]
pub enum AssetResponse {
    /// Stream a file from disk.
    File {
        path: PathBuf,
        content_type: ContentType,
        etag: Option<String>,
    },
    /// Send a rendered template body.
    Rendered {
        body: Bytes,
        content_type: ContentType,
        etag: Option<String>,
    },
    /// The client's validator is current.
    NotModified { etag: String },
    NotFound,
}

impl AssetResponse {
    pub fn etag(&self) -> Option<&str> {
        match self {
            AssetResponse::File { etag, .. } | AssetResponse::Rendered { etag, .. } => {
                etag.as_deref()
            }
            AssetResponse::NotModified { etag } => Some(etag),
            AssetResponse::NotFound => None,
        }
    }
}

/// Optional collaborators and knobs for an [`AssetView`].
#[derive(Clone, Default)]
pub struct AssetViewOptions {
    pub package_name: Option<String>,
    pub username_resolver: Option<Arc<dyn UsernameResolver>>,
    pub etagger: Option<Etagger>,
    pub template_suffix: Option<String>,
    /// Apply the etagger to static files too (default: true).
    pub etag_static_files: Option<bool>,
}

impl fmt::Debug for AssetViewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetViewOptions")
            .field("package_name", &self.package_name)
            .field("username_resolver", &self.username_resolver.is_some())
            .field("etagger", &self.etagger)
            .field("template_suffix", &self.template_suffix)
            .field("etag_static_files", &self.etag_static_files)
            .finish()
    }
}

/// Serves one asset namespace.
pub struct AssetView {
    resolver: AssetResolver,
    renderer: Arc<dyn TemplateRenderer>,
    username_resolver: Option<Arc<dyn UsernameResolver>>,
    etagger: Option<Etagger>,
    etag_static_files: bool,
    path_cache: Arc<SecurePathCache>,
}

impl fmt::Debug for AssetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetView")
            .field("path_spec", &self.resolver.spec().to_string())
            .field("etagger", &self.etagger)
            .field("etag_static_files", &self.etag_static_files)
            .finish_non_exhaustive()
    }
}

impl AssetView {
    pub fn new(
        spec: PathSpec,
        store: Arc<dyn ResourceStore>,
        renderer: Arc<dyn TemplateRenderer>,
        path_cache: Arc<SecurePathCache>,
        options: AssetViewOptions,
    ) -> Self {
        let mut resolver = AssetResolver::new(spec, store);
        if let Some(suffix) = options.template_suffix {
            resolver = resolver.with_template_suffix(suffix);
        }
        Self {
            resolver,
            renderer,
            username_resolver: options.username_resolver,
            etagger: options.etagger,
            etag_static_files: options.etag_static_files.unwrap_or(true),
            path_cache,
        }
    }

    pub fn package_name(&self) -> Option<&str> {
        self.resolver.spec().package_name.as_deref()
    }

    pub fn docroot(&self) -> &str {
        &self.resolver.spec().docroot
    }

    pub fn etagger(&self) -> Option<&Etagger> {
        self.etagger.as_ref()
    }

    /// Run the full pipeline for one request.
    pub fn handle(
        &self,
        cache_region: &str,
        segments: &[String],
        request: &Parts,
    ) -> Result<AssetResponse, AssetError> {
        let region: CacheRegion = cache_region.parse()?;

        let subpath = match self.path_cache.validate(segments) {
            Some(subpath) => subpath,
            None => {
                tracing::debug!(segments = ?segments, "Rejected insecure subpath");
                return Ok(AssetResponse::NotFound);
            }
        };

        let asset = match self.resolver.resolve(&subpath)? {
            Some(asset) => asset,
            None => {
                tracing::debug!(subpath = %subpath, "Asset not found");
                return Ok(AssetResponse::NotFound);
            }
        };

        match asset.kind {
            AssetKind::Static => self.serve_raw(asset, region, request),
            AssetKind::Render => self.serve_maybe_rendered(asset, region, request),
        }
    }

    fn serve_raw(
        &self,
        asset: ResolvedAsset,
        region: CacheRegion,
        request: &Parts,
    ) -> Result<AssetResponse, AssetError> {
        let etag = if self.etag_static_files {
            self.compute_etag(&asset, region, request)?
        } else {
            None
        };

        if let Some(etag) = &etag {
            if client_has_current(request, etag) {
                return Ok(AssetResponse::NotModified { etag: etag.clone() });
            }
        }

        let content_type = content_type::guess(&asset.resource_path);
        Ok(AssetResponse::File {
            path: asset.file_path,
            content_type,
            etag,
        })
    }

    fn serve_maybe_rendered(
        &self,
        asset: ResolvedAsset,
        region: CacheRegion,
        request: &Parts,
    ) -> Result<AssetResponse, AssetError> {
        let etag = self.compute_etag(&asset, region, request)?;
        if let Some(etag) = &etag {
            if client_has_current(request, etag) {
                return Ok(AssetResponse::NotModified { etag: etag.clone() });
            }
        }

        let name = self.resolver.template_name(&asset.resource_path);
        let template = TemplateRef {
            name: &name,
            file_path: &asset.file_path,
        };
        let body = self.renderer.render(template, &RenderContext::new(), request)?;
        tracing::debug!(template = %name, bytes = body.len(), "Rendered asset template");

        let content_type = content_type::guess(self.resolver.untemplated(&asset.resource_path));
        Ok(AssetResponse::Rendered {
            body,
            content_type,
            etag,
        })
    }

    fn compute_etag(
        &self,
        asset: &ResolvedAsset,
        region: CacheRegion,
        request: &Parts,
    ) -> Result<Option<String>, AssetError> {
        self.etagger
            .as_ref()
            .map(|etagger| etagger.compute(&asset.resource_path, region, &asset.file_path, request))
            .transpose()
    }

    /// Physical path `segments` map to, as the pipeline would locate it.
    ///
    /// Returns `None` for insecure subpaths.
    pub fn asset_path(&self, segments: &[String]) -> Result<Option<PathBuf>, AssetError> {
        match self.path_cache.validate(segments) {
            Some(subpath) => self.resolver.path_for(&subpath).map(Some),
            None => Ok(None),
        }
    }

    /// Cache key for `subpath` plus query string in `region`.
    pub fn cache_key(
        &self,
        region: CacheRegion,
        subpath: &str,
        query: Option<&str>,
        request: &Parts,
    ) -> Result<String, AssetError> {
        let mut key = format!("{}:{}", self.package_name().unwrap_or(""), subpath);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            key.push('?');
            key.push_str(query);
        }
        cache::cache_key(region, &key, self.username_resolver.as_deref(), request)
    }
}

fn client_has_current(request: &Parts, etag: &str) -> bool {
    request
        .headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| etag::if_none_match(v, etag))
}
