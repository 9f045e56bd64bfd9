//! Wiring asset views into the application.
//!
//! # Responsibilities
//! - Parse path specs and build one `AssetView` per registration
//! - Validate routing extras, rejecting unsupported passthrough options
//! - Record registrations in `AssetUrlInfo` and the route table
//! - Freeze everything into an immutable `AssetRegistry`
//!
//! # Design Decisions
//! - Registration happens once, single-threaded, before serving
//! - The registry is passed explicitly; there is no ambient lookup
//! - A repeated asset spec is recorded but only its first route is mounted

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::MethodFilter;

use crate::assets::{AssetView, AssetViewOptions, PathSpec, ResourceStore, TemplateRenderer};
use crate::error::ConfigurationError;
use crate::registry::url_info::AssetUrlInfo;
use crate::routing::{route_pattern, RouteTable};
use crate::security::SecurePathCache;

/// Routing options passed through alongside a registration.
pub type RouteExtras = BTreeMap<String, String>;

/// Options that would make a view's behaviour non-uniform.
pub const UNSUPPORTED_OPTIONS: &[&str] = &["permission", "context", "renderer", "attr"];

/// Methods served when `request_method` is not given.
const DEFAULT_METHODS: MethodFilter = MethodFilter::GET.or(MethodFilter::HEAD);

/// An asset route ready to be mounted on the HTTP router.
#[derive(Debug, Clone)]
pub struct AssetMount {
    pub asset_spec: String,
    pub route_name: String,
    pub pattern: String,
    pub methods: MethodFilter,
    pub view: Arc<AssetView>,
}

/// Collects registrations during startup.
#[derive(Debug)]
pub struct AssetConfigurator {
    store: Arc<dyn ResourceStore>,
    renderer: Arc<dyn TemplateRenderer>,
    path_cache: Arc<SecurePathCache>,
    info: AssetUrlInfo,
    routes: RouteTable,
    mounts: Vec<AssetMount>,
}

impl AssetConfigurator {
    pub fn new(store: Arc<dyn ResourceStore>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            store,
            renderer,
            path_cache: Arc::new(SecurePathCache::default()),
            info: AssetUrlInfo::new(),
            routes: RouteTable::new(),
            mounts: Vec::new(),
        }
    }

    /// Share a specific subpath validation cache between all views.
    pub fn with_path_cache(mut self, cache: Arc<SecurePathCache>) -> Self {
        self.path_cache = cache;
        self
    }

    /// Register `path_spec` under `asset_spec`.
    pub fn register_asset_view(
        &mut self,
        asset_spec: &str,
        path_spec: &str,
        options: AssetViewOptions,
        extras: &RouteExtras,
    ) -> Result<Arc<AssetView>, ConfigurationError> {
        if asset_spec.is_empty() || asset_spec.contains('/') {
            return Err(ConfigurationError::InvalidAssetSpec(asset_spec.to_string()));
        }
        let methods = parse_extras(extras)?;
        let spec = PathSpec::parse(path_spec, options.package_name.as_deref())?;

        tracing::info!(asset_spec = %asset_spec, path_spec = %spec, "Registering asset view");

        let view = Arc::new(AssetView::new(
            spec,
            self.store.clone(),
            self.renderer.clone(),
            self.path_cache.clone(),
            options,
        ));

        let route_name = self.routes.add(asset_spec);
        if self.info.find(asset_spec).is_some() {
            tracing::warn!(
                asset_spec = %asset_spec,
                "Asset spec already registered; earlier registration takes precedence"
            );
        } else {
            self.mounts.push(AssetMount {
                asset_spec: asset_spec.to_string(),
                route_name: route_name.clone(),
                pattern: route_pattern(asset_spec),
                methods,
                view: view.clone(),
            });
        }
        self.info.register(asset_spec, route_name, view.clone());

        Ok(view)
    }

    /// Finish configuration.
    pub fn finish(self) -> AssetRegistry {
        AssetRegistry {
            info: self.info,
            routes: self.routes,
            mounts: self.mounts,
        }
    }
}

/// Immutable result of configuration, shared by every request.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    info: AssetUrlInfo,
    routes: RouteTable,
    mounts: Vec<AssetMount>,
}

impl AssetRegistry {
    pub fn info(&self) -> &AssetUrlInfo {
        &self.info
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn mounts(&self) -> &[AssetMount] {
        &self.mounts
    }
}

fn parse_extras(extras: &RouteExtras) -> Result<MethodFilter, ConfigurationError> {
    let mut methods: Option<MethodFilter> = None;

    for (key, value) in extras {
        if UNSUPPORTED_OPTIONS.contains(&key.as_str()) {
            return Err(ConfigurationError::UnsupportedOption(key.clone()));
        }
        match key.as_str() {
            "request_method" => methods = Some(parse_methods(value)?),
            _ => return Err(ConfigurationError::UnknownOption(key.clone())),
        }
    }

    Ok(methods.unwrap_or(DEFAULT_METHODS))
}

fn parse_methods(value: &str) -> Result<MethodFilter, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidOption {
        option: "request_method".to_string(),
        value: value.to_string(),
    };

    let methods = value
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| Method::from_bytes(m.to_ascii_uppercase().as_bytes()).map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    method_filter(methods.into_iter()).ok_or_else(invalid)
}

fn method_filter(methods: impl Iterator<Item = Method>) -> Option<MethodFilter> {
    let mut filter: Option<MethodFilter> = None;
    for method in methods {
        let next = MethodFilter::try_from(method).ok()?;
        filter = Some(match filter {
            Some(existing) => existing.or(next),
            None => next,
        });
    }
    filter
}
