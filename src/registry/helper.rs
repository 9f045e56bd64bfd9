//! Per-request URL and path helper.
//!
//! Built once per request from the registry (if one was installed) and the
//! origin the request was addressed to. Handlers take it as an extractor:
//!
//! ```ignore
//! async fn page(urls: AssetUrls) -> Result<String, LookupError> {
//!     urls.asset_url("imgs", &["logo.png"], CacheRegion::Global, &[])
//! }
//! ```

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use url::Url;

use crate::assets::CacheRegion;
use crate::error::LookupError;
use crate::registry::registration::AssetRegistry;
use crate::routing::table::application_url;

#[derive(Debug, Clone)]
pub struct AssetUrls {
    registry: Option<Arc<AssetRegistry>>,
    origin: Option<Url>,
}

impl AssetUrls {
    pub fn new(registry: Option<Arc<AssetRegistry>>, request: &Parts) -> Self {
        Self {
            registry,
            origin: application_url(request).ok(),
        }
    }

    fn registry(&self) -> Result<&AssetRegistry, LookupError> {
        self.registry.as_deref().ok_or(LookupError::NotConfigured)
    }

    /// Absolute URL for `subpath` under `asset_spec`.
    pub fn asset_url<S: AsRef<str>>(
        &self,
        asset_spec: &str,
        subpath: &[S],
        cache_region: CacheRegion,
        params: &[(String, String)],
    ) -> Result<String, LookupError> {
        let registry = self.registry()?;
        let origin = self
            .origin
            .clone()
            .ok_or_else(|| LookupError::InvalidBase("request origin".to_string()))?;
        let routes = registry.routes().bind(origin);
        registry
            .info()
            .generate_url(asset_spec, subpath, cache_region, &routes, params)
    }

    /// Physical location of `subpath` under `asset_spec`.
    pub fn asset_path<S: AsRef<str>>(
        &self,
        asset_spec: &str,
        subpath: &[S],
        params: &[(String, String)],
    ) -> Result<PathBuf, LookupError> {
        self.registry()?.info().get_path(asset_spec, subpath, params)
    }
}

impl<S> FromRequestParts<S> for AssetUrls
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let registry = parts.extensions.get::<Arc<AssetRegistry>>().cloned();
        Ok(AssetUrls::new(registry, parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetViewOptions, PackageStore, PassthroughRenderer};
    use crate::registry::registration::{AssetConfigurator, RouteExtras};
    use axum::http::Request;

    fn parts() -> Parts {
        Request::builder()
            .uri("/page")
            .header("host", "example.com")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn registry() -> Arc<AssetRegistry> {
        let store = Arc::new(PackageStore::new().with_package("pkg", "/srv/pkg"));
        let mut config = AssetConfigurator::new(store, Arc::new(PassthroughRenderer));
        config
            .register_asset_view("imgs", "pkg:static/imgs", AssetViewOptions::default(), &RouteExtras::new())
            .unwrap();
        Arc::new(config.finish())
    }

    #[test]
    fn test_without_registry() {
        let urls = AssetUrls::new(None, &parts());
        assert!(matches!(
            urls.asset_url("imgs", &["logo.png"], CacheRegion::Global, &[]),
            Err(LookupError::NotConfigured)
        ));
        assert!(matches!(
            urls.asset_path("imgs", &["logo.png"], &[]),
            Err(LookupError::NotConfigured)
        ));
    }

    #[test]
    fn test_with_registry() {
        let urls = AssetUrls::new(Some(registry()), &parts());
        assert_eq!(
            urls.asset_url("imgs", &["logo.png"], CacheRegion::Global, &[]).unwrap(),
            "http://example.com/__assets/imgs/global/logo.png"
        );
        assert_eq!(
            urls.asset_path("imgs", &["logo.png"], &[]).unwrap(),
            PathBuf::from("/srv/pkg/static/imgs/logo.png")
        );
        assert!(matches!(
            urls.asset_url("css", &["a.css"], CacheRegion::User, &[]),
            Err(LookupError::NoMatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_extractor_reads_extension() {
        let mut parts = parts();
        parts.extensions.insert(registry());
        let urls = AssetUrls::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(urls.asset_url("imgs", &["a.png"], CacheRegion::User, &[]).is_ok());
    }
}
