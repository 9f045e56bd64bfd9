//! Asset-spec → route/view lookup for URL and path generation.
//!
//! # Responsibilities
//! - Keep registrations in insertion order
//! - Resolve an asset spec to its first registration
//! - Delegate URL building to the routing layer
//! - Delegate physical path construction to the view
//!
//! # Design Decisions
//! - Filled during startup only; read-only once serving begins
//! - Duplicate asset specs are kept; the first registration wins

use std::path::PathBuf;
use std::sync::Arc;

use crate::assets::{AssetView, CacheRegion};
use crate::error::LookupError;
use crate::routing::RouteUrlGenerator;

/// One `register_asset_view` call.
#[derive(Debug, Clone)]
pub struct AssetRegistration {
    pub asset_spec: String,
    pub route_name: String,
    pub view: Arc<AssetView>,
}

#[derive(Debug, Default)]
pub struct AssetUrlInfo {
    registrations: Vec<AssetRegistration>,
}

impl AssetUrlInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        asset_spec: impl Into<String>,
        route_name: impl Into<String>,
        view: Arc<AssetView>,
    ) {
        self.registrations.push(AssetRegistration {
            asset_spec: asset_spec.into(),
            route_name: route_name.into(),
            view,
        });
    }

    pub fn registrations(&self) -> &[AssetRegistration] {
        &self.registrations
    }

    /// First registration for `asset_spec`.
    pub fn find(&self, asset_spec: &str) -> Option<&AssetRegistration> {
        self.registrations
            .iter()
            .find(|r| r.asset_spec == asset_spec)
    }

    fn lookup<S: AsRef<str>>(
        &self,
        asset_spec: &str,
        subpath: &[S],
    ) -> Result<&AssetRegistration, LookupError> {
        self.find(asset_spec).ok_or_else(|| LookupError::NoMatch {
            asset_spec: asset_spec.to_string(),
            subpath: join(subpath),
        })
    }

    /// URL for `subpath` under `asset_spec`, as produced by `routes`.
    pub fn generate_url<S: AsRef<str>>(
        &self,
        asset_spec: &str,
        subpath: &[S],
        cache_region: CacheRegion,
        routes: &dyn RouteUrlGenerator,
        extra: &[(String, String)],
    ) -> Result<String, LookupError> {
        let registration = self.lookup(asset_spec, subpath)?;
        let segments: Vec<String> = subpath.iter().map(|s| s.as_ref().to_string()).collect();
        routes.route_url(&registration.route_name, cache_region, &segments, extra)
    }

    /// Physical location `subpath` under `asset_spec` resolves to.
    ///
    /// Extra parameters do not affect the path and are ignored.
    pub fn get_path<S: AsRef<str>>(
        &self,
        asset_spec: &str,
        subpath: &[S],
        _extra: &[(String, String)],
    ) -> Result<PathBuf, LookupError> {
        let registration = self.lookup(asset_spec, subpath)?;
        let segments: Vec<String> = subpath.iter().map(|s| s.as_ref().to_string()).collect();
        registration
            .view
            .asset_path(&segments)?
            .ok_or_else(|| LookupError::InsecurePath(join(subpath)))
    }
}

fn join<S: AsRef<str>>(subpath: &[S]) -> String {
    subpath
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetViewOptions, PackageStore, PassthroughRenderer, PathSpec};
    use crate::security::SecurePathCache;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRoutes {
        calls: Mutex<Vec<(String, CacheRegion, Vec<String>, Vec<(String, String)>)>>,
    }

    impl RouteUrlGenerator for RecordingRoutes {
        fn route_url(
            &self,
            route_name: &str,
            cache_region: CacheRegion,
            subpath: &[String],
            query: &[(String, String)],
        ) -> Result<String, LookupError> {
            self.calls.lock().unwrap().push((
                route_name.to_string(),
                cache_region,
                subpath.to_vec(),
                query.to_vec(),
            ));
            Ok(format!("url-for:{}", route_name))
        }
    }

    fn view(path_spec: &str) -> Arc<AssetView> {
        let store = Arc::new(
            PackageStore::new()
                .with_package("pkg", "/srv/pkg")
                .with_package("other", "/srv/other"),
        );
        Arc::new(AssetView::new(
            PathSpec::parse(path_spec, None).unwrap(),
            store,
            Arc::new(PassthroughRenderer),
            Arc::new(SecurePathCache::default()),
            AssetViewOptions::default(),
        ))
    }

    #[test]
    fn test_generate_url_delegates_unmodified() {
        let mut info = AssetUrlInfo::new();
        info.register("imgs", "__assets_imgs", view("pkg:static/imgs"));
        let routes = RecordingRoutes::default();

        let url = info
            .generate_url("imgs", &["logo.png"], CacheRegion::Global, &routes, &[])
            .unwrap();

        assert_eq!(url, "url-for:__assets_imgs");
        let calls = routes.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "__assets_imgs");
        assert_eq!(calls[0].1, CacheRegion::Global);
        assert_eq!(calls[0].2, vec!["logo.png".to_string()]);
        assert!(calls[0].3.is_empty());
    }

    #[test]
    fn test_unknown_asset_spec() {
        let mut info = AssetUrlInfo::new();
        info.register("imgs", "__assets_imgs", view("pkg:static/imgs"));
        let routes = RecordingRoutes::default();

        let err = info
            .generate_url("css", &["a.css"], CacheRegion::Global, &routes, &[])
            .unwrap_err();
        assert!(matches!(err, LookupError::NoMatch { ref asset_spec, .. } if asset_spec == "css"));
        assert!(routes.calls.lock().unwrap().is_empty());

        assert!(matches!(
            info.get_path("css", &["a.css"], &[]),
            Err(LookupError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut info = AssetUrlInfo::new();
        info.register("imgs", "__assets_imgs", view("pkg:first"));
        info.register("imgs", "__assets_imgs", view("other:second"));

        assert_eq!(info.registrations().len(), 2);
        assert_eq!(
            info.get_path("imgs", &["logo.png"], &[]).unwrap(),
            PathBuf::from("/srv/pkg/first/logo.png")
        );
    }

    #[test]
    fn test_get_path_rejects_insecure_subpath() {
        let mut info = AssetUrlInfo::new();
        info.register("imgs", "__assets_imgs", view("pkg:static"));
        assert!(matches!(
            info.get_path("imgs", &["..", "secrets"], &[]),
            Err(LookupError::InsecurePath(p)) if p == "../secrets"
        ));
    }
}
