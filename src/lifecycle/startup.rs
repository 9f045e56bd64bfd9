//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn `[packages]` into a resource store
//! - Register one asset view per `[[assets]]` entry, in order
//! - Freeze the registry before any listener starts
//!
//! # Design Decisions
//! - Fail fast: any registration error is fatal
//! - Routing extras arrive as TOML values and are flattened to strings

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::assets::{AssetViewOptions, Etagger, PackageStore, TemplateRenderer};
use crate::config::{AssetConfig, AssetServerConfig, ConfigError, EtagConfig};
use crate::error::ConfigurationError;
use crate::registry::{AssetConfigurator, AssetRegistry, RouteExtras};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot register asset view {asset_spec:?}: {source}")]
    Registration {
        asset_spec: String,
        #[source]
        source: ConfigurationError,
    },
}

/// Register every configured asset view.
pub fn build_registry(
    config: &AssetServerConfig,
    renderer: Arc<dyn TemplateRenderer>,
) -> Result<AssetRegistry, StartupError> {
    let store: PackageStore = config
        .packages
        .iter()
        .map(|(name, root)| (name.as_str(), root.as_str()))
        .collect();

    let mut configurator = AssetConfigurator::new(Arc::new(store), renderer);
    for asset in &config.assets {
        configurator
            .register_asset_view(
                &asset.asset_spec,
                &asset.path_spec,
                view_options(asset),
                &route_extras(&asset.extras),
            )
            .map_err(|source| StartupError::Registration {
                asset_spec: asset.asset_spec.clone(),
                source,
            })?;
    }

    let registry = configurator.finish();
    tracing::info!(
        registrations = registry.info().registrations().len(),
        routes = registry.mounts().len(),
        "Asset registry ready"
    );
    Ok(registry)
}

/// View options for one `[[assets]]` entry.
pub fn view_options(asset: &AssetConfig) -> AssetViewOptions {
    let etagger = asset.etag.as_ref().map(|etag| match etag {
        EtagConfig::Mtime { include_region } => Etagger::file_mod_time().with_region(*include_region),
        EtagConfig::Static {
            value,
            include_region,
        } => Etagger::static_value(value.clone()).with_region(*include_region),
    });

    AssetViewOptions {
        package_name: asset.package_name.clone(),
        username_resolver: None,
        etagger,
        template_suffix: asset.template_suffix.clone(),
        etag_static_files: asset.etag_static_files,
    }
}

/// Flatten TOML extras: strings as-is, arrays joined with `,`.
pub fn route_extras(extras: &BTreeMap<String, toml::Value>) -> RouteExtras {
    extras
        .iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect()
}

fn value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{EtagStrategy, PassthroughRenderer};
    use crate::config::parse_config;

    #[test]
    fn test_build_registry_from_config() {
        let config = parse_config(
            r#"
            [packages]
            site = "/srv/site"

            [[assets]]
            asset_spec = "imgs"
            path_spec = "site:static/imgs"
            etag = { kind = "static", value = "r1" }
            request_method = ["GET", "HEAD"]
            "#,
        )
        .unwrap();

        let registry = build_registry(&config, Arc::new(PassthroughRenderer)).unwrap();
        let view = &registry.info().find("imgs").unwrap().view;
        assert_eq!(view.package_name(), Some("site"));
        assert!(matches!(
            view.etagger().unwrap().strategy(),
            EtagStrategy::StaticValue(v) if v == "r1"
        ));
    }

    #[test]
    fn test_unsupported_extra_fails_startup() {
        let config = parse_config(
            r#"
            [packages]
            site = "/srv/site"

            [[assets]]
            asset_spec = "imgs"
            path_spec = "site:static/imgs"
            permission = "view"
            "#,
        )
        .unwrap();

        let err = build_registry(&config, Arc::new(PassthroughRenderer)).unwrap_err();
        assert!(matches!(
            err,
            StartupError::Registration { source: ConfigurationError::UnsupportedOption(_), .. }
        ));
    }

    #[test]
    fn test_route_extras_flattening() {
        let mut extras = BTreeMap::new();
        extras.insert(
            "request_method".to_string(),
            toml::Value::Array(vec!["GET".into(), "POST".into()]),
        );
        extras.insert("weight".to_string(), toml::Value::Integer(3));
        let flat = route_extras(&extras);
        assert_eq!(flat["request_method"], "GET,POST");
        assert_eq!(flat["weight"], "3");
    }
}
