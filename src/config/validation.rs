//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (assets reference existing packages)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AssetServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::assets::PathSpec;
use crate::config::schema::AssetServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AssetServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("invalid socket address {:?}", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address {:?}", config.observability.metrics_address),
        ));
    }

    let mut seen = HashSet::new();
    for (i, asset) in config.assets.iter().enumerate() {
        let field = |name: &str| format!("assets[{}].{}", i, name);

        if asset.asset_spec.is_empty() || asset.asset_spec.contains('/') {
            errors.push(ValidationError::new(
                field("asset_spec"),
                "must be non-empty and contain no '/'",
            ));
        } else if !seen.insert(asset.asset_spec.as_str()) {
            tracing::warn!(
                asset_spec = %asset.asset_spec,
                "Duplicate asset spec; the first registration wins"
            );
        }

        if asset.path_spec.is_empty() {
            errors.push(ValidationError::new(field("path_spec"), "must not be empty"));
            continue;
        }

        match PathSpec::parse(&asset.path_spec, asset.package_name.as_deref()) {
            Ok(spec) => {
                if let Some(package) = &spec.package_name {
                    if !config.packages.contains_key(package) {
                        errors.push(ValidationError::new(
                            field("path_spec"),
                            format!("unknown package {:?}", package),
                        ));
                    }
                }
            }
            Err(e) => errors.push(ValidationError::new(field("path_spec"), e.to_string())),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::AssetConfig;

    fn asset(spec: &str, path_spec: &str) -> AssetConfig {
        AssetConfig {
            asset_spec: spec.into(),
            path_spec: path_spec.into(),
            package_name: None,
            etag: None,
            template_suffix: None,
            etag_static_files: None,
            extras: Default::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AssetServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AssetServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.assets.push(asset("", "pkg:static"));
        config.assets.push(asset("css", "static/css"));
        config.assets.push(asset("js", "ghost:static/js"));

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"timeouts.request_secs"));
        assert!(fields.contains(&"assets[0].asset_spec"));
        assert!(fields.contains(&"assets[1].path_spec"));
        assert!(fields.contains(&"assets[2].path_spec"));
    }

    #[test]
    fn test_known_packages_and_duplicates_pass() {
        let mut config = AssetServerConfig::default();
        config.packages.insert("pkg".into(), "/srv/pkg".into());
        config.assets.push(asset("imgs", "pkg:static/imgs"));
        config.assets.push(asset("imgs", "pkg:static/other"));
        config.assets.push(asset("raw", "/var/www"));
        assert!(validate_config(&config).is_ok());
    }
}
