//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the asset
//! server. All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the asset server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AssetServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Package name → directory holding that package's resources.
    pub packages: BTreeMap<String, String>,

    /// Asset views to register, in order.
    pub assets: Vec<AssetConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "asset_view=info,tower_http=info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One asset view registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetConfig {
    /// Symbolic name; becomes part of the route.
    pub asset_spec: String,

    /// `package:dir`, a bare dir with `package_name`, or an absolute path.
    pub path_spec: String,

    #[serde(default)]
    pub package_name: Option<String>,

    #[serde(default)]
    pub etag: Option<EtagConfig>,

    /// Suffix marking templates (default ".mak").
    #[serde(default)]
    pub template_suffix: Option<String>,

    /// Apply the ETag to static files as well as templates (default true).
    #[serde(default)]
    pub etag_static_files: Option<bool>,

    /// Routing extras (e.g. `request_method`).
    #[serde(flatten)]
    pub extras: BTreeMap<String, toml::Value>,
}

/// ETag strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EtagConfig {
    /// File modification time.
    Mtime {
        #[serde(default = "default_include_region")]
        include_region: bool,
    },
    /// Fixed value, e.g. a release identifier.
    Static {
        value: String,
        #[serde(default = "default_include_region")]
        include_region: bool,
    },
}

fn default_include_region() -> bool {
    true
}
