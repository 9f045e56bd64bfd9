//! Error taxonomy for asset serving.
//!
//! # Design Decisions
//! - Configuration errors are fatal at startup and never reach a request
//! - Lookup errors distinguish "nothing registered" from "unknown asset spec"
//! - Not-found is an outcome, not an error (see `AssetResponse::NotFound`)
//! - Storage and render failures propagate unmodified as 500s

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Raised while wiring asset views into the application.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("must specify full package name in path spec {path_spec:?} (mypackage:path)")]
    MissingPackage { path_spec: String },

    #[error("'{0}' option is not supported by register_asset_view()")]
    UnsupportedOption(String),

    #[error("unknown routing option '{0}'")]
    UnknownOption(String),

    #[error("invalid value for routing option '{option}': {value}")]
    InvalidOption { option: String, value: String },

    #[error("invalid asset spec {0:?}")]
    InvalidAssetSpec(String),
}

/// Raised by URL and path generation.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no asset views have been registered")]
    NotConfigured,

    #[error("no asset URL definition matching {asset_spec}:{subpath}")]
    NoMatch { asset_spec: String, subpath: String },

    #[error("subpath escapes the document root: {0}")]
    InsecurePath(String),

    #[error("no route named {0}")]
    UnknownRoute(String),

    #[error("failed to build URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("application URL {0} cannot carry a path")]
    InvalidBase(String),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Raised while handling a request or computing request-scoped values.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("unconfigured cache region: {0}")]
    UnknownCacheRegion(String),

    #[error("no username resolver configured for user-scoped caching")]
    IdentityUnavailable,

    #[error("unknown resource package: {0}")]
    UnknownPackage(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {template}: {message}")]
    Render { template: String, message: String },

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("asset task failed: {0}")]
    Task(String),
}

impl AssetError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssetError::Io {
            path: path.into(),
            source,
        }
    }

    /// Status code this error maps to on the wire.
    pub fn status(&self) -> StatusCode {
        match self {
            AssetError::UnknownCacheRegion(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AssetError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Asset request failed");
        } else {
            tracing::warn!(error = %self, "Rejected asset request");
        }
        // Body stays opaque; details go to the log only.
        let body = status.canonical_reason().unwrap_or("Error");
        (status, body).into_response()
    }
}
