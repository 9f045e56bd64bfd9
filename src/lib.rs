//! Static asset serving with cache regions, ETags and template rendering.

pub mod assets;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod security;

pub use assets::{AssetView, AssetViewOptions, CacheRegion, Etagger};
pub use config::AssetServerConfig;
pub use error::{AssetError, ConfigurationError, LookupError};
pub use http::AssetServer;
pub use lifecycle::Shutdown;
pub use registry::{AssetConfigurator, AssetRegistry, AssetUrls};
