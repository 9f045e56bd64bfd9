//! Asset registration and URL generation subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     AssetConfigurator::register_asset_view(spec, path_spec, options, extras)
//!     → PathSpec + AssetView
//!     → AssetUrlInfo (ordered registrations) + RouteTable + AssetMount
//!     → finish() → Arc<AssetRegistry> (immutable)
//!
//! Per request:
//!     AssetUrls (extractor) → AssetUrlInfo::generate_url / get_path
//! ```

pub mod helper;
pub mod registration;
pub mod url_info;

pub use helper::AssetUrls;
pub use registration::{AssetConfigurator, AssetMount, AssetRegistry, RouteExtras};
pub use url_info::{AssetRegistration, AssetUrlInfo};
