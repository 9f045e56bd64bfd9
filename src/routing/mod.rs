//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     asset_spec
//!     → route_name     ("__assets_<asset_spec>")
//!     → route_pattern  ("/__assets/<asset_spec>/{cache_region}/{*subpath}")
//!     → RouteTable     (route name → asset spec)
//!
//! URL generation (per request):
//!     RouteTable::bind(application_url(request))
//!     → RouteUrlGenerator::route_url(route, region, subpath, query)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Request dispatch itself is axum's job; this only names and builds routes

pub mod table;

pub use table::{route_name, route_pattern, BoundRoutes, RouteTable, RouteUrlGenerator};
