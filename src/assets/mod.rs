//! Asset serving subsystem.
//!
//! # Data Flow
//! ```text
//! AssetView::handle(region, segments, request)
//!     → cache.rs        (CacheRegion, cache keys)
//!     → security::path  (validate subpath)
//!     → resolver.rs     (docroot + subpath, template variant, existence)
//!     → store.rs        (package → physical file)
//!     → etag.rs         (validator token, If-None-Match)
//!     → render.rs       (template engine seam)
//!     → content_type.rs (MIME + encoding from file name)
//!     → AssetResponse
//! ```

pub mod cache;
pub mod content_type;
pub mod etag;
pub mod render;
pub mod resolver;
pub mod store;
pub mod view;

pub use cache::{CacheRegion, UsernameResolver};
pub use etag::{EtagSource, EtagStrategy, Etagger};
pub use render::{PassthroughRenderer, RenderContext, TemplateRef, TemplateRenderer};
pub use resolver::{AssetKind, AssetResolver, PathSpec};
pub use store::{PackageStore, ResourceStore};
pub use view::{AssetResponse, AssetView, AssetViewOptions};
