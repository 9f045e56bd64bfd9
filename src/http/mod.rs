//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one route per asset view)
//!     → request.rs (request ID)
//!     → handler.rs (raw params → segments → AssetView on blocking pool)
//!     → response.rs (status, Content-Type, ETag, streamed body)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::AssetServer;
