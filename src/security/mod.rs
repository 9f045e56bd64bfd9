//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Matched subpath segments:
//!     → path.rs (reject traversal / separators, join)
//!     → Some(relative path) → asset resolution
//!     → None                → 404, no detail
//! ```
//!
//! # Design Decisions
//! - Single enforcement point: backends are never trusted to sandbox paths
//! - Fail closed: any suspicious segment rejects the whole request

pub mod path;

pub use path::{secure_path, SecurePathCache};
