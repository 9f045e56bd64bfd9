//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AssetServerConfig (validated, immutable)
//!     → lifecycle::startup registers one asset view per [[assets]] entry
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; registrations are fixed at startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AssetServerConfig;
pub use schema::{AssetConfig, EtagConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig};
