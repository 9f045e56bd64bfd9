//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AssetServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AssetServerConfig, ConfigError> {
    let config: AssetServerConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AssetServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.toml");
        fs::write(
            &path,
            "[packages]\nsite = \"/srv/site\"\n\n[[assets]]\nasset_spec = \"imgs\"\npath_spec = \"site:imgs\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.assets[0].asset_spec, "imgs");
    }

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            load_config(Path::new("/no/such/assets.toml")),
            Err(ConfigError::Io(_))
        ));
        assert!(matches!(parse_config("[listener"), Err(ConfigError::Parse(_))));

        let err = parse_config("[timeouts]\nrequest_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("timeouts.request_secs"));

        let err = parse_config("[timeouts]\nrequest_secs = 0\n[listener]\nbind_address = \"nope\"\n")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: listener.bind_address: invalid socket address \"nope\", \
             timeouts.request_secs: must be greater than 0"
        );
    }
}
