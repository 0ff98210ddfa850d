//! Configuration file discovery and loading.

use crate::config::schema::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// System-wide override file, read when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/perch/config.yml";

/// Load configuration.
///
/// An explicit path must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
/// used if present, otherwise the built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ProvisionConfig> {
    match explicit {
        Some(path) => load_config_file(path),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.is_file() {
                load_config_file(&default)
            } else {
                tracing::debug!("No config file at {}, using defaults", DEFAULT_CONFIG_PATH);
                Ok(ProvisionConfig::default())
            }
        }
    }
}

/// Load and parse a single config file.
pub fn load_config_file(path: &Path) -> Result<ProvisionConfig> {
    let content = fs::read_to_string(path).map_err(|e| ProvisionError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config = parse_config(&content, path)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse YAML content into a [`ProvisionConfig`].
pub fn parse_config(content: &str, path: &Path) -> Result<ProvisionConfig> {
    if content.trim().is_empty() {
        return Ok(ProvisionConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_file_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "min_java_major: 21\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.min_java_major, 21);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, ProvisionError::ConfigParseError { .. }));
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("   \n", Path::new("config.yml")).unwrap();
        assert_eq!(config.install_root, PathBuf::from("/opt/ghidra"));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = parse_config("min_java_major: [", Path::new("/etc/perch/config.yml"))
            .unwrap_err();
        assert!(err.to_string().contains("/etc/perch/config.yml"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let result = parse_config("min_java_major: seventeen\n", Path::new("c.yml"));
        assert!(result.is_err());
    }
}
