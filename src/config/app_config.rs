use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::{KeyferryError, Result};

/// Default keyserver: Launchpad, keyed by username.
pub const DEFAULT_URL_TEMPLATE: &str = "https://launchpad.net/~%s/+sshkeys";

/// Runtime configuration, resolved before any argument-driven work.
///
/// Sources, first hit wins:
///   1. `KEYFERRY_URL` — the template string itself
///   2. `KEYFERRY_CONFIG` — path to a TOML config file (must parse)
///   3. `$XDG_CONFIG_HOME/keyferry/config.toml`
///   4. `/etc/keyferry/config.toml`
///   5. built-in Launchpad default
///
/// The template is only read here; validation happens at startup via
/// `UrlTemplate::new`, so a bad value fails before any fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_url_template")]
    pub url_template: String,
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url_template: default_url_template(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        if let Ok(url_template) = std::env::var("KEYFERRY_URL") {
            return Ok(Self { url_template });
        }
        if let Ok(path) = std::env::var("KEYFERRY_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        let candidates = [
            dirs::config_dir().map(|dir| dir.join("keyferry").join("config.toml")),
            Some(PathBuf::from("/etc/keyferry/config.toml")),
        ];
        for path in candidates.into_iter().flatten() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| KeyferryError::InvalidConfig {
            detail: format!("Failed to parse {}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_points_at_launchpad() {
        let config = AppConfig::default();
        assert_eq!(config.url_template, DEFAULT_URL_TEMPLATE);
    }

    #[test]
    fn from_file_reads_url_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url_template = \"https://keys.internal/%s\"\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.url_template, "https://keys.internal/%s");
    }

    #[test]
    fn from_file_defaults_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.url_template, DEFAULT_URL_TEMPLATE);
    }

    #[test]
    fn from_file_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "url_template = [not toml").unwrap();

        assert!(AppConfig::from_file(&path).is_err());
    }
}
