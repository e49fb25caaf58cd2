use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use sonance_core::cms;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub server: Server,
}
impl Config {
    pub const FILENAME: &str = "sonance.toml";

    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(Self::FILENAME))
    }

    /// Reads the config at `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found at {}, using defaults", path.display());
                Ok(Config::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub volume: f32,
    pub tick_rate_ms: u64,
}
impl Default for General {
    fn default() -> Self {
        Self {
            volume: 1.0,
            tick_rate_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Server {
    pub base_url: String,
}
impl Default for Server {
    fn default() -> Self {
        Self {
            base_url: cms::Client::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.base_url, "https://cms.samespace.com");
        assert_eq!(config.general.tick_rate_ms, 100);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = Config::parse(
            r#"
            [server]
            base_url = "http://localhost:8055"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_url, "http://localhost:8055");
        assert_eq!(config.general, General::default());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config {
            general: General {
                volume: 0.5,
                tick_rate_ms: 50,
            },
            server: Server {
                base_url: "http://example.com".to_string(),
            },
        };
        let serialized = toml::to_string(&config).unwrap();
        assert_eq!(Config::parse(&serialized).unwrap(), config);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::parse("[general]\nvolume = \"loud\"").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("sonance-test-does-not-exist.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
