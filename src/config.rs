//! Service configuration, loaded once at startup and shared read-only.

use crate::{Error, Result};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

#[derive(Clone)]
pub struct Config {
    /// `None` when `OPENAI_API_KEY` is unset or blank.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
    /// Directory receiving the debug copies of generated images.
    pub output_dir: PathBuf,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub bind_address: SocketAddr,
}

impl Config {
    /// Build [`Config`] from `.env` and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let bind = get_or("BIND_ADDRESS", "127.0.0.1:8000");
        let bind_address = bind.parse().map_err(|e| {
            Error::Configuration(format!("Invalid BIND_ADDRESS '{}': {}", bind, e))
        })?;

        let cors_allowed_origins = get_or("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty() && *origin != "*")
            .map(str::to_string)
            .collect();

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            chat_model: get_or("CHAT_MODEL", "gpt-4.1"),
            image_model: get_or("IMAGE_MODEL", "gpt-image-1"),
            image_size: get_or("IMAGE_SIZE", "1024x1024"),
            output_dir: PathBuf::from(get_or("OUTPUT_DIR", "output_folder")),
            cors_allowed_origins,
            log_level: get_or("LOG_LEVEL", "info"),
            log_dir: get("LOG_DIR").map(PathBuf::from),
            bind_address,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.openai_api_key.is_some()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .field("image_size", &self.image_size)
            .field("output_dir", &self.output_dir)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .field("bind_address", &self.bind_address)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.chat_model, "gpt-4.1");
        assert_eq!(config.image_model, "gpt-image-1");
        assert_eq!(config.image_size, "1024x1024");
        assert_eq!(config.output_dir, PathBuf::from("output_folder"));
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9000/"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
            ("BIND_ADDRESS", "0.0.0.0:9999"),
            ("LOG_DIR", "logs"),
        ])
        .unwrap();

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.openai_base_url, "http://localhost:9000");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.bind_address.port(), 9999);
        assert_eq!(config.log_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_invalid_bind_address() {
        let err = config_from(&[("BIND_ADDRESS", "not-an-address")]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-secret")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
