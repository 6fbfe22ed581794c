//! Configuration management for the extraction service.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first when present):
//! - `GEMINI_API_KEY` - Optional. Without it every extraction request fails
//!   with a configuration error, but the server still starts.
//! - `GEMINI_MODEL` - Optional. Model identifier. Defaults to `gemini-pro`.
//! - `GEMINI_API_BASE` - Optional. API base URL. Defaults to
//!   `https://generativelanguage.googleapis.com`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5000`.
//! - `UPSTREAM_TIMEOUT_SECS` - Optional. Timeout for the model call. Defaults to `60`.

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Upstream model configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key, passed as the `key` query parameter
    pub api_key: Option<String>,

    /// Model identifier (e.g. `gemini-pro`)
    pub model: String,

    /// Base URL of the generative language API
    pub api_base: String,

    /// Timeout for a single generateContent call
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl GeminiConfig {
    /// Check if the upstream model can be called (API key present).
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Upstream model configuration
    pub gemini: GeminiConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` or `UPSTREAM_TIMEOUT_SECS`
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from any variable source; `lookup` returns `None`
    /// for unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let model = lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let api_base =
            lookup("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string());

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let timeout_secs: u64 = lookup("UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("UPSTREAM_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "UPSTREAM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            gemini: GeminiConfig {
                api_key,
                model,
                api_base,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: Option<String>, api_base: String) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            gemini: GeminiConfig {
                api_key,
                api_base,
                ..GeminiConfig::default()
            },
        }
    }

    /// Address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new(Some("k".to_string()), "http://localhost:1".to_string());
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.timeout, Duration::from_secs(60));
        assert!(config.gemini.is_configured());
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
        assert_eq!(config.gemini.api_base, DEFAULT_GEMINI_API_BASE);
        assert_eq!(config.gemini.timeout, Duration::from_secs(60));
        assert!(!config.gemini.is_configured());
    }

    #[test]
    fn test_from_lookup_reads_values() {
        let vars = [
            ("GEMINI_API_KEY", "  abc  "),
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("UPSTREAM_TIMEOUT_SECS", "15"),
        ];
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.gemini.api_key.as_deref(), Some("abc"));
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.gemini.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(!config.gemini.is_configured());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        for port in ["abc", "70000", "-1"] {
            let err = Config::from_lookup(lookup_from(&[("PORT", port)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref name, _) if name == "PORT"));
        }
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for secs in ["0", "soon"] {
            let err =
                Config::from_lookup(lookup_from(&[("UPSTREAM_TIMEOUT_SECS", secs)])).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue(ref name, _) if name == "UPSTREAM_TIMEOUT_SECS"
            ));
        }
    }

    #[test]
    fn test_missing_key_is_not_configured() {
        let config = Config::new(None, DEFAULT_GEMINI_API_BASE.to_string());
        assert!(!config.gemini.is_configured());
    }
}
