//! Relay configuration, read from the process environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{RelayError, RelayResult};
use crate::gateway::gemini::DEFAULT_BASE_URL;

/// Provider credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Listening port.
pub const PORT_ENV: &str = "ARTLINK_PORT";
/// Model identifier.
pub const MODEL_ENV: &str = "ARTLINK_MODEL";
/// Provider base URL.
pub const BASE_URL_ENV: &str = "ARTLINK_GEMINI_BASE_URL";
/// Comma-separated CORS allow-list.
pub const ALLOWED_ORIGINS_ENV: &str = "ARTLINK_ALLOWED_ORIGINS";
/// Static asset directory.
pub const STATIC_DIR_ENV: &str = "ARTLINK_STATIC_DIR";
/// Per-user turn cap.
pub const MAX_TURNS_ENV: &str = "ARTLINK_MAX_TURNS";
/// Provider request timeout in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "ARTLINK_REQUEST_TIMEOUT_SECS";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;
/// Default model name.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Default frontend origin.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";
/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "public";
/// Default provider request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Smallest accepted turn cap (one user turn and its reply).
const MIN_MAX_TURNS: usize = 2;

/// Runtime configuration.
#[derive(Clone)]
pub struct RelayConfig {
    /// Provider API key.
    pub api_key: String,
    /// Listening port.
    pub port: u16,
    /// Model identifier.
    pub model: String,
    /// Provider base URL.
    pub gemini_base_url: String,
    /// Origins allowed by CORS, matched exactly.
    pub allowed_origins: Vec<String>,
    /// Directory served at `/`.
    pub static_dir: PathBuf,
    /// Per-user turn cap; `None` keeps every turn.
    pub max_turns: Option<usize>,
    /// Provider request timeout.
    pub request_timeout: Duration,
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("allowed_origins", &self.allowed_origins)
            .field("static_dir", &self.static_dir)
            .field("max_turns", &self.max_turns)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl RelayConfig {
    /// Config with defaults for everything but the API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            port: DEFAULT_PORT,
            model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_turns: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Load from the process environment and validate.
    ///
    /// # Errors
    /// Returns an error if the API key is missing or a value is invalid.
    pub fn from_env() -> RelayResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup and validate.
    ///
    /// # Errors
    /// Returns an error if the API key is missing or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> RelayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV).ok_or(RelayError::MissingEnv(API_KEY_ENV))?;
        let mut config = Self::new(api_key.trim());

        if let Some(port) = get(PORT_ENV) {
            config.port = parse_number(PORT_ENV, &port)?;
        }
        if let Some(model) = get(MODEL_ENV) {
            config.model = model.trim().to_string();
        }
        if let Some(base_url) = get(BASE_URL_ENV) {
            config.gemini_base_url = base_url.trim().to_string();
        }
        if let Some(origins) = get(ALLOWED_ORIGINS_ENV) {
            config.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if let Some(dir) = get(STATIC_DIR_ENV) {
            config.static_dir = PathBuf::from(dir.trim());
        }
        if let Some(max_turns) = get(MAX_TURNS_ENV) {
            config.max_turns = Some(parse_number(MAX_TURNS_ENV, &max_turns)?);
        }
        if let Some(secs) = get(REQUEST_TIMEOUT_ENV) {
            config.request_timeout = Duration::from_secs(parse_number(REQUEST_TIMEOUT_ENV, &secs)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the CORS allow-list.
    #[must_use]
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> RelayResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(RelayError::MissingEnv(API_KEY_ENV));
        }

        if self.model.trim().is_empty() {
            return Err(RelayError::InvalidConfig("model must not be empty".to_string()));
        }

        if let Some(max_turns) = self.max_turns.filter(|n| *n < MIN_MAX_TURNS) {
            return Err(RelayError::InvalidConfig(format!(
                "max_turns must be >= {MIN_MAX_TURNS}, got {max_turns}"
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(RelayError::InvalidConfig(
                "request_timeout must be > 0".to_string(),
            ));
        }

        Url::parse(&self.gemini_base_url)?;

        // CORS compares the Origin header byte for byte; a trailing slash never matches.
        for origin in &self.allowed_origins {
            let url = Url::parse(origin)?;
            if url.origin().ascii_serialization() != *origin {
                return Err(RelayError::InvalidConfig(format!(
                    "allowed origin {origin} must be scheme://host[:port]"
                )));
            }
        }

        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> RelayResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| RelayError::InvalidConfig(format!("{key} must be a number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        let config = RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "k")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.max_turns, None);
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let err = RelayConfig::from_lookup(lookup(&[(PORT_ENV, "8080")])).unwrap_err();
        assert!(matches!(err, RelayError::MissingEnv(API_KEY_ENV)));

        let blank = RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "  ")])).unwrap_err();
        assert!(matches!(blank, RelayError::MissingEnv(_)));
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = RelayConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "k"),
            (PORT_ENV, "8080"),
            (MODEL_ENV, "gemini-1.5-pro"),
            (ALLOWED_ORIGINS_ENV, "https://artlink.app, http://localhost:5173 ,"),
            (MAX_TURNS_ENV, "20"),
            (REQUEST_TIMEOUT_ENV, "5"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(
            config.allowed_origins,
            vec!["https://artlink.app".to_string(), "http://localhost:5173".to_string()]
        );
        assert_eq!(config.max_turns, Some(20));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_port = RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "k"), (PORT_ENV, "http")]));
        assert!(matches!(bad_port, Err(RelayError::InvalidConfig(_))));

        let tiny_cap = RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "k"), (MAX_TURNS_ENV, "1")]));
        assert!(matches!(tiny_cap, Err(RelayError::InvalidConfig(_))));

        let bad_url = RelayConfig::from_lookup(lookup(&[(API_KEY_ENV, "k"), (BASE_URL_ENV, "nope")]));
        assert!(matches!(bad_url, Err(RelayError::Url(_))));

        let path_origin = RelayConfig::new("k").with_allowed_origins(["http://localhost:5173/app"]);
        assert!(matches!(path_origin.validate(), Err(RelayError::InvalidConfig(_))));
    }

    #[test]
    fn test_trailing_slash_origin_is_rejected() {
        let config = RelayConfig::new("k").with_allowed_origins(["http://localhost:5173/"]);
        assert!(matches!(config.validate(), Err(RelayError::InvalidConfig(_))));

        let from_env = RelayConfig::from_lookup(lookup(&[
            (API_KEY_ENV, "k"),
            (ALLOWED_ORIGINS_ENV, "https://artlink.app,http://localhost:5173/"),
        ]));
        assert!(matches!(from_env, Err(RelayError::InvalidConfig(_))));

        let exact = RelayConfig::new("k").with_allowed_origins(["http://localhost:5173"]);
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = RelayConfig::new("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
