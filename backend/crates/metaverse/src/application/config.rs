//! Application Configuration
//!
//! Endpoints, timeouts, and the fallback policy of the client core.

use std::time::Duration;

use crate::error::{MetaverseError, MetaverseResult};

/// Which set of endpoints to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "development" | "dev" | "local" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Client core configuration
#[derive(Debug, Clone)]
pub struct MetaverseConfig {
    pub environment: Environment,
    /// Identity provider base URL
    pub identity_provider_url: String,
    /// Remote service base URL
    pub service_address: String,
    /// Surface transport failures instead of masking them with synthesized data
    pub strict_mode: bool,
    /// Upper bound for the interactive login step
    pub login_timeout: Duration,
    /// Per-request timeout for remote calls
    pub request_timeout: Duration,
    /// Requested delegation lifetime (7 days)
    pub delegation_ttl: Duration,
}

impl Default for MetaverseConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            identity_provider_url: "https://identity.ic0.app".to_string(),
            service_address: "https://ic0.app".to_string(),
            strict_mode: false,
            login_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(30),
            delegation_ttl: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

impl MetaverseConfig {
    /// Local replica endpoints
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            identity_provider_url: "http://127.0.0.1:4943".to_string(),
            service_address: "http://127.0.0.1:4943".to_string(),
            request_timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }

    /// Same config with transport failures surfaced
    pub fn strict(self) -> Self {
        Self {
            strict_mode: true,
            ..self
        }
    }

    /// Load from process environment
    pub fn from_env() -> MetaverseResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    ///
    /// `METAVERSE_ENV` picks the base profile; the remaining keys override it.
    pub fn from_lookup<F>(lookup: F) -> MetaverseResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("METAVERSE_ENV") {
            None => Self::default(),
            Some(raw) => match Environment::from_code(&raw) {
                Some(Environment::Production) => Self::default(),
                Some(Environment::Development) => Self::development(),
                None => {
                    return Err(MetaverseError::validation(
                        "METAVERSE_ENV",
                        format!("unknown environment '{raw}'"),
                    ));
                }
            },
        };

        if let Some(url) = lookup("METAVERSE_IDENTITY_URL") {
            config.identity_provider_url = url;
        }
        if let Some(address) = lookup("METAVERSE_SERVICE_ADDRESS") {
            config.service_address = address;
        }
        if let Some(raw) = lookup("METAVERSE_STRICT_MODE") {
            config.strict_mode = parse_flag("METAVERSE_STRICT_MODE", &raw)?;
        }
        if let Some(raw) = lookup("METAVERSE_LOGIN_TIMEOUT_SECS") {
            config.login_timeout = parse_secs("METAVERSE_LOGIN_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("METAVERSE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("METAVERSE_REQUEST_TIMEOUT_SECS", &raw)?;
        }

        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get delegation TTL in milliseconds
    pub fn delegation_ttl_ms(&self) -> u64 {
        self.delegation_ttl.as_millis() as u64
    }
}

fn parse_flag(key: &'static str, raw: &str) -> MetaverseResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(MetaverseError::validation(key, format!("expected a boolean, got '{raw}'"))),
    }
}

fn parse_secs(key: &'static str, raw: &str) -> MetaverseResult<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(MetaverseError::validation(
            key,
            format!("expected a positive number of seconds, got '{raw}'"),
        )),
    }
}
