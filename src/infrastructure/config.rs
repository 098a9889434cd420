use std::env;
use std::str::FromStr;
use thiserror::Error;

pub const DEV_SESSION_SECRET: &str = "auraboard-dev-secret";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("{0} must be set unless dev sessions are enabled")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub session_ttl_secs: i64,
    pub dev_sessions: bool,
    pub cors_origin: Option<String>,
    pub reflection_seed: Option<u64>,
    pub log_level: String,
}

impl AppConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dev_sessions = parse_or(&lookup, "AURABOARD_DEV_SESSIONS", false)?;
        let session_secret = match lookup("AURABOARD_SESSION_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ if dev_sessions => DEV_SESSION_SECRET.to_string(),
            _ => return Err(ConfigError::Missing("AURABOARD_SESSION_SECRET")),
        };

        Ok(Self {
            host: lookup("AURABOARD_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "AURABOARD_PORT", 8080)?,
            session_secret,
            session_ttl_secs: parse_or(&lookup, "AURABOARD_SESSION_TTL_SECS", 3600)?,
            dev_sessions,
            cors_origin: lookup("AURABOARD_CORS_ORIGIN").filter(|origin| !origin.is_empty()),
            reflection_seed: lookup("AURABOARD_REFLECTION_SEED")
                .map(|value| parse_value("AURABOARD_REFLECTION_SEED", value))
                .transpose()?,
            log_level: lookup("AURABOARD_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => parse_value(key, value),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
