//! Configuration module for the record store.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for machine access to the API
    pub api_psk: Option<String>,
    /// Shared dashboard password exchanged for a session token
    pub access_password: Option<String>,
    /// Lifetime of a dashboard session
    pub session_ttl: Duration,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Largest accepted import upload
    pub max_upload_bytes: usize,
}

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {var} value: {value:?}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
}

const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_psk = non_empty_var("MCN_API_PSK");
        let access_password = non_empty_var("MCN_ACCESS_PASSWORD");

        let session_ttl = Duration::from_secs(parse_var(
            "MCN_SESSION_TTL_SECS",
            DEFAULT_SESSION_TTL_SECS,
        )?);

        let db_path = env::var("MCN_DB_PATH")
            .unwrap_or_else(|_| "./data/mcn.sqlite".to_string())
            .into();

        let bind_addr = parse_var(
            "MCN_BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8080)),
        )?;

        let log_level = env::var("MCN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_upload_bytes = parse_var("MCN_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            api_psk,
            access_password,
            session_ttl,
            db_path,
            bind_addr,
            log_level,
            max_upload_bytes,
        })
    }

    /// Whether any gate protects `/api/*`.
    pub fn auth_enabled(&self) -> bool {
        self.api_psk.is_some() || self.access_password.is_some()
    }
}

fn non_empty_var(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test: the process environment is shared between test threads.
    #[test]
    fn test_config_from_env() {
        for var in [
            "MCN_API_PSK",
            "MCN_ACCESS_PASSWORD",
            "MCN_SESSION_TTL_SECS",
            "MCN_DB_PATH",
            "MCN_BIND_ADDR",
            "MCN_LOG_LEVEL",
            "MCN_MAX_UPLOAD_BYTES",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert!(config.api_psk.is_none());
        assert!(config.access_password.is_none());
        assert!(!config.auth_enabled());
        assert_eq!(config.session_ttl, Duration::from_secs(28800));
        assert_eq!(config.db_path, PathBuf::from("./data/mcn.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);

        env::set_var("MCN_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.var, "MCN_BIND_ADDR");
        assert_eq!(err.to_string(), r#"Invalid MCN_BIND_ADDR value: "not-an-address""#);
        env::remove_var("MCN_BIND_ADDR");
    }
}
