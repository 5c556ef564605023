//! Runtime configuration read from the process environment.
//!
//! Every setting goes through a lookup function so tests can feed values
//! without mutating the real environment.

use axum::http::HeaderValue;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_NAME: &str = "blood_donation";
pub const DEFAULT_FRONTEND_DIST: &str = "client/dist";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Deployment mode. Anything other than `production` is development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("ENVIRONMENT").as_deref().map(str::trim) {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    /// Used when the connection string does not name a database.
    pub database_name: String,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub mongo: MongoConfig,
    pub host: IpAddr,
    pub port: u16,
    pub frontend_dist: PathBuf,
    /// Empty means every origin is allowed.
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let uri = value("MONGO_URI").ok_or(ConfigError::MissingEnvVar("MONGO_URI"))?;

        let connect_timeout_secs = match value("MONGO_CONNECT_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "MONGO_CONNECT_TIMEOUT",
                    value: raw,
                })?,
            None => DEFAULT_CONNECT_TIMEOUT_SECS,
        };

        let port = match value("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let host = match value("HOST") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "HOST",
                value: raw,
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        Ok(Self {
            environment: Environment::from_lookup(&lookup),
            mongo: MongoConfig {
                uri,
                database_name: value("MONGO_DB_NAME")
                    .unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
                connect_timeout: Duration::from_secs(connect_timeout_secs),
            },
            host,
            port,
            frontend_dist: value("FRONTEND_DIST")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIST)),
            allowed_origins: parse_origins(&lookup),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// ALLOWED_ORIGINS (comma-separated) wins over FRONTEND_ORIGIN. Unparseable
/// entries are skipped.
fn parse_origins<F>(lookup: &F) -> Vec<HeaderValue>
where
    F: Fn(&str) -> Option<String>,
{
    let from_list: Vec<HeaderValue> = lookup("ALLOWED_ORIGINS")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .filter_map(|origin| origin.parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if !from_list.is_empty() {
        return from_list;
    }

    lookup("FRONTEND_ORIGIN")
        .and_then(|s| s.trim().parse().ok())
        .map(|origin| vec![origin])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_mongo_uri_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("PORT", "4000")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("MONGO_URI"));
        assert!(err.to_string().contains("MONGO_URI"));
    }

    #[test]
    fn test_blank_mongo_uri_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("MONGO_URI", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("MONGO_URI"));
    }

    #[test]
    fn test_defaults() {
        let config =
            AppConfig::from_lookup(lookup(&[("MONGO_URI", "mongodb://localhost:27017")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.mongo.database_name, "blood_donation");
        assert_eq!(config.mongo.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.frontend_dist, PathBuf::from("client/dist"));
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://db:27017/donors"),
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("ENVIRONMENT", "production"),
            ("FRONTEND_DIST", "/srv/www"),
            ("MONGO_CONNECT_TIMEOUT", "3"),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert!(config.environment.is_production());
        assert_eq!(config.frontend_dist, PathBuf::from("/srv/www"));
        assert_eq!(config.mongo.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("MONGO_URI", "mongodb://x"), ("PORT", "abc")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "PORT",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://x"),
            ("MONGO_CONNECT_TIMEOUT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "MONGO_CONNECT_TIMEOUT",
                ..
            }
        ));
    }

    #[test]
    fn test_allowed_origins_take_precedence() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://x"),
            ("ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("FRONTEND_ORIGIN", "https://c.example"),
        ]))
        .unwrap();
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.allowed_origins[1], "https://b.example");
    }

    #[test]
    fn test_frontend_origin_fallback() {
        let config = AppConfig::from_lookup(lookup(&[
            ("MONGO_URI", "mongodb://x"),
            ("FRONTEND_ORIGIN", "https://c.example"),
        ]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec![HeaderValue::from_static("https://c.example")]
        );
    }

    #[test]
    fn test_unknown_environment_is_development() {
        assert_eq!(
            Environment::from_lookup(lookup(&[("ENVIRONMENT", "staging")])),
            Environment::Development
        );
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
