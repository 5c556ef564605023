use std::path::PathBuf;

use crate::config::Environment;

/// Logging settings, read before the rest of the configuration so startup
/// failures are already logged.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub environment: Environment,
    /// Level applied to this crate's own targets
    pub level: String,
    pub directory: PathBuf,
}

impl LogConfig {
    pub fn from_lookup<F>(environment: Environment, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("LOG_LEVEL")
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| {
                if environment.is_production() {
                    "info".to_string()
                } else {
                    "debug".to_string()
                }
            });

        Self {
            environment,
            level,
            directory: lookup("LOG_DIR")
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
        }
    }

    pub fn from_env(environment: Environment) -> Self {
        Self::from_lookup(environment, |key| std::env::var(key).ok())
    }

    /// Directive used when RUST_LOG is not set.
    pub fn default_directive(&self) -> String {
        format!(
            "{}={},tower_http=debug,axum=debug,mongodb=info",
            env!("CARGO_CRATE_NAME"),
            self.level
        )
    }
}
