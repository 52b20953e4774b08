use std::str::FromStr;

use anyhow::Context;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the waitlist lives in process memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub app_url: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn init() -> anyhow::Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = var("DATABASE_URL");

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS must be a number, got {:?}", value))?,
            None => 10,
        };

        let app_url = var("APP_URL").unwrap_or_else(|| "https://reent.com".to_string());

        let port = match var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", value))?,
            None => 8000,
        };

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        let log_level = match var("RUST_LOG_LEVEL") {
            Some(value) => LevelFilter::from_str(value.trim())
                .with_context(|| format!("RUST_LOG_LEVEL is not a log level: {:?}", value))?,
            None => LevelFilter::DEBUG,
        };

        Ok(Config {
            database_url,
            database_max_connections,
            app_url,
            port,
            allowed_origins,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, None);
        assert_eq!(config.app_url, "https://reent.com");
        assert_eq!(config.port, 8000);
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.log_level, LevelFilter::DEBUG);
    }

    #[test]
    fn reads_values_from_environment() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/reent"),
            ("APP_URL", "https://waitlist.reent.com"),
            ("PORT", "9090"),
            ("ALLOWED_ORIGINS", "https://reent.com, https://www.reent.com,"),
            ("RUST_LOG_LEVEL", "info"),
        ])
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/reent"));
        assert_eq!(config.app_url, "https://waitlist.reent.com");
        assert_eq!(config.port, 9090);
        assert_eq!(config.allowed_origins, vec!["https://reent.com", "https://www.reent.com"]);
        assert_eq!(config.log_level, LevelFilter::INFO);
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn rejects_bad_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
