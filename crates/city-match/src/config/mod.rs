use crate::dataset::DatasetSchema;
use crate::report::DEFAULT_TOP_N;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub dataset: DatasetConfig,
    pub recommendation: RecommendationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let path = env::var("APP_DATASET_PATH").unwrap_or_else(|_| "df_final_clean.csv".to_string());
        let identifier_column =
            env::var("APP_DATASET_ID_COLUMN").unwrap_or_else(|_| "City".to_string());
        let group_column = env::var("APP_DATASET_GROUP_COLUMN")
            .unwrap_or_else(|_| "Country".to_string())
            .trim()
            .to_string();

        let top_n = match env::var("APP_TOP_N") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidTopN),
            },
            Err(_) => DEFAULT_TOP_N,
        };
        let cache_capacity = match env::var("APP_RECOMMENDATION_CACHE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidCacheCapacity)?,
            Err(_) => DEFAULT_CACHE_CAPACITY,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            dataset: DatasetConfig {
                path: PathBuf::from(path),
                identifier_column,
                group_column: (!group_column.is_empty()).then_some(group_column),
            },
            recommendation: RecommendationConfig {
                top_n,
                cache_capacity,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location and shape of the city dataset.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
    pub identifier_column: String,
    pub group_column: Option<String>,
}

impl DatasetConfig {
    pub fn schema(&self) -> DatasetSchema {
        DatasetSchema {
            identifier_column: self.identifier_column.clone(),
            ..DatasetSchema::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    pub top_n: usize,
    pub cache_capacity: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTopN,
    InvalidCacheCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTopN => write!(f, "APP_TOP_N must be a positive integer"),
            ConfigError::InvalidCacheCapacity => {
                write!(f, "APP_RECOMMENDATION_CACHE must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTopN
            | ConfigError::InvalidCacheCapacity => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_DATASET_PATH",
            "APP_DATASET_ID_COLUMN",
            "APP_DATASET_GROUP_COLUMN",
            "APP_TOP_N",
            "APP_RECOMMENDATION_CACHE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.dataset.path, PathBuf::from("df_final_clean.csv"));
        assert_eq!(config.dataset.identifier_column, "City");
        assert_eq!(config.dataset.group_column.as_deref(), Some("Country"));
        assert_eq!(config.recommendation.top_n, 5);
        assert_eq!(config.recommendation.cache_capacity, 64);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn rejects_zero_top_n() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_TOP_N", "0");
        let error = AppConfig::load().expect_err("zero rejected");
        assert!(matches!(error, ConfigError::InvalidTopN));
        reset_env();
    }

    #[test]
    fn blank_group_column_disables_grouping() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_DATASET_GROUP_COLUMN", " ");
        env::set_var("APP_DATASET_ID_COLUMN", "Town");
        let config = AppConfig::load().expect("config loads");
        assert!(config.dataset.group_column.is_none());
        assert_eq!(config.dataset.schema().identifier_column, "Town");
        assert_eq!(config.dataset.schema().synthetic_index_column, "Unnamed: 0");
        reset_env();
    }
}
