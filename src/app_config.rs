// Centralized configuration management for the URL classifier backend
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

/// Public domain list used to seed the safe-domain allowlist.
pub const DEFAULT_ALLOWLIST_URL: &str =
    "https://raw.githubusercontent.com/opendns/public-domain-lists/master/opendns-top-domains.txt";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub allowlist: AllowlistConfig,
    pub cors_allowed_origins: Vec<String>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

/// Locations of the externally trained artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_path: String,
    pub scaler_path: String,
    /// Class label the classifier uses for "malicious"
    pub malicious_class_label: i64,
}

/// Safe-domain allowlist source and refresh policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowlistConfig {
    pub enabled: bool,
    pub source_url: String,
    pub fetch_timeout_secs: u64,
    /// 0 disables periodic refresh
    pub refresh_interval_hours: u64,
    pub enable_refresh_endpoint: bool,
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_url: DEFAULT_ALLOWLIST_URL.to_string(),
            fetch_timeout_secs: 5,
            refresh_interval_hours: 24,
            enable_refresh_endpoint: false,
        }
    }
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:5000");
        if bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue(
                "BIND_ADDRESS".to_string(),
                format!("must be host:port, got '{}'", bind_address),
            ));
        }

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));

        let model_path = get_or_default("MODEL_PATH", "artifacts/url_classifier_model.json");
        let scaler_path = get_or_default("SCALER_PATH", "artifacts/url_classifier_scaler.json");
        if model_path.trim().is_empty() {
            return Err(ConfigError::MissingVar("MODEL_PATH".to_string()));
        }
        if scaler_path.trim().is_empty() {
            return Err(ConfigError::MissingVar("SCALER_PATH".to_string()));
        }
        let malicious_class_label = get_or_default("MALICIOUS_CLASS_LABEL", "1")
            .parse::<i64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "MALICIOUS_CLASS_LABEL".to_string(),
                    "not a valid integer class label".to_string(),
                )
            })?;

        let source_url = get_or_default("ALLOWLIST_URL", DEFAULT_ALLOWLIST_URL);
        match Url::parse(&source_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {},
            _ => {
                return Err(ConfigError::InvalidValue(
                    "ALLOWLIST_URL".to_string(),
                    format!("must be an http(s) URL, got '{}'", source_url),
                ))
            },
        }

        let fetch_timeout_secs = parse_u64_or_default("ALLOWLIST_TIMEOUT_SECS", "5")?;
        if fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "ALLOWLIST_TIMEOUT_SECS".to_string(),
                "timeout must be at least 1 second".to_string(),
            ));
        }

        let allowlist = AllowlistConfig {
            enabled: parse_bool_or_default("ALLOWLIST_ENABLED", "true"),
            source_url,
            fetch_timeout_secs,
            refresh_interval_hours: parse_u64_or_default("ALLOWLIST_REFRESH_INTERVAL_HOURS", "24")?,
            enable_refresh_endpoint: parse_bool_or_default(
                "ENABLE_ALLOWLIST_REFRESH_ENDPOINT",
                "false",
            ),
        };

        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            environment,
            server: ServerConfig { bind_address },
            model: ModelConfig {
                model_path,
                scaler_path,
                malicious_class_label,
            },
            allowlist,
            cors_allowed_origins,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Get the global configuration instance
/// This is the primary way to access configuration throughout the app
pub fn config() -> &'static AppConfig {
    &CONFIG
}
