//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Payment gateway configuration.
    #[serde(default)]
    pub payment: PaymentConfig,
    /// Dashboard cache configuration.
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Monthly dues generation configuration.
    #[serde(default)]
    pub dues: DuesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Payment gateway configuration.
///
/// The webhook secret signs `{order_id}|{payment_id}`; an empty secret
/// rejects every confirmation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Public key id issued by the gateway.
    #[serde(default)]
    pub key_id: String,
    /// Secret shared with the gateway for signature verification.
    #[serde(default)]
    pub webhook_secret: String,
}

/// Dashboard cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Maximum number of cached society dashboards.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Time-to-live for cached dashboards in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 {
    1_000
}

fn default_cache_ttl() -> u64 {
    300
}

/// Monthly dues generation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DuesConfig {
    /// IANA timezone used to decide which calendar month is "current".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for DuesConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SOCIETY").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        if config.jwt.secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("SOCIETY__DATABASE__URL", Some("postgres://localhost/society")),
                ("SOCIETY__JWT__SECRET", Some("secret")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/society");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "secret");
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.dashboard.cache_ttl_secs, 300);
                assert_eq!(config.dues.timezone, "Asia/Kolkata");
                assert!(config.payment.webhook_secret.is_empty());
            },
        );
    }

    #[test]
    fn test_load_overrides_nested_values() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("SOCIETY__DATABASE__URL", Some("postgres://db/society")),
                ("SOCIETY__JWT__SECRET", Some("secret")),
                ("SOCIETY__SERVER__PORT", Some("9090")),
                ("SOCIETY__PAYMENT__WEBHOOK_SECRET", Some("whsec")),
                ("SOCIETY__DUES__TIMEZONE", Some("UTC")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.bind_address(), "0.0.0.0:9090");
                assert_eq!(config.payment.webhook_secret, "whsec");
                assert_eq!(config.dues.timezone, "UTC");
            },
        );
    }

    #[test]
    fn test_load_rejects_blank_jwt_secret() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("SOCIETY__DATABASE__URL", Some("postgres://db/society")),
                ("SOCIETY__JWT__SECRET", Some("  ")),
            ],
            || {
                let err = AppConfig::load().unwrap_err();
                assert!(err.to_string().contains("jwt.secret"));
            },
        );
    }

    #[test]
    fn test_load_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("RUN_MODE", Some("test-nonexistent")),
                ("SOCIETY__DATABASE__URL", None::<&str>),
                ("SOCIETY__JWT__SECRET", Some("secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
