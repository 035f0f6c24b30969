use secrecy::{ExposeSecret, Secret};
use service_core::config::{self as core_config, get_env, get_env_parsed};
use service_core::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENROUTER_MODEL: &str = "openrouter/auto";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Deadline for a single upstream call.
pub const OPENROUTER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub common: core_config::Config,
    pub service: ServiceConfig,
    pub openrouter: OpenRouterConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenRouterConfig {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: model.into(),
            base_url: base_url.into(),
            timeout: OPENROUTER_TIMEOUT,
        }
    }
}

/// PostgreSQL settings. `url` wins over the discrete parts when present.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<Secret<String>>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, AppError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url.expose_secret()).map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is invalid: {}", e))
            });
        }

        let ssl_mode = PgSslMode::from_str(&self.ssl_mode).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "DB_SSLMODE '{}' is invalid: {}",
                self.ssl_mode,
                e
            ))
        })?;

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(self.password.expose_secret())
            .database(&self.name)
            .ssl_mode(ssl_mode))
    }
}

impl QuoteConfig {
    /// Load from `.env`, the `configuration` file and the process environment.
    ///
    /// Fails when `OPENROUTER_API_KEY` is missing or a numeric setting does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(QuoteConfig {
            common,
            service: ServiceConfig {
                name: get_env("SERVICE_NAME", Some("quote-service"))?,
                log_level: get_env("LOG_LEVEL", Some("info"))?,
                otlp_endpoint: get_env("OTLP_ENDPOINT", None).ok(),
            },
            openrouter: OpenRouterConfig {
                api_key: Secret::new(get_env("OPENROUTER_API_KEY", None)?),
                model: get_env("OPENROUTER_MODEL", Some(DEFAULT_OPENROUTER_MODEL))?,
                base_url: get_env("OPENROUTER_BASE_URL", Some(DEFAULT_OPENROUTER_BASE_URL))?,
                timeout: OPENROUTER_TIMEOUT,
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL", None).ok().map(Secret::new),
                host: get_env("DB_HOST", Some("localhost"))?,
                port: get_env_parsed("DB_PORT", 5432)?,
                user: get_env("DB_USER", Some("quoteuser"))?,
                password: Secret::new(get_env("DB_PASS", Some("quotepw"))?),
                name: get_env("DB_NAME", Some("quotedb"))?,
                ssl_mode: get_env("DB_SSLMODE", Some("disable"))?,
                max_connections: get_env_parsed("DB_MAX_CONNECTIONS", 100)?,
                min_connections: get_env_parsed("DB_MIN_CONNECTIONS", 0)?,
            },
        })
    }
}
