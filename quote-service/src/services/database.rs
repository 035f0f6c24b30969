//! PostgreSQL-backed quote store.

use super::{QuoteMetrics, QuoteStore, SchemaMigrator};
use crate::config::DatabaseConfig;
use crate::models::{NewQuote, Quote, QuoteFilter};
use async_trait::async_trait;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

const QUOTE_COLUMNS: &str = "id, tag, tag_source, quote_text, author, source, created_at, \
latency_ms, client_ip, user_agent, insertion_seq";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    metrics: QuoteMetrics,
}

impl Database {
    /// Open the connection pool described by `config`.
    #[instrument(skip_all, fields(service = "quote-service"))]
    pub async fn connect(
        config: &DatabaseConfig,
        metrics: QuoteMetrics,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .connect_with(options)
            .await
            .map_err(|e| AppError::database("Failed to connect to database", e))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool, metrics })
    }

    /// Wrap an existing pool, e.g. one created by a test harness.
    pub fn from_pool(pool: PgPool, metrics: QuoteMetrics) -> Self {
        Self { pool, metrics }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL connection pool closed");
    }
}

#[async_trait]
impl SchemaMigrator for Database {
    #[instrument(skip(self))]
    async fn migrate(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database("Migration failed", e))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for Database {
    #[instrument(skip(self, quote), fields(tag = %quote.tag))]
    async fn insert_quote(&self, quote: NewQuote) -> Result<Quote, AppError> {
        let _timer = self.metrics.db_timer("insert_quote");

        let id = quote.id.unwrap_or_else(Uuid::new_v4);
        let sql = format!(
            r#"
            INSERT INTO quotes (id, tag, tag_source, quote_text, author, source, created_at, latency_ms, client_ip, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            QUOTE_COLUMNS
        );

        let saved = sqlx::query_as::<_, Quote>(&sql)
            .bind(id)
            .bind(&quote.tag)
            .bind(quote.tag_source.as_str())
            .bind(&quote.quote_text)
            .bind(&quote.author)
            .bind(&quote.source)
            .bind(quote.created_at)
            .bind(quote.latency_ms)
            .bind(&quote.client_ip)
            .bind(&quote.user_agent)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to save quote", e))?;

        info!(quote_id = %saved.id, latency_ms = saved.latency_ms, "Quote saved");

        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn list_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError> {
        let _timer = self.metrics.db_timer("list_quotes");

        let sql = format!(
            r#"
            SELECT {}
            FROM quotes
            WHERE ($1::VARCHAR IS NULL OR tag = $1)
            ORDER BY created_at DESC, insertion_seq DESC
            LIMIT $2
            "#,
            QUOTE_COLUMNS
        );

        sqlx::query_as::<_, Quote>(&sql)
            .bind(&filter.tag)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database("Failed to fetch quotes", e))
    }

    async fn ping(&self) -> Result<(), AppError> {
        let _timer = self.metrics.db_timer("ping");

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database("database connection failed", e))?;

        Ok(())
    }
}
