//! Collaborators behind the HTTP handlers.
//!
//! Each external dependency sits behind a trait so tests and local runs can
//! swap in an in-process implementation.

pub mod assets;
pub mod database;
pub mod memory_store;
pub mod metrics;
pub mod mock;
pub mod openrouter;

pub use assets::{Asset, AssetSource, EmbeddedAssets};
pub use database::Database;
pub use memory_store::MemoryQuoteStore;
pub use metrics::QuoteMetrics;
pub use mock::MockQuoteGenerator;
pub use openrouter::{GenerationError, OpenRouterClient, RetryPolicy};

use crate::models::{NewQuote, Quote, QuoteFilter};
use async_trait::async_trait;
use service_core::error::AppError;

/// Produces quote text for a tag.
#[async_trait]
pub trait QuoteGenerator: Send + Sync {
    async fn generate_quote(&self, tag: &str) -> Result<String, GenerationError>;
}

/// Persistence for generated quotes.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Insert a quote, assigning an id when `quote.id` is `None`.
    async fn insert_quote(&self, quote: NewQuote) -> Result<Quote, AppError>;

    /// Newest first, ties broken by insertion order.
    async fn list_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Applies schema changes before the service accepts traffic.
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    async fn migrate(&self) -> Result<(), AppError>;
}
