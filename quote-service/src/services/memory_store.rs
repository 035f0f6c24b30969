//! In-process quote store for tests and runs without PostgreSQL.

use super::QuoteStore;
use crate::models::{NewQuote, Quote, QuoteFilter};
use async_trait::async_trait;
use service_core::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryQuoteStore {
    quotes: RwLock<Vec<Quote>>,
    unavailable: AtomicBool,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail, as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.quotes.read().await.is_empty()
    }

    fn check_available(&self, message: &str) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database(
                message,
                anyhow::anyhow!("memory store is unavailable"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn insert_quote(&self, quote: NewQuote) -> Result<Quote, AppError> {
        self.check_available("Failed to save quote")?;

        let mut quotes = self.quotes.write().await;
        let saved = Quote {
            id: quote.id.unwrap_or_else(Uuid::new_v4),
            tag: quote.tag,
            tag_source: quote.tag_source.as_str().to_string(),
            quote_text: quote.quote_text,
            author: quote.author,
            source: quote.source,
            created_at: quote.created_at,
            latency_ms: quote.latency_ms,
            client_ip: quote.client_ip,
            user_agent: quote.user_agent,
            insertion_seq: quotes.len() as i64 + 1,
        };
        quotes.push(saved.clone());

        Ok(saved)
    }

    async fn list_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>, AppError> {
        self.check_available("Failed to fetch quotes")?;

        let quotes = self.quotes.read().await;
        let mut matching: Vec<Quote> = quotes
            .iter()
            .filter(|q| filter.tag.as_deref().map_or(true, |tag| q.tag == tag))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.insertion_seq.cmp(&a.insertion_seq))
        });
        matching.truncate(usize::try_from(filter.limit.max(0)).unwrap_or(0));

        Ok(matching)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available("database connection failed")
    }
}
