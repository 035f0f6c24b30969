//! Canned quote generator for tests and offline runs.

use super::{GenerationError, QuoteGenerator};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct MockQuoteGenerator {
    reply: Result<String, u16>,
    calls: AtomicUsize,
}

impl MockQuoteGenerator {
    /// Always succeed with `quote`.
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            reply: Ok(quote.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail as if the upstream answered with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteGenerator for MockQuoteGenerator {
    async fn generate_quote(&self, _tag: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(quote) => Ok(quote.clone()),
            Err(status) => Err(GenerationError::Http {
                status: *status,
                body: "mock upstream failure".to_string(),
            }),
        }
    }
}
