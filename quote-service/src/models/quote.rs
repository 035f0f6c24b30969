//! Quote records and their request/response shapes.

use crate::models::TagSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Longest accepted tag, counted in characters after trimming.
pub const MAX_TAG_CHARS: usize = 50;
pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;
/// Value of `source` on every generated quote.
pub const QUOTE_SOURCE: &str = "openrouter";

/// A persisted quote.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: Uuid,
    pub tag: String,
    pub tag_source: String,
    pub quote_text: String,
    pub author: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub latency_ms: i32,
    pub client_ip: String,
    pub user_agent: String,
    /// Monotonic insertion counter; breaks ties between equal `created_at` values.
    #[serde(skip)]
    pub insertion_seq: i64,
}

/// Input for inserting a quote. `id` is assigned by the store when absent.
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub id: Option<Uuid>,
    pub tag: String,
    pub tag_source: TagSource,
    pub quote_text: String,
    pub author: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub latency_ms: i32,
    pub client_ip: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub tag: Option<String>,
    pub limit: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuoteRequest {
    #[validate(custom(function = "validate_tag"))]
    pub tag: String,
    /// Accepted for compatibility with older clients; not stored.
    #[serde(default)]
    pub requestor: Option<String>,
}

fn validate_tag(tag: &str) -> Result<(), ValidationError> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(
            ValidationError::new("invalid_tag").with_message(Cow::from("Tag cannot be empty"))
        );
    }
    if trimmed.chars().count() > MAX_TAG_CHARS {
        return Err(ValidationError::new("invalid_tag")
            .with_message(Cow::from("Tag must be 50 characters or less")));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuotesQuery {
    pub tag: Option<String>,
    pub limit: Option<String>,
}

impl ListQuotesQuery {
    pub fn into_filter(self) -> QuoteFilter {
        QuoteFilter {
            tag: self.tag.filter(|t| !t.is_empty()),
            limit: parse_limit(self.limit.as_deref()),
        }
    }
}

/// Parse the `limit` query parameter: missing, unparseable or < 1 gives the default,
/// anything above the cap is clamped.
pub fn parse_limit(raw: Option<&str>) -> i64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n < 1 => DEFAULT_LIST_LIMIT,
        Some(n) => n.min(MAX_LIST_LIMIT),
        None => DEFAULT_LIST_LIMIT,
    }
}

/// Public view of a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub id: Uuid,
    pub tag: String,
    pub quote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            id: q.id,
            tag: q.tag,
            quote: q.quote_text,
            author: q.author,
            source: q.source,
            created_at: q.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteList {
    pub quotes: Vec<QuoteResponse>,
    pub count: usize,
}

impl From<Vec<Quote>> for QuoteList {
    fn from(quotes: Vec<Quote>) -> Self {
        let quotes: Vec<QuoteResponse> = quotes.into_iter().map(QuoteResponse::from).collect();
        Self {
            count: quotes.len(),
            quotes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tag: &str) -> CreateQuoteRequest {
        CreateQuoteRequest {
            tag: tag.to_string(),
            requestor: None,
        }
    }

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(parse_limit(None), 20);
        assert_eq!(parse_limit(Some("0")), 20);
        assert_eq!(parse_limit(Some("-5")), 20);
        assert_eq!(parse_limit(Some("abc")), 20);
        assert_eq!(parse_limit(Some("")), 20);
        assert_eq!(parse_limit(Some("1")), 1);
        assert_eq!(parse_limit(Some("50")), 50);
        assert_eq!(parse_limit(Some("100")), 100);
        assert_eq!(parse_limit(Some("500")), 100);
    }

    #[test]
    fn empty_tag_query_means_no_filter() {
        let filter = ListQuotesQuery {
            tag: Some(String::new()),
            limit: None,
        }
        .into_filter();
        assert_eq!(filter.tag, None);
        assert_eq!(filter.limit, DEFAULT_LIST_LIMIT);
    }

    #[test]
    fn tag_length_boundary() {
        assert!(request(&"a".repeat(50)).validate().is_ok());
        assert!(request(&"a".repeat(51)).validate().is_err());
        // Surrounding whitespace does not count.
        assert!(request(&format!("  {}  ", "a".repeat(50))).validate().is_ok());
    }

    #[test]
    fn tag_length_counts_characters() {
        assert!(request(&"é".repeat(50)).validate().is_ok());
    }

    #[test]
    fn blank_tags_are_rejected() {
        assert!(request("").validate().is_err());
        assert!(request("   \t ").validate().is_err());
    }

    #[test]
    fn response_omits_missing_author() {
        let response = QuoteResponse {
            id: Uuid::new_v4(),
            tag: "joy".to_string(),
            quote: "Joy is the simplest form of gratitude.".to_string(),
            author: None,
            source: QUOTE_SOURCE.to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("author").is_none());
        assert_eq!(json["quote"], "Joy is the simplest form of gratitude.");
    }
}
