//! Domain models for quote-service.

mod quote;
mod tag;

pub use quote::{
    parse_limit, CreateQuoteRequest, ListQuotesQuery, NewQuote, Quote, QuoteFilter, QuoteList,
    QuoteResponse, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, MAX_TAG_CHARS, QUOTE_SOURCE,
};
pub use tag::{is_preset_tag, TagSource, PRESET_TAGS};
