use crate::models::{
    CreateQuoteRequest, ListQuotesQuery, NewQuote, QuoteList, QuoteResponse, TagSource,
    QUOTE_SOURCE,
};
use crate::startup::AppState;
use crate::utils::ValidatedJson;
use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use service_core::error::{kind, AppError};
use service_core::middleware::RequestId;
use std::net::SocketAddr;
use std::time::Instant;

/// Width of the `client_ip` column.
const MAX_CLIENT_IP_LEN: usize = 45;

/// Best-effort caller address: first `X-Forwarded-For` hop, then `X-Real-IP`,
/// then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let ip = forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    ip.chars().take(MAX_CLIENT_IP_LEN).collect()
}

pub async fn create_quote(
    State(state): State<AppState>,
    request_id: RequestId,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<CreateQuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let tag = req.tag.trim().to_string();

    let started = Instant::now();
    let quote_text = state.generator.generate_quote(&tag).await.map_err(|e| {
        state.metrics.record_quote_error();
        AppError::ServiceUnavailable {
            kind: kind::QUOTE_GENERATION_FAILED,
            message: "Failed to generate quote. Please try again later.".to_string(),
            source: e.into(),
        }
    })?;
    let elapsed = started.elapsed();

    state.metrics.record_quote_fetched(&tag);
    state.metrics.record_latency(elapsed.as_secs_f64());

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let new_quote = NewQuote {
        id: None,
        tag_source: TagSource::classify(&tag),
        tag,
        quote_text,
        author: None,
        source: QUOTE_SOURCE.to_string(),
        created_at: Utc::now(),
        latency_ms: i32::try_from(elapsed.as_millis()).unwrap_or(i32::MAX),
        client_ip: client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr)),
        user_agent,
    };

    let saved = state.store.insert_quote(new_quote).await?;

    tracing::info!(
        request_id = %request_id,
        quote_id = %saved.id,
        tag = %saved.tag,
        tag_source = %saved.tag_source,
        latency_ms = saved.latency_ms,
        "Quote created"
    );

    Ok(Json(saved.into()))
}

pub async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<ListQuotesQuery>,
) -> Result<Json<QuoteList>, AppError> {
    let filter = query.into_filter();

    let quotes = state.store.list_quotes(&filter).await?;

    Ok(Json(quotes.into()))
}
