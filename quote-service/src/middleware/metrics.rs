use crate::services::QuoteMetrics;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

/// Count every response by method, route template and status reason.
///
/// Unmatched requests are labelled with their raw path.
pub async fn http_metrics_middleware(
    State(metrics): State<QuoteMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let status = response.status();
    let status_label = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_u16().to_string());

    metrics.record_http_request(&method, &route, &status_label);

    response
}
