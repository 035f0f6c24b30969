use crate::startup::AppState;
use axum::{extract::State, http::header, response::IntoResponse};

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        state.metrics.encode(),
    )
}
