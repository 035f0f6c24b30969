use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

fn serve(state: &AppState, path: &str) -> Response {
    match state.assets.get(path) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn index(State(state): State<AppState>) -> Response {
    serve(&state, "index.html")
}

pub async fn stylesheet(State(state): State<AppState>) -> Response {
    serve(&state, "style.css")
}

pub async fn script(State(state): State<AppState>) -> Response {
    serve(&state, "app.js")
}

pub async fn static_asset(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve(&state, &path)
}
