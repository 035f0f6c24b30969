use crate::models::PRESET_TAGS;
use axum::Json;
use serde_json::{json, Value};

pub async fn list_tags() -> Json<Value> {
    Json(json!({ "tags": PRESET_TAGS }))
}
