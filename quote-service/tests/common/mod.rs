//! Shared helpers for quote-service integration tests.

#![allow(dead_code)]

use axum::{body::Body, http::Request, response::Response, Router};
use quote_service::config::{DatabaseConfig, OpenRouterConfig, QuoteConfig, ServiceConfig};
use quote_service::services::{
    EmbeddedAssets, MemoryQuoteStore, MockQuoteGenerator, QuoteGenerator, QuoteMetrics,
    QuoteStore,
};
use quote_service::startup::{build_router, AppState};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub const SAMPLE_QUOTE: &str = "Joy is not in things; it is in us.";

pub fn test_config(openrouter_base_url: &str) -> QuoteConfig {
    QuoteConfig {
        common: CoreConfig { port: 0 },
        service: ServiceConfig {
            name: "quote-service-test".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        openrouter: OpenRouterConfig::new("test-key", "openrouter/auto", openrouter_base_url),
        database: DatabaseConfig {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "quoteuser".to_string(),
            password: Secret::new("quotepw".to_string()),
            name: "quotedb".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections: 5,
            min_connections: 0,
        },
    }
}

/// Router over in-memory collaborators, plus handles to inspect them.
pub struct TestRouter {
    pub router: Router,
    pub store: Arc<MemoryQuoteStore>,
    pub metrics: QuoteMetrics,
}

impl TestRouter {
    pub fn with_generator(generator: Arc<dyn QuoteGenerator>) -> Self {
        Self::with_parts(generator, QuoteMetrics::new().unwrap())
    }

    pub fn with_parts(generator: Arc<dyn QuoteGenerator>, metrics: QuoteMetrics) -> Self {
        let store = Arc::new(MemoryQuoteStore::new());
        let state = AppState {
            store: store.clone() as Arc<dyn QuoteStore>,
            generator,
            metrics: metrics.clone(),
            assets: Arc::new(EmbeddedAssets),
        };

        Self {
            router: build_router(state),
            store,
            metrics,
        }
    }

    pub fn new() -> Self {
        Self::with_generator(Arc::new(MockQuoteGenerator::new(SAMPLE_QUOTE)))
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        use tower::ServiceExt;

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails")
    }
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Chat-completion body with a single choice.
pub fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "gen-test",
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}
