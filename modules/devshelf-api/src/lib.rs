use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use chat_client::ChatClient;
use devshelf_catalog::Aggregator;
use devshelf_common::Config;
use tower_http::set_header::SetResponseHeaderLayer;

pub mod rest;

/// Model replies are slow; give them more room than provider lookups.
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct AppState {
    pub aggregator: Aggregator,
    /// `None` when no chat credential is configured.
    pub chat: Option<ChatClient>,
    pub chat_models: Vec<String>,
    pub chat_mock_fallback: bool,
    pub started_at: Instant,
}

impl AppState {
    /// Resource lookups only; chat is unconfigured until `with_chat`.
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            chat: None,
            chat_models: Vec::new(),
            chat_mock_fallback: false,
            started_at: Instant::now(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut state = Self::new(Aggregator::from_config(config));
        if let Some(key) = &config.chat_api_key {
            state = state.with_chat(
                ChatClient::new(&config.chat_base_url, key, CHAT_TIMEOUT),
                config.chat_models.clone(),
            );
        }
        state.chat_mock_fallback = config.chat_mock_fallback;
        state
    }

    pub fn with_chat(mut self, client: ChatClient, models: Vec<String>) -> Self {
        self.chat = Some(client);
        self.chat_models = models;
        self
    }

    pub fn with_mock_fallback(mut self, enabled: bool) -> Self {
        self.chat_mock_fallback = enabled;
        self
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(rest::api_health))
        .route("/api/resources", get(rest::api_resources))
        .route("/api/providers", get(rest::api_providers))
        .route("/api/chat", post(rest::chat::api_chat))
        .with_state(state)
        // CORS: the browser front end is served from another origin
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only (no query params)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
