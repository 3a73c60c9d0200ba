use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::storage::Storage;

use super::handlers::{create_url, health_check, resolve_url, AppState};

pub fn create_api_router(storage: Arc<dyn Storage>, config: Arc<Config>) -> Router {
    let state = Arc::new(AppState {
        storage,
        short_codes: config.short_codes.clone(),
    });

    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/url", post(create_url))
        .route("/{short_url}", get(resolve_url))
        .with_state(state);

    let prefix = config.server.api_prefix.as_str();
    let router = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    };

    router.layer(TraceLayer::new_for_http())
}
