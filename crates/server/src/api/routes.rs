use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::{
    concerts, handlers,
    middleware::{metrics_middleware, request_span},
    pages,
};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config().server.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/regions", get(handlers::list_regions))
        // Pipeline
        .route("/concerts", post(concerts::find_concerts));

    Router::new()
        // Browser flow
        .route("/", get(pages::index))
        .route("/user", get(pages::user_form))
        .route("/concerts", post(pages::concerts))
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(from_fn(metrics_middleware)),
        )
        .with_state(state)
}
