use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::{
    routing::{get, post},
    Router,
};
use contracts::usecases::u508_bulk_product_create::create_product_path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::usecases::u508_bulk_product_create::ProductCreateExecutor;

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub product_executor: Arc<ProductCreateExecutor>,
}

impl AppState {
    pub fn new(product_executor: ProductCreateExecutor) -> Self {
        Self {
            product_executor: Arc::new(product_executor),
        }
    }
}

/// All application routes
pub fn configure_routes(state: AppState, max_body_bytes: usize) -> Router {
    // The frontend is served from another port
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // u508: Bulk product create
        // ========================================
        .route(
            &create_product_path(),
            post(handlers::u508_bulk_product_create::create_product),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .with_state(state)
}
