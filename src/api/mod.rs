use axum::{
    Router,
    http::Method,
    routing::post,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::relay::StreamTranslator;

pub mod handlers;
pub mod models;

pub fn create_router(translator: Arc<StreamTranslator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/search", post(handlers::search_handler))
        .with_state(translator)
        .layer(cors)
}
