//! Route modules for the Annotator Store

pub mod annotations;
pub mod root;
pub mod search;

use axum::{
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Build the full application router
///
/// Layers run outermost first: tracing, CORS, JSON shaping, then identity
/// resolution right before the handler.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route(
            "/annotations",
            get(annotations::index).post(annotations::create_annotation),
        )
        .route(
            "/annotations/:id",
            get(annotations::read_annotation)
                .post(annotations::update_annotation)
                .put(annotations::update_annotation)
                .delete(annotations::delete_annotation),
        )
        .route("/search", get(search::search_annotations))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), middleware::resolve_identity))
        .layer(from_fn(middleware::shape_json))
        .layer(from_fn(middleware::cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<&'static str>) {
    (StatusCode::NOT_FOUND, Json("Not found"))
}
