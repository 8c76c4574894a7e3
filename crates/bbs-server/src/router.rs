use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router.
///
/// Only `GET /`, `GET /posts` and `POST /posts` are served; any other path
/// or method gets `403`. axum answers `HEAD` with the `GET` handler unless a
/// `HEAD` endpoint is registered, so each route registers one explicitly.
pub fn build_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/",
            get(handler::index)
                .head(handler::forbidden)
                .fallback(handler::forbidden),
        )
        .route(
            "/posts",
            get(handler::list_posts)
                .post(handler::create_post)
                .head(handler::forbidden)
                .fallback(handler::forbidden),
        )
        .fallback(handler::forbidden)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
