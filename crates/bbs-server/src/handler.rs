use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::response::{Html, Json};
use bbs_types::Post;

use crate::error::ApiError;
use crate::multipart::read_submission;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("index.html");

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// `GET /posts`
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.listing.list_all().await?;
    Ok(Json(posts))
}

/// `POST /posts`
pub async fn create_post(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Post>, ApiError> {
    let submission = read_submission(multipart?, state.max_attachment_size()).await?;
    let post = state.pipeline.ingest(submission).await?;
    Ok(Json(post))
}

/// Everything not explicitly routed.
pub async fn forbidden() -> ApiError {
    ApiError::forbidden()
}
