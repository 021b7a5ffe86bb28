use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};

use crate::{
    models::query::{LimitQueryDto, SearchQueryDto},
    AppState, Error, Result,
};

const DEFAULT_FEATURED_LIMIT: i64 = 3;
const DEFAULT_RECENT_LIMIT: i64 = 5;

pub fn blog_handler() -> Router {
    Router::new()
        .route("/posts", get(get_posts))
        .route("/posts/featured", get(get_featured_posts))
        .route("/posts/recent", get(get_recent_posts))
        .route("/posts/category/{category}", get(get_posts_by_category))
        .route("/posts/slug/{slug}", get(get_post_by_slug))
        .route("/categories", get(get_categories))
        .route("/search", get(search_posts))
}

async fn get_posts(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = app_state.blog_service.published_posts().await;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_featured_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<LimitQueryDto>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT).max(0);
    let posts = app_state.blog_service.featured_posts(limit).await;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_recent_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<LimitQueryDto>,
) -> Result<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT).max(0);
    let posts = app_state.blog_service.recent_posts(limit).await;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_posts_by_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse> {
    let posts = app_state.blog_service.posts_by_category(&category).await;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_post_by_slug(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let detail = app_state
        .blog_service
        .post_by_slug(&slug)
        .await
        .ok_or(Error::NotFound)?;

    Ok((StatusCode::OK, Json(detail)))
}

async fn get_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse> {
    let categories = app_state.blog_service.categories().await;
    Ok((StatusCode::OK, Json(categories)))
}

async fn search_posts(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchQueryDto>,
) -> Result<impl IntoResponse> {
    let term = query.q.unwrap_or_default();
    let posts = app_state.blog_service.search_posts(&term).await;
    Ok((StatusCode::OK, Json(posts)))
}
