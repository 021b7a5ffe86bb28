use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path},
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    content::seo::{evaluate_seo, SeoInput},
    middleware,
    models::{post::SavePostDto, response::UploadResponseDto},
    AppState, Error, Result,
};

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub fn admin_handler() -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/seo", post(seo_preview))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/stats", get(get_stats))
        .route(
            "/images",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(from_fn(middleware::auth))
}

async fn list_posts(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let posts = app_state.blog_service.all_posts().await?;
    Ok((StatusCode::OK, Json(posts)))
}

async fn get_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let post = app_state.blog_service.post_by_id(post_id).await?;
    Ok((StatusCode::OK, Json(post)))
}

async fn create_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(new_post): Json<SavePostDto>,
) -> Result<impl IntoResponse> {
    new_post.validate()?;

    let post = app_state.blog_service.create_post(new_post).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    Json(updated_post): Json<SavePostDto>,
) -> Result<impl IntoResponse> {
    updated_post.validate()?;

    let post = app_state
        .blog_service
        .update_post(post_id, updated_post)
        .await?;

    Ok((StatusCode::OK, Json(post)))
}

async fn delete_post(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    app_state.blog_service.delete_post(post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Score for the editor's current draft fields; recomputed by the UI on
/// every relevant change, never persisted.
async fn seo_preview(Json(draft): Json<SeoInput>) -> Result<impl IntoResponse> {
    Ok((StatusCode::OK, Json(evaluate_seo(&draft))))
}

async fn get_stats(Extension(app_state): Extension<Arc<AppState>>) -> Result<impl IntoResponse> {
    let stats = app_state.blog_service.stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}

async fn upload_image(
    Extension(app_state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field.bytes().await?;
        let id = app_state.image_service.store(&bytes).await?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponseDto {
                status: "success",
                id,
            }),
        ));
    }

    Err(Error::BadRequest("Missing 'file' field".to_string()))
}
