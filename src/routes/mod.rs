use std::sync::Arc;

use axum::{Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{
        admin::admin_handler,
        auth::{auth_handler, configure_cors},
        blog::blog_handler,
        contact::contact_handler,
    },
    AppState,
};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let images = ServeDir::new(&app_state.config.upload_dir);

    let api_route = Router::new()
        .merge(blog_handler())
        .nest("/auth", auth_handler())
        .nest("/admin", admin_handler())
        .nest("/contact", contact_handler())
        .nest_service("/images", images)
        .layer(TraceLayer::new_for_http())
        .layer(configure_cors())
        .layer(Extension(app_state));

    Router::new().nest("/api", api_route)
}
