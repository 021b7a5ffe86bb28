use std::sync::Arc;

use axum::{
    http::StatusCode, response::IntoResponse, routing::post, Extension, Json, Router,
};
use tracing::warn;
use validator::Validate;

use crate::{
    mail::sendmail::send_contact_email,
    models::{contact::ContactMessageDto, response::Response},
    AppState, Error, Result,
};

pub fn contact_handler() -> Router {
    Router::new().route("/", post(send_message))
}

async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(message): Json<ContactMessageDto>,
) -> Result<impl IntoResponse> {
    message.validate()?;

    let Some(smtp) = app_state.config.smtp.as_ref() else {
        warn!("contact message dropped, SMTP not configured");
        return Err(Error::InternalServerError);
    };

    send_contact_email(smtp, &app_state.config.contact_recipient, &message).await?;

    Ok((
        StatusCode::OK,
        Json(Response {
            status: "success",
            message: "Message sent! We'll get back to you soon.".to_string(),
        }),
    ))
}
