use lettre::{
    message::header, transport::smtp::authentication::Credentials, Message, SmtpTransport,
    Transport,
};
use tracing::error;

use crate::{config::SmtpConfig, models::contact::ContactMessageDto, Error, Result};

/// Relays a contact-form submission to the site owners over SMTP. The
/// submission is not persisted; a failed relay surfaces as an inline
/// error to the sender.
pub async fn send_contact_email(
    smtp: &SmtpConfig,
    recipient: &str,
    message: &ContactMessageDto,
) -> Result<()> {
    let subject = if message.subject.is_empty() {
        format!("New contact message from {}", message.name)
    } else {
        message.subject.clone()
    };

    let body = format!(
        "From: {} <{}>\n\n{}",
        message.name, message.email, message.message
    );

    let email = Message::builder()
        .from(smtp.username.parse().map_err(|_| Error::InternalServerError)?)
        .reply_to(
            message
                .email
                .parse()
                .map_err(|_| Error::BadRequest("Email is invalid".to_string()))?,
        )
        .to(recipient.parse().map_err(|_| Error::InternalServerError)?)
        .subject(subject)
        .header(header::ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|_| Error::InternalServerError)?;

    let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());
    let mailer = SmtpTransport::starttls_relay(&smtp.server)
        .map_err(|err| {
            error!("failed to build SMTP transport: {err:?}");
            Error::InternalServerError
        })?
        .credentials(creds)
        .port(smtp.port)
        .build();

    // SmtpTransport::send blocks on the network.
    let result = tokio::task::spawn_blocking(move || mailer.send(&email))
        .await
        .map_err(|_| Error::InternalServerError)?;

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            error!("failed to relay contact message: {err:?}");
            Err(Error::InternalServerError)
        }
    }
}
