use serde::{Deserialize, Serialize};
use validator::Validate;

/// Contact-form submission, relayed to the site owners by email.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ContactMessageDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}
