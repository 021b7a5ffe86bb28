use std::env;

use tracing::warn;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Session lifetime in minutes.
    pub jwt_maxage: i64,
    pub upload_dir: String,
    pub contact_recipient: String,
    /// None when the SMTP_* variables are absent; the contact relay then
    /// fails per call instead of blocking startup.
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    pub fn init() -> Config {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");

        let jwt_maxage = env::var("JWT_MAXAGE")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or_else(|| {
                warn!("JWT_MAXAGE missing or not a number, defaulting to 60 minutes");
                60
            });

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| {
            warn!("UPLOAD_DIR not set, defaulting to ./uploads");
            "uploads".to_string()
        });

        let contact_recipient = env::var("CONTACT_RECIPIENT").unwrap_or_else(|_| {
            warn!("CONTACT_RECIPIENT not set, contact relay will fail");
            String::new()
        });

        let smtp = match (
            env::var("SMTP_SERVER"),
            env::var("SMTP_USERNAME"),
            env::var("SMTP_PASSWORD"),
            env::var("SMTP_PORT").ok().and_then(|p| p.parse::<u16>().ok()),
        ) {
            (Ok(server), Ok(username), Ok(password), Some(port)) => Some(SmtpConfig {
                server,
                username,
                password,
                port,
            }),
            _ => {
                warn!("SMTP_* variables incomplete, contact relay disabled");
                None
            }
        };

        Config {
            database_url,
            jwt_secret,
            jwt_maxage,
            upload_dir,
            contact_recipient,
            smtp,
        }
    }
}
