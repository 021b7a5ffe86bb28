use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    models::users::{User, UserRole},
    repositories::user_repo::UserRepository,
    Error, Result,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    jwt_secret: String,
    /// Minutes a minted session stays valid.
    jwt_maxage: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: usize,
    exp: usize,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserRepository>, jwt_secret: String, jwt_maxage: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_maxage,
        }
    }

    /// Verifies the password, then requires the admin role before any
    /// token is minted. A valid password on a non-admin account is a
    /// Forbidden, not an Unauthorized, so the UI can show the distinct
    /// message.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(Error::Unauthorized)?;

        let argon2 = Argon2::default();
        let parsed_hash =
            PasswordHash::new(&user.password).map_err(|_| Error::InternalServerError)?;
        argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| Error::Unauthorized)?;

        if user.role != UserRole::Admin {
            return Err(Error::Forbidden(
                "This account does not have admin privileges".to_string(),
            ));
        }

        let token = self.generate_token(user.id, self.jwt_maxage)?;
        Ok((user, token))
    }

    fn generate_token(&self, user_id: Uuid, expires_in_minutes: i64) -> Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(expires_in_minutes)).timestamp() as usize;
        let iat = now.timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            iat,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|_| Error::InternalServerError)
    }

    pub fn decode_token<T: Into<String>>(&self, token: T) -> Result<Uuid> {
        let decoded = decode::<Claims>(
            &token.into(),
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| Error::Unauthorized)?;

        Uuid::parse_str(&decoded.claims.sub).map_err(|_| Error::Unauthorized)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        let user = self.user_repo.find_by_id(user_id).await?;
        user.ok_or(Error::NotFound)
    }
}
