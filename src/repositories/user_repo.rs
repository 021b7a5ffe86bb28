use async_trait::async_trait;
use uuid::Uuid;

use crate::{models::users::User, Result};

use super::PostgresRepo;

/// Accounts are provisioned out of band (migration/seed); the
/// application only ever reads them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;
}

const USER_COLUMNS: &str = "id, name, email, password, role, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
