use sqlx::PgPool;

pub mod post_repo;
pub mod user_repo;

/// Postgres-backed implementation of the repository traits. Constructed
/// once in `main` and handed to the services; tests swap in an in-memory
/// fake instead.
#[derive(Clone)]
pub struct PostgresRepo {
    pool: PgPool,
}

impl PostgresRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
