use std::{env, sync::Arc};

use config::Config;
use dotenv::dotenv;
use repositories::PostgresRepo;
use routes::create_router;
use services::{auth::AuthService, blog::BlogService, images::ImageService};
use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub use self::errors::{Error, Result};

mod config;
mod content;
mod errors;
mod handlers;
mod mail;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth_service: AuthService,
    pub blog_service: BlogService,
    pub image_service: ImageService,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("connected to the database");
            pool
        }
        Err(err) => {
            error!("failed to connect to the database: {err:?}");
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        error!("failed to run migrations: {err:?}");
        std::process::exit(1);
    }

    let repo = PostgresRepo::new(pool);

    let image_service = ImageService::new(&config.upload_dir);
    if let Err(err) = image_service.ensure_dir().await {
        error!("failed to prepare upload directory: {err:?}");
        std::process::exit(1);
    }

    let app_state = AppState {
        auth_service: AuthService::new(
            Arc::new(repo.clone()),
            config.jwt_secret.clone(),
            config.jwt_maxage,
        ),
        blog_service: BlogService::new(Arc::new(repo)),
        image_service,
        config,
    };

    let app = create_router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!(
        "[::]:{}",
        env::var("PORT").unwrap_or_else(|_| "8080".to_string())
    ))
    .await
    .unwrap();
    info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
