mod models;
mod service;
mod config;
mod dtos;
mod error;
mod db;
mod utils;
mod middleware;
mod handler;
mod routes;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE}, HeaderValue, Method};
use config::Config;
use db::db::DBClient;
use dotenv::dotenv;
use routes::create_router;
use service::{
    blob_store::LocalBlobStore,
    catalog::Catalog,
    image_pipeline::ImagePipeline,
    media::MediaService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub catalog: Arc<Catalog>,
    pub media: Arc<MediaService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let media = MediaService::new(
            ImagePipeline::from_config(&config),
            Arc::new(LocalBlobStore::new(&config.media_dir, config.media_base_url.clone())),
        );

        AppState {
            db_client: Arc::new(db_client),
            catalog: Arc::new(Catalog::new(Duration::from_secs(config.catalog_ttl_secs))),
            media: Arc::new(media),
            env: config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::init().context("invalid configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let pool = match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await
    {
        Ok(pool) => {
            tracing::info!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            tracing::error!("🔥 Failed to connect to the database: {:?}", err);
            return Err(err).context("database connection failed");
        }
    };

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    tokio::fs::create_dir_all(&config.media_dir)
        .await
        .with_context(|| format!("cannot create media dir {}", config.media_dir.display()))?;

    let allowed_origins = config
        .allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("ALLOWED_ORIGINS contains an invalid origin")?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app_state = Arc::new(AppState::new(DBClient::new(pool), config.clone()));

    let app = create_router(app_state).layer(cors);

    tracing::info!(
        "🚀 Server is running on http://localhost:{} ({:?} catalog)",
        config.port,
        config.catalog_variant
    );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .with_context(|| format!("cannot bind port {}", config.port))?;

    axum::serve(listener, app).await?;

    Ok(())
}
