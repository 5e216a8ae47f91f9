use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_graph_service::config::{LogFormat, StorageBackend};
use social_graph_service::handlers::{self, AppState};
use social_graph_service::repository::{
    InMemorySocialGraphRepository, PostgresSocialGraphRepository, SocialGraphRepository,
};
use social_graph_service::{db, Config};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.format);

    tracing::info!("Starting social-graph-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let repo: Arc<dyn SocialGraphRepository> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database)
                .await
                .context("Failed to create database pool")?;
            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Arc::new(PostgresSocialGraphRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemorySocialGraphRepository::new())
        }
    };

    let state = web::Data::new(AppState::new(repo));
    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(bind_address)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    tracing::info!("social-graph-service shut down");
    Ok(())
}
