use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod error;
mod jwt;
mod listing;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod seed;
mod state;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;

use crate::{config::AppConfig, jwt::JwtService, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting vacations service");

    let config = AppConfig::load()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let secret = match config.jwt_secret.as_deref() {
        Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
        _ => {
            warn!("VACATIONS_JWT_SECRET is not set, issued tokens will not survive a restart");
            rand::random::<[u8; 32]>().to_vec()
        }
    };
    let jwt_service = JwtService::new(&secret, config.token_ttl_seconds);
    info!("Identity tokens valid for {} seconds", jwt_service.token_ttl());

    if !config.allow_header_identity {
        info!("Header identity disabled, only bearer tokens identify callers");
    }

    let app_state = AppState::new(pool, jwt_service, config.allow_header_identity);

    if let Some((email, password)) = config.admin_credentials() {
        seed::bootstrap_admin(&app_state.user_repository, email, password).await?;
    }

    if config.seed_sample_data {
        seed::seed_sample_vacations(&app_state.vacation_repository, Utc::now().date_naive())
            .await?;
    }

    info!("Vacations service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state, &config);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Vacations service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Vacations service stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
