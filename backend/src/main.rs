//! Backend entry-point: loads settings, picks the persistence adapters and
//! serves the REST API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use circle::inbound::http::health::HealthState;
use circle::inbound::http::session_config::{BuildMode, session_settings};
use circle::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use circle::settings::AppSettings;
use ortho_config::OrthoConfig;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings(&settings.session_options(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        SameSite::Lax,
        settings.bind_address(),
    );

    match settings.database_url() {
        Some(url) => {
            if settings.run_migrations() {
                run_pending_migrations(url)
                    .await
                    .map_err(std::io::Error::other)?;
            }
            let pool_config = PoolConfig::new(url).with_max_size(settings.db_max_connections());
            let pool = DbPool::new(pool_config)
                .await
                .map_err(std::io::Error::other)?;
            info!(
                max_connections = settings.db_max_connections(),
                "using PostgreSQL persistence"
            );
            config = config.with_db_pool(pool);
        }
        None => warn!("no database URL configured; data is kept in memory"),
    }

    let (host, port) = settings.bind_address();
    info!(%host, port, "starting HTTP server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
