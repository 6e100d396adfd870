//! Event Manager entry-point: loads configuration, prepares storage, and
//! serves the account API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use event_manager::domain::AccountPolicy;
use event_manager::inbound::http::health::HealthState;
use event_manager::inbound::http::session_config::fingerprint::key_fingerprint;
use event_manager::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_toggles,
};
use event_manager::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use event_manager::outbound::smtp::SmtpEmailNotifier;
use event_manager::settings::AppSettings;
use server::{ServerConfig, create_server};

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url() else {
        return Ok(None);
    };
    let applied = run_pending_migrations(database_url)
        .await
        .map_err(std::io::Error::other)?;
    info!(applied, "schema ready");
    let max_size = settings
        .db_max_connections()
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(std::io::Error::other)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let SessionSettings {
        key,
        cookie_secure,
        same_site,
    } = session_settings_from_toggles(
        &settings.session_toggles(),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&key),
        cookie_secure,
        same_site = ?same_site,
        "session key loaded"
    );

    let policy = AccountPolicy {
        max_login_attempts: settings
            .max_login_attempts()
            .map_err(std::io::Error::other)?,
        public_base_url: settings.server_base_url().map_err(std::io::Error::other)?,
    };
    let bind_addr = settings.bind_addr();
    let mut config = ServerConfig::new(key, cookie_secure, same_site, bind_addr, policy);
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }
    if let Some(smtp) = settings.smtp().map_err(std::io::Error::other)? {
        info!(host = %smtp.host, port = smtp.port, "SMTP relay configured");
        let notifier = SmtpEmailNotifier::new(smtp).map_err(std::io::Error::other)?;
        config = config.with_notifier(Arc::new(notifier));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "event manager listening");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
