//! Backend entry-point: wires the REST endpoints, stores and OpenAPI docs.

mod server;

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pantry_backend::domain::LowLevelNotifier;
use pantry_backend::domain::ports::NotificationTransport;
use pantry_backend::inbound::http::health::HealthState;
use pantry_backend::outbound::StoreAdapters;
use pantry_backend::outbound::notification::{
    LogNotificationTransport, WebhookNotificationTransport,
};
use pantry_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pantry_backend::sample_data::{SampleDataSettings, seed_sample_data_on_startup};
use pantry_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let sample_settings = SampleDataSettings::load_from_iter([OsString::from("pantry-backend")])
        .map_err(|err| eyre!("failed to load sample data settings: {err}"))?;

    let stores = build_stores(&settings).await?;
    seed_sample_data_on_startup(&sample_settings, &stores)
        .await
        .wrap_err("sample data seeding failed")?;

    let notifier = build_notifier(&settings)?;
    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(bind_addr, stores, notifier)
        .with_token_lifetimes(settings.token_lifetimes()?);

    let health_state = web::Data::new(HealthState::new(config.store_backend()));
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await?;
    Ok(())
}

async fn build_stores(settings: &AppSettings) -> Result<StoreAdapters> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database configured; using in-memory stores");
        return Ok(StoreAdapters::in_memory());
    };
    run_pending_migrations(database_url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("database pool construction failed")?;
    Ok(StoreAdapters::postgres(&pool))
}

fn build_notifier(settings: &AppSettings) -> Result<LowLevelNotifier> {
    let timeout = settings.notification_timeout()?;
    let transport: Arc<dyn NotificationTransport> = match settings.notification_webhook()? {
        Some(endpoint) => {
            info!(%endpoint, "running-low notifications use webhook");
            Arc::new(
                WebhookNotificationTransport::new(endpoint, timeout)
                    .wrap_err("webhook client construction failed")?,
            )
        }
        None => Arc::new(LogNotificationTransport),
    };
    Ok(LowLevelNotifier::new(
        transport,
        settings.notification_sender(),
        settings.notification_recipient(),
        timeout,
    ))
}
