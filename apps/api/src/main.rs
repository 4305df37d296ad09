mod config;
mod errors;
mod gateways;
mod intake;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gateways::{ResendEmailGateway, RingCentralSmsGateway};
use crate::intake::service::IntakeService;
use crate::routes::{build_router, SUBMIT_APPLICATION_PATH};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; only malformed values are fatal
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake API v{}", env!("CARGO_PKG_VERSION"));

    if config.email.api_key.is_none() || config.email.from_domain.is_none() {
        warn!("Email gateway credentials missing; email notifications will fail");
    }
    if config.sms.client_id.is_none()
        || config.sms.client_secret.is_none()
        || config.sms.jwt.is_none()
        || config.sms.from_number.is_none()
    {
        warn!("SMS gateway credentials missing; SMS notifications will fail");
    }

    let email = Arc::new(ResendEmailGateway::new(config.email.clone())?);
    let sms = Arc::new(RingCentralSmsGateway::new(config.sms.clone())?);
    let intake = IntakeService::new(email, sms, config.email.firm_recipient.clone());
    info!("Notification gateways initialized");

    let state = AppState {
        config: config.clone(),
        intake,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}, accepting applications at {SUBMIT_APPLICATION_PATH}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
