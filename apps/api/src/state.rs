use crate::config::Config;
use crate::intake::service::IntakeService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Holds the email and SMS gateways behind trait objects, so tests can swap in fakes.
    pub intake: IntakeService,
}
