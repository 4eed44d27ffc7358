// * Orchestrator - one linear run: load config -> fetch -> format -> preview -> send
// * Stops at the first failure; there is no partial-success state

use crate::config::{ConfigError, ConfigStore};
use crate::network::{
    AuthenticationError, FetchError, NetworkError, SessionOrigin, SessionProvider, TrafficFetcher,
};
use crate::ops::notifier::{NotificationError, WebhookNotifier};
use crate::report::format_report;
use thiserror::Error;
use tracing::{error, info};

// * Width of the `=` rules around the report preview
const PREVIEW_RULE_WIDTH: usize = 50;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to set up HTTP clients: {0}")]
    Setup(#[source] NetworkError),

    #[error("Authentication error: {0}")]
    Authentication(#[source] AuthenticationError),

    #[error("Fetch error: {0}")]
    Fetch(#[source] NetworkError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

impl From<FetchError> for RunError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Authentication(e) => RunError::Authentication(e),
            FetchError::Network(e) => RunError::Fetch(e),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub origin: SessionOrigin,
    pub report: String,
}

/// Executes one full report run against the config document in `store`.
///
/// Every failure is logged here before it is returned, so callers only
/// need to map the result to an exit status.
pub async fn run(store: &ConfigStore) -> Result<RunSummary, RunError> {
    info!("Starting 3x-ui traffic report run");

    let settings = store.load().map_err(|e| {
        error!(error = %e, "Cannot load config");
        RunError::from(e)
    })?;

    let transport = settings.transport();
    let sessions = SessionProvider::new(&settings, store.clone()).map_err(RunError::Setup)?;
    let notifier =
        WebhookNotifier::new(&settings.webhook_url, &transport).map_err(RunError::Setup)?;
    let fetcher = TrafficFetcher::new(sessions);

    let outcome = fetcher.fetch().await.map_err(|e| {
        error!(error = %e, "Could not retrieve inbound list");
        RunError::from(e)
    })?;
    info!(origin = %outcome.origin, "Inbound list retrieved");

    let report = format_report(&outcome.body);
    preview(&report);

    notifier.deliver(&report).await.map_err(|e| {
        error!(error = %e, "Failed to push traffic report to webhook");
        RunError::from(e)
    })?;
    info!("Traffic report pushed to webhook");

    Ok(RunSummary {
        origin: outcome.origin,
        report,
    })
}

fn preview(report: &str) {
    let rule = "=".repeat(PREVIEW_RULE_WIDTH);
    info!("Report preview:");
    info!("{}", rule);
    info!("{}", report);
    info!("{}", rule);
}
