use crate::network::client::{read_json, send_with_retries};
use crate::network::envelope;
use crate::network::errors::{FetchError, NetworkError};
use crate::network::session::{PanelSession, SessionOrigin, SessionProvider};
use serde_json::Value;
use tracing::{debug, info, warn};

// * Raw inbound list body plus the session tier that produced it.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub body: Value,
    pub origin: SessionOrigin,
}

// * Retrieves the inbound list: saved session first, one fresh login as fallback.
// * At most one request per tier; no retry loop above the transport's connect retries.
pub struct TrafficFetcher {
    sessions: SessionProvider,
}

impl TrafficFetcher {
    pub fn new(sessions: SessionProvider) -> Self {
        Self { sessions }
    }

    pub async fn fetch(&self) -> Result<FetchOutcome, FetchError> {
        // --- TIER 1: saved cookies ---
        if let Some(session) = self.sessions.try_reuse() {
            info!("Requesting inbound list with saved cookies");
            match self.request_inbound_list(&session).await {
                Ok(body) if envelope::success_is_true(&body) => {
                    info!("Saved cookies accepted");
                    return Ok(FetchOutcome {
                        body,
                        origin: session.origin(),
                    });
                }
                Ok(body) => {
                    warn!(
                        msg = envelope::message(&body).unwrap_or_default(),
                        "Saved cookies expired, logging in again"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Request with saved cookies failed, logging in again");
                }
            }
        }

        // --- TIER 2: fresh login ---
        let session = self.sessions.login().await.map_err(|e| {
            debug!(error = %e, "Unable to obtain a valid session");
            FetchError::from(e)
        })?;

        info!("Requesting inbound list after fresh login");
        let body = self.request_inbound_list(&session).await.map_err(|e| {
            debug!(error = %e, "Inbound list request failed after fresh login");
            FetchError::from(e)
        })?;

        // * Success flag is left for the formatter; a second login would not help
        info!("Inbound list retrieved after fresh login");
        Ok(FetchOutcome {
            body,
            origin: session.origin(),
        })
    }

    async fn request_inbound_list(&self, session: &PanelSession) -> Result<Value, NetworkError> {
        let endpoints = self.sessions.endpoints();
        let headers = self.sessions.identity().inbound_list_headers(endpoints)?;

        let request = session
            .client()
            .post(endpoints.inbound_list.clone())
            .headers(headers);

        let response = send_with_retries(request, self.sessions.transport().max_retries).await?;
        read_json(response).await
    }
}
