// * Session Provider - hands out an authenticated panel session
// * Either rebuilt from cookies saved by an earlier run, or produced by a fresh login

use crate::config::store::now_epoch_secs;
use crate::config::{ConfigStore, Settings, TransportOptions};
use crate::network::client::{build_client, read_json, send_with_retries, PanelEndpoints};
use crate::network::envelope;
use crate::network::errors::{AuthenticationError, NetworkError};
use crate::network::identity::IdentityProfile;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How a [`PanelSession`] came to be.
///
/// A `Reused` session is unverified until its first request; a failed
/// `Reused` request is followed by exactly one `FreshLogin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOrigin {
    Reused,
    FreshLogin,
}

impl std::fmt::Display for SessionOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionOrigin::Reused => write!(f, "reused"),
            SessionOrigin::FreshLogin => write!(f, "fresh_login"),
        }
    }
}

/// An HTTP client bound to its own cookie jar. Dropped at the end of the run.
pub struct PanelSession {
    client: Client,
    jar: Arc<Jar>,
    origin: SessionOrigin,
}

impl PanelSession {
    fn new(
        jar: Arc<Jar>,
        options: &TransportOptions,
        origin: SessionOrigin,
    ) -> Result<Self, NetworkError> {
        let client = build_client(Some(Arc::clone(&jar)), options)?;
        Ok(Self { client, jar, origin })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    // * Cookies the jar would send to the inbound list endpoint, as name -> value
    pub fn cookie_map(&self, endpoints: &PanelEndpoints) -> BTreeMap<String, String> {
        let Some(header) = self.jar.cookies(&endpoints.inbound_list) else {
            return BTreeMap::new();
        };
        let Ok(header) = header.to_str() else {
            return BTreeMap::new();
        };

        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

/// Produces sessions for one run. Constructed once from the loaded [`Settings`].
pub struct SessionProvider {
    endpoints: PanelEndpoints,
    identity: IdentityProfile,
    transport: TransportOptions,
    username: String,
    password: String,
    saved_cookies: BTreeMap<String, String>,
    saved_cookie_age: Option<Duration>,
    store: ConfigStore,
}

impl SessionProvider {
    pub fn new(settings: &Settings, store: ConfigStore) -> Result<Self, NetworkError> {
        Ok(Self {
            endpoints: PanelEndpoints::new(&settings.base_url)?,
            identity: IdentityProfile::generate_chrome_135(),
            transport: settings.transport(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            saved_cookies: settings.cookies.clone(),
            saved_cookie_age: settings.cookie_age(now_epoch_secs()),
            store,
        })
    }

    pub fn endpoints(&self) -> &PanelEndpoints {
        &self.endpoints
    }

    pub fn identity(&self) -> &IdentityProfile {
        &self.identity
    }

    pub fn transport(&self) -> &TransportOptions {
        &self.transport
    }

    /// Rebuilds a session from saved cookies without contacting the panel.
    ///
    /// Returns `None` when no cookies were saved. Validity is only known
    /// once the caller's first request comes back.
    pub fn try_reuse(&self) -> Option<PanelSession> {
        if self.saved_cookies.is_empty() {
            warn!("No saved cookies, login required");
            return None;
        }

        let jar = Arc::new(Jar::default());
        for (name, value) in &self.saved_cookies {
            jar.add_cookie_str(&format!("{}={}; Path=/", name, value), &self.endpoints.base);
        }

        debug!(
            cookie_names = ?self.saved_cookies.keys().collect::<Vec<_>>(),
            age_secs = ?self.saved_cookie_age.map(|age| age.as_secs()),
            "Loaded saved cookies"
        );

        match PanelSession::new(jar, &self.transport, SessionOrigin::Reused) {
            Ok(session) => {
                info!("Rebuilt session from saved cookies");
                Some(session)
            }
            Err(e) => {
                error!(error = %e, "Failed to build session from saved cookies");
                None
            }
        }
    }

    /// Logs in with username/password and saves the issued cookies.
    ///
    /// Saving is best-effort: a write failure is logged and the session
    /// is still returned.
    pub async fn login(&self) -> Result<PanelSession, AuthenticationError> {
        info!(url = %self.endpoints.login, "Logging in to panel");

        match self.attempt_login().await {
            Ok(session) => {
                info!("Login succeeded");
                self.save_cookies(&session);
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Err(e)
            }
        }
    }

    async fn attempt_login(&self) -> Result<PanelSession, AuthenticationError> {
        let session = PanelSession::new(
            Arc::new(Jar::default()),
            &self.transport,
            SessionOrigin::FreshLogin,
        )?;

        let request = session
            .client
            .post(self.endpoints.login.clone())
            .headers(self.identity.login_headers()?)
            .form(&[("username", self.username.as_str()), ("password", self.password.as_str())]);

        let response = send_with_retries(request, self.transport.max_retries).await?;
        let body = read_json(response).await?;

        if !envelope::success_is_truthy(&body) {
            let msg = envelope::message(&body).unwrap_or("unknown error");
            return Err(AuthenticationError::Rejected(msg.to_string()));
        }

        Ok(session)
    }

    fn save_cookies(&self, session: &PanelSession) {
        let cookies = session.cookie_map(&self.endpoints);
        if cookies.is_empty() {
            warn!("Panel issued no cookies on login, nothing to save");
            return;
        }

        if let Err(e) = self.store.persist_session(&cookies, now_epoch_secs()) {
            warn!(error = %e, "Failed to save session cookies, next run will log in again");
        }
    }
}
