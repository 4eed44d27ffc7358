use crate::config::constants::{
    INBOUNDS_PAGE_PATH, INBOUND_LIST_PATH, LOGIN_PATH, POOL_MAX_IDLE_PER_HOST,
};
use crate::config::TransportOptions;
use crate::network::errors::NetworkError;
use reqwest::cookie::Jar;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

// * Longest response snippet echoed into debug logs
const BODY_LOG_LIMIT: usize = 512;

// * Resolved panel URLs, built once per run from base_url.
#[derive(Debug, Clone)]
pub struct PanelEndpoints {
    pub base_url: String,
    pub base: Url,
    pub login: Url,
    pub inbound_list: Url,
    pub inbounds_page: Url,
}

impl PanelEndpoints {
    // * @param base_url - panel root without trailing slash (may carry a secret path)
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        let base_url = base_url.trim_end_matches('/');
        Ok(Self {
            base_url: base_url.to_string(),
            base: Url::parse(base_url)?,
            login: Url::parse(&format!("{}{}", base_url, LOGIN_PATH))?,
            inbound_list: Url::parse(&format!("{}{}", base_url, INBOUND_LIST_PATH))?,
            inbounds_page: Url::parse(&format!("{}{}", base_url, INBOUNDS_PAGE_PATH))?,
        })
    }
}

// * Builds an HTTP client with the run's timeouts, pool size and TLS policy.
// * @param jar - cookie jar to bind; None for clients that never carry a session
pub fn build_client(
    jar: Option<Arc<Jar>>,
    options: &TransportOptions,
) -> Result<Client, NetworkError> {
    let mut builder = Client::builder()
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .danger_accept_invalid_certs(!options.verify_ssl);

    if let Some(jar) = jar {
        builder = builder.cookie_provider(jar);
    }

    Ok(builder.build()?)
}

// * Sends a request, re-sending it on connect failures up to `max_retries` times.
// * No backoff; status codes and post-connect failures are returned as-is.
pub async fn send_with_retries(
    request: RequestBuilder,
    max_retries: u32,
) -> Result<Response, NetworkError> {
    let mut attempt = 0;
    loop {
        let Some(current) = request.try_clone() else {
            // * Streaming bodies cannot be replayed
            return Ok(request.send().await?);
        };

        match current.send().await {
            Ok(resp) => return Ok(resp),
            Err(e) if e.is_connect() && attempt < max_retries => {
                attempt += 1;
                warn!(attempt, max_retries, error = %e, "Connection failed, retrying");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

// * Requires HTTP 200 and a JSON body.
pub async fn read_json(response: Response) -> Result<Value, NetworkError> {
    let status = response.status();
    let url = response.url().clone();

    if status != StatusCode::OK {
        if let Ok(body) = response.text().await {
            debug!(
                %url,
                status = status.as_u16(),
                body = %truncate(&body),
                "Non-200 response body"
            );
        }
        return Err(NetworkError::Status(status.as_u16()));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        debug!(%url, body = %truncate(&body), "Response is not JSON");
        NetworkError::Decode(e)
    })
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(BODY_LOG_LIMIT) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
