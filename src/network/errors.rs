use thiserror::Error;

// * Unified Error type for the transport layer.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

// * Login failed or was rejected by the panel.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Panel rejected login: {0}")]
    Rejected(String),

    #[error("Login request failed: {0}")]
    Network(#[from] NetworkError),
}

// * Inbound list could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Inbound list request failed: {0}")]
    Network(#[from] NetworkError),
}
