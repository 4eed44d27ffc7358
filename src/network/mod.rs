// * Panel-facing network layer: transport, browser identity, session handling and the fetch fallback

pub mod client;
pub mod envelope;
pub mod errors;
pub mod fetcher;
pub mod identity;
pub mod session;

// * Re-exports for convenient access
pub use client::PanelEndpoints;
pub use errors::{AuthenticationError, FetchError, NetworkError};
pub use fetcher::{FetchOutcome, TrafficFetcher};
pub use identity::IdentityProfile;
pub use session::{PanelSession, SessionOrigin, SessionProvider};
