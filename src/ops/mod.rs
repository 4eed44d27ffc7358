// * Operations: logging setup and report delivery

pub mod notifier;
pub mod telemetry;

// * Re-exports for convenient access
pub use notifier::{NotificationError, WebhookNotifier, WebhookPayload, WebhookResponse};
pub use telemetry::{init_tracing, init_tracing_with_level, LogFormat};
