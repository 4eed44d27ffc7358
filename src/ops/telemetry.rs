// * Telemetry - structured logging setup for the binary
// * JSON lines by default, pretty output for interactive use; always on stderr

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, for cron / log shippers
    #[default]
    Json,
    /// Human-readable multi-line output
    Pretty,
}

/// Builds the filter: `RUST_LOG` wins, otherwise `level`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initializes the tracing subscriber with JSON formatting at `info`
///
/// # Example
/// ```ignore
/// use xui_traffic::ops::telemetry;
///
/// telemetry::init_tracing();
/// tracing::info!(url = "https://panel.example.com", "Logging in");
/// ```
pub fn init_tracing() {
    init_tracing_with_level("info", LogFormat::Json);
}

/// Initializes tracing with a custom level and output style.
///
/// Returns quietly if a global subscriber is already installed.
pub fn init_tracing_with_level(level: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
