// * Configuration Constants
// * Central location for transport tuning, endpoints and report wording

// * Connect timeout in seconds
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

// * Total request timeout in seconds (connect + response)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// * Connection-level retries applied beneath every request (no backoff)
pub const MAX_RETRIES: u32 = 3;

// * Idle connections kept per host
pub const POOL_MAX_IDLE_PER_HOST: usize = 10;

// * Default config document, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

// * Panel endpoints, appended to base_url
pub const LOGIN_PATH: &str = "/login";
pub const INBOUND_LIST_PATH: &str = "/panel/inbound/list";
pub const INBOUNDS_PAGE_PATH: &str = "/panel/inbounds";

// * Report wording
pub const REPORT_TITLE: &str = "Traffic Report";
pub const REPORT_HEADER: &str = "### 📊 3x-ui Traffic Report\n";
pub const UNNAMED_INBOUND: &str = "Unnamed inbound";
pub const REPORT_FAILURE_TEXT: &str = "Failed to fetch traffic data or data format is invalid";

// * Byte units, smallest first
pub const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
