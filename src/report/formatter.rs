use crate::config::constants::{BYTE_UNITS, REPORT_FAILURE_TEXT};
use crate::report::model::TrafficReport;
use serde_json::Value;
use tracing::{error, info};

/// Scales a byte count into the largest unit that keeps it below 1024.
///
/// Always two decimals and a space before the unit; values past 1024 TB stay in TB.
///
/// ```
/// use xui_traffic::report::format_bytes;
///
/// assert_eq!(format_bytes(0), "0.00 B");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// ```
pub fn format_bytes(size: u64) -> String {
    let mut value = size as f64;
    let mut idx = 0;
    while value >= 1024.0 && idx < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    format!("{:.2} {}", value, BYTE_UNITS[idx])
}

/// Turns a raw inbound list body into report text.
///
/// Never fails: a body without a truthy `success` or without an `obj` list
/// yields the fixed failure text, which is still sent onward.
pub fn format_report(body: &Value) -> String {
    match TrafficReport::from_body(body) {
        Some(report) => {
            info!(inbounds = report.len(), "Traffic data processed");
            report.render()
        }
        None => {
            error!("Traffic data missing or malformed");
            REPORT_FAILURE_TEXT.to_string()
        }
    }
}
