// * Report data model: inbound records parsed from the panel body, in panel order

use crate::config::constants::{REPORT_HEADER, UNNAMED_INBOUND};
use crate::network::envelope;
use crate::report::formatter::format_bytes;
use serde_json::Value;
use std::fmt::Write;
use tracing::warn;

/// One proxy inbound and its byte counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRecord {
    pub remark: String,
    /// Bytes sent
    pub up: u64,
    /// Bytes received
    pub down: u64,
}

impl InboundRecord {
    pub fn new(remark: impl Into<String>, up: u64, down: u64) -> Self {
        Self {
            remark: remark.into(),
            up,
            down,
        }
    }

    pub fn total(&self) -> u64 {
        self.up.saturating_add(self.down)
    }

    /// Reads one entry of the panel's `obj` list.
    ///
    /// A missing or empty remark becomes the placeholder; missing counters are 0.
    pub fn from_json(value: &Value) -> Self {
        let remark = value
            .get("remark")
            .and_then(Value::as_str)
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(UNNAMED_INBOUND);

        Self {
            remark: remark.to_string(),
            up: counter(value, "up", remark),
            down: counter(value, "down", remark),
        }
    }
}

// * Non-negative byte counter; anything else is logged and read as 0
fn counter(value: &Value, field: &str, remark: &str) -> u64 {
    match value.get(field) {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(bytes) => bytes,
            None => match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 => f as u64,
                _ => {
                    warn!(remark, field, value = %n, "Counter is negative, reading as 0");
                    0
                }
            },
        },
        Some(other) => {
            warn!(remark, field, value = %other, "Counter is not a number, reading as 0");
            0
        }
    }
}

/// Ordered per-inbound traffic, ready to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrafficReport {
    pub records: Vec<InboundRecord>,
}

impl TrafficReport {
    /// Builds a report from a panel body.
    ///
    /// Returns `None` unless `success` is truthy and `obj` is a list.
    pub fn from_body(body: &Value) -> Option<Self> {
        if !envelope::success_is_truthy(body) {
            return None;
        }
        let inbounds = body.get("obj")?.as_array()?;

        Some(Self {
            records: inbounds.iter().map(InboundRecord::from_json).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Markdown text: header line, then one block per inbound.
    pub fn render(&self) -> String {
        let mut out = String::from(REPORT_HEADER);
        for record in &self.records {
            // * Writing to a String cannot fail
            let _ = write!(
                out,
                "\n**👤 {}**\n> ⬆️ {} | ⬇️ {} | 📈 {}\n",
                record.remark,
                format_bytes(record.up),
                format_bytes(record.down),
                format_bytes(record.total())
            );
        }
        out
    }
}
