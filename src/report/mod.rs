// * Report: inbound traffic model and markdown rendering

pub mod formatter;
pub mod model;

pub use formatter::{format_bytes, format_report};
pub use model::{InboundRecord, TrafficReport};
