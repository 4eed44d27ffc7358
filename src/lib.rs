//! 3x-ui traffic reporter.
//!
//! Logs in to a 3x-ui panel (reusing cached session cookies when they still
//! work), reads per-inbound upload/download counters, renders them as a
//! markdown report and posts it to a DingTalk robot webhook.

pub mod cli;
pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
pub mod report;
