use crate::config::constants::DEFAULT_CONFIG_FILE;
use crate::ops::LogFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Pulls per-inbound traffic from a 3x-ui panel and pushes a report to a DingTalk robot.
#[derive(Parser, Debug)]
#[command(name = "xui-traffic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON config document (credentials, webhook, cached cookies).
    #[arg(short, long, env = "XUI_TRAFFIC_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Default log level; RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormatArg::Json)]
    pub log_format: LogFormatArg,

    /// Validate the config document and exit without contacting the panel.
    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["xui-traffic"]).unwrap();
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LogFormatArg::Json);
        assert!(!cli.validate);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "xui-traffic",
            "--config",
            "/etc/xui/config.json",
            "--log-format",
            "pretty",
            "--validate",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/xui/config.json"));
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Pretty);
        assert!(cli.validate);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["xui-traffic", "--log-format", "xml"]).is_err());
    }
}
