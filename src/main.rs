use clap::Parser;
use std::process::ExitCode;
use xui_traffic::cli::Cli;
use xui_traffic::config::ConfigStore;
use xui_traffic::{engine, ops};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // * Initialize Telemetry
    ops::init_tracing_with_level(&cli.log_level, cli.log_format.into());

    let store = ConfigStore::new(&cli.config);

    if cli.validate {
        return match store.load() {
            Ok(settings) => {
                tracing::info!(base_url = %settings.base_url, "Config is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Config is invalid");
                ExitCode::FAILURE
            }
        };
    }

    match engine::run(&store).await {
        Ok(summary) => {
            tracing::info!(origin = %summary.origin, "Traffic report delivered");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Traffic report run failed");
            ExitCode::FAILURE
        }
    }
}
