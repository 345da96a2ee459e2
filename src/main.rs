use anyhow::Context;
use clap::Parser;
use log_to_json::adapters::clipboard::SystemClipboard;
use log_to_json::adapters::loader::{loader_for, spawn_loader};
use log_to_json::config::cli::read_input;
use log_to_json::domain::ports::ConfigProvider;
use log_to_json::utils::logger;
use log_to_json::{CliConfig, ErrorKind, ParseOrchestrator, SharedSlot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting log-to-json");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    let Some(text) = read_input(cli.text.as_deref()).context("failed to read input")? else {
        eprintln!("Usage: log-to-json <text>  (or pipe text on stdin)");
        std::process::exit(2);
    };

    // The capability arrives out of band; the orchestrator only watches the slot.
    let slot = SharedSlot::new();
    let loader = spawn_loader(
        loader_for(config.capability_source()),
        slot.clone(),
        config.retry_interval(),
    );
    let orchestrator = ParseOrchestrator::from_config(slot, &config);

    let result = orchestrator.parse(text).await;
    loader.abort();

    match result {
        Ok(output) => {
            print!("{}", output);
            if cli.copy && orchestrator.copy_output(&SystemClipboard) {
                eprintln!("📋 Copied to clipboard");
            }
            Ok(())
        }
        Err(state) => {
            eprintln!("❌ {}", state);
            let exit_code = match state.kind {
                ErrorKind::CapabilityUnavailable => 3,
                ErrorKind::InvocationFailure | ErrorKind::FormatFailure => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
