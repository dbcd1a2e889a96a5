pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::plan::PlanRequest;
use crate::core::StaticRateProvider;
use crate::core::config::{AppConfig, Secrets};
use crate::providers::goldapi::GoldApiProvider;
use crate::providers::yahoo_finance::YahooIndexProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Plan(PlanRequest),
    Gold,
    Rates,
    Index { rows: usize },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    run_command_with(command, &config, &Secrets::from_env()).await
}

/// Runs a command against an already loaded config and injected secrets.
pub async fn run_command_with(
    command: AppCommand,
    config: &AppConfig,
    secrets: &Secrets,
) -> Result<()> {
    info!("Investment planner starting...");
    debug!("Loaded config: {config:#?}");

    let gold_config = &config.providers.goldapi;
    let gold_provider = GoldApiProvider::new(
        &gold_config.base_url,
        &gold_config.metal,
        &config.currency,
        secrets.goldapi_token.clone(),
        config.timeout(),
    );

    let yahoo_config = &config.providers.yahoo;
    let index_provider = YahooIndexProvider::new(
        &yahoo_config.base_url,
        &yahoo_config.index_symbol,
        config.timeout(),
    );

    let rate_provider = StaticRateProvider::new(config.fd_rates.clone());

    match command {
        AppCommand::Plan(request) => {
            cli::plan::run(
                config,
                &gold_provider,
                &rate_provider,
                &index_provider,
                &request,
            )
            .await
        }
        AppCommand::Gold => cli::gold::run(&gold_provider).await,
        AppCommand::Rates => {
            cli::rates::run(&rate_provider);
            Ok(())
        }
        AppCommand::Index { rows } => {
            cli::index::run(
                &index_provider,
                &yahoo_config.index_name,
                config.history_window_days,
                rows,
            )
            .await
        }
    }
}
