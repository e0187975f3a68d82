use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;

use pushkind_inventory::cli::{Cli, run};
use pushkind_inventory::models::config::DashboardConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let config = match DashboardConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
