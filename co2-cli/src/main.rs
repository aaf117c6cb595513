//! CO2 CLI - Command line tool for the CO2 metrics API.

use clap::Parser;
use co2_core::client::ApiClient;

#[derive(Parser)]
#[command(
    name = "co2-cli",
    version,
    about = "Software project carbon footprint toolkit"
)]
struct Cli {
    /// Base URL of the metrics API
    #[arg(long, env = "CO2_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: co2_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api_url)?;
    log::debug!("Using API at {}", client.base_url());
    co2_cmd::run(cli.command, &client).await
}
