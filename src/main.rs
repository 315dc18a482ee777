use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ebay_search::{
    api::FindingClient,
    config::{Config, SearchArgs},
    pipeline,
};

#[tokio::main]
async fn main() {
    let args = SearchArgs::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();

    let client = match FindingClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    match pipeline::run(&config, &args, &client).await {
        Ok(count) => info!("Done: {} listings", count),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
