use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{AppError, Result};

pub const FINDING_API_URL: &str = "https://svcs.ebay.com/services/search/FindingService/v1";
pub const GLOBAL_ID: &str = "EBAY-GB";

/// Country every search is restricted to (`LocatedIn` item filter).
pub const LOCATED_IN: &str = "GB";

pub const DEFAULT_MAX_PRICE: &str = "999.99";

/// Entries requested per page once pagination kicks in.
pub const PAGE_SIZE: u32 = 100;

/// Utility to search eBay for --keywords and return the items in a markdown file.
#[derive(Parser, Debug, Clone)]
#[command(name = "ebay-search")]
#[command(version)]
pub struct SearchArgs {
    /// Keywords to search eBay for.
    #[arg(short, long)]
    pub keywords: String,

    /// Maximum price willing to pay for the item.
    #[arg(short = 'm', long = "maxprice", default_value = DEFAULT_MAX_PRICE)]
    pub max_price: String,

    /// Which category id to look in.
    #[arg(short, long)]
    pub category: String,

    /// Name of markdown file to create.
    #[arg(short = 'o', long)]
    pub filename: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_id: String,
    pub finding_url: String,
    pub global_id: String,
    pub request_timeout: Duration,
    pub run_deadline: Duration,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so callers other than
    /// `load` don't have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_id = lookup("EBAY_APP_ID")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("EBAY_APP_ID must be set".to_string()))?;

        let finding_url = lookup("EBAY_FINDING_URL").unwrap_or_else(|| FINDING_API_URL.to_string());
        let global_id = lookup("EBAY_GLOBAL_ID").unwrap_or_else(|| GLOBAL_ID.to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let request_timeout = parse_secs(&lookup, "REQUEST_TIMEOUT_SECS", 10)?;
        let run_deadline = parse_secs(&lookup, "RUN_DEADLINE_SECS", 120)?;

        Ok(Config {
            app_id,
            finding_url,
            global_id,
            request_timeout,
            run_deadline,
            log_level,
        })
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e)))?,
        None => default,
    };

    if secs == 0 {
        return Err(AppError::ConfigError(format!("{} must be greater than zero", key)));
    }

    Ok(Duration::from_secs(secs))
}
