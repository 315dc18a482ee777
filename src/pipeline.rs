use std::path::Path;

use chrono::Local;
use tracing::info;

use crate::api::{Query, SearchApi};
use crate::config::{Config, SearchArgs};
use crate::error::{AppError, Result};
use crate::listing::normalize_all;
use crate::report::render;
use crate::search::collect_all;

/// Runs one search end to end and writes the report to `args.filename`.
///
/// Returns the number of listings written. The file is only touched once every page has
/// been fetched and every listing normalized, so a failed run leaves no report behind.
pub async fn run(config: &Config, args: &SearchArgs, api: &dyn SearchApi) -> Result<usize> {
    let deadline = config.run_deadline;

    match tokio::time::timeout(deadline, search_and_report(args, api)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::DeadlineExceeded(deadline.as_secs())),
    }
}

async fn search_and_report(args: &SearchArgs, api: &dyn SearchApi) -> Result<usize> {
    let started = Local::now();

    let mut query = Query::new(&args.keywords, &args.category, &args.max_price);
    let requested = query.clone();
    info!(
        "Searching for {:?} in category {} (max price {})",
        args.keywords, args.category, args.max_price
    );

    let raw = collect_all(api, &mut query).await?;
    let listings = normalize_all(&raw)?;
    let report = render(&requested, &started, &listings)?;

    write_report(&args.filename, &report).await?;
    info!("Wrote {} listings to {}", listings.len(), args.filename.display());

    Ok(listings.len())
}

async fn write_report(path: &Path, report: &str) -> Result<()> {
    tokio::fs::write(path, report).await?;
    Ok(())
}
