//! Copies each case's organization onto its actions, one transaction per batch
//! of cases. Safe to run again: every action ends up with its case's
//! organization no matter what it held before.

use log::{error, info};
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    if let Err(e) = Logger::init_logger(&config) {
        eprintln!("Failed to initialize logger: {e}");
    }

    let db = match service::init_database(&config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    let result = entity_api::action::backfill_organization(
        &db,
        config.backfill_batch_size,
        |processed, total| info!("Updated {processed} cases of {total}"),
    )
    .await;

    match result {
        Ok(summary) => info!(
            "Backfill finished: {} cases in {} batches",
            summary.processed_cases, summary.batches
        ),
        Err(e) => {
            error!("Backfill failed: {e}");
            std::process::exit(1);
        }
    }
}
