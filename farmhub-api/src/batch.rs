//! One-shot correction run used by the `fix-delivery-prices` binary.

use std::sync::Arc;

use farmhub_core::FarmStore;
use farmhub_order::{CorrectionError, CorrectionReport, DeliveryFeeCorrector};
use farmhub_store::app_config::{Config, CorrectorConfig};
use farmhub_store::{RestStore, StoreError};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error(
        "store configuration missing or invalid, \
         set FARMHUB__STORE__URL and FARMHUB__STORE__KEY: {0}"
    )]
    Config(String),
    #[error("failed to build store client: {0}")]
    Client(#[from] StoreError),
    #[error("delivery fee correction aborted: {0}")]
    Aborted(#[from] CorrectionError),
}

pub type BatchOutcome = Result<CorrectionReport, BatchError>;

/// Validate `config`, connect to the REST store and correct every order.
pub async fn run(config: &Config) -> BatchOutcome {
    config
        .store
        .validate()
        .map_err(|e| BatchError::Config(e.to_string()))?;
    let store = RestStore::new(&config.store)?;
    run_against(Arc::new(store), config.corrector.clone()).await
}

pub async fn run_against(store: Arc<dyn FarmStore>, config: CorrectorConfig) -> BatchOutcome {
    let report = DeliveryFeeCorrector::new(store, config).correct_all().await?;

    for line in &report.logs {
        info!("{}", line);
    }
    info!(
        checked = report.orders_checked,
        corrected = report.corrected_count,
        written = report.orders_updated(),
        skipped = report.skipped_count,
        errors = report.error_count,
        "summary"
    );
    Ok(report)
}

/// Process exit status: 1 when the run never got going, 0 otherwise.
///
/// Orders that failed individually are already counted in the report and do
/// not fail the process.
pub fn exit_status(outcome: &BatchOutcome) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
