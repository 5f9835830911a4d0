//! Recompute delivery fees for every order and write back the ones that are wrong.
//!
//! Reads `FARMHUB__STORE__URL` and `FARMHUB__STORE__KEY` (or `config/*.toml`).
//! Exits 1 when configuration is missing or the store cannot be read; failures
//! on individual orders are reported but do not change the exit code.

use std::process::ExitCode;

use farmhub_api::batch::{self, BatchError};
use farmhub_api::telemetry;
use farmhub_store::app_config::Config;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init(
        "fix_delivery_prices=info,farmhub_api=info,farmhub_order=info,farmhub_pricing=warn,\
         farmhub_store=info",
    );

    let outcome = match Config::load() {
        Ok(config) => batch::run(&config).await,
        Err(e) => Err(BatchError::Config(e.to_string())),
    };
    if let Err(e) = &outcome {
        error!("{}", e);
    }

    ExitCode::from(batch::exit_status(&outcome))
}
