use std::sync::Arc;
use farmhub_core::FarmStore;
use farmhub_store::app_config::CorrectorConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FarmStore>,
    pub corrector: CorrectorConfig,
}
