pub mod corrector;
pub mod report;

pub use corrector::{CorrectionError, DeliveryFeeCorrector};
pub use report::{CorrectionReport, FeeCorrection};
