use farmhub_pricing::FeeReason;
use farmhub_shared::CustomerType;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One order whose stored delivery fee disagreed with the computed fee
#[derive(Debug, Clone, Serialize)]
pub struct FeeCorrection {
    pub order_id: Uuid,
    pub customer_type: Option<CustomerType>,
    pub reason: FeeReason,
    #[serde(with = "rust_decimal::serde::float")]
    pub old_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub new_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub old_total: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub new_total: Decimal,
    /// False when the run was a dry run
    pub applied: bool,
}

/// Summary of one corrector run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorrectionReport {
    pub orders_checked: usize,
    pub corrected_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub dry_run: bool,
    pub corrections: Vec<FeeCorrection>,
    pub logs: Vec<String>,
}

impl CorrectionReport {
    /// Orders actually written back to the store
    pub fn orders_updated(&self) -> usize {
        self.corrections.iter().filter(|c| c.applied).count()
    }

    pub(crate) fn log(&mut self, line: String) {
        self.logs.push(line);
    }
}
