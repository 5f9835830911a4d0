use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CustomerType;
use crate::money::{decimal_or_zero, AmountError, RawAmount};

/// A named group of customers sharing one fee schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryRoute {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub delivery_fee_home: Option<RawAmount>,
    #[serde(default)]
    pub delivery_fee_gastro: Option<RawAmount>,
    #[serde(default)]
    pub delivery_fee_wholesale: Option<RawAmount>,
    #[serde(default)]
    pub home_min_free_delivery: Option<RawAmount>,
    #[serde(default)]
    pub gastro_min_free_delivery: Option<RawAmount>,
    #[serde(default)]
    pub wholesale_min_free_delivery: Option<RawAmount>,
}

/// Flat fee and free-delivery threshold for one customer type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub fee: Decimal,
    pub free_threshold: Decimal,
}

impl DeliveryRoute {
    /// Resolve the schedule for `kind`. Empty columns count as zero.
    pub fn schedule_for(&self, kind: CustomerType) -> Result<FeeSchedule, AmountError> {
        let (fee, threshold) = match kind {
            CustomerType::Home => (&self.delivery_fee_home, &self.home_min_free_delivery),
            CustomerType::Gastro => (&self.delivery_fee_gastro, &self.gastro_min_free_delivery),
            CustomerType::Wholesale => {
                (&self.delivery_fee_wholesale, &self.wholesale_min_free_delivery)
            }
        };

        Ok(FeeSchedule {
            fee: decimal_or_zero(fee.as_ref())?,
            free_threshold: decimal_or_zero(threshold.as_ref())?,
        })
    }
}
