use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{decimal_or_zero, AmountError, RawAmount};

/// An order as read back from the `orders` table, with its line items embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub charge_delivery: Option<bool>,
    #[serde(default)]
    pub delivery_price: Option<RawAmount>,
    #[serde(default)]
    pub total_price: Option<RawAmount>,
    #[serde(default)]
    pub order_items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(customer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id: Some(customer_id),
            charge_delivery: Some(true),
            delivery_price: None,
            total_price: None,
            order_items: Some(Vec::new()),
            created_at: Some(Utc::now()),
        }
    }

    /// Add a line item
    pub fn with_item(
        mut self,
        quantity: impl Into<RawAmount>,
        price_per_unit: impl Into<RawAmount>,
    ) -> Self {
        self.order_items
            .get_or_insert_with(Vec::new)
            .push(OrderItem {
                quantity: Some(quantity.into()),
                price_per_unit: Some(price_per_unit.into()),
            });
        self
    }

    pub fn charges_delivery(&self) -> bool {
        self.charge_delivery.unwrap_or(false)
    }

    pub fn line_items(&self) -> &[OrderItem] {
        self.order_items.as_deref().unwrap_or_default()
    }

    /// Stored delivery fee; an empty column means nothing was charged.
    pub fn stored_delivery_price(&self) -> Result<Decimal, AmountError> {
        decimal_or_zero(self.delivery_price.as_ref())
    }

    pub fn stored_total_price(&self) -> Result<Option<Decimal>, AmountError> {
        self.total_price.as_ref().map(RawAmount::to_decimal).transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default)]
    pub quantity: Option<RawAmount>,
    #[serde(default)]
    pub price_per_unit: Option<RawAmount>,
}

impl OrderItem {
    pub fn line_total(&self) -> Result<Decimal, AmountError> {
        let quantity = self
            .quantity
            .as_ref()
            .ok_or(AmountError::Missing("quantity"))?
            .to_decimal()?;
        let price = self
            .price_per_unit
            .as_ref()
            .ok_or(AmountError::Missing("price_per_unit"))?
            .to_decimal()?;
        quantity
            .checked_mul(price)
            .ok_or_else(|| AmountError::OutOfRange(format!("{} x {}", quantity, price)))
    }
}

/// The two columns the fee corrector is allowed to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFeeUpdate {
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}
