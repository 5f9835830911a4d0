use farmhub_shared::money::round_money;
use farmhub_shared::{AmountError, Customer, CustomerType, DeliveryRoute, Order};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid amount: {0}")]
    Amount(#[from] AmountError),
    #[error("order has no line items and no total_price to derive a subtotal from")]
    NoSubtotal,
}

/// Which rule decided the delivery fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FeeReason {
    DeliveryNotCharged,
    CustomerNotFound,
    CustomerFreeDelivery,
    NoRouteAssigned,
    RouteNotFound,
    /// The route waives delivery for this customer type entirely
    FreeThresholdZero,
    ThresholdReached {
        #[serde(with = "rust_decimal::serde::float")]
        threshold: Decimal,
    },
    FlatFee {
        #[serde(with = "rust_decimal::serde::float")]
        threshold: Decimal,
    },
}

impl FeeReason {
    /// True when the fee is zero only because a customer or route row is missing.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            FeeReason::CustomerNotFound | FeeReason::NoRouteAssigned | FeeReason::RouteNotFound
        )
    }
}

/// Result of pricing delivery for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub fee: Decimal,
    pub customer_type: Option<CustomerType>,
    pub reason: FeeReason,
}

impl FeeQuote {
    /// Order total with this fee applied
    pub fn total(&self) -> Result<Decimal, AmountError> {
        self.subtotal
            .checked_add(self.fee)
            .ok_or_else(|| AmountError::OutOfRange(format!("{} + {}", self.subtotal, self.fee)))
    }
}

/// Order value excluding delivery, unrounded.
///
/// Summed from line items when there are any, otherwise back-computed from
/// the stored `total_price - delivery_price`.
pub fn derive_subtotal(order: &Order) -> Result<Decimal, PricingError> {
    let items = order.line_items();
    let subtotal = if items.is_empty() {
        let total = order.stored_total_price()?.ok_or(PricingError::NoSubtotal)?;
        let delivery = order.stored_delivery_price()?;
        total
            .checked_sub(delivery)
            .ok_or_else(|| AmountError::OutOfRange(format!("subtotal of order {}", order.id)))?
    } else {
        let mut sum = Decimal::ZERO;
        for item in items {
            sum = sum
                .checked_add(item.line_total()?)
                .ok_or_else(|| AmountError::OutOfRange(format!("subtotal of order {}", order.id)))?;
        }
        sum
    };
    Ok(subtotal)
}

/// Compute the delivery fee an order should carry.
///
/// `customer` is the order's customer and `route` the customer's delivery
/// route, each `None` when the lookup found nothing. Missing lookups price
/// delivery at zero and log a warning instead of failing the order.
pub fn calculate_fee(
    order: &Order,
    customer: Option<&Customer>,
    route: Option<&DeliveryRoute>,
) -> Result<FeeQuote, PricingError> {
    // Thresholds compare against the exact sum; only the reported figures are rounded
    let subtotal = derive_subtotal(order)?;
    let quote = |fee: Decimal, customer_type: Option<CustomerType>, reason: FeeReason| FeeQuote {
        subtotal: round_money(subtotal),
        fee: round_money(fee.max(Decimal::ZERO)),
        customer_type,
        reason,
    };

    if !order.charges_delivery() {
        return Ok(quote(
            Decimal::ZERO,
            customer.map(Customer::kind),
            FeeReason::DeliveryNotCharged,
        ));
    }

    let Some(customer) = customer else {
        warn!(
            order_id = %order.id,
            customer_id = ?order.customer_id,
            "customer not found, delivery priced at zero"
        );
        return Ok(quote(Decimal::ZERO, None, FeeReason::CustomerNotFound));
    };
    let kind = customer.kind();

    if customer.has_free_delivery() {
        return Ok(quote(Decimal::ZERO, Some(kind), FeeReason::CustomerFreeDelivery));
    }

    if customer.delivery_route_id.is_none() {
        warn!(
            order_id = %order.id,
            customer_id = %customer.id,
            "customer has no delivery route, delivery priced at zero"
        );
        return Ok(quote(Decimal::ZERO, Some(kind), FeeReason::NoRouteAssigned));
    }

    let Some(route) = route else {
        warn!(
            order_id = %order.id,
            route_id = ?customer.delivery_route_id,
            "delivery route not found, delivery priced at zero"
        );
        return Ok(quote(Decimal::ZERO, Some(kind), FeeReason::RouteNotFound));
    };

    let schedule = route.schedule_for(kind)?;
    if schedule.free_threshold.is_zero() {
        return Ok(quote(Decimal::ZERO, Some(kind), FeeReason::FreeThresholdZero));
    }
    if subtotal >= schedule.free_threshold {
        return Ok(quote(
            Decimal::ZERO,
            Some(kind),
            FeeReason::ThresholdReached { threshold: schedule.free_threshold },
        ));
    }

    Ok(quote(
        schedule.fee,
        Some(kind),
        FeeReason::FlatFee { threshold: schedule.free_threshold },
    ))
}
