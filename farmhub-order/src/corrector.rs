use farmhub_core::repository::{FarmStore, RepoError};
use farmhub_pricing::{calculate_fee, FeeQuote, PricingError};
use farmhub_shared::money::round_money;
use farmhub_shared::{AmountError, Customer, DeliveryRoute, Order, OrderFeeUpdate};
use farmhub_store::app_config::{CorrectorConfig, MissingLookupPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::report::{CorrectionReport, FeeCorrection};

/// A failure that stops the whole run
#[derive(Debug, thiserror::Error)]
pub enum CorrectionError {
    #[error("failed to load {table}: {source}")]
    Fetch {
        table: &'static str,
        #[source]
        source: RepoError,
    },
}

/// A failure confined to one order
#[derive(Debug, thiserror::Error)]
enum OrderError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("update failed: {0}")]
    Write(RepoError),
}

enum Outcome {
    Corrected(FeeCorrection),
    Unchanged,
    Skipped,
}

/// Recomputes every order's delivery fee and writes back the ones that drifted.
///
/// Safe to re-run: orders already carrying the right fee are left alone, so a
/// second run performs no writes.
pub struct DeliveryFeeCorrector {
    store: Arc<dyn FarmStore>,
    config: CorrectorConfig,
}

impl DeliveryFeeCorrector {
    pub fn new(store: Arc<dyn FarmStore>, config: CorrectorConfig) -> Self {
        Self { store, config }
    }

    /// Run over all orders, newest first.
    ///
    /// Only the initial reads can fail the run. Problems with a single order
    /// are logged, counted in `error_count` and the run moves on.
    pub async fn correct_all(&self) -> Result<CorrectionReport, CorrectionError> {
        let (orders, customers, routes) = tokio::try_join!(
            async {
                self.store
                    .list_orders()
                    .await
                    .map_err(|source| CorrectionError::Fetch { table: "orders", source })
            },
            async {
                self.store
                    .list_customers()
                    .await
                    .map_err(|source| CorrectionError::Fetch { table: "customers", source })
            },
            async {
                self.store
                    .list_routes()
                    .await
                    .map_err(|source| CorrectionError::Fetch { table: "delivery_routes", source })
            },
        )?;

        let customers: HashMap<Uuid, Customer> = customers.into_iter().map(|c| (c.id, c)).collect();
        let routes: HashMap<Uuid, DeliveryRoute> = routes.into_iter().map(|r| (r.id, r)).collect();

        let mut report = CorrectionReport {
            dry_run: self.config.dry_run,
            ..Default::default()
        };
        report.log(format!(
            "Checking {} orders against {} customers and {} routes{}",
            orders.len(),
            customers.len(),
            routes.len(),
            if self.config.dry_run { " (dry run)" } else { "" }
        ));

        for order in &orders {
            report.orders_checked += 1;
            match self.correct_order(order, &customers, &routes).await {
                Ok(Outcome::Corrected(correction)) => {
                    report.corrected_count += 1;
                    report.log(format!(
                        "Order {}: delivery fee {:.2} -> {:.2}, total {} -> {:.2}{}",
                        correction.order_id,
                        correction.old_fee,
                        correction.new_fee,
                        correction
                            .old_total
                            .map(|t| format!("{:.2}", t))
                            .unwrap_or_else(|| "none".to_string()),
                        correction.new_total,
                        if correction.applied { "" } else { " (not written)" }
                    ));
                    report.corrections.push(correction);
                }
                Ok(Outcome::Unchanged) => report.skipped_count += 1,
                Ok(Outcome::Skipped) => {
                    report.skipped_count += 1;
                    report.log(format!(
                        "Order {}: customer or route missing, left unchanged",
                        order.id
                    ));
                }
                Err(e) => {
                    error!(order_id = %order.id, error = %e, "failed to correct order");
                    report.error_count += 1;
                    report.log(format!("Order {}: error: {}", order.id, e));
                }
            }
        }

        info!(
            checked = report.orders_checked,
            corrected = report.corrected_count,
            skipped = report.skipped_count,
            errors = report.error_count,
            dry_run = report.dry_run,
            "delivery fee correction finished"
        );
        report.log(format!(
            "Done: {} corrected, {} skipped, {} errors",
            report.corrected_count, report.skipped_count, report.error_count
        ));

        Ok(report)
    }

    async fn correct_order(
        &self,
        order: &Order,
        customers: &HashMap<Uuid, Customer>,
        routes: &HashMap<Uuid, DeliveryRoute>,
    ) -> Result<Outcome, OrderError> {
        let customer = order.customer_id.and_then(|id| customers.get(&id));
        let route = customer
            .and_then(|c| c.delivery_route_id)
            .and_then(|id| routes.get(&id));

        let quote = calculate_fee(order, customer, route)?;
        let skip_misses = self.config.on_missing_lookup == MissingLookupPolicy::Skip;
        if quote.reason.is_lookup_miss() && skip_misses {
            warn!(
                order_id = %order.id,
                reason = ?quote.reason,
                "skipping order with missing lookup"
            );
            return Ok(Outcome::Skipped);
        }

        let old_fee = order.stored_delivery_price().map_err(PricingError::from)?;
        let drift = old_fee
            .checked_sub(quote.fee)
            .ok_or_else(|| AmountError::OutOfRange(format!("delivery_price of order {}", order.id)))
            .map_err(PricingError::from)?;
        if drift.abs() <= self.config.tolerance {
            return Ok(Outcome::Unchanged);
        }

        let correction = self.build_correction(order, &quote, old_fee)?;
        if !self.config.dry_run {
            let update = OrderFeeUpdate {
                delivery_price: correction.new_fee,
                total_price: correction.new_total,
            };
            self.store
                .update_order_fees(order.id, &update)
                .await
                .map_err(OrderError::Write)?;
        }

        info!(
            order_id = %order.id,
            old_fee = %correction.old_fee,
            new_fee = %correction.new_fee,
            new_total = %correction.new_total,
            applied = correction.applied,
            "delivery fee corrected"
        );
        Ok(Outcome::Corrected(correction))
    }

    fn build_correction(
        &self,
        order: &Order,
        quote: &FeeQuote,
        old_fee: rust_decimal::Decimal,
    ) -> Result<FeeCorrection, OrderError> {
        Ok(FeeCorrection {
            order_id: order.id,
            customer_type: quote.customer_type,
            reason: quote.reason,
            old_fee,
            new_fee: quote.fee,
            old_total: order.stored_total_price().map_err(PricingError::from)?,
            new_total: round_money(quote.total().map_err(PricingError::from)?),
            applied: !self.config.dry_run,
        })
    }
}
