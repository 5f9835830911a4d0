use async_trait::async_trait;
use farmhub_core::repository::{CustomerRepository, OrderRepository, RepoResult, RouteRepository};
use farmhub_shared::{Customer, DeliveryRoute, Order, OrderFeeUpdate, RawAmount};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

/// Store held entirely in memory.
///
/// Behaves like the REST store (newest orders first, writes only the two fee
/// columns) and can be told to reject particular updates or to be offline.
#[derive(Default)]
pub struct InMemoryStore {
    orders: RwLock<Vec<Order>>,
    customers: RwLock<Vec<Customer>>,
    routes: RwLock<Vec<DeliveryRoute>>,
    writes: RwLock<Vec<(Uuid, OrderFeeUpdate)>>,
    rejected: RwLock<HashSet<Uuid>>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new(orders: Vec<Order>, customers: Vec<Customer>, routes: Vec<DeliveryRoute>) -> Self {
        Self {
            orders: RwLock::new(orders),
            customers: RwLock::new(customers),
            routes: RwLock::new(routes),
            ..Default::default()
        }
    }

    /// Make every update of `order_id` fail.
    pub async fn reject_updates_for(&self, order_id: Uuid) {
        self.rejected.write().await.insert(order_id);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every successful write, in order.
    pub async fn writes(&self) -> Vec<(Uuid, OrderFeeUpdate)> {
        self.writes.read().await.clone()
    }

    pub async fn order(&self, id: Uuid) -> Option<Order> {
        self.orders.read().await.iter().find(|o| o.id == id).cloned()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn list_orders(&self) -> RepoResult<Vec<Order>> {
        self.check_online()?;
        let mut orders = self.orders.read().await.clone();
        // None sorts lowest, so undated orders end up last
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order_fees(&self, id: Uuid, update: &OrderFeeUpdate) -> RepoResult<()> {
        self.check_online()?;
        if self.rejected.read().await.contains(&id) {
            return Err(StoreError::Rejected(id).into());
        }

        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(StoreError::RowNotFound { table: "orders", id })?;
        order.delivery_price = Some(RawAmount::from(update.delivery_price));
        order.total_price = Some(RawAmount::from(update.total_price));

        self.writes.write().await.push((id, *update));
        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>> {
        self.check_online()?;
        Ok(self.customers.read().await.clone())
    }
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn list_routes(&self) -> RepoResult<Vec<DeliveryRoute>> {
        self.check_online()?;
        Ok(self.routes.read().await.clone())
    }
}
