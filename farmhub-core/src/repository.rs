use async_trait::async_trait;
use farmhub_shared::{Customer, DeliveryRoute, Order, OrderFeeUpdate};
use uuid::Uuid;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;
pub type RepoResult<T> = Result<T, RepoError>;

/// Access to the `orders` table
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders with their line items, newest first.
    async fn list_orders(&self) -> RepoResult<Vec<Order>>;

    /// Overwrite `delivery_price` and `total_price` of one order.
    async fn update_order_fees(&self, id: Uuid, update: &OrderFeeUpdate) -> RepoResult<()>;
}

/// Access to the `customers` table
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn list_customers(&self) -> RepoResult<Vec<Customer>>;
}

/// Access to the `delivery_routes` table
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn list_routes(&self) -> RepoResult<Vec<DeliveryRoute>>;
}

/// Everything the delivery-fee corrector reads and writes.
pub trait FarmStore: OrderRepository + CustomerRepository + RouteRepository {}

impl<T> FarmStore for T where T: OrderRepository + CustomerRepository + RouteRepository {}
