pub mod customer;
pub mod order;
pub mod route;

pub use customer::{Customer, CustomerType};
pub use order::{Order, OrderFeeUpdate, OrderItem};
pub use route::{DeliveryRoute, FeeSchedule};
