pub mod models;
pub mod money;
pub mod secret;

pub use models::{
    Customer, CustomerType, DeliveryRoute, FeeSchedule, Order, OrderFeeUpdate, OrderItem,
};
pub use money::{parse_amount, round_money, AmountError, RawAmount};
pub use secret::Masked;
