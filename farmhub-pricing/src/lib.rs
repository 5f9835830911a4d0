pub mod delivery;

pub use delivery::{calculate_fee, derive_subtotal, FeeQuote, FeeReason, PricingError};
