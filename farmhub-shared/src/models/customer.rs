use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pricing segment of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Gastro,
    Wholesale,
    /// Private households. Also used for rows with an unknown type.
    #[default]
    #[serde(other)]
    Home,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub free_delivery: Option<bool>,
    #[serde(default)]
    pub delivery_route_id: Option<Uuid>,
}

impl Customer {
    pub fn new(id: Uuid, customer_type: CustomerType) -> Self {
        Self {
            id,
            name: None,
            customer_type: Some(customer_type),
            free_delivery: None,
            delivery_route_id: None,
        }
    }

    pub fn kind(&self) -> CustomerType {
        self.customer_type.unwrap_or_default()
    }

    /// Per-customer override that waives delivery on every order
    pub fn has_free_delivery(&self) -> bool {
        self.free_delivery.unwrap_or(false)
    }
}
