use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ORDER_STATUSES: [&str; 4] = ["pending", "preparing", "completed", "cancelled"];
pub const DEFAULT_ORDER_STATUS: &str = "pending";

/// Anything a collection view can key by id.
pub trait Record {
    fn id(&self) -> i64;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category_id: i64,
    pub supplier_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer: Customer,
    pub product: Product,
}

impl Order {
    /// Line total priced from the joined product.
    pub fn total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

impl Record for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Supplier {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Customer {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Order {
    fn id(&self) -> i64 {
        self.id
    }
}
