use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Validate;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

impl Validate for CreateOrderRequest {
    fn validate(&self) -> Result<(), String> {
        if self.customer_id <= 0 || self.product_id <= 0 {
            return Err("Select a customer and a product for the order".into());
        }
        check_quantity(self.quantity)?;
        check_text(self.status.as_deref(), self.notes.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateOrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateOrderRequest {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }
}

impl Validate for UpdateOrderRequest {
    fn validate(&self) -> Result<(), String> {
        if matches!(self.customer_id, Some(id) if id <= 0)
            || matches!(self.product_id, Some(id) if id <= 0)
        {
            return Err("Order references must be positive ids".into());
        }
        if let Some(quantity) = self.quantity {
            check_quantity(quantity)?;
        }
        check_text(self.status.as_deref(), self.notes.as_deref())
    }
}

fn check_quantity(quantity: i32) -> Result<(), String> {
    if quantity < 1 {
        return Err("The quantity must be at least 1".into());
    }
    Ok(())
}

fn check_text(status: Option<&str>, notes: Option<&str>) -> Result<(), String> {
    if let Some(status) = status {
        let len = status.trim().chars().count();
        if !(2..=50).contains(&len) {
            return Err("The order status must be between 2 and 50 characters".into());
        }
    }
    if let Some(notes) = notes
        && notes.chars().count() > 255
    {
        return Err("Order notes must be at most 255 characters".into());
    }
    Ok(())
}
