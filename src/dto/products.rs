use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Validate, require_name};

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: f64,
    pub category_id: i64,
    pub supplier_id: i64,
}

impl Validate for CreateProductRequest {
    fn validate(&self) -> Result<(), String> {
        require_name(&self.name, "product", MAX_NAME_LEN)?;
        check_price(self.price)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<i64>,
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            require_name(name, "product", MAX_NAME_LEN)?;
        }
        match self.price {
            Some(price) => check_price(price),
            None => Ok(()),
        }
    }
}

fn check_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err("The price must be a non-negative number".into());
    }
    Ok(())
}
