use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Validate, require_email, require_name};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SupplierRequest {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Validate for SupplierRequest {
    fn validate(&self) -> Result<(), String> {
        require_name(&self.name, "supplier", 100)?;
        if let Some(phone) = &self.phone
            && phone.trim().chars().count() > 20
        {
            return Err("The supplier phone must be at most 20 characters".into());
        }
        match &self.email {
            Some(email) => require_email(email),
            None => Ok(()),
        }
    }
}
