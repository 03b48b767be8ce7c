use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Validate, require_email, require_name};

const MAX_NAME_LEN: usize = 120;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Validate for CreateCustomerRequest {
    fn validate(&self) -> Result<(), String> {
        require_name(&self.name, "customer", MAX_NAME_LEN)?;
        require_email(&self.email)?;
        match &self.phone {
            Some(phone) => check_phone(phone),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCustomerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Validate for UpdateCustomerRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            require_name(name, "customer", MAX_NAME_LEN)?;
        }
        if let Some(email) = &self.email {
            require_email(email)?;
        }
        match &self.phone {
            Some(phone) => check_phone(phone),
            None => Ok(()),
        }
    }
}

fn check_phone(phone: &str) -> Result<(), String> {
    let len = phone.trim().chars().count();
    if !(7..=20).contains(&len) {
        return Err("The phone number must be between 7 and 20 characters".into());
    }
    Ok(())
}
