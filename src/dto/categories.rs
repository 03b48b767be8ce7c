use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Validate, require_name};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
}

impl Validate for CategoryRequest {
    fn validate(&self) -> Result<(), String> {
        require_name(&self.name, "category", 100)
    }
}
