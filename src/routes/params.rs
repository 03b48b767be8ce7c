use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::query::{SortDirection, SortKey};

pub const DEFAULT_LIMIT: u64 = 6;
pub const MAX_LIMIT: u64 = 100;

/// `?q=&offset=&limit=&sort=&order=` shared by every listing endpoint.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive name search
    pub q: Option<String>,
    pub offset: Option<u64>,
    /// Page size, 1 to 100
    pub limit: Option<u64>,
    pub sort: Option<SortKey>,
    pub order: Option<SortDirection>,
}

impl ListParams {
    pub fn normalize(&self) -> (usize, usize) {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (offset as usize, limit as usize)
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.unwrap_or_default()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.order.unwrap_or_default()
    }
}

/// Order listing adds exact-match filters on top of the shared parameters.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListParams {
    pub q: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<SortKey>,
    pub order: Option<SortDirection>,
    pub customer_id: Option<i64>,
    pub status: Option<String>,
}

impl OrderListParams {
    pub fn listing(&self) -> ListParams {
        ListParams {
            q: self.q.clone(),
            offset: self.offset,
            limit: self.limit,
            sort: self.sort,
            order: self.order,
        }
    }
}
