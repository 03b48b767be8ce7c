use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    #[serde(alias = "categoria")]
    Category,
}

impl SortKey {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Price => "price",
            SortKey::Category => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Parameters of one listing request.
///
/// `page_offset` is kept a multiple of `page_limit` by every paging helper;
/// only filter and sort changes move it back to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter_text: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub page_offset: u64,
    pub page_limit: u64,
}

impl ListQuery {
    pub fn new(page_limit: u64) -> Self {
        Self {
            filter_text: String::new(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            page_offset: 0,
            page_limit: page_limit.max(1),
        }
    }

    pub fn page_index(&self) -> u64 {
        self.page_offset / self.page_limit
    }

    pub fn at_page(&self, index: u64) -> Self {
        Self {
            page_offset: index.saturating_mul(self.page_limit),
            ..self.clone()
        }
    }

    pub fn with_filter(&self, filter_text: impl Into<String>) -> Self {
        Self {
            filter_text: filter_text.into(),
            page_offset: 0,
            ..self.clone()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("q", self.filter_text.clone()),
            ("offset", self.page_offset.to_string()),
            ("limit", self.page_limit.to_string()),
            ("sort", self.sort_key.as_param().to_string()),
            ("order", self.sort_direction.as_param().to_string()),
        ]
    }
}

/// One slice of a remote collection. `total_count` comes from the
/// `x-total-count` header and is independent of `items.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn page_count(&self, page_limit: u64) -> u64 {
        page_count(self.total_count, page_limit)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

pub fn page_count(total_count: u64, page_limit: u64) -> u64 {
    if page_limit == 0 {
        return 0;
    }
    total_count.div_ceil(page_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(25, 9), 3);
        assert_eq!(page_count(27, 9), 3);
        assert_eq!(page_count(28, 9), 4);
        assert_eq!(page_count(0, 9), 0);
    }

    #[test]
    fn paging_keeps_offset_aligned_to_limit() {
        let query = ListQuery::new(9).at_page(2);
        assert_eq!(query.page_offset, 18);
        assert_eq!(query.page_index(), 2);
    }

    #[test]
    fn params_encode_every_field() {
        let mut query = ListQuery::new(10).at_page(3);
        query.filter_text = "queso".into();
        query.sort_key = SortKey::Category;
        query.sort_direction = SortDirection::Desc;

        let params = query.to_params();
        assert_eq!(
            params,
            vec![
                ("q", "queso".to_string()),
                ("offset", "30".to_string()),
                ("limit", "10".to_string()),
                ("sort", "category".to_string()),
                ("order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn far_page_saturates_instead_of_overflowing() {
        let query = ListQuery::new(9).at_page(u64::MAX / 4);
        assert_eq!(query.page_offset, u64::MAX);
    }

    #[test]
    fn zero_limit_is_lifted_to_one() {
        assert_eq!(ListQuery::new(0).page_limit, 1);
    }
}
