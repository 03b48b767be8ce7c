use std::cmp::Ordering;

use crate::{
    query::{SortDirection, SortKey},
    response::PagedJson,
    routes::params::ListParams,
};

/// The value a row is ordered by for a given sort key.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
        }
    }
}

/// Filters by a case-insensitive substring of `search_text`, orders by
/// `sort_value`, then slices `offset..offset + limit`. The total counts every
/// row that matched the filter.
pub fn list_rows<T, S, V>(rows: &[T], params: &ListParams, search_text: S, sort_value: V) -> PagedJson<T>
where
    T: Clone,
    S: Fn(&T) -> String,
    V: Fn(&T, SortKey) -> SortValue,
{
    let (offset, limit) = params.normalize();
    let needle = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<(SortValue, &T)> = rows
        .iter()
        .filter(|row| match &needle {
            Some(needle) => search_text(row).to_lowercase().contains(needle),
            None => true,
        })
        .map(|row| (sort_value(row, params.sort_key()), row))
        .collect();

    matched.sort_by(|(a, _), (b, _)| match params.sort_direction() {
        SortDirection::Asc => a.compare(b),
        SortDirection::Desc => b.compare(a),
    });

    let total = matched.len();
    let items = matched
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|(_, row)| row.clone())
        .collect();

    PagedJson::new(items, total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(q: &str, offset: u64, limit: u64, order: SortDirection) -> ListParams {
        ListParams {
            q: Some(q.to_string()),
            offset: Some(offset),
            limit: Some(limit),
            sort: Some(SortKey::Name),
            order: Some(order),
        }
    }

    fn names(page: PagedJson<&'static str>) -> Vec<&'static str> {
        page.items
    }

    const ROWS: [&str; 5] = ["Queso", "arepa", "Butter", "queso crema", "Ham"];

    #[test]
    fn filters_case_insensitively_and_counts_matches() {
        let page = list_rows(
            &ROWS,
            &params("QUESO", 0, 10, SortDirection::Asc),
            |r| r.to_string(),
            |r, _| SortValue::text(r),
        );
        assert_eq!(page.total, 2);
        assert_eq!(names(page), vec!["Queso", "queso crema"]);
    }

    #[test]
    fn slices_after_sorting() {
        let page = list_rows(
            &ROWS,
            &params("", 2, 2, SortDirection::Desc),
            |r| r.to_string(),
            |r, _| SortValue::text(r),
        );
        assert_eq!(page.total, 5);
        assert_eq!(names(page), vec!["Ham", "Butter"]);
    }

    #[test]
    fn offset_past_the_end_is_empty_with_total_kept() {
        let page = list_rows(
            &ROWS,
            &params("", 50, 2, SortDirection::Asc),
            |r| r.to_string(),
            |r, _| SortValue::text(r),
        );
        assert_eq!(page.total, 5);
        assert!(page.items.is_empty());
    }
}
