use axum::{
    Json,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// A JSON array body with the unpaginated total in `X-Total-Count`.
#[derive(Debug)]
pub struct PagedJson<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> PagedJson<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }
}

impl<T: Serialize> IntoResponse for PagedJson<T> {
    fn into_response(self) -> Response {
        let mut response = Json(self.items).into_response();
        response.headers_mut().insert(
            HeaderName::from_static(TOTAL_COUNT_HEADER),
            HeaderValue::from(self.total),
        );
        response
    }
}
