use std::time::Duration;

use reqwest::{
    Method, RequestBuilder, Response, StatusCode,
    header::{HeaderMap, RETRY_AFTER},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    client::error::{AuthError, ClientError},
    config::ClientConfig,
    dto::auth::{ErrorDetail, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    query::{ListQuery, Page},
    response::TOTAL_COUNT_HEADER,
};

/// Thin typed wrapper over the REST contract. Every method issues exactly
/// one request and maps the response onto [`ClientError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::build(base_url.into(), None)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::build(config.api_url.clone(), config.request_timeout)
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, credential: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match credential {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
        credential: Option<&str>,
        fallback: &str,
    ) -> Result<Page<T>, ClientError> {
        tracing::debug!(
            path,
            q = %query.filter_text,
            offset = query.page_offset,
            limit = query.page_limit,
            sort = query.sort_key.as_param(),
            order = query.sort_direction.as_param(),
            "list request"
        );
        let response = self
            .request(Method::GET, path, credential)
            .query(&query.to_params())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(http_error(response, fallback).await);
        }

        let total_count = total_count(response.headers());
        let items: Vec<T> = response.json().await?;
        Ok(Page::new(items, total_count))
    }

    pub async fn create<P, T>(
        &self,
        path: &str,
        payload: &P,
        credential: Option<&str>,
        fallback: &str,
    ) -> Result<Option<T>, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(path, "create request");
        let response = self
            .request(Method::POST, path, credential)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(http_error(response, fallback).await);
        }
        optional_body(response).await
    }

    pub async fn update<P, T>(
        &self,
        path: &str,
        id: i64,
        payload: &P,
        credential: Option<&str>,
        fallback: &str,
    ) -> Result<Option<T>, ClientError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let item_path = format!("{}/{id}", path.trim_end_matches('/'));
        tracing::debug!(path = %item_path, "update request");
        let response = self
            .request(Method::PUT, &item_path, credential)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(http_error(response, fallback).await);
        }
        optional_body(response).await
    }

    /// DELETE one item. 400 and 409 mean dependents still reference it and
    /// become [`ClientError::Conflict`] with the server's explanation verbatim.
    pub async fn delete(
        &self,
        path: &str,
        id: i64,
        credential: Option<&str>,
        fallback: &str,
        conflict_fallback: &str,
    ) -> Result<(), ClientError> {
        let item_path = format!("{}/{id}", path.trim_end_matches('/'));
        tracing::debug!(path = %item_path, "delete request");
        let response = self
            .request(Method::DELETE, &item_path, credential)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::BAD_REQUEST || status == StatusCode::CONFLICT {
            let message = read_detail(response)
                .await
                .unwrap_or_else(|| conflict_fallback.to_string());
            return Err(ClientError::Conflict(message));
        }
        Err(http_error(response, fallback).await)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let form = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .request(Method::POST, "login", None)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let retry_after = retry_after(response.headers());
        let detail = read_detail(response).await;
        let err = match status {
            StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials(
                detail.unwrap_or_else(|| "Invalid username or password".to_string()),
            ),
            StatusCode::FORBIDDEN => {
                AuthError::Forbidden(detail.unwrap_or_else(|| "Access denied".to_string()))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let base = detail.unwrap_or_else(|| "Too many login attempts".to_string());
                let message = match retry_after {
                    Some(wait) => format!("{base} (retry in {} s)", wait.as_secs()),
                    None => base,
                };
                AuthError::RateLimited {
                    message,
                    retry_after,
                }
            }
            other => {
                return Err(ClientError::Http {
                    status: other.as_u16(),
                    message: detail.unwrap_or_else(|| "Could not sign in".to_string()),
                });
            }
        };
        Err(err.into())
    }

    pub async fn register(
        &self,
        payload: &RegisterRequest,
    ) -> Result<RegisterResponse, ClientError> {
        let response = self
            .request(Method::POST, "register", None)
            .json(payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(http_error(response, "Could not register").await);
        }
        Ok(response.json().await?)
    }
}

async fn read_detail(response: Response) -> Option<String> {
    response
        .json::<ErrorDetail>()
        .await
        .ok()
        .map(|body| body.detail)
        .filter(|detail| !detail.trim().is_empty())
}

async fn http_error(response: Response, fallback: &str) -> ClientError {
    let status = response.status().as_u16();
    let message = read_detail(response)
        .await
        .unwrap_or_else(|| fallback.to_string());
    tracing::warn!(status, %message, "request failed");
    ClientError::Http { status, message }
}

async fn optional_body<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ClientError> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

/// A missing or unreadable total counts as zero.
fn total_count(headers: &HeaderMap) -> u64 {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
