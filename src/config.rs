use std::{env, str::FromStr, time::Duration};

/// Settings of the reference backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub invite_code: String,
    pub access_token_minutes: i64,
    pub rate_limit_requests: usize,
    pub rate_limit_window: Duration,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")?;
        let invite_code = env::var("INVITE_CODE")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "1234".to_string());
        Ok(Self {
            host,
            port: parsed_or("APP_PORT", 8000),
            jwt_secret,
            invite_code,
            access_token_minutes: parsed_or("ACCESS_TOKEN_EXPIRE_MINUTES", 60),
            rate_limit_requests: parsed_or("RATE_LIMIT_REQUESTS", 5),
            rate_limit_window: Duration::from_secs(parsed_or("RATE_LIMIT_WINDOW_SECONDS", 60)),
            admin_password,
        })
    }

    /// Defaults for in-process servers, e.g. integration tests.
    pub fn local(jwt_secret: impl Into<String>, invite_code: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: jwt_secret.into(),
            invite_code: invite_code.into(),
            access_token_minutes: 60,
            rate_limit_requests: 5,
            rate_limit_window: Duration::from_secs(60),
            admin_password: "1234".to_string(),
        }
    }
}

/// Settings of the API client and its views.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub page_limit: u64,
    pub catalog_page_limit: u64,
    pub debounce: Duration,
    pub flash_ttl: Duration,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            page_limit: 9,
            catalog_page_limit: 10,
            debounce: Duration::from_millis(400),
            flash_ttl: Duration::from_millis(3000),
            request_timeout: None,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = env::var("API_URL")?;
        let defaults = Self::new(api_url);
        Ok(Self {
            page_limit: parsed_or("PAGE_LIMIT", defaults.page_limit),
            catalog_page_limit: parsed_or("CATALOG_PAGE_LIMIT", defaults.catalog_page_limit),
            debounce: Duration::from_millis(parsed_or("DEBOUNCE_MS", 400)),
            flash_ttl: Duration::from_millis(parsed_or("FLASH_TTL_MS", 3000)),
            request_timeout: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs),
            ..defaults
        })
    }
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
