use std::sync::Arc;

use crate::{config::AppConfig, db::Db, middleware::rate_limit::RateLimiter};

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<AppConfig>,
    pub login_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(db: Db, config: AppConfig) -> Self {
        let login_limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_window);
        Self {
            db,
            config: Arc::new(config),
            login_limiter: Arc::new(login_limiter),
        }
    }
}
