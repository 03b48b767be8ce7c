use std::{
    collections::{HashMap, VecDeque},
    net::IpAddr,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::error::AppError;

/// Sliding-window limiter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    history: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            history: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, client: IpAddr) -> Result<(), AppError> {
        self.check_at(client, Instant::now()).await
    }

    async fn check_at(&self, client: IpAddr, now: Instant) -> Result<(), AppError> {
        let mut history = self.history.lock().await;
        history.retain(|_, hits| {
            hits.back()
                .is_some_and(|last| now.duration_since(*last) <= self.window)
        });
        let hits = history.entry(client).or_default();

        while hits
            .front()
            .is_some_and(|first| now.duration_since(*first) > self.window)
        {
            hits.pop_front();
        }

        if hits.len() >= self.max_requests {
            let oldest = hits.front().copied().unwrap_or(now);
            let wait = self.window.saturating_sub(now.duration_since(oldest));
            tracing::warn!(%client, "login rate limit exceeded");
            return Err(AppError::TooManyRequests {
                detail: "Too many attempts. Try again in a minute.".into(),
                retry_after_secs: wait.as_secs().max(1),
            });
        }

        hits.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn rejects_after_limit_within_window() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let start = Instant::now();

        assert!(limiter.check_at(ip, start).await.is_ok());
        assert!(limiter.check_at(ip, start).await.is_ok());
        let err = limiter.check_at(ip, start).await.unwrap_err();
        assert!(matches!(err, AppError::TooManyRequests { retry_after_secs: 60, .. }));

        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at(ip, later).await.is_ok());
    }

    #[tokio::test]
    async fn clients_are_limited_separately() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)), now).await.is_ok());
        assert!(limiter.check_at(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), now).await.is_ok());
    }

    #[tokio::test]
    async fn idle_clients_are_forgotten() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();
        for last_octet in 1..=4 {
            let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, last_octet));
            assert!(limiter.check_at(ip, start).await.is_ok());
        }
        assert_eq!(limiter.history.lock().await.len(), 4);

        let later = start + Duration::from_secs(61);
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 9));
        assert!(limiter.check_at(ip, later).await.is_ok());
        assert_eq!(limiter.history.lock().await.len(), 1);
    }
}
