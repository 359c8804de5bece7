//! Token bucket rate limiter middleware.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tokio::time::Instant;

use klink_core::config::RateLimitConfig;
use klink_core::error::AppError;

use crate::error::ApiError;

/// Message returned once a client has used up its allowance.
pub const TOO_MANY_REQUESTS: &str = "Too many requests from this IP, please try again in an hour";

/// Bucket count above which idle buckets are dropped.
const PRUNE_THRESHOLD: usize = 10_000;

/// Simple in-memory token bucket rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// IP → bucket state.
    buckets: Arc<Mutex<HashMap<String, TokenBucket>>>,
    /// Maximum tokens per bucket.
    max_tokens: u32,
    /// Token refill rate per second.
    refill_rate: f64,
    /// Time for an empty bucket to refill completely.
    window: Duration,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    pub fn new(max_tokens: u32, window: Duration) -> Self {
        let seconds = window.as_secs_f64().max(1.0);
        Self {
            buckets: Arc::new(Mutex::new(HashMap::new())),
            max_tokens,
            refill_rate: f64::from(max_tokens) / seconds,
            window,
        }
    }

    /// Creates a limiter allowing `max_requests` per `window_seconds`.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_seconds))
    }

    /// Attempts to consume a token for the given key.
    pub async fn check(&self, key: &str) -> bool {
        let mut buckets = self.buckets.lock().await;
        let now = Instant::now();

        if buckets.len() > PRUNE_THRESHOLD {
            let window = self.window;
            buckets.retain(|_, b| now.duration_since(b.last_refill) < window);
        }

        let bucket = buckets.entry(key.to_string()).or_insert(TokenBucket {
            tokens: f64::from(self.max_tokens),
            last_refill: now,
        });

        // Refill tokens
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(f64::from(self.max_tokens));
        bucket.last_refill = now;

        // Try to consume
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Client address: the socket peer, else the first `X-Forwarded-For` hop.
fn client_key(request: &Request) -> String {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rejects requests from a client that has exhausted its bucket.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    if !limiter.check(&key).await {
        tracing::warn!(client = %key, "Rate limit exceeded");
        return ApiError::from(AppError::rate_limited(TOO_MANY_REQUESTS)).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bucket_exhausts() {
        let limiter = RateLimiter::new(3, Duration::from_secs(3600));
        for _ in 0..3 {
            assert!(limiter.check("10.0.0.1").await);
        }
        assert!(!limiter.check("10.0.0.1").await);
        assert!(limiter.check("10.0.0.2").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_refills() {
        let limiter = RateLimiter::new(2, Duration::from_secs(2));
        assert!(limiter.check("ip").await);
        assert!(limiter.check("ip").await);
        assert!(!limiter.check("ip").await);

        tokio::time::advance(Duration::from_millis(1100)).await;
        assert!(limiter.check("ip").await);
    }

    #[test]
    fn test_client_key_from_forwarded_header() {
        let request = axum::http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.7");
    }
}
