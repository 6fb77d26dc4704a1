//! Request rate limiter
//!
//! Sliding-window limiter with two independent buckets:
//! - a general per-IP window applied to all `/api` routes when enabled
//! - a stricter per-identifier window for failed sign-in attempts
//!
//! Entries are pruned lazily on access and by a periodic cleanup task.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::net::IpAddr;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;

/// Sliding-window rate limiter
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Request timestamps per client IP
    api_hits: RwLock<HashMap<IpAddr, Vec<DateTime<Utc>>>>,
    /// Failed sign-in timestamps per identifier (email)
    auth_attempts: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            api_hits: RwLock::new(HashMap::new()),
            auth_attempts: RwLock::new(HashMap::new()),
        }
    }

    /// Whether the general API limiter is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Seconds a limited client should wait before retrying the API
    pub fn retry_after_seconds(&self) -> u64 {
        self.config.window_seconds
    }

    /// Seconds a limited identifier should wait before signing in again
    pub fn auth_retry_after_seconds(&self) -> u64 {
        self.config.auth_window_seconds
    }

    /// Check if an IP has exhausted its request budget for the current window
    pub async fn is_request_limited(&self, ip: IpAddr) -> bool {
        let mut hits = self.api_hits.write().await;
        let cutoff = Utc::now() - Duration::seconds(self.config.window_seconds as i64);

        let ip_hits = hits.entry(ip).or_insert_with(Vec::new);
        ip_hits.retain(|time| *time > cutoff);

        ip_hits.len() >= self.config.max_requests as usize
    }

    /// Record a request from an IP
    pub async fn record_request(&self, ip: IpAddr) {
        let mut hits = self.api_hits.write().await;
        hits.entry(ip).or_insert_with(Vec::new).push(Utc::now());
    }

    /// Check if an identifier has exhausted its sign-in attempts
    pub async fn is_auth_limited(&self, identifier: &str) -> bool {
        let mut attempts = self.auth_attempts.write().await;
        let cutoff = Utc::now() - Duration::seconds(self.config.auth_window_seconds as i64);

        let id_attempts = attempts
            .entry(identifier.to_lowercase())
            .or_insert_with(Vec::new);
        id_attempts.retain(|time| *time > cutoff);

        id_attempts.len() >= self.config.auth_max_attempts as usize
    }

    /// Record a failed sign-in attempt for an identifier
    pub async fn record_failed_auth(&self, identifier: &str) {
        let mut attempts = self.auth_attempts.write().await;
        attempts
            .entry(identifier.to_lowercase())
            .or_insert_with(Vec::new)
            .push(Utc::now());
    }

    /// Clear failed attempts for an identifier (on successful sign-in)
    pub async fn clear_auth_attempts(&self, identifier: &str) {
        let mut attempts = self.auth_attempts.write().await;
        attempts.remove(&identifier.to_lowercase());
    }

    /// Clean up expired entries (called periodically from a background task)
    pub async fn cleanup(&self) {
        let now = Utc::now();
        let api_cutoff = now - Duration::seconds(self.config.window_seconds as i64);
        let auth_cutoff = now - Duration::seconds(self.config.auth_window_seconds as i64);

        {
            let mut hits = self.api_hits.write().await;
            hits.retain(|_, times| {
                times.retain(|time| *time > api_cutoff);
                !times.is_empty()
            });
        }

        {
            let mut attempts = self.auth_attempts.write().await;
            attempts.retain(|_, times| {
                times.retain(|time| *time > auth_cutoff);
                !times.is_empty()
            });
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            max_requests: 3,
            window_seconds: 60,
            auth_max_attempts: 2,
            auth_window_seconds: 60,
        }
    }

    #[tokio::test]
    async fn test_api_rate_limit() {
        let limiter = RateLimiter::new(test_config());
        let ip = IpAddr::from_str("127.0.0.1").unwrap();

        for _ in 0..3 {
            assert!(!limiter.is_request_limited(ip).await);
            limiter.record_request(ip).await;
        }

        assert!(limiter.is_request_limited(ip).await);

        // Another IP is unaffected
        let other = IpAddr::from_str("10.0.0.1").unwrap();
        assert!(!limiter.is_request_limited(other).await);
    }

    #[tokio::test]
    async fn test_auth_rate_limit() {
        let limiter = RateLimiter::new(test_config());

        assert!(!limiter.is_auth_limited("user@example.com").await);
        limiter.record_failed_auth("user@example.com").await;
        limiter.record_failed_auth("user@example.com").await;

        assert!(limiter.is_auth_limited("user@example.com").await);

        limiter.clear_auth_attempts("user@example.com").await;
        assert!(!limiter.is_auth_limited("user@example.com").await);
    }

    #[tokio::test]
    async fn test_auth_identifier_case_insensitive() {
        let limiter = RateLimiter::new(test_config());

        limiter.record_failed_auth("User@Example.com").await;
        limiter.record_failed_auth("user@example.COM").await;

        assert!(limiter.is_auth_limited("user@example.com").await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_empty_buckets() {
        let limiter = RateLimiter::new(test_config());
        let ip = IpAddr::from_str("127.0.0.1").unwrap();

        limiter.record_request(ip).await;
        limiter.record_failed_auth("user@example.com").await;
        limiter.cleanup().await;

        // Entries within the window survive cleanup
        assert!(!limiter.is_request_limited(ip).await);
        assert_eq!(limiter.api_hits.read().await.len(), 1);
    }
}
