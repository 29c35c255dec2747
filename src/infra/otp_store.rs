//! Expiring one-time password storage.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::Cache;
use crate::config::{CACHE_PREFIX_OTP, OTP_TTL_SECONDS};
use crate::domain::Otp;
use crate::errors::AppResult;

/// Shared store of pending codes, one per email address.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a code, replacing any pending one for the address.
    async fn save(&self, email: &str, otp: &Otp) -> AppResult<()>;

    /// True when `otp` matches the pending code; a match consumes it.
    async fn verify_and_consume(&self, email: &str, otp: &Otp) -> AppResult<bool>;
}

/// Redis-backed store; codes expire after ten minutes.
pub struct RedisOtpStore {
    cache: Cache,
}

impl RedisOtpStore {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }
}

fn otp_key(email: &str) -> String {
    format!("{}{}", CACHE_PREFIX_OTP, email)
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn save(&self, email: &str, otp: &Otp) -> AppResult<()> {
        self.cache
            .set_with_ttl(&otp_key(email), &otp.as_str(), OTP_TTL_SECONDS)
            .await
    }

    async fn verify_and_consume(&self, email: &str, otp: &Otp) -> AppResult<bool> {
        // Compare and delete in one script so a code is accepted once
        self.cache
            .take_if_equals(&otp_key(email), &otp.as_str())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_key_is_per_email() {
        assert_eq!(otp_key("a@example.com"), "otp:a@example.com");
    }
}
