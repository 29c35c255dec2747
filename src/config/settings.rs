//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_APP_ENV, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_MEDIA_BASE_URL,
    DEFAULT_MEDIA_DIR, DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, ENV_PRODUCTION,
    JAZZCASH_LIVE_URL, JAZZCASH_SANDBOX_URL, MIN_JWT_SECRET_LENGTH,
};

/// Merchant credentials for the hosted payment gateway.
#[derive(Clone)]
pub struct PaymentGatewayConfig {
    pub merchant_id: String,
    merchant_password: String,
    integrity_key: String,
    pub return_url: String,
}

impl std::fmt::Debug for PaymentGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGatewayConfig")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_password", &"[REDACTED]")
            .field("integrity_key", &"[REDACTED]")
            .field("return_url", &self.return_url)
            .finish()
    }
}

impl PaymentGatewayConfig {
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_password: impl Into<String>,
        integrity_key: impl Into<String>,
        return_url: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_password: merchant_password.into(),
            integrity_key: integrity_key.into(),
            return_url: return_url.into(),
        }
    }

    /// Read gateway credentials; `None` unless every variable is set.
    fn from_env() -> Option<Self> {
        let merchant_id = env::var("JAZZCASH_MERCHANT_ID").ok()?;
        let merchant_password = env::var("JAZZCASH_MERCHANT_PASSWORD").ok()?;
        let integrity_key = env::var("JAZZCASH_INTEGRITY_KEY").ok()?;
        let return_url = env::var("JAZZCASH_RETURN_URL").ok()?;
        Some(Self::new(merchant_id, merchant_password, integrity_key, return_url))
    }

    pub fn merchant_password(&self) -> &str {
        &self.merchant_password
    }

    pub fn integrity_key(&self) -> &[u8] {
        self.integrity_key.as_bytes()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub app_env: String,
    pub media_dir: String,
    pub media_base_url: String,
    pub payment_gateway: Option<PaymentGatewayConfig>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("app_env", &self.app_env)
            .field("media_dir", &self.media_dir)
            .field("media_base_url", &self.media_base_url)
            .field("payment_gateway", &self.payment_gateway)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let payment_gateway = PaymentGatewayConfig::from_env();
        if payment_gateway.is_none() {
            tracing::warn!("JAZZCASH_* variables incomplete, payment initiation is disabled");
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            app_env: env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.to_string()),
            media_dir: env::var("MEDIA_DIR").unwrap_or_else(|_| DEFAULT_MEDIA_DIR.to_string()),
            media_base_url: env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_MEDIA_BASE_URL.to_string()),
            payment_gateway,
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Whether this deployment talks to live third-party endpoints.
    pub fn is_production(&self) -> bool {
        self.app_env == ENV_PRODUCTION
    }

    /// Payment gateway form endpoint for the current environment.
    pub fn payment_gateway_url(&self) -> &'static str {
        if self.is_production() {
            JAZZCASH_LIVE_URL
        } else {
            JAZZCASH_SANDBOX_URL
        }
    }

    /// Configuration for tests and tooling that never touches the environment.
    pub fn for_tests() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: DEFAULT_REDIS_URL.to_string(),
            jwt_secret: "test-secret-key-for-testing-only-32chars".to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            app_env: DEFAULT_APP_ENV.to_string(),
            media_dir: DEFAULT_MEDIA_DIR.to_string(),
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
            payment_gateway: Some(PaymentGatewayConfig::new(
                "MC12345",
                "merchant-pass",
                "integrity-key",
                "https://example.com/payments/return",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_url_follows_environment() {
        let mut config = Config::for_tests();
        assert_eq!(config.payment_gateway_url(), JAZZCASH_SANDBOX_URL);

        config.app_env = ENV_PRODUCTION.to_string();
        assert_eq!(config.payment_gateway_url(), JAZZCASH_LIVE_URL);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::for_tests();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("integrity-key"));
        assert!(!rendered.contains("merchant-pass"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
