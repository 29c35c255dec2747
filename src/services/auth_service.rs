//! Authentication service - OTP-gated sign-up, sign-in and password reset.
//!
//! SOLID (SRP): Handles authentication concerns only.
//! DDD: Uses domain Password and Otp value objects.
//! DDD: Uses Unit of Work for repository access.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::Notifier;
use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Otp, Password, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{OtpStore, UnitOfWork};

const OTP_EMAIL_SUBJECT: &str = "Your OTP Code";

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
///
/// Every credential-changing call must present a fresh OTP sent to the
/// account's email by `request_otp`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Generate, store and email a one-time code
    async fn request_otp(&self, email: String) -> AppResult<()>;

    /// Create a traveler account and return a token
    async fn sign_up(
        &self,
        email: String,
        name: String,
        password: String,
        otp: String,
    ) -> AppResult<TokenResponse>;

    /// Authenticate with password and OTP
    async fn sign_in(&self, email: String, password: String, otp: String)
        -> AppResult<TokenResponse>;

    /// Replace the password of an existing account
    async fn reset_password(&self, email: String, otp: String, new_password: String)
        -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Load the account behind a verified token
    async fn current_user(&self, user_id: Uuid) -> AppResult<User>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Emails are compared case-insensitively.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    otp_store: Arc<dyn OtpStore>,
    notifier: Arc<dyn Notifier>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(
        uow: Arc<U>,
        otp_store: Arc<dyn OtpStore>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            uow,
            otp_store,
            notifier,
            config,
        }
    }

    /// Check the submitted code and burn it on success.
    async fn consume_otp(&self, email: &str, code: &str) -> AppResult<()> {
        let otp = Otp::parse(code)?;
        if self.otp_store.verify_and_consume(email, &otp).await? {
            Ok(())
        } else {
            Err(AppError::validation("Invalid or expired OTP"))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn request_otp(&self, email: String) -> AppResult<()> {
        let email = normalize_email(&email);
        let otp = Otp::generate();

        self.otp_store.save(&email, &otp).await?;
        self.notifier
            .email(&email, OTP_EMAIL_SUBJECT, &otp.email_body())
            .await;

        tracing::info!(email = %email, "OTP issued");
        Ok(())
    }

    async fn sign_up(
        &self,
        email: String,
        name: String,
        password: String,
        otp: String,
    ) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        // A rejected password must leave the code usable for a retry
        let password_hash = Password::new(&password)?.into_string();
        self.consume_otp(&email, &otp).await?;

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let user = self
            .uow
            .users()
            .create(email, password_hash, name.trim().to_string())
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");
        generate_token(&user, &self.config)
    }

    async fn sign_in(
        &self,
        email: String,
        password: String,
        otp: String,
    ) -> AppResult<TokenResponse> {
        let email = normalize_email(&email);
        self.consume_otp(&email, &otp).await?;

        let user = self.uow.users().find_by_email(&email).await?;

        // Unknown accounts burn the same hashing work as wrong passwords.
        let stored = user.as_ref().map(|u| u.password_hash.as_str());
        if !Password::verify_optional(stored, &password) {
            return Err(AppError::InvalidCredentials);
        }

        match user {
            Some(user) => generate_token(&user, &self.config),
            None => Err(AppError::InvalidCredentials),
        }
    }

    async fn reset_password(
        &self,
        email: String,
        otp: String,
        new_password: String,
    ) -> AppResult<()> {
        let email = normalize_email(&email);
        let password = Password::new(&new_password)?;
        self.consume_otp(&email, &otp).await?;

        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_not_found()?;

        self.uow
            .users()
            .update_password(user.id, password.into_string())
            .await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(user_id).await?.ok_or_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::{FrozenPersistence, MockPersistence};
    use crate::infra::MockOtpStore;
    use crate::services::{fixtures, MockNotifier};

    fn accepting_otp() -> MockOtpStore {
        let mut otp_store = MockOtpStore::new();
        otp_store
            .expect_verify_and_consume()
            .returning(|_, _| Ok(true));
        otp_store
    }

    fn rejecting_otp() -> MockOtpStore {
        let mut otp_store = MockOtpStore::new();
        otp_store
            .expect_verify_and_consume()
            .returning(|_, _| Ok(false));
        otp_store
    }

    fn service(uow: MockPersistence, otp_store: MockOtpStore) -> Authenticator<FrozenPersistence> {
        Authenticator::new(
            uow.build(),
            Arc::new(otp_store),
            Arc::new(MockNotifier::new()),
            Config::for_tests(),
        )
    }

    fn user_with_password(password: &str) -> User {
        let mut user = fixtures::user(UserRole::Traveler);
        user.email = "traveler@example.com".into();
        user.password_hash = Password::new(password).unwrap().into_string();
        user
    }

    #[tokio::test]
    async fn test_request_otp_stores_and_emails_code() {
        let mut otp_store = MockOtpStore::new();
        otp_store
            .expect_save()
            .withf(|email, _| email == "traveler@example.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_email()
            .withf(|to, subject, body| {
                to == "traveler@example.com"
                    && subject == OTP_EMAIL_SUBJECT
                    && body.starts_with("Your OTP is: ")
            })
            .times(1)
            .return_const(());

        let auth = Authenticator::new(
            MockPersistence::new().build(),
            Arc::new(otp_store),
            Arc::new(notifier),
            Config::for_tests(),
        );

        auth.request_otp(" Traveler@Example.com ".into()).await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_up_creates_traveler_and_returns_token() {
        let mut uow = MockPersistence::new();
        uow.users.expect_find_by_email().returning(|_| Ok(None));
        uow.users
            .expect_create()
            .withf(|email, hash, name| {
                email == "new@example.com" && hash.starts_with("$argon2") && name == "Sana"
            })
            .times(1)
            .returning(|email, hash, name| Ok(User::new(Uuid::new_v4(), email, hash, name)));

        let auth = service(uow, accepting_otp());
        let token = auth
            .sign_up("new@example.com".into(), "Sana".into(), "password123".into(), "123456".into())
            .await
            .unwrap();

        assert_eq!(token.token_type, "Bearer");
        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.email, "new@example.com");
        assert_eq!(claims.role, UserRole::Traveler);
    }

    #[tokio::test]
    async fn test_sign_up_existing_email_conflicts() {
        let existing = user_with_password("password123");
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        uow.users.expect_create().never();

        let auth = service(uow, accepting_otp());
        let result = auth
            .sign_up(
                "traveler@example.com".into(),
                "Sana".into(),
                "password123".into(),
                "123456".into(),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_bad_otp() {
        let mut uow = MockPersistence::new();
        uow.users.expect_create().never();

        let auth = service(uow, rejecting_otp());
        let result = auth
            .sign_up("new@example.com".into(), "Sana".into(), "password123".into(), "123456".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Invalid or expired OTP"));
    }

    #[tokio::test]
    async fn test_sign_up_short_password_keeps_otp() {
        let mut uow = MockPersistence::new();
        uow.users.expect_create().never();

        let mut otp_store = MockOtpStore::new();
        otp_store.expect_verify_and_consume().never();

        let auth = service(uow, otp_store);
        let result = auth
            .sign_up("new@example.com".into(), "Sana".into(), "short".into(), "123456".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sign_in_with_correct_password() {
        let user = user_with_password("password123");
        let user_id = user.id;
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_email()
            .withf(|email| email == "traveler@example.com")
            .returning(move |_| Ok(Some(user.clone())));

        let auth = service(uow, accepting_otp());
        let token = auth
            .sign_in("traveler@example.com".into(), "password123".into(), "654321".into())
            .await
            .unwrap();

        assert_eq!(auth.verify_token(&token.access_token).unwrap().sub, user_id);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_or_unknown_email() {
        let user = user_with_password("password123");
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_email()
            .returning(move |email| Ok((email == user.email).then(|| user.clone())));

        let auth = service(uow, accepting_otp());

        let wrong = auth
            .sign_in("traveler@example.com".into(), "nope-nope".into(), "654321".into())
            .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        let unknown = auth
            .sign_in("ghost@example.com".into(), "password123".into(), "654321".into())
            .await;
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_reset_password_updates_hash() {
        let user = user_with_password("old-password");
        let user_id = user.id;
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        uow.users
            .expect_update_password()
            .withf(move |id, hash| {
                *id == user_id && Password::from_hash(hash.clone()).verify("new-password")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let auth = service(uow, accepting_otp());
        auth.reset_password(
            "traveler@example.com".into(),
            "111111".into(),
            "new-password".into(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_reset_password_unknown_user_not_found() {
        let mut uow = MockPersistence::new();
        uow.users.expect_find_by_email().returning(|_| Ok(None));

        let auth = service(uow, accepting_otp());
        let result = auth
            .reset_password("ghost@example.com".into(), "111111".into(), "new-password".into())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_reset_password_validates_inputs() {
        let auth = service(MockPersistence::new(), rejecting_otp());

        let short = auth
            .reset_password("a@example.com".into(), "111111".into(), "short".into())
            .await;
        assert!(matches!(short, Err(AppError::Validation(_))));

        let malformed_otp = auth
            .reset_password("a@example.com".into(), "12ab".into(), "long-enough".into())
            .await;
        assert!(matches!(malformed_otp, Err(AppError::Validation(_))));

        let expired = auth
            .reset_password("a@example.com".into(), "111111".into(), "long-enough".into())
            .await;
        assert!(matches!(expired, Err(AppError::Validation(msg)) if msg == "Invalid or expired OTP"));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let auth = service(MockPersistence::new(), MockOtpStore::new());
        let user = fixtures::user(UserRole::Partner);
        let token = generate_token(&user, &Config::for_tests()).unwrap();

        let mut tampered = token.access_token.clone();
        tampered.push('x');

        assert!(auth.verify_token(&token.access_token).is_ok());
        assert!(matches!(auth.verify_token(&tampered), Err(AppError::Jwt(_))));
    }
}
