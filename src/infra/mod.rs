//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, migrations and repositories
//! - Redis cache, rate-limit counters and the OTP store
//! - Object storage and image re-encoding for uploads
//! - The outbound email queue
//! - The hosted payment gateway signer

pub mod cache;
pub mod db;
pub mod health;
pub mod imaging;
pub mod mailer;
pub mod otp_store;
pub mod payment_gateway;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use cache::{Cache, RateLimitStore};
pub use db::{Database, Migrator};
pub use health::HealthProbe;
pub use imaging::{EncodedImage, ImageEncoder, JpegImageEncoder};
pub use mailer::{EmailQueue, PostgresEmailQueue};
pub use otp_store::{OtpStore, RedisOtpStore};
pub use payment_gateway::{sign_params, JazzCashGateway, PaymentGateway, SignedPayment};
pub use repositories::{
    AdminRepository, BookingRepository, CatalogRepository, EngagementRepository,
    ListingRepository, PartnerRepository, UserRepository,
};
pub use storage::{LocalObjectStorage, ObjectStorage};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockRateLimitStore;
#[cfg(any(test, feature = "test-utils"))]
pub use health::MockHealthProbe;
#[cfg(any(test, feature = "test-utils"))]
pub use imaging::MockImageEncoder;
#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockEmailQueue;
#[cfg(any(test, feature = "test-utils"))]
pub use otp_store::MockOtpStore;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_gateway::MockPaymentGateway;
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockObjectStorage;
