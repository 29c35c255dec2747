//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod access;
mod admin_service;
mod auth_service;
mod booking_service;
mod catalog_service;
pub mod container;
mod engagement_service;
mod listing_service;
mod media_service;
mod notifier;
mod partner_service;
mod payment_service;

#[cfg(test)]
mod fixtures;

// Service Container
pub use container::{Adapters, ServiceContainer, Services};

// Cross-cutting collaborators
pub use access::{AccessControl, AccessGuard};
pub use media_service::{ImageUploader, MediaUploader};
pub use notifier::{NotificationDispatcher, Notifier};

// Service traits and implementations
pub use admin_service::{AdminManager, AdminService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use booking_service::{BookingManager, BookingService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use engagement_service::{EngagementManager, EngagementService};
pub use listing_service::{ListingManager, ListingService};
pub use partner_service::{PartnerManager, PartnerProfileView, PartnerService};
pub use payment_service::{PaymentManager, PaymentService};

// Parallel execution utilities
pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use access::MockAccessControl;
#[cfg(any(test, feature = "test-utils"))]
pub use admin_service::MockAdminService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_service::MockBookingService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_service::MockCatalogService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use engagement_service::MockEngagementService;
#[cfg(any(test, feature = "test-utils"))]
pub use listing_service::MockListingService;
#[cfg(any(test, feature = "test-utils"))]
pub use media_service::MockImageUploader;
#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use partner_service::MockPartnerService;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_service::MockPaymentService;
