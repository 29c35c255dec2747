//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod admin_repository;
mod base;
mod booking_repository;
mod catalog_repository;
pub(crate) mod entities;
mod engagement_repository;
mod listing_repository;
mod partner_repository;
mod user_repository;

pub use admin_repository::{AdminRepository, AdminStore};
pub use booking_repository::{BookingInsert, BookingRepository, BookingStore};
pub use catalog_repository::{CatalogRepository, CatalogStore};
pub use engagement_repository::{EngagementRepository, EngagementStore, ReviewInsert};
pub use listing_repository::{ListingRepository, ListingStore, CHANGES_APPLIED_NOTE};
pub use partner_repository::{NewPartner, PartnerRepository, PartnerStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use admin_repository::MockAdminRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use catalog_repository::MockCatalogRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use engagement_repository::MockEngagementRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use listing_repository::MockListingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use partner_repository::MockPartnerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
