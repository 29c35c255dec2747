//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::{HealthProbe, RateLimitStore};
use crate::services::{
    AdminService, AuthService, BookingService, CatalogService, EngagementService, ListingService,
    PartnerService, PaymentService, ServiceContainer,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub admin_service: Arc<dyn AdminService>,
    pub partner_service: Arc<dyn PartnerService>,
    pub catalog_service: Arc<dyn CatalogService>,
    pub listing_service: Arc<dyn ListingService>,
    pub booking_service: Arc<dyn BookingService>,
    pub engagement_service: Arc<dyn EngagementService>,
    pub payment_service: Arc<dyn PaymentService>,
    /// Fixed-window counters for the rate limit middleware
    pub rate_limiter: Arc<dyn RateLimitStore>,
    /// Probes reported by `/health`
    pub database: Arc<dyn HealthProbe>,
    pub cache: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Take every service out of a container.
    pub fn from_container(
        services: &dyn ServiceContainer,
        rate_limiter: Arc<dyn RateLimitStore>,
        database: Arc<dyn HealthProbe>,
        cache: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            admin_service: services.admin(),
            partner_service: services.partners(),
            catalog_service: services.catalog(),
            listing_service: services.listings(),
            booking_service: services.bookings(),
            engagement_service: services.engagement(),
            payment_service: services.payments(),
            rate_limiter,
            database,
            cache,
        }
    }
}

/// Mock-backed state for router tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::infra::{MockHealthProbe, MockRateLimitStore};
    use crate::services::{
        MockAdminService, MockAuthService, MockBookingService, MockCatalogService,
        MockEngagementService, MockListingService, MockPartnerService, MockPaymentService,
    };

    /// Every collaborator starts as an expectation-free mock, except the
    /// rate limiter which allows everything.
    pub struct TestState {
        pub auth: MockAuthService,
        pub admin: MockAdminService,
        pub partners: MockPartnerService,
        pub catalog: MockCatalogService,
        pub listings: MockListingService,
        pub bookings: MockBookingService,
        pub engagement: MockEngagementService,
        pub payments: MockPaymentService,
        pub rate_limiter: MockRateLimitStore,
        pub database: MockHealthProbe,
        pub cache: MockHealthProbe,
    }

    impl TestState {
        pub fn new() -> Self {
            let mut rate_limiter = MockRateLimitStore::new();
            rate_limiter
                .expect_check_rate_limit()
                .returning(|_, _, _| Ok((1, true)));

            Self {
                auth: MockAuthService::new(),
                admin: MockAdminService::new(),
                partners: MockPartnerService::new(),
                catalog: MockCatalogService::new(),
                listings: MockListingService::new(),
                bookings: MockBookingService::new(),
                engagement: MockEngagementService::new(),
                payments: MockPaymentService::new(),
                rate_limiter,
                database: MockHealthProbe::new(),
                cache: MockHealthProbe::new(),
            }
        }

        pub fn build(self) -> AppState {
            AppState {
                auth_service: Arc::new(self.auth),
                admin_service: Arc::new(self.admin),
                partner_service: Arc::new(self.partners),
                catalog_service: Arc::new(self.catalog),
                listing_service: Arc::new(self.listings),
                booking_service: Arc::new(self.bookings),
                engagement_service: Arc::new(self.engagement),
                payment_service: Arc::new(self.payments),
                rate_limiter: Arc::new(self.rate_limiter),
                database: Arc::new(self.database),
                cache: Arc::new(self.cache),
            }
        }
    }
}
