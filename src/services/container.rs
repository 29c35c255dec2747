//! Service Container - Centralized service access with parallel execution support.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.
//!
//! Features:
//! - Centralized access to all application services
//! - Thread-safe concurrent access via Arc
//! - Parallel execution utilities for independent operations

use std::future::Future;
use std::sync::Arc;

use super::{
    AdminService, AuthService, BookingService, CatalogService, EngagementService, ListingService,
    PartnerService, PaymentService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{EmailQueue, ImageEncoder, ObjectStorage, OtpStore, PaymentGateway, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn admin(&self) -> Arc<dyn AdminService>;

    fn partners(&self) -> Arc<dyn PartnerService>;

    fn catalog(&self) -> Arc<dyn CatalogService>;

    fn listings(&self) -> Arc<dyn ListingService>;

    fn bookings(&self) -> Arc<dyn BookingService>;

    fn engagement(&self) -> Arc<dyn EngagementService>;

    fn payments(&self) -> Arc<dyn PaymentService>;
}

/// External systems the services talk to besides the database.
pub struct Adapters {
    pub otp_store: Arc<dyn OtpStore>,
    pub mail: Arc<dyn EmailQueue>,
    pub storage: Arc<dyn ObjectStorage>,
    pub encoder: Arc<dyn ImageEncoder>,
    /// Absent when no merchant credentials are configured
    pub gateway: Option<Arc<dyn PaymentGateway>>,
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    admin_service: Arc<dyn AdminService>,
    partner_service: Arc<dyn PartnerService>,
    catalog_service: Arc<dyn CatalogService>,
    listing_service: Arc<dyn ListingService>,
    booking_service: Arc<dyn BookingService>,
    engagement_service: Arc<dyn EngagementService>,
    payment_service: Arc<dyn PaymentService>,
}

impl Services {
    /// Create a new service container with all services initialized
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        admin_service: Arc<dyn AdminService>,
        partner_service: Arc<dyn PartnerService>,
        catalog_service: Arc<dyn CatalogService>,
        listing_service: Arc<dyn ListingService>,
        booking_service: Arc<dyn BookingService>,
        engagement_service: Arc<dyn EngagementService>,
        payment_service: Arc<dyn PaymentService>,
    ) -> Self {
        Self {
            auth_service,
            admin_service,
            partner_service,
            catalog_service,
            listing_service,
            booking_service,
            engagement_service,
            payment_service,
        }
    }

    /// Wire every service over one database connection.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        adapters: Adapters,
        config: Config,
    ) -> Self {
        use super::{
            AccessGuard, AdminManager, Authenticator, BookingManager, CatalogManager,
            EngagementManager, ListingManager, MediaUploader, NotificationDispatcher,
            PartnerManager, PaymentManager,
        };

        let uow = Arc::new(Persistence::new(db));
        let access = Arc::new(AccessGuard::new(uow.clone()));
        let notifier = Arc::new(NotificationDispatcher::new(uow.clone(), adapters.mail));
        let uploader = Arc::new(MediaUploader::new(adapters.storage, adapters.encoder));

        Self {
            auth_service: Arc::new(Authenticator::new(
                uow.clone(),
                adapters.otp_store,
                notifier.clone(),
                config,
            )),
            admin_service: Arc::new(AdminManager::new(
                uow.clone(),
                access.clone(),
                notifier.clone(),
            )),
            partner_service: Arc::new(PartnerManager::new(
                uow.clone(),
                access.clone(),
                notifier.clone(),
            )),
            catalog_service: Arc::new(CatalogManager::new(uow.clone(), access.clone())),
            listing_service: Arc::new(ListingManager::new(
                uow.clone(),
                access,
                uploader,
                notifier.clone(),
            )),
            booking_service: Arc::new(BookingManager::new(uow.clone(), notifier)),
            engagement_service: Arc::new(EngagementManager::new(uow.clone())),
            payment_service: Arc::new(PaymentManager::new(uow, adapters.gateway)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn admin(&self) -> Arc<dyn AdminService> {
        self.admin_service.clone()
    }

    fn partners(&self) -> Arc<dyn PartnerService> {
        self.partner_service.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogService> {
        self.catalog_service.clone()
    }

    fn listings(&self) -> Arc<dyn ListingService> {
        self.listing_service.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.booking_service.clone()
    }

    fn engagement(&self) -> Arc<dyn EngagementService> {
        self.engagement_service.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentService> {
        self.payment_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (traveler, listing) = parallel::join2(
    ///     uow.users().find_by_id(traveler_id),
    ///     uow.listings().find_by_id(listing_id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute operations with at most `limit` in flight.
    ///
    /// Results keep the input order. The first error in input order is
    /// returned once every operation has settled.
    pub async fn join_all_limited<F, T, I>(futures: I, limit: usize) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
        I: IntoIterator<Item = F>,
    {
        use futures::stream::{self, StreamExt};

        // Plain `buffered` keeps the future Send for #[async_trait] callers
        let results: Vec<AppResult<T>> = stream::iter(futures)
            .buffered(limit.max(1))
            .collect()
            .await;
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_limited_join_keeps_input_order() {
        // Earlier items finish last.
        let futures = (0..5u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(20 - i * 4)).await;
            Ok(i) as AppResult<u64>
        });

        let results = parallel::join_all_limited(futures, 3).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_limited_join_over_borrowed_items_is_send() {
        fn assert_send<T: Send>(_: T) {}

        let items = vec![1, 2, 3];
        assert_send(parallel::join_all_limited(
            items.iter().map(|i| async move { Ok(*i * 2) as AppResult<i32> }),
            2,
        ));
    }

    #[tokio::test]
    async fn test_limited_join_propagates_error() {
        let futures = (0..3).map(|i| async move {
            if i == 1 {
                Err(AppError::validation("bad item"))
            } else {
                Ok(i)
            }
        });

        let result = parallel::join_all_limited(futures, 2).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
