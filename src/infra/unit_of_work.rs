//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories and provides the transaction
//! helpers the stores use for multi-step writes.

use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::sync::Arc;

use super::repositories::{
    AdminRepository, AdminStore, BookingRepository, BookingStore, CatalogRepository,
    CatalogStore, EngagementRepository, EngagementStore, ListingRepository, ListingStore,
    PartnerRepository, PartnerStore, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Services depend on this registry rather than on individual stores.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn partners(&self) -> Arc<dyn PartnerRepository>;
    fn admins(&self) -> Arc<dyn AdminRepository>;
    fn catalog(&self) -> Arc<dyn CatalogRepository>;
    fn listings(&self) -> Arc<dyn ListingRepository>;
    fn bookings(&self) -> Arc<dyn BookingRepository>;
    fn engagement(&self) -> Arc<dyn EngagementRepository>;
}

/// Begin a read-committed, read-write transaction.
pub(crate) async fn begin(db: &DatabaseConnection) -> AppResult<DatabaseTransaction> {
    db.begin_with_config(
        Some(IsolationLevel::ReadCommitted),
        Some(AccessMode::ReadWrite),
    )
    .await
    .map_err(AppError::from)
}

/// Commit on success, roll back on error.
pub(crate) async fn settle<T>(txn: DatabaseTransaction, result: AppResult<T>) -> AppResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(AppError::from)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    partners: Arc<PartnerStore>,
    admins: Arc<AdminStore>,
    catalog: Arc<CatalogStore>,
    listings: Arc<ListingStore>,
    bookings: Arc<BookingStore>,
    engagement: Arc<EngagementStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            partners: Arc::new(PartnerStore::new(db.clone())),
            admins: Arc::new(AdminStore::new(db.clone())),
            catalog: Arc::new(CatalogStore::new(db.clone())),
            listings: Arc::new(ListingStore::new(db.clone())),
            bookings: Arc::new(BookingStore::new(db.clone())),
            engagement: Arc::new(EngagementStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn partners(&self) -> Arc<dyn PartnerRepository> {
        self.partners.clone()
    }

    fn admins(&self) -> Arc<dyn AdminRepository> {
        self.admins.clone()
    }

    fn catalog(&self) -> Arc<dyn CatalogRepository> {
        self.catalog.clone()
    }

    fn listings(&self) -> Arc<dyn ListingRepository> {
        self.listings.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    fn engagement(&self) -> Arc<dyn EngagementRepository> {
        self.engagement.clone()
    }
}

/// Repository registry backed by mocks, for service unit tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;
    use crate::infra::repositories::{
        MockAdminRepository, MockBookingRepository, MockCatalogRepository,
        MockEngagementRepository, MockListingRepository, MockPartnerRepository,
        MockUserRepository,
    };

    /// Each field starts as a mock with no expectations; tests set the ones
    /// they need before handing the registry to a service.
    #[derive(Default)]
    pub struct MockPersistence {
        pub users: MockUserRepository,
        pub partners: MockPartnerRepository,
        pub admins: MockAdminRepository,
        pub catalog: MockCatalogRepository,
        pub listings: MockListingRepository,
        pub bookings: MockBookingRepository,
        pub engagement: MockEngagementRepository,
    }

    impl MockPersistence {
        pub fn new() -> Self {
            Self::default()
        }

        /// Freeze the expectations into a shareable registry.
        pub fn build(self) -> Arc<FrozenPersistence> {
            Arc::new(FrozenPersistence {
                users: Arc::new(self.users),
                partners: Arc::new(self.partners),
                admins: Arc::new(self.admins),
                catalog: Arc::new(self.catalog),
                listings: Arc::new(self.listings),
                bookings: Arc::new(self.bookings),
                engagement: Arc::new(self.engagement),
            })
        }
    }

    pub struct FrozenPersistence {
        users: Arc<MockUserRepository>,
        partners: Arc<MockPartnerRepository>,
        admins: Arc<MockAdminRepository>,
        catalog: Arc<MockCatalogRepository>,
        listings: Arc<MockListingRepository>,
        bookings: Arc<MockBookingRepository>,
        engagement: Arc<MockEngagementRepository>,
    }

    impl UnitOfWork for FrozenPersistence {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn partners(&self) -> Arc<dyn PartnerRepository> {
            self.partners.clone()
        }

        fn admins(&self) -> Arc<dyn AdminRepository> {
            self.admins.clone()
        }

        fn catalog(&self) -> Arc<dyn CatalogRepository> {
            self.catalog.clone()
        }

        fn listings(&self) -> Arc<dyn ListingRepository> {
            self.listings.clone()
        }

        fn bookings(&self) -> Arc<dyn BookingRepository> {
            self.bookings.clone()
        }

        fn engagement(&self) -> Arc<dyn EngagementRepository> {
            self.engagement.clone()
        }
    }
}
