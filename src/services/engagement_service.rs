//! Wishlist and in-app notification inbox.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{Notification, WishlistEntry};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EngagementService: Send + Sync {
    async fn add_to_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<WishlistEntry>;

    async fn remove_from_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()>;

    async fn list_wishlist(&self, user_id: Uuid) -> AppResult<Vec<WishlistEntry>>;

    async fn list_notifications(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Notification>, u64)>;

    async fn mark_notification_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> AppResult<Notification>;
}

pub struct EngagementManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EngagementManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> EngagementService for EngagementManager<U> {
    async fn add_to_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<WishlistEntry> {
        self.uow
            .listings()
            .find_by_id(listing_id)
            .await?
            .ok_or_not_found()?;
        self.uow
            .engagement()
            .add_to_wishlist(user_id, listing_id)
            .await
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        if self
            .uow
            .engagement()
            .remove_from_wishlist(user_id, listing_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn list_wishlist(&self, user_id: Uuid) -> AppResult<Vec<WishlistEntry>> {
        self.uow.engagement().list_wishlist(user_id).await
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Notification>, u64)> {
        self.uow
            .engagement()
            .list_notifications(user_id, params)
            .await
    }

    async fn mark_notification_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        self.uow
            .engagement()
            .mark_notification_read(user_id, notification_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ListingStatus;
    use crate::infra::unit_of_work::testing::MockPersistence;
    use crate::services::fixtures;
    use chrono::Utc;

    #[tokio::test]
    async fn test_wishlist_requires_existing_listing() {
        let mut uow = MockPersistence::new();
        uow.listings.expect_find_by_id().returning(|_| Ok(None));
        uow.engagement.expect_add_to_wishlist().never();

        let result = EngagementManager::new(uow.build())
            .add_to_wishlist(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_add_to_wishlist() {
        let user_id = Uuid::new_v4();
        let mut uow = MockPersistence::new();
        uow.listings
            .expect_find_by_id()
            .returning(|_| Ok(Some(fixtures::listing(Uuid::new_v4(), ListingStatus::Approved))));
        uow.engagement
            .expect_add_to_wishlist()
            .times(1)
            .returning(|user_id, listing_id| {
                Ok(WishlistEntry {
                    id: Uuid::new_v4(),
                    user_id,
                    listing_id,
                    created_at: Utc::now(),
                })
            });

        let entry = EngagementManager::new(uow.build())
            .add_to_wishlist(user_id, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(entry.user_id, user_id);
    }

    #[tokio::test]
    async fn test_removing_absent_entry_is_not_found() {
        let mut uow = MockPersistence::new();
        uow.engagement
            .expect_remove_from_wishlist()
            .returning(|_, _| Ok(false));

        let result = EngagementManager::new(uow.build())
            .remove_from_wishlist(Uuid::new_v4(), Uuid::new_v4())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
