//! Reviews, messages, notifications and wishlist entries.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::base::{convert_all, fetch_page};
use super::entities::{message, notification, review, wishlist};
use crate::domain::{Message, Notification, NotificationKind, Review, WishlistEntry};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

/// Review row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewInsert {
    pub booking_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub traveler_id: Uuid,
    pub rating: i16,
    pub title: Option<String>,
    pub comment: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Insert a verified review.
    async fn create_review(&self, insert: ReviewInsert) -> AppResult<Review>;

    async fn create_message(
        &self,
        booking_id: Uuid,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
    ) -> AppResult<Message>;

    async fn create_notification(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        title: String,
        content: String,
    ) -> AppResult<Notification>;

    async fn list_notifications(
        &self,
        recipient_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Notification>, u64)>;

    /// Mark one of the recipient's notifications read.
    async fn mark_notification_read(&self, recipient_id: Uuid, id: Uuid)
        -> AppResult<Notification>;

    /// Idempotent: an existing entry is returned unchanged.
    async fn add_to_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<WishlistEntry>;

    /// Returns false when the entry did not exist.
    async fn remove_from_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool>;

    async fn list_wishlist(&self, user_id: Uuid) -> AppResult<Vec<WishlistEntry>>;
}

pub struct EngagementStore {
    db: DatabaseConnection,
}

impl EngagementStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EngagementRepository for EngagementStore {
    async fn create_review(&self, insert: ReviewInsert) -> AppResult<Review> {
        let model = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_id: Set(insert.booking_id),
            listing_id: Set(insert.listing_id),
            traveler_id: Set(insert.traveler_id),
            rating: Set(insert.rating),
            title: Set(insert.title),
            comment: Set(insert.comment),
            verified: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(Review::from(model))
    }

    async fn create_message(
        &self,
        booking_id: Uuid,
        sender_id: Uuid,
        recipient_id: Uuid,
        content: String,
    ) -> AppResult<Message> {
        let model = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_id: Set(booking_id),
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            content: Set(content),
            read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(Message::from(model))
    }

    async fn create_notification(
        &self,
        recipient_id: Uuid,
        kind: NotificationKind,
        title: String,
        content: String,
    ) -> AppResult<Notification> {
        let model = notification::ActiveModel {
            id: Set(Uuid::new_v4()),
            recipient_id: Set(recipient_id),
            title: Set(title),
            content: Set(content),
            kind: Set(kind.as_str().to_string()),
            read: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Notification::try_from(model)
    }

    async fn list_notifications(
        &self,
        recipient_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Notification>, u64)> {
        let query = notification::Entity::find()
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .order_by_desc(notification::Column::CreatedAt);
        let (models, total) = fetch_page(query, &self.db, &params).await?;
        Ok((convert_all(models)?, total))
    }

    async fn mark_notification_read(
        &self,
        recipient_id: Uuid,
        id: Uuid,
    ) -> AppResult<Notification> {
        let model = notification::Entity::find_by_id(id)
            .filter(notification::Column::RecipientId.eq(recipient_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()?;

        let mut active: notification::ActiveModel = model.into();
        active.read = Set(true);
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Notification::try_from(model)
    }

    async fn add_to_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<WishlistEntry> {
        let existing = wishlist::Entity::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .filter(wishlist::Column::ListingId.eq(listing_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        if let Some(existing) = existing {
            return Ok(WishlistEntry::from(existing));
        }

        let model = wishlist::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            listing_id: Set(listing_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(WishlistEntry::from(model))
    }

    async fn remove_from_wishlist(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<bool> {
        let result = wishlist::Entity::delete_many()
            .filter(wishlist::Column::UserId.eq(user_id))
            .filter(wishlist::Column::ListingId.eq(listing_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_wishlist(&self, user_id: Uuid) -> AppResult<Vec<WishlistEntry>> {
        let models = wishlist::Entity::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .order_by_desc(wishlist::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(WishlistEntry::from).collect())
    }
}
