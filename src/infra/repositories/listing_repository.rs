//! Listing repository, including modification requests and the
//! cascade delete.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::base::{convert_all, fetch_page};
use super::entities::{
    booking, listing, modification_request, review, wishlist,
};
use crate::domain::{
    BookingStatus, Listing, ListingDraft, ListingPatch, ListingStatus, ModificationRequest,
    ModificationStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::unit_of_work::{begin, settle};
use crate::types::PaginationParams;

/// Admin note recorded when a modification request is applied.
pub const CHANGES_APPLIED_NOTE: &str = "Changes approved and applied";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Insert a PENDING listing.
    async fn create(
        &self,
        partner_id: Uuid,
        draft: ListingDraft,
        images: Vec<String>,
    ) -> AppResult<Listing>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>>;

    async fn list_by_partner(&self, partner_id: Uuid) -> AppResult<Vec<Listing>>;

    async fn list_pending(&self, params: PaginationParams) -> AppResult<(Vec<Listing>, u64)>;

    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
        rejection_reason: Option<String>,
    ) -> AppResult<Listing>;

    async fn create_modification_request(
        &self,
        listing_id: Uuid,
        partner_id: Uuid,
        patch: ListingPatch,
    ) -> AppResult<ModificationRequest>;

    async fn find_modification_request(&self, id: Uuid)
        -> AppResult<Option<ModificationRequest>>;

    async fn reject_modification_request(
        &self,
        id: Uuid,
        notes: String,
    ) -> AppResult<ModificationRequest>;

    /// Store an already patched listing and, when given, mark the
    /// modification request approved in the same transaction.
    async fn apply_patch(
        &self,
        listing: Listing,
        request_id: Option<Uuid>,
    ) -> AppResult<Listing>;

    /// Delete reviews, wishlist entries, modification requests and the
    /// listing in one transaction. Bookings keep a null listing reference.
    /// Refused while the listing has PENDING bookings.
    async fn delete_cascade(&self, listing_id: Uuid) -> AppResult<()>;
}

pub struct ListingStore {
    db: DatabaseConnection,
}

impl ListingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<listing::Model> {
        listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()
    }

    async fn find_request_model(&self, id: Uuid) -> AppResult<modification_request::Model> {
        modification_request::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()
    }
}

fn images_json(images: &[String]) -> serde_json::Value {
    serde_json::Value::Array(
        images
            .iter()
            .map(|url| serde_json::Value::String(url.clone()))
            .collect(),
    )
}

#[async_trait]
impl ListingRepository for ListingStore {
    async fn create(
        &self,
        partner_id: Uuid,
        draft: ListingDraft,
        images: Vec<String>,
    ) -> AppResult<Listing> {
        let now = Utc::now();
        let model = listing::ActiveModel {
            id: Set(Uuid::new_v4()),
            partner_id: Set(partner_id),
            title: Set(draft.title),
            description: Set(draft.description),
            category_id: Set(draft.category_id),
            sub_category_id: Set(draft.sub_category_id),
            customer_type: Set(draft.customer_type.map(|c| c.as_str().to_string())),
            tour_kind: Set(draft.tour_kind.map(|k| k.as_str().to_string())),
            base_price: Set(draft.base_price),
            currency: Set(draft.currency),
            location: Set(draft.location),
            capacity: Set(draft.capacity),
            images: Set(images_json(&images)),
            status: Set(ListingStatus::Pending.as_str().to_string()),
            rejection_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Listing::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        listing::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Listing::try_from)
            .transpose()
    }

    async fn list_by_partner(&self, partner_id: Uuid) -> AppResult<Vec<Listing>> {
        let models = listing::Entity::find()
            .filter(listing::Column::PartnerId.eq(partner_id))
            .order_by_desc(listing::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        convert_all(models)
    }

    async fn list_pending(&self, params: PaginationParams) -> AppResult<(Vec<Listing>, u64)> {
        let query = listing::Entity::find()
            .filter(listing::Column::Status.eq(ListingStatus::Pending.as_str()))
            .order_by_asc(listing::Column::CreatedAt);
        let (models, total) = fetch_page(query, &self.db, &params).await?;
        Ok((convert_all(models)?, total))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ListingStatus,
        rejection_reason: Option<String>,
    ) -> AppResult<Listing> {
        let mut active: listing::ActiveModel = self.find_model(id).await?.into();
        active.status = Set(status.as_str().to_string());
        active.rejection_reason = Set(rejection_reason);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Listing::try_from(model)
    }

    async fn create_modification_request(
        &self,
        listing_id: Uuid,
        partner_id: Uuid,
        patch: ListingPatch,
    ) -> AppResult<ModificationRequest> {
        let patch = serde_json::to_value(&patch)
            .map_err(|e| AppError::internal(format!("Failed to encode listing patch: {}", e)))?;
        let now = Utc::now();
        let model = modification_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            listing_id: Set(listing_id),
            partner_id: Set(partner_id),
            patch: Set(patch),
            status: Set(ModificationStatus::Pending.as_str().to_string()),
            admin_notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        ModificationRequest::try_from(model)
    }

    async fn find_modification_request(
        &self,
        id: Uuid,
    ) -> AppResult<Option<ModificationRequest>> {
        modification_request::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(ModificationRequest::try_from)
            .transpose()
    }

    async fn reject_modification_request(
        &self,
        id: Uuid,
        notes: String,
    ) -> AppResult<ModificationRequest> {
        let mut active: modification_request::ActiveModel =
            self.find_request_model(id).await?.into();
        active.status = Set(ModificationStatus::Rejected.as_str().to_string());
        active.admin_notes = Set(Some(notes));
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        ModificationRequest::try_from(model)
    }

    async fn apply_patch(
        &self,
        listing: Listing,
        request_id: Option<Uuid>,
    ) -> AppResult<Listing> {
        let txn = begin(&self.db).await?;

        let result = async {
            let current = listing::Entity::find_by_id(listing.id)
                .one(&txn)
                .await?
                .ok_or(AppError::NotFound)?;

            let now = Utc::now();
            let mut active: listing::ActiveModel = current.into();
            active.title = Set(listing.title.clone());
            active.description = Set(listing.description.clone());
            active.category_id = Set(listing.category_id);
            active.sub_category_id = Set(listing.sub_category_id);
            active.customer_type = Set(listing.customer_type.map(|c| c.as_str().to_string()));
            active.tour_kind = Set(listing.tour_kind.map(|k| k.as_str().to_string()));
            active.base_price = Set(listing.base_price);
            active.location = Set(listing.location.clone());
            active.capacity = Set(listing.capacity);
            active.images = Set(images_json(&listing.images));
            active.updated_at = Set(now);
            let model = active.update(&txn).await?;

            if let Some(request_id) = request_id {
                let request = modification_request::Entity::find_by_id(request_id)
                    .one(&txn)
                    .await?
                    .ok_or(AppError::NotFound)?;
                let mut request: modification_request::ActiveModel = request.into();
                request.status = Set(ModificationStatus::Approved.as_str().to_string());
                request.admin_notes = Set(Some(CHANGES_APPLIED_NOTE.to_string()));
                request.updated_at = Set(now);
                request.update(&txn).await?;
            }

            Listing::try_from(model)
        }
        .await;

        settle(txn, result).await
    }

    async fn delete_cascade(&self, listing_id: Uuid) -> AppResult<()> {
        let txn = begin(&self.db).await?;

        let result = async {
            // Row lock conflicts with the key-share lock a booking insert
            // takes, so no new booking can slip in before the count.
            listing::Entity::find_by_id(listing_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or(AppError::NotFound)?;

            let pending = booking::Entity::find()
                .filter(booking::Column::ListingId.eq(listing_id))
                .filter(booking::Column::Status.eq(BookingStatus::Pending.as_str()))
                .count(&txn)
                .await?;
            if pending > 0 {
                return Err(AppError::invalid_state(
                    "Cannot delete listing with pending bookings",
                ));
            }

            review::Entity::delete_many()
                .filter(review::Column::ListingId.eq(listing_id))
                .exec(&txn)
                .await?;
            wishlist::Entity::delete_many()
                .filter(wishlist::Column::ListingId.eq(listing_id))
                .exec(&txn)
                .await?;
            modification_request::Entity::delete_many()
                .filter(modification_request::Column::ListingId.eq(listing_id))
                .exec(&txn)
                .await?;
            booking::Entity::update_many()
                .col_expr(booking::Column::ListingId, Expr::value(Option::<Uuid>::None))
                .filter(booking::Column::ListingId.eq(listing_id))
                .exec(&txn)
                .await?;

            listing::Entity::delete_by_id(listing_id).exec(&txn).await?;
            Ok(())
        }
        .await;

        settle(txn, result).await
    }
}
