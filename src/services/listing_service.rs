//! Listing lifecycle: creation, moderation, modification requests and
//! deletion.
//!
//! Partners create listings in PENDING; admins holding LISTING_MANAGEMENT
//! approve or reject them. Changes to a listing go through a modification
//! request that an admin applies or rejects. Permission checks always run
//! before any upload or insert.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::{AccessControl, ImageUploader, Notifier};
use crate::domain::{
    validate_listing_permissions, AdminActionType, Listing, ListingDraft, ListingPatch,
    ListingStatus, ModificationRequest, ModificationStatus, NotificationKind, Partner,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Validate permissions, upload images and store a PENDING listing.
    async fn create_listing(
        &self,
        user_id: Uuid,
        draft: ListingDraft,
        images: Vec<Vec<u8>>,
    ) -> AppResult<Listing>;

    async fn get_listing(&self, listing_id: Uuid) -> AppResult<Listing>;

    /// Listings owned by the calling partner.
    async fn list_own(&self, user_id: Uuid) -> AppResult<Vec<Listing>>;

    async fn list_pending(
        &self,
        actor_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Listing>, u64)>;

    async fn approve_listing(&self, actor_id: Uuid, listing_id: Uuid) -> AppResult<Listing>;

    async fn reject_listing(
        &self,
        actor_id: Uuid,
        listing_id: Uuid,
        reason: String,
    ) -> AppResult<Listing>;

    /// Partner-side change proposal, reviewed by an admin.
    async fn request_update(
        &self,
        user_id: Uuid,
        listing_id: Uuid,
        patch: ListingPatch,
    ) -> AppResult<ModificationRequest>;

    /// Apply `patch`, approving `request_id` in the same transaction when given.
    async fn update_by_admin(
        &self,
        actor_id: Uuid,
        listing_id: Uuid,
        patch: ListingPatch,
        request_id: Option<Uuid>,
    ) -> AppResult<Listing>;

    async fn reject_modification_request(
        &self,
        actor_id: Uuid,
        request_id: Uuid,
        notes: String,
    ) -> AppResult<ModificationRequest>;

    /// Delete an owned listing that has no PENDING bookings.
    async fn delete_listing(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()>;
}

pub struct ListingManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: Arc<dyn AccessControl>,
    uploader: Arc<dyn ImageUploader>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> ListingManager<U> {
    pub fn new(
        uow: Arc<U>,
        access: Arc<dyn AccessControl>,
        uploader: Arc<dyn ImageUploader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            uow,
            access,
            uploader,
            notifier,
        }
    }

    async fn calling_partner(&self, user_id: Uuid) -> AppResult<Partner> {
        self.uow
            .partners()
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Partner account required"))
    }

    async fn find_listing(&self, listing_id: Uuid) -> AppResult<Listing> {
        self.uow
            .listings()
            .find_by_id(listing_id)
            .await?
            .ok_or_not_found()
    }

    /// A listing owned by someone else is reported as missing.
    async fn owned_listing(&self, partner: &Partner, listing_id: Uuid) -> AppResult<Listing> {
        let listing = self.find_listing(listing_id).await?;
        if listing.partner_id != partner.id {
            return Err(AppError::NotFound);
        }
        Ok(listing)
    }

    async fn require_listing_management(&self, actor_id: Uuid) -> AppResult<()> {
        self.access
            .require(actor_id, AdminActionType::ListingManagement)
            .await
            .map(|_| ())
    }

    async fn notify_owner(&self, partner_id: Uuid, title: &str, content: &str) {
        match self.uow.partners().find_by_id(partner_id).await {
            Ok(Some(partner)) => {
                self.notifier
                    .notify(partner.user_id, NotificationKind::ListingUpdate, title, content)
                    .await
            }
            Ok(None) => tracing::warn!(%partner_id, "Listing owner no longer exists"),
            Err(e) => tracing::warn!(%partner_id, error = %e, "Failed to look up listing owner"),
        }
    }

    async fn set_status(
        &self,
        actor_id: Uuid,
        listing_id: Uuid,
        status: ListingStatus,
        reason: Option<String>,
    ) -> AppResult<Listing> {
        self.require_listing_management(actor_id).await?;
        self.find_listing(listing_id).await?;

        let listing = self
            .uow
            .listings()
            .set_status(listing_id, status, reason)
            .await?;
        tracing::info!(%actor_id, %listing_id, status = %status, "Listing moderated");
        Ok(listing)
    }

    async fn pending_request(
        &self,
        request_id: Uuid,
        listing_id: Option<Uuid>,
    ) -> AppResult<ModificationRequest> {
        let request = self
            .uow
            .listings()
            .find_modification_request(request_id)
            .await?
            .ok_or_not_found()?;

        if listing_id.is_some_and(|id| id != request.listing_id) {
            return Err(AppError::validation(
                "Modification request does not belong to this listing",
            ));
        }
        if request.status != ModificationStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Modification request is already {}",
                request.status
            )));
        }
        Ok(request)
    }
}

#[async_trait]
impl<U: UnitOfWork> ListingService for ListingManager<U> {
    async fn create_listing(
        &self,
        user_id: Uuid,
        draft: ListingDraft,
        images: Vec<Vec<u8>>,
    ) -> AppResult<Listing> {
        draft.validate()?;
        let partner = self.calling_partner(user_id).await?;
        let grants = self.uow.catalog().grants_for_partner(partner.id).await?;
        validate_listing_permissions(&partner, &grants, &draft.scope())?;

        let image_urls = self.uploader.upload_listing_images(images).await?;
        let listing = self
            .uow
            .listings()
            .create(partner.id, draft, image_urls)
            .await?;

        tracing::info!(
            listing_id = %listing.id,
            partner_id = %partner.id,
            images = listing.images.len(),
            "Listing created"
        );
        Ok(listing)
    }

    async fn get_listing(&self, listing_id: Uuid) -> AppResult<Listing> {
        self.find_listing(listing_id).await
    }

    async fn list_own(&self, user_id: Uuid) -> AppResult<Vec<Listing>> {
        let partner = self.calling_partner(user_id).await?;
        self.uow.listings().list_by_partner(partner.id).await
    }

    async fn list_pending(
        &self,
        actor_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Listing>, u64)> {
        self.require_listing_management(actor_id).await?;
        self.uow.listings().list_pending(params).await
    }

    async fn approve_listing(&self, actor_id: Uuid, listing_id: Uuid) -> AppResult<Listing> {
        let listing = self
            .set_status(actor_id, listing_id, ListingStatus::Approved, None)
            .await?;

        self.notify_owner(
            listing.partner_id,
            "Listing Approved",
            &format!("Your listing \"{}\" has been approved.", listing.title),
        )
        .await;
        Ok(listing)
    }

    async fn reject_listing(
        &self,
        actor_id: Uuid,
        listing_id: Uuid,
        reason: String,
    ) -> AppResult<Listing> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(AppError::validation("Rejection reason is required"));
        }

        let listing = self
            .set_status(actor_id, listing_id, ListingStatus::Rejected, Some(reason.clone()))
            .await?;

        self.notify_owner(
            listing.partner_id,
            "Listing Rejected",
            &format!("Your listing \"{}\" was rejected: {}", listing.title, reason),
        )
        .await;
        Ok(listing)
    }

    async fn request_update(
        &self,
        user_id: Uuid,
        listing_id: Uuid,
        patch: ListingPatch,
    ) -> AppResult<ModificationRequest> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(AppError::validation("No changes provided"));
        }

        let partner = self.calling_partner(user_id).await?;
        self.owned_listing(&partner, listing_id).await?;

        let request = self
            .uow
            .listings()
            .create_modification_request(listing_id, partner.id, patch)
            .await?;
        tracing::info!(request_id = %request.id, %listing_id, "Listing modification requested");
        Ok(request)
    }

    async fn update_by_admin(
        &self,
        actor_id: Uuid,
        listing_id: Uuid,
        patch: ListingPatch,
        request_id: Option<Uuid>,
    ) -> AppResult<Listing> {
        self.require_listing_management(actor_id).await?;
        patch.validate()?;
        if patch.is_empty() {
            return Err(AppError::validation("No changes provided"));
        }

        let mut listing = self.find_listing(listing_id).await?;
        if let Some(request_id) = request_id {
            self.pending_request(request_id, Some(listing_id)).await?;
        }

        patch.apply(&mut listing);

        if patch.touches_permissions() {
            let partner = self
                .uow
                .partners()
                .find_by_id(listing.partner_id)
                .await?
                .ok_or_not_found()?;
            let grants = self.uow.catalog().grants_for_partner(partner.id).await?;
            validate_listing_permissions(&partner, &grants, &listing.scope())?;
        }

        let listing = self.uow.listings().apply_patch(listing, request_id).await?;
        tracing::info!(%actor_id, %listing_id, request_id = ?request_id, "Listing updated by admin");

        self.notify_owner(
            listing.partner_id,
            "Listing Updated",
            &format!("Changes to your listing \"{}\" have been applied.", listing.title),
        )
        .await;
        Ok(listing)
    }

    async fn reject_modification_request(
        &self,
        actor_id: Uuid,
        request_id: Uuid,
        notes: String,
    ) -> AppResult<ModificationRequest> {
        self.require_listing_management(actor_id).await?;
        self.pending_request(request_id, None).await?;

        let request = self
            .uow
            .listings()
            .reject_modification_request(request_id, notes)
            .await?;
        tracing::info!(%actor_id, %request_id, "Listing modification rejected");

        self.notify_owner(
            request.partner_id,
            "Modification Request Rejected",
            request
                .admin_notes
                .as_deref()
                .unwrap_or("Your requested listing changes were rejected."),
        )
        .await;
        Ok(request)
    }

    async fn delete_listing(&self, user_id: Uuid, listing_id: Uuid) -> AppResult<()> {
        let partner = self.calling_partner(user_id).await?;
        self.owned_listing(&partner, listing_id).await?;

        self.uow.listings().delete_cascade(listing_id).await?;
        tracing::info!(%listing_id, partner_id = %partner.id, "Listing deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Authorization, CustomerType, TourKind, UserRole};
    use crate::infra::unit_of_work::testing::{FrozenPersistence, MockPersistence};
    use crate::services::{fixtures, MockAccessControl, MockImageUploader, MockNotifier};

    struct Setup {
        uow: MockPersistence,
        access: MockAccessControl,
        uploader: MockImageUploader,
        notifier: MockNotifier,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                uow: MockPersistence::new(),
                access: MockAccessControl::new(),
                uploader: MockImageUploader::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn admin(mut self) -> Self {
            self.access
                .expect_require()
                .returning(|_, capability| Ok(Authorization::Granted(capability)));
            self
        }

        fn quiet(mut self) -> Self {
            self.notifier.expect_notify().return_const(());
            self
        }

        fn build(self) -> ListingManager<FrozenPersistence> {
            ListingManager::new(
                self.uow.build(),
                Arc::new(self.access),
                Arc::new(self.uploader),
                Arc::new(self.notifier),
            )
        }
    }

    fn draft(category_id: Uuid) -> ListingDraft {
        ListingDraft {
            title: "Hunza Valley Tour".into(),
            description: "Five days in Hunza".into(),
            category_id,
            sub_category_id: None,
            customer_type: Some(CustomerType::Local),
            tour_kind: Some(TourKind::Group),
            base_price: 4_500_000,
            currency: "PKR".into(),
            location: Some("Karimabad".into()),
            capacity: Some(15),
        }
    }

    fn stored(partner_id: Uuid, draft: ListingDraft, images: Vec<String>) -> Listing {
        let mut listing = fixtures::listing(partner_id, ListingStatus::Pending);
        listing.title = draft.title;
        listing.category_id = draft.category_id;
        listing.images = images;
        listing
    }

    #[tokio::test]
    async fn test_create_without_category_grant_uploads_nothing() {
        let user = fixtures::user(UserRole::Partner);
        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(fixtures::partner(user_id))));
        setup
            .uow
            .catalog
            .expect_grants_for_partner()
            .returning(|_| Ok(vec![]));
        setup.uploader.expect_upload_listing_images().never();
        setup.uow.listings.expect_create().never();

        let service = setup.build();
        let result = service
            .create_listing(user.id, draft(Uuid::new_v4()), vec![vec![1, 2, 3]])
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "No permission for this category"));
    }

    #[tokio::test]
    async fn test_create_with_grant_uploads_then_inserts() {
        let user = fixtures::user(UserRole::Partner);
        let category_id = Uuid::new_v4();
        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(fixtures::partner(user_id))));
        setup
            .uow
            .catalog
            .expect_grants_for_partner()
            .returning(move |partner_id| Ok(vec![fixtures::grant(partner_id, category_id, vec![])]));
        setup
            .uploader
            .expect_upload_listing_images()
            .times(1)
            .returning(|images| {
                Ok((0..images.len())
                    .map(|i| format!("https://cdn.test/listings/{}.jpg", i))
                    .collect())
            });
        setup
            .uow
            .listings
            .expect_create()
            .times(1)
            .returning(|partner_id, draft, images| Ok(stored(partner_id, draft, images)));

        let service = setup.build();
        let listing = service
            .create_listing(user.id, draft(category_id), vec![vec![1], vec![2]])
            .await
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.images.len(), 2);
    }

    #[tokio::test]
    async fn test_create_private_tour_without_flag_fails() {
        let user = fixtures::user(UserRole::Partner);
        let category_id = Uuid::new_v4();
        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(fixtures::partner(user_id))));
        setup
            .uow
            .catalog
            .expect_grants_for_partner()
            .returning(move |partner_id| Ok(vec![fixtures::grant(partner_id, category_id, vec![])]));
        setup.uploader.expect_upload_listing_images().never();

        let mut private = draft(category_id);
        private.tour_kind = Some(TourKind::Private);

        let result = setup.build().create_listing(user.id, private, vec![]).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg == "Private tours not allowed"));
    }

    #[tokio::test]
    async fn test_non_partner_cannot_create() {
        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(|_| Ok(None));

        let result = setup
            .build()
            .create_listing(Uuid::new_v4(), draft(Uuid::new_v4()), vec![])
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_approve_notifies_owner() {
        let partner = fixtures::partner(Uuid::new_v4());
        let owner = partner.user_id;
        let listing = fixtures::listing(partner.id, ListingStatus::Pending);
        let listing_id = listing.id;

        let mut setup = Setup::new().admin();
        let found = listing.clone();
        setup
            .uow
            .listings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        setup
            .uow
            .listings
            .expect_set_status()
            .withf(|_, status, reason| *status == ListingStatus::Approved && reason.is_none())
            .returning(move |_, status, _| {
                let mut approved = listing.clone();
                approved.status = status;
                Ok(approved)
            });
        setup
            .uow
            .partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(partner.clone())));
        setup
            .notifier
            .expect_notify()
            .withf(move |recipient, kind, title, _| {
                *recipient == owner
                    && *kind == NotificationKind::ListingUpdate
                    && title == "Listing Approved"
            })
            .times(1)
            .return_const(());

        let listing = setup
            .build()
            .approve_listing(Uuid::new_v4(), listing_id)
            .await
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Approved);
    }

    #[tokio::test]
    async fn test_moderation_requires_capability() {
        let mut setup = Setup::new();
        setup
            .access
            .expect_require()
            .returning(|_, _| Err(AppError::forbidden("Not authorized to perform this action")));
        setup.uow.listings.expect_set_status().never();

        let result = setup
            .build()
            .reject_listing(Uuid::new_v4(), Uuid::new_v4(), "Blurry photos".into())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_request_update_on_foreign_listing_not_found() {
        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(fixtures::partner(user_id))));
        setup
            .uow
            .listings
            .expect_find_by_id()
            .returning(|_| Ok(Some(fixtures::listing(Uuid::new_v4(), ListingStatus::Approved))));
        setup
            .uow
            .listings
            .expect_create_modification_request()
            .never();

        let patch = ListingPatch {
            base_price: Some(5_000_000),
            ..Default::default()
        };
        let result = setup
            .build()
            .request_update(Uuid::new_v4(), Uuid::new_v4(), patch)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_admin_update_applies_patch_and_request() {
        let partner = fixtures::partner(Uuid::new_v4());
        let listing = fixtures::listing(partner.id, ListingStatus::Approved);
        let listing_id = listing.id;
        let request = fixtures::modification_request(listing_id, partner.id, ModificationStatus::Pending);
        let request_id = request.id;

        let mut setup = Setup::new().admin().quiet();
        setup
            .uow
            .listings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));
        setup
            .uow
            .listings
            .expect_find_modification_request()
            .returning(move |_| Ok(Some(request.clone())));
        setup
            .uow
            .listings
            .expect_apply_patch()
            .withf(move |listing, request| {
                listing.base_price == 3_000_000 && *request == Some(request_id)
            })
            .times(1)
            .returning(|listing, _| Ok(listing));
        setup
            .uow
            .partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(partner.clone())));

        let patch = ListingPatch {
            base_price: Some(3_000_000),
            ..Default::default()
        };
        let updated = setup
            .build()
            .update_by_admin(Uuid::new_v4(), listing_id, patch, Some(request_id))
            .await
            .unwrap();

        assert_eq!(updated.base_price, 3_000_000);
    }

    #[tokio::test]
    async fn test_admin_update_rechecks_permissions() {
        let mut partner = fixtures::partner(Uuid::new_v4());
        partner.allow_international = false;
        let listing = fixtures::listing(partner.id, ListingStatus::Approved);
        let listing_id = listing.id;
        let category_id = listing.category_id;

        let mut setup = Setup::new().admin();
        setup
            .uow
            .listings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));
        setup
            .uow
            .partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(partner.clone())));
        setup
            .uow
            .catalog
            .expect_grants_for_partner()
            .returning(move |partner_id| Ok(vec![fixtures::grant(partner_id, category_id, vec![])]));
        setup.uow.listings.expect_apply_patch().never();

        let patch = ListingPatch {
            customer_type: Some(CustomerType::International),
            ..Default::default()
        };
        let result = setup
            .build()
            .update_by_admin(Uuid::new_v4(), listing_id, patch, None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.starts_with("Unauthorized customer type")));
    }

    #[tokio::test]
    async fn test_already_reviewed_request_cannot_be_rejected() {
        let request = fixtures::modification_request(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ModificationStatus::Approved,
        );
        let request_id = request.id;

        let mut setup = Setup::new().admin();
        setup
            .uow
            .listings
            .expect_find_modification_request()
            .returning(move |_| Ok(Some(request.clone())));
        setup
            .uow
            .listings
            .expect_reject_modification_request()
            .never();

        let result = setup
            .build()
            .reject_modification_request(Uuid::new_v4(), request_id, "No".into())
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_delete_with_pending_bookings_conflicts() {
        let user_id = Uuid::new_v4();
        let partner = fixtures::partner(user_id);
        let listing = fixtures::listing(partner.id, ListingStatus::Approved);
        let listing_id = listing.id;

        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(move |_| Ok(Some(partner.clone())));
        setup
            .uow
            .listings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));
        setup
            .uow
            .listings
            .expect_delete_cascade()
            .times(1)
            .returning(|_| {
                Err(AppError::invalid_state(
                    "Cannot delete listing with pending bookings",
                ))
            });

        let result = setup.build().delete_listing(user_id, listing_id).await;

        assert!(matches!(result, Err(AppError::InvalidState(msg)) if msg == "Cannot delete listing with pending bookings"));
    }

    #[tokio::test]
    async fn test_delete_without_pending_bookings_cascades() {
        let user_id = Uuid::new_v4();
        let partner = fixtures::partner(user_id);
        let listing = fixtures::listing(partner.id, ListingStatus::Approved);
        let listing_id = listing.id;

        let mut setup = Setup::new();
        setup
            .uow
            .partners
            .expect_find_by_user_id()
            .returning(move |_| Ok(Some(partner.clone())));
        setup
            .uow
            .listings
            .expect_find_by_id()
            .returning(move |_| Ok(Some(listing.clone())));
        setup
            .uow
            .listings
            .expect_delete_cascade()
            .withf(move |id| *id == listing_id)
            .times(1)
            .returning(|_| Ok(()));

        setup.build().delete_listing(user_id, listing_id).await.unwrap();
    }
}
