//! Partner onboarding and partner administration.
//!
//! Onboarding turns an existing account into a PENDING partner. Admins with
//! the matching capability then verify the partner, set its commission,
//! toggle what it may offer and grant it categories to list under.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::auth_service::normalize_email;
use super::{AccessControl, Notifier};
use crate::domain::{
    AdminActionType, CategoryGrant, CategoryGrantUpdate, NotificationKind, Partner,
    PartnerAccessPatch, PartnerOnboarding, PartnerProfile, UserRole, VerificationStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::NewPartner;
use crate::infra::UnitOfWork;

/// A partner together with the categories it may list under.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PartnerProfileView {
    pub partner: Partner,
    pub categories: Vec<CategoryGrant>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PartnerService: Send + Sync {
    /// Validate the type-specific profile and promote the account.
    async fn initiate_onboarding(&self, payload: PartnerOnboarding) -> AppResult<Partner>;

    /// Calling partner's profile and category grants.
    async fn get_profile(&self, user_id: Uuid) -> AppResult<PartnerProfileView>;

    async fn update_verification_status(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<Partner>;

    /// Commission in percent, 0 to 100 inclusive.
    async fn update_commission(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        rate: f64,
    ) -> AppResult<Partner>;

    async fn update_access(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        patch: PartnerAccessPatch,
    ) -> AppResult<Partner>;

    async fn update_categories(
        &self,
        actor_id: Uuid,
        update: CategoryGrantUpdate,
    ) -> AppResult<CategoryGrant>;
}

pub struct PartnerManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: Arc<dyn AccessControl>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> PartnerManager<U> {
    pub fn new(uow: Arc<U>, access: Arc<dyn AccessControl>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            uow,
            access,
            notifier,
        }
    }

    async fn find_partner(&self, partner_id: Uuid) -> AppResult<Partner> {
        self.uow
            .partners()
            .find_by_id(partner_id)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl<U: UnitOfWork> PartnerService for PartnerManager<U> {
    async fn initiate_onboarding(&self, payload: PartnerOnboarding) -> AppResult<Partner> {
        payload.validate()?;
        let profile = PartnerProfile::parse(payload.partner_type, payload.data)?;

        let email = normalize_email(&payload.user.email);
        let user = self
            .uow
            .users()
            .find_by_email(&email)
            .await?
            .ok_or_not_found()?;

        if user.role != UserRole::Traveler
            || self.uow.partners().find_by_user_id(user.id).await?.is_some()
        {
            return Err(AppError::conflict("Partner"));
        }

        let business = profile.business();
        let new_partner = NewPartner {
            user_id: user.id,
            user_name: payload.user.name.trim().to_string(),
            partner_type: payload.partner_type,
            business_name: business.business_name.clone(),
            contact_person: business.contact_person.clone(),
            phone_number: business.phone_number.clone(),
            profile: profile.to_json()?,
        };

        let partner = self.uow.partners().onboard(new_partner).await?;
        tracing::info!(
            partner_id = %partner.id,
            user_id = %user.id,
            partner_type = %partner.partner_type,
            "Partner onboarding submitted"
        );

        Ok(partner)
    }

    async fn get_profile(&self, user_id: Uuid) -> AppResult<PartnerProfileView> {
        let partner = self
            .uow
            .partners()
            .find_by_user_id(user_id)
            .await?
            .ok_or_not_found()?;
        let categories = self.uow.catalog().grants_for_partner(partner.id).await?;

        Ok(PartnerProfileView {
            partner,
            categories,
        })
    }

    async fn update_verification_status(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<Partner> {
        self.access
            .require_any(
                actor_id,
                &[
                    AdminActionType::PartnerApproval,
                    AdminActionType::PartnerManagement,
                ],
            )
            .await?;

        let verb = match status {
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::Pending => {
                return Err(AppError::validation(
                    "Verification status must be APPROVED or REJECTED",
                ))
            }
        };

        self.find_partner(partner_id).await?;
        let partner = self
            .uow
            .partners()
            .update_verification(partner_id, status)
            .await?;
        tracing::info!(%actor_id, %partner_id, status = %status, "Partner verification updated");

        let message = format!("Your partner account has been {}.", verb);
        self.notifier
            .notify(
                partner.user_id,
                NotificationKind::AccountUpdate,
                "Partner Verification Update",
                &message,
            )
            .await;
        self.notifier
            .email_user(partner.user_id, "Partner Verification Update", &message)
            .await;

        Ok(partner)
    }

    async fn update_commission(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        rate: f64,
    ) -> AppResult<Partner> {
        self.access
            .require(actor_id, AdminActionType::PartnerManagement)
            .await?;

        if !(0.0..=100.0).contains(&rate) {
            return Err(AppError::validation("Commission rate must be between 0 and 100"));
        }

        self.find_partner(partner_id).await?;
        let partner = self.uow.partners().update_commission(partner_id, rate).await?;
        tracing::info!(%actor_id, %partner_id, rate, "Partner commission updated");
        Ok(partner)
    }

    async fn update_access(
        &self,
        actor_id: Uuid,
        partner_id: Uuid,
        patch: PartnerAccessPatch,
    ) -> AppResult<Partner> {
        self.access
            .require(actor_id, AdminActionType::PartnerManagement)
            .await?;

        if patch.is_empty() {
            return Err(AppError::validation("No access changes provided"));
        }

        let mut partner = self.find_partner(partner_id).await?;
        patch.apply(&mut partner);
        let partner = self.uow.partners().update_access(&partner).await?;
        tracing::info!(%actor_id, %partner_id, ?patch, "Partner access updated");

        self.notifier
            .notify(
                partner.user_id,
                NotificationKind::AccountUpdate,
                "Access Permissions Updated",
                "Your partner access permissions have been updated.",
            )
            .await;

        Ok(partner)
    }

    async fn update_categories(
        &self,
        actor_id: Uuid,
        update: CategoryGrantUpdate,
    ) -> AppResult<CategoryGrant> {
        self.access
            .require(actor_id, AdminActionType::CategoryManagement)
            .await?;

        self.find_partner(update.partner_id).await?;
        self.uow
            .catalog()
            .find_category(update.category_id)
            .await?
            .ok_or_not_found()?;

        if let Some(requested) = &update.sub_category_ids {
            let known: Vec<Uuid> = self
                .uow
                .catalog()
                .sub_categories_of(update.category_id)
                .await?
                .into_iter()
                .map(|sub| sub.id)
                .collect();

            if let Some(stray) = requested.iter().find(|id| !known.contains(id)) {
                return Err(AppError::validation(format!(
                    "Sub-category {} does not belong to the category",
                    stray
                )));
            }
        }

        let existing = self
            .uow
            .catalog()
            .find_grant(update.partner_id, update.category_id)
            .await?;
        let grant = self.uow.catalog().upsert_grant(update.merge(existing)).await?;

        tracing::info!(
            %actor_id,
            partner_id = %grant.partner_id,
            category_id = %grant.category_id,
            "Partner category grant updated"
        );
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OnboardingUser, PartnerType, SubCategory};
    use crate::infra::unit_of_work::testing::{FrozenPersistence, MockPersistence};
    use crate::services::{fixtures, MockAccessControl, MockNotifier};
    use chrono::Utc;
    use serde_json::json;

    fn allow_all() -> MockAccessControl {
        let mut access = MockAccessControl::new();
        access
            .expect_require()
            .returning(|_, capability| Ok(crate::domain::Authorization::Granted(capability)));
        access
            .expect_require_any()
            .returning(|_, _| Ok(crate::domain::Authorization::SuperAdmin));
        access
    }

    fn quiet_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().return_const(());
        notifier.expect_email().return_const(());
        notifier.expect_email_user().return_const(());
        notifier
    }

    fn manager(
        uow: MockPersistence,
        access: MockAccessControl,
        notifier: MockNotifier,
    ) -> PartnerManager<FrozenPersistence> {
        PartnerManager::new(uow.build(), Arc::new(access), Arc::new(notifier))
    }

    fn hotel_onboarding(email: &str) -> PartnerOnboarding {
        PartnerOnboarding {
            partner_type: PartnerType::Hotel,
            user: OnboardingUser {
                name: "Ali Raza".into(),
                email: email.into(),
            },
            data: json!({
                "business_name": "Hunza Serena",
                "contact_person": "Ali Raza",
                "phone_number": "03001234567",
                "total_rooms": 24,
                "year_established": 1998,
            }),
        }
    }

    #[tokio::test]
    async fn test_onboarding_promotes_traveler() {
        let user = fixtures::user(UserRole::Traveler);
        let user_id = user.id;
        let email = user.email.clone();

        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        uow.partners.expect_find_by_user_id().returning(|_| Ok(None));
        uow.partners
            .expect_onboard()
            .withf(move |p| {
                p.user_id == user_id
                    && p.business_name == "Hunza Serena"
                    && p.partner_type == PartnerType::Hotel
            })
            .times(1)
            .returning(|p| {
                let mut partner = fixtures::partner(p.user_id);
                partner.partner_type = p.partner_type;
                partner.verification_status = VerificationStatus::Pending;
                Ok(partner)
            });

        let service = manager(uow, MockAccessControl::new(), MockNotifier::new());
        let partner = service
            .initiate_onboarding(hotel_onboarding(&email))
            .await
            .unwrap();

        assert_eq!(partner.user_id, user_id);
        assert_eq!(partner.verification_status, VerificationStatus::Pending);
    }

    #[tokio::test]
    async fn test_onboarding_rejects_invalid_profile() {
        let mut payload = hotel_onboarding("a@example.com");
        payload.data["total_rooms"] = json!(0);

        let mut uow = MockPersistence::new();
        uow.partners.expect_onboard().never();

        let service = manager(uow, MockAccessControl::new(), MockNotifier::new());
        let result = service.initiate_onboarding(payload).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_existing_partner_conflicts() {
        let user = fixtures::user(UserRole::Partner);
        let email = user.email.clone();

        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        uow.partners
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(fixtures::partner(user_id))));
        uow.partners.expect_onboard().never();

        let service = manager(uow, MockAccessControl::new(), MockNotifier::new());
        let result = service.initiate_onboarding(hotel_onboarding(&email)).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_verification_notifies_and_emails_partner() {
        let partner = fixtures::partner(Uuid::new_v4());
        let partner_id = partner.id;
        let owner = partner.user_id;

        let mut uow = MockPersistence::new();
        let found = partner.clone();
        uow.partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        uow.partners
            .expect_update_verification()
            .returning(move |_, status| {
                let mut updated = partner.clone();
                updated.verification_status = status;
                Ok(updated)
            });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |recipient, kind, _, content| {
                *recipient == owner
                    && *kind == NotificationKind::AccountUpdate
                    && content.contains("approved")
            })
            .times(1)
            .return_const(());
        notifier
            .expect_email_user()
            .withf(move |recipient, _, _| *recipient == owner)
            .times(1)
            .return_const(());

        let service = manager(uow, allow_all(), notifier);
        let updated = service
            .update_verification_status(Uuid::new_v4(), partner_id, VerificationStatus::Approved)
            .await
            .unwrap();

        assert_eq!(updated.verification_status, VerificationStatus::Approved);
    }

    #[tokio::test]
    async fn test_verification_back_to_pending_is_invalid() {
        let service = manager(MockPersistence::new(), allow_all(), MockNotifier::new());
        let result = service
            .update_verification_status(Uuid::new_v4(), Uuid::new_v4(), VerificationStatus::Pending)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_commission_bounds() {
        let service = manager(MockPersistence::new(), allow_all(), MockNotifier::new());

        for rate in [-0.5, 100.5, f64::NAN] {
            let result = service
                .update_commission(Uuid::new_v4(), Uuid::new_v4(), rate)
                .await;
            assert!(matches!(result, Err(AppError::Validation(_))), "rate {}", rate);
        }
    }

    #[tokio::test]
    async fn test_empty_access_patch_rejected() {
        let service = manager(MockPersistence::new(), allow_all(), MockNotifier::new());
        let result = service
            .update_access(Uuid::new_v4(), Uuid::new_v4(), PartnerAccessPatch::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_access_patch_applies_flags() {
        let partner = fixtures::partner(Uuid::new_v4());
        let partner_id = partner.id;

        let mut uow = MockPersistence::new();
        uow.partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(partner.clone())));
        uow.partners
            .expect_update_access()
            .withf(|p| p.allow_international && p.allow_group && !p.allow_private)
            .times(1)
            .returning(|p| Ok(p.clone()));

        let service = manager(uow, allow_all(), quiet_notifier());
        let patch = PartnerAccessPatch {
            allow_international: Some(true),
            ..Default::default()
        };
        let updated = service
            .update_access(Uuid::new_v4(), partner_id, patch)
            .await
            .unwrap();

        assert!(updated.allow_international);
    }

    #[tokio::test]
    async fn test_category_grant_rejects_foreign_sub_category() {
        let partner = fixtures::partner(Uuid::new_v4());
        let partner_id = partner.id;
        let category_id = Uuid::new_v4();
        let own_sub = Uuid::new_v4();

        let mut uow = MockPersistence::new();
        uow.partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(partner.clone())));
        uow.catalog.expect_find_category().returning(|id| {
            Ok(Some(crate::domain::Category {
                id,
                name: "Tours".into(),
                kind: crate::domain::CategoryKind::Tour,
                description: None,
                created_at: Utc::now(),
            }))
        });
        uow.catalog.expect_sub_categories_of().returning(move |category_id| {
            Ok(vec![SubCategory {
                id: own_sub,
                category_id,
                name: "Trekking".into(),
                description: None,
                required_fields: None,
                created_at: Utc::now(),
            }])
        });
        uow.catalog.expect_upsert_grant().never();

        let service = manager(uow, allow_all(), MockNotifier::new());
        let update = CategoryGrantUpdate {
            partner_id,
            category_id,
            sub_category_ids: Some(vec![own_sub, Uuid::new_v4()]),
            tour_type_ids: None,
            tour_theme_ids: None,
        };
        let result = service.update_categories(Uuid::new_v4(), update).await;

        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("does not belong")));
    }

    #[tokio::test]
    async fn test_category_grant_merges_with_existing() {
        let partner = fixtures::partner(Uuid::new_v4());
        let partner_id = partner.id;
        let category_id = Uuid::new_v4();
        let existing = fixtures::grant(partner_id, category_id, vec![Uuid::new_v4()]);
        let existing_id = existing.id;
        let kept_subs = existing.sub_category_ids.clone();
        let tour_type = Uuid::new_v4();

        let mut uow = MockPersistence::new();
        uow.partners
            .expect_find_by_id()
            .returning(move |_| Ok(Some(partner.clone())));
        uow.catalog.expect_find_category().returning(|id| {
            Ok(Some(crate::domain::Category {
                id,
                name: "Tours".into(),
                kind: crate::domain::CategoryKind::Tour,
                description: None,
                created_at: Utc::now(),
            }))
        });
        uow.catalog
            .expect_find_grant()
            .returning(move |_, _| Ok(Some(existing.clone())));
        uow.catalog
            .expect_upsert_grant()
            .times(1)
            .returning(|grant| Ok(grant));

        let service = manager(uow, allow_all(), MockNotifier::new());
        let update = CategoryGrantUpdate {
            partner_id,
            category_id,
            sub_category_ids: None,
            tour_type_ids: Some(vec![tour_type]),
            tour_theme_ids: None,
        };
        let grant = service.update_categories(Uuid::new_v4(), update).await.unwrap();

        assert_eq!(grant.id, existing_id);
        assert_eq!(grant.sub_category_ids, kept_subs);
        assert_eq!(grant.tour_type_ids, vec![tour_type]);
    }

    #[tokio::test]
    async fn test_profile_includes_grants() {
        let user_id = Uuid::new_v4();
        let mut uow = MockPersistence::new();
        uow.partners
            .expect_find_by_user_id()
            .returning(|user_id| Ok(Some(fixtures::partner(user_id))));
        uow.catalog
            .expect_grants_for_partner()
            .returning(|partner_id| Ok(vec![fixtures::grant(partner_id, Uuid::new_v4(), vec![])]));

        let service = manager(uow, MockAccessControl::new(), MockNotifier::new());
        let view = service.get_profile(user_id).await.unwrap();

        assert_eq!(view.partner.user_id, user_id);
        assert_eq!(view.categories.len(), 1);
    }
}
