//! Partner repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::partner::{self, ActiveModel, Entity as PartnerEntity};
use super::entities::user::{ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::domain::{Partner, PartnerType, UserRole, VerificationStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::unit_of_work::{begin, settle};

/// Validated onboarding data ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPartner {
    pub user_id: Uuid,
    /// Display name submitted with the onboarding form
    pub user_name: String,
    pub partner_type: PartnerType,
    pub business_name: String,
    pub contact_person: String,
    pub phone_number: String,
    pub profile: serde_json::Value,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>>;

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Partner>>;

    /// Promote the user to PARTNER and create the partner row atomically.
    async fn onboard(&self, new_partner: NewPartner) -> AppResult<Partner>;

    async fn update_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<Partner>;

    async fn update_commission(&self, id: Uuid, rate: f64) -> AppResult<Partner>;

    /// Persist the capability flags of an already patched partner.
    async fn update_access(&self, partner: &Partner) -> AppResult<Partner>;
}

pub struct PartnerStore {
    db: DatabaseConnection,
}

impl PartnerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<partner::Model> {
        PartnerEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()
    }

    async fn save(&self, active: ActiveModel) -> AppResult<Partner> {
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Partner::try_from(model)
    }
}

#[async_trait]
impl PartnerRepository for PartnerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partner>> {
        PartnerEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Partner::try_from)
            .transpose()
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<Partner>> {
        PartnerEntity::find()
            .filter(partner::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Partner::try_from)
            .transpose()
    }

    async fn onboard(&self, new_partner: NewPartner) -> AppResult<Partner> {
        let txn = begin(&self.db).await?;

        let result = async {
            let user = UserEntity::find_by_id(new_partner.user_id)
                .one(&txn)
                .await?
                .ok_or(AppError::NotFound)?;

            let mut user: UserActiveModel = user.into();
            user.name = Set(new_partner.user_name);
            user.role = Set(UserRole::Partner.as_str().to_string());
            user.updated_at = Set(Utc::now());
            user.update(&txn).await?;

            let now = Utc::now();
            let model = ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(new_partner.user_id),
                partner_type: Set(new_partner.partner_type.as_str().to_string()),
                verification_status: Set(VerificationStatus::Pending.as_str().to_string()),
                commission_rate: Set(0.0),
                allow_international: Set(false),
                allow_group: Set(false),
                allow_private: Set(false),
                business_name: Set(new_partner.business_name),
                contact_person: Set(new_partner.contact_person),
                phone_number: Set(new_partner.phone_number),
                profile: Set(new_partner.profile),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;

            Partner::try_from(model)
        }
        .await;

        settle(txn, result).await
    }

    async fn update_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> AppResult<Partner> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.verification_status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now());
        self.save(active).await
    }

    async fn update_commission(&self, id: Uuid, rate: f64) -> AppResult<Partner> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.commission_rate = Set(rate);
        active.updated_at = Set(Utc::now());
        self.save(active).await
    }

    async fn update_access(&self, partner: &Partner) -> AppResult<Partner> {
        let mut active: ActiveModel = self.find_model(partner.id).await?.into();
        active.allow_international = Set(partner.allow_international);
        active.allow_group = Set(partner.allow_group);
        active.allow_private = Set(partner.allow_private);
        active.updated_at = Set(Utc::now());
        self.save(active).await
    }
}
