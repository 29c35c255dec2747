//! Admin capability grants.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::base::convert_all;
use super::entities::admin_action::{self, ActiveModel, Entity as AdminActionEntity};
use crate::domain::{AdminActionType, AdminGrant};
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Capabilities currently held by an admin.
    async fn grants_for(&self, admin_id: Uuid) -> AppResult<Vec<AdminActionType>>;

    /// Insert a grant; an existing identical grant is returned unchanged.
    async fn grant(&self, admin_id: Uuid, action: AdminActionType) -> AppResult<AdminGrant>;

    /// Returns false when no such grant existed.
    async fn revoke(&self, admin_id: Uuid, action: AdminActionType) -> AppResult<bool>;

    async fn list_grants(&self, admin_id: Uuid) -> AppResult<Vec<AdminGrant>>;
}

pub struct AdminStore {
    db: DatabaseConnection,
}

impl AdminStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_grant(
        &self,
        admin_id: Uuid,
        action: AdminActionType,
    ) -> AppResult<Option<admin_action::Model>> {
        AdminActionEntity::find()
            .filter(admin_action::Column::AdminId.eq(admin_id))
            .filter(admin_action::Column::ActionType.eq(action.as_str()))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl AdminRepository for AdminStore {
    async fn grants_for(&self, admin_id: Uuid) -> AppResult<Vec<AdminActionType>> {
        let grants = self.list_grants(admin_id).await?;
        Ok(grants.into_iter().map(|g| g.action_type).collect())
    }

    async fn grant(&self, admin_id: Uuid, action: AdminActionType) -> AppResult<AdminGrant> {
        if let Some(existing) = self.find_grant(admin_id, action).await? {
            return AdminGrant::try_from(existing);
        }

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            admin_id: Set(admin_id),
            action_type: Set(action.as_str().to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        AdminGrant::try_from(model)
    }

    async fn revoke(&self, admin_id: Uuid, action: AdminActionType) -> AppResult<bool> {
        let result = AdminActionEntity::delete_many()
            .filter(admin_action::Column::AdminId.eq(admin_id))
            .filter(admin_action::Column::ActionType.eq(action.as_str()))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_grants(&self, admin_id: Uuid) -> AppResult<Vec<AdminGrant>> {
        let models = AdminActionEntity::find()
            .filter(admin_action::Column::AdminId.eq(admin_id))
            .order_by_asc(admin_action::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        convert_all(models)
    }
}
