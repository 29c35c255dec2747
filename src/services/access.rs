//! Capability checks for admin-only operations.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::{authorize, AdminActionType, Authorization};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

const NOT_AUTHORIZED: &str = "Not authorized to perform this action";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// Require a single capability.
    async fn require(&self, actor_id: Uuid, capability: AdminActionType)
        -> AppResult<Authorization>;

    /// Require any one of `capabilities`.
    async fn require_any(
        &self,
        actor_id: Uuid,
        capabilities: &[AdminActionType],
    ) -> AppResult<Authorization>;

    /// Require the SUPER_ADMIN role.
    async fn require_super_admin(&self, actor_id: Uuid) -> AppResult<()>;
}

pub struct AccessGuard<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccessGuard<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccessControl for AccessGuard<U> {
    async fn require(
        &self,
        actor_id: Uuid,
        capability: AdminActionType,
    ) -> AppResult<Authorization> {
        self.require_any(actor_id, &[capability]).await
    }

    async fn require_any(
        &self,
        actor_id: Uuid,
        capabilities: &[AdminActionType],
    ) -> AppResult<Authorization> {
        let actor = self
            .uow
            .users()
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| AppError::forbidden(NOT_AUTHORIZED))?;

        let held = if actor.is_super_admin() {
            Vec::new()
        } else {
            self.uow.admins().grants_for(actor_id).await?
        };

        match authorize(actor.role, &held, capabilities) {
            Some(authorization) => Ok(authorization),
            None => {
                tracing::debug!(%actor_id, ?capabilities, "Capability check failed");
                Err(AppError::forbidden(NOT_AUTHORIZED))
            }
        }
    }

    async fn require_super_admin(&self, actor_id: Uuid) -> AppResult<()> {
        match self.uow.users().find_by_id(actor_id).await? {
            Some(actor) if actor.is_super_admin() => Ok(()),
            _ => Err(AppError::forbidden(NOT_AUTHORIZED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::unit_of_work::testing::MockPersistence;
    use crate::services::fixtures;

    fn with_actor(role: UserRole) -> (MockPersistence, Uuid) {
        let actor = fixtures::user(role);
        let id = actor.id;
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(actor.clone())));
        (uow, id)
    }

    #[tokio::test]
    async fn test_super_admin_skips_grant_lookup() {
        let (mut uow, id) = with_actor(UserRole::SuperAdmin);
        uow.admins.expect_grants_for().never();

        let guard = AccessGuard::new(uow.build());
        let result = guard.require(id, AdminActionType::ListingManagement).await;

        assert_eq!(result.unwrap(), Authorization::SuperAdmin);
    }

    #[tokio::test]
    async fn test_admin_with_grant_passes() {
        let (mut uow, id) = with_actor(UserRole::Admin);
        uow.admins
            .expect_grants_for()
            .returning(|_| Ok(vec![AdminActionType::PartnerManagement]));

        let guard = AccessGuard::new(uow.build());
        let result = guard
            .require_any(
                id,
                &[AdminActionType::PartnerApproval, AdminActionType::PartnerManagement],
            )
            .await;

        assert_eq!(
            result.unwrap(),
            Authorization::Granted(AdminActionType::PartnerManagement)
        );
    }

    #[tokio::test]
    async fn test_admin_without_grant_is_forbidden() {
        let (mut uow, id) = with_actor(UserRole::Admin);
        uow.admins
            .expect_grants_for()
            .returning(|_| Ok(vec![AdminActionType::CategoryManagement]));

        let guard = AccessGuard::new(uow.build());
        let result = guard.require(id, AdminActionType::ListingManagement).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_unknown_actor_is_forbidden() {
        let mut uow = MockPersistence::new();
        uow.users.expect_find_by_id().returning(|_| Ok(None));

        let guard = AccessGuard::new(uow.build());
        let result = guard
            .require(Uuid::new_v4(), AdminActionType::CategoryManagement)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_plain_admin_is_not_super_admin() {
        let (uow, id) = with_actor(UserRole::Admin);
        let guard = AccessGuard::new(uow.build());

        assert!(matches!(
            guard.require_super_admin(id).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
