//! Back-office account administration: capability grants and promotion.
//!
//! Every operation here is reserved to SUPER_ADMIN.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::{AccessControl, Notifier};
use crate::domain::{AdminActionType, AdminGrant, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// Grant a capability to an ADMIN user. Idempotent.
    async fn grant_capability(
        &self,
        actor_id: Uuid,
        admin_id: Uuid,
        action: AdminActionType,
    ) -> AppResult<AdminGrant>;

    async fn revoke_capability(
        &self,
        actor_id: Uuid,
        admin_id: Uuid,
        action: AdminActionType,
    ) -> AppResult<()>;

    async fn list_grants(&self, actor_id: Uuid, admin_id: Uuid) -> AppResult<Vec<AdminGrant>>;

    /// Turn an existing account into an ADMIN with no capabilities.
    async fn promote_to_admin(&self, actor_id: Uuid, user_id: Uuid) -> AppResult<User>;
}

pub struct AdminManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: Arc<dyn AccessControl>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> AdminManager<U> {
    pub fn new(uow: Arc<U>, access: Arc<dyn AccessControl>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            uow,
            access,
            notifier,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AdminService for AdminManager<U> {
    async fn grant_capability(
        &self,
        actor_id: Uuid,
        admin_id: Uuid,
        action: AdminActionType,
    ) -> AppResult<AdminGrant> {
        self.access.require_super_admin(actor_id).await?;

        let admin = self.uow.users().find_by_id(admin_id).await?.ok_or_not_found()?;
        if admin.role != UserRole::Admin {
            return Err(AppError::validation("Capabilities can only be granted to admins"));
        }

        let grant = self.uow.admins().grant(admin_id, action).await?;
        tracing::info!(%actor_id, %admin_id, action = %action, "Capability granted");
        Ok(grant)
    }

    async fn revoke_capability(
        &self,
        actor_id: Uuid,
        admin_id: Uuid,
        action: AdminActionType,
    ) -> AppResult<()> {
        self.access.require_super_admin(actor_id).await?;

        if !self.uow.admins().revoke(admin_id, action).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(%actor_id, %admin_id, action = %action, "Capability revoked");
        Ok(())
    }

    async fn list_grants(&self, actor_id: Uuid, admin_id: Uuid) -> AppResult<Vec<AdminGrant>> {
        self.access.require_super_admin(actor_id).await?;
        self.uow.admins().list_grants(admin_id).await
    }

    async fn promote_to_admin(&self, actor_id: Uuid, user_id: Uuid) -> AppResult<User> {
        self.access.require_super_admin(actor_id).await?;

        let user = self.uow.users().find_by_id(user_id).await?.ok_or_not_found()?;
        match user.role {
            UserRole::Traveler => {}
            UserRole::Partner => {
                return Err(AppError::invalid_state("Partner accounts cannot become admins"))
            }
            UserRole::Admin | UserRole::SuperAdmin => return Err(AppError::conflict("Admin")),
        }

        let admin = self.uow.users().update_role(user_id, UserRole::Admin).await?;
        tracing::info!(%actor_id, user_id = %admin.id, "User promoted to admin");

        self.notifier
            .email(
                &admin.email,
                "Admin account created",
                &format!(
                    "Hello {},\n\nAn administrator account has been created for you. \
                     Sign in with your existing credentials to get started.",
                    admin.name
                ),
            )
            .await;

        Ok(admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::unit_of_work::testing::{FrozenPersistence, MockPersistence};
    use crate::services::{fixtures, MockAccessControl, MockNotifier};

    fn super_admin_access() -> MockAccessControl {
        let mut access = MockAccessControl::new();
        access.expect_require_super_admin().returning(|_| Ok(()));
        access
    }

    fn manager(
        uow: MockPersistence,
        access: MockAccessControl,
        notifier: MockNotifier,
    ) -> AdminManager<FrozenPersistence> {
        AdminManager::new(uow.build(), Arc::new(access), Arc::new(notifier))
    }

    #[tokio::test]
    async fn test_non_super_admin_cannot_grant() {
        let mut access = MockAccessControl::new();
        access
            .expect_require_super_admin()
            .returning(|_| Err(AppError::forbidden("Not authorized to perform this action")));

        let mut uow = MockPersistence::new();
        uow.admins.expect_grant().never();

        let service = manager(uow, access, MockNotifier::new());
        let result = service
            .grant_capability(Uuid::new_v4(), Uuid::new_v4(), AdminActionType::ListingManagement)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_grant_requires_admin_target() {
        let traveler = fixtures::user(UserRole::Traveler);
        let traveler_id = traveler.id;
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(traveler.clone())));
        uow.admins.expect_grant().never();

        let service = manager(uow, super_admin_access(), MockNotifier::new());
        let result = service
            .grant_capability(Uuid::new_v4(), traveler_id, AdminActionType::PartnerApproval)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_grant_to_admin() {
        let admin = fixtures::user(UserRole::Admin);
        let admin_id = admin.id;
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(admin.clone())));
        uow.admins
            .expect_grant()
            .times(1)
            .returning(|admin_id, action_type| {
                Ok(AdminGrant {
                    id: Uuid::new_v4(),
                    admin_id,
                    action_type,
                    created_at: chrono::Utc::now(),
                })
            });

        let service = manager(uow, super_admin_access(), MockNotifier::new());
        let grant = service
            .grant_capability(Uuid::new_v4(), admin_id, AdminActionType::CategoryManagement)
            .await
            .unwrap();

        assert_eq!(grant.admin_id, admin_id);
        assert_eq!(grant.action_type, AdminActionType::CategoryManagement);
    }

    #[tokio::test]
    async fn test_revoke_missing_grant_is_not_found() {
        let mut uow = MockPersistence::new();
        uow.admins.expect_revoke().returning(|_, _| Ok(false));

        let service = manager(uow, super_admin_access(), MockNotifier::new());
        let result = service
            .revoke_capability(Uuid::new_v4(), Uuid::new_v4(), AdminActionType::ListingManagement)
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_promotion_sends_email() {
        let traveler = fixtures::user(UserRole::Traveler);
        let traveler_id = traveler.id;
        let email = traveler.email.clone();

        let mut uow = MockPersistence::new();
        let found = traveler.clone();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        uow.users
            .expect_update_role()
            .withf(|_, role| *role == UserRole::Admin)
            .returning(move |_, role| {
                let mut promoted = traveler.clone();
                promoted.role = role;
                Ok(promoted)
            });

        let mut notifier = MockNotifier::new();
        notifier
            .expect_email()
            .withf(move |to, subject, _| to == email && subject == "Admin account created")
            .times(1)
            .return_const(());

        let service = manager(uow, super_admin_access(), notifier);
        let admin = service
            .promote_to_admin(Uuid::new_v4(), traveler_id)
            .await
            .unwrap();

        assert_eq!(admin.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_promoting_an_admin_conflicts() {
        let admin = fixtures::user(UserRole::Admin);
        let admin_id = admin.id;
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(admin.clone())));
        uow.users.expect_update_role().never();

        let service = manager(uow, super_admin_access(), MockNotifier::new());
        let result = service.promote_to_admin(Uuid::new_v4(), admin_id).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
