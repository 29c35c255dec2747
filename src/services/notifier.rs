//! Side-effect dispatch: in-app notifications and outbound email.
//!
//! Both are emitted after the primary mutation has been stored. A failure
//! here is logged and swallowed; it never fails the calling operation.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::domain::NotificationKind;
use crate::infra::{EmailQueue, UnitOfWork};
use crate::jobs::EmailJob;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Store an in-app notification for `recipient_id`.
    async fn notify(&self, recipient_id: Uuid, kind: NotificationKind, title: &str, content: &str);

    /// Queue an email to an address.
    async fn email(&self, to: &str, subject: &str, body: &str);

    /// Queue an email to a user, looked up by id.
    async fn email_user(&self, user_id: Uuid, subject: &str, body: &str);
}

/// Notifier backed by the notifications table and the email queue.
pub struct NotificationDispatcher<U: UnitOfWork> {
    uow: Arc<U>,
    mail: Arc<dyn EmailQueue>,
}

impl<U: UnitOfWork> NotificationDispatcher<U> {
    pub fn new(uow: Arc<U>, mail: Arc<dyn EmailQueue>) -> Self {
        Self { uow, mail }
    }
}

#[async_trait]
impl<U: UnitOfWork> Notifier for NotificationDispatcher<U> {
    async fn notify(&self, recipient_id: Uuid, kind: NotificationKind, title: &str, content: &str) {
        let result = self
            .uow
            .engagement()
            .create_notification(recipient_id, kind, title.to_string(), content.to_string())
            .await;

        if let Err(e) = result {
            tracing::warn!(%recipient_id, kind = %kind, error = %e, "Failed to store notification");
        }
    }

    async fn email(&self, to: &str, subject: &str, body: &str) {
        if let Err(e) = self.mail.enqueue(EmailJob::new(to, subject, body)).await {
            tracing::warn!(to, subject, error = %e, "Failed to queue email");
        }
    }

    async fn email_user(&self, user_id: Uuid, subject: &str, body: &str) {
        match self.uow.users().find_by_id(user_id).await {
            Ok(Some(user)) => self.email(&user.email, subject, body).await,
            Ok(None) => tracing::warn!(%user_id, "Email recipient no longer exists"),
            Err(e) => tracing::warn!(%user_id, error = %e, "Failed to look up email recipient"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserRole};
    use crate::errors::AppError;
    use crate::infra::unit_of_work::testing::MockPersistence;
    use crate::infra::MockEmailQueue;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_notification_failure_is_swallowed() {
        let mut uow = MockPersistence::new();
        uow.engagement
            .expect_create_notification()
            .times(1)
            .returning(|_, _, _, _| Err(AppError::internal("db down")));

        let notifier = NotificationDispatcher::new(uow.build(), Arc::new(MockEmailQueue::new()));
        notifier
            .notify(Uuid::new_v4(), NotificationKind::System, "Hello", "World")
            .await;
    }

    #[tokio::test]
    async fn test_email_failure_is_swallowed() {
        let mut mail = MockEmailQueue::new();
        mail.expect_enqueue()
            .times(1)
            .returning(|_| Err(AppError::internal("queue down")));

        let notifier = NotificationDispatcher::new(MockPersistence::new().build(), Arc::new(mail));
        notifier.email("a@example.com", "Subject", "Body").await;
    }

    #[tokio::test]
    async fn test_email_user_resolves_address() {
        let user_id = Uuid::new_v4();
        let mut uow = MockPersistence::new();
        uow.users
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |id| {
                let mut user = User::new(id, "p@example.com".into(), String::new(), "P".into());
                user.role = UserRole::Partner;
                Ok(Some(user))
            });

        let mut mail = MockEmailQueue::new();
        mail.expect_enqueue()
            .withf(|job| job.to == "p@example.com" && job.subject == "Hi")
            .times(1)
            .returning(|_| Ok(()));

        let notifier = NotificationDispatcher::new(uow.build(), Arc::new(mail));
        notifier.email_user(user_id, "Hi", "Body").await;
    }
}
