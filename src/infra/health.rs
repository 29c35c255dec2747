//! Liveness probes for backing services.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::{Cache, Database};

/// A dependency the health endpoint can ping.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl HealthProbe for Database {
    async fn is_healthy(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}

#[async_trait]
impl HealthProbe for Cache {
    async fn is_healthy(&self) -> bool {
        self.ping().await.is_ok()
    }
}
