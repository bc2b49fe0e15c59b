use crate::domain::model::{AuditResult, CleanlinessStatus, VisionAnalysis};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Port for vision analysis backends. The domain only sees normalized
/// labels; which provider produced them is recorded for the audit trail.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Analyze raw image bytes (JPEG/PNG). Fails with
    /// `AuditError::VisionProvider` on any upstream failure.
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis>;

    fn provider_name(&self) -> &str;
}

/// Port for audit result persistence. Save is idempotent per audit_id:
/// saving the same id again replaces the stored record.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn save(&self, audit: &AuditResult) -> Result<()>;

    /// Fails with `AuditError::AuditNotFound` when the id is unknown.
    async fn get(&self, audit_id: Uuid) -> Result<AuditResult>;

    /// Audits for one location, newest first.
    async fn find_by_dealer_and_checkpoint(
        &self,
        dealer_id: &str,
        checkpoint_id: &str,
        limit: usize,
    ) -> Result<Vec<AuditResult>>;

    /// Review queue: NEEDS_REVIEW audits nobody has ruled on yet, oldest first.
    async fn find_pending_reviews(&self, limit: usize) -> Result<Vec<AuditResult>>;

    /// Per-status counts for one dealer, for compliance dashboards.
    async fn count_by_status(&self, dealer_id: &str)
        -> Result<HashMap<CleanlinessStatus, usize>>;
}
