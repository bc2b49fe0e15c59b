use crate::domain::model::{AuditResult, CleanlinessStatus};
use crate::domain::ports::AuditRepository;
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory audit repository for local development and tests. The domain
/// doesn't know it's just a map behind a lock.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    audits: RwLock<HashMap<Uuid, AuditResult>>,
}

impl InMemoryAuditRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.audits.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.audits.read().await.is_empty()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn save(&self, audit: &AuditResult) -> Result<()> {
        self.audits
            .write()
            .await
            .insert(audit.audit_id, audit.clone());
        tracing::debug!(audit_id = %audit.audit_id, "Saved audit in memory");
        Ok(())
    }

    async fn get(&self, audit_id: Uuid) -> Result<AuditResult> {
        self.audits
            .read()
            .await
            .get(&audit_id)
            .cloned()
            .ok_or(AuditError::AuditNotFound { audit_id })
    }

    async fn find_by_dealer_and_checkpoint(
        &self,
        dealer_id: &str,
        checkpoint_id: &str,
        limit: usize,
    ) -> Result<Vec<AuditResult>> {
        // Linear scan is fine for a dev backend.
        let mut results: Vec<AuditResult> = self
            .audits
            .read()
            .await
            .values()
            .filter(|a| a.dealer_id == dealer_id && a.checkpoint_id == checkpoint_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at));
        results.truncate(limit);
        Ok(results)
    }

    async fn find_pending_reviews(&self, limit: usize) -> Result<Vec<AuditResult>> {
        let mut results: Vec<AuditResult> = self
            .audits
            .read()
            .await
            .values()
            .filter(|a| a.status == CleanlinessStatus::NeedsReview && !a.is_finalized())
            .cloned()
            .collect();
        results.sort_by(|a, b| a.analyzed_at.cmp(&b.analyzed_at));
        results.truncate(limit);
        Ok(results)
    }

    async fn count_by_status(
        &self,
        dealer_id: &str,
    ) -> Result<HashMap<CleanlinessStatus, usize>> {
        let mut counts = HashMap::new();
        for audit in self.audits.read().await.values() {
            if audit.dealer_id == dealer_id {
                *counts.entry(audit.status).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
