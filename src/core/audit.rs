use crate::domain::model::{AuditResult, CleanlinessStatus};
use crate::domain::ports::{AuditRepository, VisionProvider};
use crate::domain::services::{CleanlinessEvaluator, CleanlinessRules};
use crate::utils::error::{AuditError, Result};
use std::collections::HashMap;
use uuid::Uuid;

/// Input for one analysis request.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub dealer_id: String,
    pub checkpoint_id: String,
    pub image_bytes: Vec<u8>,
}

/// Application service orchestrating one audit: vision call, pure
/// evaluation, persistence. All I/O happens here, strictly before and
/// after the evaluator runs.
#[derive(Debug)]
pub struct AuditService<V: VisionProvider, R: AuditRepository> {
    vision: V,
    repository: R,
    evaluator: CleanlinessEvaluator,
}

impl<V: VisionProvider, R: AuditRepository> AuditService<V, R> {
    pub fn new(vision: V, repository: R, rules: CleanlinessRules) -> Result<Self> {
        let evaluator = CleanlinessEvaluator::new(rules)?;
        Ok(Self {
            vision,
            repository,
            evaluator,
        })
    }

    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AuditResult> {
        Self::validate_request(&request)?;

        tracing::info!(
            dealer_id = %request.dealer_id,
            checkpoint_id = %request.checkpoint_id,
            image_bytes = request.image_bytes.len(),
            provider = self.vision.provider_name(),
            "Starting cleanliness analysis"
        );

        let analysis = self.vision.analyze(&request.image_bytes).await?;
        tracing::debug!(
            labels = analysis.labels.len(),
            provider = %analysis.provider,
            "Vision analysis complete"
        );

        let evaluation = self.evaluator.evaluate(&analysis.labels)?;
        tracing::info!(
            status = %evaluation.status,
            confidence = evaluation.confidence.value(),
            negative_labels = evaluation.negative_labels.len(),
            "Cleanliness evaluation complete"
        );

        let audit = AuditResult::new(
            request.dealer_id,
            request.checkpoint_id,
            analysis.provider,
            analysis.labels,
            evaluation,
        );
        self.repository.save(&audit).await?;
        tracing::debug!(audit_id = %audit.audit_id, "Saved audit result");

        Ok(audit)
    }

    /// Apply a reviewer's decision to a stored audit and persist it back.
    pub async fn review(
        &self,
        audit_id: Uuid,
        reviewer_id: &str,
        is_clean: bool,
        notes: &str,
    ) -> Result<AuditResult> {
        if reviewer_id.trim().is_empty() {
            return Err(AuditError::InvalidInput {
                message: "reviewer_id cannot be empty".to_string(),
            });
        }

        let mut audit = self.repository.get(audit_id).await?;
        audit.apply_manual_override(reviewer_id, is_clean, notes);
        self.repository.save(&audit).await?;

        tracing::info!(
            audit_id = %audit_id,
            reviewer_id,
            status = %audit.status,
            "Manual override applied"
        );
        Ok(audit)
    }

    pub async fn get(&self, audit_id: Uuid) -> Result<AuditResult> {
        self.repository.get(audit_id).await
    }

    pub async fn pending_reviews(&self, limit: usize) -> Result<Vec<AuditResult>> {
        self.repository.find_pending_reviews(limit).await
    }

    pub async fn compliance_summary(
        &self,
        dealer_id: &str,
    ) -> Result<HashMap<CleanlinessStatus, usize>> {
        self.repository.count_by_status(dealer_id).await
    }

    fn validate_request(request: &AnalyzeRequest) -> Result<()> {
        if request.dealer_id.trim().is_empty() {
            return Err(AuditError::InvalidInput {
                message: "dealer_id cannot be empty".to_string(),
            });
        }
        if request.checkpoint_id.trim().is_empty() {
            return Err(AuditError::InvalidInput {
                message: "checkpoint_id cannot be empty".to_string(),
            });
        }
        if request.image_bytes.is_empty() {
            return Err(AuditError::InvalidInput {
                message: "image_bytes cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
