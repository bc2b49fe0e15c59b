use crate::domain::model::{AuditResult, CleanlinessStatus, VisionAnalysis, VisionLabel};
use crate::domain::ports::{AuditRepository, VisionProvider};
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::Image;
use aws_sdk_rekognition::Client as RekognitionClient;
use std::collections::HashMap;
use uuid::Uuid;

const REKOGNITION_PROVIDER: &str = "rekognition";

/// AWS Rekognition DetectLabels adapter.
pub struct RekognitionVisionProvider {
    client: RekognitionClient,
    max_labels: i32,
    min_confidence: f32,
}

impl RekognitionVisionProvider {
    pub fn new(client: RekognitionClient, max_labels: i32, min_confidence: f32) -> Self {
        Self {
            client,
            max_labels,
            min_confidence,
        }
    }

    pub async fn from_env(max_labels: i32, min_confidence: f32) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(RekognitionClient::new(&config), max_labels, min_confidence)
    }
}

#[async_trait]
impl VisionProvider for RekognitionVisionProvider {
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis> {
        let output = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image.to_vec())).build())
            .max_labels(self.max_labels)
            .min_confidence(self.min_confidence)
            .send()
            .await
            .map_err(|e| AuditError::VisionProvider {
                provider: REKOGNITION_PROVIDER.to_string(),
                message: e.to_string(),
            })?;

        let mut labels = Vec::new();
        for label in output.labels() {
            // Rekognition marks both fields optional on the wire; skip
            // entries that carry neither a name nor a score.
            let (Some(name), Some(confidence)) = (label.name(), label.confidence()) else {
                continue;
            };
            labels.push(VisionLabel::new(name, f64::from(confidence))?);
        }

        tracing::debug!(labels = labels.len(), "Rekognition DetectLabels complete");

        Ok(VisionAnalysis {
            labels,
            provider: REKOGNITION_PROVIDER.to_string(),
            model_version: output.label_model_version().map(str::to_string),
        })
    }

    fn provider_name(&self) -> &str {
        REKOGNITION_PROVIDER
    }
}

/// DynamoDB audit repository. One item per audit: key attributes for
/// querying plus the full entity JSON in a `payload` attribute.
pub struct DynamoDbAuditRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoDbAuditRepository {
    pub fn new(client: DynamoDbClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub async fn from_env(table_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(DynamoDbClient::new(&config), table_name)
    }

    fn parse_item(item: &HashMap<String, AttributeValue>) -> Result<AuditResult> {
        let payload = item
            .get("payload")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| AuditError::Repository {
                message: "Item missing payload attribute".to_string(),
            })?;
        Ok(serde_json::from_str(payload)?)
    }

    fn repository_error(e: impl std::fmt::Display) -> AuditError {
        AuditError::Repository {
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl AuditRepository for DynamoDbAuditRepository {
    async fn save(&self, audit: &AuditResult) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("audit_id", AttributeValue::S(audit.audit_id.to_string()))
            .item("dealer_id", AttributeValue::S(audit.dealer_id.clone()))
            .item(
                "checkpoint_id",
                AttributeValue::S(audit.checkpoint_id.clone()),
            )
            .item("audit_status", AttributeValue::S(audit.status.to_string()))
            .item(
                "analyzed_at",
                AttributeValue::S(audit.analyzed_at.to_rfc3339()),
            )
            .item("payload", AttributeValue::S(serde_json::to_string(audit)?))
            .send()
            .await
            .map_err(Self::repository_error)?;

        tracing::debug!(audit_id = %audit.audit_id, table = %self.table_name, "Saved audit to DynamoDB");
        Ok(())
    }

    async fn get(&self, audit_id: Uuid) -> Result<AuditResult> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("audit_id", AttributeValue::S(audit_id.to_string()))
            .send()
            .await
            .map_err(Self::repository_error)?;

        match output.item() {
            Some(item) => Self::parse_item(item),
            None => Err(AuditError::AuditNotFound { audit_id }),
        }
    }

    async fn find_by_dealer_and_checkpoint(
        &self,
        dealer_id: &str,
        checkpoint_id: &str,
        limit: usize,
    ) -> Result<Vec<AuditResult>> {
        // Scan with a filter is adequate at audit volumes; a GSI would be
        // the next step if listing ever becomes hot.
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("dealer_id = :d AND checkpoint_id = :c")
            .expression_attribute_values(":d", AttributeValue::S(dealer_id.to_string()))
            .expression_attribute_values(":c", AttributeValue::S(checkpoint_id.to_string()))
            .send()
            .await
            .map_err(Self::repository_error)?;

        let mut results = output
            .items()
            .iter()
            .map(Self::parse_item)
            .collect::<Result<Vec<_>>>()?;
        results.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at));
        results.truncate(limit);
        Ok(results)
    }

    async fn find_pending_reviews(&self, limit: usize) -> Result<Vec<AuditResult>> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("audit_status = :s")
            .expression_attribute_values(
                ":s",
                AttributeValue::S(CleanlinessStatus::NeedsReview.to_string()),
            )
            .send()
            .await
            .map_err(Self::repository_error)?;

        let mut results = output
            .items()
            .iter()
            .map(Self::parse_item)
            .collect::<Result<Vec<_>>>()?;
        results.retain(|a| !a.is_finalized());
        results.sort_by(|a, b| a.analyzed_at.cmp(&b.analyzed_at));
        results.truncate(limit);
        Ok(results)
    }

    async fn count_by_status(
        &self,
        dealer_id: &str,
    ) -> Result<HashMap<CleanlinessStatus, usize>> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("dealer_id = :d")
            .expression_attribute_values(":d", AttributeValue::S(dealer_id.to_string()))
            .send()
            .await
            .map_err(Self::repository_error)?;

        let mut counts = HashMap::new();
        for item in output.items() {
            let audit = Self::parse_item(item)?;
            *counts.entry(audit.status).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
