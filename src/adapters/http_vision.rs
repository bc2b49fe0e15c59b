use crate::domain::model::{VisionAnalysis, VisionLabel};
use crate::domain::ports::VisionProvider;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER_NAME: &str = "http";

/// Vision provider backed by a label-detection HTTP endpoint. Posts the
/// raw image bytes and expects `{"labels": [{"name", "confidence"}], ...}`
/// with confidences in 0..=100.
pub struct HttpVisionProvider {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    labels: Vec<VisionLabel>,
    #[serde(default)]
    model_version: Option<String>,
}

impl HttpVisionProvider {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        validate_url("vision_endpoint", &endpoint)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }
}

#[async_trait]
impl VisionProvider for HttpVisionProvider {
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis> {
        tracing::debug!(endpoint = %self.endpoint, bytes = image.len(), "Posting image for analysis");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| AuditError::VisionProvider {
                provider: PROVIDER_NAME.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::VisionProvider {
                provider: PROVIDER_NAME.to_string(),
                message: format!("Endpoint returned status {}", status),
            });
        }

        // Deserialization re-validates every confidence via ConfidenceScore.
        let body: LabelResponse =
            response
                .json()
                .await
                .map_err(|e| AuditError::VisionProvider {
                    provider: PROVIDER_NAME.to_string(),
                    message: format!("Malformed label response: {}", e),
                })?;

        tracing::debug!(labels = body.labels.len(), "Label response decoded");

        Ok(VisionAnalysis {
            labels: body.labels,
            provider: PROVIDER_NAME.to_string(),
            model_version: body.model_version,
        })
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_endpoint_at_construction() {
        assert!(HttpVisionProvider::new("not-a-url").is_err());
        assert!(HttpVisionProvider::new("ftp://vision.example.com").is_err());
        assert!(HttpVisionProvider::new("https://vision.example.com/labels").is_ok());
    }
}
