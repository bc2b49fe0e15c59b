use crate::domain::model::VisionAnalysis;
use crate::domain::ports::VisionProvider;
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;

/// Composite provider that tries each backend in order until one
/// succeeds. Primary first (cheapest), fallbacks after; the error from
/// the last provider surfaces when all of them fail.
pub struct FallbackVisionProvider {
    providers: Vec<Box<dyn VisionProvider>>,
    name: String,
}

impl FallbackVisionProvider {
    pub fn new(providers: Vec<Box<dyn VisionProvider>>) -> Result<Self> {
        if providers.is_empty() {
            return Err(AuditError::InvalidConfiguration {
                field: "providers".to_string(),
                reason: "Fallback provider needs at least one backend".to_string(),
            });
        }

        let name = format!(
            "fallback({})",
            providers
                .iter()
                .map(|p| p.provider_name())
                .collect::<Vec<_>>()
                .join("->")
        );
        Ok(Self { providers, name })
    }
}

#[async_trait]
impl VisionProvider for FallbackVisionProvider {
    async fn analyze(&self, image: &[u8]) -> Result<VisionAnalysis> {
        let mut last_error = None;

        for provider in &self.providers {
            tracing::debug!(provider = provider.provider_name(), "Attempting vision analysis");
            match provider.analyze(image).await {
                Ok(analysis) => {
                    tracing::info!(provider = provider.provider_name(), "Vision provider succeeded");
                    return Ok(analysis);
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.provider_name(),
                        error = %e,
                        "Vision provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        // Constructor guarantees at least one provider, so an error exists.
        Err(last_error.unwrap_or_else(|| AuditError::VisionProvider {
            provider: self.name.clone(),
            message: "No vision providers configured".to_string(),
        }))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::VisionLabel;

    struct AlwaysFails;

    #[async_trait]
    impl VisionProvider for AlwaysFails {
        async fn analyze(&self, _image: &[u8]) -> Result<VisionAnalysis> {
            Err(AuditError::VisionProvider {
                provider: "broken".to_string(),
                message: "quota exceeded".to_string(),
            })
        }

        fn provider_name(&self) -> &str {
            "broken"
        }
    }

    struct AlwaysSucceeds;

    #[async_trait]
    impl VisionProvider for AlwaysSucceeds {
        async fn analyze(&self, _image: &[u8]) -> Result<VisionAnalysis> {
            Ok(VisionAnalysis {
                labels: vec![VisionLabel::new("Showroom", 90.0)?],
                provider: "stub".to_string(),
                model_version: None,
            })
        }

        fn provider_name(&self) -> &str {
            "stub"
        }
    }

    #[tokio::test]
    async fn falls_through_to_working_provider() {
        let provider = FallbackVisionProvider::new(vec![
            Box::new(AlwaysFails),
            Box::new(AlwaysSucceeds),
        ])
        .unwrap();

        assert_eq!(provider.provider_name(), "fallback(broken->stub)");
        let analysis = provider.analyze(b"img").await.unwrap();
        assert_eq!(analysis.provider, "stub");
        assert_eq!(analysis.labels.len(), 1);
    }

    #[tokio::test]
    async fn surfaces_last_error_when_all_fail() {
        let provider =
            FallbackVisionProvider::new(vec![Box::new(AlwaysFails), Box::new(AlwaysFails)])
                .unwrap();

        let err = provider.analyze(b"img").await.unwrap_err();
        assert!(matches!(err, AuditError::VisionProvider { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn empty_provider_list_is_a_configuration_error() {
        assert!(FallbackVisionProvider::new(vec![]).is_err());
    }
}
