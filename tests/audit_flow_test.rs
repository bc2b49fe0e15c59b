use async_trait::async_trait;
use hygiene_audit::{
    AnalyzeRequest, AuditError, AuditRepository, AuditService, CleanlinessRules,
    CleanlinessStatus, InMemoryAuditRepository, VisionAnalysis, VisionLabel, VisionProvider,
};
use std::collections::HashSet;
use uuid::Uuid;

/// Test double returning a fixed label set, as if a vision backend had
/// analyzed the image.
#[derive(Debug)]
struct StubVision {
    labels: Vec<(&'static str, f64)>,
}

#[async_trait]
impl VisionProvider for StubVision {
    async fn analyze(&self, _image: &[u8]) -> hygiene_audit::Result<VisionAnalysis> {
        let labels = self
            .labels
            .iter()
            .map(|(name, confidence)| VisionLabel::new(*name, *confidence))
            .collect::<hygiene_audit::Result<Vec<_>>>()?;
        Ok(VisionAnalysis {
            labels,
            provider: "stub".to_string(),
            model_version: Some("test-1".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

fn test_rules() -> CleanlinessRules {
    CleanlinessRules {
        negative_labels: ["Dirt", "Trash"].iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        confidence_threshold: 80.0,
    }
}

fn request() -> AnalyzeRequest {
    AnalyzeRequest {
        dealer_id: "dealer-001".to_string(),
        checkpoint_id: "reception".to_string(),
        image_bytes: vec![0xFF, 0xD8, 0xFF],
    }
}

#[tokio::test]
async fn analyze_persists_not_clean_verdict() {
    let vision = StubVision {
        labels: vec![("Dirt", 85.0), ("Clean", 92.0)],
    };
    let service = AuditService::new(vision, InMemoryAuditRepository::new(), test_rules()).unwrap();

    let audit = service.analyze(request()).await.unwrap();

    assert_eq!(audit.status, CleanlinessStatus::NotClean);
    assert!((audit.confidence.value() - 85.0).abs() < f64::EPSILON);
    assert_eq!(audit.negative_labels.len(), 1);
    assert_eq!(audit.negative_labels[0].name, "Dirt");
    assert_eq!(audit.vision_provider, "stub");

    // Round-trip: retrieving by id returns an identical value.
    let stored = service.get(audit.audit_id).await.unwrap();
    assert_eq!(stored, audit);
}

#[tokio::test]
async fn analyze_clean_facility() {
    let vision = StubVision {
        labels: vec![("Clean", 95.0), ("Organized", 90.0)],
    };
    let service = AuditService::new(vision, InMemoryAuditRepository::new(), test_rules()).unwrap();

    let audit = service.analyze(request()).await.unwrap();

    assert_eq!(audit.status, CleanlinessStatus::Clean);
    assert!((audit.confidence.value() - 90.0).abs() < f64::EPSILON);
    assert!(audit.passes_compliance());
}

#[tokio::test]
async fn low_signal_lands_in_review_queue() {
    let vision = StubVision {
        labels: vec![("Indoor", 60.0), ("Room", 55.0)],
    };
    let service = AuditService::new(vision, InMemoryAuditRepository::new(), test_rules()).unwrap();

    let audit = service.analyze(request()).await.unwrap();
    assert_eq!(audit.status, CleanlinessStatus::NeedsReview);
    assert_eq!(audit.confidence.value(), 0.0);

    let pending = service.pending_reviews(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].audit_id, audit.audit_id);
}

#[tokio::test]
async fn review_applies_override_and_clears_queue() {
    let vision = StubVision {
        labels: vec![("Indoor", 60.0)],
    };
    let service = AuditService::new(vision, InMemoryAuditRepository::new(), test_rules()).unwrap();

    let audit = service.analyze(request()).await.unwrap();
    assert_eq!(audit.status, CleanlinessStatus::NeedsReview);

    let reviewed = service
        .review(audit.audit_id, "auditor-7", true, "walked the floor myself")
        .await
        .unwrap();

    assert_eq!(reviewed.status, CleanlinessStatus::Clean);
    assert_eq!(reviewed.manual_override, Some(true));
    assert_eq!(reviewed.reviewed_by.as_deref(), Some("auditor-7"));
    assert!(reviewed.is_finalized());

    // Persisted, and no longer pending.
    let stored = service.get(audit.audit_id).await.unwrap();
    assert_eq!(stored, reviewed);
    assert!(service.pending_reviews(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn review_of_unknown_audit_is_not_found() {
    let vision = StubVision { labels: vec![] };
    let service = AuditService::new(vision, InMemoryAuditRepository::new(), test_rules()).unwrap();

    let err = service
        .review(Uuid::new_v4(), "auditor-7", false, "n/a")
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::AuditNotFound { .. }));
}

#[tokio::test]
async fn compliance_summary_counts_by_status() {
    let repository = InMemoryAuditRepository::new();

    // Seed three audits for the same dealer with different verdicts.
    for labels in [
        vec![("Clean", 95.0)],
        vec![("Dirt", 85.0)],
        vec![("Indoor", 40.0)],
    ] {
        let vision = StubVision { labels };
        let analysis = vision.analyze(b"img").await.unwrap();
        let evaluator =
            hygiene_audit::CleanlinessEvaluator::new(test_rules()).unwrap();
        let evaluation = evaluator.evaluate(&analysis.labels).unwrap();
        let audit = hygiene_audit::AuditResult::new(
            "dealer-001",
            "reception",
            analysis.provider,
            analysis.labels,
            evaluation,
        );
        repository.save(&audit).await.unwrap();
    }

    let counts = repository.count_by_status("dealer-001").await.unwrap();
    assert_eq!(counts.get(&CleanlinessStatus::Clean), Some(&1));
    assert_eq!(counts.get(&CleanlinessStatus::NotClean), Some(&1));
    assert_eq!(counts.get(&CleanlinessStatus::NeedsReview), Some(&1));

    assert!(repository
        .count_by_status("dealer-other")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn find_by_dealer_and_checkpoint_filters_and_limits() {
    let repository = InMemoryAuditRepository::new();
    let evaluator = hygiene_audit::CleanlinessEvaluator::new(test_rules()).unwrap();

    for checkpoint in ["reception", "reception", "workshop"] {
        let labels = vec![VisionLabel::new("Clean", 95.0).unwrap()];
        let evaluation = evaluator.evaluate(&labels).unwrap();
        let audit = hygiene_audit::AuditResult::new(
            "dealer-001",
            checkpoint,
            "stub",
            labels,
            evaluation,
        );
        repository.save(&audit).await.unwrap();
    }

    let reception = repository
        .find_by_dealer_and_checkpoint("dealer-001", "reception", 10)
        .await
        .unwrap();
    assert_eq!(reception.len(), 2);

    let limited = repository
        .find_by_dealer_and_checkpoint("dealer-001", "reception", 1)
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn blank_request_fields_are_rejected() {
    let vision = StubVision { labels: vec![] };
    let service = AuditService::new(vision, InMemoryAuditRepository::new(), test_rules()).unwrap();

    let mut req = request();
    req.dealer_id = "  ".to_string();
    assert!(matches!(
        service.analyze(req).await.unwrap_err(),
        AuditError::InvalidInput { .. }
    ));

    let mut req = request();
    req.image_bytes.clear();
    assert!(matches!(
        service.analyze(req).await.unwrap_err(),
        AuditError::InvalidInput { .. }
    ));
}

#[tokio::test]
async fn bad_threshold_fails_service_construction() {
    let vision = StubVision { labels: vec![] };
    let rules = CleanlinessRules {
        negative_labels: HashSet::new(),
        confidence_threshold: 120.0,
    };
    let err = AuditService::new(vision, InMemoryAuditRepository::new(), rules).unwrap_err();
    assert!(matches!(err, AuditError::InvalidConfiguration { .. }));
}
