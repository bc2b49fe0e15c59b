use crate::utils::error::{AuditError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Confidence score in the 0..=100 range. Scores outside the range never
/// enter the domain; construction and deserialization both reject them.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub fn new(value: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&value) {
            return Err(AuditError::InvalidInput {
                message: format!("Confidence score must be between 0 and 100, got {}", value),
            });
        }
        Ok(Self(value))
    }

    /// Some models report scores in 0.0..=1.0.
    pub fn from_normalized(value: f64) -> Result<Self> {
        Self::new(value * 100.0)
    }

    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_at_least(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl TryFrom<f64> for ConfidenceScore {
    type Error = AuditError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> f64 {
        score.0
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Provider-agnostic detected label. Different vision backends return
/// different wire formats; adapters normalize them into this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionLabel {
    pub name: String,
    pub confidence: ConfidenceScore,
}

impl VisionLabel {
    pub fn new(name: impl Into<String>, confidence: f64) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            confidence: ConfidenceScore::new(confidence)?,
        })
    }
}

/// Everything a vision provider returns for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionAnalysis {
    pub labels: Vec<VisionLabel>,
    pub provider: String,
    pub model_version: Option<String>,
}

/// Business-level cleanliness verdict. A failed evaluation is an error,
/// never `NeedsReview` (which is a valid outcome, not a failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleanlinessStatus {
    #[serde(rename = "CLEAN")]
    Clean,
    #[serde(rename = "NOT_CLEAN")]
    NotClean,
    #[serde(rename = "NEEDS_REVIEW")]
    NeedsReview,
}

impl CleanlinessStatus {
    /// Only CLEAN facilities pass the audit.
    pub fn is_compliant(&self) -> bool {
        *self == CleanlinessStatus::Clean
    }

    pub fn requires_human_intervention(&self) -> bool {
        *self == CleanlinessStatus::NeedsReview
    }
}

impl std::fmt::Display for CleanlinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CleanlinessStatus::Clean => "CLEAN",
            CleanlinessStatus::NotClean => "NOT_CLEAN",
            CleanlinessStatus::NeedsReview => "NEEDS_REVIEW",
        };
        f.write_str(s)
    }
}

/// Output fragment of the evaluator: verdict, its confidence and the
/// negative evidence, most severe first.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: CleanlinessStatus,
    pub confidence: ConfidenceScore,
    pub negative_labels: Vec<VisionLabel>,
}

/// Result of one hygiene audit analysis. Entity with identity and a
/// lifecycle: created by the evaluator, optionally corrected by a human
/// reviewer, never deleted by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub audit_id: Uuid,
    pub dealer_id: String,
    pub checkpoint_id: String,

    pub status: CleanlinessStatus,
    pub confidence: ConfidenceScore,
    pub detected_labels: Vec<VisionLabel>,
    /// Why the verdict is NOT_CLEAN; descending confidence.
    pub negative_labels: Vec<VisionLabel>,

    pub manual_override: Option<bool>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,

    pub vision_provider: String,
    pub analyzed_at: DateTime<Utc>,
}

impl AuditResult {
    pub fn new(
        dealer_id: impl Into<String>,
        checkpoint_id: impl Into<String>,
        vision_provider: impl Into<String>,
        detected_labels: Vec<VisionLabel>,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            audit_id: Uuid::new_v4(),
            dealer_id: dealer_id.into(),
            checkpoint_id: checkpoint_id.into(),
            status: evaluation.status,
            confidence: evaluation.confidence,
            detected_labels,
            negative_labels: evaluation.negative_labels,
            manual_override: None,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            vision_provider: vision_provider.into(),
            analyzed_at: Utc::now(),
        }
    }

    /// Human reviewer decision supersedes the automated verdict. The
    /// override maps only to CLEAN or NOT_CLEAN; each call overwrites the
    /// previous one, no override history is kept here.
    pub fn apply_manual_override(&mut self, reviewer_id: &str, is_clean: bool, notes: &str) {
        self.manual_override = Some(is_clean);
        self.status = if is_clean {
            CleanlinessStatus::Clean
        } else {
            CleanlinessStatus::NotClean
        };
        self.reviewed_by = Some(reviewer_id.to_string());
        self.reviewed_at = Some(Utc::now());
        self.review_notes = Some(notes.to_string());
    }

    pub fn passes_compliance(&self) -> bool {
        self.status.is_compliant()
    }

    pub fn requires_review(&self) -> bool {
        self.status.requires_human_intervention()
    }

    /// An audit a human has already ruled on should not be re-analyzed.
    pub fn is_finalized(&self) -> bool {
        self.reviewed_by.is_some()
    }
}
