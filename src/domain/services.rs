use crate::domain::model::{CleanlinessStatus, ConfidenceScore, Evaluation, VisionLabel};
use crate::utils::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rule set for cleanliness evaluation. Different dealer types run with
/// different standards, so this is configuration, not code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanlinessRules {
    /// Label names that indicate a hygiene problem.
    pub negative_labels: HashSet<String>,
    /// Minimum confidence for a label to count as evidence at all.
    pub confidence_threshold: f64,
}

impl Default for CleanlinessRules {
    fn default() -> Self {
        let negative_labels = [
            // Dirt and debris
            "Dirt", "Mud", "Debris", "Trash", "Garbage", "Litter", "Waste", "Rubbish", "Clutter",
            "Mess",
            // Stains and damage
            "Stain", "Graffiti", "Rust", "Corrosion", "Mold", "Mildew", "Decay", "Deterioration",
            // Pests
            "Insect", "Bug", "Rodent", "Pest", "Spider Web",
            // Disorganization
            "Disorder", "Disorganized", "Untidy", "Unkempt",
            // Hazards
            "Spill", "Leak", "Broken Glass", "Sharp Object",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            negative_labels,
            confidence_threshold: 80.0,
        }
    }
}

/// Stateless, deterministic domain service turning vision labels into a
/// cleanliness verdict. No I/O; safe to share across concurrent requests.
#[derive(Debug)]
pub struct CleanlinessEvaluator {
    rules: CleanlinessRules,
    // Lowercased copy of the negative set, so matching is case-insensitive
    // without re-lowering on every label.
    negative_lookup: HashSet<String>,
}

impl CleanlinessEvaluator {
    /// Fails at startup with `InvalidConfiguration` when the threshold is
    /// outside 0..=100.
    pub fn new(rules: CleanlinessRules) -> Result<Self> {
        if !(0.0..=100.0).contains(&rules.confidence_threshold) {
            return Err(AuditError::InvalidConfiguration {
                field: "confidence_threshold".to_string(),
                reason: format!(
                    "Value {} must be between 0 and 100",
                    rules.confidence_threshold
                ),
            });
        }

        let negative_lookup = rules
            .negative_labels
            .iter()
            .map(|name| name.to_lowercase())
            .collect();

        Ok(Self {
            rules,
            negative_lookup,
        })
    }

    pub fn rules(&self) -> &CleanlinessRules {
        &self.rules
    }

    /// Verdict rules:
    /// - any negative match at/above threshold => NOT_CLEAN, confidence is
    ///   the strongest negative match (worst-case evidence dominates);
    /// - no evidence at/above threshold at all => NEEDS_REVIEW, confidence 0;
    /// - otherwise CLEAN, confidence is the weakest surviving positive label.
    ///
    /// Labels below the threshold are noise on both sides: a low-confidence
    /// "Dirt" is neither negative evidence nor positive evidence.
    pub fn evaluate(&self, labels: &[VisionLabel]) -> Result<Evaluation> {
        let threshold = self.rules.confidence_threshold;

        let mut negative_matches: Vec<VisionLabel> = Vec::new();
        let mut weakest_positive: Option<f64> = None;

        for label in labels {
            let confidence = label.confidence.value();
            // ConfidenceScore enforces the range at construction; re-check
            // here so a malformed label rejects this request only.
            if !(0.0..=100.0).contains(&confidence) {
                return Err(AuditError::InvalidInput {
                    message: format!(
                        "Label '{}' has confidence {} outside 0..=100",
                        label.name, confidence
                    ),
                });
            }

            if confidence < threshold {
                continue;
            }

            if self.negative_lookup.contains(&label.name.to_lowercase()) {
                negative_matches.push(label.clone());
            } else {
                weakest_positive =
                    Some(weakest_positive.map_or(confidence, |w: f64| w.min(confidence)));
            }
        }

        if !negative_matches.is_empty() {
            // Most severe first; sort_by is stable, so equal confidences
            // keep their input order.
            negative_matches
                .sort_by(|a, b| b.confidence.value().total_cmp(&a.confidence.value()));
            let confidence = negative_matches[0].confidence;
            return Ok(Evaluation {
                status: CleanlinessStatus::NotClean,
                confidence,
                negative_labels: negative_matches,
            });
        }

        match weakest_positive {
            Some(confidence) => Ok(Evaluation {
                status: CleanlinessStatus::Clean,
                confidence: ConfidenceScore::new(confidence)?,
                negative_labels: Vec::new(),
            }),
            None => Ok(Evaluation {
                status: CleanlinessStatus::NeedsReview,
                confidence: ConfidenceScore::zero(),
                negative_labels: Vec::new(),
            }),
        }
    }
}
