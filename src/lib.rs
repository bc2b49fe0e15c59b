pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::RulesConfig;

pub use adapters::{FallbackVisionProvider, HttpVisionProvider, InMemoryAuditRepository};
pub use crate::core::audit::{AnalyzeRequest, AuditService};
pub use domain::model::{
    AuditResult, CleanlinessStatus, ConfidenceScore, Evaluation, VisionAnalysis, VisionLabel,
};
pub use domain::ports::{AuditRepository, VisionProvider};
pub use domain::services::{CleanlinessEvaluator, CleanlinessRules};
pub use utils::error::{AuditError, Result};
