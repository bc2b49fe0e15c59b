pub mod audit;

pub use crate::domain::model::{AuditResult, CleanlinessStatus, VisionAnalysis, VisionLabel};
pub use crate::domain::ports::{AuditRepository, VisionProvider};
pub use crate::domain::services::{CleanlinessEvaluator, CleanlinessRules};
pub use crate::utils::error::Result;
