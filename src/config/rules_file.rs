use crate::domain::services::CleanlinessRules;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// TOML rules file:
///
/// ```toml
/// [evaluation]
/// confidence_threshold = 85.0
/// negative_labels = ["Dirt", "Trash", "Spill"]
/// ```
///
/// Both keys are optional; missing ones fall back to the built-in
/// defaults. `${VAR_NAME}` references are replaced from the environment
/// before parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub evaluation: EvaluationSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationSection {
    pub confidence_threshold: Option<f64>,
    pub negative_labels: Option<Vec<String>>,
}

impl RulesConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let config: Self =
            toml::from_str(&processed).map_err(|e| AuditError::InvalidConfiguration {
                field: "rules_file".to_string(),
                reason: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Replace `${VAR_NAME}` with the environment value; unset variables
    /// are left as-is so the parse error names them.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// Merge with the built-in defaults into an effective rule set.
    pub fn into_rules(self) -> CleanlinessRules {
        let defaults = CleanlinessRules::default();
        CleanlinessRules {
            confidence_threshold: self
                .evaluation
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
            negative_labels: self
                .evaluation
                .negative_labels
                .map(|labels| labels.into_iter().collect())
                .unwrap_or(defaults.negative_labels),
        }
    }
}

impl Validate for RulesConfig {
    fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.evaluation.confidence_threshold {
            validate_range("evaluation.confidence_threshold", threshold, 0.0, 100.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_full_rules_file() {
        let toml_content = r#"
[evaluation]
confidence_threshold = 85.0
negative_labels = ["Dirt", "Trash", "Spill"]
"#;
        let config = RulesConfig::from_toml_str(toml_content).unwrap();
        let rules = config.into_rules();
        assert!((rules.confidence_threshold - 85.0).abs() < f64::EPSILON);
        assert_eq!(rules.negative_labels.len(), 3);
        assert!(rules.negative_labels.contains("Spill"));
    }

    #[test]
    fn empty_file_falls_back_to_defaults() {
        let config = RulesConfig::from_toml_str("").unwrap();
        let rules = config.into_rules();
        assert!((rules.confidence_threshold - 80.0).abs() < f64::EPSILON);
        assert!(rules.negative_labels.contains("Dirt"));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let toml_content = r#"
[evaluation]
confidence_threshold = 140.0
"#;
        let err = RulesConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfiguration { .. }));
    }

    #[test]
    fn substitutes_environment_variables() {
        std::env::set_var("HYGIENE_TEST_THRESHOLD", "75.0");
        let toml_content = r#"
[evaluation]
confidence_threshold = ${HYGIENE_TEST_THRESHOLD}
"#;
        let config = RulesConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.evaluation.confidence_threshold, Some(75.0));
        std::env::remove_var("HYGIENE_TEST_THRESHOLD");
    }

    #[test]
    fn loads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[evaluation]\nconfidence_threshold = 90.0\nnegative_labels = [\"Mold\"]"
        )
        .unwrap();

        let config = RulesConfig::from_file(file.path()).unwrap();
        let rules = config.into_rules();
        assert!((rules.confidence_threshold - 90.0).abs() < f64::EPSILON);
        assert!(rules.negative_labels.contains("Mold"));
    }
}
