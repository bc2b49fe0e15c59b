use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use clap::Parser;
use std::path::PathBuf;

/// Command-line configuration for one-off audits: either evaluate a
/// pre-detected labels JSON file offline, or send an image to a vision
/// endpoint and run the full analysis.
#[derive(Debug, Clone, Parser)]
#[command(name = "hygiene-audit")]
#[command(about = "Evaluate dealer-facility hygiene from vision labels")]
pub struct CliConfig {
    /// TOML rules file; built-in defaults apply when omitted
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// JSON file with pre-detected labels: [{"name": "Dirt", "confidence": 85.0}, ...]
    #[arg(long, conflicts_with_all = ["image", "endpoint"])]
    pub labels: Option<PathBuf>,

    /// Image file to analyze through the vision endpoint
    #[arg(long, requires = "endpoint")]
    pub image: Option<PathBuf>,

    /// Label-detection HTTP endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, default_value = "dealer-local")]
    pub dealer_id: String,

    #[arg(long, default_value = "default")]
    pub checkpoint_id: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("dealer_id", &self.dealer_id)?;
        validate_non_empty_string("checkpoint_id", &self.checkpoint_id)?;

        if let Some(endpoint) = &self.endpoint {
            validate_url("endpoint", endpoint)?;
        }

        if self.labels.is_none() && self.image.is_none() {
            return Err(AuditError::InvalidConfiguration {
                field: "labels".to_string(),
                reason: "Provide either --labels <json> or --image <file> --endpoint <url>"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_an_input_source() {
        let config = CliConfig::parse_from(["hygiene-audit"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["hygiene-audit", "--labels", "labels.json"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validates_endpoint_url() {
        let config = CliConfig::parse_from([
            "hygiene-audit",
            "--image",
            "photo.jpg",
            "--endpoint",
            "not-a-url",
        ]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from([
            "hygiene-audit",
            "--image",
            "photo.jpg",
            "--endpoint",
            "https://vision.example.com/labels",
        ]);
        assert!(config.validate().is_ok());
    }
}
