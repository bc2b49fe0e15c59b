use clap::Parser;
use hygiene_audit::utils::{logger, validation::Validate};
use hygiene_audit::{
    AnalyzeRequest, AuditError, AuditResult, AuditService, CleanlinessRules, CliConfig,
    HttpVisionProvider, InMemoryAuditRepository, RulesConfig, VisionLabel,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::info!("Starting hygiene-audit CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let rules = match &config.rules {
        Some(path) => match RulesConfig::from_file(path) {
            Ok(rules_config) => rules_config.into_rules(),
            Err(e) => {
                tracing::error!("Failed to load rules file: {}", e);
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
        None => CleanlinessRules::default(),
    };

    match run(&config, rules).await {
        Ok(audit) => {
            tracing::info!(
                audit_id = %audit.audit_id,
                status = %audit.status,
                "Audit complete"
            );
            println!("{}", serde_json::to_string_pretty(&audit)?);
        }
        Err(e) => {
            tracing::error!("Audit failed: {} (retryable: {})", e, e.is_retryable());
            eprintln!("❌ {}", e);
            // Transient upstream failures get a distinct exit code so
            // wrapper scripts can retry.
            std::process::exit(if e.is_retryable() { 2 } else { 1 });
        }
    }

    Ok(())
}

async fn run(config: &CliConfig, rules: CleanlinessRules) -> hygiene_audit::Result<AuditResult> {
    if let Some(labels_path) = &config.labels {
        // Offline mode: evaluate pre-detected labels without any provider.
        let content = std::fs::read_to_string(labels_path)?;
        let labels: Vec<VisionLabel> =
            serde_json::from_str(&content).map_err(|e| AuditError::InvalidInput {
                message: format!("Malformed labels file: {}", e),
            })?;

        let evaluator = hygiene_audit::CleanlinessEvaluator::new(rules)?;
        let evaluation = evaluator.evaluate(&labels)?;
        Ok(AuditResult::new(
            config.dealer_id.clone(),
            config.checkpoint_id.clone(),
            "labels-file",
            labels,
            evaluation,
        ))
    } else {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| AuditError::InvalidConfiguration {
                field: "endpoint".to_string(),
                reason: "Image analysis needs --endpoint".to_string(),
            })?;
        let image_path = config
            .image
            .as_ref()
            .ok_or_else(|| AuditError::InvalidConfiguration {
                field: "image".to_string(),
                reason: "Image analysis needs --image".to_string(),
            })?;

        let image_bytes = std::fs::read(image_path)?;
        let provider = HttpVisionProvider::new(endpoint)?;
        let repository = InMemoryAuditRepository::new();
        let service = AuditService::new(provider, repository, rules)?;

        service
            .analyze(AnalyzeRequest {
                dealer_id: config.dealer_id.clone(),
                checkpoint_id: config.checkpoint_id.clone(),
                image_bytes,
            })
            .await
    }
}
