use case_risk_engine::{
    clients::{CortexClient, RetryPolicy, TheHiveClient},
    config::{ConfigValidator, Settings},
    models::CaseRiskAssessment,
    services::{CaseScorer, ReportGenerator, RiskPipeline},
    utils::init_tracing,
    AppError,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const USAGE: &str = "usage: case-risk-engine [score-file <assessment.json>]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    init_tracing(&settings.logging);
    info!("Starting case risk engine");

    ConfigValidator::new().validate(&settings)?;
    info!("Configuration loaded successfully");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => run_pipeline(settings).await?,
        [command, path] if command == "score-file" => score_file(&settings, path)?,
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Score an assessment stored as JSON and print its report
fn score_file(settings: &Settings, path: &str) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(path)?;
    let mut assessment = CaseRiskAssessment::from_json(&raw)?;

    let scorer = CaseScorer::new(&settings.risk);
    let score = scorer.score_case(&assessment);
    assessment.apply_score(score)?;

    println!("{}", ReportGenerator::new().generate(&assessment));
    Ok(())
}

async fn run_pipeline(settings: Settings) -> Result<(), AppError> {
    let retry = RetryPolicy::from_settings(&settings.pipeline);
    let thehive = Arc::new(TheHiveClient::new(&settings.thehive, retry)?);
    let cortex = Arc::new(CortexClient::new(&settings.cortex, retry)?);
    let poll_interval = settings.pipeline.poll_interval_seconds;

    let pipeline = RiskPipeline::new(
        thehive,
        cortex,
        CaseScorer::new(&settings.risk),
        settings.pipeline,
    );

    if poll_interval == 0 {
        let summary = pipeline.run_once().await?;
        info!(
            seen = summary.cases_seen,
            scored = summary.cases_scored,
            failed = summary.cases_failed,
            "Single pass finished"
        );
        return Ok(());
    }

    info!(interval_seconds = poll_interval, "Polling for unscored cases");
    let total = pipeline
        .run_until(Duration::from_secs(poll_interval), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await;

    info!(
        seen = total.cases_seen,
        scored = total.cases_scored,
        failed = total.cases_failed,
        "Case risk engine stopped"
    );
    Ok(())
}
