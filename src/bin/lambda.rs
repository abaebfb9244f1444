//! AWS Lambda entry point for leadreach
//!
//! Deploy with `cargo lambda build --release --features lambda` and attach a
//! daily EventBridge schedule. Configuration comes from the environment.

use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};

use leadreach::error::Result;
use leadreach::models::{Config, RunReport};
use leadreach::pipeline::run_from_config;
use serde_json::{Value, json};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> std::result::Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("leadreach Lambda starting...");
    lambda_runtime::run(service_fn(handler)).await
}

/// Handler for AWS Lambda events.
async fn handler(event: LambdaEvent<Value>) -> std::result::Result<Value, LambdaError> {
    info!("Received event: {:?}", event.payload);

    match run_lambda_pipeline().await {
        Ok(report) => {
            info!(
                "Lambda execution successful: {} sent, {} skipped, {} failed",
                report.sent(),
                report.skipped(),
                report.failed()
            );
            Ok(json!({
                "status": "success",
                "sent": report.sent(),
                "skipped": report.skipped(),
                "failed": report.failed(),
                "malformed_rows": report.malformed_rows,
            }))
        }
        Err(e) => {
            error!("Lambda execution failed: {}", e);
            Ok(json!({
                "status": "error",
                "message": e.to_string()
            }))
        }
    }
}

async fn run_lambda_pipeline() -> Result<RunReport> {
    let config = Config::from_env()?;
    config.validate()?;
    run_from_config(&config).await
}
