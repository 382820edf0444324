mod analysis;
mod config;
mod errors;
mod flow;
mod input;
mod llm_client;
mod report;
mod ui;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::AnalysisClient;
use crate::config::Config;
use crate::flow::FlowController;
use crate::llm_client::GeminiClient;
use crate::ui::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Logs go to stderr; stdout belongs to the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-analyzer v{}", env!("CARGO_PKG_VERSION"));

    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    info!("Gemini client initialized (model: {})", llm_client::MODEL);

    let mut controller = FlowController::new(AnalysisClient::new(Arc::new(gemini)));

    if args.is_batch() {
        ui::run_batch(&mut controller, &args, &mut std::io::stdout()).await
    } else {
        ui::run_interactive(&mut controller, &args).await
    }
}
