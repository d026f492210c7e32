//! 6G Technology Intelligence Digest — Binary Entrypoint
//! One invocation is one complete digest run; the periodic trigger lives in
//! the surrounding infrastructure (cron / CI schedule).

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sixg_intel::config::AppConfig;
use sixg_intel::pipeline;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sixg_intel=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when the variables come from the runner.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::from_env();
    tracing::info!(
        ai = cfg.ai_key.is_some(),
        journal = cfg.journal_api_key.is_some(),
        email = cfg.email.is_some(),
        chat = cfg.chat.is_some(),
        "configuration loaded"
    );

    let report = pipeline::run(&cfg).await?;
    tracing::info!(
        summaries = report.summaries.len(),
        date = %report.generated_at,
        "digest run finished"
    );
    Ok(())
}
