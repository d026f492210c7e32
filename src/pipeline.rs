// src/pipeline.rs
//! Orchestrator: ExtractKeyword → Collect → Select → Summarize → Distribute.
//! Every transition is unconditional forward progress; a stage failure
//! degrades that stage's output via its documented fallback instead of
//! aborting the run.

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::ai;
use crate::collect;
use crate::config::AppConfig;
use crate::diag::DiagnosticSink;
use crate::distribute;
use crate::keyword;
use crate::report::Report;
use crate::select;
use crate::summarize;

/// Run one complete digest cycle and return the Report it delivered.
pub async fn run(cfg: &AppConfig) -> Result<Report> {
    // Fixed once; every channel sees the same date.
    let generated_at = Utc::now().format("%Y-%m-%d").to_string();
    info!(date = %generated_at, "digest run starting");

    let model = ai::build_model(cfg);

    let hot_keyword = keyword::extract(model.as_ref()).await;

    let collectors = collect::build_collectors(cfg);
    let batch = collect::collect_all(
        &collectors,
        &hot_keyword,
        cfg.per_source_limit,
        cfg.max_age_days,
    )
    .await;
    info!(batch = batch.len(), keyword = %hot_keyword, "collection complete");

    let selected = select::select_top(model.as_ref(), &batch, cfg.select_max).await;

    let sink = DiagnosticSink::new(cfg.output_dir.join("diagnostics"));
    let report = summarize::summarize(
        model.as_ref(),
        &selected,
        &hot_keyword,
        &generated_at,
        &sink,
    )
    .await;
    info!(summaries = report.summaries.len(), "report assembled");

    // An empty report is still delivered: an empty-but-valid digest.
    distribute::distribute_all(&report, cfg).await;

    Ok(report)
}
