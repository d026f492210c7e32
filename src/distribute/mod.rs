// src/distribute/mod.rs
//! Fan-out delivery: every channel consumes the same Report and every channel
//! is isolated, so one failing channel never blocks the others.

pub mod email;
pub mod file_store;
pub mod telegram;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::report::Report;

/// Deliver the report on every eligible channel. Always returns; failures
/// are logged per channel.
pub async fn distribute_all(report: &Report, cfg: &AppConfig) {
    // File persistence is always attempted.
    match file_store::write_report(report, &cfg.output_dir) {
        Ok(path) => info!(path = %path.display(), "report persisted"),
        Err(e) => warn!(error = %e, "file store failed"),
    }

    match &cfg.email {
        Some(mail_cfg) => {
            if let Err(e) = email::send_report(report, mail_cfg).await {
                warn!(error = %e, "email channel failed");
            } else {
                info!(recipient = %mail_cfg.recipient, "email sent");
            }
        }
        None => info!("email channel disabled (credentials absent)"),
    }

    match &cfg.chat {
        Some(chat_cfg) => {
            if let Err(e) = telegram::send_report(report, chat_cfg).await {
                warn!(error = %e, "chat channel failed");
            } else {
                info!("chat message sent");
            }
        }
        // Silently skipped by contract; the debug line is for operators only.
        None => tracing::debug!("chat channel disabled (credentials absent)"),
    }
}
