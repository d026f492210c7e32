// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod ai;
pub mod collect;
pub mod config;
pub mod diag;
pub mod distribute;
pub mod error;
pub mod keyword;
pub mod pipeline;
pub mod report;
pub mod select;
pub mod summarize;

// ---- Re-exports for stable public API ----
pub use crate::config::AppConfig;
pub use crate::error::FetchError;
pub use crate::report::{Report, SourceItem, SourceType, SummaryRecord};
