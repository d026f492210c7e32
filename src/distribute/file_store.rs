// src/distribute/file_store.rs
//! File channel: one dated, human-readable Markdown document per run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::report::{Report, SourceType};

const SECTIONS: [(SourceType, &str); 3] = [
    (SourceType::Journal, "## 📚 Academic Journals"),
    (SourceType::Paper, "## 📄 Research Papers"),
    (SourceType::News, "## 📰 Industry News"),
];

pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("# 6G Technology Intelligence Report\n\n");
    out.push_str(&format!("**Generated**: {}\n", report.generated_at));
    out.push_str(&format!("**Keyword**: {}\n\n", report.keyword));
    out.push_str("---\n\n");

    for (kind, header) in SECTIONS {
        let records = report.of_type(kind);
        if records.is_empty() {
            continue;
        }
        out.push_str(header);
        out.push_str("\n\n");
        for (i, rec) in records.iter().enumerate() {
            out.push_str(&format!("### {}. {}\n\n", i + 1, rec.title));
            out.push_str(&format!("**제목**: {}\n\n", rec.title));
            out.push_str(&format!("**요약한 내용**:\n{}\n\n", rec.summary));
            out.push_str(&format!("**우리에게 주는 메시지**:\n{}\n\n", rec.message));
            out.push_str(&format!("**출처링크**: {}\n\n", rec.url));
            out.push_str("---\n\n");
        }
    }

    if report.summaries.is_empty() {
        out.push_str("_오늘 수집된 자료가 없습니다._\n");
    }
    out
}

/// Write the report under the output directory, named by the run's date.
/// Returns the written path.
pub fn write_report(report: &Report, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output dir {}", output_dir.display()))?;
    let path = output_dir.join(format!("6g_report_{}.md", report.generated_at));
    fs::write(&path, render_markdown(report))
        .with_context(|| format!("writing report to {}", path.display()))?;
    Ok(path)
}
