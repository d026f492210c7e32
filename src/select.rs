// src/select.rs
//! AI-driven item selection: rank the collection batch against the 6G
//! engineer rubric and keep a bounded top-N. Falls back to the batch prefix,
//! so a non-empty batch always yields a selection of exactly min(N, batch).

use metrics::counter;
use tracing::{info, warn};

use crate::ai::{extract_json, TextModel};
use crate::report::SourceItem;

/// Selection criteria handed to the ranking call.
const RUBRIC: &str = "\
- practical relevance to working 6G engineers (testbeds, prototypes, field trials)\n\
- technical novelty over the current state of the art\n\
- impact on network architecture, air interface, or protocol design\n\
- standardization significance (3GPP, ITU-R IMT-2030)\n\
- deployment feasibility within the next development cycle";

fn build_prompt(batch: &[SourceItem], max: usize) -> String {
    let mut listing = String::new();
    for (i, item) in batch.iter().enumerate() {
        let desc: String = item.description.chars().take(300).collect();
        listing.push_str(&format!(
            "{n}. [{kind}] {title}\nDescription: {desc}\nLink: {url}\n\n",
            n = i + 1,
            kind = item.source_type.as_str(),
            title = item.title,
            url = item.url,
        ));
    }
    format!(
        "You are a senior 6G research engineer curating a daily intelligence digest.\n\
Rank the following collected items against these criteria:\n{RUBRIC}\n\n\
Items:\n{listing}\
Return ONLY a JSON array of the item numbers of the top {max} items, best \
first, e.g. [3, 1, 7]. No markdown, no explanation."
    )
}

/// Resolve AI-returned 1-based references against the batch: out-of-range and
/// duplicate references are discarded, and the result is topped up from the
/// batch prefix so the selection size is always min(max, batch).
fn resolve_refs(refs: &[usize], batch: &[SourceItem], max: usize) -> Vec<SourceItem> {
    let want = max.min(batch.len());
    let mut picked: Vec<usize> = Vec::with_capacity(want);
    for &r in refs {
        if picked.len() >= want {
            break;
        }
        if r == 0 || r > batch.len() {
            warn!(reference = r, batch = batch.len(), "discarding unresolvable selection reference");
            continue;
        }
        let idx = r - 1;
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }
    // Top up from the batch prefix in aggregation order.
    for idx in 0..batch.len() {
        if picked.len() >= want {
            break;
        }
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }
    picked.into_iter().map(|i| batch[i].clone()).collect()
}

fn fallback_prefix(batch: &[SourceItem], max: usize) -> Vec<SourceItem> {
    batch.iter().take(max).cloned().collect()
}

/// Produce the SelectionResult for one run.
pub async fn select_top(
    model: &dyn TextModel,
    batch: &[SourceItem],
    max: usize,
) -> Vec<SourceItem> {
    if batch.is_empty() {
        return Vec::new();
    }

    let raw = match model.generate(&build_prompt(batch, max)).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, provider = model.name(), "selection call failed, falling back to batch prefix");
            counter!("ai_fallback_total").increment(1);
            return fallback_prefix(batch, max);
        }
    };

    match serde_json::from_str::<Vec<usize>>(extract_json(&raw)) {
        Ok(refs) => {
            let selected = resolve_refs(&refs, batch, max);
            info!(selected = selected.len(), batch = batch.len(), "selection ranked");
            selected
        }
        Err(e) => {
            warn!(error = %e, "selection response was not a JSON index list, falling back");
            counter!("ai_fallback_total").increment(1);
            fallback_prefix(batch, max)
        }
    }
}
