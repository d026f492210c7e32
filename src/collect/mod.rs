// src/collect/mod.rs
pub mod arxiv;
pub mod journal;
pub mod news_atom;
pub mod news_rss;

use async_trait::async_trait;
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::report::SourceItem;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collect_items_total", "Items kept across all collectors.");
        describe_counter!(
            "collect_source_errors_total",
            "Collector fetch/parse errors absorbed by the aggregator."
        );
        describe_counter!(
            "collect_stale_dropped_total",
            "Feed items dropped by the recency filter."
        );
        describe_counter!(
            "collect_bad_date_total",
            "Feed items with a missing or unparsable publication timestamp."
        );
        describe_histogram!("collect_parse_ms", "Per-source parse time in milliseconds.");
    });
}

/// The one capability every source variant implements.
#[async_trait]
pub trait SourceCollector: Send + Sync {
    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        max_age_days: i64,
    ) -> Result<Vec<SourceItem>, FetchError>;
    fn name(&self) -> &'static str;
}

/// Normalize source text: entity decode, tag strip, quote normalization,
/// whitespace collapse, length cap.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, " ").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }
    out
}

fn normalize_item(mut item: SourceItem) -> SourceItem {
    item.title = normalize_text(&item.title);
    item.description = normalize_text(&item.description);
    if item.description.is_empty() {
        item.description = item.title.clone();
    }
    item
}

/// Assemble the configured collectors in source-priority order. This order
/// is the batch order and must stay stable: the selector fallback depends
/// on it.
pub fn build_collectors(cfg: &AppConfig) -> Vec<Box<dyn SourceCollector>> {
    let mut out: Vec<Box<dyn SourceCollector>> = Vec::with_capacity(4);
    if let Some(key) = &cfg.journal_api_key {
        out.push(Box::new(journal::JournalApiCollector::new(key.clone())));
    }
    out.push(Box::new(arxiv::ArxivCollector::new()));
    out.push(Box::new(news_rss::GoogleNewsRssCollector::new()));
    out.push(Box::new(news_atom::NewsAtomCollector::from_url(
        cfg.news_atom_feed_url.clone(),
    )));
    out
}

/// Run every collector for the one hot keyword and concatenate the results
/// into the CollectionBatch. Collector failures are absorbed here; nothing
/// propagates past this boundary.
pub async fn collect_all(
    collectors: &[Box<dyn SourceCollector>],
    query: &str,
    limit: usize,
    max_age_days: i64,
) -> Vec<SourceItem> {
    ensure_metrics_described();

    let mut batch = Vec::new();
    for c in collectors {
        match c.fetch(query, limit, max_age_days).await {
            Ok(items) => {
                tracing::info!(source = c.name(), count = items.len(), "collected");
                batch.extend(items.into_iter().map(normalize_item));
            }
            Err(e) => {
                tracing::warn!(source = c.name(), error = %e, "collector failed, continuing");
                counter!("collect_source_errors_total").increment(1);
            }
        }
    }
    counter!("collect_items_total").increment(batch.len() as u64);
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SourceType;

    struct FixedCollector {
        name: &'static str,
        items: Vec<SourceItem>,
    }

    struct FailingCollector;

    #[async_trait]
    impl SourceCollector for FixedCollector {
        async fn fetch(
            &self,
            _query: &str,
            _limit: usize,
            _max_age_days: i64,
        ) -> Result<Vec<SourceItem>, FetchError> {
            Ok(self.items.clone())
        }
        fn name(&self) -> &'static str {
            self.name
        }
    }

    #[async_trait]
    impl SourceCollector for FailingCollector {
        async fn fetch(
            &self,
            _query: &str,
            _limit: usize,
            _max_age_days: i64,
        ) -> Result<Vec<SourceItem>, FetchError> {
            Err(FetchError::Network("connection refused".into()))
        }
        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn item(title: &str, kind: SourceType) -> SourceItem {
        SourceItem {
            title: title.into(),
            url: format!("https://example.com/{title}"),
            published_at: None,
            description: format!("about {title}"),
            source_type: kind,
        }
    }

    #[test]
    fn normalize_strips_tags_and_collapses_ws() {
        let s = "  <b>THz&nbsp;links</b>\n for   6G ";
        assert_eq!(normalize_text(s), "THz links for 6G");
    }

    #[test]
    fn empty_description_falls_back_to_title() {
        let it = normalize_item(SourceItem {
            title: "A title".into(),
            url: "u".into(),
            published_at: None,
            description: "<p></p>".into(),
            source_type: SourceType::News,
        });
        assert_eq!(it.description, "A title");
    }

    #[tokio::test]
    async fn failed_collector_does_not_poison_batch_order() {
        let collectors: Vec<Box<dyn SourceCollector>> = vec![
            Box::new(FixedCollector {
                name: "a",
                items: vec![item("a1", SourceType::Journal)],
            }),
            Box::new(FailingCollector),
            Box::new(FixedCollector {
                name: "b",
                items: vec![item("b1", SourceType::News), item("b2", SourceType::News)],
            }),
        ];
        let batch = collect_all(&collectors, "6G", 5, 7).await;
        let titles: Vec<_> = batch.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "b1", "b2"]);
    }

    #[tokio::test]
    async fn all_failed_yields_empty_batch() {
        let collectors: Vec<Box<dyn SourceCollector>> =
            vec![Box::new(FailingCollector), Box::new(FailingCollector)];
        let batch = collect_all(&collectors, "6G", 5, 7).await;
        assert!(batch.is_empty());
    }
}
