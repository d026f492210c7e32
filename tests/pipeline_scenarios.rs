// tests/pipeline_scenarios.rs
//! Scenario tests over the composed stages, with fixture feeds and mock AI.

use std::fs;

use sixg_intel::ai::{DisabledModel, MockModel};
use sixg_intel::collect::{self, arxiv::ArxivCollector, SourceCollector};
use sixg_intel::diag::DiagnosticSink;
use sixg_intel::report::{SourceItem, SourceType};
use sixg_intel::{select, summarize};

fn item(title: &str, kind: SourceType) -> SourceItem {
    SourceItem {
        title: title.into(),
        url: format!("https://example.com/{title}"),
        published_at: Some(1_788_000_000),
        description: format!("description of {title}"),
        source_type: kind,
    }
}

const GOOD_SUMMARY: &str =
    r#"{"title": "t", "summary": "핵심 요약.", "message": "실무 시사점.", "url": "u", "type": "News"}"#;

#[tokio::test]
async fn two_item_batch_flows_through_to_a_two_record_report() {
    // CollectionBatch = 2 items (1 journal, 1 news, both recent).
    let batch = vec![item("journal-a", SourceType::Journal), item("news-b", SourceType::News)];

    let select_model = MockModel::always("[2, 1]");
    let selected = select::select_top(&select_model, &batch, 10).await;
    assert_eq!(selected.len(), 2); // both, since <= 10

    let tmp = tempfile::tempdir().unwrap();
    let sink = DiagnosticSink::new(tmp.path().join("diagnostics"));
    let sum_model = MockModel::new(vec![Ok(GOOD_SUMMARY.into()), Ok(GOOD_SUMMARY.into())]);
    let report = summarize::summarize(&sum_model, &selected, "kw", "2026-08-30", &sink).await;

    assert_eq!(report.summaries.len(), 2);
    assert_eq!(report.summaries[0].title, "news-b"); // ranked first by the mock
    assert_eq!(report.summaries[1].kind, SourceType::Journal);
}

#[tokio::test]
async fn no_credentials_run_produces_fallback_report_and_file_only() {
    // Journal needs a key, the AI is disabled, mail/chat are not configured;
    // only the unauthenticated preprint collector yields anything.
    let xml = fs::read_to_string("tests/fixtures/arxiv_atom.xml").expect("fixture");
    let collectors: Vec<Box<dyn SourceCollector>> =
        vec![Box::new(ArxivCollector::from_fixture_str(&xml))];

    let batch = collect::collect_all(&collectors, "6G network technology trends", 5, 7).await;
    assert_eq!(batch.len(), 4);

    let selected = select::select_top(&DisabledModel, &batch, 10).await;
    assert_eq!(selected.len(), 4); // fallback prefix, min(10, 4)

    let tmp = tempfile::tempdir().unwrap();
    let sink = DiagnosticSink::new(tmp.path().join("diagnostics"));
    let report =
        summarize::summarize(&DisabledModel, &selected, "6G", "2026-08-30", &sink).await;

    // 4 fallback-shaped records: raw descriptions, fixed Korean message.
    assert_eq!(report.summaries.len(), 4);
    assert!(report
        .summaries
        .iter()
        .all(|r| r.message.contains("Paper 자료입니다")));

    // FileStore is the only channel that can run; it must succeed.
    let cfg = sixg_intel::AppConfig::bare(tmp.path().to_path_buf());
    sixg_intel::distribute::distribute_all(&report, &cfg).await;
    let path = tmp.path().join("6g_report_2026-08-30.md");
    assert!(path.exists());
    let md = fs::read_to_string(path).unwrap();
    assert!(md.contains("Research Papers"));
}

#[test]
fn collector_assembly_gates_on_journal_credential_and_keeps_order() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = sixg_intel::AppConfig::bare(tmp.path().to_path_buf());

    // No journal credential: the journal variant is absent, order is stable.
    let collectors = collect::build_collectors(&cfg);
    let names: Vec<_> = collectors.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["arxiv", "news-rss", "news-atom"]);

    // With a credential the journal collector leads the batch order.
    let mut cfg = cfg;
    cfg.journal_api_key = Some("xplore-key".into());
    let collectors = collect::build_collectors(&cfg);
    let names: Vec<_> = collectors.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["journal", "arxiv", "news-rss", "news-atom"]);
}

const NOW: i64 = 1_788_048_000; // 2026-08-30 00:00:00 UTC

const SMALL_RSS: &str = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>
<item><title>fresh-rss-1</title><link>https://news.example/1</link><pubDate>Fri, 28 Aug 2026 09:00:00 GMT</pubDate><description>d1</description></item>
<item><title>fresh-rss-2</title><link>https://news.example/2</link><pubDate>Sat, 29 Aug 2026 12:00:00 GMT</pubDate><description>d2</description></item>
<item><title>stale-rss</title><link>https://news.example/3</link><pubDate>Mon, 10 Aug 2026 08:00:00 GMT</pubDate><description>d3</description></item>
</channel></rss>"#;

const SMALL_ATOM: &str = r#"<?xml version="1.0"?><feed xmlns="http://www.w3.org/2005/Atom"><title>t</title>
<entry><title>fresh-atom-1</title><link rel="alternate" href="https://industry.example/1"/><published>2026-08-27T10:00:00Z</published><summary>d4</summary></entry>
<entry><title>stale-atom</title><link rel="alternate" href="https://industry.example/2"/><published>2026-06-01T00:00:00Z</published><summary>d5</summary></entry>
</feed>"#;

#[tokio::test]
async fn journal_less_run_filters_to_in_window_batch_and_still_reports() {
    use sixg_intel::collect::{news_atom::NewsAtomCollector, news_rss::GoogleNewsRssCollector};

    // Journal credential absent; the two news feeds yield 5 items between
    // them, 3 of which are inside the 7-day window.
    let collectors: Vec<Box<dyn SourceCollector>> = vec![
        Box::new(GoogleNewsRssCollector::from_fixture_str(SMALL_RSS, NOW)),
        Box::new(NewsAtomCollector::from_fixture_str(SMALL_ATOM, NOW)),
    ];
    let batch = collect::collect_all(&collectors, "6G", 5, 7).await;
    let titles: Vec<_> = batch.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["fresh-rss-1", "fresh-rss-2", "fresh-atom-1"]);

    let selected = select::select_top(&DisabledModel, &batch, 10).await;
    let tmp = tempfile::tempdir().unwrap();
    let sink = DiagnosticSink::new(tmp.path().join("diagnostics"));
    let report =
        summarize::summarize(&DisabledModel, &selected, "6G", "2026-08-30", &sink).await;
    assert_eq!(report.summaries.len(), 3);
}

#[tokio::test]
async fn empty_batch_yields_an_empty_but_valid_report() {
    let selected = select::select_top(&DisabledModel, &[], 10).await;
    assert!(selected.is_empty());

    let tmp = tempfile::tempdir().unwrap();
    let sink = DiagnosticSink::new(tmp.path().join("diagnostics"));
    let report = summarize::summarize(&DisabledModel, &selected, "kw", "2026-08-30", &sink).await;
    assert!(report.summaries.is_empty());

    // The empty digest is still deliverable.
    let path = sixg_intel::distribute::file_store::write_report(&report, tmp.path()).unwrap();
    assert!(fs::read_to_string(path)
        .unwrap()
        .contains("오늘 수집된 자료가 없습니다"));
    let msg = sixg_intel::distribute::telegram::render_message(&report);
    assert!(msg.chars().count() <= sixg_intel::distribute::telegram::MESSAGE_CAP);
}

#[tokio::test]
async fn one_malformed_summary_among_three_is_replaced_and_diagnosed() {
    let selected = vec![
        item("a", SourceType::Journal),
        item("b", SourceType::Paper),
        item("c", SourceType::News),
    ];
    let model = MockModel::new(vec![
        Ok(GOOD_SUMMARY.into()),
        Ok("Sure! Here is the summary you asked for.".into()), // no JSON at all
        Ok(GOOD_SUMMARY.into()),
    ]);

    let tmp = tempfile::tempdir().unwrap();
    let sink = DiagnosticSink::new(tmp.path().join("diagnostics"));
    let report = summarize::summarize(&model, &selected, "kw", "2026-08-30", &sink).await;

    assert_eq!(report.summaries.len(), 3);
    let fallback: Vec<_> = report
        .summaries
        .iter()
        .filter(|r| r.summary.starts_with("description of"))
        .collect();
    assert_eq!(fallback.len(), 1);
    assert_eq!(fallback[0].title, "b");

    // A diagnostic artifact with the raw response was written.
    let entries: Vec<_> = fs::read_dir(tmp.path().join("diagnostics"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries.len(), 1);
    let raw = fs::read_to_string(entries[0].path()).unwrap();
    assert!(raw.contains("Sure!"));
}
