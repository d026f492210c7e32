// tests/providers_arxiv.rs
use sixg_intel::collect::arxiv::ArxivCollector;
use sixg_intel::collect::SourceCollector;
use sixg_intel::SourceType;
use std::fs;

#[tokio::test]
async fn parses_fixture_without_recency_filter() {
    let xml = fs::read_to_string("tests/fixtures/arxiv_atom.xml").expect("fixture");
    let c = ArxivCollector::from_fixture_str(&xml);
    let items = c.fetch("6G", 10, 7).await.expect("ok");

    // All four preprints survive, including the 2024 one: age is not
    // indicative of relevance for research output.
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|i| i.source_type == SourceType::Paper));
    assert!(items.iter().all(|i| i.url.starts_with("http://arxiv.org/abs/")));
    assert!(items.iter().all(|i| i.published_at.is_some()));
    assert!(items
        .iter()
        .any(|i| i.title.contains("Non-Terrestrial Network")));
}

#[tokio::test]
async fn limit_is_respected() {
    let xml = fs::read_to_string("tests/fixtures/arxiv_atom.xml").expect("fixture");
    let c = ArxivCollector::from_fixture_str(&xml);
    let items = c.fetch("6G", 2, 7).await.expect("ok");
    assert_eq!(items.len(), 2);
}
