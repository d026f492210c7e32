// src/collect/arxiv.rs
//! Preprint collector: unauthenticated arXiv export API (Atom). Preprint age
//! is not indicative of relevance, so no recency filter is applied here.

use async_trait::async_trait;
use metrics::histogram;
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::collect::SourceCollector;
use crate::error::FetchError;
use crate::report::{SourceItem, SourceType};

const API_URL: &str = "https://export.arxiv.org/api/query";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
}

enum Mode {
    Http { client: reqwest::Client },
    Fixture(String),
}

pub struct ArxivCollector {
    mode: Mode,
}

impl Default for ArxivCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivCollector {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("sixg-intel/0.1")
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            mode: Mode::Http { client },
        }
    }

    pub fn from_fixture_str(xml: &str) -> Self {
        Self {
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<SourceItem>, FetchError> {
        let t0 = std::time::Instant::now();
        let feed: Feed =
            from_str(xml).map_err(|e| FetchError::Parse(format!("arxiv atom: {e}")))?;

        let mut out = Vec::with_capacity(feed.entries.len().min(limit));
        for e in feed.entries {
            if out.len() >= limit {
                break;
            }
            let (Some(title), Some(url)) = (e.title, e.id) else {
                continue;
            };
            let published_at = e
                .published
                .as_deref()
                .and_then(|ts| OffsetDateTime::parse(ts, &Rfc3339).ok())
                .map(|dt| dt.unix_timestamp());
            out.push(SourceItem {
                description: e.summary.unwrap_or_else(|| title.clone()),
                title,
                url,
                published_at,
                source_type: SourceType::Paper,
            });
        }

        histogram!("collect_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl SourceCollector for ArxivCollector {
    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        _max_age_days: i64,
    ) -> Result<Vec<SourceItem>, FetchError> {
        match &self.mode {
            Mode::Fixture(xml) => Self::parse_feed(xml, limit),
            Mode::Http { client } => {
                let resp = client
                    .get(API_URL)
                    .query(&[
                        ("search_query", format!("all:{query}")),
                        ("start", "0".to_string()),
                        ("max_results", limit.to_string()),
                        ("sortBy", "relevance".to_string()),
                        ("sortOrder", "descending".to_string()),
                    ])
                    .send()
                    .await?;

                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::from_status(status, "arxiv"));
                }
                let body = resp
                    .text()
                    .await
                    .map_err(|e| FetchError::Network(format!("arxiv body: {e}")))?;
                Self::parse_feed(&body, limit)
            }
        }
    }

    fn name(&self) -> &'static str {
        "arxiv"
    }
}
