// src/collect/news_atom.rs
//! News collector over an industry Atom feed (6GWorld by default). Dates are
//! RFC 3339; an entry with a missing or unparsable timestamp is KEPT
//! (fail-open), unlike the RSS collector. This feed's date field is the less
//! reliable of the two, so an unreadable date says nothing about the entry.
//! Do not unify the two policies.

use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::collect::SourceCollector;
use crate::error::FetchError;
use crate::report::{SourceItem, SourceType};

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    title: Option<String>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<TextNode>,
    content: Option<TextNode>,
}

/// Atom text constructs carry a `type` attribute; only the text matters here.
#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "$text")]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn parse_rfc3339(ts: &str) -> Option<i64> {
    OffsetDateTime::parse(ts.trim(), &Rfc3339)
        .ok()
        .map(|dt| dt.unix_timestamp())
}

impl Entry {
    fn alternate_link(&self) -> Option<String> {
        self.links
            .iter()
            .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
            .and_then(|l| l.href.clone())
    }
}

enum Mode {
    Http { client: reqwest::Client, url: String },
    // Canned XML with a pinned clock, so filtering is deterministic.
    Fixture { xml: String, now_unix: i64 },
}

pub struct NewsAtomCollector {
    mode: Mode,
}

impl NewsAtomCollector {
    pub fn from_url(url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("sixg-intel/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            mode: Mode::Http { client, url },
        }
    }

    pub fn from_fixture_str(xml: &str, now_unix: i64) -> Self {
        Self {
            mode: Mode::Fixture {
                xml: xml.to_string(),
                now_unix,
            },
        }
    }

    /// Parse + recency-filter against an explicit clock so tests can pin it.
    pub fn parse_feed(
        xml: &str,
        now_unix: i64,
        limit: usize,
        max_age_days: i64,
    ) -> Result<Vec<SourceItem>, FetchError> {
        let t0 = std::time::Instant::now();
        let feed: Feed = from_str(xml).map_err(|e| FetchError::Parse(format!("news atom: {e}")))?;

        let cutoff = now_unix - max_age_days * 86_400;
        let mut out = Vec::new();
        for e in feed.entries {
            if out.len() >= limit {
                break;
            }
            let Some(title) = e.title.clone() else {
                continue;
            };
            let Some(url) = e.alternate_link() else {
                continue;
            };
            let ts = e
                .published
                .as_deref()
                .or(e.updated.as_deref())
                .and_then(parse_rfc3339);
            match ts {
                Some(ts) if ts < cutoff => {
                    counter!("collect_stale_dropped_total").increment(1);
                    continue;
                }
                Some(_) => {}
                None => {
                    // fail-open: keep the entry, just flag the bad date
                    tracing::warn!(source = "news-atom", title = %title, "keeping item with unparsable date");
                    counter!("collect_bad_date_total").increment(1);
                }
            }
            out.push(SourceItem {
                description: e
                    .summary
                    .and_then(|t| t.value)
                    .or_else(|| e.content.and_then(|t| t.value))
                    .unwrap_or_else(|| title.clone()),
                title,
                url,
                published_at: ts,
                source_type: SourceType::News,
            });
        }

        histogram!("collect_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl SourceCollector for NewsAtomCollector {
    async fn fetch(
        &self,
        _query: &str,
        limit: usize,
        max_age_days: i64,
    ) -> Result<Vec<SourceItem>, FetchError> {
        match &self.mode {
            Mode::Fixture { xml, now_unix } => {
                Self::parse_feed(xml, *now_unix, limit, max_age_days)
            }
            Mode::Http { client, url } => {
                let now = chrono::Utc::now().timestamp();
                let resp = client.get(url).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::from_status(status, "news atom feed"));
                }
                let body = resp
                    .text()
                    .await
                    .map_err(|e| FetchError::Network(format!("news atom body: {e}")))?;
                Self::parse_feed(&body, now, limit, max_age_days)
            }
        }
    }

    fn name(&self) -> &'static str {
        "news-atom"
    }
}
