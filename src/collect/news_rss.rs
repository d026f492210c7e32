// src/collect/news_rss.rs
//! News collector over the Google News RSS search feed. `pubDate` is
//! RFC 2822; an item with a missing or unparsable date is dropped
//! (fail-closed): this feed's date field is trusted, so an unreadable one
//! marks the entry itself as suspect. The Atom-dialect collector takes the
//! opposite stance; the asymmetry is intentional.

use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::{format_description::well_known::Rfc2822, OffsetDateTime, UtcOffset};

use crate::collect::SourceCollector;
use crate::error::FetchError;
use crate::report::{SourceItem, SourceType};

const FEED_URL: &str = "https://news.google.com/rss/search";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

fn parse_rfc2822(ts: &str) -> Option<i64> {
    // Google News emits the obsolete "GMT" zone name, which the strict
    // parser rejects; map it to a numeric offset first.
    let ts = ts.trim();
    let normalized = ts
        .strip_suffix(" GMT")
        .or_else(|| ts.strip_suffix(" UT"))
        .map(|head| format!("{head} +0000"));
    OffsetDateTime::parse(normalized.as_deref().unwrap_or(ts), &Rfc2822)
        .ok()
        .map(|dt| dt.to_offset(UtcOffset::UTC).unix_timestamp())
}

enum Mode {
    Http { client: reqwest::Client },
    // Canned XML with a pinned clock, so filtering is deterministic.
    Fixture { xml: String, now_unix: i64 },
}

pub struct GoogleNewsRssCollector {
    mode: Mode,
}

impl Default for GoogleNewsRssCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleNewsRssCollector {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            mode: Mode::Http { client },
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
        let rss: Rss = from_str(xml).map_err(|e| FetchError::Parse(format!("news rss: {e}")))?;

        let cutoff = now_unix - max_age_days * 86_400;
        let mut out = Vec::new();
        for it in rss.channel.item {
            if out.len() >= limit {
                break;
            }
            let (Some(title), Some(url)) = (it.title, it.link) else {
                continue;
            };
            let published_at = match it.pub_date.as_deref().and_then(parse_rfc2822) {
                Some(ts) => ts,
                None => {
                    // fail-closed: no trustworthy date, no inclusion
                    tracing::warn!(source = "news-rss", title = %title, "dropping item with unparsable pubDate");
                    counter!("collect_bad_date_total").increment(1);
                    continue;
                }
            };
            if published_at < cutoff {
                counter!("collect_stale_dropped_total").increment(1);
                continue;
            }
            out.push(SourceItem {
                description: it.description.unwrap_or_else(|| title.clone()),
                title,
                url,
                published_at: Some(published_at),
                source_type: SourceType::News,
            });
        }

        histogram!("collect_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }
}

#[async_trait]
impl SourceCollector for GoogleNewsRssCollector {
    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        max_age_days: i64,
    ) -> Result<Vec<SourceItem>, FetchError> {
        match &self.mode {
            Mode::Fixture { xml, now_unix } => {
                Self::parse_feed(xml, *now_unix, limit, max_age_days)
            }
            Mode::Http { client } => {
                let now = chrono::Utc::now().timestamp();
                let resp = client
                    .get(FEED_URL)
                    .query(&[("q", query), ("hl", "ko"), ("gl", "KR"), ("ceid", "KR:ko")])
                    .send()
                    .await?;

                let status = resp.status();
                if !status.is_success() {
                    return Err(FetchError::from_status(status, "google news rss"));
                }
                let body = resp
                    .text()
                    .await
                    .map_err(|e| FetchError::Network(format!("news rss body: {e}")))?;
                Self::parse_feed(&body, now, limit, max_age_days)
            }
        }
    }

    fn name(&self) -> &'static str {
        "news-rss"
    }
}
