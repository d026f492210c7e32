// src/collect/journal.rs
//! Journal collector: authenticated IEEE Xplore metadata API. Only built when
//! a credential is configured; a rejected key degrades to an empty
//! contribution at the aggregator boundary.

use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;

use crate::collect::SourceCollector;
use crate::error::FetchError;
use crate::report::{SourceItem, SourceType};

const API_URL: &str = "https://ieeexploreapi.ieee.org/api/v1/search/articles";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    html_url: Option<String>,
    pdf_url: Option<String>,
}

pub struct JournalApiCollector {
    http: reqwest::Client,
    api_key: String,
}

impl JournalApiCollector {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("sixg-intel/0.1")
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self { http, api_key }
    }

    fn items_from_response(resp: ApiResponse, limit: usize) -> Vec<SourceItem> {
        resp.articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title?;
                let url = a.html_url.or(a.pdf_url)?;
                Some(SourceItem {
                    description: a.abstract_text.unwrap_or_else(|| title.clone()),
                    title,
                    url,
                    // Xplore results are relevance-ranked; no recency cutoff.
                    published_at: None,
                    source_type: SourceType::Journal,
                })
            })
            .take(limit)
            .collect()
    }
}

#[async_trait]
impl SourceCollector for JournalApiCollector {
    async fn fetch(
        &self,
        query: &str,
        limit: usize,
        _max_age_days: i64,
    ) -> Result<Vec<SourceItem>, FetchError> {
        let t0 = std::time::Instant::now();
        let resp = self
            .http
            .get(API_URL)
            .query(&[
                ("apikey", self.api_key.clone()),
                ("querytext", query.to_string()),
                ("max_records", limit.to_string()),
                ("sort_order", "desc".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::from_status(status, "ieee xplore"));
        }

        let body: ApiResponse = resp
            .json()
            .await
            .map_err(|e| FetchError::Parse(format!("ieee xplore body: {e}")))?;

        let out = Self::items_from_response(body, limit);
        histogram!("collect_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "journal"
    }
}
