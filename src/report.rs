// src/report.rs
//! Data model of one run: collected items, the summarized records, and the
//! terminal Report artifact consumed identically by every delivery channel.

use serde::{Deserialize, Serialize};

/// Which kind of source an item came from. Serialized exactly as
/// "Journal" | "Paper" | "News" (wire contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Journal,
    Paper,
    News,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Journal => "Journal",
            SourceType::Paper => "Paper",
            SourceType::News => "News",
        }
    }
}

/// One raw item as collected from a source. Read-only once collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    pub title: String,
    pub url: String,
    /// Unix seconds; None when the source carries no usable timestamp.
    pub published_at: Option<i64>,
    pub description: String,
    pub source_type: SourceType,
}

/// One summarized entry of the digest, either AI-derived or the
/// raw-description fallback. Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub title: String,
    /// Korean, 3-4 sentences.
    pub summary: String,
    /// Korean practical-implications message.
    pub message: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SourceType,
}

/// Terminal artifact of one run. `generated_at` is fixed once at run start
/// and reused by every channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub summaries: Vec<SummaryRecord>,
    #[serde(rename = "generatedAt")]
    pub generated_at: String,
    /// The hot keyword that parameterized this run. Not part of the wire
    /// contract consumed by channels.
    #[serde(skip)]
    pub keyword: String,
}

impl Report {
    /// Records of one type, in report order.
    pub fn of_type(&self, kind: SourceType) -> Vec<&SummaryRecord> {
        self.summaries.iter().filter(|s| s.kind == kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_wire_contract_field_names() {
        let report = Report {
            summaries: vec![SummaryRecord {
                title: "T".into(),
                summary: "S".into(),
                message: "M".into(),
                url: "https://example.com".into(),
                kind: SourceType::Paper,
            }],
            generated_at: "2026-08-30".into(),
            keyword: "6G RIS beamforming".into(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["generatedAt"], "2026-08-30");
        assert_eq!(json["summaries"][0]["type"], "Paper");
        assert_eq!(json["summaries"][0]["title"], "T");
        // keyword must not leak into the wire shape
        assert!(json.get("keyword").is_none());
    }

    #[test]
    fn source_type_strings() {
        assert_eq!(
            serde_json::to_string(&SourceType::Journal).unwrap(),
            "\"Journal\""
        );
        assert_eq!(SourceType::News.as_str(), "News");
    }
}
