// src/summarize.rs
//! AI summarization: one call per selected item with a dual-persona prompt,
//! producing the Report. Malformed output goes to the diagnostics sink and is
//! replaced by a raw-description fallback record; no item is ever dropped.

use metrics::counter;
use serde::Deserialize;
use tracing::warn;

use crate::ai::{escape_control_chars_in_strings, extract_json, TextModel};
use crate::diag::DiagnosticSink;
use crate::report::{Report, SourceItem, SummaryRecord};

const FALLBACK_DESCRIPTION_CAP: usize = 300;
const EMPTY_DESCRIPTION_PLACEHOLDER: &str = "내용을 확인하세요.";

/// Shape the model is asked to produce for one item. `title`, `url` and
/// `type` are requested for anchoring but re-imposed from the item itself.
#[derive(Debug, Deserialize)]
struct AiSummary {
    summary: String,
    message: String,
}

fn build_prompt(item: &SourceItem) -> String {
    let desc: String = item.description.chars().take(600).collect();
    format!(
        "당신은 두 관점을 함께 가진 6G 전문가입니다: 이론을 연구하는 학자이자 \
현장 시스템을 설계하는 실무 엔지니어입니다.\n\n\
다음 {kind} 자료를 분석하세요:\n\
제목: {title}\n\
설명: {desc}\n\
링크: {url}\n\n\
반드시 JSON 객체만 반환하고 다른 텍스트는 포함하지 마세요:\n\
{{\n\
  \"title\": \"{title}\",\n\
  \"summary\": \"핵심 내용을 3-4문장으로 요약 (한국어)\",\n\
  \"message\": \"이 자료가 6G 엔지니어에게 주는 핵심 메시지와 실무적 시사점 (한국어)\",\n\
  \"url\": \"{url}\",\n\
  \"type\": \"{kind}\"\n\
}}",
        kind = item.source_type.as_str(),
        title = item.title,
        url = item.url,
    )
}

/// Strict parse of one untrusted AI response. The only repairs are wrapper
/// stripping and, when the strict parse fails, one deterministic pass
/// escaping raw control characters inside string literals.
fn parse_ai_summary(raw: &str) -> Result<AiSummary, serde_json::Error> {
    let body = extract_json(raw);
    match serde_json::from_str::<AiSummary>(body) {
        Ok(s) => Ok(s),
        Err(first) => {
            let repaired = escape_control_chars_in_strings(body);
            serde_json::from_str::<AiSummary>(&repaired).map_err(|_| first)
        }
    }
}

/// Fallback record built directly from the collected item, no AI content.
pub fn fallback_record(item: &SourceItem) -> SummaryRecord {
    let summary = if item.description.trim().is_empty() {
        EMPTY_DESCRIPTION_PLACEHOLDER.to_string()
    } else {
        item.description
            .chars()
            .take(FALLBACK_DESCRIPTION_CAP)
            .collect()
    };
    SummaryRecord {
        title: item.title.clone(),
        summary,
        message: format!(
            "6G 기술 발전의 최신 동향을 보여주는 {} 자료입니다.",
            item.source_type.as_str()
        ),
        url: item.url.clone(),
        kind: item.source_type,
    }
}

fn record_from_ai(item: &SourceItem, ai: AiSummary) -> SummaryRecord {
    SummaryRecord {
        title: item.title.clone(),
        summary: ai.summary,
        message: ai.message,
        url: item.url.clone(),
        kind: item.source_type,
    }
}

/// Expand the SelectionResult into the run's Report. Exactly one record per
/// selected item, AI-derived where possible, fallback otherwise.
pub async fn summarize(
    model: &dyn TextModel,
    selected: &[SourceItem],
    keyword: &str,
    generated_at: &str,
    sink: &DiagnosticSink,
) -> Report {
    let mut summaries = Vec::with_capacity(selected.len());
    for item in selected {
        let record = match model.generate(&build_prompt(item)).await {
            Ok(raw) => match parse_ai_summary(&raw) {
                Ok(ai) => record_from_ai(item, ai),
                Err(e) => {
                    sink.capture_parse_failure("summarize", &raw, &e);
                    counter!("ai_fallback_total").increment(1);
                    fallback_record(item)
                }
            },
            Err(e) => {
                warn!(error = %e, title = %item.title, "summarization call failed, using fallback record");
                counter!("ai_fallback_total").increment(1);
                fallback_record(item)
            }
        };
        summaries.push(record);
    }

    Report {
        summaries,
        generated_at: generated_at.to_string(),
        keyword: keyword.to_string(),
    }
}
