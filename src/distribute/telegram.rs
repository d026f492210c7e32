// src/distribute/telegram.rs
//! Chat channel: Telegram `sendMessage` with a length-bounded Markdown
//! message. The message is assembled block by block; once the 4096-character
//! cap would be exceeded the remaining items are omitted from the tail.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::ChatConfig;
use crate::report::{Report, SourceType};

/// Telegram's hard message length cap.
pub const MESSAGE_CAP: usize = 4096;

const TRUNCATION_NOTE: &str = "\n_... 이하 생략 (전체 내용은 이메일 참조)_";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
}

/// Escape Telegram Markdown control characters in free text.
pub fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '_' | '*' | '[' | ']' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn chars(s: &str) -> usize {
    s.chars().count()
}

fn section_header(kind: SourceType) -> &'static str {
    match kind {
        SourceType::Journal => "📚 *ACADEMIC JOURNALS*\n\n",
        SourceType::Paper => "📄 *RESEARCH PAPERS*\n\n",
        SourceType::News => "📰 *INDUSTRY NEWS*\n\n",
    }
}

fn item_block(n: usize, title: &str, summary: &str, message: &str, url: &str) -> String {
    let title: String = title.chars().take(80).collect();
    let summary: String = summary.chars().take(120).collect();
    let message: String = message.chars().take(100).collect();
    format!(
        "*{n}. {t}*\n\n📝 {s}\n\n💡 _{m}_\n\n🔗 [원문 보기]({url})\n\n─────────────\n\n",
        t = escape_markdown(&title),
        s = escape_markdown(&summary),
        m = escape_markdown(&message),
    )
}

/// Build the digest message. The serialized length never exceeds
/// [`MESSAGE_CAP`]; whole item blocks are dropped from the tail instead of
/// cutting mid-sentence.
pub fn render_message(report: &Report) -> String {
    let mut msg = format!(
        "🔬 *6G Technology Intelligence Report*\n📅 _{}_\n\n📊 *Quick Summary*\n├─ 📚 Journals: {}\n├─ 📄 Papers: {}\n└─ 📰 News: {}\n\n━━━━━━━━━━━━━━━━━━━━\n\n",
        escape_markdown(&report.generated_at),
        report.of_type(SourceType::Journal).len(),
        report.of_type(SourceType::Paper).len(),
        report.of_type(SourceType::News).len(),
    );

    let reserve = chars(TRUNCATION_NOTE);
    let mut truncated = false;

    'outer: for kind in [SourceType::Journal, SourceType::Paper, SourceType::News] {
        let records = report.of_type(kind);
        if records.is_empty() {
            continue;
        }
        let header = section_header(kind);
        if chars(&msg) + chars(header) + reserve > MESSAGE_CAP {
            truncated = true;
            break;
        }
        msg.push_str(header);
        for (i, rec) in records.iter().enumerate() {
            let block = item_block(i + 1, &rec.title, &rec.summary, &rec.message, &rec.url);
            if chars(&msg) + chars(&block) + reserve > MESSAGE_CAP {
                truncated = true;
                break 'outer;
            }
            msg.push_str(&block);
        }
    }

    if truncated {
        msg.push_str(TRUNCATION_NOTE);
    }
    debug_assert!(chars(&msg) <= MESSAGE_CAP);
    msg
}

pub async fn send_report(report: &Report, cfg: &ChatConfig) -> Result<()> {
    let text = render_message(report);
    let url = format!("https://api.telegram.org/bot{}/sendMessage", cfg.bot_token);
    let payload = SendMessage {
        chat_id: &cfg.chat_id,
        text: &text,
        parse_mode: "Markdown",
        disable_web_page_preview: true,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .context("reqwest client")?;
    client
        .post(&url)
        .json(&payload)
        .send()
        .await
        .context("telegram post")?
        .error_for_status()
        .context("telegram non-2xx")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SummaryRecord;

    fn record(i: usize, kind: SourceType) -> SummaryRecord {
        SummaryRecord {
            title: format!("제목 {i} with *markdown* and _underscores_"),
            summary: "요약 ".repeat(30),
            message: "시사점 ".repeat(20),
            url: format!("https://example.com/{i}"),
            kind,
        }
    }

    fn report(n: usize) -> Report {
        Report {
            summaries: (0..n).map(|i| record(i, SourceType::News)).collect(),
            generated_at: "2026-08-30".into(),
            keyword: "kw".into(),
        }
    }

    #[test]
    fn markdown_specials_are_escaped() {
        let out = escape_markdown("a_b *c* [d](e) `f`");
        assert_eq!(out, "a\\_b \\*c\\* \\[d\\](e) \\`f\\`");
    }

    #[test]
    fn message_never_exceeds_cap() {
        for n in [0usize, 1, 3, 10, 50, 200] {
            let msg = render_message(&report(n));
            assert!(
                msg.chars().count() <= MESSAGE_CAP,
                "cap exceeded for n={n}: {}",
                msg.chars().count()
            );
        }
    }

    #[test]
    fn small_report_fits_untruncated() {
        let msg = render_message(&report(2));
        assert!(msg.contains("*1. "));
        assert!(msg.contains("*2. "));
        assert!(!msg.contains("이하 생략"));
    }

    #[test]
    fn oversized_report_drops_tail_items_with_note() {
        let msg = render_message(&report(50));
        assert!(msg.chars().count() <= MESSAGE_CAP);
        assert!(msg.contains("이하 생략"));
        // the head of the digest is still present
        assert!(msg.contains("Quick Summary"));
        assert!(msg.contains("*1. "));
    }

    #[test]
    fn empty_report_is_just_the_header() {
        let msg = render_message(&report(0));
        assert!(msg.contains("Journals: 0"));
        assert!(!msg.contains("INDUSTRY NEWS"));
    }
}
