// src/distribute/email.rs
//! Email channel: SMTPS delivery with a table-based HTML body. Mail clients
//! disagree wildly on CSS support, so the renderer sticks to tables and
//! inline styles; this compatibility strategy is the only one kept.

use anyhow::{Context, Result};
use lettre::message::{Mailbox, Message, MultiPart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use crate::config::EmailConfig;
use crate::report::{Report, SourceType};

const SMTP_RELAY: &str = "smtp.gmail.com";

/// Per-type accent color, badge background, icon, and label.
fn type_style(kind: SourceType) -> (&'static str, &'static str, &'static str, &'static str) {
    match kind {
        SourceType::Journal => ("#3b82f6", "#eff6ff", "📚", "Academic Journal"),
        SourceType::Paper => ("#10b981", "#f0fdf4", "📄", "Research Paper"),
        SourceType::News => ("#f59e0b", "#fffbeb", "📰", "Industry News"),
    }
}

fn section_title(kind: SourceType) -> &'static str {
    match kind {
        SourceType::Journal => "📚 Academic Journals",
        SourceType::Paper => "📄 Research Papers",
        SourceType::News => "📰 Industry News",
    }
}

fn esc(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// Render the report as email-client-safe HTML: nested tables, inline styles
/// only, per-type color coding.
pub fn render_html(report: &Report) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str(
        "<!DOCTYPE html><html><head><meta charset=\"UTF-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"></head>\
<body style=\"margin: 0; padding: 20px; font-family: 'Segoe UI', Roboto, Arial, sans-serif; background-color: #f5f5f5;\">\
<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"max-width: 800px; margin: 0 auto;\"><tr><td>\
<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"background: white; border-radius: 10px;\">",
    );

    // Header
    html.push_str(&format!(
        "<tr><td style=\"background: #1e3a8a; color: white; padding: 40px 30px; text-align: center; border-radius: 10px 10px 0 0;\">\
<h1 style=\"margin: 0 0 8px 0; font-size: 28px;\">🔬 6G Technology Intelligence</h1>\
<p style=\"margin: 0; font-size: 15px;\">Professional Research Report for Engineers</p>\
<p style=\"margin: 12px 0 0 0; font-size: 14px;\">📅 {}</p></td></tr>",
        esc(&report.generated_at)
    ));

    // Per-type stats row
    html.push_str("<tr><td style=\"padding: 24px 30px; border-bottom: 1px solid #e5e7eb;\">\
<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"><tr>");
    for kind in [SourceType::Journal, SourceType::Paper, SourceType::News] {
        let (_, _, icon, _) = type_style(kind);
        html.push_str(&format!(
            "<td style=\"text-align: center;\">\
<div style=\"font-size: 32px; font-weight: 700; color: #1e3a8a;\">{}</div>\
<div style=\"font-size: 13px; color: #6b7280;\">{icon} {}s</div></td>",
            report.of_type(kind).len(),
            kind.as_str(),
        ));
    }
    html.push_str("</tr></table></td></tr>");

    // Sections
    html.push_str("<tr><td style=\"padding: 30px; background-color: #f9fafb;\">");
    for kind in [SourceType::Journal, SourceType::Paper, SourceType::News] {
        let records = report.of_type(kind);
        if records.is_empty() {
            continue;
        }
        let (color, bg, icon, label) = type_style(kind);
        html.push_str(&format!(
            "<h2 style=\"font-size: 20px; color: #1f2937; border-bottom: 3px solid #e5e7eb; padding-bottom: 10px;\">{}</h2>",
            section_title(kind)
        ));
        for rec in records {
            html.push_str(&format!(
                "<table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" style=\"background: white; border-radius: 10px; margin-bottom: 18px; border: 1px solid #e5e7eb; border-left: 5px solid {color};\"><tr><td style=\"padding: 20px;\">\
<div style=\"display: inline-block; padding: 5px 12px; border-radius: 16px; font-size: 12px; font-weight: 600; margin-bottom: 10px; background: {bg}; color: {color};\">{icon} {label}</div>\
<h3 style=\"margin: 0 0 12px 0; font-size: 18px; line-height: 1.4;\"><a href=\"{url}\" target=\"_blank\" style=\"color: #1f2937; text-decoration: none;\">{title}</a></h3>\
<div style=\"color: #4b5563; font-size: 14px; line-height: 1.7; padding: 12px; background: #f9fafb; border-radius: 6px; border-left: 3px solid {color};\">{summary}</div>\
<div style=\"background: {bg}; border-radius: 6px; padding: 12px; margin-top: 12px; border-left: 3px solid {color};\">\
<div style=\"font-weight: 700; color: {color}; font-size: 13px; margin-bottom: 6px;\">💡 Engineer's Insight</div>\
<div style=\"color: #374151; font-size: 13px; line-height: 1.6;\">{message}</div></div>\
<div style=\"margin-top: 12px;\"><a href=\"{url}\" target=\"_blank\" style=\"display: inline-block; padding: 8px 16px; background: {color}; color: white; text-decoration: none; border-radius: 6px; font-size: 13px; font-weight: 600;\">Read Full Article →</a></div>\
</td></tr></table>",
                url = esc(&rec.url),
                title = esc(&rec.title),
                summary = esc(&rec.summary),
                message = esc(&rec.message),
            ));
        }
    }
    if report.summaries.is_empty() {
        html.push_str("<p style=\"color: #6b7280;\">오늘 수집된 자료가 없습니다.</p>");
    }
    html.push_str("</td></tr>");

    // Footer
    html.push_str(
        "<tr><td style=\"padding: 24px 30px; text-align: center; border-top: 1px solid #e5e7eb;\">\
<p style=\"color: #6b7280; font-size: 12px; margin: 0;\">🤖 6G Technology Intelligence System</p>\
</td></tr></table></td></tr></table></body></html>",
    );
    html
}

/// Plain-text alternative for clients that refuse HTML.
pub fn render_text(report: &Report) -> String {
    let mut out = format!(
        "6G Technology Intelligence Report\n생성일: {}\n{}\n\n",
        report.generated_at,
        "=".repeat(60)
    );
    for (i, rec) in report.summaries.iter().enumerate() {
        out.push_str(&format!(
            "{}. [{}] {}\n\n{}\n\n💡 {}\n📰 출처: {}\n\n{}\n\n",
            i + 1,
            rec.kind.as_str(),
            rec.title,
            rec.summary,
            rec.message,
            rec.url,
            "=".repeat(60)
        ));
    }
    out
}

pub async fn send_report(report: &Report, cfg: &EmailConfig) -> Result<()> {
    let from: Mailbox = cfg.user.parse().context("invalid MAIL_USER address")?;
    let to: Mailbox = cfg
        .recipient
        .parse()
        .context("invalid RECIPIENT_EMAIL address")?;

    let msg = Message::builder()
        .from(from)
        .to(to)
        .subject(format!(
            "🔬 6G Technology Intelligence Report - {}",
            report.generated_at
        ))
        .multipart(MultiPart::alternative_plain_html(
            render_text(report),
            render_html(report),
        ))
        .context("build email")?;

    let creds = Credentials::new(cfg.user.clone(), cfg.app_password.clone());
    let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_RELAY)
        .context("smtp relay")?
        .credentials(creds)
        .build();

    mailer.send(msg).await.context("send email")?;
    Ok(())
}
