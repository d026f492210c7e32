// src/keyword.rs
//! Hot-keyword extraction: one AI call with a fixed domain-expert persona
//! producing the day's focused search query. This stage never aborts the run.

use chrono::Utc;
use tracing::{info, warn};

use crate::ai::TextModel;

/// Used whenever the AI call fails or returns nothing usable.
pub const FALLBACK_KEYWORD: &str = "6G network technology trends";

const MAX_WORDS: usize = 5;

fn build_prompt(today: &str) -> String {
    format!(
        "You are a senior 6G wireless research engineer tracking the field daily. \
Today is {today}. Propose the single most relevant focused search query for \
today's 6G technology landscape: standardization progress, THz and RIS \
research, AI-native air interface, non-terrestrial networks, or industry \
deployments. Answer with the query only: 3-5 English words, no quotes, no \
punctuation, no explanation."
    )
}

/// Trim wrapper characters and cap the query at 5 words. Returns None when
/// nothing usable is left.
fn sanitize_keyword(raw: &str) -> Option<String> {
    let line = raw.lines().find(|l| !l.trim().is_empty())?;
    let cleaned = line
        .trim()
        .trim_matches(['"', '\'', '`', '.', ':'])
        .trim();
    if cleaned.is_empty() {
        return None;
    }
    let words: Vec<&str> = cleaned.split_whitespace().take(MAX_WORDS).collect();
    if words.is_empty() {
        return None;
    }
    Some(words.join(" "))
}

/// Produce the run's SearchKeyword. Immutable afterwards.
pub async fn extract(model: &dyn TextModel) -> String {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    match model.generate(&build_prompt(&today)).await {
        Ok(raw) => match sanitize_keyword(&raw) {
            Some(kw) => {
                info!(keyword = %kw, "hot keyword extracted");
                kw
            }
            None => {
                warn!("keyword response empty after sanitization, using fallback");
                FALLBACK_KEYWORD.to_string()
            }
        },
        Err(e) => {
            warn!(error = %e, provider = model.name(), "keyword extraction failed, using fallback");
            FALLBACK_KEYWORD.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{DisabledModel, MockModel};

    #[test]
    fn sanitize_strips_quotes_and_caps_words() {
        assert_eq!(
            sanitize_keyword("\"6G THz channel modeling\"\n").as_deref(),
            Some("6G THz channel modeling")
        );
        assert_eq!(
            sanitize_keyword("one two three four five six seven").as_deref(),
            Some("one two three four five")
        );
        assert!(sanitize_keyword("  \n \"\" ").is_none());
    }

    #[tokio::test]
    async fn disabled_model_falls_back_to_constant() {
        let kw = extract(&DisabledModel).await;
        assert_eq!(kw, FALLBACK_KEYWORD);
    }

    #[tokio::test]
    async fn garbage_response_falls_back() {
        let kw = extract(&MockModel::always("   \n\n")).await;
        assert_eq!(kw, FALLBACK_KEYWORD);
    }

    #[tokio::test]
    async fn good_response_is_used() {
        let kw = extract(&MockModel::always("`6G NTN handover latency`")).await;
        assert_eq!(kw, "6G NTN handover latency");
    }
}
