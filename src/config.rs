// src/config.rs
//! One explicit configuration snapshot assembled at process start and passed
//! into the pipeline. Every optional credential maps to a "channel enabled"
//! option here; nothing re-reads the environment mid-run.

use std::path::PathBuf;

pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;
pub const DEFAULT_PER_SOURCE_LIMIT: usize = 5;
pub const DEFAULT_SELECT_MAX: usize = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_NEWS_ATOM_FEED_URL: &str = "https://www.6gworld.com/feed/atom/";

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub user: String,
    pub app_password: String,
    pub recipient: String,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// AI credential; absence degrades keyword/selection/summarization to
    /// their fallbacks but does not halt the run.
    pub ai_key: Option<String>,
    /// Journal API credential; absence skips the journal collector.
    pub journal_api_key: Option<String>,
    /// All three mail variables are required together; partial presence
    /// disables the channel.
    pub email: Option<EmailConfig>,
    /// Bot token + chat id, required together.
    pub chat: Option<ChatConfig>,
    pub news_atom_feed_url: String,
    pub max_age_days: i64,
    pub per_source_limit: usize,
    pub select_max: usize,
    pub output_dir: PathBuf,
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Build the snapshot from the process environment. Infallible: the
    /// preprint and feed collectors need no credentials, so a run can always
    /// start; missing credentials only disable their source or channel.
    pub fn from_env() -> Self {
        let email = match (
            env_nonempty("MAIL_USER"),
            env_nonempty("MAIL_APP_PASSWORD"),
            env_nonempty("RECIPIENT_EMAIL"),
        ) {
            (Some(user), Some(app_password), Some(recipient)) => Some(EmailConfig {
                user,
                app_password,
                recipient,
            }),
            _ => None,
        };

        let chat = match (env_nonempty("CHAT_BOT_TOKEN"), env_nonempty("CHAT_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(ChatConfig { bot_token, chat_id }),
            _ => None,
        };

        Self {
            ai_key: env_nonempty("AI_KEY"),
            journal_api_key: env_nonempty("JOURNAL_API_KEY"),
            email,
            chat,
            news_atom_feed_url: env_nonempty("NEWS_ATOM_FEED_URL")
                .unwrap_or_else(|| DEFAULT_NEWS_ATOM_FEED_URL.to_string()),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
            select_max: DEFAULT_SELECT_MAX,
            output_dir: PathBuf::from(
                env_nonempty("DIGEST_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
        }
    }

    /// Minimal config for tests: no credentials, everything else default.
    pub fn bare(output_dir: PathBuf) -> Self {
        Self {
            ai_key: None,
            journal_api_key: None,
            email: None,
            chat: None,
            news_atom_feed_url: DEFAULT_NEWS_ATOM_FEED_URL.to_string(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            per_source_limit: DEFAULT_PER_SOURCE_LIMIT,
            select_max: DEFAULT_SELECT_MAX,
            output_dir,
        }
    }
}
