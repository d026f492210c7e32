// src/error.rs
//! Error taxonomy at the collector/channel seams. Every variant is absorbed
//! into a stage fallback; nothing here crosses a stage boundary un-handled.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Missing or rejected credential. Disables one source or channel.
    #[error("auth rejected: {0}")]
    Auth(String),
    /// Endpoint returned a throttling status. The stage falls back
    /// immediately; no blocking wait inside the pipeline.
    #[error("rate limited: {0}")]
    RateLimit(String),
    /// Malformed payload (feed XML, API JSON, AI output).
    #[error("parse: {0}")]
    Parse(String),
    /// Any transport failure. Treated like Auth for that source/channel.
    #[error("network: {0}")]
    Network(String),
}

impl FetchError {
    /// Map an HTTP status into the taxonomy.
    pub fn from_status(status: reqwest::StatusCode, who: &str) -> Self {
        match status.as_u16() {
            401 | 403 => FetchError::Auth(format!("{who}: HTTP {status}")),
            429 => FetchError::RateLimit(format!("{who}: HTTP {status}")),
            _ => FetchError::Network(format!("{who}: HTTP {status}")),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return FetchError::from_status(status, "http");
        }
        if e.is_decode() {
            return FetchError::Parse(e.to_string());
        }
        FetchError::Network(e.to_string())
    }
}
