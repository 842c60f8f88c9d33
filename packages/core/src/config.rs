/// Configuration for a sync session
use crate::services::error::SyncError;
use crate::store::DEFAULT_EVENT_CHANNEL_CAPACITY;
use serde::{Deserialize, Serialize};

/// Default notes server endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:9081";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP transport and the session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the notes server (paths are appended as `/api/...`)
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Bearer token sent with every request, if any
    pub auth_token: Option<String>,

    /// Buffered store events per subscriber before slow subscribers lag
    pub event_channel_capacity: usize,

    /// Maximum undo entries kept (0 keeps all of them)
    pub undo_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            auth_token: None,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
            undo_capacity: 0,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// - `NOTESYNC_BASE_URL`
    /// - `NOTESYNC_TIMEOUT` (seconds)
    /// - `NOTESYNC_AUTH_TOKEN`
    /// - `NOTESYNC_UNDO_CAPACITY`
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("NOTESYNC_BASE_URL").unwrap_or(defaults.base_url),
            timeout_seconds: lookup("NOTESYNC_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            auth_token: lookup("NOTESYNC_AUTH_TOKEN").filter(|t| !t.is_empty()),
            event_channel_capacity: defaults.event_channel_capacity,
            undo_capacity: lookup("NOTESYNC_UNDO_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.undo_capacity),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.base_url.trim().is_empty() {
            return Err(SyncError::config("base_url cannot be empty"));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(SyncError::config(format!(
                "base_url must start with http:// or https://, got `{}`",
                self.base_url
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(SyncError::config("timeout_seconds must be greater than 0"));
        }

        if self.event_channel_capacity == 0 {
            return Err(SyncError::config(
                "event_channel_capacity must be greater than 0",
            ));
        }

        Ok(())
    }
}
