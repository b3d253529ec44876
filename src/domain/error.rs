//! Errors surfaced by feed commands.
//!
//! Transport problems and a server that breaks the feed contract are kept
//! distinct: the first is a network condition the user can retry, the
//! second means the payload shape itself was wrong.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedError {
    /// Network failure, timeout, or a non-2xx response from the gateway.
    #[error("Transport error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The commit list endpoint returned something that is not a sequence
    /// of records.
    #[error("Malformed feed: expected a list of commits")]
    MalformedFeed,
}

impl FeedError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }
}
