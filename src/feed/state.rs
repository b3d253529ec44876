//! Controller-owned state and the presentation-facing snapshot.

use serde::Serialize;

use crate::domain::{CommitRecord, FeedError};

use super::reveal::RevealCursor;
use super::store::CommitStore;

/// Which phase of the tracking lifecycle the dashboard is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// Never tracked, or cleared.
    #[default]
    Idle,
    /// Tracking enabled, polling active.
    Tracking,
    /// Tracking enabled, reveal timer paused; polling continues.
    PausedReveal,
}

/// All feed state in one struct. Owned exclusively by the controller;
/// everything the presentation layer sees is a [`FeedSnapshot`].
#[derive(Debug, Default)]
pub struct FeedState {
    pub store: CommitStore,
    pub reveal: RevealCursor,
    /// Whether the client has asked the server to collect commits and is
    /// polling for updates.
    pub tracking_enabled: bool,
    /// Number of gateway calls currently awaiting a response. The loading
    /// flag stays up while at least one is in flight, so overlapping
    /// refreshes never flicker it.
    pub in_flight: u32,
    pub last_error: Option<FeedError>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracking_state(&self) -> TrackingState {
        if !self.tracking_enabled {
            TrackingState::Idle
        } else if self.reveal.has_started() && !self.reveal.is_playing() {
            TrackingState::PausedReveal
        } else {
            TrackingState::Tracking
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// An immutable read model, re-derived after every command. The
    /// revealed commits are the leading prefix of the sorted view, so
    /// their `display_order` is always current.
    pub fn snapshot(&self) -> FeedSnapshot {
        let sorted = self.store.sorted_view();
        let revealed = self.reveal.revealed_count().min(sorted.len());
        FeedSnapshot {
            tracking_state: self.tracking_state(),
            loading: self.is_loading(),
            last_error: self.last_error.clone(),
            total_known_count: self.store.len(),
            revealed_commits: sorted[..revealed].to_vec(),
            is_playing: self.reveal.is_playing(),
        }
    }
}

/// What the presentation layer renders from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub tracking_state: TrackingState,
    pub loading: bool,
    pub last_error: Option<FeedError>,
    pub total_known_count: usize,
    pub revealed_commits: Vec<CommitRecord>,
    pub is_playing: bool,
}
