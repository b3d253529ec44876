use serde_json::Value;

use crate::domain::FeedError;
use crate::infra::api::{ClearOutcome, TrackingAck};

/// Everything the reducer can be asked to handle: user commands, timer
/// ticks, and async completions reported back by the runtime.
#[derive(Debug)]
pub enum Action {
    Feed(FeedAction),
    Async(AsyncAction),
}

/// User- or timer-initiated commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedAction {
    /// Ask the server to begin collecting commits, then refresh and poll.
    StartTracking,
    /// Fetch the current commit feed and merge it.
    Refresh,
    /// Reveal the next commit.
    AdvanceReveal,
    /// Reveal everything at once.
    ShowAll,
    /// Forget reveal progress; the store is untouched.
    ResetReveal,
    Pause,
    Resume,
    /// Wipe the remote store and return to idle.
    Clear,
    /// Fired by the tracking poll timer.
    PollTick,
    /// Fired by the reveal auto-advance timer.
    AutoAdvanceTick,
}

/// Completions of gateway calls, applied in completion order.
#[derive(Debug)]
pub enum AsyncAction {
    TrackingStarted(Result<TrackingAck, FeedError>),
    /// The raw feed payload; shape is validated by the store merge.
    CommitsLoaded(Result<Value, FeedError>),
    RemoteCleared(Result<ClearOutcome, FeedError>),
}
