//! Pure state transitions: every merge, reconciliation and lifecycle
//! change happens here, synchronously. Side effects only ever leave as
//! [`Command`]s for the runtime.

use super::action::{Action, AsyncAction, FeedAction};
use super::command::Command;
use super::state::FeedState;

pub fn reduce(state: &mut FeedState, action: Action) -> Vec<Command> {
    match action {
        Action::Feed(action) => command(state, action),
        Action::Async(action) => completion(state, action),
    }
}

fn command(state: &mut FeedState, action: FeedAction) -> Vec<Command> {
    match action {
        FeedAction::StartTracking => {
            if state.tracking_enabled {
                // begin-tracking is idempotent server-side, but a second
                // poll timer must not start.
                log::debug!("Already tracking; start request ignored");
                return Vec::new();
            }
            state.last_error = None;
            state.in_flight += 1;
            vec![Command::BeginTracking]
        }
        FeedAction::Refresh => {
            state.last_error = None;
            state.in_flight += 1;
            vec![Command::FetchCommits]
        }
        FeedAction::PollTick => {
            if !state.tracking_enabled {
                // Stale tick racing a clear.
                return Vec::new();
            }
            state.in_flight += 1;
            vec![Command::FetchCommits]
        }
        FeedAction::AdvanceReveal => {
            state.reveal.advance_one(state.store.sorted_view());
            Vec::new()
        }
        FeedAction::AutoAdvanceTick => {
            if !state.reveal.is_playing() {
                return Vec::new();
            }
            state.reveal.advance_one(state.store.sorted_view());
            if state.reveal.revealed_count() >= state.store.len() {
                // Nothing left to play; park the timer until the user
                // resumes after the store grows.
                state.reveal.pause();
                return vec![Command::StopAutoAdvance];
            }
            Vec::new()
        }
        FeedAction::ShowAll => {
            state.reveal.show_all(state.store.sorted_view());
            Vec::new()
        }
        FeedAction::ResetReveal => {
            state.reveal.reset();
            vec![Command::StopAutoAdvance]
        }
        FeedAction::Pause => {
            state.reveal.pause();
            vec![Command::StopAutoAdvance]
        }
        FeedAction::Resume => {
            state.reveal.resume(state.store.sorted_view());
            if state.reveal.is_playing() {
                vec![Command::StartAutoAdvance]
            } else {
                Vec::new()
            }
        }
        FeedAction::Clear => {
            state.last_error = None;
            state.in_flight += 1;
            vec![Command::ClearRemote]
        }
    }
}

fn completion(state: &mut FeedState, action: AsyncAction) -> Vec<Command> {
    match action {
        AsyncAction::TrackingStarted(Ok(ack)) => {
            state.in_flight = state.in_flight.saturating_sub(1);
            state.tracking_enabled = true;
            log::info!(
                "Tracking started: {}",
                ack.message.as_deref().unwrap_or("ok")
            );
            // Immediate refresh, then poll on the timer.
            state.in_flight += 1;
            vec![Command::FetchCommits, Command::StartPolling]
        }
        AsyncAction::TrackingStarted(Err(err)) => {
            state.in_flight = state.in_flight.saturating_sub(1);
            log::warn!("Failed to start tracking: {err}");
            state.last_error = Some(err);
            Vec::new()
        }
        AsyncAction::CommitsLoaded(Ok(payload)) => {
            state.in_flight = state.in_flight.saturating_sub(1);
            match state.store.merge(&payload) {
                Ok(result) => {
                    state.reveal.reconcile(state.store.sorted_view());
                    if !result.inserted.is_empty() {
                        log::info!(
                            "Feed refresh: {} new commits, {} known",
                            result.inserted.len(),
                            state.store.len()
                        );
                    }
                    state.last_error = None;
                }
                Err(err) => {
                    log::warn!("Feed refresh rejected: {err}");
                    state.last_error = Some(err);
                }
            }
            Vec::new()
        }
        AsyncAction::CommitsLoaded(Err(err)) => {
            state.in_flight = state.in_flight.saturating_sub(1);
            log::warn!("Feed refresh failed: {err}");
            state.last_error = Some(err);
            Vec::new()
        }
        AsyncAction::RemoteCleared(Ok(outcome)) => {
            state.in_flight = state.in_flight.saturating_sub(1);
            state.store.clear();
            state.reveal.reset();
            state.tracking_enabled = false;
            state.last_error = None;
            log::info!(
                "Remote store cleared ({} commits deleted)",
                outcome.deleted_count
            );
            vec![Command::StopPolling, Command::StopAutoAdvance]
        }
        AsyncAction::RemoteCleared(Err(err)) => {
            state.in_flight = state.in_flight.saturating_sub(1);
            log::warn!("Failed to clear remote store: {err}");
            state.last_error = Some(err);
            Vec::new()
        }
    }
}
