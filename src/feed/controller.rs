//! Root controller the presentation layer talks to.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::infra::api::ApiGateway;
use crate::infra::app_config::AppConfig;

use super::action::Action;
use super::scheduler::PollingScheduler;
use super::state::{FeedSnapshot, FeedState};
use super::{reducer, runtime};

/// Timer cadences for the two controller-owned timers.
#[derive(Debug, Clone, Copy)]
pub struct FeedConfig {
    pub poll_interval: Duration,
    pub advance_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(30_000),
            advance_interval: Duration::from_millis(2_000),
        }
    }
}

impl From<&AppConfig> for FeedConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            advance_interval: Duration::from_millis(config.advance_interval_ms),
        }
    }
}

/// Composes the commit store, the reveal cursor and the two timers, and
/// exposes commands plus a read-only snapshot.
///
/// All mutation happens on the caller's task: `dispatch` reduces
/// synchronously and hands side effects to the runtime, whose spawned
/// tasks only ever send actions back over the channel drained by
/// [`FeedController::poll_pending_actions`]. No other component holds a
/// reference to the owned state.
pub struct FeedController {
    pub state: FeedState,
    pub(crate) gateway: Arc<dyn ApiGateway>,
    pub(crate) config: FeedConfig,
    pub(crate) action_tx: mpsc::Sender<Action>,
    action_rx: mpsc::Receiver<Action>,
    pub(crate) poll_timer: PollingScheduler,
    pub(crate) advance_timer: PollingScheduler,
}

impl FeedController {
    pub fn new(gateway: Arc<dyn ApiGateway>, config: FeedConfig) -> Self {
        let (action_tx, action_rx) = mpsc::channel(32);
        Self {
            state: FeedState::new(),
            gateway,
            config,
            action_tx,
            action_rx,
            poll_timer: PollingScheduler::new(),
            advance_timer: PollingScheduler::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let commands = reducer::reduce(&mut self.state, action);
        for command in commands {
            runtime::run(self, command);
        }
    }

    /// Drain async completions and timer ticks. Returns whether anything
    /// was applied, so callers know to re-render.
    pub fn poll_pending_actions(&mut self) -> bool {
        let mut any = false;
        while let Ok(action) = self.action_rx.try_recv() {
            self.dispatch(action);
            any = true;
        }
        any
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.state.snapshot()
    }
}
