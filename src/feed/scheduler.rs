//! Repeating-timer lifecycle for polling and auto-advance.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::action::Action;

/// A single repeating timer that sends an action back to the controller on
/// every tick.
///
/// At most one timer is active at a time: `start` while running is a
/// no-op, `stop` is idempotent and safe to call even if never started. The
/// controller owns one instance per timer concern and tears both down on
/// clear.
#[derive(Debug, Default)]
pub struct PollingScheduler {
    cancel: Option<CancellationToken>,
}

impl PollingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    /// Begin emitting `make_tick()` every `interval`. The first tick fires
    /// one full interval after start, not immediately.
    pub fn start<F>(&mut self, interval: Duration, tx: mpsc::Sender<Action>, make_tick: F)
    where
        F: Fn() -> Action + Send + 'static,
    {
        if self.cancel.is_some() {
            log::debug!("Scheduler already running; start ignored");
            return;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        self.cancel = Some(cancel);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // interval() fires immediately; swallow the first tick so the
            // cadence starts one period from now.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(make_tick()).await.is_err() {
                            // Controller dropped its receiver; nothing left
                            // to tick for.
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Cancel the pending timer, if any.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
