//! Command execution: spawns gateway calls and drives the timers.
//!
//! Every spawned task reports back through the controller's action
//! channel; completions are therefore applied in completion order, which
//! is safe because merges are idempotent and additive.

use super::action::{Action, AsyncAction, FeedAction};
use super::command::Command;
use super::controller::FeedController;

pub fn run(controller: &mut FeedController, command: Command) {
    match command {
        Command::BeginTracking => {
            let gateway = controller.gateway.clone();
            let tx = controller.action_tx.clone();
            tokio::spawn(async move {
                let result = gateway.begin_tracking().await;
                let _ = tx
                    .send(Action::Async(AsyncAction::TrackingStarted(result)))
                    .await;
            });
        }
        Command::FetchCommits => {
            let gateway = controller.gateway.clone();
            let tx = controller.action_tx.clone();
            tokio::spawn(async move {
                let result = gateway.list_commits().await;
                let _ = tx
                    .send(Action::Async(AsyncAction::CommitsLoaded(result)))
                    .await;
            });
        }
        Command::ClearRemote => {
            let gateway = controller.gateway.clone();
            let tx = controller.action_tx.clone();
            tokio::spawn(async move {
                let result = gateway.clear_all().await;
                let _ = tx
                    .send(Action::Async(AsyncAction::RemoteCleared(result)))
                    .await;
            });
        }
        Command::StartPolling => {
            let tx = controller.action_tx.clone();
            let interval = controller.config.poll_interval;
            controller
                .poll_timer
                .start(interval, tx, || Action::Feed(FeedAction::PollTick));
        }
        Command::StopPolling => controller.poll_timer.stop(),
        Command::StartAutoAdvance => {
            let tx = controller.action_tx.clone();
            let interval = controller.config.advance_interval;
            controller
                .advance_timer
                .start(interval, tx, || Action::Feed(FeedAction::AutoAdvanceTick));
        }
        Command::StopAutoAdvance => controller.advance_timer.stop(),
    }
}
