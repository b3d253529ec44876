//! Commit feed core: reducer-style state updates plus side-effect
//! commands.
//!
//! The presentation layer dispatches [`Action`]s; [`reducer::reduce`]
//! mutates [`FeedState`] synchronously and returns [`Command`]s, which
//! [`runtime::run`] executes (gateway calls, timers). Async completions
//! come back as actions over the controller's channel.

pub mod action;
pub mod command;
pub mod controller;
pub mod reducer;
pub mod reveal;
pub mod runtime;
pub mod scheduler;
pub mod state;
pub mod store;


pub use action::{Action, AsyncAction, FeedAction};
pub use command::Command;
pub use controller::{FeedConfig, FeedController};
pub use reveal::RevealCursor;
pub use scheduler::PollingScheduler;
pub use state::{FeedSnapshot, FeedState, TrackingState};
pub use store::{CommitStore, MergeResult};
