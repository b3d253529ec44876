//! Core domain types for the commit feed.

mod commit;
mod error;

pub use commit::{CommitHash, CommitRecord, RawCommit};
pub use error::FeedError;
