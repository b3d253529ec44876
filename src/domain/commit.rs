use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a commit (the git hash).
pub type CommitHash = String;

/// A commit as the tracking service returns it, before normalization.
///
/// The feed is duck-typed: the hash arrives as either `commit_hash` or
/// `hash`, and every display field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCommit {
    #[serde(default)]
    pub commit_hash: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl RawCommit {
    /// The canonical hash, whichever field name the feed used.
    /// `commit_hash` wins when both are present.
    pub fn canonical_hash(&self) -> Option<&str> {
        self.commit_hash
            .as_deref()
            .or(self.hash.as_deref())
            .filter(|h| !h.trim().is_empty())
    }
}

/// A normalized commit as shown on the dashboard.
///
/// Immutable once constructed; merges replace records, they never mutate
/// in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub hash: CommitHash,
    pub message: String,
    pub author: String,
    pub author_email: Option<String>,
    pub repository: Option<String>,
    pub branch: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// 1-based position in the sorted view, newest first. Reassigned on
    /// every merge, never user-set.
    pub display_order: usize,
}

impl CommitRecord {
    /// Normalize a raw feed record.
    ///
    /// Returns `None` when the record has no usable hash or timestamp;
    /// such records are dropped from the merge rather than failing it.
    pub fn normalize(raw: &RawCommit) -> Option<Self> {
        let hash = raw.canonical_hash()?.to_string();
        let timestamp = parse_timestamp(raw.timestamp.as_deref()?)?;

        Some(Self {
            hash,
            message: raw.message.clone().unwrap_or_default(),
            author: raw.author.clone().unwrap_or_default(),
            author_email: raw.author_email.clone(),
            repository: raw.repository.clone(),
            branch: raw.branch.clone(),
            timestamp,
            display_order: 0,
        })
    }
}

/// Lenient ISO-8601 parsing: RFC 3339 first, then a couple of common
/// offset-less shapes the service has been seen emitting. Offset-less
/// timestamps are taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    None
}
