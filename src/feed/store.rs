//! Deduplicated, sorted collection of all known commits.

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::{CommitHash, CommitRecord, FeedError, RawCommit};

/// Outcome of one merge call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    /// Hashes inserted by this merge, in fetch order.
    pub inserted: Vec<CommitHash>,
    /// Records dropped for lacking a usable hash or timestamp.
    pub skipped: usize,
    /// Records ignored because their hash was already present.
    pub duplicates: usize,
}

#[derive(Debug, Clone)]
struct StoredCommit {
    record: CommitRecord,
    /// Insertion sequence number; the tie-breaker for equal timestamps.
    seq: u64,
}

/// Owns the deduplicated commit collection and its cached sorted view.
///
/// Grows only; emptied solely by [`CommitStore::clear`]. The hash is the
/// primary key and the first record observed for a hash wins — later
/// duplicates are discarded unmodified, so a record the user is already
/// viewing keeps its identity across refreshes.
#[derive(Debug, Default)]
pub struct CommitStore {
    records: HashMap<CommitHash, StoredCommit>,
    sorted: Vec<CommitRecord>,
    next_seq: u64,
}

impl CommitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a raw fetch payload into the store.
    ///
    /// Fails with [`FeedError::MalformedFeed`] and performs no mutation
    /// when the payload is not an array. Individual records that cannot be
    /// normalized are dropped silently; one bad record never blocks the
    /// rest. Afterwards the sorted view is recomputed (descending
    /// timestamp, insertion order for ties) and `display_order` reassigned
    /// densely from 1.
    pub fn merge(&mut self, payload: &Value) -> Result<MergeResult, FeedError> {
        let Some(items) = payload.as_array() else {
            return Err(FeedError::MalformedFeed);
        };

        let mut result = MergeResult::default();
        for item in items {
            let raw: RawCommit = match serde_json::from_value(item.clone()) {
                Ok(raw) => raw,
                Err(err) => {
                    log::debug!("Dropping unreadable feed record: {err}");
                    result.skipped += 1;
                    continue;
                }
            };
            let Some(record) = CommitRecord::normalize(&raw) else {
                log::debug!("Dropping feed record without usable hash or timestamp");
                result.skipped += 1;
                continue;
            };
            if self.records.contains_key(&record.hash) {
                log::debug!("Duplicate commit hash ignored: {}", record.hash);
                result.duplicates += 1;
                continue;
            }

            let seq = self.next_seq;
            self.next_seq += 1;
            result.inserted.push(record.hash.clone());
            self.records
                .insert(record.hash.clone(), StoredCommit { record, seq });
        }

        self.rebuild_sorted();
        log::debug!(
            "Merged feed: {} inserted, {} duplicates, {} skipped, {} total",
            result.inserted.len(),
            result.duplicates,
            result.skipped,
            self.records.len()
        );
        Ok(result)
    }

    /// The cached sorted view: newest first, `display_order` dense from 1.
    pub fn sorted_view(&self) -> &[CommitRecord] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.records.contains_key(hash)
    }

    pub fn get(&self, hash: &str) -> Option<&CommitRecord> {
        self.records.get(hash).map(|stored| &stored.record)
    }

    /// Empty the store. Only the explicit clear command calls this.
    pub fn clear(&mut self) {
        self.records.clear();
        self.sorted.clear();
    }

    fn rebuild_sorted(&mut self) {
        let mut entries: Vec<&StoredCommit> = self.records.values().collect();
        entries.sort_by(|a, b| {
            b.record
                .timestamp
                .cmp(&a.record.timestamp)
                .then(a.seq.cmp(&b.seq))
        });
        self.sorted = entries
            .into_iter()
            .enumerate()
            .map(|(index, stored)| {
                let mut record = stored.record.clone();
                record.display_order = index + 1;
                record
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feed(commits: &[(&str, &str)]) -> Value {
        json!(
            commits
                .iter()
                .map(|(hash, ts)| json!({ "commit_hash": hash, "timestamp": ts }))
                .collect::<Vec<_>>()
        )
    }

    #[test]
    fn merge_rejects_non_array_without_mutation() {
        let mut store = CommitStore::new();
        store
            .merge(&feed(&[("a", "2025-01-01T00:00:00Z")]))
            .unwrap();

        let err = store.merge(&json!({"detail": "oops"})).unwrap_err();
        assert_eq!(err, FeedError::MalformedFeed);
        assert_eq!(store.len(), 1);
        assert!(store.contains("a"));

        assert_eq!(store.merge(&json!("nope")).unwrap_err(), FeedError::MalformedFeed);
        assert_eq!(store.merge(&json!(null)).unwrap_err(), FeedError::MalformedFeed);
    }

    #[test]
    fn merge_is_idempotent() {
        let payload = feed(&[
            ("a", "2025-01-02T00:00:00Z"),
            ("b", "2025-01-01T00:00:00Z"),
        ]);

        let mut store = CommitStore::new();
        let first = store.merge(&payload).unwrap();
        assert_eq!(first.inserted, vec!["a".to_string(), "b".to_string()]);

        let second = store.merge(&payload).unwrap();
        assert!(second.inserted.is_empty());
        assert_eq!(second.duplicates, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn duplicate_hashes_within_one_fetch_are_deduplicated() {
        let payload = json!([
            { "hash": "a", "timestamp": "2025-01-02T00:00:00Z" },
            { "hash": "a", "timestamp": "2025-01-02T00:00:00Z" },
            { "hash": "b", "timestamp": "2025-01-01T00:00:00Z" },
        ]);

        let mut store = CommitStore::new();
        let result = store.merge(&payload).unwrap();
        assert_eq!(result.inserted, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(result.duplicates, 1);
        assert_eq!(store.len(), 2);

        let hashes: Vec<_> = store.sorted_view().iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["a", "b"]);
    }

    #[test]
    fn first_write_wins_preserves_record_identity() {
        let mut store = CommitStore::new();
        store
            .merge(&json!([
                { "hash": "a", "timestamp": "2025-01-01T00:00:00Z", "message": "original" }
            ]))
            .unwrap();
        store
            .merge(&json!([
                { "hash": "a", "timestamp": "2025-06-01T00:00:00Z", "message": "rewritten" }
            ]))
            .unwrap();

        let record = store.get("a").unwrap();
        assert_eq!(record.message, "original");
        assert_eq!(record.timestamp.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn sorted_view_is_newest_first_with_dense_display_order() {
        let mut store = CommitStore::new();
        store
            .merge(&feed(&[
                ("old", "2025-01-01T00:00:00Z"),
                ("new", "2025-03-01T00:00:00Z"),
                ("mid", "2025-02-01T00:00:00Z"),
            ]))
            .unwrap();

        let view = store.sorted_view();
        let hashes: Vec<_> = view.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["new", "mid", "old"]);
        let orders: Vec<_> = view.iter().map(|c| c.display_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let ts = "2025-01-01T00:00:00Z";
        let mut store = CommitStore::new();
        store.merge(&feed(&[("first", ts), ("second", ts)])).unwrap();
        store.merge(&feed(&[("third", ts)])).unwrap();

        let hashes: Vec<_> = store.sorted_view().iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["first", "second", "third"]);
    }

    #[test]
    fn later_merge_reassigns_display_order() {
        let mut store = CommitStore::new();
        store
            .merge(&feed(&[("a", "2025-01-02T00:00:00Z"), ("b", "2025-01-01T00:00:00Z")]))
            .unwrap();
        store.merge(&feed(&[("c", "2025-01-03T00:00:00Z")])).unwrap();

        let view = store.sorted_view();
        let pairs: Vec<_> = view
            .iter()
            .map(|c| (c.hash.as_str(), c.display_order))
            .collect();
        assert_eq!(pairs, vec![("c", 1), ("a", 2), ("b", 3)]);
    }

    #[test]
    fn records_without_hash_or_timestamp_are_skipped() {
        let payload = json!([
            { "message": "no hash", "timestamp": "2025-01-01T00:00:00Z" },
            { "hash": "a", "message": "no timestamp" },
            { "hash": "b", "timestamp": "garbage" },
            { "hash": "c", "timestamp": "2025-01-01T00:00:00Z" },
            "not even an object",
        ]);

        let mut store = CommitStore::new();
        let result = store.merge(&payload).unwrap();
        assert_eq!(result.inserted, vec!["c".to_string()]);
        assert_eq!(result.skipped, 4);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = CommitStore::new();
        store.merge(&feed(&[("a", "2025-01-01T00:00:00Z")])).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.sorted_view().is_empty());

        // The store is usable again after a clear.
        store.merge(&feed(&[("b", "2025-01-01T00:00:00Z")])).unwrap();
        assert_eq!(store.len(), 1);
    }
}
