//! The "one commit at a time" viewing cursor.

use std::collections::HashSet;

use crate::domain::{CommitHash, CommitRecord};

/// Tracks which prefix of the store's sorted view the user has seen.
///
/// Invariant: the revealed sequence is always a prefix of the current
/// sorted view. Background merges can insert commits ahead of revealed
/// ones; [`RevealCursor::reconcile`] restores the prefix without ever
/// un-revealing a commit.
#[derive(Debug, Default)]
pub struct RevealCursor {
    revealed: Vec<CommitHash>,
    has_started: bool,
    playing: bool,
}

impl RevealCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn revealed_hashes(&self) -> &[CommitHash] {
        &self.revealed
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Reveal the next unrevealed commit by position. The first call
    /// reveals index 0 and marks the reveal as started. A no-op once every
    /// available commit is revealed.
    pub fn advance_one(&mut self, sorted: &[CommitRecord]) {
        if self.revealed.is_empty() {
            let Some(first) = sorted.first() else {
                log::debug!("Advance requested with no commits available");
                return;
            };
            self.has_started = true;
            self.revealed.push(first.hash.clone());
            log::debug!("Revealed commit 1/{}: {}", sorted.len(), first.hash);
            return;
        }

        if self.revealed.len() >= sorted.len() {
            log::debug!("All {} commits already revealed", sorted.len());
            return;
        }

        let next = &sorted[self.revealed.len()];
        self.revealed.push(next.hash.clone());
        log::debug!(
            "Revealed commit {}/{}: {}",
            self.revealed.len(),
            sorted.len(),
            next.hash
        );
    }

    /// Reveal every commit immediately, preserving order. Idempotent.
    pub fn show_all(&mut self, sorted: &[CommitRecord]) {
        self.revealed = sorted.iter().map(|record| record.hash.clone()).collect();
        if !self.revealed.is_empty() {
            self.has_started = true;
        }
    }

    /// Back to the initial state. Does not touch the store.
    pub fn reset(&mut self) {
        self.revealed.clear();
        self.has_started = false;
        self.playing = false;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// No effect unless the reveal has started and unrevealed commits
    /// remain.
    pub fn resume(&mut self, sorted: &[CommitRecord]) {
        if self.has_started && self.revealed.len() < sorted.len() {
            self.playing = true;
        }
    }

    /// Re-derive the revealed prefix after the store grew.
    ///
    /// Takes the first `k` hashes of the new sorted view (`k` = previous
    /// revealed count), extended until every previously revealed hash is
    /// covered. Revealed membership only grows; the displayed order always
    /// matches the new sorted view.
    pub fn reconcile(&mut self, sorted: &[CommitRecord]) {
        if self.revealed.is_empty() {
            return;
        }

        let previous: HashSet<&str> = self.revealed.iter().map(String::as_str).collect();
        let target = self.revealed.len();
        let mut covered = 0;
        let mut next = Vec::with_capacity(target);

        for record in sorted {
            if next.len() >= target && covered == previous.len() {
                break;
            }
            if previous.contains(record.hash.as_str()) {
                covered += 1;
            }
            next.push(record.hash.clone());
        }

        if covered < previous.len() {
            // The store never shrinks outside of clear, so every revealed
            // hash must still be present in the sorted view.
            log::warn!(
                "Reveal reconciliation lost {} revealed commits; store shrank unexpectedly",
                previous.len() - covered
            );
        }

        self.revealed = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::store::CommitStore;
    use serde_json::json;

    fn store_with(commits: &[(&str, &str)]) -> CommitStore {
        let mut store = CommitStore::new();
        let payload = json!(
            commits
                .iter()
                .map(|(hash, ts)| json!({ "commit_hash": hash, "timestamp": ts }))
                .collect::<Vec<_>>()
        );
        store.merge(&payload).unwrap();
        store
    }

    #[test]
    fn advance_reveals_in_sorted_order() {
        let store = store_with(&[
            ("b", "2025-01-01T00:00:00Z"),
            ("a", "2025-01-02T00:00:00Z"),
        ]);
        let mut cursor = RevealCursor::new();

        cursor.advance_one(store.sorted_view());
        assert!(cursor.has_started());
        assert_eq!(cursor.revealed_hashes(), ["a".to_string()]);

        cursor.advance_one(store.sorted_view());
        assert_eq!(cursor.revealed_hashes(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn advance_on_empty_store_is_a_noop() {
        let store = CommitStore::new();
        let mut cursor = RevealCursor::new();
        cursor.advance_one(store.sorted_view());
        assert_eq!(cursor.revealed_count(), 0);
        assert!(!cursor.has_started());
    }

    #[test]
    fn advance_never_exceeds_store_size() {
        let store = store_with(&[("a", "2025-01-01T00:00:00Z")]);
        let mut cursor = RevealCursor::new();
        cursor.advance_one(store.sorted_view());
        cursor.advance_one(store.sorted_view());
        cursor.advance_one(store.sorted_view());
        assert_eq!(cursor.revealed_count(), 1);
    }

    #[test]
    fn show_all_is_idempotent() {
        let store = store_with(&[
            ("a", "2025-01-02T00:00:00Z"),
            ("b", "2025-01-01T00:00:00Z"),
        ]);
        let mut cursor = RevealCursor::new();

        cursor.show_all(store.sorted_view());
        assert_eq!(cursor.revealed_hashes(), ["a".to_string(), "b".to_string()]);
        assert!(cursor.has_started());

        cursor.show_all(store.sorted_view());
        assert_eq!(cursor.revealed_hashes(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn reset_clears_cursor_state() {
        let store = store_with(&[("a", "2025-01-01T00:00:00Z")]);
        let mut cursor = RevealCursor::new();
        cursor.advance_one(store.sorted_view());
        cursor.resume(store.sorted_view());
        cursor.reset();

        assert_eq!(cursor.revealed_count(), 0);
        assert!(!cursor.has_started());
        assert!(!cursor.is_playing());
    }

    #[test]
    fn resume_requires_started_and_remaining() {
        let store = store_with(&[
            ("a", "2025-01-02T00:00:00Z"),
            ("b", "2025-01-01T00:00:00Z"),
        ]);
        let mut cursor = RevealCursor::new();

        cursor.resume(store.sorted_view());
        assert!(!cursor.is_playing(), "resume before start is a no-op");

        cursor.advance_one(store.sorted_view());
        cursor.resume(store.sorted_view());
        assert!(cursor.is_playing());

        cursor.pause();
        assert!(!cursor.is_playing());

        cursor.advance_one(store.sorted_view());
        cursor.resume(store.sorted_view());
        assert!(!cursor.is_playing(), "resume with nothing left is a no-op");
    }

    #[test]
    fn reconcile_keeps_prefix_when_new_commits_sort_first() {
        let mut store = store_with(&[
            ("a", "2025-01-02T00:00:00Z"),
            ("b", "2025-01-01T00:00:00Z"),
        ]);
        let mut cursor = RevealCursor::new();
        cursor.advance_one(store.sorted_view());
        assert_eq!(cursor.revealed_hashes(), ["a".to_string()]);

        // A background refresh finds a newer commit that sorts ahead of
        // the revealed one.
        store
            .merge(&json!([{ "hash": "c", "timestamp": "2025-01-03T00:00:00Z" }]))
            .unwrap();
        cursor.reconcile(store.sorted_view());

        // "a" stays revealed even though it fell past position 1; the
        // revealed sequence is the prefix [c, a] of the new view.
        assert_eq!(cursor.revealed_hashes(), ["c".to_string(), "a".to_string()]);
    }

    #[test]
    fn reconcile_with_append_only_growth_keeps_count() {
        let mut store = store_with(&[
            ("a", "2025-01-03T00:00:00Z"),
            ("b", "2025-01-02T00:00:00Z"),
        ]);
        let mut cursor = RevealCursor::new();
        cursor.advance_one(store.sorted_view());
        cursor.advance_one(store.sorted_view());

        // Older commit appends at the end; the revealed prefix is already
        // consistent.
        store
            .merge(&json!([{ "hash": "c", "timestamp": "2025-01-01T00:00:00Z" }]))
            .unwrap();
        cursor.reconcile(store.sorted_view());

        assert_eq!(cursor.revealed_hashes(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn reconcile_membership_is_monotonic() {
        let mut store = store_with(&[
            ("a", "2025-01-02T00:00:00Z"),
            ("b", "2025-01-01T00:00:00Z"),
        ]);
        let mut cursor = RevealCursor::new();
        cursor.advance_one(store.sorted_view());
        cursor.advance_one(store.sorted_view());

        // Two newer commits arrive; both revealed hashes must survive.
        store
            .merge(&json!([
                { "hash": "c", "timestamp": "2025-01-04T00:00:00Z" },
                { "hash": "d", "timestamp": "2025-01-03T00:00:00Z" },
            ]))
            .unwrap();
        cursor.reconcile(store.sorted_view());

        assert_eq!(
            cursor.revealed_hashes(),
            ["c", "d", "a", "b"].map(str::to_string)
        );
        // And the result is a prefix of the sorted view.
        let view: Vec<_> = store.sorted_view().iter().map(|c| c.hash.clone()).collect();
        assert_eq!(cursor.revealed_hashes(), &view[..4]);
    }

    #[test]
    fn reconcile_before_any_reveal_is_a_noop() {
        let store = store_with(&[("a", "2025-01-01T00:00:00Z")]);
        let mut cursor = RevealCursor::new();
        cursor.reconcile(store.sorted_view());
        assert_eq!(cursor.revealed_count(), 0);
    }
}
