//! Concurrency-safe result store
//!
//! One mutex guards both the key map and the claimed-page counter, so the
//! budget check and the claim are a single atomic step.

use crate::storage::PageRecord;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// State of a claimed key
#[derive(Debug, Clone)]
enum Entry {
    /// Claimed; fetch/extraction not finished (or failed)
    InFlight,
    /// Extraction finished
    Complete(PageRecord),
}

/// Result of a claim attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The key was absent and is now in flight for the caller
    Claimed,
    /// The key was already claimed by another task
    AlreadySeen,
    /// The page budget is exhausted
    BudgetExhausted,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    claimed: usize,
}

/// Mapping from normalized URL to page record, shared by all crawl tasks
///
/// Raw map access is never exposed. The lock is held only for the duration of
/// a claim, a completion or a snapshot, never across a fetch or an extraction.
#[derive(Debug)]
pub struct ResultStore {
    inner: Mutex<Inner>,
    max_pages: usize,
}

impl ResultStore {
    /// Creates an empty store that admits at most `max_pages` claims
    pub fn new(max_pages: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_pages,
        }
    }

    /// The configured page budget
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking task cannot leave Inner half-updated, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Atomically claims `key` for exclusive processing
    ///
    /// Succeeds only if the budget is not exhausted and the key has never been
    /// claimed. On success the key is marked in flight and the claimed count is
    /// incremented; on failure nothing changes.
    pub fn try_claim(&self, key: &str) -> ClaimOutcome {
        let mut inner = self.lock();

        if inner.claimed >= self.max_pages {
            return ClaimOutcome::BudgetExhausted;
        }

        if inner.entries.contains_key(key) {
            return ClaimOutcome::AlreadySeen;
        }

        inner.entries.insert(key.to_string(), Entry::InFlight);
        inner.claimed += 1;
        ClaimOutcome::Claimed
    }

    /// Replaces the in-flight placeholder for `key` with the final record
    ///
    /// The caller must have claimed `key`. A completion for an unclaimed key is
    /// ignored and logged.
    pub fn complete(&self, key: &str, record: PageRecord) {
        let mut inner = self.lock();

        match inner.entries.get_mut(key) {
            Some(entry) if matches!(entry, Entry::InFlight) => {
                *entry = Entry::Complete(record);
            }
            Some(_) => {
                tracing::warn!("Ignoring second completion for {}", key);
            }
            None => {
                tracing::warn!("Ignoring completion for unclaimed key {}", key);
            }
        }
    }

    /// Number of keys claimed so far, including in-flight and failed ones
    pub fn claimed_count(&self) -> usize {
        self.lock().claimed
    }

    /// Number of claimed keys that never completed
    pub fn in_flight_count(&self) -> usize {
        self.lock()
            .entries
            .values()
            .filter(|entry| matches!(entry, Entry::InFlight))
            .count()
    }

    /// Copies out all completed records, keyed by normalized URL
    ///
    /// In-flight entries are excluded. Intended for use after every crawl task
    /// has joined.
    pub fn snapshot(&self) -> BTreeMap<String, PageRecord> {
        self.lock()
            .entries
            .iter()
            .filter_map(|(key, entry)| match entry {
                Entry::Complete(record) => Some((key.clone(), record.clone())),
                Entry::InFlight => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(url: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            heading: "Title".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_claim_once() {
        let store = ResultStore::new(10);
        assert_eq!(store.try_claim("example.com"), ClaimOutcome::Claimed);
        assert_eq!(store.try_claim("example.com"), ClaimOutcome::AlreadySeen);
        assert_eq!(store.claimed_count(), 1);
    }

    #[test]
    fn test_budget_exhausted() {
        let store = ResultStore::new(2);
        assert_eq!(store.try_claim("a"), ClaimOutcome::Claimed);
        assert_eq!(store.try_claim("b"), ClaimOutcome::Claimed);
        assert_eq!(store.try_claim("c"), ClaimOutcome::BudgetExhausted);
        assert_eq!(store.claimed_count(), 2);
    }

    #[test]
    fn test_budget_checked_before_membership() {
        let store = ResultStore::new(1);
        assert_eq!(store.try_claim("a"), ClaimOutcome::Claimed);
        assert_eq!(store.try_claim("a"), ClaimOutcome::BudgetExhausted);
    }

    #[test]
    fn test_zero_budget_claims_nothing() {
        let store = ResultStore::new(0);
        assert_eq!(store.try_claim("a"), ClaimOutcome::BudgetExhausted);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_excludes_in_flight() {
        let store = ResultStore::new(10);
        store.try_claim("a");
        store.try_claim("b");
        store.complete("a", record("https://a"));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot["a"].url, "https://a");
        assert_eq!(store.in_flight_count(), 1);
    }

    #[test]
    fn test_complete_unclaimed_is_ignored() {
        let store = ResultStore::new(10);
        store.complete("a", record("https://a"));
        assert!(store.snapshot().is_empty());
        assert_eq!(store.claimed_count(), 0);
    }

    #[test]
    fn test_second_completion_is_ignored() {
        let store = ResultStore::new(10);
        store.try_claim("a");
        store.complete("a", record("https://first"));
        store.complete("a", record("https://second"));
        assert_eq!(store.snapshot()["a"].url, "https://first");
    }

    #[test]
    fn test_concurrent_claims_single_winner() {
        let store = Arc::new(ResultStore::new(100));
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.try_claim("same-key") == ClaimOutcome::Claimed)
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_concurrent_claims_respect_budget() {
        let store = Arc::new(ResultStore::new(5));
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.try_claim(&format!("key-{}", i)) == ClaimOutcome::Claimed)
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 5);
        assert_eq!(store.claimed_count(), 5);
    }
}
