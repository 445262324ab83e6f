//! Exact-key hash table match finder.
//!
//! Stores every key independently and answers longest-prefix queries by
//! probing prefixes from the longest down. Simpler than the trie, at the cost
//! of up to `key.len()` hash lookups per query.

use super::MatchFinder;
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct HashMatcher {
    table: HashMap<Box<[u8]>, u64>,
}

impl HashMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for `capacity` keys
    ///
    /// A compressor with window `w` and lookahead `l` holds at most
    /// `w * (l - 1)` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { table: HashMap::with_capacity(capacity) }
    }

    /// Value stored for exactly `key`
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.table.get(key).copied()
    }
}

impl MatchFinder for HashMatcher {
    fn insert(&mut self, key: &[u8], position: u64) {
        if key.is_empty() {
            return;
        }
        match self.table.get_mut(key) {
            Some(value) => *value = position,
            None => {
                self.table.insert(key.into(), position);
            }
        }
    }

    fn longest_match(&self, key: &[u8]) -> Option<(usize, u64)> {
        (1..=key.len()).rev().find_map(|n| self.get(&key[..n]).map(|value| (n, value)))
    }

    fn evict_if(&mut self, key: &[u8], predicate: &dyn Fn(u64) -> bool) -> bool {
        let accepted = self.table.get(key).is_some_and(|&value| predicate(value));
        accepted && self.table.remove(key).is_some()
    }

    fn oldest_position(&self) -> Option<u64> {
        self.table.values().copied().min()
    }

    fn len(&self) -> usize {
        self.table.len()
    }
}
