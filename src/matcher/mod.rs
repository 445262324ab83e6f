//! Match finders: indexes from byte sequences to the stream position where
//! each sequence most recently started.

pub mod hash;
pub mod trie;

pub use hash::HashMatcher;
pub use trie::MatchTrie;

/// Index consulted by the compressor for back-reference candidates
///
/// Implementations must agree on every answer so the choice of backend never
/// changes the compressed output.
pub trait MatchFinder {
    /// Record `position` for `key`, replacing any earlier position
    fn insert(&mut self, key: &[u8], position: u64);

    /// Longest stored key that is a prefix of `key`, as `(key length, position)`
    fn longest_match(&self, key: &[u8]) -> Option<(usize, u64)>;

    /// Remove `key` if it is stored and `predicate` accepts its position
    ///
    /// Returns true iff an entry was removed.
    fn evict_if(&mut self, key: &[u8], predicate: &dyn Fn(u64) -> bool) -> bool;

    /// Smallest position still stored
    fn oldest_position(&self) -> Option<u64>;

    /// Number of stored keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Length of the shared prefix of `a` and `b`
#[inline]
pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix_len() {
        assert_eq!(common_prefix_len(b"abcd", b"abxy"), 2);
        assert_eq!(common_prefix_len(b"abc", b"abcdef"), 3);
        assert_eq!(common_prefix_len(b"", b"abc"), 0);
        assert_eq!(common_prefix_len(b"x", b"y"), 0);
    }

    /// Both backends, driven by the same operations, answer identically
    #[test]
    fn test_backends_agree() {
        let mut trie = MatchTrie::new();
        let mut hash = HashMatcher::new();
        let finders: [&mut dyn MatchFinder; 2] = [&mut trie, &mut hash];

        for finder in finders {
            finder.insert(b"abcd", 1);
            finder.insert(b"ab", 2);
            finder.insert(b"abx", 3);
            finder.insert(b"bcd", 4);
            assert!(finder.evict_if(b"ab", &|v| v <= 2));
            assert!(!finder.evict_if(b"bcd", &|v| v < 4));
        }

        for query in [&b"abcdef"[..], b"abx", b"ab", b"bcdd", b"zz", b"abc"] {
            assert_eq!(trie.longest_match(query), hash.longest_match(query), "query {:?}", query);
        }
        assert_eq!(trie.len(), hash.len());
        assert_eq!(trie.oldest_position(), Some(1));
        assert_eq!(hash.oldest_position(), Some(1));
    }
}
