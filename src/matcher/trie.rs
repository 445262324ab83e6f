//! Path-compressed trie (radix tree) over byte sequences.
//!
//! Every edge carries a non-empty byte label. Structure is kept compact
//! between operations: a node without a value always has at least two
//! children. Only the root is exempt; it has an empty label, never holds a
//! value and acts as the fan-out over first bytes.

use super::{common_prefix_len, MatchFinder};
use std::mem;

#[derive(Clone, Debug)]
struct Node {
    /// Edge segment relative to the parent
    label: Vec<u8>,
    /// Stream position recorded for the key ending at this node
    value: Option<u64>,
    /// Children sorted by the first byte of their label
    children: Vec<Node>,
}

impl Node {
    fn root() -> Self {
        Self { label: Vec::new(), value: None, children: Vec::new() }
    }

    fn leaf(label: &[u8], value: u64) -> Self {
        Self { label: label.to_vec(), value: Some(value), children: Vec::new() }
    }

    fn branch(label: &[u8]) -> Self {
        Self { label: label.to_vec(), value: None, children: Vec::with_capacity(2) }
    }

    #[inline]
    fn child_index(&self, byte: u8) -> Result<usize, usize> {
        self.children.binary_search_by_key(&byte, |c| c.label[0])
    }

    #[inline]
    fn child(&self, byte: u8) -> Option<&Node> {
        self.child_index(byte).ok().map(|i| &self.children[i])
    }

    /// Fold the single remaining child into this node
    fn merge_with_only_child(&mut self) {
        debug_assert!(self.value.is_none() && self.children.len() == 1);
        if let Some(only) = self.children.pop() {
            let mut label = mem::take(&mut self.label);
            label.extend_from_slice(&only.label);
            *self = Node { label, value: only.value, children: only.children };
        }
    }

    /// Restore compactness of child `idx` after its value was cleared
    /// somewhere in its subtree
    fn compact_child(&mut self, idx: usize) {
        let child = &mut self.children[idx];
        if child.value.is_some() {
            return;
        }
        match child.children.len() {
            0 => {
                self.children.remove(idx);
            }
            1 => child.merge_with_only_child(),
            _ => {}
        }
    }
}

/// Maps byte sequences to the stream position where each most recently began
#[derive(Clone, Debug)]
pub struct MatchTrie {
    root: Node,
    /// Number of keys holding a value
    len: usize,
}

impl MatchTrie {
    pub fn new() -> Self {
        Self { root: Node::root(), len: 0 }
    }

    /// Record `value` for `key`, overwriting any previous value
    ///
    /// Empty keys are ignored.
    pub fn insert(&mut self, key: &[u8], value: u64) {
        if key.is_empty() {
            return;
        }
        if insert_below(&mut self.root, key, value) {
            self.len += 1;
        }
    }

    /// Value stored for exactly `key`
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        match self.longest_prefix_match(key) {
            Some((len, value)) if len == key.len() => Some(value),
            _ => None,
        }
    }

    /// Deepest key along `key`'s path that carries a value
    ///
    /// Returns `(matched length, value)`. A descent that fails partway falls
    /// back to the deepest value already passed.
    pub fn longest_prefix_match(&self, key: &[u8]) -> Option<(usize, u64)> {
        let mut node = &self.root;
        let mut depth = 0;
        let mut best = None;

        while depth < key.len() {
            let Some(child) = node.child(key[depth]) else { break };
            if !key[depth..].starts_with(&child.label) {
                break;
            }
            depth += child.label.len();
            if let Some(value) = child.value {
                best = Some((depth, value));
            }
            node = child;
        }

        best
    }

    /// Remove `key` unconditionally
    pub fn delete(&mut self, key: &[u8]) -> bool {
        self.delete_if(key, |_| true)
    }

    /// Remove `key` if it carries a value accepted by `predicate`
    ///
    /// The trie is left untouched when the key is absent, has no value, or
    /// the predicate rejects it. Otherwise the emptied node is removed or
    /// merged with its only child, and parents are re-compacted on the way up.
    pub fn delete_if<F: Fn(u64) -> bool>(&mut self, key: &[u8], predicate: F) -> bool {
        if key.is_empty() {
            return false;
        }
        let removed = remove_below(&mut self.root, key, &predicate);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Number of keys holding a value
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, root excluded
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            node.children.iter().map(|c| 1 + count(c)).sum()
        }
        count(&self.root)
    }

    /// All `(key, value)` pairs in lexicographic key order
    pub fn entries(&self) -> Vec<(Vec<u8>, u64)> {
        fn walk(node: &Node, prefix: &mut Vec<u8>, out: &mut Vec<(Vec<u8>, u64)>) {
            let start = prefix.len();
            prefix.extend_from_slice(&node.label);
            if let Some(value) = node.value {
                out.push((prefix.clone(), value));
            }
            for child in &node.children {
                walk(child, prefix, out);
            }
            prefix.truncate(start);
        }

        let mut out = Vec::with_capacity(self.len);
        walk(&self.root, &mut Vec::new(), &mut out);
        out
    }

    /// Check the structural invariants: valueless inner nodes have at least
    /// two children, labels are non-empty, children are sorted and `len`
    /// matches the stored values
    pub fn is_compact(&self) -> bool {
        fn check(node: &Node, values: &mut usize) -> bool {
            if node.label.is_empty() || (node.value.is_none() && node.children.len() < 2) {
                return false;
            }
            *values += node.value.is_some() as usize;
            sorted(&node.children) && node.children.iter().all(|c| check(c, values))
        }
        fn sorted(children: &[Node]) -> bool {
            children.windows(2).all(|w| w[0].label[0] < w[1].label[0])
        }

        let mut values = 0;
        self.root.value.is_none()
            && sorted(&self.root.children)
            && self.root.children.iter().all(|c| check(c, &mut values))
            && values == self.len
    }
}

impl Default for MatchTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder for MatchTrie {
    fn insert(&mut self, key: &[u8], position: u64) {
        MatchTrie::insert(self, key, position);
    }

    fn longest_match(&self, key: &[u8]) -> Option<(usize, u64)> {
        self.longest_prefix_match(key)
    }

    fn evict_if(&mut self, key: &[u8], predicate: &dyn Fn(u64) -> bool) -> bool {
        self.delete_if(key, predicate)
    }

    fn oldest_position(&self) -> Option<u64> {
        fn min_value(node: &Node) -> Option<u64> {
            node.children.iter().filter_map(min_value).chain(node.value).min()
        }
        min_value(&self.root)
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Insert the non-empty remainder `key` under `node`; true if a new key was added
fn insert_below(node: &mut Node, key: &[u8], value: u64) -> bool {
    match node.child_index(key[0]) {
        Ok(idx) => insert_at(&mut node.children[idx], key, value),
        Err(pos) => {
            node.children.insert(pos, Node::leaf(key, value));
            true
        }
    }
}

/// Insert `key` at `slot`, whose label shares at least its first byte with `key`
fn insert_at(slot: &mut Node, key: &[u8], value: u64) -> bool {
    let matched = common_prefix_len(&slot.label, key);
    let label_len = slot.label.len();

    if matched == label_len && matched < key.len() {
        // Label is a proper prefix of the key: descend
        insert_below(slot, &key[matched..], value)
    } else if matched == label_len {
        // Exact match
        slot.value.replace(value).is_none()
    } else if matched == key.len() {
        // Key is a proper prefix of the label: new node on top of the old one
        let mut old = mem::replace(slot, Node::leaf(key, value));
        old.label.drain(..matched);
        slot.children.push(old);
        true
    } else {
        // Diverging: split at the shared prefix
        let mut old = mem::replace(slot, Node::branch(&key[..matched]));
        old.label.drain(..matched);
        let leaf = Node::leaf(&key[matched..], value);
        if old.label[0] < leaf.label[0] {
            slot.children.extend([old, leaf]);
        } else {
            slot.children.extend([leaf, old]);
        }
        true
    }
}

/// Remove the non-empty remainder `key` under `node`
fn remove_below(node: &mut Node, key: &[u8], predicate: &dyn Fn(u64) -> bool) -> bool {
    let Ok(idx) = node.child_index(key[0]) else { return false };
    let child = &mut node.children[idx];
    if !key.starts_with(&child.label) {
        return false;
    }

    let rest = &key[child.label.len()..];
    let removed = if rest.is_empty() {
        match child.value {
            Some(value) if predicate(value) => {
                child.value = None;
                true
            }
            _ => false,
        }
    } else {
        remove_below(child, rest, predicate)
    };

    if removed {
        node.compact_child(idx);
    }
    removed
}
