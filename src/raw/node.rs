use smallvec::SmallVec;

use super::handle::Handle;

// Inline capacity hint for node storage. The order is chosen per tree at
// runtime, so this only controls when key/child storage spills to the heap.
const INLINE_KEYS: usize = 8;

pub(crate) type KeyVec<K> = SmallVec<[K; INLINE_KEYS]>;
pub(crate) type ChildVec = SmallVec<[Handle; INLINE_KEYS + 1]>;

/// A B-tree node: ordered keys and, if internal, `keys.len() + 1` child
/// handles. A node is a leaf iff it has no children.
///
/// Nodes validate nothing and never rebalance themselves; the tree computes
/// positions during descent and repairs structure afterwards.
pub(crate) struct Node<K> {
    keys: KeyVec<K>,
    children: ChildVec,
}

/// Result of searching for a key within a single node.
pub(crate) enum SearchResult {
    /// Key present at this index.
    Found(usize),
    /// Key absent; the index is both the child to descend into and the
    /// position the key would occupy if inserted here.
    NotFound(usize),
}

impl<K> Node<K> {
    /// Creates a leaf holding a single key (the first root of a tree).
    pub(crate) fn with_key(key: K) -> Self {
        let mut keys = KeyVec::new();
        keys.push(key);
        Self { keys, children: ChildVec::new() }
    }

    pub(crate) fn from_parts(keys: KeyVec<K>, children: ChildVec) -> Self {
        Self { keys, children }
    }

    /// Leaf iff no children.
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    /// Locates `key` within this node, or the child gap it falls into.
    #[inline]
    pub(crate) fn search(&self, key: &K) -> SearchResult
    where
        K: Ord,
    {
        match self.keys.binary_search(key) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    /// Inserts `key` at a caller-supplied position. No ordering validation,
    /// no rebalancing; both are the tree's responsibility.
    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Swaps in a new key at `index`, returning the displaced one.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    pub(crate) fn insert_child(&mut self, index: usize, child: Handle) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> Handle {
        self.children.remove(index)
    }

    /// Splits an overflowing node: this node keeps keys `[0, mid)` and
    /// children `[0, mid]`; the returned node takes keys `[mid + 1, ..)` and
    /// children `[mid + 1, ..)`; the key at `mid` is returned for promotion
    /// into the parent.
    pub(crate) fn split_off(&mut self, mid: usize) -> (K, Node<K>) {
        let upper_keys: KeyVec<K> = self.keys.drain(mid + 1..).collect();
        let upper_children: ChildVec = if self.children.is_empty() {
            ChildVec::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };
        let promoted = self.keys.pop().unwrap();
        (promoted, Node { keys: upper_keys, children: upper_children })
    }

    /// Merges a right sibling into this node, absorbing the separator key
    /// demoted from the parent.
    pub(crate) fn absorb(&mut self, separator: K, mut right: Node<K>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }

    /// Takes ownership of all keys and children, leaving the node empty.
    pub(crate) fn take_contents(&mut self) -> (KeyVec<K>, ChildVec) {
        (core::mem::take(&mut self.keys), core::mem::take(&mut self.children))
    }

    pub(crate) fn set_contents(&mut self, keys: KeyVec<K>, children: ChildVec) {
        self.keys = keys;
        self.children = children;
    }
}
