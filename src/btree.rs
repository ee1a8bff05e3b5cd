use smallvec::{SmallVec, smallvec};

use crate::error::{Error, Result};
use crate::raw::{Arena, ChildVec, Handle, KeyVec, Node, SearchResult};

/// One step of a recorded root-to-leaf descent: the node visited and the
/// index of the child the descent continued into. For the final node of a
/// path the index is positional bookkeeping only.
struct PathElement {
    node: Handle,
    child_index: usize,
}

/// A descent path. Splits and underflow repair walk it backward, which is
/// how the tree gets by without parent back-pointers.
type Path = SmallVec<[PathElement; 16]>;

/// An ordered, in-memory index of unique keys backed by a balanced
/// multi-way search tree with a caller-chosen order.
///
/// The order `M >= 3` (odd or even) bounds every node to at most `M - 1`
/// keys and `M` children; non-root nodes hold at least `(M - 1) / 2` keys
/// and all leaves sit at the same depth, so `search`, `insert`, and
/// `remove` run in `O(log n)` node visits.
///
/// Nodes live in an arena and refer to their children by [`Handle`]; each
/// slot is exclusively owned by its parent (or by the tree, for the root).
///
/// The tree is single-threaded: mutation takes `&mut self` and traversal
/// borrows `&self`, so the borrow checker rules out structural mutation
/// while an in-progress traversal is being consumed.
pub struct BTree<K> {
    nodes: Arena<Node<K>>,
    root: Option<Handle>,
    order: usize,
    len: usize,
}

impl<K> BTree<K> {
    /// Creates an empty tree of the given order (branching factor).
    ///
    /// # Panics
    ///
    /// Panics if `order < 3`. Degenerate orders are a caller error, not a
    /// runtime condition.
    pub fn new(order: usize) -> Self {
        assert!(order >= 3, "`BTree::new()` - `order` must be at least 3!");
        Self {
            nodes: Arena::new(),
            root: None,
            order,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no keys.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the order the tree was constructed with.
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Removes every key from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the number of levels in the tree (0 when empty).
    ///
    /// All leaves share the same depth, so the leftmost descent measures
    /// every root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut levels = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            levels += 1;
            let node = self.nodes.get(handle);
            current = if node.is_leaf() { None } else { Some(node.child(0)) };
        }
        levels
    }

    /// Returns a view of the root node, if the tree is non-empty.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.map(|handle| NodeRef { tree: self, handle })
    }

    /// Lazily yields every key in the tree in ascending order.
    ///
    /// The iterator is finite and restartable (each call starts a fresh
    /// traversal) and tolerates being partially consumed and abandoned.
    pub fn traverse_inorder(&self) -> InorderKeys<'_, K> {
        let mut iter = InorderKeys {
            tree: self,
            stack: SmallVec::new(),
        };
        if let Some(root) = self.root {
            iter.push_leftmost(root);
        }
        iter
    }

    const fn max_keys(&self) -> usize {
        self.order - 1
    }

    const fn min_keys(&self) -> usize {
        (self.order - 1) / 2
    }

    /// A non-root node below the occupancy minimum needs repair.
    fn is_underflowing(&self, handle: Handle) -> bool {
        self.nodes.get(handle).key_count() < self.min_keys()
    }

    /// A populous node holds a spare key and can feed a redistribution.
    fn is_populous(&self, handle: Handle) -> bool {
        self.nodes.get(handle).key_count() > self.min_keys()
    }

    fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }
}

impl<K: Ord> BTree<K> {
    /// Returns the node holding `target`, or `Ok(None)` when the key is
    /// absent (an absent key is not an error). Passing `None` as the key
    /// fails with [`Error::InvalidKey`].
    pub fn search(&self, target: impl Into<Option<K>>) -> Result<Option<NodeRef<'_, K>>> {
        let target = target.into().ok_or(Error::InvalidKey)?;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match node.search(&target) {
                SearchResult::Found(_) => return Ok(Some(NodeRef { tree: self, handle })),
                SearchResult::NotFound(index) => {
                    current = if node.is_leaf() { None } else { Some(node.child(index)) };
                }
            }
        }
        Ok(None)
    }

    /// Returns true if `key` is in the tree.
    pub fn contains(&self, key: &K) -> bool {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match node.search(key) {
                SearchResult::Found(_) => return true,
                SearchResult::NotFound(index) => {
                    current = if node.is_leaf() { None } else { Some(node.child(index)) };
                }
            }
        }
        false
    }

    /// Inserts `key`, returning `Ok(true)` if it was added and `Ok(false)`
    /// if an equal key was already present (the tree is left untouched).
    /// Passing `None` fails with [`Error::InvalidKey`].
    pub fn insert(&mut self, key: impl Into<Option<K>>) -> Result<bool> {
        let key = key.into().ok_or(Error::InvalidKey)?;

        let Some(root) = self.root else {
            let handle = self.nodes.alloc(Node::with_key(key));
            self.root = Some(handle);
            self.len = 1;
            return Ok(true);
        };

        // Descend to the leaf where `key` belongs, recording the path.
        let mut path = Path::new();
        let mut current = root;
        let leaf_index = loop {
            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(_) => return Ok(false),
                SearchResult::NotFound(index) => {
                    path.push(PathElement { node: current, child_index: index });
                    if node.is_leaf() {
                        break index;
                    }
                    current = node.child(index);
                }
            }
        };

        self.nodes.get_mut(current).insert_key(leaf_index, key);
        self.len += 1;
        self.fix_insert(&path);
        Ok(true)
    }

    /// Walks the recorded path from the leaf back toward the root, splitting
    /// every node that overflowed. Overflow can cascade at most to the root,
    /// so the height grows by at most one per insertion, always at the top.
    fn fix_insert(&mut self, path: &Path) {
        for depth in (0..path.len()).rev() {
            let current = path[depth].node;
            if self.nodes.get(current).key_count() <= self.max_keys() {
                return;
            }

            let mid = (self.order - 1) / 2;
            let (promoted, upper) = self.nodes.get_mut(current).split_off(mid);
            let upper = self.nodes.alloc(upper);

            if depth == 0 {
                // The root itself split: a brand-new root takes the
                // promoted key and the two halves as its children.
                let new_root = Node::from_parts(smallvec![promoted], smallvec![current, upper]);
                self.root = Some(self.nodes.alloc(new_root));
            } else {
                // The parent's child slot at `child_index` stays the left
                // half; the new right half lands immediately after it.
                let parent = &path[depth - 1];
                let node = self.nodes.get_mut(parent.node);
                node.insert_key(parent.child_index, promoted);
                node.insert_child(parent.child_index + 1, upper);
            }
        }
    }

    /// Removes `key` and returns it by value.
    ///
    /// Fails with [`Error::KeyNotFound`] when the key is absent and with
    /// [`Error::InvalidKey`] for `None`; a failed removal leaves the tree
    /// exactly as it was.
    pub fn remove(&mut self, key: impl Into<Option<K>>) -> Result<K> {
        let key = key.into().ok_or(Error::InvalidKey)?;
        let Some(root) = self.root else {
            return Err(Error::KeyNotFound);
        };

        // Descend to the first node holding the key, recording the path.
        let mut path = Path::new();
        let mut current = root;
        let found_index = loop {
            let node = self.nodes.get(current);
            match node.search(&key) {
                SearchResult::Found(index) => break index,
                SearchResult::NotFound(index) => {
                    if node.is_leaf() {
                        return Err(Error::KeyNotFound);
                    }
                    path.push(PathElement { node: current, child_index: index });
                    current = node.child(index);
                }
            }
        };

        let removed = if self.nodes.get(current).is_internal() {
            // The match sits in an internal node: swap it with its in-order
            // successor, the first key of the leftmost leaf to its right,
            // then delete that key from the leaf. The physical deletion
            // always happens in a leaf.
            path.push(PathElement { node: current, child_index: found_index + 1 });
            let target = current;
            let mut leaf = self.nodes.get(current).child(found_index + 1);
            loop {
                let node = self.nodes.get(leaf);
                if node.is_leaf() {
                    break;
                }
                path.push(PathElement { node: leaf, child_index: 0 });
                leaf = node.child(0);
            }
            path.push(PathElement { node: leaf, child_index: 0 });

            let successor = self.nodes.get_mut(leaf).remove_key(0);
            self.nodes.get_mut(target).replace_key(found_index, successor)
        } else {
            path.push(PathElement { node: current, child_index: found_index });
            self.nodes.get_mut(current).remove_key(found_index)
        };

        self.len -= 1;
        self.fix_remove(&path);
        Ok(removed)
    }

    /// Walks the recorded path from the leaf where the physical deletion
    /// happened back toward the root, repairing underflow by redistribution
    /// out of a populous sibling or, failing that, by merging.
    fn fix_remove(&mut self, path: &Path) {
        let mut depth = path.len() - 1;
        loop {
            let current = path[depth].node;

            if depth == 0 {
                self.collapse_root(current);
                return;
            }
            if !self.is_underflowing(current) {
                return;
            }

            let parent = path[depth - 1].node;
            let child_index = path[depth - 1].child_index;
            let (left_sibling, right_sibling) = {
                let parent_node = self.nodes.get(parent);
                let left = (child_index > 0).then(|| parent_node.child(child_index - 1));
                let right = (child_index + 1 < parent_node.child_count())
                    .then(|| parent_node.child(child_index + 1));
                (left, right)
            };

            // A populous left sibling feeds a redistribution, then the
            // right one; either way the repair ends at this level.
            if let Some(left) = left_sibling
                && self.is_populous(left)
            {
                self.redistribute(left, current, parent, child_index - 1);
                return;
            }
            if let Some(right) = right_sibling
                && self.is_populous(right)
            {
                self.redistribute(current, right, parent, child_index);
                return;
            }

            // No sibling can spare a key: merge, preferring the left
            // sibling. The parent loses a separator and may itself
            // underflow, so the walk continues one level up.
            if let Some(left) = left_sibling {
                self.merge(left, current, parent, child_index - 1);
            } else {
                // A non-root underflowing node has at least one sibling.
                self.merge(current, right_sibling.unwrap(), parent, child_index);
            }
            depth -= 1;
        }
    }

    /// The root is exempt from the occupancy minimum, but a merge can leave
    /// it with a single child (collapse: the child becomes the root and the
    /// height shrinks by one) and the final removal can empty a leaf root
    /// (the tree becomes empty).
    fn collapse_root(&mut self, root: Handle) {
        let node = self.nodes.get(root);
        if node.is_internal() {
            if node.child_count() == 1 {
                let child = node.child(0);
                self.nodes.free(root);
                self.root = Some(child);
            }
        } else if node.key_count() == 0 {
            self.nodes.free(root);
            self.root = None;
        }
    }

    /// Rebalances two adjacent siblings through their parent separator:
    /// concatenates `left.keys + [separator] + right.keys` (and the two
    /// child sequences), splits the run at its midpoint, and writes the
    /// midpoint key back to the parent as the new separator.
    fn redistribute(&mut self, left: Handle, right: Handle, parent: Handle, separator_index: usize) {
        let (mut keys, mut children) = self.nodes.get_mut(left).take_contents();
        keys.push(self.nodes.get_mut(parent).remove_key(separator_index));
        {
            let (mut right_keys, mut right_children) = self.nodes.get_mut(right).take_contents();
            keys.append(&mut right_keys);
            children.append(&mut right_children);
        }

        let mid = keys.len() / 2;
        let upper_keys: KeyVec<K> = keys.drain(mid + 1..).collect();
        let upper_children: ChildVec = if children.is_empty() {
            ChildVec::new()
        } else {
            children.drain(mid + 1..).collect()
        };
        let separator = keys.pop().unwrap();

        self.nodes.get_mut(left).set_contents(keys, children);
        self.nodes.get_mut(right).set_contents(upper_keys, upper_children);
        self.nodes.get_mut(parent).insert_key(separator_index, separator);
    }

    /// Collapses `right` into `left`, absorbing the separator demoted from
    /// the parent. The parent loses one key and one child slot; `right`'s
    /// arena slot is freed.
    fn merge(&mut self, left: Handle, right: Handle, parent: Handle, separator_index: usize) {
        let separator = {
            let parent_node = self.nodes.get_mut(parent);
            parent_node.remove_child(separator_index + 1);
            parent_node.remove_key(separator_index)
        };
        let right_node = self.nodes.take(right);
        self.nodes.get_mut(left).absorb(separator, right_node);
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.traverse_inorder()).finish()
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = InorderKeys<'a, K>;

    fn into_iter(self) -> InorderKeys<'a, K> {
        self.traverse_inorder()
    }
}

/// A read-only view of a node: its keys and its place in the structure.
///
/// Returned by [`BTree::search`] and [`BTree::root`]; [`NodeRef::child`]
/// navigates downward. The view borrows the tree, so the tree cannot be
/// mutated while any view is alive.
#[derive(Clone, Copy)]
pub struct NodeRef<'a, K> {
    tree: &'a BTree<K>,
    handle: Handle,
}

impl<'a, K> NodeRef<'a, K> {
    /// The node's keys, in strictly ascending order.
    pub fn keys(&self) -> &'a [K] {
        self.tree.node(self.handle).keys()
    }

    pub fn key_count(&self) -> usize {
        self.tree.node(self.handle).key_count()
    }

    pub fn child_count(&self) -> usize {
        self.tree.node(self.handle).child_count()
    }

    /// Leaf iff no children.
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.handle).is_leaf()
    }

    pub fn is_internal(&self) -> bool {
        self.tree.node(self.handle).is_internal()
    }

    /// The child at `index`, or `None` past the end (always `None` on a
    /// leaf).
    pub fn child(&self, index: usize) -> Option<NodeRef<'a, K>> {
        let node = self.tree.node(self.handle);
        (index < node.child_count()).then(|| NodeRef {
            tree: self.tree,
            handle: node.child(index),
        })
    }

    /// Lazily yields every key of the subtree rooted at this node, in
    /// ascending order.
    pub fn traverse_inorder(&self) -> InorderKeys<'a, K> {
        let mut iter = InorderKeys {
            tree: self.tree,
            stack: SmallVec::new(),
        };
        iter.push_leftmost(self.handle);
        iter
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("keys", &self.keys())
            .field("child_count", &self.child_count())
            .finish()
    }
}

/// Lazy in-order key iterator driven by an explicit stack of
/// (node, next key index) frames: each child `i` is exhausted before key
/// `i` is produced, and the last child comes after the last key.
pub struct InorderKeys<'a, K> {
    tree: &'a BTree<K>,
    stack: SmallVec<[(Handle, usize); 16]>,
}

impl<K> InorderKeys<'_, K> {
    fn push_leftmost(&mut self, mut handle: Handle) {
        loop {
            self.stack.push((handle, 0));
            let node = self.tree.node(handle);
            if node.is_leaf() {
                return;
            }
            handle = node.child(0);
        }
    }
}

impl<'a, K> Iterator for InorderKeys<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let tree = self.tree;
        loop {
            let (handle, index) = *self.stack.last()?;
            let node = tree.node(handle);
            if index < node.key_count() {
                self.stack.last_mut().unwrap().1 += 1;
                if node.is_internal() {
                    self.push_leftmost(node.child(index + 1));
                }
                return Some(node.key(index));
            }
            self.stack.pop();
        }
    }
}

impl<K> core::iter::FusedIterator for InorderKeys<'_, K> {}

#[cfg(test)]
impl<K: Ord + core::fmt::Debug> BTree<K> {
    /// Checks every structural invariant of the tree, panicking with a
    /// description of the first violation. Test-only.
    pub(crate) fn validate_invariants(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.len, 0, "empty tree must have len 0");
            assert!(self.nodes.is_empty(), "empty tree must hold no nodes");
            return;
        };

        let mut leaf_depth = None;
        let mut key_total = 0;
        self.validate_node(root, 0, None, None, &mut leaf_depth, &mut key_total);
        assert_eq!(self.len, key_total, "len must match the number of stored keys");
    }

    fn validate_node(
        &self,
        handle: Handle,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        leaf_depth: &mut Option<usize>,
        key_total: &mut usize,
    ) {
        let node = self.nodes.get(handle);
        let keys = node.keys();
        *key_total += keys.len();

        assert!(keys.len() <= self.max_keys(), "node holds more than order - 1 keys");
        if Some(handle) != self.root {
            assert!(keys.len() >= self.min_keys(), "non-root node is underflowing");
        }

        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "keys within a node must be strictly ascending");
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            assert!(lower < first, "subtree keys must lie strictly above the left separator");
        }
        if let (Some(last), Some(upper)) = (keys.last(), upper) {
            assert!(last < upper, "subtree keys must lie strictly below the right separator");
        }

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) => assert_eq!(depth, expected, "all leaves must share the same depth"),
            }
            return;
        }

        assert_eq!(
            node.child_count(),
            keys.len() + 1,
            "internal node must have exactly one more child than keys"
        );
        for index in 0..node.child_count() {
            let child_lower = if index == 0 { lower } else { Some(&keys[index - 1]) };
            let child_upper = keys.get(index).or(upper);
            self.validate_node(node.child(index), depth + 1, child_lower, child_upper, leaf_depth, key_total);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn new_tree_is_empty() {
        let tree: BTree<i64> = BTree::new(3);
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.traverse_inorder().count(), 0);
    }

    #[test]
    #[should_panic(expected = "`BTree::new()` - `order` must be at least 3!")]
    fn degenerate_order_is_a_precondition_violation() {
        let _: BTree<i64> = BTree::new(2);
    }

    #[test]
    fn absent_keys_are_rejected() {
        let mut tree: BTree<i64> = BTree::new(5);
        assert_eq!(tree.insert(None), Err(Error::InvalidKey));
        assert_eq!(tree.remove(None), Err(Error::InvalidKey));
        assert!(matches!(tree.search(None), Err(Error::InvalidKey)));
        tree.validate_invariants();
    }

    #[test]
    fn duplicate_insert_is_rejected_without_mutation() {
        let mut tree = BTree::new(4);
        assert_eq!(tree.insert(7), Ok(true));
        assert_eq!(tree.insert(7), Ok(false));
        assert_eq!(tree.len(), 1);
        tree.validate_invariants();
    }

    #[test]
    fn remove_returns_the_key_by_value() {
        let mut tree = BTree::new(3);
        for key in 0..32 {
            tree.insert(key).unwrap();
        }
        // 15 sits in an internal node by now, exercising the successor swap.
        assert_eq!(tree.remove(15), Ok(15));
        assert!(!tree.contains(&15));
        tree.validate_invariants();
    }

    #[test]
    fn removing_the_last_key_empties_the_tree() {
        let mut tree = BTree::new(5);
        tree.insert(42).unwrap();
        assert_eq!(tree.remove(42), Ok(42));
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.remove(42), Err(Error::KeyNotFound));
        tree.validate_invariants();
    }

    #[test]
    fn traversal_is_restartable_and_partially_consumable() {
        let mut tree = BTree::new(4);
        for key in [5, 1, 4, 2, 3] {
            tree.insert(key).unwrap();
        }

        let mut partial = tree.traverse_inorder();
        assert_eq!(partial.next(), Some(&1));
        assert_eq!(partial.next(), Some(&2));
        drop(partial);

        let full: Vec<i32> = tree.traverse_inorder().copied().collect();
        assert_eq!(full, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn subtree_traversal_covers_only_the_subtree() {
        let mut tree = BTree::new(3);
        for key in 1..=10 {
            tree.insert(key).unwrap();
        }
        let root = tree.root().unwrap();
        assert!(root.is_internal());

        let left: Vec<i32> = root.child(0).unwrap().traverse_inorder().copied().collect();
        let right_of_last = root.keys().last().unwrap();
        assert!(left.iter().all(|key| key < root.keys().first().unwrap()));

        let last_child = root.child(root.child_count() - 1).unwrap();
        let right: Vec<i32> = last_child.traverse_inorder().copied().collect();
        assert!(right.iter().all(|key| key > right_of_last));
    }

    #[derive(Clone, Debug)]
    enum TreeOp {
        Insert(i64),
        Remove(i64),
        Contains(i64),
    }

    fn op_strategy() -> impl Strategy<Value = TreeOp> {
        let key = -200i64..200i64;
        prop_oneof![
            5 => key.clone().prop_map(TreeOp::Insert),
            3 => key.clone().prop_map(TreeOp::Remove),
            2 => key.prop_map(TreeOp::Contains),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Replays a random operation sequence against a `BTreeSet` model,
        /// validating every structural invariant after every operation.
        #[test]
        fn tree_matches_btreeset_model(
            order in 3usize..=17,
            ops in prop::collection::vec(op_strategy(), 1..800),
        ) {
            let mut tree: BTree<i64> = BTree::new(order);
            let mut model: BTreeSet<i64> = BTreeSet::new();

            for op in &ops {
                match op {
                    TreeOp::Insert(key) => {
                        let inserted = tree.insert(*key).unwrap();
                        prop_assert_eq!(inserted, model.insert(*key), "insert({})", key);
                    }
                    TreeOp::Remove(key) => {
                        let removed = tree.remove(*key);
                        if model.remove(key) {
                            prop_assert_eq!(removed, Ok(*key), "remove({})", key);
                        } else {
                            prop_assert_eq!(removed, Err(Error::KeyNotFound), "remove({})", key);
                        }
                    }
                    TreeOp::Contains(key) => {
                        prop_assert_eq!(tree.contains(key), model.contains(key), "contains({})", key);
                        let found = tree.search(*key).unwrap();
                        prop_assert_eq!(found.is_some(), model.contains(key), "search({})", key);
                        if let Some(node) = found {
                            prop_assert!(node.keys().contains(key));
                        }
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
            }

            let keys: Vec<i64> = tree.traverse_inorder().copied().collect();
            let expected: Vec<i64> = model.iter().copied().collect();
            prop_assert_eq!(keys, expected);
        }

        /// Inserting any permutation of a key set yields the same sorted
        /// traversal.
        #[test]
        fn traversal_is_permutation_invariant(
            order in 3usize..=17,
            keys in prop::collection::hash_set(-500i64..500i64, 1..200),
            seed in any::<u64>(),
        ) {
            let mut shuffled: Vec<i64> = keys.iter().copied().collect();
            // Fisher-Yates with a splitmix-style step; proptest drives the seed.
            let mut state = seed | 1;
            for i in (1..shuffled.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state >> 33) as usize % (i + 1);
                shuffled.swap(i, j);
            }

            let mut tree: BTree<i64> = BTree::new(order);
            for key in &shuffled {
                prop_assert!(tree.insert(*key).unwrap());
            }
            tree.validate_invariants();

            let mut expected: Vec<i64> = keys.into_iter().collect();
            expected.sort_unstable();
            let traversed: Vec<i64> = tree.traverse_inorder().copied().collect();
            prop_assert_eq!(traversed, expected);
        }
    }
}
