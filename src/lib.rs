//! An ordered, in-memory B-tree index with a caller-chosen order.
//!
//! [`BTree`] stores unique, totally ordered keys in a balanced multi-way
//! search tree and supports search, insertion, removal, and lazy in-order
//! traversal, all in logarithmic depth with every leaf at the same level.
//! Both odd and even orders are supported; the order fixes the split
//! midpoint and the underflow thresholds.
//!
//! # Example
//!
//! ```
//! use abtree::BTree;
//!
//! let mut tree = BTree::new(5);
//! for key in [41, 7, 19, 3, 28] {
//!     tree.insert(key)?;
//! }
//!
//! assert!(tree.search(19)?.is_some());
//! assert_eq!(tree.remove(7)?, 7);
//!
//! let keys: Vec<i32> = tree.traverse_inorder().copied().collect();
//! assert_eq!(keys, vec![3, 19, 28, 41]);
//! # Ok::<(), abtree::Error>(())
//! ```
//!
//! Keys are plain `Ord` values and are never serialized. An absent key
//! (`None`) is rejected by every keyed operation with
//! [`Error::InvalidKey`]; removing a key the tree does not hold fails with
//! [`Error::KeyNotFound`]. Searching for an absent key is not an error.
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by handle; each slot
//! is exclusively owned by its parent (or by the tree, for the root), so
//! there are no back-references and no cycles. Mutating operations record
//! the root-to-leaf descent as an explicit path and walk it backward to
//! split, merge, or redistribute, which is why nodes carry no parent
//! pointers.
//!
//! The tree is single-threaded and performs no internal locking; wrap it in
//! an external mutex to share it across threads.

#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]

mod btree;
mod error;
mod raw;

pub use btree::{BTree, InorderKeys, NodeRef};
pub use error::{Error, Result};
