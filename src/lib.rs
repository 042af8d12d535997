//! # Ordered maps on parent-linked binary search trees
//!
//! `avl-bst` provides [`AvlMap`], an ordered map kept height-balanced as an
//! [AVL tree](https://en.wikipedia.org/wiki/AVL_tree), along with [`AvlSet`]
//! and an unbalanced baseline, [`BstMap`].  All three store their nodes in a
//! slot arena where each node links to its parent and children by index, so
//! in-order neighbors are found by walking links.
//!
//! Lookups, insertions and removals on an `AvlMap` are O(log n): every
//! update re-establishes the balance of each node on the path it touched
//! before returning.
//!
//! ```
//! use avl_bst::AvlMap;
//!
//! let mut m: AvlMap<u32, &str> = AvlMap::new();
//! for (k, v) in [(3, "c"), (1, "a"), (2, "b")] {
//!     m.insert(k, v);
//! }
//! assert_eq!(m.root_node().map(|n| *n.key()), Some(2));
//! assert!(m.is_balanced());
//! assert_eq!(m.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 2, 3]);
//! ```

mod raw;
pub use raw::{IntoIter, Iter, IterMut, NodeRef};

mod avl;
pub use avl::AvlMap;
pub use avl::AvlSet;

mod bst;
pub use bst::BstMap;

mod error;
pub use error::{Error, Result};
