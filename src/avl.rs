#![warn(missing_docs)]
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::mem::replace;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::raw::{Dir, IntoIter, Iter, IterMut, NodeRef, RawTree, Unlinked};

mod avl_set;
pub use avl_set::AvlSet;

#[cfg(test)]
macro_rules! chk_map {
    ( $x:expr ) => {{
        $x.raw.chk(true);
    }};
}

#[cfg(not(test))]
macro_rules! chk_map {
    ( $x:expr ) => {{}};
}

/// A map from keys to values sorted by key.
///
/// We aim for the API to be compatible with the (stable) API of
/// [`std::collections::BTreeMap`].
///
/// Internally, the map is an [AVL tree](https://en.wikipedia.org/wiki/AVL_tree)
/// whose nodes live in a single arena and link to their parents as well as
/// their children.  Every node records its balance factor, the height of its
/// right subtree minus the height of its left subtree, and insertions and
/// removals restore `-1 <= balance <= 1` at every node before they return.
/// Lookups, insertions and removals are O(log n).
#[derive(Clone)]
pub struct AvlMap<K, V> {
    raw: RawTree<K, V>,
}

// The balances of the upper and lower nodes of a double rotation, indexed by
// the balance of the pivot (the node that ends up on top) before the rotation.
// `s` is the sign of the side the lower node hangs from.
fn zig_zag_balances(pivot_bal: i8, s: i8) -> (i8, i8) {
    if pivot_bal == s {
        (-s, 0)
    } else if pivot_bal == -s {
        (0, s)
    } else {
        (0, 0)
    }
}

impl<K, V> AvlMap<K, V> {
    /// Creates a new, empty map.
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    /// let m: AvlMap<usize, usize> = AvlMap::new();
    /// assert!(m.is_empty());
    /// ```
    pub fn new() -> Self {
        AvlMap {
            raw: RawTree::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries before the node
    /// arena has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        AvlMap {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Drops all elements from the map.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            debug!("clearing AvlMap of {} entries", self.len());
        }
        self.raw.clear();
    }

    /// Returns true if self contains no entries, false otherwise.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of entries in self.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Creates an iterator over the map entries, sorted by key.
    ///
    /// The iterator steps from node to node along parent and child links, so
    /// it needs no extra storage.  It can be consumed from either end.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let m = AvlMap::from([(0,1), (1,2), (2, 3)]);
    /// for (i, (k, v)) in m.iter().enumerate() {
    ///     assert_eq!(&i, k);
    ///     assert_eq!(&(i+1), v);
    /// }
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.raw.iter()
    }

    /// Returns an iterator of the map's entries, sorted by key, with a mutable
    /// reference to each value.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let mut m = AvlMap::from([(0,0), (1,1), (2,2)]);
    /// for (k, v) in m.iter_mut() {
    ///     *v += k;
    /// }
    /// assert_eq!(m.get(&1), Some(&2));
    /// assert_eq!(m.get(&2), Some(&4));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.raw.iter_mut()
    }

    /// Produces an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|p| p.0)
    }

    /// Produces an iterator over the values of the map, ordered by their
    /// associated keys.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let m = AvlMap::from([(0,0), (1,1), (2,2)]);
    /// let sum_values: u32 = m.values().sum();
    /// assert_eq!(sum_values, 3);
    /// ```
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|p| p.1)
    }

    /// Returns an iterator of mutable references to the map's values, ordered
    /// by their associated keys.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> {
        self.iter_mut().map(|p| p.1)
    }

    /// Returns the key-value pair for the least key in the map
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let fmap = AvlMap::from([(2,0), (1,0)]);
    /// assert_eq!(fmap.first_key_value(), Some((&1, &0)));
    /// ```
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Returns the key-value pair for the greatest key in the map
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }

    /// Returns the height of the tree, recomputed from its links.  An empty
    /// map has height 0.
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Recomputes subtree heights from scratch and reports whether every
    /// node's subtrees differ in height by at most one.
    ///
    /// The stored balance factors are not consulted, so this is an
    /// independent check of the tree's shape.  It always holds for an
    /// `AvlMap`; it is offered as a diagnostic.
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced()
    }

    /// Returns a read-only handle on the root node, for code that inspects or
    /// renders the tree's shape.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let m: AvlMap<_, _> = (1..=3).map(|k| (k, ())).collect();
    /// let root = m.root_node().unwrap();
    /// assert_eq!(root.key(), &2);
    /// assert_eq!(root.left().map(|n| *n.key()), Some(1));
    /// assert_eq!(root.balance(), 0);
    /// ```
    pub fn root_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.raw.root_node()
    }

    // After a rotation at `old_top`, `new_top` heads the rotated subtree.
    fn replace_root(&mut self, old_top: usize, new_top: usize) {
        if self.raw.root() == Some(old_top) {
            self.raw.set_root(new_top);
        }
    }

    // Walks up from `parent`, whose subtree just grew one level taller on the
    // side holding `node`.  Stops as soon as a node absorbs the growth or a
    // rotation restores the subtree's former height.
    fn insert_fix(&mut self, mut parent: usize, mut node: usize) {
        while let Some(grand) = self.raw.parent(parent) {
            let side = if self.raw.node(grand).left == Some(parent) {
                Dir::Left
            } else {
                Dir::Right
            };

            let g = self.raw.node_mut(grand);
            g.bal += side.sign();
            let bal = g.bal;
            match bal {
                0 => {
                    trace!("insert fixup absorbed at slot {grand}");
                    return;
                }

                -1 | 1 => {
                    node = parent;
                    parent = grand;
                }

                _ => {
                    self.rebalance_insert(grand, parent, node, side);
                    return;
                }
            }
        }
    }

    // `grand` leans two levels toward `side`, where `parent` hangs; `node` is
    // the child of `parent` that grew.
    fn rebalance_insert(
        &mut self,
        grand: usize,
        parent: usize,
        node: usize,
        side: Dir,
    ) {
        let top = if self.raw.side_of(node) == Some(side) {
            // zig-zig
            self.raw.rotate(grand, side);
            self.raw.node_mut(grand).bal = 0;
            self.raw.node_mut(parent).bal = 0;
            parent
        } else {
            // zig-zag
            let (grand_bal, parent_bal) =
                zig_zag_balances(self.raw.node(node).bal, side.sign());
            self.raw.rotate(parent, side.opposite());
            self.raw.rotate(grand, side);
            self.raw.node_mut(grand).bal = grand_bal;
            self.raw.node_mut(parent).bal = parent_bal;
            self.raw.node_mut(node).bal = 0;
            node
        };

        trace!("insert fixup rotated slot {top} to the top");
        self.replace_root(grand, top);
    }

    // Walks up from `at`, whose balance moves by `diff` because one of its
    // subtrees just lost a level.  Unlike insertion, a rotation may leave the
    // rotated subtree shorter, so the walk can continue to the root.
    fn remove_fix(&mut self, mut at: Option<usize>, mut diff: i8) {
        while let Some(n) = at {
            let parent = self.raw.parent(n);
            let ndiff = self.raw.side_of(n).map_or(0, |d| -d.sign());

            let b = self.raw.node(n).bal + diff;
            match b {
                -1 | 1 => {
                    self.raw.node_mut(n).bal = b;
                    trace!("remove fixup absorbed at slot {n}");
                    return;
                }

                0 => self.raw.node_mut(n).bal = 0,

                _ => {
                    if !self.rebalance_remove(n, b) {
                        trace!("remove fixup kept height at slot {n}");
                        return;
                    }
                }
            }

            at = parent;
            diff = ndiff;
        }
    }

    // Rotates the subtree at `n`, whose balance would be `b` (±2).  Returns
    // whether the rotated subtree is shorter than it was before the removal.
    fn rebalance_remove(&mut self, n: usize, b: i8) -> bool {
        let heavy = if b < 0 { Dir::Left } else { Dir::Right };
        let s = heavy.sign();

        let Some(child) = self.raw.node(n)[heavy] else {
            panic!("slot {n} is out of balance toward a missing child");
        };
        let child_bal = self.raw.node(child).bal;

        if child_bal == -s {
            // zig-zag
            let Some(grandchild) = self.raw.node(child)[heavy.opposite()] else {
                panic!("slot {child} leans toward a missing child");
            };
            let (n_bal, child_bal) =
                zig_zag_balances(self.raw.node(grandchild).bal, s);
            self.raw.rotate(child, heavy.opposite());
            self.raw.rotate(n, heavy);
            self.raw.node_mut(n).bal = n_bal;
            self.raw.node_mut(child).bal = child_bal;
            self.raw.node_mut(grandchild).bal = 0;
            self.replace_root(n, grandchild);
            true
        } else {
            // zig-zig
            self.raw.rotate(n, heavy);
            self.replace_root(n, child);
            if child_bal == s {
                self.raw.node_mut(n).bal = 0;
                self.raw.node_mut(child).bal = 0;
                true
            } else {
                // the child was level, so the subtree keeps its height
                self.raw.node_mut(n).bal = s;
                self.raw.node_mut(child).bal = -s;
                false
            }
        }
    }

    fn remove_at(&mut self, target: usize) -> (K, V) {
        let Unlinked { node, parent, side } = self.raw.unlink(target);
        if let Some(side) = side {
            self.remove_fix(parent, -side.sign());
        }
        (node.key, node.val)
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Inserts a key-value pair in the map and returns the value previously
    /// mapped to the key, if any.
    ///
    /// Re-inserting an existing key overwrites its value in place and leaves
    /// the tree's shape untouched.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let mut fmap = AvlMap::new();
    /// assert_eq!(fmap.insert(0, "a"), None);
    /// assert_eq!(fmap.insert(0, "b"), Some("a"));
    /// assert_eq!(fmap.get(&0), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        let (parent, dir) = match self.raw.search(&key) {
            Ok(i) => return Some(replace(&mut self.raw.node_mut(i).val, val)),
            Err(slot) => slot,
        };

        let leaf = self.raw.link_leaf(parent, dir, key, val);
        if let Some(p) = parent {
            let pn = self.raw.node_mut(p);
            pn.bal += dir.sign();
            if pn.bal != 0 {
                self.insert_fix(p, leaf);
            }
        }

        chk_map!(self);
        None
    }

    /// Removes a key from a map and returns the unmapped value.  Removing a
    /// key that is not present does nothing.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let mut fmap = AvlMap::new();
    /// fmap.insert(1, 2);
    /// fmap.insert(2, 3);
    /// assert_eq!(fmap.remove(&2), Some(3));
    /// assert_eq!(fmap.remove(&2), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|e| e.1)
    }

    /// Removes a key from a map and returns the removed key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.raw.find(key)?;
        let kv = self.remove_at(target);
        chk_map!(self);
        Some(kv)
    }

    /// Removes and returns the entry with the least key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.raw.first()?;
        let kv = self.remove_at(first);
        chk_map!(self);
        Some(kv)
    }

    /// Removes and returns the entry with the greatest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.raw.last()?;
        let kv = self.remove_at(last);
        chk_map!(self);
        Some(kv)
    }

    /// Tests if self contains an entry for the given key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.find(key).is_some()
    }

    /// Returns a reference to the value associated with k.
    ///
    /// # Example
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let mut fmap = AvlMap::new();
    /// fmap.insert(0, 100);
    ///
    /// assert_eq!(fmap.get(&0), Some(&100));
    /// assert_eq!(fmap.get(&1), None);
    /// ```
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.get_key_value(k).map(|e| e.1)
    }

    /// Returns the stored key and the value associated with k.
    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.get_key_value(k)
    }

    /// Returns a mutable reference to the value associated with k.
    ///
    /// # Example
    /// ```
    /// use avl_bst::AvlMap;
    ///
    /// let mut fmap = AvlMap::new();
    /// fmap.insert(1, 7);
    ///
    /// *fmap.get_mut(&1).unwrap() = 2;
    /// assert_eq!(fmap.get(&1), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.get_mut(k)
    }

    /// Returns the value associated with k, or [`Error::KeyNotFound`].
    ///
    /// # Example
    /// ```
    /// use avl_bst::{AvlMap, Error};
    ///
    /// let fmap = AvlMap::from([(1, 'a')]);
    /// assert_eq!(fmap.try_get(&1), Ok(&'a'));
    /// assert_eq!(fmap.try_get(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn try_get<Q>(&self, k: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(k).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with k, or
    /// [`Error::KeyNotFound`].
    pub fn try_get_mut<Q>(&mut self, k: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(k).ok_or(Error::KeyNotFound)
    }

    #[cfg(test)]
    fn chk(&self) {
        self.raw.chk(true);
    }
}

impl<K: Debug, V: Debug> Debug for AvlMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.root_node() {
            None => f.write_str("AvlMap(EMPTY)"),
            Some(root) => {
                // use NodeRef's Debug formatter
                f.write_fmt(format_args!("AvlMap(#{}, {:?})", self.len(), root))
            }
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for AvlMap<K, V> {}

impl<K, Q, V> std::ops::Index<&Q> for AvlMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, index: &Q) -> &Self::Output {
        match self.get(index) {
            Some(v) => v,
            None => panic!("Key not found in AvlMap"),
        }
    }
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(vs: [(K, V); N]) -> Self {
        AvlMap::from_iter(vs)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = AvlMap::new();
        m.extend(iter);
        m
    }
}

impl<K, V> IntoIterator for AvlMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a AvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut AvlMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
