use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::mem::replace;

use log::debug;

use crate::error::{Error, Result};
use crate::raw::{IntoIter, Iter, IterMut, NodeRef, RawTree};

/// An ordered map backed by a plain, unbalanced binary search tree.
///
/// `BstMap` shares its node layout and link plumbing with
/// [`AvlMap`](crate::AvlMap) but never rotates, so its height depends on the
/// order of insertion: sorted input degrades it to a linked list.  It serves
/// as a baseline for the balanced map.
#[derive(Clone)]
pub struct BstMap<K, V> {
    raw: RawTree<K, V>,
}

impl<K, V> BstMap<K, V> {
    /// Creates a new, empty map.
    pub fn new() -> Self {
        BstMap {
            raw: RawTree::new(),
        }
    }

    /// Creates an empty map whose node arena can hold `capacity` entries
    /// without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        BstMap {
            raw: RawTree::with_capacity(capacity),
        }
    }

    /// Drops all elements from the map.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            debug!("clearing BstMap of {} entries", self.len());
        }
        self.raw.clear();
    }

    /// Returns true if self contains no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the number of entries in self.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Creates an iterator over the map entries, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.raw.iter()
    }

    /// Creates an iterator over the map entries, sorted by key, with mutable
    /// references to the values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        self.raw.iter_mut()
    }

    /// The keys of the map, in sorted order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|p| p.0)
    }

    /// The values of the map, ordered by key.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|p| p.1)
    }

    /// Mutable references to the values of the map, ordered by key.
    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> {
        self.iter_mut().map(|p| p.1)
    }

    /// Returns the key-value pair for the least key in the map.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next()
    }

    /// Returns the key-value pair for the greatest key in the map.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.iter().next_back()
    }

    /// Returns the height of the tree.  An empty map has height 0.
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Reports whether every node's subtrees differ in height by at most
    /// one.  Nothing keeps a `BstMap` balanced, so this depends on the order
    /// of insertions and removals.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::BstMap;
    ///
    /// let m: BstMap<_, _> = [(2, ()), (1, ()), (3, ())].into();
    /// assert!(m.is_balanced());
    ///
    /// let m: BstMap<_, _> = (0..3).map(|k| (k, ())).collect();
    /// assert!(!m.is_balanced());
    /// assert_eq!(m.height(), 3);
    /// ```
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced()
    }

    /// Returns a read-only handle on the root node.
    pub fn root_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.raw.root_node()
    }
}

impl<K: Ord, V> BstMap<K, V> {
    /// Inserts a key-value pair and returns the value previously mapped to
    /// the key, if any.  A new key always lands in a new leaf.
    pub fn insert(&mut self, key: K, val: V) -> Option<V> {
        match self.raw.search(&key) {
            Ok(i) => Some(replace(&mut self.raw.node_mut(i).val, val)),
            Err((parent, dir)) => {
                self.raw.link_leaf(parent, dir, key, val);
                None
            }
        }
    }

    /// Removes a key from the map and returns its value.  A node with two
    /// children is replaced by its in-order predecessor.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::BstMap;
    ///
    /// let mut m = BstMap::from([(2, 'b'), (1, 'a'), (3, 'c')]);
    /// assert_eq!(m.remove(&2), Some('b'));
    /// assert_eq!(m.root_node().map(|n| *n.key()), Some(1));
    /// assert_eq!(m.remove(&2), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|e| e.1)
    }

    /// Removes a key from the map and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.raw.find(key)?;
        let node = self.raw.unlink(target).node;
        Some((node.key, node.val))
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
    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.raw.get_mut(k)
    }

    /// Returns the value associated with k, or [`Error::KeyNotFound`].
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
}

impl<K: Debug, V: Debug> Debug for BstMap<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // a degenerate tree is too deep to print recursively
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for BstMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for BstMap<K, V> {}

impl<K, Q, V> std::ops::Index<&Q> for BstMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, index: &Q) -> &Self::Output {
        match self.get(index) {
            Some(v) => v,
            None => panic!("Key not found in BstMap"),
        }
    }
}

impl<K, V> Default for BstMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Extend<(K, V)> for BstMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for BstMap<K, V> {
    fn from(vs: [(K, V); N]) -> Self {
        BstMap::from_iter(vs)
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BstMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = BstMap::new();
        m.extend(iter);
        m
    }
}

impl<K, V> IntoIterator for BstMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.raw.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a BstMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut BstMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
