use super::AvlMap;
use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};

/// A sorted set of values.
///
/// The implementation is mostly a thin wrapper around [`AvlMap`].
#[derive(Clone, PartialEq, Eq)]
pub struct AvlSet<T> {
    map: AvlMap<T, ()>,
}

impl<T> AvlSet<T> {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        AvlSet { map: AvlMap::new() }
    }

    /// Removes all the entries from self.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the least value in the set.
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    /// Returns the greatest value in the set.
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    /// Returns true if self has no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the number of elements in self.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns an iterator over the values in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.map.keys()
    }

    /// Returns the height of the underlying tree.
    pub fn height(&self) -> usize {
        self.map.height()
    }

    /// Recomputes whether the underlying tree is height-balanced.
    pub fn is_balanced(&self) -> bool {
        self.map.is_balanced()
    }
}

impl<T: Ord> AvlSet<T> {
    /// Tests if self contains the given value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the element matching value, if it exists
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.get_key_value(value).map(|(k, _)| k)
    }

    /// Inserts the given value and returns true if self did not already have
    /// the value and returns false otherwise.
    ///
    /// # Examples
    /// ```
    /// use avl_bst::AvlSet;
    ///
    /// let mut s = AvlSet::new();
    /// assert!(s.insert(3));
    /// assert!(!s.insert(3));
    /// assert_eq!(s.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Removes the given value and returns true if it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element equal to value, if any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.map.remove_entry(value).map(|(k, _)| k)
    }

    /// Removes and returns the least element.
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, _)| k)
    }

    /// Removes and returns the greatest element.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, _)| k)
    }
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for AvlSet<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> Extend<T> for AvlSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut s = AvlSet::new();
        s.extend(iter);
        s
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlSet<T> {
    fn from(vs: [T; N]) -> Self {
        AvlSet::from_iter(vs)
    }
}
