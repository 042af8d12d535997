//! Node arena and the link plumbing shared by [`BstMap`](crate::BstMap) and
//! [`AvlMap`](crate::AvlMap).
//!
//! Nodes are stored in a `Vec` of slots and refer to each other by slot
//! index.  A node knows its parent, so predecessor and successor can be found
//! by walking links instead of keeping a stack of ancestors.
use std::borrow::Borrow;
use std::cmp::Ordering::*;
use std::fmt::{Debug, Formatter};
use std::iter::FusedIterator;
use std::mem::swap;
use std::ops::{Index, IndexMut};

use log::trace;

pub(crate) type Link = Option<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left,
    Right,
}

impl Dir {
    pub(crate) fn opposite(self) -> Dir {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    // the change in balance factor when the subtree on this side grows
    pub(crate) fn sign(self) -> i8 {
        match self {
            Dir::Left => -1,
            Dir::Right => 1,
        }
    }
}

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    // height(right) - height(left); unused (always 0) in an unbalanced tree
    pub(crate) bal: i8,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl<K, V> Index<Dir> for Node<K, V> {
    type Output = Link;

    fn index(&self, dir: Dir) -> &Link {
        match dir {
            Dir::Left => &self.left,
            Dir::Right => &self.right,
        }
    }
}

impl<K, V> IndexMut<Dir> for Node<K, V> {
    fn index_mut(&mut self, dir: Dir) -> &mut Link {
        match dir {
            Dir::Left => &mut self.left,
            Dir::Right => &mut self.right,
        }
    }
}

/// A node removed from the tree along with where it used to hang.
pub(crate) struct Unlinked<K, V> {
    pub(crate) node: Node<K, V>,
    pub(crate) parent: Link,
    pub(crate) side: Option<Dir>,
}

#[derive(Clone)]
pub(crate) struct RawTree<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    root: Link,
    len: usize,
}

impl<K, V> RawTree<K, V> {
    pub(crate) fn new() -> Self {
        RawTree {
            slots: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        RawTree {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn root(&self) -> Link {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: usize) {
        trace!("root moves to slot {root}");
        self.root = Some(root);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    pub(crate) fn node(&self, i: usize) -> &Node<K, V> {
        match self.slots.get(i) {
            Some(Some(n)) => n,
            _ => panic!("slot {i} does not hold a live node"),
        }
    }

    pub(crate) fn node_mut(&mut self, i: usize) -> &mut Node<K, V> {
        match self.slots.get_mut(i) {
            Some(Some(n)) => n,
            _ => panic!("slot {i} does not hold a live node"),
        }
    }

    pub(crate) fn parent(&self, i: usize) -> Link {
        self.node(i).parent
    }

    // Which side of its parent does i hang from?  None for the root.
    pub(crate) fn side_of(&self, i: usize) -> Option<Dir> {
        self.node(i).parent.map(|p| {
            if self.node(p).left == Some(i) {
                Dir::Left
            } else {
                Dir::Right
            }
        })
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        self.len += 1;
        match self.free.pop() {
            Some(i) => {
                self.slots[i] = Some(node);
                i
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, i: usize) -> Node<K, V> {
        match self.slots.get_mut(i).and_then(Option::take) {
            Some(n) => {
                self.free.push(i);
                self.len -= 1;
                n
            }
            None => panic!("attempt to release vacant slot {i}"),
        }
    }

    /// Allocates a new leaf and hangs it from `parent` on side `dir`.  With no
    /// parent, the leaf becomes the root (of what must be an empty tree).
    pub(crate) fn link_leaf(
        &mut self,
        parent: Link,
        dir: Dir,
        key: K,
        val: V,
    ) -> usize {
        let i = self.alloc(Node {
            key,
            val,
            bal: 0,
            parent,
            left: None,
            right: None,
        });

        match parent {
            None => self.root = Some(i),
            Some(p) => self.node_mut(p)[dir] = Some(i),
        }

        i
    }

    // Puts `new` into the slot of old's parent that holds old.
    fn transplant(&mut self, old: usize, new: Link) {
        let parent = self.node(old).parent;
        match parent {
            None => self.root = new,
            Some(p) => {
                let pn = self.node_mut(p);
                if pn.left == Some(old) {
                    pn.left = new;
                } else {
                    pn.right = new;
                }
            }
        }

        if let Some(c) = new {
            self.node_mut(c).parent = parent;
        }
    }

    // Exchanges the entries of two distinct nodes, leaving links and balance
    // factors where they are.
    fn swap_entries(&mut self, a: usize, b: usize) {
        assert_ne!(a, b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (head[lo].as_mut(), tail[0].as_mut()) {
            (Some(x), Some(y)) => {
                swap(&mut x.key, &mut y.key);
                swap(&mut x.val, &mut y.val);
            }
            _ => panic!("attempt to swap entries of a vacant slot"),
        }
    }

    /// Removes the entry held by `target` from the tree.
    ///
    /// A node with two children trades entries with its in-order
    /// predecessor, which has at most one child, and that node is removed
    /// instead.  The removed node's only child (if any) takes its place.  The
    /// returned record names the node whose subtree lost a level and which of
    /// its sides shrank.
    pub(crate) fn unlink(&mut self, target: usize) -> Unlinked<K, V> {
        let mut target = target;
        let n = self.node(target);
        if let (Some(l), Some(_)) = (n.left, n.right) {
            let pred = self.extreme_from(l, Dir::Right);
            self.swap_entries(target, pred);
            target = pred;
        }

        let n = self.node(target);
        let parent = n.parent;
        let child = n.left.or(n.right);
        let side = self.side_of(target);
        self.transplant(target, child);

        Unlinked {
            node: self.release(target),
            parent,
            side,
        }
    }

    /// Promotes the child of `x` on side `dir` into x's place.  Promoting the
    /// right child is a left rotation, promoting the left child a right one.
    ///
    /// The child's inner subtree moves across to `x`, and the slot in x's old
    /// parent is re-pointed at the child.  Balance factors and the tree's root
    /// link are left to the caller.  Without a child on `dir`, nothing
    /// happens.
    pub(crate) fn rotate(&mut self, x: usize, dir: Dir) {
        let Some(c) = self.node(x)[dir] else {
            return;
        };
        trace!("rotating slot {c} above slot {x}");

        let parent = self.node(x).parent;
        let inner = self.node(c)[dir.opposite()];

        self.node_mut(x)[dir] = inner;
        if let Some(i) = inner {
            self.node_mut(i).parent = Some(x);
        }

        self.node_mut(c)[dir.opposite()] = Some(x);
        self.node_mut(x).parent = Some(c);

        self.node_mut(c).parent = parent;
        if let Some(p) = parent {
            let pn = self.node_mut(p);
            if pn.left == Some(x) {
                pn.left = Some(c);
            } else {
                pn.right = Some(c);
            }
        }
    }

    // The furthest node reachable from i by following dir links.
    pub(crate) fn extreme_from(&self, mut i: usize, dir: Dir) -> usize {
        while let Some(c) = self.node(i)[dir] {
            i = c;
        }
        i
    }

    pub(crate) fn first(&self) -> Link {
        self.root.map(|r| self.extreme_from(r, Dir::Left))
    }

    pub(crate) fn last(&self) -> Link {
        self.root.map(|r| self.extreme_from(r, Dir::Right))
    }

    // The in-order neighbor of i on side dir: the predecessor for Left, the
    // successor for Right.
    fn neighbor(&self, i: usize, dir: Dir) -> Link {
        if let Some(c) = self.node(i)[dir] {
            return Some(self.extreme_from(c, dir.opposite()));
        }

        let mut curr = i;
        while let Some(p) = self.node(curr).parent {
            if self.node(p)[dir.opposite()] == Some(curr) {
                return Some(p);
            }
            curr = p;
        }

        None
    }

    pub(crate) fn predecessor(&self, i: usize) -> Link {
        self.neighbor(i, Dir::Left)
    }

    pub(crate) fn successor(&self, i: usize) -> Link {
        self.neighbor(i, Dir::Right)
    }

    fn in_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.len);
        let mut curr = self.first();
        while let Some(i) = curr {
            order.push(i);
            curr = self.successor(i);
        }
        order
    }

    // Height of every live node's subtree, indexed by slot.  Computed
    // post-order with an explicit stack so long unbalanced chains are fine.
    fn subtree_heights(&self) -> Vec<usize> {
        let mut hts = vec![0; self.slots.len()];
        let mut work: Vec<(usize, bool)> =
            self.root.into_iter().map(|r| (r, false)).collect();

        while let Some((i, children_done)) = work.pop() {
            let n = self.node(i);
            if children_done {
                let lf = n.left.map_or(0, |c| hts[c]);
                let rt = n.right.map_or(0, |c| hts[c]);
                hts[i] = lf.max(rt) + 1;
            } else {
                work.push((i, true));
                work.extend(
                    [n.left, n.right].into_iter().flatten().map(|c| (c, false)),
                );
            }
        }

        hts
    }

    pub(crate) fn height(&self) -> usize {
        self.root.map_or(0, |r| self.subtree_heights()[r])
    }

    // Re-derives the height-balance property from the links alone.
    pub(crate) fn is_balanced(&self) -> bool {
        let hts = self.subtree_heights();
        let ht = |l: Link| l.map_or(0, |c| hts[c]);
        self.slots
            .iter()
            .flatten()
            .all(|n| ht(n.left).abs_diff(ht(n.right)) <= 1)
    }

    pub(crate) fn root_node(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|idx| NodeRef { tree: self, idx })
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            front: self.first(),
            back: self.last(),
            len: self.len,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order().into_iter();
        IterMut {
            order,
            slots: self.slots.iter_mut().map(Option::as_mut).collect(),
        }
    }

    pub(crate) fn into_iter(self) -> IntoIter<K, V> {
        let order = self.in_order().into_iter();
        IntoIter {
            order,
            slots: self.slots,
        }
    }
}

impl<K: Ord, V> RawTree<K, V> {
    /// Descends from the root looking for `key`.  A hit returns the node; a
    /// miss returns the empty child slot where the key belongs.
    pub(crate) fn search<Q>(&self, key: &Q) -> Result<usize, (Link, Dir)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut parent = None;
        let mut dir = Dir::Left;
        let mut curr = self.root;
        while let Some(i) = curr {
            let n = self.node(i);
            dir = match key.cmp(n.key.borrow()) {
                Less => Dir::Left,
                Equal => return Ok(i),
                Greater => Dir::Right,
            };
            parent = Some(i);
            curr = n[dir];
        }

        Err((parent, dir))
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).ok()
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|i| {
            let n = self.node(i);
            (&n.key, &n.val)
        })
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let i = self.find(key)?;
        Some(&mut self.node_mut(i).val)
    }

    // Walks every node checking parent back-links, key order, and node count.
    // With `balanced`, also checks each stored balance factor against the
    // recomputed heights and that it lies in -1..=1.
    #[cfg(test)]
    pub(crate) fn chk(&self, balanced: bool) -> usize {
        if let Some(r) = self.root {
            assert_eq!(self.node(r).parent, None);
        }

        let hts = self.subtree_heights();
        let ht = |l: Link| l.map_or(0, |c| hts[c]) as isize;

        let mut count = 0;
        let mut prev: Option<&K> = None;
        let mut curr = self.first();
        while let Some(i) = curr {
            let n = self.node(i);
            assert!(prev.iter().all(|&k| k < &n.key));

            for c in [n.left, n.right].into_iter().flatten() {
                assert_eq!(self.node(c).parent, Some(i));
            }

            if balanced {
                assert_eq!(n.bal as isize, ht(n.right) - ht(n.left));
                assert!((-1..=1).contains(&n.bal));
            }

            prev = Some(&n.key);
            count += 1;
            curr = self.successor(i);
        }

        assert_eq!(count, self.len);
        assert_eq!(self.slots.iter().flatten().count(), self.len);
        assert_eq!(self.slots.len(), self.len + self.free.len());
        count
    }
}

/// A read-only handle on one node of a tree.
///
/// Handles expose the tree's shape (parent and child links, balance factors)
/// for code that renders or inspects trees.  A handle borrows the tree, so
/// the tree cannot change while any handle is alive.
pub struct NodeRef<'a, K, V> {
    tree: &'a RawTree<K, V>,
    idx: usize,
}

impl<'a, K, V> Clone for NodeRef<'a, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K, V> Copy for NodeRef<'a, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    fn at(&self, link: Link) -> Option<NodeRef<'a, K, V>> {
        link.map(|idx| NodeRef {
            tree: self.tree,
            idx,
        })
    }

    /// The node's key.
    pub fn key(&self) -> &'a K {
        &self.tree.node(self.idx).key
    }

    /// The node's value.
    pub fn value(&self) -> &'a V {
        &self.tree.node(self.idx).val
    }

    /// The stored balance factor, height(right) - height(left).  Always 0 for
    /// nodes of an unbalanced [`BstMap`](crate::BstMap).
    pub fn balance(&self) -> i8 {
        self.tree.node(self.idx).bal
    }

    /// The node's parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, K, V>> {
        self.at(self.tree.node(self.idx).parent)
    }

    /// The root of the left subtree.
    pub fn left(&self) -> Option<NodeRef<'a, K, V>> {
        self.at(self.tree.node(self.idx).left)
    }

    /// The root of the right subtree.
    pub fn right(&self) -> Option<NodeRef<'a, K, V>> {
        self.at(self.tree.node(self.idx).right)
    }
}

impl<'a, K, V> PartialEq for NodeRef<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl<'a, K, V> Eq for NodeRef<'a, K, V> {}

impl<'a, K: Debug, V: Debug> Debug for NodeRef<'a, K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "(bal: {} {{{:?}: {:?}}} ",
            self.balance(),
            self.key(),
            self.value()
        ))?;

        match self.left() {
            None => f.write_str(".")?,
            Some(lf) => lf.fmt(f)?,
        }

        f.write_str(" ")?;

        match self.right() {
            None => f.write_str(".")?,
            Some(rt) => rt.fmt(f)?,
        }

        f.write_str(")")
    }
}

/// An iterator over the entries of a map, sorted by key.
pub struct Iter<'a, K, V> {
    tree: &'a RawTree<K, V>,
    front: Link,
    back: Link,
    len: usize,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let tree = self.tree;
        let i = self.front?;
        self.len -= 1;
        self.front = tree.successor(i);
        let n = tree.node(i);
        Some((&n.key, &n.val))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let tree = self.tree;
        let i = self.back?;
        self.len -= 1;
        self.back = tree.predecessor(i);
        let n = tree.node(i);
        Some((&n.key, &n.val))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// An iterator over the entries of a map, sorted by key, with mutable
/// references to the values.
pub struct IterMut<'a, K, V> {
    // slot indices in key order
    order: std::vec::IntoIter<usize>,
    slots: Vec<Option<&'a mut Node<K, V>>>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    fn take(&mut self, i: usize) -> (&'a K, &'a mut V) {
        match self.slots[i].take() {
            Some(n) => (&n.key, &mut n.val),
            None => panic!("slot {i} visited twice"),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.order.next()?;
        Some(self.take(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let i = self.order.next_back()?;
        Some(self.take(i))
    }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterMut<'a, K, V> {}

/// An owning iterator over the entries of a map, sorted by key.
pub struct IntoIter<K, V> {
    order: std::vec::IntoIter<usize>,
    slots: Vec<Option<Node<K, V>>>,
}

impl<K, V> IntoIter<K, V> {
    fn take(&mut self, i: usize) -> (K, V) {
        match self.slots[i].take() {
            Some(n) => (n.key, n.val),
            None => panic!("slot {i} visited twice"),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.order.next()?;
        Some(self.take(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let i = self.order.next_back()?;
        Some(self.take(i))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
