use avl_bst::NodeRef;
use proptest::prelude::*;

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

// Walks the tree under `root` and checks key order, parent back-links, and
// that each stored balance factor equals height(right) - height(left) and
// lies in -1..=1.  Returns the height.
#[allow(dead_code)]
pub(super) fn chk_avl<K: Ord, V>(root: Option<NodeRef<'_, K, V>>) -> usize {
    if let Some(r) = root {
        assert!(r.parent().is_none());
    }
    chk_node(root, None, None)
}

#[allow(dead_code)]
fn chk_node<'a, K: Ord, V>(
    opt_node: Option<NodeRef<'a, K, V>>,
    lo: Option<&'a K>,
    hi: Option<&'a K>,
) -> usize {
    let Some(n) = opt_node else {
        return 0;
    };

    assert!(lo.iter().all(|&k| k < n.key()));
    assert!(hi.iter().all(|&k| n.key() < k));

    for c in [n.left(), n.right()].into_iter().flatten() {
        assert!(c.parent() == Some(n));
    }

    let lf_ht = chk_node(n.left(), lo, Some(n.key()));
    let rt_ht = chk_node(n.right(), Some(n.key()), hi);

    assert_eq!(n.balance() as isize, rt_ht as isize - lf_ht as isize);
    assert!(lf_ht.abs_diff(rt_ht) <= 1);

    lf_ht.max(rt_ht) + 1
}

// About 1.44 * log2(n + 2): the tallest an AVL tree of n nodes can be.
#[allow(dead_code)]
pub(super) fn max_avl_height(n: usize) -> usize {
    (1.44 * ((n + 2) as f64).log2()).ceil() as usize
}

#[allow(dead_code)]
pub(super) type SmallIntPairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

#[allow(dead_code)]
pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}

#[allow(dead_code)]
#[derive(Clone, Debug)]
pub(super) enum Op {
    Insert(u16, u16),
    Remove(u16),
}

// Mixed updates over a small key space so removals usually hit.
#[allow(dead_code)]
pub(super) fn ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            (0u16..256, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
            (0u16..256).prop_map(Op::Remove),
        ],
        0..512,
    )
}

// The keys 1..=2^h for some h <= max_log, in an insertion order and a
// (separately shuffled) removal order.
#[allow(dead_code)]
pub(super) fn build_teardown_orders(
    max_log: u32,
) -> impl Strategy<Value = (Vec<u16>, Vec<u16>)> {
    (0..=max_log).prop_flat_map(|h| {
        let keys: Vec<u16> = (1..=(1u16 << h)).collect();
        (Just(keys.clone()).prop_shuffle(), Just(keys).prop_shuffle())
    })
}
