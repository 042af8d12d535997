extern crate quickcheck;
use avl_bst::{AvlMap, AvlSet, Error};
use quickcheck::quickcheck;

mod common;
use common::*;

fn root_key<K: Copy, V>(m: &AvlMap<K, V>) -> Option<K> {
    m.root_node().map(|n| *n.key())
}

#[test]
fn rot_rt_regr() {
    let mut fmap = AvlMap::new();
    fmap.insert(2, 0);
    fmap.insert(0, 0);
    fmap.insert(1, 0);

    assert_eq!(fmap.len(), 3);
    let mut iter = fmap.iter();
    assert_eq!(iter.next(), Some((&0, &0)));
    assert_eq!(iter.next(), Some((&1, &0)));
    assert_eq!(iter.next(), Some((&2, &0)));
    assert_eq!(iter.next(), None);
    assert_eq!(root_key(&fmap), Some(1));
}

#[test]
fn ascending_inserts() {
    let mut m = AvlMap::new();
    for k in 1..=7 {
        m.insert(k, ());
        chk_avl(m.root_node());
    }

    assert_eq!(m.keys().copied().collect::<Vec<_>>(), (1..=7).collect::<Vec<_>>());
    assert_eq!(root_key(&m), Some(4));
    assert_eq!(chk_avl(m.root_node()), 3);
}

#[test]
fn remove_root_of_three() {
    let mut m: AvlMap<_, _> = [10, 20, 30].map(|k| (k, ())).into();
    assert_eq!(root_key(&m), Some(20));

    assert_eq!(m.remove(&10), Some(()));
    assert_eq!(root_key(&m), Some(20));
    assert_eq!(chk_avl(m.root_node()), 2);
}

#[test]
fn remove_two_children() {
    let mut m = AvlMap::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
        m.insert(k, k * 10);
        chk_avl(m.root_node());
    }
    assert_eq!(root_key(&m), Some(5));

    assert_eq!(m.remove_entry(&5), Some((5, 50)));
    chk_avl(m.root_node());
    assert!(!m.contains_key(&5));
    assert_eq!(root_key(&m), Some(4));
    assert_eq!(
        m.keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 6, 7, 8, 9]
    );

    // values travel with their keys through the swap
    assert!(m.iter().all(|(k, v)| *v == k * 10));
}

#[test]
fn remove_absent_is_noop() {
    let mut m: AvlMap<u32, u32> = AvlMap::new();
    assert_eq!(m.remove(&1), None);
    assert!(m.is_empty());
    assert_eq!(m.height(), 0);

    let mut m: AvlMap<_, _> = (0..20).map(|k| (k * 2, k)).collect();
    let before = m.clone();
    for k in (0..40).filter(|k| k % 2 == 1) {
        assert_eq!(m.remove(&k), None);
    }
    assert_eq!(m, before);
    assert_eq!(format!("{:?}", m), format!("{:?}", before));
}

#[test]
fn duplicate_insert_keeps_len() {
    let mut m = AvlMap::new();
    assert_eq!(m.insert("k", 1), None);
    assert_eq!(m.insert("k", 2), Some(1));
    assert_eq!(m.len(), 1);
    assert_eq!(m["k"], 2);
}

#[test]
fn lookups() {
    let mut m: AvlMap<String, usize> =
        ["x", "yy", "zzz"].iter().map(|s| (s.to_string(), s.len())).collect();

    assert_eq!(m.get("yy"), Some(&2));
    assert_eq!(m.try_get("w"), Err(Error::KeyNotFound));
    *m.try_get_mut("zzz").unwrap() += 1;
    assert_eq!(m.get_key_value("zzz"), Some((&"zzz".to_string(), &4)));
    assert_eq!(Error::KeyNotFound.to_string(), "key not found");
}

#[test]
#[should_panic(expected = "Key not found in AvlMap")]
fn index_missing_panics() {
    let m = AvlMap::from([(1, 'a')]);
    let _c: char = m[&2];
}

#[test]
fn descending_iteration() {
    let m: AvlMap<_, _> = (0..100).map(|k| (k, k)).collect();
    assert_eq_iters(
        m.iter().rev().map(|(k, v)| (*k, *v)),
        (0..100).rev().map(|k| (k, k)),
    );
}

#[test]
fn set_basics() {
    let mut s: AvlSet<_> = (0..32).rev().collect();
    assert_eq!(s.len(), 32);
    assert!(s.height() <= max_avl_height(32));
    assert!(s.remove(&7));
    assert!(!s.remove(&7));
    assert_eq!(s.first(), Some(&0));
    assert_eq!(s.last(), Some(&31));
    assert!(s.is_balanced());
}

quickcheck! {
    fn qc_cmp_with_btree(xs: Vec<(u8, u32)>) -> () {
        let mut btree = std::collections::BTreeMap::new();
        let mut fmap = AvlMap::new();

        for (k, v) in xs.iter() {
            assert_eq!(btree.len(), fmap.len());
            assert_eq!(btree.insert(*k, *v), fmap.insert(*k, *v));
            assert!(btree.iter().cmp(fmap.iter()).is_eq());
        }

        for k in 0..=u8::MAX {
            assert_eq!(fmap.get(&k), btree.get(&k));
        }
    }

    fn qc_height_bound(xs: Vec<u16>) -> () {
        let m: AvlMap<_, _> = xs.into_iter().map(|k| (k, ())).collect();
        let ht = chk_avl(m.root_node());
        assert_eq!(ht, m.height());
        assert!(ht <= max_avl_height(m.len()));
    }
}
