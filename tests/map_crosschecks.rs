use avl_bst::{AvlMap, BstMap};
use proptest::prelude::*;
use std::collections::BTreeMap as StdMap;

mod common;
use common::*;

#[derive(Clone)]
struct Maps<K, V> {
    avl_map: AvlMap<K, V>,
    bst_map: BstMap<K, V>,
    std_map: StdMap<K, V>,
}

impl<K, V> Maps<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn new(v: Vec<(K, V)>) -> Maps<K, V> {
        Maps {
            avl_map: AvlMap::from_iter(v.clone()),
            bst_map: BstMap::from_iter(v.clone()),
            std_map: StdMap::from_iter(v),
        }
    }

    fn insert(&mut self, k: K, v: V)
    where
        V: Eq + std::fmt::Debug,
    {
        let old = self.std_map.insert(k.clone(), v.clone());
        assert_eq!(self.avl_map.insert(k.clone(), v.clone()), old);
        assert_eq!(self.bst_map.insert(k, v), old);
    }

    fn remove(&mut self, k: &K)
    where
        V: Eq + std::fmt::Debug,
    {
        let old = self.std_map.remove(k);
        assert_eq!(self.avl_map.remove(k), old);
        assert_eq!(self.bst_map.remove(k), old);
    }

    fn chk(&self)
    where
        K: Eq + std::fmt::Debug,
        V: Eq + std::fmt::Debug,
    {
        assert_eq!(self.avl_map.len(), self.std_map.len());
        assert_eq!(self.bst_map.len(), self.std_map.len());

        assert_eq_iters(self.avl_map.iter(), self.std_map.iter());
        assert_eq_iters(self.bst_map.iter(), self.std_map.iter());

        let ht = chk_avl(self.avl_map.root_node());
        assert!(ht <= max_avl_height(self.avl_map.len()));
    }
}

fn check_ops(ops: Vec<Op>) {
    let mut maps = Maps::new(Vec::new());
    for op in ops {
        match op {
            Op::Insert(k, v) => maps.insert(k, v),
            Op::Remove(k) => maps.remove(&k),
        }
        maps.chk();
    }
}

fn check_teardown(ins: Vec<u16>, rms: Vec<u16>) {
    let mut maps = Maps::new(Vec::new());
    for k in ins {
        maps.insert(k, k);
    }
    maps.chk();

    for k in rms {
        maps.remove(&k);
        maps.chk();
    }
    assert!(maps.avl_map.is_empty());
    assert!(maps.bst_map.is_empty());
}

fn check_lookups(v: SmallIntPairs) {
    let maps = Maps::new(v);
    maps.chk();

    for i in 0..1024 {
        assert_eq!(maps.avl_map.get(&i), maps.std_map.get(&i));
        assert_eq!(maps.bst_map.get(&i), maps.std_map.get(&i));
        assert_eq!(maps.avl_map.contains_key(&i), maps.std_map.contains_key(&i));
        assert_eq!(maps.bst_map.contains_key(&i), maps.std_map.contains_key(&i));
    }
}

fn check_string_keys(v: Vec<(String, u16)>) {
    let mut maps = Maps::new(v.clone());
    maps.chk();

    for (k, _) in v.iter().step_by(2) {
        maps.remove(k);
        maps.chk();
    }

    for (k, _) in v.iter() {
        assert_eq!(maps.avl_map.get(k.as_str()), maps.std_map.get(k));
    }
}

fn check_first_and_last(v: SmallIntPairs) {
    let mut maps = Maps::new(v);

    assert_eq!(maps.avl_map.first_key_value(), maps.std_map.first_key_value());
    assert_eq!(maps.bst_map.first_key_value(), maps.std_map.first_key_value());
    assert_eq!(maps.avl_map.last_key_value(), maps.std_map.last_key_value());
    assert_eq!(maps.bst_map.last_key_value(), maps.std_map.last_key_value());

    while !maps.std_map.is_empty() {
        assert_eq!(maps.avl_map.pop_first(), maps.std_map.pop_first());
        assert_eq!(maps.avl_map.pop_last(), maps.std_map.pop_last());
        chk_avl(maps.avl_map.root_node());
    }
    assert!(maps.avl_map.is_empty());
}

fn check_into_iter(v: SmallIntPairs) {
    let maps = Maps::new(v);
    assert_eq_iters(maps.avl_map.clone().into_iter(), maps.std_map.clone().into_iter());
    assert_eq_iters(maps.bst_map.clone().into_iter(), maps.std_map.clone().into_iter());
    assert_eq_iters(maps.avl_map.keys(), maps.std_map.keys());
    assert_eq_iters(maps.avl_map.values().rev(), maps.std_map.values().rev());
}

fn check_values_mut(v: SmallIntPairs) {
    let mut maps = Maps::new(v);
    maps.avl_map.values_mut().for_each(|v| *v ^= 0x5555);
    maps.bst_map.values_mut().for_each(|v| *v ^= 0x5555);
    maps.std_map.values_mut().for_each(|v| *v ^= 0x5555);
    maps.chk();
}

proptest! {
    #[test]
    fn test_ops(ops in ops()) {
        check_ops(ops);
    }

    #[test]
    fn test_teardown((ins, rms) in build_teardown_orders(8)) {
        check_teardown(ins, rms);
    }

    #[test]
    fn test_lookups(v in small_int_pairs()) {
        check_lookups(v);
    }

    #[test]
    fn test_string_keys(v in string_u16_pairs()) {
        check_string_keys(v);
    }

    #[test]
    fn test_first_and_last(v in small_int_pairs()) {
        check_first_and_last(v);
    }

    #[test]
    fn test_into_iter(v in small_int_pairs()) {
        check_into_iter(v);
    }

    #[test]
    fn test_values_mut(v in small_int_pairs()) {
        check_values_mut(v);
    }
}
