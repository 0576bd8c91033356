use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::{AvlTreeMap, AvlTreeMultiset};

const FUZZ_RANGE: std::ops::Range<usize> = 1..512;

/// A key either picked from the keys present in the reference, so that
/// lookups and removals mostly hit, or drawn at random.
#[derive(Copy, Clone, Debug)]
pub enum KeyChoice {
    Index(usize),
    Random(u32),
}

fn key_strategy() -> impl Strategy<Value = KeyChoice> {
    prop_oneof![
        (0usize..1000).prop_map(KeyChoice::Index),
        (0u32..1000).prop_map(KeyChoice::Random),
    ]
}

impl KeyChoice {
    fn resolve<V>(self, reference: &BTreeMap<u32, V>) -> u32 {
        match self {
            KeyChoice::Index(idx) if !reference.is_empty() => reference
                .keys()
                .nth(idx % reference.len())
                .copied()
                .unwrap_or(idx as u32),
            KeyChoice::Index(idx) => idx as u32,
            KeyChoice::Random(key) => key,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub enum Op {
    Insert(KeyChoice, u32),
    InsertOrAssign(KeyChoice, u32),
    Get(KeyChoice),
    Remove(KeyChoice),
    LowerBound(KeyChoice),
    UpperBound(KeyChoice),
    First,
    PopFirst,
    Last,
    PopLast,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        (key_strategy(), any::<u32>()).prop_map(|(k, v)| Op::InsertOrAssign(k, v)),
        key_strategy().prop_map(Op::Get),
        key_strategy().prop_map(Op::Remove),
        key_strategy().prop_map(Op::LowerBound),
        key_strategy().prop_map(Op::UpperBound),
        Just(Op::First),
        Just(Op::PopFirst),
        Just(Op::Last),
        Just(Op::PopLast),
    ]
}

pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut btree = BTreeMap::new();
    let mut avl = AvlTreeMap::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        match op {
            Op::Insert(key, value) => {
                let key = key.resolve(&btree);
                let from_btree = !btree.contains_key(&key);
                btree.entry(key).or_insert(value);
                let (cursor, from_avl) = avl.insert(key, value);
                assert_eq!(cursor.key(), Some(&key), "Op #{op_id}: {op:?}");
                assert_eq!(from_btree, from_avl, "Op #{op_id}: {op:?}");
            }

            Op::InsertOrAssign(key, value) => {
                let key = key.resolve(&btree);
                let from_btree = btree.insert(key, value).is_none();
                let (_, from_avl) = avl.insert_or_assign(key, value);
                assert_eq!(from_btree, from_avl, "Op #{op_id}: {op:?}");
            }

            Op::Get(key) => {
                let key = key.resolve(&btree);
                assert_eq!(btree.get(&key), avl.get(&key), "Op #{op_id}: {op:?}");
            }

            Op::Remove(key) => {
                let key = key.resolve(&btree);
                assert_eq!(btree.remove(&key), avl.remove(&key), "Op #{op_id}: {op:?}");
            }

            Op::LowerBound(key) => {
                let key = key.resolve(&btree);
                let from_btree = btree.range(key..).next();
                assert_eq!(from_btree, avl.lower_bound(&key).get(), "Op #{op_id}: {op:?}");
            }

            Op::UpperBound(key) => {
                let key = key.resolve(&btree);
                let from_btree = btree
                    .range((std::ops::Bound::Excluded(key), std::ops::Bound::Unbounded))
                    .next();
                assert_eq!(from_btree, avl.upper_bound(&key).get(), "Op #{op_id}: {op:?}");
            }

            Op::First => {
                assert_eq!(
                    btree.first_key_value(),
                    avl.first_key_value(),
                    "Op #{op_id}: {op:?}"
                );
            }

            Op::PopFirst => {
                assert_eq!(btree.pop_first(), avl.pop_first(), "Op #{op_id}: {op:?}");
            }

            Op::Last => {
                assert_eq!(
                    btree.last_key_value(),
                    avl.last_key_value(),
                    "Op #{op_id}: {op:?}"
                );
            }

            Op::PopLast => {
                assert_eq!(btree.pop_last(), avl.pop_last(), "Op #{op_id}: {op:?}");
            }
        }

        avl.check_consistency();
        assert_eq!(btree.len(), avl.len());
        assert!(btree.iter().eq(avl.iter()));
    }
}

#[derive(Copy, Clone, Debug)]
pub enum CursorOp {
    MovePrev,
    MoveNext,
    PeekNext,
    PeekPrev,
    RemoveCurrent,
}

pub fn cursor_op_strategy() -> impl Strategy<Value = CursorOp> {
    prop_oneof![
        Just(CursorOp::MovePrev),
        Just(CursorOp::MoveNext),
        Just(CursorOp::PeekNext),
        Just(CursorOp::PeekPrev),
        Just(CursorOp::RemoveCurrent),
    ]
}

/// Drives a cursor and an index into a sorted `Vec` side by side.
/// The end position corresponds to `index == vec.len()`.
pub fn run_cursor_equivalence(mut keys: Vec<u32>, ops: Vec<CursorOp>) {
    keys.sort_unstable();
    keys.dedup();

    let mut avl: AvlTreeMap<u32, ()> = keys.iter().map(|&k| (k, ())).collect();
    let mut vec = keys;
    let mut index = 0;
    let mut cursor = avl.cursor_first_mut();

    for (op_id, op) in ops.into_iter().enumerate() {
        let end = vec.len();
        match op {
            CursorOp::MoveNext => {
                index = if index == end { 0 } else { index + 1 };
                cursor.move_next();
            }
            CursorOp::MovePrev => {
                index = if index == 0 { end } else { index - 1 };
                cursor.move_prev();
            }
            CursorOp::PeekNext => {
                let next = if index == end { vec.first() } else { vec.get(index + 1) };
                assert_eq!(next, cursor.peek_next().map(|(k, _)| k), "Op #{op_id}: {op:?}");
            }
            CursorOp::PeekPrev => {
                let prev = if index == end {
                    vec.last()
                } else if index == 0 {
                    None
                } else {
                    vec.get(index - 1)
                };
                assert_eq!(prev, cursor.peek_prev().map(|(k, _)| k), "Op #{op_id}: {op:?}");
            }
            CursorOp::RemoveCurrent => {
                let from_vec = (index < end).then(|| vec.remove(index));
                let from_avl = cursor.remove_current().map(|(k, _)| k);
                assert_eq!(from_vec, from_avl, "Op #{op_id}: {op:?}");
            }
        }
        assert_eq!(vec.get(index), cursor.key(), "Op #{op_id}: {op:?}");
    }

    drop(cursor);
    avl.check_consistency();
    assert!(avl.keys().eq(vec.iter()));
}

#[derive(Copy, Clone, Debug)]
pub enum MultisetOp {
    Insert(u32),
    Remove(u32),
    RemoveAll(u32),
    Count(u32),
}

pub fn multiset_op_strategy() -> impl Strategy<Value = MultisetOp> {
    prop_oneof![
        (0u32..64).prop_map(MultisetOp::Insert),
        (0u32..64).prop_map(MultisetOp::Remove),
        (0u32..64).prop_map(MultisetOp::RemoveAll),
        (0u32..64).prop_map(MultisetOp::Count),
    ]
}

pub fn run_multiset_equivalence(ops: Vec<MultisetOp>) {
    let mut counts = BTreeMap::<u32, usize>::new();
    let mut multiset = AvlTreeMultiset::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        match op {
            MultisetOp::Insert(value) => {
                *counts.entry(value).or_default() += 1;
                let cursor = multiset.insert(value);
                assert_eq!(cursor.occurrence() + 1, counts[&value], "Op #{op_id}: {op:?}");
            }
            MultisetOp::Remove(value) => {
                let from_counts = match counts.get_mut(&value) {
                    Some(count) if *count > 1 => {
                        *count -= 1;
                        true
                    }
                    Some(_) => counts.remove(&value).is_some(),
                    None => false,
                };
                assert_eq!(from_counts, multiset.remove(&value), "Op #{op_id}: {op:?}");
            }
            MultisetOp::RemoveAll(value) => {
                let from_counts = counts.remove(&value).unwrap_or(0);
                assert_eq!(from_counts, multiset.remove_all(&value), "Op #{op_id}: {op:?}");
            }
            MultisetOp::Count(value) => {
                let from_counts = counts.get(&value).copied().unwrap_or(0);
                assert_eq!(from_counts, multiset.count(&value), "Op #{op_id}: {op:?}");
            }
        }

        multiset.check_consistency();
        assert_eq!(counts.values().sum::<usize>(), multiset.len());
        let expected = counts
            .iter()
            .flat_map(|(&value, &count)| std::iter::repeat(value).take(count));
        assert!(multiset.iter().copied().eq(expected));
    }
}

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(op_strategy(), FUZZ_RANGE)) {
        run_btree_equivalence(ops);
    }

    #[test]
    fn cursor_equivalence(
        keys in proptest::collection::vec(0u32..1000, 0..100),
        ops in proptest::collection::vec(cursor_op_strategy(), FUZZ_RANGE),
    ) {
        run_cursor_equivalence(keys, ops);
    }

    #[test]
    fn multiset_equivalence(ops in proptest::collection::vec(multiset_op_strategy(), FUZZ_RANGE)) {
        run_multiset_equivalence(ops);
    }
}
