use std::collections::BTreeMap;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rank_tree::rank_tree::Entry;
use rank_tree::{AllocError, Bounded, InsertError, RankTree};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn position_strategy() -> impl Strategy<Value = i64> {
    // Narrower than TEST_SIZE so positions collide.
    -1_000i64..1_000i64
}

fn shift_strategy() -> impl Strategy<Value = i64> {
    -50i64..50i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    ShiftFrom(i64, i64),
    ShiftBefore(i64, i64),
    PopFirst,
    PopLast,
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => (position_strategy(), any::<i64>()).prop_map(|(p, v)| TreeOp::Insert(p, v)),
        3 => position_strategy().prop_map(TreeOp::Remove),
        2 => position_strategy().prop_map(TreeOp::Get),
        2 => (position_strategy(), shift_strategy()).prop_map(|(p, d)| TreeOp::ShiftFrom(p, d)),
        1 => (position_strategy(), shift_strategy()).prop_map(|(p, d)| TreeOp::ShiftBefore(p, d)),
        1 => Just(TreeOp::PopFirst),
        1 => Just(TreeOp::PopLast),
    ]
}

/// Applies a shift to the model if it keeps the entries in order.
fn model_shift(model: &mut BTreeMap<i64, i64>, boundary: i64, by: i64, from: bool) -> bool {
    let below = model.range(..boundary).next_back().map(|(&p, _)| p);
    let above = model.range(boundary..).next().map(|(&p, _)| p);
    if let (Some(below), Some(above)) = (below, above) {
        let keeps_order = if from { below < above + by } else { below + by < above };
        if !keeps_order {
            return false;
        }
    }
    *model = model
        .iter()
        .map(|(&p, &v)| {
            let moves = if from { p >= boundary } else { p < boundary };
            (if moves { p + by } else { p }, v)
        })
        .collect();
    true
}

// ─── Randomized model tests ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random inserts, removals and shifts on both a `RankTree` and a
    /// `BTreeMap` and asserts identical results at every step.
    #[test]
    fn tree_ops_match_btreemap(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree: RankTree<i64, i64> = RankTree::new();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for (step, op) in ops.iter().enumerate() {
            match *op {
                TreeOp::Insert(p, v) => prop_assert_eq!(tree.insert(p, v), model.insert(p, v), "insert({}, {})", p, v),
                TreeOp::Remove(p) => prop_assert_eq!(tree.remove(p), model.remove(&p), "remove({})", p),
                TreeOp::Get(p) => prop_assert_eq!(tree.get(p), model.get(&p), "get({})", p),
                TreeOp::ShiftFrom(p, d) => {
                    if model_shift(&mut model, p, d, true) {
                        tree.shift_from(p, i128::from(d));
                    }
                }
                TreeOp::ShiftBefore(p, d) => {
                    if model_shift(&mut model, p, d, false) {
                        tree.shift_before(p, i128::from(d));
                    }
                }
                TreeOp::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                TreeOp::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
            }
            prop_assert_eq!(tree.len(), model.len());
            if step % 64 == 0 {
                prop_assert_eq!(tree.check_structure(), Ok(()));
            }
        }

        prop_assert_eq!(tree.check_structure(), Ok(()));
        let got: Vec<_> = tree.iter().map(|(p, &v)| (p, v)).collect();
        let expected: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    /// Shifting a boundary forward and back again restores every entry.
    #[test]
    fn shift_round_trip_is_exact(
        positions in proptest::collection::btree_set(0u32..10_000, 0..500),
        boundary in 0u32..10_000,
        by in 1i64..1_000_000,
    ) {
        let mut tree: RankTree<u32, u32> = positions.iter().map(|&p| (p, p)).collect();
        let before: Vec<_> = tree.positions().collect();

        tree.shift_from(boundary, by);
        tree.check_structure().unwrap();
        let shifted = u32::try_from(i64::from(boundary) + by).unwrap();
        prop_assert!(tree.range(boundary..shifted).next().is_none());

        tree.shift_from(shifted, -by);
        tree.check_structure().unwrap();
        prop_assert_eq!(tree.positions().collect::<Vec<_>>(), before);
        prop_assert!(tree.iter().all(|(p, &v)| p == v));
    }

    /// Iterating from both ends meets in the middle without repeating entries.
    #[test]
    fn iter_double_ended(entries in proptest::collection::vec((position_strategy(), any::<i64>()), 1..TEST_SIZE)) {
        let tree: RankTree<i64, i64> = entries.iter().copied().collect();
        let model: BTreeMap<i64, i64> = entries.into_iter().collect();

        let mut iter = tree.iter();
        let mut expected = model.iter();
        let mut from_front = true;
        loop {
            prop_assert_eq!(iter.len(), expected.len());
            let (got, want) = if from_front {
                (iter.next(), expected.next().map(|(&p, v)| (p, v)))
            } else {
                (iter.next_back(), expected.next_back().map(|(&p, v)| (p, v)))
            };
            prop_assert_eq!(got, want);
            if got.is_none() {
                break;
            }
            from_front = !from_front;
        }
    }

    /// Mutating a clone never affects the original.
    #[test]
    fn clone_is_independent(entries in proptest::collection::vec((position_strategy(), any::<i64>()), TEST_SIZE)) {
        let original: RankTree<i64, i64> = entries.into_iter().collect();
        let snapshot: Vec<_> = original.iter().map(|(p, &v)| (p, v)).collect();

        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        copy.check_structure().unwrap();
        for value in copy.values_mut() {
            *value = value.wrapping_add(1);
        }
        copy.shift_from(0, 7);
        copy.pop_first();

        let after: Vec<_> = original.iter().map(|(p, &v)| (p, v)).collect();
        prop_assert_eq!(after, snapshot);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn entry_counts_positions() {
    let mut tree: RankTree<u8, u32> = RankTree::new();
    for position in [5, 3, 5, 9, 5, 3] {
        tree.entry(position).and_modify(|n| *n += 1).or_insert(1);
    }
    assert_eq!(tree.iter().map(|(p, &n)| (p, n)).collect::<Vec<_>>(), [(3, 2), (5, 3), (9, 1)]);

    match tree.entry(9) {
        Entry::Occupied(o) => assert_eq!(o.remove_entry(), (9, 1)),
        Entry::Vacant(_) => panic!("position 9 should be occupied"),
    }
    assert_eq!(*tree.entry(4).or_default(), 0);
    tree.check_structure().unwrap();
}

#[test]
fn bounded_tree_is_transactional() {
    let mut tree = RankTree::new_in(Bounded::new(4));
    for position in 0..4u16 {
        tree.try_insert(position * 10, position).unwrap();
    }
    let before: Vec<_> = tree.iter().map(|(p, &v)| (p, v)).collect();

    let mut constructed = false;
    let refused = tree.try_insert_with(5, || {
        constructed = true;
        Ok::<_, ()>(99)
    });
    assert_eq!(refused, Err(InsertError::Alloc(AllocError::LimitExceeded { limit: 4 })));
    assert!(!constructed);
    assert_eq!(tree.try_insert(10, 0), Err(InsertError::Occupied));
    assert_eq!(tree.iter().map(|(p, &v)| (p, v)).collect::<Vec<_>>(), before);

    // A freed node is recycled without asking the strategy.
    assert_eq!(tree.remove(20), Some(2));
    assert_eq!(tree.try_insert(25, 7), Ok(&mut 7));
    tree.check_structure().unwrap();
}

#[test]
fn take_leaves_source_empty() {
    let mut source: RankTree<usize, String> = (0..100).map(|i| (i * 3, i.to_string())).collect();
    let expected = source.clone();

    let taken = std::mem::take(&mut source);
    assert!(source.is_empty());
    assert_eq!(source.iter().next(), None);
    assert_eq!(taken, expected);
    taken.check_structure().unwrap();
}

#[test]
fn swap_between_strategies() {
    let mut small = RankTree::new_in(Bounded::new(8));
    let mut large = RankTree::new_in(Bounded::new(64));
    small.extend((0..8u32).map(|p| (p, p)));
    large.extend((0..20u32).map(|p| (p * 2, p)));

    assert_eq!(small.try_swap(&mut large), Err(AllocError::LimitExceeded { limit: 8 }));
    assert_eq!((small.len(), large.len()), (8, 20));

    large.remove_entry(0);
    while large.len() > 8 {
        large.pop_last();
    }
    small.swap(&mut large);
    assert_eq!(small.positions().collect::<Vec<_>>(), [2, 4, 6, 8, 10, 12, 14, 16]);
    assert_eq!(large.positions().collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
    small.check_structure().unwrap();
    large.check_structure().unwrap();
}

#[test]
fn ascending_descending_and_alternating_inserts_stay_balanced() {
    let mut tree = RankTree::new();
    for position in 0..4_096i32 {
        tree.insert(position, ());
        tree.insert(-position - 1, ());
    }
    tree.check_structure().unwrap();
    assert_eq!(tree.first(), Some((-4_096, &())));
    assert_eq!(tree.last(), Some((4_095, &())));

    for position in (0..4_096i32).step_by(2) {
        tree.remove(position);
    }
    tree.check_structure().unwrap();
    assert_eq!(tree.len(), 6_144);
}

#[test]
fn signed_positions_at_the_type_limits() {
    let low: Vec<i64> = (0..64).map(|k| i64::MIN + k).collect();
    let high: Vec<i64> = (0..64).map(|k| i64::MAX - k).collect();
    let mut tree = RankTree::new();
    // Interleaved so rotations combine deltas from both extremes.
    for (&a, &b) in low.iter().zip(&high) {
        tree.insert(a, a);
        tree.insert(b, b);
    }
    tree.insert(0, 0);
    tree.check_structure().unwrap();
    assert_eq!(tree.first(), Some((i64::MIN, &i64::MIN)));
    assert_eq!(tree.last(), Some((i64::MAX, &i64::MAX)));
    assert!(tree.iter().all(|(p, &v)| p == v));
    assert_eq!(tree.get(i64::MAX - 63), Some(&(i64::MAX - 63)));
    assert_eq!(tree.range(-1..=1).count(), 1);

    tree.shift_from(1, -1);
    tree.shift_before(0, 1);
    tree.check_structure().unwrap();
    assert!(tree.iter().all(|(p, &v)| v == 0 || p == v - v.signum()));
    assert_eq!(tree.get(i64::MAX), None);
    assert_eq!(tree.get(i64::MIN), None);

    assert_eq!(tree.remove(i64::MAX - 1), Some(i64::MAX));
    assert_eq!(tree.remove(i64::MIN + 1), Some(i64::MIN));
    assert!(!tree.move_entry(0, i64::MAX - 1));
    assert!(tree.move_entry(i64::MAX - 2, i64::MAX));
    assert!(tree.move_entry(i64::MIN + 2, i64::MIN));
    assert_eq!(tree.last(), Some((i64::MAX, &(i64::MAX - 1))));
    assert_eq!(tree.first(), Some((i64::MIN, &(i64::MIN + 1))));
    tree.check_structure().unwrap();
    assert_eq!(tree.len(), 127);
}

#[test]
fn unsigned_positions_at_the_type_limits() {
    let mut tree: RankTree<u64, u64> = RankTree::new();
    for k in 0..32 {
        tree.insert(k, k);
        tree.insert(u64::MAX - k, u64::MAX - k);
    }
    tree.check_structure().unwrap();
    assert_eq!(tree.get(u64::MAX), Some(&u64::MAX));
    assert_eq!(tree.get(u64::MAX - 32), None);

    // Moves the upper block down across more than half the type's range.
    let by = 100 - i128::from(u64::MAX - 31);
    tree.shift_from(u64::MAX - 31, by);
    tree.check_structure().unwrap();
    let expected: Vec<u64> = (0..32).chain(100..132).collect();
    assert_eq!(tree.positions().collect::<Vec<_>>(), expected);
    assert_eq!(tree.get(131), Some(&u64::MAX));

    tree.shift_from(100, -by);
    tree.check_structure().unwrap();
    assert!(tree.iter().all(|(p, &v)| p == v));

    let mut seq_positions: RankTree<usize, ()> = [(0, ()), (usize::MAX, ())].into_iter().collect();
    seq_positions.shift_before(1, i128::try_from(usize::MAX).unwrap() - 1);
    assert_eq!(seq_positions.positions().collect::<Vec<_>>(), [usize::MAX - 1, usize::MAX]);
    seq_positions.check_structure().unwrap();
}

#[test]
fn owning_iteration_over_a_bounded_tree() {
    let shared = Rc::new(());
    let mut tree = RankTree::new_in(Bounded::new(8));
    for position in 0..8u8 {
        tree.try_insert(position * 2, Rc::clone(&shared)).unwrap();
    }
    assert_eq!(Rc::strong_count(&shared), 9);

    let mut entries = tree.into_iter();
    assert_eq!(entries.next().map(|(p, _)| p), Some(0));
    assert_eq!(entries.next_back().map(|(p, _)| p), Some(14));
    assert_eq!(entries.len(), 6);
    assert_eq!(Rc::strong_count(&shared), 7);

    let middle: Vec<u8> = entries.by_ref().take(2).map(|(p, _)| p).collect();
    assert_eq!(middle, [2, 4]);
    drop(entries);
    assert_eq!(Rc::strong_count(&shared), 1);

    let tree: RankTree<i32, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
    assert_eq!(tree.into_values().rev().collect::<String>(), "cba");
}
