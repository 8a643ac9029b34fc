use std::collections::VecDeque;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rank_tree::{AllocError, Bounded, IndexedSeq, InsertError, OutOfRange};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn contents<T: Clone, A>(seq: &IndexedSeq<T, A>) -> Vec<T> {
    seq.iter().cloned().collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SeqOp {
    PushBack(i32),
    PushFront(i32),
    /// Index as a fraction of the current length, so it is always in range.
    Insert(f64, i32),
    Remove(f64),
    PopFront,
    PopBack,
    Set(f64, i32),
}

fn fraction() -> impl Strategy<Value = f64> {
    0.0f64..1.0
}

fn seq_op_strategy() -> impl Strategy<Value = SeqOp> {
    prop_oneof![
        3 => any::<i32>().prop_map(SeqOp::PushBack),
        2 => any::<i32>().prop_map(SeqOp::PushFront),
        4 => (fraction(), any::<i32>()).prop_map(|(at, v)| SeqOp::Insert(at, v)),
        3 => fraction().prop_map(SeqOp::Remove),
        1 => Just(SeqOp::PopFront),
        1 => Just(SeqOp::PopBack),
        1 => (fraction(), any::<i32>()).prop_map(|(at, v)| SeqOp::Set(at, v)),
    ]
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn scaled(at: f64, len: usize) -> usize {
    (at * len as f64) as usize
}

// ─── Randomized model tests ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random edits on both an `IndexedSeq` and a `VecDeque` and asserts
    /// identical results at every step.
    #[test]
    fn seq_ops_match_vecdeque(ops in proptest::collection::vec(seq_op_strategy(), TEST_SIZE)) {
        let mut seq: IndexedSeq<i32> = IndexedSeq::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for (step, op) in ops.iter().enumerate() {
            match *op {
                SeqOp::PushBack(v) => {
                    seq.push_back(v);
                    model.push_back(v);
                }
                SeqOp::PushFront(v) => {
                    seq.push_front(v);
                    model.push_front(v);
                }
                SeqOp::Insert(at, v) => {
                    let index = scaled(at, model.len() + 1);
                    seq.insert(index, v);
                    model.insert(index, v);
                }
                SeqOp::Remove(at) => {
                    let index = scaled(at, model.len());
                    prop_assert_eq!(seq.remove(index), model.remove(index), "remove({})", index);
                }
                SeqOp::PopFront => prop_assert_eq!(seq.pop_front(), model.pop_front()),
                SeqOp::PopBack => prop_assert_eq!(seq.pop_back(), model.pop_back()),
                SeqOp::Set(at, v) => {
                    let index = scaled(at, model.len());
                    if let Some(slot) = model.get_mut(index) {
                        *slot = v;
                        seq[index] = v;
                    } else {
                        prop_assert_eq!(seq.at_mut(index), Err(OutOfRange { index, len: 0 }));
                    }
                }
            }
            prop_assert_eq!(seq.len(), model.len());
            prop_assert_eq!(seq.front(), model.front());
            prop_assert_eq!(seq.back(), model.back());
            if step % 64 == 0 {
                prop_assert_eq!(seq.check_structure(), Ok(()));
            }
        }

        prop_assert_eq!(seq.check_structure(), Ok(()));
        prop_assert_eq!(contents(&seq), Vec::from(model));
    }

    /// A range insert whose source fails part way leaves the sequence untouched.
    #[test]
    fn failed_range_insert_rolls_back(
        initial in proptest::collection::vec(any::<u16>(), 0..200),
        at in fraction(),
        good in 0usize..50,
    ) {
        let mut seq: IndexedSeq<u16> = initial.iter().copied().collect();
        let index = scaled(at, initial.len() + 1);

        let source = (0..good).map(|i| Ok(u16::try_from(i).unwrap())).chain([Err("broken")]);
        prop_assert_eq!(seq.try_insert_iter(index, source), Err(InsertError::Value("broken")));
        prop_assert_eq!(seq.check_structure(), Ok(()));
        prop_assert_eq!(contents(&seq), initial);
    }

    /// Removing a range matches `Vec::drain`.
    #[test]
    fn remove_range_matches_drain(
        initial in proptest::collection::vec(any::<u8>(), 0..300),
        a in fraction(),
        b in fraction(),
    ) {
        let (a, b) = (scaled(a, initial.len() + 1), scaled(b, initial.len() + 1));
        let (start, end) = (a.min(b), a.max(b));
        let mut seq: IndexedSeq<u8> = initial.iter().copied().collect();
        let mut model = initial;

        seq.remove_range(start..end);
        model.drain(start..end);
        prop_assert_eq!(seq.check_structure(), Ok(()));
        prop_assert_eq!(contents(&seq), model);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn push_insert_remove_walkthrough() {
    let mut seq = IndexedSeq::from([0, 1, 2, 3]);
    assert_eq!(contents(&seq), [0, 1, 2, 3]);

    seq.push_front(9);
    assert_eq!(contents(&seq), [9, 0, 1, 2, 3]);

    seq.insert(2, 99);
    assert_eq!(contents(&seq), [9, 0, 99, 1, 2, 3]);

    assert_eq!(seq.remove(0), Some(9));
    assert_eq!(contents(&seq), [0, 99, 1, 2, 3]);
    assert_eq!(seq.remove(5), None);
    seq.check_structure().unwrap();
}

#[test]
fn random_inserts_match_vec() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut seq = IndexedSeq::new();
    let mut model = Vec::new();

    for value in 0..10_000u32 {
        let index = rng.gen_range(0..=model.len());
        seq.insert(index, value);
        model.insert(index, value);
    }
    seq.check_structure().unwrap();
    assert_eq!(contents(&seq), model);
    assert!(model.iter().enumerate().all(|(index, value)| seq[index] == *value));
}

#[test]
fn pushes_interleaved_with_removals_stay_balanced() {
    let mut rng = StdRng::seed_from_u64(20_000);
    let mut seq = IndexedSeq::new();
    let mut model = Vec::new();

    for value in 0..20_000u32 {
        if rng.gen_bool(0.5) {
            seq.push_back(value);
            model.push(value);
        } else {
            seq.push_front(value);
            model.insert(0, value);
        }
        if value % 2 == 1 {
            let index = rng.gen_range(0..model.len());
            assert_eq!(seq.remove(index), Some(model.remove(index)));
        }
        if value % 16 == 0 {
            seq.check_structure().unwrap();
        }
    }
    seq.check_structure().unwrap();
    assert_eq!(seq.len(), 10_000);
    assert_eq!(contents(&seq), model);
}

#[test]
fn refused_allocation_leaves_sequence_unchanged() {
    let mut seq = IndexedSeq::new_in(Bounded::new(4));
    seq.extend([10, 20, 30, 40]);

    let refused = AllocError::LimitExceeded { limit: 4 };
    assert_eq!(seq.try_push_front(0), Err(refused));
    assert_eq!(seq.try_push_back(50), Err(refused));
    assert_eq!(seq.try_insert(2, 25), Err(refused));
    assert_eq!(seq.try_insert_iter(1, [Ok::<_, ()>(1), Ok(2)]), Err(InsertError::Alloc(refused)));
    assert_eq!(contents(&seq), [10, 20, 30, 40]);
    assert_eq!((seq.front(), seq.back()), (Some(&10), Some(&40)));
    seq.check_structure().unwrap();

    // Room freed by a removal is reused.
    assert_eq!(seq.pop_front(), Some(10));
    seq.push_front(5);
    assert_eq!(contents(&seq), [5, 20, 30, 40]);
}

#[test]
fn failed_constructor_leaves_sequence_unchanged() {
    let mut seq: IndexedSeq<String> = ["a", "b", "c"].map(String::from).into();

    let failed = seq.try_insert_with(1, || Err::<String, _>("no value"));
    assert_eq!(failed, Err(InsertError::Value("no value")));
    assert_eq!(contents(&seq), ["a", "b", "c"]);
    assert_eq!(seq.at(1), Ok(&String::from("b")));

    seq.try_insert_with(3, || Ok::<_, ()>(String::from("d"))).unwrap();
    assert_eq!(contents(&seq), ["a", "b", "c", "d"]);
    seq.check_structure().unwrap();
}

#[test]
fn clone_and_take_are_independent() {
    let mut original: IndexedSeq<Vec<u8>> = (0..64).map(|i| vec![i]).collect();
    let snapshot = original.clone();

    let mut copy = original.clone();
    copy[3].push(0);
    copy.pop_back();
    copy.push_front(Vec::new());
    assert_eq!(original, snapshot);
    assert!(copy != original);

    let taken = std::mem::take(&mut original);
    assert!(original.is_empty());
    assert_eq!(original.check_structure(), Ok(()));
    assert_eq!(taken, snapshot);
}

#[test]
fn insert_n_assign_and_swap() {
    let mut seq = IndexedSeq::from([1, 2]);
    seq.insert_n(1, 3, 0);
    assert_eq!(contents(&seq), [1, 0, 0, 0, 2]);

    seq.insert_iter(5, [7, 8]);
    assert_eq!(contents(&seq), [1, 0, 0, 0, 2, 7, 8]);

    let mut other = IndexedSeq::from(vec![42]);
    seq.swap(&mut other);
    assert_eq!(contents(&seq), [42]);
    assert_eq!(other.len(), 7);

    other.assign(0..3);
    assert_eq!(contents(&other), [0, 1, 2]);
}

#[test]
fn cursor_walks_and_edits() {
    let seq: IndexedSeq<char> = "rust".chars().collect();
    let begin = seq.cursor(0);
    let end = seq.cursor(seq.len());
    let mut walked = String::new();
    let mut cursor = begin;
    while cursor != end {
        walked.extend(cursor.get());
        cursor += 1;
    }
    assert_eq!(walked, "rust");
    assert_eq!(end.distance_to(&begin), -4);

    let mut seq = seq;
    let mut cursor = seq.cursor_mut(2);
    cursor.insert('-');
    cursor.advance(-2);
    *cursor.get_mut().unwrap() = 'R';
    assert_eq!(seq.iter().collect::<String>(), "Ru-st");
}

#[test]
fn ordering_and_debug() {
    let a = IndexedSeq::from([1, 2, 3]);
    let b = IndexedSeq::from([1, 3]);
    assert!(a < b);
    assert_eq!(format!("{a:?}"), "[1, 2, 3]");
    assert_eq!(a.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    assert_eq!(a.into_iter().len(), 3);
}
