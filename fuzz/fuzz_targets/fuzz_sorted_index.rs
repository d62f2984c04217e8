//! Fuzz target for sorted index range queries.
//!
//! Builds a `SortedIndex` through arbitrary adds, inserts and removals, then
//! compares every range query against a brute-force scan of the source list.

#![no_main]

use arbitrary::Arbitrary;
use gridtable_core::SortedIndex;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Add(Option<i8>),
    Insert { position: u8, value: Option<i8> },
    Set { position: u8, value: Option<i8> },
    RemoveAt(u8),
    Remove(Option<i8>),
}

#[derive(Debug, Arbitrary)]
struct Input {
    ops: Vec<Op>,
    low: Option<i8>,
    high: Option<i8>,
}

fn sorted(mut positions: Vec<usize>) -> Vec<usize> {
    positions.sort_unstable();
    positions
}

fuzz_target!(|input: Input| {
    let mut index = SortedIndex::new();
    let mut model: Vec<Option<i8>> = Vec::new();

    for op in input.ops.into_iter().take(512) {
        match op {
            Op::Add(value) => {
                index.add(value);
                model.push(value);
            }
            Op::Insert { position, value } => {
                let position = usize::from(position) % (model.len() + 1);
                index.insert(position, value);
                model.insert(position, value);
            }
            Op::Set { position, value } => {
                let position = usize::from(position);
                let expected = model.get_mut(position).map(|slot| std::mem::replace(slot, value));
                assert_eq!(index.set(position, value), expected);
            }
            Op::RemoveAt(position) => {
                let position = usize::from(position);
                let expected = (position < model.len()).then(|| model.remove(position));
                assert_eq!(index.remove_at(position), expected);
            }
            Op::Remove(value) => {
                let found = model.iter().position(|v| *v == value);
                if let Some(position) = found {
                    model.remove(position);
                }
                assert_eq!(index.remove(&value), found.is_some());
            }
        }
        assert_eq!(index.len(), model.len());
    }

    let matching = |keep: &dyn Fn(&Option<i8>) -> bool| -> Vec<usize> {
        (0..model.len()).filter(|&i| keep(&model[i])).collect()
    };
    let (low, high) = (input.low, input.high);

    let between = matching(&|v| low <= *v && *v <= high);
    let expected = (!between.is_empty()).then_some(between);
    assert_eq!(
        index.indexes_of_elements_equal_or_between(&low, &high).map(sorted),
        expected
    );
    assert_eq!(
        sorted(index.indexes_of_elements_greater_than(&low)),
        matching(&|v| *v > low)
    );
    assert_eq!(
        sorted(index.indexes_of_elements_less_than(&high)),
        matching(&|v| *v < high)
    );
    assert_eq!(index.indexes_of(&low), matching(&|v| *v == low));
});
