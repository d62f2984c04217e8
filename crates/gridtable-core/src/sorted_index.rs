//! Sorted secondary index over a list of comparable values.
//!
//! Keeps the values in source (insertion) order alongside a sorted projection
//! of back-pointers into that list, so range predicates are answered with two
//! binary searches instead of a scan.
//!
//! ```text
//! source:    [30, 10, 20, 10]        position -> value
//! projection:[ 3,  1,  2,  0]        sorted by value, ties keep insertion rule
//! ```
//!
//! Nulls are modelled with `Option<T>`: `None` orders before every `Some`,
//! and all `None`s compare equal.
//!
//! Structural edits (`insert`, `remove_at`) shift every back-pointer past the
//! edited position, which costs O(n).

use std::cmp::Ordering;

/// Sorted projection of a source list, answering equality and range queries.
///
/// # Example
///
/// ```rust
/// use gridtable_core::SortedIndex;
///
/// let index: SortedIndex<i32> = [1, 2, 3, 4].into_iter().collect();
///
/// assert_eq!(index.indexes_of_elements_greater_than(&2), vec![2, 3]);
/// assert_eq!(index.indexes_of_elements_equal_or_between(&2, &3), Some(vec![1, 2]));
/// ```
#[derive(Debug, Clone)]
pub struct SortedIndex<E> {
    /// Values in source order.
    values: Vec<E>,
    /// Source positions ordered by value.
    sorted: Vec<usize>,
}

impl<E> Default for SortedIndex<E> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            sorted: Vec::new(),
        }
    }
}

impl<E> SortedIndex<E> {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            sorted: Vec::with_capacity(capacity),
        }
    }

    /// Number of indexed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a source position.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&E> {
        self.values.get(position)
    }

    /// Values in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.values.iter()
    }

    /// `(source_position, value)` pairs in ascending value order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (usize, &E)> + '_ {
        self.sorted
            .iter()
            .map(move |&position| (position, &self.values[position]))
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.values.clear();
        self.sorted.clear();
    }

    /// Shifts back-pointers `>= from` up by one.
    fn shift_up(&mut self, from: usize) {
        for position in &mut self.sorted {
            if *position >= from {
                *position += 1;
            }
        }
    }

    /// Shifts back-pointers `> removed` down by one.
    fn shift_down(&mut self, removed: usize) {
        for position in &mut self.sorted {
            if *position > removed {
                *position -= 1;
            }
        }
    }
}

impl<E: Ord> SortedIndex<E> {
    /// First sorted position whose value is `>= value`.
    fn lower_bound(&self, value: &E) -> usize {
        self.sorted
            .partition_point(|&position| self.values[position].cmp(value) == Ordering::Less)
    }

    /// First sorted position whose value is `> value`.
    ///
    /// This is the earliest position where `compare(current, value) > 0` and
    /// `compare(previous, value) <= 0`.
    #[must_use]
    pub fn first_greater_position(&self, value: &E) -> usize {
        self.sorted
            .partition_point(|&position| self.values[position].cmp(value) != Ordering::Greater)
    }

    /// Last sorted position whose value is `< value`, if any.
    #[must_use]
    pub fn last_less_position(&self, value: &E) -> Option<usize> {
        self.lower_bound(value).checked_sub(1)
    }

    /// Sorted positions holding values equal to `value`.
    fn equal_run(&self, value: &E) -> &[usize] {
        let start = self.lower_bound(value);
        let end = self.first_greater_position(value);
        &self.sorted[start..end]
    }

    /// Sorted position of the projection entry pointing at `position`.
    fn projection_slot(&self, position: usize) -> Option<usize> {
        let value = self.values.get(position)?;
        let start = self.lower_bound(value);
        let end = self.first_greater_position(value);
        let offset = self.sorted[start..end]
            .iter()
            .position(|&candidate| candidate == position);
        debug_assert!(offset.is_some(), "position {position} missing from projection");
        offset.map(|offset| start + offset)
    }

    /// Appends a value to the source list and indexes it.
    ///
    /// The projection entry goes before any equal values already indexed.
    pub fn add(&mut self, element: E) {
        let position = self.values.len();
        let at = self.lower_bound(&element);
        self.values.push(element);
        self.sorted.insert(at, position);
        debug_assert_eq!(self.values.len(), self.sorted.len());
    }

    /// Inserts a value at source `position`, shifting later positions up.
    ///
    /// # Panics
    ///
    /// Panics if `position > len`, like [`Vec::insert`].
    pub fn insert(&mut self, position: usize, element: E) {
        assert!(
            position <= self.values.len(),
            "insertion position {position} exceeds length {}",
            self.values.len()
        );
        self.shift_up(position);
        self.values.insert(position, element);
        let at = self.lower_bound(&self.values[position]);
        self.sorted.insert(at, position);
        debug_assert_eq!(self.values.len(), self.sorted.len());
    }

    /// Replaces the value at `position`, returning the old one.
    ///
    /// Returns `None` and leaves the index untouched if `position` is out of range.
    pub fn set(&mut self, position: usize, element: E) -> Option<E> {
        let slot = self.projection_slot(position)?;
        self.sorted.remove(slot);
        let previous = std::mem::replace(&mut self.values[position], element);
        let at = self.lower_bound(&self.values[position]);
        self.sorted.insert(at, position);
        Some(previous)
    }

    /// Lowest source position holding `element`.
    #[must_use]
    pub fn index_of(&self, element: &E) -> Option<usize> {
        self.equal_run(element).iter().copied().min()
    }

    /// Highest source position holding `element`.
    #[must_use]
    pub fn last_index_of(&self, element: &E) -> Option<usize> {
        self.equal_run(element).iter().copied().max()
    }

    /// Every source position holding `element`, ascending.
    #[must_use]
    pub fn indexes_of(&self, element: &E) -> Vec<usize> {
        let mut positions = self.equal_run(element).to_vec();
        positions.sort_unstable();
        positions
    }

    /// Returns true if `element` is indexed.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        !self.equal_run(element).is_empty()
    }

    /// Source positions of values strictly greater than `value`, in value order.
    #[must_use]
    pub fn indexes_of_elements_greater_than(&self, value: &E) -> Vec<usize> {
        self.sorted[self.first_greater_position(value)..].to_vec()
    }

    /// Source positions of values strictly less than `value`, in value order.
    #[must_use]
    pub fn indexes_of_elements_less_than(&self, value: &E) -> Vec<usize> {
        match self.last_less_position(value) {
            Some(last) => self.sorted[..=last].to_vec(),
            None => Vec::new(),
        }
    }

    /// Source positions of values with `low <= value <= high`, in value order.
    ///
    /// Returns `None` when no value qualifies.
    #[must_use]
    pub fn indexes_of_elements_equal_or_between(&self, low: &E, high: &E) -> Option<Vec<usize>> {
        let start = self.last_less_position(low).map_or(0, |last| last + 1);
        let end = self.first_greater_position(high);
        if start >= end {
            return None;
        }
        Some(self.sorted[start..end].to_vec())
    }

    /// Removes the first occurrence (lowest source position) of `element`.
    pub fn remove(&mut self, element: &E) -> bool {
        match self.index_of(element) {
            Some(position) => self.remove_at(position).is_some(),
            None => false,
        }
    }

    /// Removes the value at source `position`, shifting later positions down.
    pub fn remove_at(&mut self, position: usize) -> Option<E> {
        let slot = self.projection_slot(position)?;
        self.sorted.remove(slot);
        let removed = self.values.remove(position);
        self.shift_down(position);
        debug_assert_eq!(self.values.len(), self.sorted.len());
        Some(removed)
    }
}

impl<E: Ord> FromIterator<E> for SortedIndex<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<E: Ord> Extend<E> for SortedIndex<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}
