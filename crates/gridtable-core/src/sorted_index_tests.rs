//! Tests for `sorted_index` module

#[cfg(test)]
mod tests {
    use crate::sorted_index::*;

    fn index_of_values(values: &[i32]) -> SortedIndex<i32> {
        values.iter().copied().collect()
    }

    // =========================================================================
    // add / lookup
    // =========================================================================

    #[test]
    fn test_new_index_is_empty() {
        // Arrange & Act
        let index: SortedIndex<i32> = SortedIndex::new();

        // Assert
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.index_of(&1), None);
        assert!(index.indexes_of_elements_greater_than(&1).is_empty());
        assert_eq!(index.indexes_of_elements_equal_or_between(&0, &10), None);
    }

    #[test]
    fn test_add_keeps_source_order() {
        // Arrange & Act
        let index = index_of_values(&[30, 10, 20]);

        // Assert
        assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![30, 10, 20]);
        assert_eq!(index.get(1), Some(&10));
        assert_eq!(index.get(3), None);
    }

    #[test]
    fn test_iter_sorted_orders_by_value() {
        // Arrange
        let index = index_of_values(&[30, 10, 20, 10]);

        // Act
        let sorted: Vec<i32> = index.iter_sorted().map(|(_, v)| *v).collect();

        // Assert
        assert_eq!(sorted, vec![10, 10, 20, 30]);
    }

    #[test]
    fn test_equal_values_tie_break() {
        // Arrange
        let index = index_of_values(&[5, 5, 5]);

        // Act & Assert
        assert_eq!(index.index_of(&5), Some(0));
        assert_eq!(index.last_index_of(&5), Some(2));
        assert_eq!(index.indexes_of(&5), vec![0, 1, 2]);
    }

    #[test]
    fn test_index_of_absent_value() {
        // Arrange
        let index = index_of_values(&[1, 3, 5]);

        // Act & Assert
        assert_eq!(index.index_of(&4), None);
        assert_eq!(index.last_index_of(&4), None);
        assert!(index.indexes_of(&4).is_empty());
        assert!(!index.contains(&4));
        assert!(index.contains(&3));
    }

    #[test]
    fn test_duplicates_among_other_values() {
        // Arrange
        let index = index_of_values(&[7, 2, 7, 9, 2, 7]);

        // Act & Assert
        assert_eq!(index.index_of(&7), Some(0));
        assert_eq!(index.last_index_of(&7), Some(5));
        assert_eq!(index.indexes_of(&7), vec![0, 2, 5]);
        assert_eq!(index.indexes_of(&2), vec![1, 4]);
    }

    // =========================================================================
    // Binary search boundaries
    // =========================================================================

    #[test]
    fn test_first_greater_position_boundaries() {
        // Arrange - sorted projection: 1, 2, 2, 2, 3
        let index = index_of_values(&[2, 1, 2, 3, 2]);

        // Act & Assert
        assert_eq!(index.first_greater_position(&0), 0);
        assert_eq!(index.first_greater_position(&1), 1);
        assert_eq!(index.first_greater_position(&2), 4);
        assert_eq!(index.first_greater_position(&3), 5);
        assert_eq!(index.first_greater_position(&4), 5);
    }

    #[test]
    fn test_last_less_position_boundaries() {
        // Arrange - sorted projection: 1, 2, 2, 2, 3
        let index = index_of_values(&[2, 1, 2, 3, 2]);

        // Act & Assert
        assert_eq!(index.last_less_position(&0), None);
        assert_eq!(index.last_less_position(&1), None);
        assert_eq!(index.last_less_position(&2), Some(0));
        assert_eq!(index.last_less_position(&3), Some(3));
        assert_eq!(index.last_less_position(&4), Some(4));
    }

    // =========================================================================
    // Range queries
    // =========================================================================

    #[test]
    fn test_greater_than_excludes_equal() {
        // Arrange
        let index = index_of_values(&[1, 2, 3, 4]);

        // Act
        let result = index.indexes_of_elements_greater_than(&2);

        // Assert
        assert_eq!(result, vec![2, 3]);
    }

    #[test]
    fn test_greater_than_with_duplicates_at_boundary() {
        // Arrange
        let index = index_of_values(&[3, 2, 3, 1, 2]);

        // Act
        let mut result = index.indexes_of_elements_greater_than(&2);
        result.sort_unstable();

        // Assert
        assert_eq!(result, vec![0, 2]);
    }

    #[test]
    fn test_less_than_excludes_equal() {
        // Arrange
        let index = index_of_values(&[4, 3, 2, 1]);

        // Act
        let result = index.indexes_of_elements_less_than(&3);

        // Assert - value order: 1 (pos 3), 2 (pos 2)
        assert_eq!(result, vec![3, 2]);
    }

    #[test]
    fn test_less_than_smallest_is_empty() {
        // Arrange
        let index = index_of_values(&[4, 3, 2, 1]);

        // Act & Assert
        assert!(index.indexes_of_elements_less_than(&1).is_empty());
        assert_eq!(index.indexes_of_elements_less_than(&100).len(), 4);
    }

    #[test]
    fn test_between_is_inclusive() {
        // Arrange
        let index = index_of_values(&[10, 20, 30, 40, 50]);

        // Act
        let result = index.indexes_of_elements_equal_or_between(&20, &40);

        // Assert
        assert_eq!(result, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_between_with_duplicate_bounds() {
        // Arrange
        let index = index_of_values(&[2, 1, 2, 3, 3, 4]);

        // Act
        let mut result = index.indexes_of_elements_equal_or_between(&2, &3).unwrap();
        result.sort_unstable();

        // Assert
        assert_eq!(result, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_between_with_no_match_is_none() {
        // Arrange
        let index = index_of_values(&[1, 2, 8, 9]);

        // Act & Assert
        assert_eq!(index.indexes_of_elements_equal_or_between(&3, &7), None);
        assert_eq!(index.indexes_of_elements_equal_or_between(&5, &4), None);
        assert_eq!(index.indexes_of_elements_equal_or_between(&10, &20), None);
    }

    #[test]
    fn test_between_single_point() {
        // Arrange
        let index = index_of_values(&[1, 2, 8, 9]);

        // Act & Assert
        assert_eq!(index.indexes_of_elements_equal_or_between(&8, &8), Some(vec![2]));
    }

    // =========================================================================
    // Nulls
    // =========================================================================

    #[test]
    fn test_nulls_sort_first_and_compare_equal() {
        // Arrange
        let index: SortedIndex<Option<i32>> = [Some(3), None, Some(1), None].into_iter().collect();

        // Act & Assert
        assert_eq!(index.indexes_of(&None), vec![1, 3]);
        assert_eq!(index.indexes_of_elements_less_than(&Some(1)), vec![3, 1]);
        assert_eq!(index.indexes_of_elements_greater_than(&None), vec![2, 0]);
    }

    // =========================================================================
    // Structural edits
    // =========================================================================

    #[test]
    fn test_remove_by_value_takes_lowest_position() {
        // Arrange
        let mut index = index_of_values(&[5, 1, 5, 2]);

        // Act
        let removed = index.remove(&5);

        // Assert
        assert!(removed);
        assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![1, 5, 2]);
        assert_eq!(index.indexes_of(&5), vec![1]);
        assert_eq!(index.index_of(&2), Some(2));
    }

    #[test]
    fn test_remove_absent_value_is_false() {
        // Arrange
        let mut index = index_of_values(&[1, 2]);

        // Act & Assert
        assert!(!index.remove(&3));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_remove_at_shifts_back_pointers() {
        // Arrange
        let mut index = index_of_values(&[10, 20, 30, 40]);

        // Act
        let removed = index.remove_at(1);

        // Assert
        assert_eq!(removed, Some(20));
        assert_eq!(index.index_of(&30), Some(1));
        assert_eq!(index.index_of(&40), Some(2));
        assert_eq!(index.indexes_of_elements_greater_than(&10), vec![1, 2]);
        assert_eq!(index.remove_at(3), None);
    }

    #[test]
    fn test_insert_shifts_back_pointers() {
        // Arrange
        let mut index = index_of_values(&[10, 30]);

        // Act
        index.insert(0, 20);

        // Assert
        assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![20, 10, 30]);
        assert_eq!(index.index_of(&10), Some(1));
        assert_eq!(index.index_of(&30), Some(2));
        assert_eq!(index.indexes_of_elements_equal_or_between(&15, &35), Some(vec![0, 2]));
    }

    #[test]
    #[should_panic(expected = "exceeds length")]
    fn test_insert_past_end_panics() {
        let mut index = index_of_values(&[1]);
        index.insert(3, 2);
    }

    #[test]
    fn test_set_relocates_entry() {
        // Arrange
        let mut index = index_of_values(&[1, 2, 3]);

        // Act
        let previous = index.set(0, 10);

        // Assert
        assert_eq!(previous, Some(1));
        assert_eq!(index.indexes_of_elements_greater_than(&3), vec![0]);
        assert_eq!(index.index_of(&1), None);
        assert_eq!(index.set(9, 0), None);
    }

    #[test]
    fn test_clear_empties_index() {
        // Arrange
        let mut index = index_of_values(&[1, 2, 3]);

        // Act
        index.clear();

        // Assert
        assert!(index.is_empty());
        assert_eq!(index.index_of(&1), None);
    }

    // =========================================================================
    // Property-based tests with proptest
    // =========================================================================

    mod proptest_tests {
        use crate::sorted_index::SortedIndex;
        use proptest::prelude::*;

        fn brute_force(values: &[i16], keep: impl Fn(i16) -> bool) -> Vec<usize> {
            values
                .iter()
                .enumerate()
                .filter(|&(_, &v)| keep(v))
                .map(|(position, _)| position)
                .collect()
        }

        fn sorted(mut positions: Vec<usize>) -> Vec<usize> {
            positions.sort_unstable();
            positions
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(128))]

            /// Property: inclusive range returns exactly the qualifying positions.
            #[test]
            fn prop_between_matches_brute_force(
                values in proptest::collection::vec(-20i16..20, 0..60),
                a in -25i16..25,
                b in -25i16..25,
            ) {
                let (low, high) = (a.min(b), a.max(b));
                let index: SortedIndex<i16> = values.iter().copied().collect();

                let expected = brute_force(&values, |v| low <= v && v <= high);
                let actual = index
                    .indexes_of_elements_equal_or_between(&low, &high)
                    .map(sorted)
                    .unwrap_or_default();

                prop_assert_eq!(actual, expected);
            }

            /// Property: strict comparisons match brute force.
            #[test]
            fn prop_strict_ranges_match_brute_force(
                values in proptest::collection::vec(-20i16..20, 0..60),
                pivot in -25i16..25,
            ) {
                let index: SortedIndex<i16> = values.iter().copied().collect();

                prop_assert_eq!(
                    sorted(index.indexes_of_elements_greater_than(&pivot)),
                    brute_force(&values, |v| v > pivot)
                );
                prop_assert_eq!(
                    sorted(index.indexes_of_elements_less_than(&pivot)),
                    brute_force(&values, |v| v < pivot)
                );
            }

            /// Property: back-pointers stay valid through removals and inserts.
            #[test]
            fn prop_edits_keep_back_pointers_valid(
                values in proptest::collection::vec(-10i16..10, 1..40),
                edits in proptest::collection::vec((any::<bool>(), 0usize..50, -10i16..10), 0..40),
            ) {
                let mut index: SortedIndex<i16> = values.iter().copied().collect();
                let mut model = values.clone();

                for (insert, at, v) in edits {
                    if insert {
                        let at = at % (model.len() + 1);
                        index.insert(at, v);
                        model.insert(at, v);
                    } else if !model.is_empty() {
                        let at = at % model.len();
                        prop_assert_eq!(index.remove_at(at), Some(model.remove(at)));
                    }
                }

                prop_assert_eq!(index.len(), model.len());
                prop_assert_eq!(index.iter().copied().collect::<Vec<_>>(), model.clone());
                for (position, value) in index.iter_sorted() {
                    prop_assert_eq!(model[position], *value);
                }
                for v in -10i16..10 {
                    prop_assert_eq!(index.indexes_of(&v), brute_force(&model, |m| m == v));
                    let first = model.iter().position(|&m| m == v);
                    prop_assert_eq!(index.index_of(&v), first);
                }
            }
        }
    }
}
