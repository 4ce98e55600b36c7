//! Sibling reorder math shared by the outline engine and its tests.
//!
//! A reorder is a standard array move over an ordered sibling list followed
//! by renumbering every sibling to its 1-based position. Keeping this pure
//! means the optimistic local apply and the batched server updates cannot
//! disagree on the resulting order values.

use crate::types::DbId;

/// Move the element at `from` to `to`, returning the new sibling sequence.
///
/// Out-of-range indices return the input unchanged.
pub fn array_move(mut ids: Vec<DbId>, from: usize, to: usize) -> Vec<DbId> {
    if from >= ids.len() || to >= ids.len() {
        return ids;
    }
    let id = ids.remove(from);
    ids.insert(to, id);
    ids
}

/// Assign 1-based order values to a sibling sequence.
pub fn renumber(ids: &[DbId]) -> Vec<(DbId, i32)> {
    ids.iter()
        .enumerate()
        .map(|(i, &id)| (id, i as i32 + 1))
        .collect()
}

/// Full reorder: move, then renumber, returning only the (id, order) pairs
/// whose order actually changed relative to `current_orders`.
pub fn reorder(
    ids: Vec<DbId>,
    current_orders: &[(DbId, i32)],
    from: usize,
    to: usize,
) -> Vec<(DbId, i32)> {
    let moved = array_move(ids, from, to);
    renumber(&moved)
        .into_iter()
        .filter(|assignment| !current_orders.contains(assignment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_move_matches_list_move_semantics() {
        assert_eq!(array_move(vec![1, 2, 3], 2, 0), vec![3, 1, 2]);
        assert_eq!(array_move(vec![1, 2, 3], 0, 2), vec![2, 3, 1]);
        assert_eq!(array_move(vec![1, 2, 3], 1, 1), vec![1, 2, 3]);
    }

    #[test]
    fn array_move_out_of_range_is_noop() {
        assert_eq!(array_move(vec![1, 2], 5, 0), vec![1, 2]);
        assert_eq!(array_move(vec![1, 2], 0, 5), vec![1, 2]);
    }

    #[test]
    fn renumber_is_one_based() {
        assert_eq!(renumber(&[7, 9, 8]), vec![(7, 1), (9, 2), (8, 3)]);
    }

    #[test]
    fn reorder_reports_only_changed_orders() {
        // Siblings 1,2,3 at orders 1,2,3; move position 2 to position 0.
        let changed = reorder(vec![1, 2, 3], &[(1, 1), (2, 2), (3, 3)], 2, 0);
        assert_eq!(changed, vec![(3, 1), (1, 2), (2, 3)]);

        // Moving an element onto itself changes nothing.
        let changed = reorder(vec![1, 2, 3], &[(1, 1), (2, 2), (3, 3)], 1, 1);
        assert!(changed.is_empty());
    }
}
