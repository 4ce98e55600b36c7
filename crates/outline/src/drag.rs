//! Drag resolution: turning a (dragged, dropped-over) node pair into a
//! sibling reorder plan.
//!
//! Only same-parent, same-kind moves are reorders; anything else resolves
//! to `None` and the drop is ignored before any mutation happens.

use storyloom_core::types::DbId;

use crate::state::OutlineState;

/// A validated reorder within one sibling group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPlan {
    pub parent_id: Option<DbId>,
    pub kind: String,
    /// The sibling group, order ascending, before the move.
    pub sibling_ids: Vec<DbId>,
    /// Index of the dragged node within `sibling_ids`.
    pub from: usize,
    /// Index of the node it was dropped over.
    pub to: usize,
}

/// Resolve a drop into a reorder plan.
///
/// Returns `None` when either id is unknown, the nodes differ in parent or
/// kind, or the drop lands on the dragged node itself.
pub fn resolve_drag(state: &OutlineState, active_id: DbId, over_id: DbId) -> Option<DragPlan> {
    if active_id == over_id {
        return None;
    }
    let active = state.get(active_id)?;
    let over = state.get(over_id)?;
    if active.parent_id != over.parent_id || active.kind != over.kind {
        return None;
    }

    let sibling_ids = state.sibling_ids(active.parent_id, &active.kind);
    let from = sibling_ids.iter().position(|&id| id == active_id)?;
    let to = sibling_ids.iter().position(|&id| id == over_id)?;

    Some(DragPlan {
        parent_id: active.parent_id,
        kind: active.kind.clone(),
        sibling_ids,
        from,
        to,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OutlineNode;

    fn node(id: DbId, parent_id: Option<DbId>, kind: &str, sort_order: i32) -> OutlineNode {
        OutlineNode {
            id,
            project_id: 1,
            title: format!("node {id}"),
            kind: kind.to_string(),
            parent_id,
            sort_order,
            status: "planned".to_string(),
            summary: None,
            content: None,
            word_count: 0,
        }
    }

    fn state() -> OutlineState {
        let mut state = OutlineState::new();
        state.load(vec![
            node(1, None, "chapter", 1),
            node(2, None, "chapter", 2),
            node(3, None, "chapter", 3),
            node(4, Some(1), "scene", 1),
            node(5, None, "book", 4),
        ]);
        state
    }

    #[test]
    fn same_group_drop_resolves() {
        let plan = resolve_drag(&state(), 3, 1).unwrap();
        assert_eq!(plan.sibling_ids, vec![1, 2, 3]);
        assert_eq!(plan.from, 2);
        assert_eq!(plan.to, 0);
    }

    #[test]
    fn cross_parent_drop_is_rejected() {
        assert!(resolve_drag(&state(), 4, 2).is_none());
    }

    #[test]
    fn cross_kind_drop_is_rejected() {
        assert!(resolve_drag(&state(), 5, 1).is_none());
    }

    #[test]
    fn unknown_or_self_drop_is_rejected() {
        assert!(resolve_drag(&state(), 1, 99).is_none());
        assert!(resolve_drag(&state(), 99, 1).is_none());
        assert!(resolve_drag(&state(), 1, 1).is_none());
    }
}
