//! Local mirror of a project's outline tree.
//!
//! Nodes live in an id-keyed arena with a parent-to-children index kept
//! sorted the way the server lists siblings (`order` ascending, id as the
//! tie-break). Optimistic nodes get negative temporary ids so they can
//! never collide with server rows.

use std::collections::{HashMap, HashSet};

use storyloom_core::hierarchy::{build_complete, build_simplified, TreeNode};
use storyloom_core::types::DbId;

use crate::api::OutlineNode;

/// How the outline is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The full five-level tree.
    Complete,
    /// Chapters as roots with only their direct scenes.
    Simplified,
}

/// A restorable copy of the whole tree state.
#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: HashMap<DbId, OutlineNode>,
    children: HashMap<Option<DbId>, Vec<DbId>>,
    expanded: HashSet<DbId>,
}

/// The engine's in-memory outline.
#[derive(Debug, Clone)]
pub struct OutlineState {
    nodes: HashMap<DbId, OutlineNode>,
    children: HashMap<Option<DbId>, Vec<DbId>>,
    expanded: HashSet<DbId>,
    next_temp_id: DbId,
}

impl Default for OutlineState {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineState {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            children: HashMap::new(),
            expanded: HashSet::new(),
            next_temp_id: -1,
        }
    }

    /// Replace the whole tree with a fresh server listing. Expansion flags
    /// are kept for nodes that still exist.
    pub fn load(&mut self, nodes: Vec<OutlineNode>) {
        self.nodes.clear();
        self.children.clear();
        for node in nodes {
            self.insert(node);
        }
        self.expanded.retain(|id| self.nodes.contains_key(id));
    }

    pub fn get(&self, id: DbId) -> Option<&OutlineNode> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node and index it under its parent.
    pub fn insert(&mut self, node: OutlineNode) {
        let id = node.id;
        let parent = node.parent_id;
        self.nodes.insert(id, node);
        let bucket = self.children.entry(parent).or_default();
        if !bucket.contains(&id) {
            bucket.push(id);
        }
        self.resort_bucket(parent);
    }

    /// Remove a single node. Its children (if any) stay indexed under the
    /// removed id; subtree removal goes through [`Self::subtree_leaf_first`].
    pub fn remove(&mut self, id: DbId) -> Option<OutlineNode> {
        let node = self.nodes.remove(&id)?;
        if let Some(bucket) = self.children.get_mut(&node.parent_id) {
            bucket.retain(|&child| child != id);
        }
        self.expanded.remove(&id);
        Some(node)
    }

    /// Direct children of `parent` (`None` for roots), order ascending.
    pub fn children_of(&self, parent: Option<DbId>) -> &[DbId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sibling ids sharing both parent and kind, order ascending. This is
    /// the reorder group.
    pub fn sibling_ids(&self, parent: Option<DbId>, kind: &str) -> Vec<DbId> {
        self.children_of(parent)
            .iter()
            .copied()
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.kind == kind))
            .collect()
    }

    /// The subtree rooted at `root` with children strictly before parents
    /// (`root` last). Empty when the root is unknown.
    pub fn subtree_leaf_first(&self, root: DbId) -> Vec<DbId> {
        if !self.contains(root) {
            return Vec::new();
        }
        let mut out = Vec::new();
        self.collect_post_order(root, &mut out);
        out
    }

    fn collect_post_order(&self, id: DbId, out: &mut Vec<DbId>) {
        for child in self.children_of(Some(id)).to_vec() {
            self.collect_post_order(child, out);
        }
        out.push(id);
    }

    /// Allocate a fresh negative id for an optimistic node.
    pub fn allocate_temp_id(&mut self) -> DbId {
        let id = self.next_temp_id;
        self.next_temp_id -= 1;
        id
    }

    /// Swap an optimistic temp node for the server row, carrying over the
    /// expansion flag.
    pub fn replace(&mut self, temp_id: DbId, node: OutlineNode) {
        let was_expanded = self.expanded.contains(&temp_id);
        self.remove(temp_id);
        let id = node.id;
        self.insert(node);
        if was_expanded {
            self.expanded.insert(id);
        }
    }

    /// Apply a new order value to a node and re-sort its sibling bucket.
    pub fn set_order(&mut self, id: DbId, order: i32) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.sort_order = order;
        let parent = node.parent_id;
        self.resort_bucket(parent);
    }

    fn resort_bucket(&mut self, parent: Option<DbId>) {
        if let Some(bucket) = self.children.get_mut(&parent) {
            let nodes = &self.nodes;
            bucket.sort_by_key(|id| {
                nodes
                    .get(id)
                    .map(|n| (n.sort_order, n.id))
                    .unwrap_or((i32::MAX, *id))
            });
        }
    }

    // -- Expansion --

    pub fn expand(&mut self, id: DbId) {
        if self.contains(id) {
            self.expanded.insert(id);
        }
    }

    pub fn collapse(&mut self, id: DbId) {
        self.expanded.remove(&id);
    }

    pub fn toggle(&mut self, id: DbId) {
        if self.expanded.contains(&id) {
            self.collapse(id);
        } else {
            self.expand(id);
        }
    }

    pub fn is_expanded(&self, id: DbId) -> bool {
        self.expanded.contains(&id)
    }

    // -- Snapshots --

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            children: self.children.clone(),
            expanded: self.expanded.clone(),
        }
    }

    /// Restore a snapshot. The temp-id counter is deliberately not rolled
    /// back so restored and future temp nodes cannot collide.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.children = snapshot.children;
        self.expanded = snapshot.expanded;
    }

    // -- Rendering --

    /// Build the render forest for the given view mode.
    pub fn forest(&self, mode: ViewMode) -> Vec<TreeNode<OutlineNode>> {
        let mut items: Vec<OutlineNode> = self.nodes.values().cloned().collect();
        // Deterministic input order so equal-order ties never depend on
        // hash iteration.
        items.sort_by_key(|n| (n.sort_order, n.id));
        match mode {
            ViewMode::Complete => build_complete(items),
            ViewMode::Simplified => build_simplified(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn children_sorted_by_order() {
        let mut state = OutlineState::new();
        state.load(vec![
            node(1, None, "chapter", 2),
            node(2, None, "chapter", 1),
            node(3, Some(2), "scene", 1),
        ]);
        assert_eq!(state.children_of(None), &[2, 1]);
        assert_eq!(state.children_of(Some(2)), &[3]);
    }

    #[test]
    fn sibling_ids_filter_by_kind() {
        let mut state = OutlineState::new();
        state.load(vec![
            node(1, None, "chapter", 1),
            node(2, None, "book", 2),
            node(3, None, "chapter", 3),
        ]);
        assert_eq!(state.sibling_ids(None, "chapter"), vec![1, 3]);
    }

    #[test]
    fn subtree_leaf_first_lists_children_before_parents() {
        let mut state = OutlineState::new();
        state.load(vec![
            node(1, None, "chapter", 1),
            node(2, Some(1), "scene", 1),
            node(3, Some(1), "scene", 2),
            node(4, Some(2), "beat", 1),
        ]);
        let order = state.subtree_leaf_first(1);
        assert_eq!(order.last(), Some(&1));
        let pos = |id: DbId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(4) < pos(2));
        assert!(pos(2) < pos(1));
        assert!(pos(3) < pos(1));
    }

    #[test]
    fn temp_ids_are_negative_and_unique() {
        let mut state = OutlineState::new();
        let a = state.allocate_temp_id();
        let b = state.allocate_temp_id();
        assert!(a < 0 && b < 0);
        assert_ne!(a, b);
    }

    #[test]
    fn snapshot_restore_round_trips() {
        let mut state = OutlineState::new();
        state.load(vec![node(1, None, "chapter", 1)]);
        state.expand(1);
        let snapshot = state.snapshot();

        state.remove(1);
        assert!(state.is_empty());

        state.restore(snapshot);
        assert!(state.contains(1));
        assert!(state.is_expanded(1));
    }

    #[test]
    fn set_order_resorts_siblings() {
        let mut state = OutlineState::new();
        state.load(vec![
            node(1, None, "chapter", 1),
            node(2, None, "chapter", 2),
        ]);
        state.set_order(2, 0);
        assert_eq!(state.children_of(None), &[2, 1]);
    }

    #[test]
    fn forest_renders_both_modes() {
        let mut state = OutlineState::new();
        state.load(vec![
            node(1, None, "book", 1),
            node(2, Some(1), "part", 1),
            node(3, Some(2), "chapter", 1),
            node(4, Some(3), "scene", 1),
        ]);
        let complete = state.forest(ViewMode::Complete);
        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].item.id, 1);

        let simplified = state.forest(ViewMode::Simplified);
        assert_eq!(simplified.len(), 1);
        assert_eq!(simplified[0].item.id, 3);
        assert_eq!(simplified[0].children[0].item.id, 4);
    }
}
