//! The optimistic command dispatcher.
//!
//! Every mutation follows the same shape: apply locally first so the UI
//! never waits on the network, then await the server call, then undo the
//! local change if the server refused it.

use storyloom_core::outline::{auto_child_kind, word_count, DEFAULT_STATUS};
use storyloom_core::types::DbId;

use crate::api::{CreateNode, OutlineApi, OutlineNode, UpdateNode};
use crate::drag::resolve_drag;
use crate::error::{OutlineError, OutlineResult};
use crate::state::OutlineState;

/// Drives one project's outline against an [`OutlineApi`] transport.
pub struct OutlineEngine<A> {
    api: A,
    project_id: DbId,
    state: OutlineState,
    drag_mode: bool,
}

impl<A: OutlineApi> OutlineEngine<A> {
    pub fn new(api: A, project_id: DbId) -> Self {
        Self {
            api,
            project_id,
            state: OutlineState::new(),
            drag_mode: false,
        }
    }

    pub fn state(&self) -> &OutlineState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut OutlineState {
        &mut self.state
    }

    /// Whether drags currently resolve to reorders.
    pub fn drag_mode(&self) -> bool {
        self.drag_mode
    }

    pub fn set_drag_mode(&mut self, enabled: bool) {
        self.drag_mode = enabled;
    }

    /// Discard local state and reload the tree from the server.
    pub async fn refresh(&mut self) -> OutlineResult<()> {
        let nodes = self.api.list(self.project_id).await?;
        self.state.load(nodes);
        Ok(())
    }

    /// Create a node optimistically.
    ///
    /// A temp node with a negative id appears immediately (and its parent
    /// is expanded so it is visible); on success the temp node is swapped
    /// for the server row, on failure it is removed. When the server also
    /// auto-creates a child, the tree is refreshed to pick it up.
    pub async fn create(&mut self, input: CreateNode) -> OutlineResult<DbId> {
        let temp_id = self.state.allocate_temp_id();
        let sort_order = input.sort_order.unwrap_or_else(|| {
            self.state
                .sibling_ids(input.parent_id, &input.kind)
                .last()
                .and_then(|&id| self.state.get(id))
                .map(|last| last.sort_order + 1)
                .unwrap_or(1)
        });
        let temp = OutlineNode {
            id: temp_id,
            project_id: input.project_id,
            title: input.title.clone(),
            kind: input.kind.clone(),
            parent_id: input.parent_id,
            sort_order,
            status: DEFAULT_STATUS.to_string(),
            summary: None,
            content: input.content.clone(),
            word_count: input.content.as_deref().map(word_count).unwrap_or(0),
        };
        self.state.insert(temp);
        if let Some(parent) = input.parent_id {
            self.state.expand(parent);
        }

        match self.api.create(&input).await {
            Ok(node) => {
                let id = node.id;
                self.state.replace(temp_id, node);
                if input.auto_create_children && auto_child_kind(&input.kind).is_some() {
                    // The server created a placeholder child we have not
                    // seen yet.
                    self.refresh().await?;
                }
                Ok(id)
            }
            Err(err) => {
                self.state.remove(temp_id);
                Err(err)
            }
        }
    }

    /// Partially update a node optimistically.
    pub async fn update(&mut self, id: DbId, patch: UpdateNode) -> OutlineResult<()> {
        if !self.state.contains(id) {
            return Err(OutlineError::NodeNotFound(id));
        }
        let snapshot = self.state.snapshot();
        self.apply_patch_locally(id, &patch);

        match self.api.update(id, &patch).await {
            Ok(node) => {
                // Adopt the server row as the source of truth (word count,
                // timestamps and anything the patch did not carry).
                self.state.remove(id);
                self.state.insert(node);
                Ok(())
            }
            Err(err) => {
                self.state.restore(snapshot);
                Err(err)
            }
        }
    }

    fn apply_patch_locally(&mut self, id: DbId, patch: &UpdateNode) {
        let Some(mut node) = self.state.remove(id) else {
            return;
        };
        if let Some(title) = &patch.title {
            node.title = title.clone();
        }
        if let Some(order) = patch.sort_order {
            node.sort_order = order;
        }
        if let Some(parent) = patch.parent_id {
            node.parent_id = parent;
        }
        if let Some(status) = &patch.status {
            node.status = status.clone();
        }
        if let Some(content) = &patch.content {
            node.word_count = word_count(content);
            node.content = Some(content.clone());
        }
        self.state.insert(node);
    }

    /// Delete a node and its whole subtree optimistically.
    ///
    /// The local subtree vanishes at once; remote deletes run leaf-first
    /// (children strictly before parents) because the server refuses to
    /// delete a node that still has children. Any remote failure restores
    /// the pre-delete snapshot.
    pub async fn delete(&mut self, id: DbId) -> OutlineResult<()> {
        if !self.state.contains(id) {
            return Err(OutlineError::NodeNotFound(id));
        }
        let snapshot = self.state.snapshot();
        let order = self.state.subtree_leaf_first(id);
        for &node_id in &order {
            self.state.remove(node_id);
        }

        for &node_id in &order {
            // Temp nodes have no server row to delete.
            if node_id < 0 {
                continue;
            }
            if let Err(err) = self.api.delete(node_id).await {
                tracing::warn!(node_id, error = %err, "subtree delete failed, rolling back");
                self.state.restore(snapshot);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Reorder within a (parent, kind) sibling group: move the element at
    /// `from` to `to` and renumber the group 1-based.
    ///
    /// Order values are applied locally, then pushed as concurrent partial
    /// updates. If any update fails, local optimism is discarded by
    /// refetching the whole tree.
    pub async fn reorder(
        &mut self,
        parent_id: Option<DbId>,
        kind: &str,
        from: usize,
        to: usize,
    ) -> OutlineResult<()> {
        let sibling_ids = self.state.sibling_ids(parent_id, kind);
        let current: Vec<(DbId, i32)> = sibling_ids
            .iter()
            .filter_map(|&id| self.state.get(id).map(|n| (id, n.sort_order)))
            .collect();
        let changes = storyloom_core::reorder::reorder(sibling_ids, &current, from, to);
        if changes.is_empty() {
            return Ok(());
        }

        for &(id, order) in &changes {
            self.state.set_order(id, order);
        }

        let api = &self.api;
        let updates = changes.iter().map(|&(id, order)| {
            let patch = UpdateNode {
                sort_order: Some(order),
                ..Default::default()
            };
            async move { api.update(id, &patch).await }
        });
        let results = futures::future::join_all(updates).await;

        if let Some(err) = results.into_iter().find_map(Result::err) {
            tracing::warn!(error = %err, "reorder batch failed, resyncing from server");
            self.refresh().await?;
            return Err(err);
        }
        Ok(())
    }

    /// Handle a drag-and-drop drop event.
    ///
    /// Returns `Ok(false)` without touching anything when drag mode is
    /// off or the drop does not resolve to a same-group reorder.
    pub async fn drag(&mut self, active_id: DbId, over_id: DbId) -> OutlineResult<bool> {
        if !self.drag_mode {
            return Ok(false);
        }
        let Some(plan) = resolve_drag(&self.state, active_id, over_id) else {
            return Ok(false);
        };
        self.reorder(plan.parent_id, &plan.kind, plan.from, plan.to)
            .await?;
        Ok(true)
    }
}
