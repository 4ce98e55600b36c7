//! Flat-list to nested-tree conversion for outline rendering.
//!
//! Both presentation modes (complete 5-level tree, simplified
//! chapter/scene view) go through one generic builder so the ordering and
//! tie-break contract is implemented and tested exactly once. The builder
//! is parameterized by a parent selector (which id, if any, a node attaches
//! to in this mode) and an orphan policy (what happens when that parent is
//! not part of the input set).

use std::collections::HashMap;

use crate::types::DbId;

/// Minimal view of an outline node the builder needs.
///
/// Implemented by the db row struct server-side and the engine's local
/// node client-side.
pub trait OutlineItem {
    fn id(&self) -> DbId;
    fn parent_id(&self) -> Option<DbId>;
    fn kind(&self) -> &str;
    fn sort_order(&self) -> i32;
}

/// A node with its resolved children, sorted by `sort_order` ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<T> {
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// What to do with a node whose selected parent id does not resolve within
/// the input set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Surface the node as a pseudo-root (complete mode: nodes must never
    /// be silently lost when only part of a project is loaded).
    Promote,
    /// Omit the node entirely (simplified mode: a scene without its
    /// chapter has no slot to render in).
    Drop,
}

/// Build a forest from `items`.
///
/// `parent_of` selects the id a node attaches to in this mode; `None`
/// marks a root. Sibling lists and the root list are stable-sorted by
/// `sort_order` ascending, so equal orders keep their original input
/// positions.
pub fn build_forest<T, P>(items: Vec<T>, parent_of: P, orphans: OrphanPolicy) -> Vec<TreeNode<T>>
where
    T: OutlineItem,
    P: Fn(&T) -> Option<DbId>,
{
    let index_of: HashMap<DbId, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id(), i))
        .collect();

    let mut roots: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); items.len()];

    for (i, item) in items.iter().enumerate() {
        match parent_of(item) {
            None => roots.push(i),
            Some(pid) => match index_of.get(&pid) {
                Some(&p) => children[p].push(i),
                None => match orphans {
                    OrphanPolicy::Promote => roots.push(i),
                    OrphanPolicy::Drop => {}
                },
            },
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut forest = assemble(&mut slots, &children, &roots);
    sort_siblings(&mut forest);
    forest
}

/// Build the complete tree: every node attaches to its stored parent, and
/// nodes whose parent is outside the loaded set become pseudo-roots.
pub fn build_complete<T: OutlineItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    build_forest(items, |item| item.parent_id(), OrphanPolicy::Promote)
}

/// Build the simplified view: chapters are the roots and carry only their
/// direct scene children. Book, part and beat nodes are never surfaced.
pub fn build_simplified<T: OutlineItem>(items: Vec<T>) -> Vec<TreeNode<T>> {
    let items: Vec<T> = items
        .into_iter()
        .filter(|item| item.kind() == "chapter" || item.kind() == "scene")
        .collect();
    build_forest(
        items,
        |item| match item.kind() {
            "chapter" => None,
            _ => item.parent_id(),
        },
        OrphanPolicy::Drop,
    )
}

fn assemble<T>(
    slots: &mut Vec<Option<T>>,
    children: &[Vec<usize>],
    indices: &[usize],
) -> Vec<TreeNode<T>> {
    indices
        .iter()
        .map(|&i| {
            let kids = assemble(slots, children, &children[i]);
            let item = slots[i].take().expect("node assembled twice");
            TreeNode {
                item,
                children: kids,
            }
        })
        .collect()
}

fn sort_siblings<T: OutlineItem>(forest: &mut [TreeNode<T>]) {
    forest.sort_by_key(|node| node.item.sort_order());
    for node in forest {
        sort_siblings(&mut node.children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: DbId,
        parent_id: Option<DbId>,
        kind: &'static str,
        sort_order: i32,
    }

    impl OutlineItem for Item {
        fn id(&self) -> DbId {
            self.id
        }
        fn parent_id(&self) -> Option<DbId> {
            self.parent_id
        }
        fn kind(&self) -> &str {
            self.kind
        }
        fn sort_order(&self) -> i32 {
            self.sort_order
        }
    }

    fn item(id: DbId, parent_id: Option<DbId>, kind: &'static str, sort_order: i32) -> Item {
        Item {
            id,
            parent_id,
            kind,
            sort_order,
        }
    }

    /// Flatten a forest back to (id, parent) pairs, depth-first.
    fn flatten(forest: &[TreeNode<Item>], out: &mut Vec<(DbId, Option<DbId>)>) {
        for node in forest {
            out.push((node.item.id, node.item.parent_id));
            flatten(&node.children, out);
        }
    }

    #[test]
    fn complete_round_trip() {
        let items = vec![
            item(1, None, "book", 1),
            item(2, Some(1), "part", 1),
            item(3, Some(2), "chapter", 1),
            item(4, Some(2), "chapter", 2),
            item(5, Some(3), "scene", 1),
        ];
        let forest = build_complete(items.clone());
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].item.id, 1);
        assert_eq!(forest[0].children[0].item.id, 2);
        assert_eq!(forest[0].children[0].children.len(), 2);

        // Every input node survives with its parent link intact.
        let mut pairs = Vec::new();
        flatten(&forest, &mut pairs);
        assert_eq!(pairs.len(), items.len());
        for it in &items {
            assert!(pairs.contains(&(it.id, it.parent_id)));
        }
    }

    #[test]
    fn unresolved_parent_becomes_pseudo_root() {
        let items = vec![
            item(10, Some(99), "chapter", 1),
            item(11, Some(10), "scene", 1),
        ];
        let forest = build_complete(items);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].item.id, 10);
        assert_eq!(forest[0].children[0].item.id, 11);
    }

    #[test]
    fn siblings_sorted_by_order_ascending() {
        let items = vec![
            item(1, None, "chapter", 3),
            item(2, None, "chapter", 1),
            item(3, None, "chapter", 2),
        ];
        let forest = build_complete(items);
        let ids: Vec<DbId> = forest.iter().map(|n| n.item.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn equal_orders_keep_input_position() {
        let items = vec![
            item(7, None, "chapter", 1),
            item(8, None, "chapter", 1),
            item(9, None, "chapter", 1),
        ];
        let forest = build_complete(items);
        let ids: Vec<DbId> = forest.iter().map(|n| n.item.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn simplified_surfaces_only_chapters_and_scenes() {
        let items = vec![
            item(1, None, "book", 1),
            item(2, Some(1), "part", 1),
            item(3, Some(2), "chapter", 2),
            item(4, Some(2), "chapter", 1),
            item(5, Some(3), "scene", 1),
            item(6, Some(5), "beat", 1),
        ];
        let forest = build_simplified(items);
        let ids: Vec<DbId> = forest.iter().map(|n| n.item.id).collect();
        assert_eq!(ids, vec![4, 3], "chapters as roots, order ascending");
        assert_eq!(forest[1].children[0].item.id, 5);
        assert!(forest[1].children[0].children.is_empty(), "beats dropped");
    }

    #[test]
    fn simplified_drops_orphan_scenes() {
        let items = vec![
            item(1, None, "chapter", 1),
            item(2, Some(99), "scene", 1),
        ];
        let forest = build_simplified(items);
        assert_eq!(forest.len(), 1);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        let forest = build_complete(Vec::<Item>::new());
        assert!(forest.is_empty());
    }
}
