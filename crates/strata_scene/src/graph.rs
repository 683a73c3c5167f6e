//! Retained scene graph
//!
//! Arena-backed tree of scene nodes mutated by host-tree edits. Ownership
//! flows root to leaf through child lists; parents are non-owning arena
//! keys, so structural edits never fight the borrow checker and removed
//! subtrees are freed eagerly.

use slotmap::SlotMap;
use smallvec::SmallVec;
use strata_core::{Affine2D, PointerId, Vec2};

use crate::node::{NodeId, NodeKind, SceneNode};
use crate::props::{resolve_local_transform, NodeProps};

/// Ancestor chain from root to a node, inclusive
pub type AncestorChain = SmallVec<[NodeId; 8]>;

/// The retained scene graph for one container
#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: Option<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node
    pub fn create_node(&mut self, kind: NodeKind, props: NodeProps) -> NodeId {
        self.nodes.insert(SceneNode::new(kind, props))
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set, replace, or clear the root node
    ///
    /// A replaced (or cleared) root subtree is unreachable by any further
    /// edit op, so it is freed from the arena here, matching `remove_child`.
    /// The new root is detached first in case it lives inside the old tree.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        if let Some(id) = root {
            match self.nodes.get(id) {
                Some(node) => {
                    if node.kind != NodeKind::Root {
                        tracing::warn!(?id, kind = ?node.kind, "root node is not of Root kind");
                    }
                }
                None => {
                    tracing::warn!(?id, "set_root with unknown node");
                    return;
                }
            }
        }
        if self.root == root {
            return;
        }

        if let Some(new_root) = root {
            self.detach(new_root);
        }
        if let Some(old) = self.root.take() {
            tracing::debug!(?old, "previous root replaced; freeing its subtree");
            self.free_subtree(old);
        }
        self.root = root;
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_in_ancestor_chain(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Append `child` as the last (top-most) child of `parent`
    ///
    /// Reparents when the child is already attached elsewhere. Rejected when
    /// it would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        self.insert_child(parent, child, None)
    }

    /// Insert `child` into `parent` immediately before `before`
    ///
    /// Appends when `before` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, before: NodeId) -> bool {
        self.insert_child(parent, child, Some(before))
    }

    fn insert_child(&mut self, parent: NodeId, child: NodeId, before: Option<NodeId>) -> bool {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            tracing::warn!(?parent, ?child, "insert with unknown node");
            return false;
        }
        // A node may not be inserted into its own descendant chain.
        if self.is_in_ancestor_chain(child, parent) {
            tracing::warn!(?parent, ?child, "insert rejected: would create a cycle");
            return false;
        }

        self.detach(child);

        let index = match before {
            Some(before) => {
                let children = &self.nodes[parent].children;
                match children.iter().position(|&c| c == before) {
                    Some(i) => i,
                    None => children.len(),
                }
            }
            None => self.nodes[parent].children.len(),
        };
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        true
    }

    /// Detach `child` from `parent` and free the detached subtree
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            tracing::warn!(?parent, ?child, "remove_child: node is not a child of parent");
            return false;
        }
        self.detach(child);
        self.free_subtree(child);
        true
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent].children.retain(|&c| c != child);
            self.nodes[child].parent = None;
        }
        if self.root == Some(child) {
            self.root = None;
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = match self.nodes.get(id) {
            Some(node) => node.children.clone(),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        self.nodes.remove(id);
    }

    /// Replace a node's properties wholesale
    ///
    /// A layout-affecting change while the node carries a drag offset and is
    /// not actively dragged discards the offset, so a programmatic
    /// reposition never stacks on a stale manual drag.
    pub fn update_props(&mut self, id: NodeId, props: NodeProps) {
        let Some(node) = self.nodes.get_mut(id) else {
            tracing::warn!(?id, "update_props on unknown node");
            return;
        };
        let layout_changed = node.props.layout_differs(&props);
        node.props = props;
        if layout_changed && !node.drag_offset.is_zero() && !node.is_dragging() {
            tracing::debug!(?id, "layout change while displaced; drag offset reset");
            node.drag_offset = Vec2::ZERO;
        }
    }

    /// Drop every node and the root reference
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Transforms ──────────────────────────────────────────────────────

    /// Resolved local transform of a node, drag offset included
    pub fn local_transform(&self, id: NodeId) -> Option<Affine2D> {
        let node = self.nodes.get(id)?;
        resolve_local_transform(&node.props, node.drag_offset)
    }

    /// World transform of a node, accumulated from the root
    ///
    /// Reflects the current tree, including any in-progress drag offset.
    pub fn world_transform(&self, id: NodeId) -> Affine2D {
        let chain = self.ancestor_chain(id);
        let mut world = Affine2D::IDENTITY;
        for &ancestor in &chain {
            if let Some(local) = self.local_transform(ancestor) {
                world = world.then(&local);
            }
        }
        world
    }

    /// World transform of the node's parent frame
    pub fn parent_world_transform(&self, id: NodeId) -> Affine2D {
        match self.parent(id) {
            Some(parent) => self.world_transform(parent),
            None => Affine2D::IDENTITY,
        }
    }

    /// Ancestors from root to the node, inclusive
    pub fn ancestor_chain(&self, id: NodeId) -> AncestorChain {
        let mut chain = AncestorChain::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.nodes.contains_key(node) {
                break;
            }
            chain.push(node);
            current = self.parent(node);
        }
        chain.reverse();
        chain
    }

    // ── Drag state ──────────────────────────────────────────────────────

    pub fn drag_offset(&self, id: NodeId) -> Vec2 {
        self.nodes.get(id).map(|n| n.drag_offset).unwrap_or(Vec2::ZERO)
    }

    pub fn add_drag_offset(&mut self, id: NodeId, delta: Vec2) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.drag_offset = node.drag_offset.add(delta);
        }
    }

    pub fn reset_drag_offset(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.drag_offset = Vec2::ZERO;
        }
    }

    pub fn active_pointer(&self, id: NodeId) -> Option<PointerId> {
        self.nodes.get(id).and_then(|n| n.active_pointer)
    }

    pub fn set_active_pointer(&mut self, id: NodeId, pointer: Option<PointerId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.active_pointer = pointer;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Point;

    fn graph_with_root() -> (SceneGraph, NodeId) {
        let mut graph = SceneGraph::new();
        let root = graph.create_node(NodeKind::Root, NodeProps::new());
        graph.set_root(Some(root));
        (graph, root)
    }

    #[test]
    fn test_append_and_paint_order() {
        let (mut graph, root) = graph_with_root();
        let a = graph.create_node(NodeKind::Rect, NodeProps::new());
        let b = graph.create_node(NodeKind::Rect, NodeProps::new());
        assert!(graph.append_child(root, a));
        assert!(graph.append_child(root, b));

        assert_eq!(graph.children(root), &[a, b]);
        assert_eq!(graph.parent(a), Some(root));
        assert_eq!(graph.parent(b), Some(root));
    }

    #[test]
    fn test_insert_before_and_reorder() {
        let (mut graph, root) = graph_with_root();
        let a = graph.create_node(NodeKind::Rect, NodeProps::new());
        let b = graph.create_node(NodeKind::Rect, NodeProps::new());
        let c = graph.create_node(NodeKind::Rect, NodeProps::new());
        graph.append_child(root, a);
        graph.append_child(root, b);
        assert!(graph.insert_before(root, c, b));
        assert_eq!(graph.children(root), &[a, c, b]);

        // Moving an attached node reorders instead of duplicating.
        assert!(graph.insert_before(root, b, a));
        assert_eq!(graph.children(root), &[b, a, c]);
    }

    #[test]
    fn test_reparent_keeps_links_consistent() {
        let (mut graph, root) = graph_with_root();
        let group = graph.create_node(NodeKind::Group, NodeProps::new());
        let leaf = graph.create_node(NodeKind::Rect, NodeProps::new());
        graph.append_child(root, group);
        graph.append_child(root, leaf);

        assert!(graph.append_child(group, leaf));
        assert_eq!(graph.parent(leaf), Some(group));
        assert_eq!(graph.children(root), &[group]);
        assert_eq!(graph.children(group), &[leaf]);
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut graph, root) = graph_with_root();
        let group = graph.create_node(NodeKind::Group, NodeProps::new());
        let inner = graph.create_node(NodeKind::Group, NodeProps::new());
        graph.append_child(root, group);
        graph.append_child(group, inner);

        assert!(!graph.append_child(inner, group));
        assert!(!graph.append_child(group, group));
        assert_eq!(graph.parent(group), Some(root));
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut graph, root) = graph_with_root();
        let group = graph.create_node(NodeKind::Group, NodeProps::new());
        let leaf = graph.create_node(NodeKind::Rect, NodeProps::new());
        graph.append_child(root, group);
        graph.append_child(group, leaf);

        assert!(graph.remove_child(root, group));
        assert!(!graph.contains(group));
        assert!(!graph.contains(leaf));
        assert_eq!(graph.children(root), &[] as &[NodeId]);
    }

    #[test]
    fn test_replacing_root_frees_old_subtree() {
        let (mut graph, root) = graph_with_root();
        let leaf = graph.create_node(NodeKind::Rect, NodeProps::new());
        graph.append_child(root, leaf);

        let new_root = graph.create_node(NodeKind::Root, NodeProps::new());
        graph.set_root(Some(new_root));

        // The old tree is unreachable by any edit op, so it is gone.
        assert_eq!(graph.root(), Some(new_root));
        assert!(!graph.contains(root));
        assert!(!graph.contains(leaf));
        assert_eq!(graph.len(), 1);

        graph.set_root(None);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_promoting_descendant_to_root_keeps_its_subtree() {
        let (mut graph, root) = graph_with_root();
        let group = graph.create_node(NodeKind::Group, NodeProps::new());
        let leaf = graph.create_node(NodeKind::Rect, NodeProps::new());
        graph.append_child(root, group);
        graph.append_child(group, leaf);

        graph.set_root(Some(group));
        assert_eq!(graph.root(), Some(group));
        assert!(!graph.contains(root));
        assert!(graph.contains(leaf));
        assert_eq!(graph.parent(group), None);
        assert_eq!(graph.children(group), &[leaf]);
    }

    #[test]
    fn test_world_transform_composes_parent_and_child() {
        let (mut graph, root) = graph_with_root();
        let group = graph.create_node(
            NodeKind::Group,
            NodeProps::new().with_position(10.0, 0.0),
        );
        let leaf = graph.create_node(
            NodeKind::Rect,
            NodeProps::new().with_scale(2.0, 2.0),
        );
        graph.append_child(root, group);
        graph.append_child(group, leaf);

        let world = graph.world_transform(leaf);
        let expected = graph
            .local_transform(group)
            .unwrap()
            .then(&graph.local_transform(leaf).unwrap());
        assert_eq!(world.elements, expected.elements);
        assert_eq!(world.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_drag_reset_on_layout_change_only_when_idle() {
        let (mut graph, root) = graph_with_root();
        let leaf = graph.create_node(
            NodeKind::Rect,
            NodeProps::new().with_position(0.0, 0.0).with_size(10.0, 10.0),
        );
        graph.append_child(root, leaf);
        graph.add_drag_offset(leaf, Vec2::new(10.0, 4.0));

        // Non-layout change keeps the offset.
        let mut props = graph.get(leaf).unwrap().props.clone();
        props.fill = Some(strata_core::Color::WHITE.into());
        graph.update_props(leaf, props);
        assert_eq!(graph.drag_offset(leaf), Vec2::new(10.0, 4.0));

        // Layout change while dragging keeps the offset.
        graph.set_active_pointer(leaf, Some(PointerId::PRIMARY));
        let props = graph.get(leaf).unwrap().props.clone().with_position(5.0, 5.0);
        graph.update_props(leaf, props);
        assert_eq!(graph.drag_offset(leaf), Vec2::new(10.0, 4.0));

        // Layout change while idle resets it.
        graph.set_active_pointer(leaf, None);
        let props = graph.get(leaf).unwrap().props.clone().with_matrix([1.0, 0.0, 0.0, 1.0, 9.0, 9.0]);
        graph.update_props(leaf, props);
        assert_eq!(graph.drag_offset(leaf), Vec2::ZERO);
    }

    #[test]
    fn test_clear_drops_everything() {
        let (mut graph, root) = graph_with_root();
        let leaf = graph.create_node(NodeKind::Rect, NodeProps::new());
        graph.append_child(root, leaf);

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.root(), None);
    }
}
