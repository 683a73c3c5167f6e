//! Scene node storage types

use slotmap::new_key_type;
use strata_core::{PointerId, Vec2};

use crate::props::NodeProps;

new_key_type! {
    /// Arena key for one scene node
    pub struct NodeId;
}

/// Kind of a scene node
///
/// A small fixed set; traversal, hit testing, and encoding all match on it
/// exhaustively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Canvas root; exactly one per container
    Root,
    Group,
    Rect,
    Path,
    Text,
    Image,
    Gradient,
    Mask,
    Clip,
}

/// One retained scene node
#[derive(Debug)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub props: NodeProps,
    /// Paint order: later children draw on top
    pub children: Vec<NodeId>,
    /// Non-owning back-reference; ownership flows root to leaf
    pub parent: Option<NodeId>,
    /// Accumulated user-drag translation, in the parent's coordinate space
    pub drag_offset: Vec2,
    /// Pointer currently dragging this node, if any
    pub active_pointer: Option<PointerId>,
}

impl SceneNode {
    pub fn new(kind: NodeKind, props: NodeProps) -> Self {
        Self {
            kind,
            props,
            children: Vec::new(),
            parent: None,
            drag_offset: Vec2::ZERO,
            active_pointer: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.props.is_visible()
    }

    pub fn is_listening(&self) -> bool {
        self.props.is_listening()
    }

    pub fn is_dragging(&self) -> bool {
        self.active_pointer.is_some()
    }
}
