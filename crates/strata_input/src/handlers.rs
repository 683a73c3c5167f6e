//! Handler registry
//!
//! Host handlers keyed by `(node, event type)`. The registry also answers
//! the "is anything listening at all" question that gates hit-index
//! rebuilds for static scenes.

use rustc_hash::FxHashMap;
use strata_scene::NodeId;

use crate::event::{PointerEvent, PointerEventType};

/// Host-supplied pointer event handler
///
/// Handlers run on the container's single logical thread and receive only
/// the event object, so they cannot mutate the scene reentrantly.
pub type PointerHandler = Box<dyn FnMut(&mut PointerEvent)>;

/// Registered handlers for one container
#[derive(Default)]
pub struct HandlerMap {
    handlers: FxHashMap<(NodeId, PointerEventType), Vec<PointerHandler>>,
    per_node: FxHashMap<NodeId, usize>,
}

impl HandlerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a node and event type
    pub fn register<F>(&mut self, node: NodeId, event_type: PointerEventType, handler: F)
    where
        F: FnMut(&mut PointerEvent) + 'static,
    {
        self.handlers
            .entry((node, event_type))
            .or_default()
            .push(Box::new(handler));
        *self.per_node.entry(node).or_default() += 1;
    }

    /// Drop every handler registered for a node
    pub fn remove_node(&mut self, node: NodeId) {
        self.handlers.retain(|&(n, _), _| n != node);
        self.per_node.remove(&node);
    }

    /// Drop handlers whose node no longer passes the filter
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.handlers.retain(|&(n, _), _| keep(n));
        self.per_node.retain(|&n, _| keep(n));
    }

    /// Whether the node has any handler of any type
    pub fn has_node_handlers(&self, node: NodeId) -> bool {
        self.per_node.contains_key(&node)
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke the node's handlers for the event's type, honoring
    /// `stop_propagation` between handlers
    pub fn invoke(&mut self, node: NodeId, event: &mut PointerEvent) {
        if let Some(list) = self.handlers.get_mut(&(node, event.event_type)) {
            for handler in list {
                if event.propagation_stopped() {
                    break;
                }
                handler(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
        self.per_node.clear();
    }
}
