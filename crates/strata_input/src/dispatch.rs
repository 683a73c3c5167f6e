//! Pointer dispatch engine
//!
//! Consumes raw pointer/wheel samples, resolves targets through the
//! hit-region index or an active capture, bubbles events target-to-root,
//! and owns the per-pointer hover paths, capture map, and drag sessions for
//! one container. All state here is container-scoped; nothing is global.

use rustc_hash::FxHashMap;
use strata_core::{Point, PointerId, PointerInput, PointerInputKind, Vec2};
use strata_scene::{AncestorChain, NodeId, SceneGraph};

use crate::event::{CaptureOp, PointerEvent, PointerEventType};
use crate::handlers::HandlerMap;
use crate::hit::HitRegionIndex;

/// What a dispatch pass changed
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatchOutcome {
    /// A drag mutated node state; the container should schedule a frame
    pub needs_frame: bool,
}

/// Active drag session for one pointer
#[derive(Clone, Copy, Debug)]
struct DragSession {
    node: NodeId,
    /// Last pointer position in the dragged node's parent space
    last_parent_local: Point,
}

/// Per-container pointer state machine
#[derive(Default)]
pub struct PointerDispatcher {
    handlers: HandlerMap,
    capture: FxHashMap<PointerId, NodeId>,
    hover: FxHashMap<PointerId, AncestorChain>,
    drags: FxHashMap<PointerId, DragSession>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host handler for a node and event type
    pub fn on<F>(&mut self, node: NodeId, event_type: PointerEventType, handler: F)
    where
        F: FnMut(&mut PointerEvent) + 'static,
    {
        self.handlers.register(node, event_type, handler);
    }

    pub fn handlers(&self) -> &HandlerMap {
        &self.handlers
    }

    /// Current root-to-target hover chain for a pointer
    pub fn hover_path(&self, pointer: PointerId) -> &[NodeId] {
        self.hover.get(&pointer).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn capture_target(&self, pointer: PointerId) -> Option<NodeId> {
        self.capture.get(&pointer).copied()
    }

    pub fn drag_target(&self, pointer: PointerId) -> Option<NodeId> {
        self.drags.get(&pointer).map(|s| s.node)
    }

    /// Drop state referring to nodes no longer present in the scene
    ///
    /// Called by the container after removals or `clear`; stale regions are
    /// already impossible (the index is rebuilt each commit), this prunes
    /// the longer-lived capture/hover/drag/handler state.
    pub fn prune_missing(&mut self, scene: &SceneGraph) {
        self.capture.retain(|_, node| scene.contains(*node));
        self.drags.retain(|_, session| scene.contains(session.node));
        for chain in self.hover.values_mut() {
            chain.retain(|node| scene.contains(*node));
        }
        self.hover.retain(|_, chain| !chain.is_empty());
        self.handlers.retain_nodes(|node| scene.contains(node));
    }

    /// Re-check a node's drag eligibility after a property update
    ///
    /// A node that stops being draggable or listening mid-drag has its
    /// session force-ended as if the pointer was cancelled.
    pub fn sync_node(&mut self, scene: &mut SceneGraph, node: NodeId) -> DispatchOutcome {
        let Some(pointer) = scene.active_pointer(node) else {
            return DispatchOutcome::default();
        };
        let still_eligible = scene
            .get(node)
            .map(|n| n.props.draggable && n.is_listening())
            .unwrap_or(false);
        if still_eligible {
            return DispatchOutcome::default();
        }
        tracing::debug!(?node, "drag eligibility lost mid-drag; cancelling session");
        let needs_frame = self.end_drag(scene, pointer, true, None);
        DispatchOutcome { needs_frame }
    }

    /// Reset all per-pointer state (teardown / clearAll)
    pub fn reset(&mut self) {
        self.capture.clear();
        self.hover.clear();
        self.drags.clear();
        self.handlers.clear();
    }

    /// Process one raw pointer sample against the last committed index
    pub fn dispatch(
        &mut self,
        scene: &mut SceneGraph,
        index: &HitRegionIndex,
        device_pixel_ratio: f32,
        input: &PointerInput,
    ) -> DispatchOutcome {
        let dpr = if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };
        let logical = Point::new(input.position.x / dpr, input.position.y / dpr);
        let mut outcome = DispatchOutcome::default();

        match input.kind {
            PointerInputKind::Wheel => {
                // Wheel resolves purely by the index: no capture, no hover.
                if let Some(target) = index.hit_test(logical) {
                    let mut event = self.build_event(
                        scene,
                        PointerEventType::Wheel,
                        target,
                        input,
                        dpr,
                        logical,
                        input.delta,
                    );
                    self.bubble(scene, &mut event);
                }
            }
            PointerInputKind::Move => {
                let target = self.resolve_target(index, input.pointer, logical);
                self.update_hover(scene, input, dpr, logical, target);
                if let Some(target) = target {
                    let mut event = self.build_event(
                        scene,
                        PointerEventType::Move,
                        target,
                        input,
                        dpr,
                        logical,
                        Vec2::ZERO,
                    );
                    self.bubble(scene, &mut event);
                }
                outcome.needs_frame |= self.drag_move(scene, input, dpr, logical);
            }
            PointerInputKind::Down => {
                let target = self.resolve_target(index, input.pointer, logical);
                self.update_hover(scene, input, dpr, logical, target);
                if let Some(target) = target {
                    let mut event = self.build_event(
                        scene,
                        PointerEventType::Down,
                        target,
                        input,
                        dpr,
                        logical,
                        Vec2::ZERO,
                    );
                    self.bubble(scene, &mut event);
                    self.maybe_start_drag(scene, target, input, dpr, logical);
                }
            }
            PointerInputKind::Up => {
                if let Some(target) = self.resolve_target(index, input.pointer, logical) {
                    let mut event = self.build_event(
                        scene,
                        PointerEventType::Up,
                        target,
                        input,
                        dpr,
                        logical,
                        Vec2::ZERO,
                    );
                    self.bubble(scene, &mut event);
                }
                outcome.needs_frame |= self.end_drag(scene, input.pointer, false, Some((input, dpr, logical)));
                self.capture.remove(&input.pointer);
            }
            PointerInputKind::Cancel => {
                if let Some(target) = self.resolve_target(index, input.pointer, logical) {
                    let mut event = self.build_event(
                        scene,
                        PointerEventType::Cancel,
                        target,
                        input,
                        dpr,
                        logical,
                        Vec2::ZERO,
                    );
                    self.bubble(scene, &mut event);
                }
                outcome.needs_frame |= self.end_drag(scene, input.pointer, true, Some((input, dpr, logical)));
                self.capture.remove(&input.pointer);
                // Cancellation empties the hover path, firing leaves.
                self.update_hover(scene, input, dpr, logical, None);
            }
            PointerInputKind::Click => {
                if let Some(target) = self.resolve_target(index, input.pointer, logical) {
                    let mut event = self.build_event(
                        scene,
                        PointerEventType::Click,
                        target,
                        input,
                        dpr,
                        logical,
                        Vec2::ZERO,
                    );
                    self.bubble(scene, &mut event);
                }
            }
        }

        outcome
    }

    // ── Target resolution ───────────────────────────────────────────────

    /// Capture map first (while the captured node still has a region), then
    /// reverse-order hit test.
    fn resolve_target(
        &self,
        index: &HitRegionIndex,
        pointer: PointerId,
        logical: Point,
    ) -> Option<NodeId> {
        if let Some(&captured) = self.capture.get(&pointer) {
            if index.contains_node(captured) {
                return Some(captured);
            }
        }
        index.hit_test(logical)
    }

    // ── Event construction and bubbling ─────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn build_event(
        &self,
        scene: &SceneGraph,
        event_type: PointerEventType,
        target: NodeId,
        input: &PointerInput,
        dpr: f32,
        logical: Point,
        delta: Vec2,
    ) -> PointerEvent {
        // The current world transform reflects any in-progress drag offset,
        // unlike the transform cached in the region at commit time.
        let local = match scene.world_transform(target).invert() {
            Some(inverse) => inverse.transform_point(logical),
            None => {
                tracing::trace!(?target, "singular target transform; local falls back to logical");
                logical
            }
        };
        PointerEvent::new(
            event_type,
            input.timestamp,
            input.pointer,
            dpr,
            input.position,
            local,
            input.buttons,
            input.modifiers,
            target,
            delta,
        )
    }

    /// Dispatch at the target, then walk the parent chain until stopped
    fn bubble(&mut self, scene: &SceneGraph, event: &mut PointerEvent) {
        let mut current = Some(event.target);
        while let Some(node) = current {
            self.handlers.invoke(node, event);
            self.apply_capture_ops(node, event);
            if event.propagation_stopped() {
                break;
            }
            current = scene.parent(node);
        }
    }

    /// Dispatch directly at one node, without bubbling (enter/leave)
    fn fire_direct(&mut self, node: NodeId, event: &mut PointerEvent) {
        self.handlers.invoke(node, event);
        self.apply_capture_ops(node, event);
    }

    /// Capture requests claim the node whose handlers just ran
    fn apply_capture_ops(&mut self, node: NodeId, event: &mut PointerEvent) {
        for op in event.take_capture_ops() {
            match op {
                CaptureOp::Claim(pointer) => {
                    self.capture.insert(pointer, node);
                }
                CaptureOp::Release(pointer) => {
                    if self.capture.get(&pointer) == Some(&node) {
                        self.capture.remove(&pointer);
                    }
                }
            }
        }
    }

    // ── Hover tracking ──────────────────────────────────────────────────

    /// Diff the hover chain: leave the old suffix deepest-first, then enter
    /// the new suffix outward to the target.
    fn update_hover(
        &mut self,
        scene: &SceneGraph,
        input: &PointerInput,
        dpr: f32,
        logical: Point,
        target: Option<NodeId>,
    ) {
        let new_chain = target
            .map(|t| scene.ancestor_chain(t))
            .unwrap_or_default();
        let old_chain = self.hover.remove(&input.pointer).unwrap_or_default();

        let shared = old_chain
            .iter()
            .zip(new_chain.iter())
            .take_while(|(a, b)| a == b)
            .count();

        for &node in old_chain[shared..].iter().rev() {
            if !scene.contains(node) {
                continue;
            }
            let mut event = self.build_event(
                scene,
                PointerEventType::Leave,
                node,
                input,
                dpr,
                logical,
                Vec2::ZERO,
            );
            self.fire_direct(node, &mut event);
        }
        for &node in &new_chain[shared..] {
            let mut event = self.build_event(
                scene,
                PointerEventType::Enter,
                node,
                input,
                dpr,
                logical,
                Vec2::ZERO,
            );
            self.fire_direct(node, &mut event);
        }

        if !new_chain.is_empty() {
            self.hover.insert(input.pointer, new_chain);
        }
    }

    // ── Drag sessions ───────────────────────────────────────────────────

    fn maybe_start_drag(
        &mut self,
        scene: &mut SceneGraph,
        target: NodeId,
        input: &PointerInput,
        dpr: f32,
        logical: Point,
    ) {
        if self.drags.contains_key(&input.pointer) {
            return;
        }
        let eligible = scene
            .get(target)
            .map(|n| n.props.draggable && n.is_listening() && n.active_pointer.is_none())
            .unwrap_or(false);
        if !eligible {
            return;
        }

        let parent_local = match scene.parent_world_transform(target).invert() {
            Some(inverse) => inverse.transform_point(logical),
            None => logical,
        };
        self.drags.insert(
            input.pointer,
            DragSession {
                node: target,
                last_parent_local: parent_local,
            },
        );
        scene.set_active_pointer(target, Some(input.pointer));
        self.capture.insert(input.pointer, target);
        tracing::debug!(node = ?target, pointer = ?input.pointer, "drag session started");

        let mut event = self.build_event(
            scene,
            PointerEventType::DragStart,
            target,
            input,
            dpr,
            logical,
            Vec2::ZERO,
        );
        self.bubble(scene, &mut event);
    }

    /// Advance an active drag session; returns whether node state changed
    fn drag_move(
        &mut self,
        scene: &mut SceneGraph,
        input: &PointerInput,
        dpr: f32,
        logical: Point,
    ) -> bool {
        let Some(session) = self.drags.get(&input.pointer).copied() else {
            return false;
        };
        let node = session.node;
        let eligible = scene
            .get(node)
            .map(|n| n.props.draggable && n.is_listening())
            .unwrap_or(false);
        if !eligible {
            return self.end_drag(scene, input.pointer, true, Some((input, dpr, logical)));
        }

        // A singular parent transform means the position cannot be
        // localized; the session keeps its last known anchor.
        let Some(inverse) = scene.parent_world_transform(node).invert() else {
            return false;
        };
        let parent_local = inverse.transform_point(logical);
        let delta = Vec2::new(
            parent_local.x - session.last_parent_local.x,
            parent_local.y - session.last_parent_local.y,
        );
        if delta.is_zero() {
            return false;
        }

        if let Some(session) = self.drags.get_mut(&input.pointer) {
            session.last_parent_local = parent_local;
        }
        scene.add_drag_offset(node, delta);

        let mut event = self.build_event(
            scene,
            PointerEventType::DragMove,
            node,
            input,
            dpr,
            logical,
            delta,
        );
        self.bubble(scene, &mut event);
        true
    }

    /// End the pointer's drag session, if any
    ///
    /// Cancellation and strict mode both discard the accumulated offset;
    /// otherwise the node stays displaced. Returns whether node state
    /// changed. `context` carries the triggering sample when one exists;
    /// force-ends synthesize a bare event.
    fn end_drag(
        &mut self,
        scene: &mut SceneGraph,
        pointer: PointerId,
        cancelled: bool,
        context: Option<(&PointerInput, f32, Point)>,
    ) -> bool {
        let Some(session) = self.drags.remove(&pointer) else {
            return false;
        };
        let node = session.node;
        scene.set_active_pointer(node, None);

        let strict = scene
            .get(node)
            .map(|n| n.props.drag_strict)
            .unwrap_or(false);
        let mut changed = false;
        if (cancelled || strict) && !scene.drag_offset(node).is_zero() {
            scene.reset_drag_offset(node);
            changed = true;
        }
        tracing::debug!(?node, ?pointer, cancelled, "drag session ended");

        if scene.contains(node) {
            let mut event = match context {
                Some((input, dpr, logical)) => self.build_event(
                    scene,
                    PointerEventType::DragEnd,
                    node,
                    input,
                    dpr,
                    logical,
                    Vec2::ZERO,
                ),
                None => PointerEvent::new(
                    PointerEventType::DragEnd,
                    0.0,
                    pointer,
                    1.0,
                    Point::ZERO,
                    Point::ZERO,
                    0,
                    strata_core::Modifiers::NONE,
                    node,
                    Vec2::ZERO,
                ),
            };
            self.bubble(scene, &mut event);
        }
        changed
    }
}
