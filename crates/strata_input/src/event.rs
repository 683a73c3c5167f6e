//! Pointer event objects delivered to host handlers

use smallvec::SmallVec;
use strata_core::{Modifiers, Point, PointerId, Vec2};
use strata_scene::NodeId;

/// Dispatched pointer event type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventType {
    Down,
    Move,
    Up,
    Cancel,
    Click,
    Wheel,
    /// Pointer entered a node's ancestor chain (direct, non-bubbling)
    Enter,
    /// Pointer left a node's ancestor chain (direct, non-bubbling)
    Leave,
    DragStart,
    DragMove,
    DragEnd,
}

/// Capture request recorded by a handler, applied between bubble steps
#[derive(Clone, Copy, Debug)]
pub(crate) enum CaptureOp {
    Claim(PointerId),
    Release(PointerId),
}

/// A pointer event as seen by host-tree handlers
///
/// Built per dispatch and bubbled target-to-root along parent links.
/// `capture_pointer`/`release_pointer_capture` claim the node the event is
/// currently bubbling through, not necessarily the original target; the
/// dispatcher applies the request once that node's handlers return.
#[derive(Debug)]
pub struct PointerEvent {
    pub event_type: PointerEventType,
    /// Host timestamp in milliseconds
    pub timestamp: f64,
    pub pointer: PointerId,
    pub device_pixel_ratio: f32,
    /// Position in device pixels
    pub position: Point,
    /// Position in the target's local coordinate space
    pub local: Point,
    /// Pressed-button bitmask
    pub buttons: u16,
    pub modifiers: Modifiers,
    /// Resolved target node
    pub target: NodeId,
    /// Wheel delta or drag delta; zero otherwise
    pub delta: Vec2,

    propagation_stopped: bool,
    default_prevented: bool,
    capture_ops: SmallVec<[CaptureOp; 1]>,
}

impl PointerEvent {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        event_type: PointerEventType,
        timestamp: f64,
        pointer: PointerId,
        device_pixel_ratio: f32,
        position: Point,
        local: Point,
        buttons: u16,
        modifiers: Modifiers,
        target: NodeId,
        delta: Vec2,
    ) -> Self {
        Self {
            event_type,
            timestamp,
            pointer,
            device_pixel_ratio,
            position,
            local,
            buttons,
            modifiers,
            target,
            delta,
            propagation_stopped: false,
            default_prevented: false,
            capture_ops: SmallVec::new(),
        }
    }

    /// Stop the event from bubbling to further ancestors
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Mark the host's default reaction as suppressed
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Claim the node currently handling this event for the pointer
    pub fn capture_pointer(&mut self, pointer: PointerId) {
        self.capture_ops.push(CaptureOp::Claim(pointer));
    }

    /// Release a capture previously claimed for the pointer
    pub fn release_pointer_capture(&mut self, pointer: PointerId) {
        self.capture_ops.push(CaptureOp::Release(pointer));
    }

    pub(crate) fn take_capture_ops(&mut self) -> SmallVec<[CaptureOp; 1]> {
        std::mem::take(&mut self.capture_ops)
    }
}
