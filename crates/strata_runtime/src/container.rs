//! The container
//!
//! One `Container` owns everything for one canvas: the retained scene graph,
//! the pointer dispatcher and hit-region index, the frame encoder, and the
//! external render backend. Host-tree edits mutate the scene and set a
//! pending flag; the host's animation driver calls [`Container::tick`],
//! which commits at most one frame per call regardless of how many edits
//! accumulated.

use strata_core::{Color, PointerId, PointerInput};
use strata_input::{HitOptions, HitRegionIndex, PointerDispatcher, PointerEvent, PointerEventType};
use strata_scene::{NodeId, NodeKind, NodeProps, SceneGraph};
use strata_wire::{FrameEncoder, FrameParams};

use crate::backend::RenderBackend;
use crate::error::ContainerError;

/// Frame-level container configuration
#[derive(Clone, Copy, Debug)]
pub struct ContainerConfig {
    /// Logical frame width
    pub width: f32,
    /// Logical frame height
    pub height: f32,
    pub device_pixel_ratio: f32,
    pub background: Color,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 150.0,
            device_pixel_ratio: 1.0,
            background: Color::TRANSPARENT,
        }
    }
}

impl ContainerConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_device_pixel_ratio(mut self, dpr: f32) -> Self {
        self.device_pixel_ratio = dpr;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

/// Callback receiving recoverable container errors
pub type ErrorCallback = Box<dyn FnMut(&ContainerError)>;

/// One canvas worth of scene, input, and frame state
pub struct Container {
    scene: SceneGraph,
    dispatcher: PointerDispatcher,
    index: HitRegionIndex,
    encoder: FrameEncoder,
    config: ContainerConfig,
    hit_options: HitOptions,
    backend: Box<dyn RenderBackend>,
    on_error: Option<ErrorCallback>,
    frame_pending: bool,
}

impl Container {
    pub fn new(config: ContainerConfig, backend: Box<dyn RenderBackend>) -> Self {
        Self {
            scene: SceneGraph::new(),
            dispatcher: PointerDispatcher::new(),
            index: HitRegionIndex::new(),
            encoder: FrameEncoder::new(),
            config,
            hit_options: HitOptions::default(),
            backend,
            on_error: None,
            frame_pending: false,
        }
    }

    pub fn with_hit_options(mut self, options: HitOptions) -> Self {
        self.hit_options = options;
        self
    }

    /// Install the callback receiving recoverable errors
    pub fn set_error_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&ContainerError) + 'static,
    {
        self.on_error = Some(Box::new(callback));
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    // ── Host-tree edits ─────────────────────────────────────────────────

    /// Create a detached node
    pub fn create_node(&mut self, kind: NodeKind, props: NodeProps) -> NodeId {
        self.scene.create_node(kind, props)
    }

    /// Set, replace, or clear the root
    ///
    /// A replaced root's subtree is freed, so pointer state and handlers
    /// referring to it are pruned like any other removal.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.scene.set_root(root);
        self.dispatcher.prune_missing(&self.scene);
        self.invalidate();
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let inserted = self.scene.append_child(parent, child);
        if inserted {
            self.invalidate();
        }
        inserted
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, before: NodeId) -> bool {
        let inserted = self.scene.insert_before(parent, child, before);
        if inserted {
            self.invalidate();
        }
        inserted
    }

    /// Remove `child` from `parent`, freeing the detached subtree
    ///
    /// Pointer state referring to freed nodes is pruned immediately so a
    /// removed node can never receive further events.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let removed = self.scene.remove_child(parent, child);
        if removed {
            self.dispatcher.prune_missing(&self.scene);
            self.invalidate();
        }
        removed
    }

    /// Replace a node's properties wholesale
    pub fn update_props(&mut self, node: NodeId, props: NodeProps) {
        self.scene.update_props(node, props);
        self.dispatcher.sync_node(&mut self.scene, node);
        self.invalidate();
    }

    /// Drop the whole tree and all pointer state
    ///
    /// The frame stays pending so the next tick presents an empty frame.
    pub fn clear(&mut self) {
        self.scene.clear();
        self.dispatcher.reset();
        self.index.clear();
        self.invalidate();
    }

    // ── Event registration and input ────────────────────────────────────

    /// Register a host handler for a node and event type
    ///
    /// Registration can make a previously static scene interactive, so the
    /// index is rebuilt on the next tick.
    pub fn on<F>(&mut self, node: NodeId, event_type: PointerEventType, handler: F)
    where
        F: FnMut(&mut PointerEvent) + 'static,
    {
        self.dispatcher.on(node, event_type, handler);
        self.invalidate();
    }

    /// Feed one raw pointer sample from the host
    ///
    /// Targets resolve against the index built by the last completed tick.
    pub fn pointer_input(&mut self, input: &PointerInput) {
        let outcome = self.dispatcher.dispatch(
            &mut self.scene,
            &self.index,
            self.config.device_pixel_ratio,
            input,
        );
        if outcome.needs_frame {
            self.invalidate();
        }
    }

    pub fn hover_path(&self, pointer: PointerId) -> &[NodeId] {
        self.dispatcher.hover_path(pointer)
    }

    pub fn capture_target(&self, pointer: PointerId) -> Option<NodeId> {
        self.dispatcher.capture_target(pointer)
    }

    pub fn drag_target(&self, pointer: PointerId) -> Option<NodeId> {
        self.dispatcher.drag_target(pointer)
    }

    // ── Frame scheduling ────────────────────────────────────────────────

    /// Request a frame; any number of requests coalesce into one tick
    pub fn invalidate(&mut self) {
        self.frame_pending = true;
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Commit the pending frame, if any
    ///
    /// Rebuilds the hit index, encodes the full snapshot, and hands it to
    /// the backend. Backend failures go to the error callback and leave the
    /// frame pending, so the next tick retries with a fresh encode.
    /// Returns whether a frame was presented.
    pub fn tick(&mut self) -> bool {
        if !self.frame_pending {
            return false;
        }

        self.index
            .rebuild(&self.scene, self.dispatcher.handlers(), self.hit_options);

        let params = FrameParams {
            width: self.config.width,
            height: self.config.height,
            device_pixel_ratio: self.config.device_pixel_ratio,
            background: self.config.background,
        };
        let frame = self.encoder.encode(&self.scene, &params);
        tracing::trace!(bytes = frame.len(), "frame encoded");

        if let Err(e) = self.backend.apply(&frame) {
            self.report(ContainerError::BackendApply(e));
            return false;
        }
        if let Err(e) = self.backend.render() {
            self.report(ContainerError::BackendRender(e));
            return false;
        }

        self.frame_pending = false;
        true
    }

    /// Update the logical size and forward it to the backend
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.width = width;
        self.config.height = height;
        self.backend.resize(width, height);
        self.invalidate();
    }

    fn report(&mut self, error: ContainerError) {
        tracing::warn!(%error, "container error");
        if let Some(callback) = &mut self.on_error {
            callback(&error);
        }
    }
}
