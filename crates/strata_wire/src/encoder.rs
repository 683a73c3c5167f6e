//! Frame encoder
//!
//! Serializes the committed scene tree into the binary op stream the
//! external renderer consumes. Every frame is a full snapshot: the walk
//! starts at the root with a device-pixel-ratio scale and opacity 1, and the
//! output buffer is freshly allocated per encode so a previously returned
//! frame is never aliased.

use rustc_hash::FxHashSet;
use strata_core::{Affine2D, Brush, Color, FillRule, TextAlign};
use strata_scene::{NodeId, NodeKind, SceneGraph, SceneNode};

use crate::ops::{
    push_color, push_f32, push_matrix, push_str, OP_BEGIN_FRAME, OP_END_FRAME, OP_PATH, OP_RECT,
    OP_TEXT,
};
use crate::path::is_valid_path_data;

/// Frame-level parameters for one encode pass
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// Logical frame width
    pub width: f32,
    /// Logical frame height
    pub height: f32,
    pub device_pixel_ratio: f32,
    pub background: Color,
}

/// Upper bound on remembered distinct bad path strings; past it, further
/// malformed paths are skipped silently instead of growing the set
const MAX_WARNED_PATHS: usize = 64;

/// Scene-to-op-stream encoder for one container
///
/// Holds only diagnostic state between frames; encoding itself is pure in
/// the tree.
#[derive(Default)]
pub struct FrameEncoder {
    warned_paths: FxHashSet<String>,
    warned_paints: FxHashSet<&'static str>,
    last_frame_len: usize,
}

impl FrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode the committed tree into a fresh op-stream buffer
    pub fn encode(&mut self, scene: &SceneGraph, params: &FrameParams) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.last_frame_len.max(64));

        buf.push(OP_BEGIN_FRAME);
        push_f32(&mut buf, params.width);
        push_f32(&mut buf, params.height);
        push_f32(&mut buf, params.device_pixel_ratio);
        push_color(&mut buf, params.background.to_array());

        if let Some(root) = scene.root() {
            let dpr = params.device_pixel_ratio;
            let base = Affine2D::scale(dpr, dpr);
            self.encode_node(&mut buf, scene, root, base, 1.0);
        }

        buf.push(OP_END_FRAME);
        self.last_frame_len = buf.len();
        buf
    }

    fn encode_node(
        &mut self,
        buf: &mut Vec<u8>,
        scene: &SceneGraph,
        id: NodeId,
        accumulated: Affine2D,
        inherited_opacity: f32,
    ) {
        let Some(node) = scene.get(id) else {
            return;
        };
        if !node.is_visible() {
            return;
        }

        let world = match scene.local_transform(id) {
            Some(local) => accumulated.then(&local),
            None => accumulated,
        };
        let opacity =
            (inherited_opacity * node.props.opacity.unwrap_or(1.0)).clamp(0.0, 1.0);

        match node.kind {
            NodeKind::Rect => self.encode_rect(buf, node, &world, opacity),
            NodeKind::Path => self.encode_path(buf, node, &world, opacity),
            NodeKind::Text => self.encode_text(buf, node, &world, opacity),
            // Containers compose and recurse; image and gradient leaves have
            // no wire representation in this protocol.
            NodeKind::Root
            | NodeKind::Group
            | NodeKind::Mask
            | NodeKind::Clip
            | NodeKind::Image
            | NodeKind::Gradient => {}
        }

        for &child in &node.children {
            self.encode_node(buf, scene, child, world, opacity);
        }
    }

    /// Rects ship only with a resolvable solid fill. A stroke-only rect
    /// produces no op at all; the fallback raster path draws it anyway, a
    /// known divergence kept as observed.
    fn encode_rect(&mut self, buf: &mut Vec<u8>, node: &SceneNode, world: &Affine2D, opacity: f32) {
        let Some(fill) = &node.props.fill else {
            return;
        };
        let Some(color) = self.resolve_solid(fill) else {
            return;
        };

        buf.push(OP_RECT);
        push_f32(buf, opacity);
        push_matrix(buf, &world.elements);
        // Position is carried entirely by the transform.
        push_f32(buf, 0.0);
        push_f32(buf, 0.0);
        push_f32(buf, node.props.width.unwrap_or(0.0));
        push_f32(buf, node.props.height.unwrap_or(0.0));
        push_f32(buf, node.props.corner_radius.unwrap_or(0.0));
        push_color(buf, color.to_array());
    }

    fn encode_path(&mut self, buf: &mut Vec<u8>, node: &SceneNode, world: &Affine2D, opacity: f32) {
        let Some(data) = &node.props.data else {
            return;
        };
        if !is_valid_path_data(data) {
            if !self.warned_paths.contains(data) && self.warned_paths.len() < MAX_WARNED_PATHS {
                self.warned_paths.insert(data.clone());
                tracing::warn!(data, "invalid path data; node skipped");
            }
            return;
        }

        let fill = node.props.fill.as_ref().and_then(|b| self.resolve_solid(b));
        let stroke = node.props.stroke.as_ref().and_then(|s| {
            self.resolve_solid(&s.brush).map(|color| (s.width, color))
        });
        if fill.is_none() && stroke.is_none() {
            return;
        }

        buf.push(OP_PATH);
        push_f32(buf, opacity);
        push_matrix(buf, &world.elements);
        buf.push(match node.props.fill_rule {
            FillRule::NonZero => 0,
            FillRule::EvenOdd => 1,
        });
        match fill {
            Some(color) => {
                buf.push(1);
                push_color(buf, color.to_array());
            }
            None => buf.push(0),
        }
        match stroke {
            Some((width, color)) => {
                buf.push(1);
                push_f32(buf, width);
                push_color(buf, color.to_array());
            }
            None => buf.push(0),
        }
        push_str(buf, data);
    }

    fn encode_text(&mut self, buf: &mut Vec<u8>, node: &SceneNode, world: &Affine2D, opacity: f32) {
        let Some(text) = &node.props.text else {
            return;
        };
        if text.is_empty() {
            return;
        }

        let color = node
            .props
            .fill
            .as_ref()
            .and_then(|b| self.resolve_solid(b))
            .unwrap_or(Color::BLACK);

        buf.push(OP_TEXT);
        push_f32(buf, opacity);
        push_matrix(buf, &world.elements);
        push_f32(buf, 0.0);
        push_f32(buf, 0.0);
        push_f32(buf, node.props.font_size.unwrap_or(16.0));
        // Zero means "renderer default" for both.
        push_f32(buf, node.props.line_height.unwrap_or(0.0));
        push_f32(buf, node.props.max_width.unwrap_or(0.0));
        buf.push(match node.props.align {
            TextAlign::Start => 0,
            TextAlign::Center => 1,
            TextAlign::End => 2,
        });
        push_color(buf, color.to_array());
        push_str(buf, text);
    }

    /// Resolve a brush to a solid color; unsupported kinds warn once
    fn resolve_solid(&mut self, brush: &Brush) -> Option<Color> {
        match brush.as_solid() {
            Some(color) => Some(color),
            None => {
                let kind = brush.kind_name();
                if self.warned_paints.insert(kind) {
                    tracing::warn!(kind, "paint kind not encodable; treated as no paint");
                }
                None
            }
        }
    }
}
