//! Declarative node properties and local-transform resolution
//!
//! `NodeProps` is the sanitized, data-only property bag a host reconciler
//! hands over on create/update. Fields are `Option` so an unset field can be
//! told apart from an explicit zero; that distinction drives the "no
//! transform synthesized at all" fast path below.

use strata_core::{Affine2D, Brush, FillRule, Stroke, TextAlign, Vec2};

/// Declarative properties of one scene node
///
/// Replaced wholesale on every host-tree update; old values are discarded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeProps {
    /// Explicit local transform; wins over the shorthand fields when set
    pub matrix: Option<[f32; 6]>,

    // Shorthand transform: translate/rotate/scale around an anchor point.
    pub x: Option<f32>,
    pub y: Option<f32>,
    /// Rotation in degrees
    pub rotation: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    /// Anchor point, applied before scale/rotate
    pub offset_x: Option<f32>,
    pub offset_y: Option<f32>,

    pub width: Option<f32>,
    pub height: Option<f32>,
    pub corner_radius: Option<f32>,

    pub fill: Option<Brush>,
    pub stroke: Option<Stroke>,
    pub fill_rule: FillRule,

    /// SVG path-data string for `Path` nodes
    pub data: Option<String>,

    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub line_height: Option<f32>,
    pub max_width: Option<f32>,
    pub align: TextAlign,

    pub opacity: Option<f32>,
    pub visible: Option<bool>,
    pub listening: Option<bool>,
    pub draggable: bool,
    /// Strict drag mode: the accumulated drag offset is discarded on drag end
    pub drag_strict: bool,

    /// Optional name for debugging
    pub name: Option<String>,
}

impl NodeProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_matrix(mut self, matrix: [f32; 6]) -> Self {
        self.matrix = Some(matrix);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale_x = Some(sx);
        self.scale_y = Some(sy);
        self
    }

    pub fn with_offset(mut self, ox: f32, oy: f32) -> Self {
        self.offset_x = Some(ox);
        self.offset_y = Some(oy);
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius);
        self
    }

    pub fn with_fill(mut self, brush: impl Into<Brush>) -> Self {
        self.fill = Some(brush.into());
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    pub fn not_listening(mut self) -> Self {
        self.listening = Some(false);
        self
    }

    pub fn draggable(mut self) -> Self {
        self.draggable = true;
        self
    }

    pub fn not_draggable(mut self) -> Self {
        self.draggable = false;
        self.drag_strict = false;
        self
    }

    pub fn drag_strict(mut self) -> Self {
        self.draggable = true;
        self.drag_strict = true;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Visible unless explicitly hidden
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    /// Listening unless explicitly disabled
    pub fn is_listening(&self) -> bool {
        self.listening != Some(false)
    }

    /// Whether any shorthand transform field is set
    pub fn has_shorthand(&self) -> bool {
        self.x.is_some()
            || self.y.is_some()
            || self.rotation.is_some()
            || self.scale_x.is_some()
            || self.scale_y.is_some()
            || self.offset_x.is_some()
            || self.offset_y.is_some()
    }

    /// Resolve the declared local transform, ignoring any drag offset
    ///
    /// `None` when neither an explicit matrix nor any shorthand field is
    /// set: the node inherits its parent frame unchanged. A synthesized
    /// identity would defeat the "nothing to apply" fast path, so none is
    /// produced.
    pub fn base_transform(&self) -> Option<Affine2D> {
        if let Some(matrix) = self.matrix {
            return Some(Affine2D::from_matrix(matrix));
        }
        if !self.has_shorthand() {
            return None;
        }

        let x = self.x.unwrap_or(0.0);
        let y = self.y.unwrap_or(0.0);
        let radians = self.rotation.unwrap_or(0.0).to_radians();
        let sx = self.scale_x.unwrap_or(1.0);
        let sy = self.scale_y.unwrap_or(1.0);
        let ox = self.offset_x.unwrap_or(0.0);
        let oy = self.offset_y.unwrap_or(0.0);

        let (s, c) = radians.sin_cos();
        let a = c * sx;
        let b = s * sx;
        let c2 = -s * sy;
        let d = c * sy;
        Some(Affine2D::from_matrix([
            a,
            b,
            c2,
            d,
            x - ox * a - oy * c2,
            y - ox * b - oy * d,
        ]))
    }

    /// Whether a replacement changes any layout-affecting field
    ///
    /// Layout-affecting means the explicit matrix, the shorthand transform
    /// fields, or the declared size. Used to decide whether a stale drag
    /// offset must be discarded on update.
    pub fn layout_differs(&self, other: &NodeProps) -> bool {
        self.matrix != other.matrix
            || self.x != other.x
            || self.y != other.y
            || self.rotation != other.rotation
            || self.scale_x != other.scale_x
            || self.scale_y != other.scale_y
            || self.offset_x != other.offset_x
            || self.offset_y != other.offset_y
            || self.width != other.width
            || self.height != other.height
    }
}

/// Resolve a node's full local transform: declared transform plus drag offset
///
/// A non-zero drag offset prepends a pure translation in the parent's
/// coordinate space, so the node is displaced before its own transform
/// applies.
pub fn resolve_local_transform(props: &NodeProps, drag_offset: Vec2) -> Option<Affine2D> {
    let base = props.base_transform();
    if drag_offset.is_zero() {
        return base;
    }
    let drag = Affine2D::translation(drag_offset.x, drag_offset.y);
    Some(match base {
        Some(local) => drag.then(&local),
        None => drag,
    })
}
