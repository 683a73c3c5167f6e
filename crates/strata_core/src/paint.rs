//! Brushes, gradients, and strokes
//!
//! The paint model the scene graph stores and the wire protocol resolves.
//! Only solid brushes are encodable today; gradient brushes are carried for
//! the render paths that understand them.

use crate::color::Color;
use crate::geometry::Point;

/// Gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// Gradient brush data
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Radial {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

/// Brush for filling or stroking shapes
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    Gradient(Gradient),
}

impl Brush {
    /// Resolve to a solid color, if this brush has one
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Brush::Solid(color) => Some(*color),
            Brush::Gradient(_) => None,
        }
    }

    /// Stable name of the brush kind, used for once-per-kind diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Brush::Solid(_) => "solid",
            Brush::Gradient(Gradient::Linear { .. }) => "linear-gradient",
            Brush::Gradient(Gradient::Radial { .. }) => "radial-gradient",
        }
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

/// Stroke paint plus width
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub brush: Brush,
    pub width: f32,
}

impl Stroke {
    pub fn new(brush: impl Into<Brush>, width: f32) -> Self {
        Self {
            brush: brush.into(),
            width,
        }
    }
}

/// Fill rule for path shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Horizontal text alignment hint carried by the wire protocol
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}
