//! Strata core types
//!
//! Foundational plain-data types shared by every Strata crate:
//!
//! - **Geometry**: points, sizes, rects, and the 3x2 affine transform
//! - **Paint**: colors, brushes, gradients, strokes
//! - **Input**: raw pointer samples, pointer ids, modifier flags
//!
//! Nothing in this crate owns state or performs I/O.

pub mod color;
pub mod geometry;
pub mod input;
pub mod paint;

pub use color::Color;
pub use geometry::{Affine2D, Point, Rect, Size, Vec2, SINGULAR_EPSILON};
pub use input::{Modifiers, PointerId, PointerInput, PointerInputKind};
pub use paint::{Brush, FillRule, Gradient, GradientStop, Stroke, TextAlign};
