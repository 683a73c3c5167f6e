//! 2D geometry primitives
//!
//! Plain-data points, sizes, rectangles, and the 3x2 affine transform used
//! throughout the scene graph, hit testing, and frame encoding.

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn add(&self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.max_x()
            && point.y >= self.origin.y
            && point.y <= self.max_y()
    }

    /// Expand the rect symmetrically on each axis
    pub fn expand(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x - dx, self.origin.y - dy),
            size: Size::new(
                (self.size.width + 2.0 * dx).max(0.0),
                (self.size.height + 2.0 * dy).max(0.0),
            ),
        }
    }
}

/// Determinants smaller than this are treated as singular
pub const SINGULAR_EPSILON: f32 = 1e-8;

/// 2D affine transformation
///
/// Element layout `[a, b, c, d, tx, ty]`:
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0   1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn from_matrix(elements: [f32; 6]) -> Self {
        Self { elements }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            elements: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            elements: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Rotation by `angle` radians, counter-clockwise
    pub fn rotation(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            elements: [c, s, -s, c, 0.0, 0.0],
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(a * point.x + c * point.y + tx, b * point.x + d * point.y + ty)
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    pub fn determinant(&self) -> f32 {
        let [a, b, c, d, ..] = self.elements;
        a * d - b * c
    }

    /// Invert the transform
    ///
    /// Returns `None` when the matrix is singular (determinant below
    /// [`SINGULAR_EPSILON`]). Callers must treat that as "the point cannot
    /// be localized", never as a NaN transform.
    pub fn invert(&self) -> Option<Affine2D> {
        let [a, b, c, d, tx, ty] = self.elements;
        let det = a * d - b * c;
        if det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Affine2D {
            elements: [
                d * inv,
                -b * inv,
                -c * inv,
                a * inv,
                (c * ty - d * tx) * inv,
                (b * tx - a * ty) * inv,
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: Point, q: Point) {
        assert!(
            (p.x - q.x).abs() < 1e-4 && (p.y - q.y).abs() < 1e-4,
            "{p:?} != {q:?}"
        );
    }

    #[test]
    fn test_composition_is_associative() {
        let a = Affine2D::translation(3.0, -2.0);
        let b = Affine2D::rotation(0.7);
        let c = Affine2D::scale(2.0, 0.5);

        let left = a.then(&b).then(&c);
        let right = a.then(&b.then(&c));
        let p = Point::new(5.0, 9.0);
        assert_close(left.transform_point(p), right.transform_point(p));
    }

    #[test]
    fn test_parent_child_composition() {
        let parent = Affine2D::translation(10.0, 0.0);
        let child = Affine2D::scale(2.0, 2.0);
        let world = parent.then(&child);

        // Child scaling applies first, then the parent translation.
        assert_close(world.transform_point(Point::new(1.0, 1.0)), Point::new(12.0, 2.0));
    }

    #[test]
    fn test_invert_round_trip() {
        let t = Affine2D::translation(4.0, 7.0)
            .then(&Affine2D::rotation(1.1))
            .then(&Affine2D::scale(3.0, 0.25));
        let inv = t.invert().unwrap();

        let p = Point::new(13.0, -6.0);
        assert_close(t.transform_point(inv.transform_point(p)), p);
        assert_close(inv.transform_point(t.transform_point(p)), p);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let t = Affine2D::scale(0.0, 1.0);
        assert!(t.invert().is_none());

        // Degenerate columns also fail, without producing NaN anywhere.
        let collapsed = Affine2D::from_matrix([1.0, 2.0, 2.0, 4.0, 5.0, 6.0]);
        assert!(collapsed.invert().is_none());
    }

    #[test]
    fn test_rect_expand() {
        let r = Rect::new(10.0, 10.0, 20.0, 10.0).expand(2.0, 3.0);
        assert_eq!(r, Rect::new(8.0, 7.0, 24.0, 16.0));

        // Expansion never produces a negative size.
        let tiny = Rect::new(0.0, 0.0, 1.0, 1.0).expand(-4.0, -4.0);
        assert_eq!(tiny.size, Size::ZERO);
    }
}
