//! Planar helpers shared by the raster and the heightmap sampler.
//!
//! Coordinates follow screen convention: `+y` points down, so a quad listed
//! top-left, top-right, bottom-right, bottom-left is clockwise on screen.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 2D point / vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3D cross product. Positive when `other` lies
    /// clockwise (on screen) of `self`.
    pub fn cross(&self, other: &Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Vec2) -> f32 {
        (*self - *other).length()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, origin at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle anchored at the origin.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// Linear interpolation; `t` is the distance from `from`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    (1.0 - t) * from + t * to
}

/// Quintic fade `6t^5 - 15t^4 + 10t^3`, with `t` clamped to [0, 1].
pub fn smooth_curve(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let ttt = t * t * t;
    ttt * (3.0 * t * (2.0 * t - 5.0) + 10.0)
}

/// Point-in-quadrilateral test.
///
/// ```text
/// A---0--->B
/// ^        |
/// 3   P    1
/// |        v
/// D<--2----C
/// ```
///
/// `p` is inside when it lies on the non-negative side of every directed edge.
/// The corners must be clockwise on screen (`+y` down); the opposite winding
/// inverts the result.
pub fn point_in_quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, p: Vec2) -> bool {
    (b - a).cross(&(p - a)) >= 0.0
        && (c - b).cross(&(p - b)) >= 0.0
        && (d - c).cross(&(p - c)) >= 0.0
        && (a - d).cross(&(p - d)) >= 0.0
}

/// Perpendicular distance from `point` to the infinite line through `origin`
/// with direction `direction`.
pub fn distance_point_to_line(point: Vec2, direction: Vec2, origin: Vec2) -> f32 {
    (point - origin).cross(&direction.normalize()).abs()
}

/// Coordinates of `p` in the skewed frame with origin `o` and axes `x_axis`,
/// `y_axis`, measured in world units along each axis.
fn skewed_coordinates(o: Vec2, x_axis: Vec2, y_axis: Vec2, p: Vec2) -> Vec2 {
    let sin = axis_sine(x_axis, y_axis);
    if sin <= f32::EPSILON {
        return Vec2::ZERO;
    }

    // distance to one axis over sin(angle) is the coordinate along the other
    let along_x = distance_point_to_line(p, y_axis, o) / sin;
    let along_y = distance_point_to_line(p, x_axis, o) / sin;
    Vec2::new(along_x, along_y)
}

/// Sine of the (unsigned) angle between two axes.
fn axis_sine(a: Vec2, b: Vec2) -> f32 {
    let len = a.length() * b.length();
    if len <= f32::EPSILON {
        return 0.0;
    }
    (a.cross(&b) / len).abs().min(1.0)
}

/// Interpolate corner values inside an arbitrary quad `A, B, C, D` (clockwise,
/// top-left first).
///
/// `A` with axes `AB` and `AD` forms a local frame. The query and `C` are
/// projected into it, the query is normalized by `C` and clamped to the unit
/// square, and the four values are blended bilinearly. Exact at every corner of
/// a parallelogram; on a skewed quad `B` and `D` are approximate.
pub fn interpolate_in_quad(
    a: (Vec2, f32),
    b: (Vec2, f32),
    c: (Vec2, f32),
    d: (Vec2, f32),
    p: Vec2,
) -> f32 {
    let (pa, va) = a;
    let (pb, vb) = b;
    let (pc, vc) = c;
    let (pd, vd) = d;

    let ab = pb - pa;
    let ad = pd - pa;

    let local_p = skewed_coordinates(pa, ab, ad, p);
    let local_c = skewed_coordinates(pa, ab, ad, pc);

    let u = normalized(local_p.x, local_c.x);
    let v = normalized(local_p.y, local_c.y);

    lerp(lerp(va, vb, u), lerp(vd, vc, u), v)
}

fn normalized(value: f32, extent: f32) -> f32 {
    if extent <= f32::EPSILON {
        0.0
    } else {
        (value / extent).clamp(0.0, 1.0)
    }
}
