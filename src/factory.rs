//! Level geometry builders: beveled platforms, stairs and hills.
//!
//! Every builder returns a convex [`Polygon`] wound the same way as [`Rect::to_polygon`](crate::Rect::to_polygon).

use crate::{Fp, Polygon, Vector};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pseudo-3D bevel offsets, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Projection {
    pub x: Fp,
    pub y: Fp,
}
impl Default for Projection {
    fn default() -> Self {
        Projection { x: 8.0, y: 11.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StairDir {
    /// Ascends from left to right.
    UpRight,
    /// Descends from left to right.
    DownRight,
}

/// A rectangle with its top-right and bottom-left corners cut by the bevel.
///
/// The polygon sits `proj.y / 2` below `y`, so that the drawn top face lines up with `y`.
pub fn skewed_rect(x: Fp, y: Fp, w: Fp, h: Fp, proj: Projection) -> Polygon {
    Polygon::new(
        Vector::new(x, y + proj.y / 2.0),
        vec![
            Vector::ZERO,
            Vector::new(w - proj.x, 0.0),
            Vector::new(w, proj.y),
            Vector::new(w, h),
            Vector::new(proj.x, h),
            Vector::new(0.0, h - proj.y),
        ],
    )
}

/// A slope whose top edge rises or falls across `w`, so a walker standing on it is pushed
/// up or down smoothly as it moves along x.
pub fn stair(x: Fp, y: Fp, w: Fp, h: Fp, dir: StairDir, proj: Projection) -> Polygon {
    let points = match dir {
        StairDir::UpRight => vec![
            Vector::ZERO,
            Vector::new(w - proj.x, -h),
            Vector::new(w, proj.y - h),
            Vector::new(w, 0.0),
            Vector::new(proj.x, h),
            Vector::new(0.0, h - proj.y),
        ],
        StairDir::DownRight => vec![
            Vector::ZERO,
            Vector::new(w - proj.x, h - proj.y - 5.0),
            Vector::new(w, h - 4.0),
            Vector::new(proj.x, h),
            Vector::new(0.0, h),
            Vector::new(0.0, h - proj.y),
        ],
    };
    Polygon::new(Vector::new(x, y), points)
}

/// A half ellipse mound, sampled at one degree steps.
///
/// The origin is the middle of the flat base at `(x + w / 2, y + proj.y)`; the curve spans
/// `w` across and rises `h / 2` above the base.
pub fn hill(x: Fp, y: Fp, w: Fp, h: Fp, proj: Projection) -> Polygon {
    let a = w / 2.0;
    let b = h / 2.0;

    let mut points = Vec::with_capacity(182);
    points.push(Vector::ZERO);
    for deg in 180..360u16 {
        let (sin, cos) = Fp::from(deg).to_radians().sin_cos();
        points.push(Vector::new(a * cos, b * sin));
    }
    points.push(Vector::new(a, 0.0));

    Polygon::new(Vector::new(x + a, y + proj.y), points)
}
