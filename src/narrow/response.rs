use super::ShapeRef;
use crate::{Fp, Vector};

/// Result of a narrowphase test.
///
/// Only meaningful after a test returned `true`: on a miss the fields may hold partial data.
/// Reuse between tests requires a [`Response::clear`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response<'a> {
    /// The first shape of the tested pair.
    pub a: Option<ShapeRef<'a>>,
    /// The second shape of the tested pair.
    pub b: Option<ShapeRef<'a>>,
    /// Unit direction of the smallest overlap. `a` is pushed out of `b` by moving along `-overlap_n`.
    pub overlap_n: Vector,
    /// `overlap_n * overlap`. Subtract from `a`'s position to separate the pair.
    pub overlap_v: Vector,
    /// Penetration depth along `overlap_n`. Zero for shapes that merely touch.
    pub overlap: Fp,
    pub a_in_b: bool,
    pub b_in_a: bool,
}

impl<'a> Default for Response<'a> {
    fn default() -> Self {
        Response::new()
    }
}

impl<'a> Response<'a> {
    pub fn new() -> Response<'a> {
        Response {
            a: None,
            b: None,
            overlap_n: Vector::ZERO,
            overlap_v: Vector::ZERO,
            overlap: Fp::MAX,
            a_in_b: true,
            b_in_a: true,
        }
    }

    pub fn clear(&mut self) -> &mut Self {
        //! Resets the overlap to its maximum and both containment flags to `true`.
        //! The shapes and vectors are left as they are; every test overwrites them.
        self.a_in_b = true;
        self.b_in_a = true;
        self.overlap = Fp::MAX;
        self
    }

    pub(crate) fn swap(&mut self) -> &mut Self {
        //! Mirrors the response so that it reads from `b`'s point of view.
        std::mem::swap(&mut self.a, &mut self.b);
        std::mem::swap(&mut self.a_in_b, &mut self.b_in_a);
        self.overlap_n.reverse();
        self.overlap_v.reverse();
        self
    }

    #[inline]
    pub fn resolve(&self, pos: &mut Vector) {
        //! Moves `pos`, taken as `a`'s position, out of `b`.
        pos.sub(self.overlap_v);
    }

    pub fn contact(&self) -> Contact {
        //! Which side of `b` was struck, per axis of the overlap normal.
        Contact {
            x: Side::from_normal_x(self.overlap_n.x),
            y: Side::from_normal_y(self.overlap_n.y),
        }
    }

    #[inline]
    pub fn is_landing(&self) -> bool {
        //! Whether `a` came down on top of `b`.
        self.overlap_n.y == 1.0
    }
}

/// The face of `b` that `a` struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    #[inline]
    fn from_normal_x(n: Fp) -> Side {
        if n == 1.0 {
            Side::Left
        } else if n == -1.0 {
            Side::Right
        } else {
            Side::None
        }
    }
    #[inline]
    fn from_normal_y(n: Fp) -> Side {
        if n == 1.0 {
            Side::Top
        } else if n == -1.0 {
            Side::Bottom
        } else {
            Side::None
        }
    }
}

/// Axis-separated contact classification. Sloped normals classify as [`Side::None`] on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contact {
    pub x: Side,
    pub y: Side,
}

impl Contact {
    #[inline]
    pub fn is_none(&self) -> bool {
        self.x == Side::None && self.y == Side::None
    }
}
