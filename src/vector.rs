//! Fluent 2D vector used throughout the collision core.

use crate::{Fp, Vec2};
use std::ops;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point or direction in two dimensions.
///
/// The builder-style methods mutate the receiver and hand it back, so that
/// `edge.copy_from(b).sub(a).perp().normalize()` reads left to right without temporaries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector {
    pub x: Fp,
    pub y: Fp,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: Fp, y: Fp) -> Vector {
        Vector { x, y }
    }

    #[inline]
    pub fn copy_from(&mut self, other: Vector) -> &mut Self {
        self.x = other.x;
        self.y = other.y;
        self
    }

    #[inline]
    pub fn add(&mut self, other: Vector) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }
    #[inline]
    pub fn sub(&mut self, other: Vector) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }
    #[inline]
    pub fn scale(&mut self, factor: Fp) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self
    }
    #[inline]
    pub fn scale_xy(&mut self, x: Fp, y: Fp) -> &mut Self {
        //! Scales each axis independently.
        self.x *= x;
        self.y *= y;
        self
    }

    #[inline]
    pub fn perp(&mut self) -> &mut Self {
        //! Turns the vector 90 degrees clockwise: `(x, y) -> (y, -x)`.
        let x = self.x;
        self.x = self.y;
        self.y = -x;
        self
    }
    #[inline]
    pub fn reverse(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self
    }
    pub fn rotate(&mut self, angle: Fp) -> &mut Self {
        //! Rotates counter-clockwise (in a y-up frame) by `angle` radians.
        let (sin, cos) = angle.sin_cos();
        let x = self.x;
        let y = self.y;
        self.x = x * cos - y * sin;
        self.y = x * sin + y * cos;
        self
    }
    pub fn normalize(&mut self) -> &mut Self {
        //! Scales to unit length. A zero vector is left untouched.
        let d = self.len();
        if d > 0.0 {
            self.x /= d;
            self.y /= d;
        }
        self
    }

    pub fn project(&mut self, other: Vector) -> &mut Self {
        //! Projects onto `other`, which may be of any non-zero length.
        let amt = self.dot(other) / other.len2();
        self.x = amt * other.x;
        self.y = amt * other.y;
        self
    }
    #[inline]
    pub fn project_n(&mut self, other: Vector) -> &mut Self {
        //! Projects onto `other`, which must already be unit length.
        let amt = self.dot(other);
        self.x = amt * other.x;
        self.y = amt * other.y;
        self
    }
    pub fn reflect(&mut self, axis: Vector) -> &mut Self {
        let (x, y) = (self.x, self.y);
        self.project(axis).scale(2.0);
        self.x -= x;
        self.y -= y;
        self
    }
    pub fn reflect_n(&mut self, axis: Vector) -> &mut Self {
        //! As `reflect`, with `axis` already unit length.
        let (x, y) = (self.x, self.y);
        self.project_n(axis).scale(2.0);
        self.x -= x;
        self.y -= y;
        self
    }

    #[inline]
    pub fn dot(self, other: Vector) -> Fp {
        self.x * other.x + self.y * other.y
    }
    #[inline]
    pub fn len2(self) -> Fp {
        self.dot(self)
    }
    #[inline]
    pub fn len(self) -> Fp {
        self.len2().sqrt()
    }
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------- Operators ---------- //
// Keep `ops` traits out of scope here, or `v.add(..)` resolves to the by-value trait method.

impl ops::Add for Vector {
    type Output = Vector;
    #[inline]
    fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }
}
impl ops::Sub for Vector {
    type Output = Vector;
    #[inline]
    fn sub(self, other: Vector) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }
}
impl ops::Mul<Fp> for Vector {
    type Output = Vector;
    #[inline]
    fn mul(self, factor: Fp) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }
}
impl ops::Neg for Vector {
    type Output = Vector;
    #[inline]
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}
impl ops::AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, other: Vector) {
        self.x += other.x;
        self.y += other.y;
    }
}
impl ops::SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, other: Vector) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

// ---------- glam interop ---------- //

impl From<Vec2> for Vector {
    #[inline]
    fn from(v: Vec2) -> Self {
        Vector::new(v.x, v.y)
    }
}
impl From<Vector> for Vec2 {
    #[inline]
    fn from(v: Vector) -> Self {
        Vec2::new(v.x, v.y)
    }
}
impl From<(Fp, Fp)> for Vector {
    #[inline]
    fn from((x, y): (Fp, Fp)) -> Self {
        Vector::new(x, y)
    }
}

impl approx::AbsDiffEq for Vector {
    type Epsilon = Fp;

    fn default_epsilon() -> Fp {
        Fp::EPSILON
    }
    fn abs_diff_eq(&self, other: &Self, epsilon: Fp) -> bool {
        Vec2::from(*self).abs_diff_eq(Vec2::from(*other), epsilon)
    }
}
impl approx::RelativeEq for Vector {
    fn default_max_relative() -> Fp {
        Fp::EPSILON
    }
    fn relative_eq(&self, other: &Self, epsilon: Fp, max_relative: Fp) -> bool {
        approx::RelativeEq::relative_eq(&self.x, &other.x, epsilon, max_relative)
            && approx::RelativeEq::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}
