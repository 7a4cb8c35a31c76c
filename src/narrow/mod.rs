//! Narrowphase data and logic module.

pub mod response;
pub mod sat;

use crate::{
    error::{ShapeError, Violation},
    Fp, Vec2, Vector,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ---------- Aabb ---------- //

/// World-space axis aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}
impl Aabb {
    #[inline]
    pub fn new(minx: Fp, miny: Fp, maxx: Fp, maxy: Fp) -> Aabb {
        Aabb {
            min: Vec2::new(minx, miny),
            max: Vec2::new(maxx, maxy),
        }
    }
    pub fn from_points(origin: Vector, points: &[Vector]) -> Aabb {
        //! Bounds `points`, each taken relative to `origin`. An empty slice yields a point box at `origin`.
        if points.is_empty() {
            let o = Vec2::from(origin);
            return Aabb { min: o, max: o };
        }
        let (mut ix, mut iy, mut ax, mut ay) = (Fp::MAX, Fp::MAX, Fp::MIN, Fp::MIN);
        for p in points {
            if p.x < ix { ix = p.x; }
            if p.x > ax { ax = p.x; }
            if p.y < iy { iy = p.y; }
            if p.y > ay { ay = p.y; }
        }
        Aabb::new(ix, iy, ax, ay).translate(origin.into())
    }

    #[inline]
    pub fn translate(self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
    #[inline]
    pub fn width(&self) -> Fp {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> Fp {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn point_test(&self, point: Vector) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
    #[inline]
    pub fn aabb_test(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

// ---------- Rect & Circle ---------- //

/// An axis aligned box given by its top-left corner and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub pos: Vector,
    pub w: Fp,
    pub h: Fp,
}
impl Rect {
    #[inline]
    pub fn new(pos: Vector, w: Fp, h: Fp) -> Rect {
        Rect { pos, w, h }
    }

    pub fn to_polygon(&self) -> Polygon {
        //! Four points wound from the local origin: `(0,0), (w,0), (w,h), (0,h)`.
        Polygon::new(
            self.pos,
            vec![
                Vector::ZERO,
                Vector::new(self.w, 0.0),
                Vector::new(self.w, self.h),
                Vector::new(0.0, self.h),
            ],
        )
    }
}
impl From<Aabb> for Rect {
    fn from(aabb: Aabb) -> Self {
        Rect {
            pos: aabb.min.into(),
            w: aabb.width(),
            h: aabb.height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle {
    pub pos: Vector,
    pub r: Fp,
}
impl Circle {
    #[inline]
    pub fn new(pos: Vector, r: Fp) -> Circle {
        Circle { pos, r }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        let splat = Vec2::splat(self.r);
        let pos = Vec2::from(self.pos);
        Aabb {
            min: pos - splat,
            max: pos + splat,
        }
    }
    #[inline]
    pub fn point_test(&self, point: Vector) -> bool {
        (point - self.pos).len2() <= self.r * self.r
    }
}

// ---------- Polygon ---------- //

/// A convex polygon: a world position plus points relative to it.
///
/// Points are wound so that turning each edge clockwise (see [`Vector::perp`]) yields its outward
/// normal. In screen space (y pointing down) that is a clockwise walk: a box goes top-left,
/// top-right, bottom-right, bottom-left.
///
/// `edges[i] = points[i + 1] - points[i]` and `normals[i]` is `edges[i]` turned and normalized.
/// Both are cached; anything that writes through [`Polygon::points_mut`] must call
/// [`Polygon::recalc`] before the next test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "PolygonDef", into = "PolygonDef"))]
pub struct Polygon {
    pub pos: Vector,
    points: Vec<Vector>,
    edges: Vec<Vector>,
    normals: Vec<Vector>,
}

impl Polygon {
    pub fn new(pos: Vector, points: Vec<Vector>) -> Polygon {
        let len = points.len();
        let mut poly = Polygon {
            pos,
            points,
            edges: Vec::with_capacity(len),
            normals: Vec::with_capacity(len),
        };
        poly.recalc();
        if let Err(e) = poly.debug_check() {
            tracing::error!(error = %e, points = len, "malformed polygon");
        }
        poly
    }

    #[inline]
    pub fn points(&self) -> &[Vector] {
        &self.points
    }
    #[inline]
    pub fn edges(&self) -> &[Vector] {
        &self.edges
    }
    #[inline]
    pub fn normals(&self) -> &[Vector] {
        &self.normals
    }
    #[inline]
    pub fn points_mut(&mut self) -> &mut [Vector] {
        //! Call [`Polygon::recalc`] once done mutating.
        &mut self.points
    }

    pub fn set_points(&mut self, points: Vec<Vector>) -> &mut Self {
        self.points = points;
        self.recalc()
    }

    pub fn recalc(&mut self) -> &mut Self {
        //! Rebuilds `edges` and `normals` from the current points.
        self.edges.clear();
        self.normals.clear();
        let len = self.points.len();
        for i in 0..len {
            let p1 = self.points[i];
            let p2 = if i < len - 1 { self.points[i + 1] } else { self.points[0] };
            let mut e = p2;
            e.sub(p1);
            let mut n = e;
            n.perp().normalize();
            self.edges.push(e);
            self.normals.push(n);
        }
        self
    }

    pub fn rotate(&mut self, angle: Fp) -> &mut Self {
        //! Rotates around the local origin (`pos`). Edges and normals are rotated alongside, no `recalc` needed.
        for ((p, e), n) in self.points.iter_mut().zip(self.edges.iter_mut()).zip(self.normals.iter_mut()) {
            p.rotate(angle);
            e.rotate(angle);
            n.rotate(angle);
        }
        self
    }

    pub fn translate(&mut self, x: Fp, y: Fp) -> &mut Self {
        //! Shifts the points relative to `pos`, moving the polygon's local origin. `pos` itself is unchanged.
        let offset = Vector::new(x, y);
        for p in self.points.iter_mut() {
            p.add(offset);
        }
        self
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.pos, &self.points)
    }

    pub fn world_points(&self) -> impl Iterator<Item = Vector> + '_ {
        let pos = self.pos;
        self.points.iter().map(move |&p| p + pos)
    }

    pub fn point_test(&self, point: Vector) -> bool {
        //! Whether `point` (world space) lies inside or on the polygon.
        let local = point - self.pos;
        self.points
            .iter()
            .zip(self.normals.iter())
            .all(|(&p, &n)| n.dot(local - p) <= 0.0)
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        //! Checks point count, finiteness and convexity (including winding direction).
        let len = self.points.len();
        if len < 3 {
            return Err(ShapeError::DebugAssertionFailed(Violation::TooFewPoints(len)));
        }
        if !self.pos.is_finite() {
            return Err(ShapeError::DebugAssertionFailed(Violation::NonFinite { index: 0 }));
        }
        if let Some(index) = self.points.iter().position(|p| !p.is_finite()) {
            return Err(ShapeError::DebugAssertionFailed(Violation::NonFinite { index }));
        }

        // sin of the turn between consecutive edges; collinear and zero-length edges pass
        const TOLERANCE: Fp = 1e-4;
        for i in 0..len {
            let e1 = self.edges[i];
            let e2 = self.edges[(i + 1) % len];
            let lens = e1.len() * e2.len();
            if lens == 0.0 {
                continue;
            }
            let cross = e1.x * e2.y - e1.y * e2.x;
            if cross / lens < -TOLERANCE {
                return Err(ShapeError::DebugAssertionFailed(Violation::NonConvex { index: (i + 1) % len }));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn debug_check(&self) -> Result<(), ShapeError> {
        //! [`Polygon::validate`] in debug builds, a no-op in release builds.
        if cfg!(debug_assertions) {
            self.validate()
        } else {
            Ok(())
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct PolygonDef {
    pos: Vector,
    points: Vec<Vector>,
}
#[cfg(feature = "serde")]
impl From<PolygonDef> for Polygon {
    fn from(def: PolygonDef) -> Self {
        Polygon::new(def.pos, def.points)
    }
}
#[cfg(feature = "serde")]
impl From<Polygon> for PolygonDef {
    fn from(poly: Polygon) -> Self {
        PolygonDef { pos: poly.pos, points: poly.points }
    }
}

// ---------- Shape ---------- //

/// Anything the broadphase can test: it only ever reads the polygon.
pub trait HasCollisionShape {
    fn collision_shape(&self) -> &Polygon;
}
impl HasCollisionShape for Polygon {
    #[inline]
    fn collision_shape(&self) -> &Polygon {
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Polygon(Polygon),
    Circle(Circle),
}
impl Shape {
    #[inline]
    pub fn as_ref(&self) -> ShapeRef<'_> {
        match self {
            Shape::Polygon(p) => ShapeRef::Polygon(p),
            Shape::Circle(c) => ShapeRef::Circle(c),
        }
    }
    #[inline]
    pub fn pos(&self) -> Vector {
        self.as_ref().pos()
    }
    pub fn aabb(&self) -> Aabb {
        match self {
            Shape::Polygon(p) => p.aabb(),
            Shape::Circle(c) => c.aabb(),
        }
    }
    pub fn point_test(&self, point: Vector) -> bool {
        match self {
            Shape::Polygon(p) => p.point_test(point),
            Shape::Circle(c) => c.point_test(point),
        }
    }
}
impl From<Polygon> for Shape {
    fn from(poly: Polygon) -> Self {
        Shape::Polygon(poly)
    }
}
impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}
impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Polygon(rect.to_polygon())
    }
}

/// A borrowed shape, as recorded in a [`Response`](response::Response).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeRef<'a> {
    Polygon(&'a Polygon),
    Circle(&'a Circle),
}
impl<'a> ShapeRef<'a> {
    #[inline]
    pub fn pos(&self) -> Vector {
        match self {
            ShapeRef::Polygon(p) => p.pos,
            ShapeRef::Circle(c) => c.pos,
        }
    }
    pub fn as_polygon(&self) -> Option<&'a Polygon> {
        match *self {
            ShapeRef::Polygon(p) => Some(p),
            ShapeRef::Circle(_) => None,
        }
    }
    pub fn as_circle(&self) -> Option<&'a Circle> {
        match *self {
            ShapeRef::Circle(c) => Some(c),
            ShapeRef::Polygon(_) => None,
        }
    }
    pub fn is(&self, shape: ShapeRef<'_>) -> bool {
        //! Identity comparison, as opposed to `==` which compares geometry.
        match (*self, shape) {
            (ShapeRef::Polygon(a), ShapeRef::Polygon(b)) => std::ptr::eq(a, b),
            (ShapeRef::Circle(a), ShapeRef::Circle(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn box_to_polygon() {
        let poly = Rect::new(Vector::new(3.0, 4.0), 10.0, 5.0).to_polygon();
        assert_eq!(poly.pos, Vector::new(3.0, 4.0));
        assert_eq!(poly.points(), &[Vector::new(0.0, 0.0), Vector::new(10.0, 0.0), Vector::new(10.0, 5.0), Vector::new(0.0, 5.0)]);
        assert_eq!(poly.edges(), &[Vector::new(10.0, 0.0), Vector::new(0.0, 5.0), Vector::new(-10.0, 0.0), Vector::new(0.0, -5.0)]);
        // outward in screen space: up, right, down, left
        assert_eq!(poly.normals(), &[Vector::new(0.0, -1.0), Vector::new(1.0, 0.0), Vector::new(0.0, 1.0), Vector::new(-1.0, 0.0)]);
        assert!(poly.validate().is_ok());
    }

    #[test]
    fn recalc_after_mutation() {
        let mut poly = Rect::new(Vector::ZERO, 10.0, 10.0).to_polygon();
        poly.points_mut()[1] = Vector::new(20.0, 0.0);
        assert_eq!(poly.edges()[0], Vector::new(10.0, 0.0)); // stale until recalc
        poly.recalc();
        assert_eq!(poly.edges()[0], Vector::new(20.0, 0.0));
        assert_eq!(poly.normals()[0], Vector::new(0.0, -1.0));
    }

    #[test]
    fn rotate_keeps_cache_consistent() {
        let mut rotated = Rect::new(Vector::ZERO, 4.0, 2.0).to_polygon();
        rotated.rotate(0.7);
        let mut fresh = rotated.clone();
        fresh.recalc();
        for (a, b) in rotated.edges().iter().zip(fresh.edges()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
        for (a, b) in rotated.normals().iter().zip(fresh.normals()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-5);
        }
    }

    #[test]
    fn translate_moves_points_not_pos() {
        let mut poly = Rect::new(Vector::new(1.0, 1.0), 2.0, 2.0).to_polygon();
        let normals = poly.normals().to_vec();
        poly.translate(-1.0, -1.0);
        assert_eq!(poly.pos, Vector::new(1.0, 1.0));
        assert_eq!(poly.points()[0], Vector::new(-1.0, -1.0));
        assert_eq!(poly.normals(), normals.as_slice());
    }

    #[test]
    fn degenerate_edge_has_zero_normal() {
        let poly = Polygon::new(Vector::ZERO, vec![Vector::ZERO, Vector::ZERO, Vector::new(1.0, 1.0), Vector::new(0.0, 1.0)]);
        assert_eq!(poly.normals()[0], Vector::ZERO);
        assert!(poly.validate().is_ok());
    }

    #[test]
    fn validation() {
        let concave = Polygon::new(
            Vector::ZERO,
            vec![Vector::new(0.0, 0.0), Vector::new(10.0, 0.0), Vector::new(5.0, 2.0), Vector::new(10.0, 10.0), Vector::new(0.0, 10.0)],
        );
        assert_eq!(concave.validate(), Err(ShapeError::DebugAssertionFailed(Violation::NonConvex { index: 2 })));

        let reversed = Polygon::new(Vector::ZERO, vec![Vector::new(0.0, 0.0), Vector::new(0.0, 10.0), Vector::new(10.0, 10.0), Vector::new(10.0, 0.0)]);
        assert!(matches!(reversed.validate(), Err(ShapeError::DebugAssertionFailed(Violation::NonConvex { .. }))));

        let nan = Polygon::new(Vector::ZERO, vec![Vector::ZERO, Vector::new(Fp::NAN, 0.0), Vector::new(0.0, 1.0)]);
        assert_eq!(nan.validate(), Err(ShapeError::DebugAssertionFailed(Violation::NonFinite { index: 1 })));

        let line = Polygon::new(Vector::ZERO, vec![Vector::ZERO, Vector::new(1.0, 0.0)]);
        assert_eq!(line.validate(), Err(ShapeError::DebugAssertionFailed(Violation::TooFewPoints(2))));
        assert_eq!(line.debug_check().is_err(), cfg!(debug_assertions));
    }

    #[test]
    fn bounds_and_points() {
        let poly = Rect::new(Vector::new(5.0, 5.0), 10.0, 4.0).to_polygon();
        let aabb = poly.aabb();
        assert_eq!(aabb, Aabb::new(5.0, 5.0, 15.0, 9.0));
        assert_eq!(Rect::from(aabb), Rect::new(Vector::new(5.0, 5.0), 10.0, 4.0));
        assert!(poly.point_test(Vector::new(15.0, 9.0)));
        assert!(poly.point_test(Vector::new(10.0, 7.0)));
        assert!(!poly.point_test(Vector::new(4.9, 7.0)));
        assert_eq!(poly.world_points().last(), Some(Vector::new(5.0, 9.0)));

        let circle = Circle::new(Vector::new(1.0, 1.0), 2.0);
        assert!(circle.aabb().aabb_test(&Aabb::new(2.5, 2.5, 4.0, 4.0)));
        assert!(!circle.point_test(Vector::new(3.5, 3.5)));
        assert!(Shape::from(circle).point_test(Vector::new(1.0, 2.5)));
    }

    #[test]
    fn shape_ref_identity() {
        let a = Rect::new(Vector::ZERO, 1.0, 1.0).to_polygon();
        let b = a.clone();
        assert_eq!(ShapeRef::Polygon(&a), ShapeRef::Polygon(&b));
        assert!(!ShapeRef::Polygon(&a).is(ShapeRef::Polygon(&b)));
        assert!(ShapeRef::Polygon(&a).is(ShapeRef::Polygon(&a)));
        assert!(ShapeRef::Polygon(&a).as_circle().is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn polygon_loads_with_fresh_cache() {
        let poly = Rect::new(Vector::new(3.0, 4.0), 10.0, 5.0).to_polygon();
        let json = serde_json::to_string(&poly).unwrap();
        assert!(!json.contains("normals"));

        let loaded: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.pos, poly.pos);
        assert_eq!(loaded.points(), poly.points());
        assert_eq!(loaded.edges(), poly.edges());
        assert_eq!(loaded.normals(), poly.normals());

        let skewed: Polygon = serde_json::from_str(r#"{"pos":{"x":0.0,"y":0.0},"points":[{"x":0.0,"y":0.0},{"x":4.0,"y":0.0},{"x":0.0,"y":3.0}]}"#).unwrap();
        assert_eq!(skewed.edges()[1], Vector::new(-4.0, 3.0));
        assert_eq!(skewed.normals()[0], Vector::new(0.0, -1.0));
    }
}
