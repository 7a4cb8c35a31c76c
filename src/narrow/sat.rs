//! Separating axis tests between polygons and circles.
//!
//! A test returns whether the pair collides and, given a [`Response`], fills it with the minimum
//! translation that separates them. Shapes that touch exactly collide with an overlap of zero.

use super::{response::Response, Circle, Polygon, Shape, ShapeRef};
use crate::{Fp, Vector};

/// The extent of a point set along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Fp,
    pub max: Fp,
}

pub fn flatten_points_on(points: &[Vector], normal: Vector) -> Interval {
    //! Projects each point onto `normal` and keeps the extremes.
    let mut min = Fp::MAX;
    let mut max = Fp::MIN;
    for &p in points {
        let dot = p.dot(normal);
        if dot < min {
            min = dot;
        }
        if dot > max {
            max = dot;
        }
    }
    Interval { min, max }
}

/// Whether `axis` separates the two point sets, each placed at its position.
///
/// When it does not, and a response is given, the overlap along `axis` is folded into it:
/// the smaller of the current and this axis' overlap wins, and the containment flags are cleared
/// where one interval pokes out of the other.
pub fn is_separating_axis(
    a_pos: Vector,
    b_pos: Vector,
    a_points: &[Vector],
    b_points: &[Vector],
    axis: Vector,
    response: Option<&mut Response<'_>>,
) -> bool {
    let offset = (b_pos - a_pos).dot(axis);
    let ra = flatten_points_on(a_points, axis);
    let mut rb = flatten_points_on(b_points, axis);
    rb.min += offset;
    rb.max += offset;

    if ra.min > rb.max || rb.min > ra.max {
        return true;
    }

    if let Some(response) = response {
        let overlap;
        if ra.min < rb.min {
            response.a_in_b = false;
            if ra.max < rb.max {
                overlap = ra.max - rb.min;
                response.b_in_a = false;
            } else {
                overlap = shortest_exit(ra, rb);
            }
        } else {
            response.b_in_a = false;
            if ra.max > rb.max {
                overlap = ra.min - rb.max;
                response.a_in_b = false;
            } else {
                overlap = shortest_exit(ra, rb);
            }
        }

        let abs = overlap.abs();
        if abs < response.overlap {
            response.overlap = abs;
            response.overlap_n = axis;
            if overlap < 0.0 {
                response.overlap_n.reverse();
            }
        }
    }
    false
}

/// One interval contains the other: pick the shorter way out, negative meaning "backwards".
#[inline]
fn shortest_exit(ra: Interval, rb: Interval) -> Fp {
    let forward = ra.max - rb.min;
    let backward = rb.max - ra.min;
    if forward < backward {
        forward
    } else {
        -backward
    }
}

/// Where a point lies relative to a segment starting at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoronoiRegion {
    Left,
    Middle,
    Right,
}

pub fn voronoi_region(line: Vector, point: Vector) -> VoronoiRegion {
    //! `Left` lies before the segment's start, `Right` beyond its end, `Middle` alongside it.
    let len2 = line.len2();
    let dp = point.dot(line);
    if dp < 0.0 {
        VoronoiRegion::Left
    } else if dp > len2 {
        VoronoiRegion::Right
    } else {
        VoronoiRegion::Middle
    }
}

// ---------- Shape pairs ---------- //

pub fn test_circle_circle<'a>(a: &'a Circle, b: &'a Circle, response: Option<&mut Response<'a>>) -> bool {
    let mut diff = b.pos - a.pos;
    let total_r = a.r + b.r;
    let dist2 = diff.len2();
    if dist2 > total_r * total_r {
        return false;
    }

    if let Some(response) = response {
        let dist = dist2.sqrt();
        response.a = Some(ShapeRef::Circle(a));
        response.b = Some(ShapeRef::Circle(b));
        response.overlap = total_r - dist;
        response.overlap_n = *diff.normalize();
        response.overlap_v = diff * response.overlap;
        response.a_in_b = a.r <= b.r && dist <= b.r - a.r;
        response.b_in_a = b.r <= a.r && dist <= a.r - b.r;
    }
    true
}

/// The closest edge before or after `from` with a nonzero length.
/// Zero edges repeat a vertex, so the corner shared with it is unchanged.
fn nearest_edge(edges: &[Vector], from: usize, forward: bool) -> usize {
    let len = edges.len();
    let mut i = from;
    for _ in 0..len {
        i = if forward { (i + 1) % len } else { (i + len - 1) % len };
        if edges[i] != Vector::ZERO {
            break;
        }
    }
    i
}

pub fn test_polygon_circle<'a>(polygon: &'a Polygon, circle: &'a Circle, response: Option<&mut Response<'a>>) -> bool {
    //! Classifies the circle's center against each edge's Voronoi regions.
    //! Vertex regions measure against the corner, edge regions against the edge's normal.
    let circle_pos = circle.pos - polygon.pos;
    let radius = circle.r;
    let radius2 = radius * radius;
    let points = polygon.points();
    let edges = polygon.edges();
    let len = points.len();

    let mut response = response;
    for i in 0..len {
        if edges[i] == Vector::ZERO {
            continue;
        }
        let prev = nearest_edge(edges, i, false);
        let next = nearest_edge(edges, i, true);

        let mut point = circle_pos - points[i];
        if point.len2() > radius2 {
            if let Some(r) = response.as_deref_mut() {
                r.a_in_b = false;
            }
        }

        let mut overlap = 0.0;
        let mut overlap_n = None;
        match voronoi_region(edges[i], point) {
            VoronoiRegion::Left => {
                // the previous edge decides whether this is the corner at points[i]
                let point2 = circle_pos - points[prev];
                if voronoi_region(edges[prev], point2) == VoronoiRegion::Right {
                    let dist = point.len();
                    if dist > radius {
                        return false;
                    } else if let Some(r) = response.as_deref_mut() {
                        r.b_in_a = false;
                        overlap_n = Some(*point.normalize());
                        overlap = radius - dist;
                    }
                }
            }
            VoronoiRegion::Right => {
                // likewise for the corner at points[next]
                point = circle_pos - points[next];
                if voronoi_region(edges[next], point) == VoronoiRegion::Left {
                    let dist = point.len();
                    if dist > radius {
                        return false;
                    } else if let Some(r) = response.as_deref_mut() {
                        r.b_in_a = false;
                        overlap_n = Some(*point.normalize());
                        overlap = radius - dist;
                    }
                }
            }
            VoronoiRegion::Middle => {
                let mut normal = edges[i];
                normal.perp().normalize();
                let dist = point.dot(normal);
                if dist > 0.0 && dist.abs() > radius {
                    return false;
                } else if let Some(r) = response.as_deref_mut() {
                    overlap_n = Some(normal);
                    overlap = radius - dist;
                    if dist >= 0.0 || overlap < 2.0 * radius {
                        r.b_in_a = false;
                    }
                }
            }
        }

        if let (Some(n), Some(r)) = (overlap_n, response.as_deref_mut()) {
            if overlap.abs() < r.overlap.abs() {
                r.overlap = overlap;
                r.overlap_n = n;
            }
        }
    }

    if let Some(r) = response {
        r.a = Some(ShapeRef::Polygon(polygon));
        r.b = Some(ShapeRef::Circle(circle));
        r.overlap_v = r.overlap_n * r.overlap;
    }
    true
}

pub fn test_circle_polygon<'a>(circle: &'a Circle, polygon: &'a Polygon, response: Option<&mut Response<'a>>) -> bool {
    //! [`test_polygon_circle`] with the response mirrored to read from the circle's side.
    let mut response = response;
    let hit = test_polygon_circle(polygon, circle, response.as_deref_mut());
    if hit {
        if let Some(r) = response {
            r.swap();
        }
    }
    hit
}

pub fn test_polygon_polygon<'a>(a: &'a Polygon, b: &'a Polygon, response: Option<&mut Response<'a>>) -> bool {
    //! Tries every normal of `a`, then every normal of `b`, as a separating axis.
    //! Zero normals, left behind by zero-length edges, are skipped.
    //!
    //! A polygon without a usable normal is only tested against the other's axes, so it acts as
    //! its point set. When neither has one the pair collides with an overlap of `Fp::MAX`.
    let mut response = response;
    for &n in a.normals().iter().chain(b.normals()) {
        if n == Vector::ZERO {
            continue;
        }
        if is_separating_axis(a.pos, b.pos, a.points(), b.points(), n, response.as_deref_mut()) {
            return false;
        }
    }

    if let Some(r) = response {
        r.a = Some(ShapeRef::Polygon(a));
        r.b = Some(ShapeRef::Polygon(b));
        r.overlap_v = r.overlap_n * r.overlap;
    }
    true
}

impl Shape {
    pub fn test<'a>(&'a self, other: &'a Shape, response: Option<&mut Response<'a>>) -> bool {
        //! Dispatches to the test matching both shapes' kinds.
        match (self, other) {
            (Shape::Polygon(a), Shape::Polygon(b)) => test_polygon_polygon(a, b, response),
            (Shape::Polygon(a), Shape::Circle(b)) => test_polygon_circle(a, b, response),
            (Shape::Circle(a), Shape::Polygon(b)) => test_circle_polygon(a, b, response),
            (Shape::Circle(a), Shape::Circle(b)) => test_circle_circle(a, b, response),
        }
    }
}
