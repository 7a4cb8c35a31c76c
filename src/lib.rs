//! Collision core for a 2D platformer.
//!
//! Level geometry and actors are convex [`Polygon`]s. Each tick an actor is scanned against the
//! level's static bodies ([`broad`]), every candidate pair goes through the separating axis test
//! ([`narrow`]), and the resulting [`Response`] tells the caller how to push the actor back out.

pub mod broad;
pub mod error;
pub mod factory;
pub mod narrow;
pub mod vector;

pub use broad::{is_overlapping, Body, BodyId, BodyKind, Item, Level, Projectile};
pub use error::{ShapeError, Violation};
pub use factory::{hill, skewed_rect, stair, Projection, StairDir};
pub use narrow::{
    response::{Contact, Response, Side},
    sat::{test_circle_circle, test_circle_polygon, test_polygon_circle, test_polygon_polygon},
    Aabb, Circle, HasCollisionShape, Polygon, Rect, Shape, ShapeRef,
};
pub use vector::Vector;

#[cfg(not(feature = "f64"))]
pub type Fp = f32;
#[cfg(not(feature = "f64"))]
pub type Vec2 = glam::Vec2;

#[cfg(feature = "f64")]
pub type Fp = f64;
#[cfg(feature = "f64")]
pub type Vec2 = glam::DVec2;
