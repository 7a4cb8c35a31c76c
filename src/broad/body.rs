use crate::{factory, Fp, HasCollisionShape, Polygon, Projection, Rect, StairDir, Vector};
use std::{cell::Cell, rc::Rc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a level object is. Decides its collision shape and how others react to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BodyKind {
    Empty,
    Crate,
    Ladder,
    Sack,
    Enemy,
    Cash,
    Door,
    Scale,
    Cloud,
    Platform,
    Shuriken,
    Slope,
    Poly,
    Hill,
    Elevator,
    ScaleBg,
    Fireball,
}

/// A level object: a collision polygon plus the game data the broadphase reads.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: BodyKind,
    pub shape: Polygon,
    /// Nominal width, used by the bounds tests rather than the polygon's extent.
    pub w: Fp,
    /// Nominal height.
    pub h: Fp,
    /// Vertical velocity, carried over to whatever rests on an elevator.
    pub vy: Fp,
    /// Skipped by static body scans when `false`.
    pub collidable: bool,
    /// Set by the sprite loader once the image is available. Shared with whoever loads it.
    pub sprite_ready: Rc<Cell<bool>>,
}

impl Body {
    pub fn new(kind: BodyKind, x: Fp, y: Fp, w: Fp, h: Fp) -> Body {
        //! Builds the shape matching `kind`: beveled platforms and elevators, hills, ascending slopes
        //! and plain boxes for everything else. Use [`Body::slope`] to pick the slope direction and
        //! [`Body::with_shape`] for [`BodyKind::Poly`], which only gets a placeholder box here.
        let proj = Projection::default();
        if kind == BodyKind::Poly {
            tracing::warn!(x, y, w, h, "poly body built without its points, using a box");
        }
        let shape = match kind {
            BodyKind::Platform | BodyKind::Elevator => factory::skewed_rect(x, y, w, h, proj),
            BodyKind::Slope => factory::stair(x, y, w, h, StairDir::UpRight, proj),
            BodyKind::Hill => factory::hill(x, y, w, h, proj),
            _ => Rect::new(Vector::new(x, y), w, h).to_polygon(),
        };
        Body::with_shape(kind, shape, w, h)
    }
    pub fn slope(x: Fp, y: Fp, w: Fp, h: Fp, dir: StairDir) -> Body {
        Body::with_shape(BodyKind::Slope, factory::stair(x, y, w, h, dir, Projection::default()), w, h)
    }
    pub fn with_shape(kind: BodyKind, shape: Polygon, w: Fp, h: Fp) -> Body {
        Body {
            kind,
            shape,
            w,
            h,
            vy: 0.0,
            collidable: true,
            sprite_ready: Rc::new(Cell::new(false)),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vector {
        self.shape.pos
    }
    #[inline]
    pub fn bounds(&self) -> Rect {
        //! The nominal box at the shape's position.
        Rect::new(self.shape.pos, self.w, self.h)
    }
    #[inline]
    pub fn is_sprite_ready(&self) -> bool {
        self.sprite_ready.get()
    }
}

impl HasCollisionShape for Body {
    #[inline]
    fn collision_shape(&self) -> &Polygon {
        &self.shape
    }
}

/// A level object that can fall, stack, be picked up and be collected.
#[derive(Debug, Clone)]
pub struct Item {
    pub body: Body,
    pub grabbable: bool,
    /// Collection value, `-1` when worthless.
    pub value: i32,
    /// Invisible items neither fall nor get touched by the hero.
    pub visible: bool,
    pub vy: Fp,
    /// What the item rests on, a static body or another item.
    pub on_obj: Option<super::BodyId>,
    pub being_held: bool,
    pub recently_held: bool,
}

impl Item {
    pub fn new(body: Body) -> Item {
        Item {
            body,
            grabbable: false,
            value: -1,
            visible: true,
            vy: 0.0,
            on_obj: None,
            being_held: false,
            recently_held: false,
        }
    }

    #[inline]
    pub fn is_sprite_ready(&self) -> bool {
        self.body.is_sprite_ready()
    }
}

impl HasCollisionShape for Item {
    #[inline]
    fn collision_shape(&self) -> &Polygon {
        &self.body.shape
    }
}

/// A thrown body travelling horizontally at a fixed speed.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub heading_right: bool,
}

impl HasCollisionShape for Projectile {
    #[inline]
    fn collision_shape(&self) -> &Polygon {
        &self.body.shape
    }
}
