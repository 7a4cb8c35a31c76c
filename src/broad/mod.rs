//! Broadphase: linear scans of a level's bodies against a query shape.
//!
//! There is no spatial partitioning. Every scan visits bodies in insertion order, which callers
//! rely on for first-match semantics when stacking.

mod body;

pub use body::{Body, BodyKind, Item, Projectile};

use crate::{
    narrow::{response::Response, sat::test_polygon_polygon},
    Fp, HasCollisionShape, Rect,
};
use fnv::FnvBuildHasher;
use indexmap::IndexMap;

/// Handle to a body or item in a [`Level`]. Never reused within a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

// ---------- Level ---------- //

/// The static bodies and the items of one level.
#[derive(Debug, Default)]
pub struct Level {
    objs: IndexMap<BodyId, Body, FnvBuildHasher>,
    items: IndexMap<BodyId, Item, FnvBuildHasher>,
    next_id: u32,
}

impl Level {
    pub fn new() -> Level {
        Level::default()
    }

    fn next_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert_obj(&mut self, body: Body) -> BodyId {
        let id = self.next_id();
        tracing::debug!(?id, kind = ?body.kind, "static body added");
        self.objs.insert(id, body);
        id
    }
    pub fn insert_item(&mut self, item: Item) -> BodyId {
        let id = self.next_id();
        tracing::debug!(?id, kind = ?item.body.kind, "item added");
        self.items.insert(id, item);
        id
    }

    pub fn remove_obj(&mut self, id: BodyId) -> Option<Body> {
        //! Removes a static body, keeping the scan order of the rest. Items resting on it start falling.
        let body = self.objs.shift_remove(&id)?;
        tracing::debug!(?id, kind = ?body.kind, "static body removed");
        self.drop_support(id);
        Some(body)
    }
    pub fn remove_item(&mut self, id: BodyId) -> Option<Item> {
        //! Removes an item, keeping the scan order of the rest. Items resting on it start falling.
        let item = self.items.shift_remove(&id)?;
        tracing::debug!(?id, kind = ?item.body.kind, "item removed");
        self.drop_support(id);
        Some(item)
    }
    fn drop_support(&mut self, id: BodyId) {
        for item in self.items.values_mut() {
            if item.on_obj == Some(id) {
                item.on_obj = None;
            }
        }
    }

    #[inline]
    pub fn obj(&self, id: BodyId) -> Option<&Body> {
        self.objs.get(&id)
    }
    #[inline]
    pub fn obj_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.objs.get_mut(&id)
    }
    #[inline]
    pub fn item(&self, id: BodyId) -> Option<&Item> {
        self.items.get(&id)
    }
    #[inline]
    pub fn item_mut(&mut self, id: BodyId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn objs(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.objs.iter().map(|(&id, b)| (id, b))
    }
    pub fn items(&self) -> impl Iterator<Item = (BodyId, &Item)> + '_ {
        self.items.iter().map(|(&id, i)| (id, i))
    }
    #[inline]
    pub fn obj_count(&self) -> usize {
        self.objs.len()
    }
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn scroll(&mut self, dx: Fp) {
        //! Shifts every body and item left by `dx`, following a camera moving right.
        for obj in self.objs.values_mut() {
            obj.shape.pos.x -= dx;
        }
        for item in self.items.values_mut() {
            item.body.shape.pos.x -= dx;
        }
    }

    // ---------- Scans ---------- //

    pub fn for_each_colliding_static_body<T, F>(&self, body: &T, mut on_collide: F)
    where
        T: HasCollisionShape + ?Sized,
        F: FnMut(BodyId, &Body, &Response<'_>),
    {
        //! Tests `body` against every collidable static body, calling `on_collide` per hit.
        //! The response is cleared after each candidate and must not be kept past the call.
        let shape = body.collision_shape();
        let mut response = Response::new();
        for (&id, obj) in self.objs.iter() {
            if !obj.collidable {
                continue;
            }
            if test_polygon_polygon(shape, &obj.shape, Some(&mut response)) {
                tracing::trace!(?id, kind = ?obj.kind, overlap = response.overlap, "static body hit");
                on_collide(id, obj, &response);
            }
            response.clear();
        }
    }

    pub fn colliding_static_bodies<'a, T>(&'a self, body: &'a T) -> impl Iterator<Item = (BodyId, Response<'a>)> + 'a
    where
        T: HasCollisionShape + ?Sized,
    {
        //! Lazy form of [`Level::for_each_colliding_static_body`]. Each hit carries its own response.
        let shape = body.collision_shape();
        self.objs
            .iter()
            .filter(|(_, obj)| obj.collidable)
            .filter_map(move |(&id, obj)| {
                let mut response = Response::new();
                if test_polygon_polygon(shape, &obj.shape, Some(&mut response)) {
                    Some((id, response))
                } else {
                    None
                }
            })
    }

    pub fn for_each_colliding_item<T, F>(&self, body: &T, mut on_collide: F)
    where
        T: HasCollisionShape + ?Sized,
        F: FnMut(BodyId, &Item, &Response<'_>),
    {
        //! Tests `body` against every visible item.
        let shape = body.collision_shape();
        let mut response = Response::new();
        for (&id, item) in self.items.iter() {
            if !item.visible {
                continue;
            }
            if test_polygon_polygon(shape, &item.body.shape, Some(&mut response)) {
                tracing::trace!(?id, kind = ?item.body.kind, "item hit");
                on_collide(id, item, &response);
            }
            response.clear();
        }
    }

    pub fn find_item_support(&self, item_id: BodyId) -> Option<(BodyId, Response<'_>)> {
        //! The first crate, not being held and other than the item itself, that the item sits on top of.
        //! Applying the response (`pos -= overlap_v`) is left to the caller.
        let item = self.items.get(&item_id)?;
        let mut response = Response::new();
        for (&id, other) in self.items.iter() {
            if id == item_id || other.being_held || other.body.kind != BodyKind::Crate {
                continue;
            }
            if test_polygon_polygon(&item.body.shape, &other.body.shape, Some(&mut response)) && response.is_landing() {
                return Some((id, response));
            }
            response.clear();
        }
        None
    }

    fn support_vy(&self, id: BodyId) -> Fp {
        match self.objs.get(&id) {
            Some(obj) if obj.kind == BodyKind::Elevator => obj.vy,
            _ => 0.0,
        }
    }

    pub fn step_items(&mut self, gravity: Fp, max_vy: Fp) {
        //! Advances every item by one tick.
        //!
        //! Visible items that rest on nothing accelerate by `gravity` (capped at `max_vy`), are pushed
        //! out of each static body in turn and come to rest on the ones they land on. They may then
        //! land on a crate, which can no longer be picked up. Resting items take on their support's
        //! vertical velocity: an elevator's, or zero.
        for idx in 0..self.items.len() {
            let (id, falling) = match self.items.get_index(idx) {
                Some((&id, item)) => (id, item.visible && item.on_obj.is_none()),
                None => continue,
            };

            if falling {
                self.fall(idx, gravity, max_vy);

                let support = self.find_item_support(id).map(|(sid, r)| (sid, r.overlap_v));
                if let Some((sid, overlap_v)) = support {
                    if let Some((_, item)) = self.items.get_index_mut(idx) {
                        item.body.shape.pos.sub(overlap_v);
                        item.on_obj = Some(sid);
                        item.recently_held = false;
                    }
                    if let Some(under) = self.items.get_mut(&sid) {
                        under.grabbable = false;
                    }
                    tracing::trace!(?id, on = ?sid, "item landed on item");
                }
            }

            let carried = match self.items.get_index(idx) {
                Some((_, item)) => item.on_obj.map(|sid| self.support_vy(sid)),
                None => None,
            };
            if let Some((_, item)) = self.items.get_index_mut(idx) {
                if let Some(vy) = carried {
                    item.vy = vy;
                }
                item.body.shape.pos.y += item.vy;
            }
        }
    }

    fn fall(&mut self, idx: usize, gravity: Fp, max_vy: Fp) {
        //! Gravity plus resolution against the static bodies, one body at a time.
        let Level { objs, items, .. } = self;
        let (id, item) = match items.get_index_mut(idx) {
            Some((id, item)) => (*id, item),
            None => return,
        };

        if item.vy < max_vy {
            item.vy += gravity;
        } else {
            item.vy = max_vy;
        }

        for (&oid, obj) in objs.iter() {
            if !obj.collidable {
                continue;
            }
            let mut response = Response::new();
            if !test_polygon_polygon(&item.body.shape, &obj.shape, Some(&mut response)) {
                continue;
            }
            let landed = response.is_landing();
            let overlap_v = response.overlap_v;

            item.body.shape.pos.sub(overlap_v);
            if landed {
                item.vy = if obj.kind == BodyKind::Elevator { obj.vy } else { 0.0 };
                item.on_obj = Some(oid);
                item.recently_held = false;
                tracing::trace!(?id, on = ?oid, kind = ?obj.kind, "item landed");
            }
        }
    }

    pub fn sweep_projectiles(&self, projectiles: &mut Vec<Projectile>, speed: Fp, screen_w: Fp) -> usize {
        //! Moves each projectile `speed` along its heading, then drops those that left the screen
        //! (`0..=screen_w`) or hit a collidable static body. Returns how many were dropped.
        for p in projectiles.iter_mut() {
            p.body.shape.pos.x += if p.heading_right { speed } else { -speed };
        }

        let before = projectiles.len();
        projectiles.retain(|p| {
            let x = p.body.shape.pos.x;
            if x > screen_w || x < 0.0 {
                tracing::debug!(x, "projectile left the screen");
                return false;
            }
            if let Some((id, _)) = self.colliding_static_bodies(p).next() {
                tracing::debug!(?id, "projectile hit a static body");
                return false;
            }
            true
        });
        before - projectiles.len()
    }
}

// ---------- Bounds ---------- //

pub fn is_overlapping(a: &Rect, b: &Rect, margin: Fp, world_x: Option<Fp>) -> bool {
    //! Box overlap shrunk by `margin` on every side (a negative margin grows it).
    //! When `world_x` is given, it is added to `a`'s x, taking `a` from screen to level space.
    let ax = match world_x {
        Some(offset) => a.pos.x + offset,
        None => a.pos.x,
    };
    ax + margin <= b.pos.x + b.w
        && b.pos.x + margin <= ax + a.w
        && a.pos.y + margin <= b.pos.y + b.h
        && b.pos.y + margin <= a.pos.y + a.h
}
