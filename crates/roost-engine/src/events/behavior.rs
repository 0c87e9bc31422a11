//! Default behaviors for pointer-ish events.
//!
//! A press, release, click or touch only reaches an owner when the pointer is
//! over the owner's box. Bounds and pointer state are injected: the bus
//! knows nothing about world geometry.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use super::bus::{Behavior, EventBus};
use super::signal::Event;
use crate::api::types::{Bounds, OwnerId};
use crate::input::pointer::Pointer;

/// Events gated by the hover behavior.
pub const POINTER_EVENTS: [&str; 5] = ["mousedown", "mouseup", "click", "touchstart", "touchend"];

/// Whether `coords` (canvas space) falls strictly inside `bounds` (world
/// space) once the world offset is applied. Edges do not count.
pub fn is_hovered(bounds: &Bounds, coords: Vec2, world_offset: Vec2) -> bool {
    let pos = bounds.pos - world_offset;
    coords.x > pos.x
        && coords.x < pos.x + bounds.size.x
        && coords.y > pos.y
        && coords.y < pos.y + bounds.size.y
}

/// Shared registry of owner hit boxes, kept current by game code.
#[derive(Clone, Default)]
pub struct HitBoxes {
    boxes: Rc<RefCell<HashMap<OwnerId, Bounds>>>,
}

impl HitBoxes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, owner: OwnerId, bounds: Bounds) {
        self.boxes.borrow_mut().insert(owner, bounds);
    }

    pub fn remove(&self, owner: OwnerId) -> Option<Bounds> {
        self.boxes.borrow_mut().remove(&owner)
    }

    pub fn get(&self, owner: OwnerId) -> Option<Bounds> {
        self.boxes.borrow().get(&owner).copied()
    }
}

/// Build the hover predicate. Owners without a hit box never match.
pub fn pointer_behavior<E: Event + 'static>(pointer: Pointer, hit_boxes: HitBoxes) -> Behavior<E> {
    Rc::new(move |owner, _event: &E| {
        let state = pointer.snapshot();
        hit_boxes
            .get(owner)
            .is_some_and(|bounds| is_hovered(&bounds, state.coords, state.world_offset))
    })
}

/// Gate every entry of [`POINTER_EVENTS`] on `bus` with the hover predicate.
pub fn install_pointer_behaviors<E: Event + 'static>(bus: &EventBus<E>, pointer: Pointer, hit_boxes: HitBoxes) {
    let behavior = pointer_behavior(pointer, hit_boxes);
    for name in POINTER_EVENTS {
        bus.set_shared_behavior(name, Rc::clone(&behavior));
    }
}
