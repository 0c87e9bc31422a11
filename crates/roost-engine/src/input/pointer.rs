use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

/// Where the pointer sits while it is over the canvas but has not moved yet.
pub const POINTER_IDLE: Vec2 = Vec2::new(9999.0, 9999.0);
/// Where the pointer is parked after it leaves the canvas.
pub const POINTER_OFFSCREEN: Vec2 = Vec2::new(-9999.0, -9999.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Pointer position relative to the canvas.
    pub coords: Vec2,
    /// Current world offset of the viewport.
    pub world_offset: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            coords: POINTER_IDLE,
            world_offset: Vec2::ZERO,
        }
    }
}

/// Shared pointer handle. Clones observe the same state, so hover
/// predicates registered on the bus see moves made by the input path.
#[derive(Clone, Default)]
pub struct Pointer {
    state: Rc<Cell<PointerState>>,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coords(&self) -> Vec2 {
        self.state.get().coords
    }

    pub fn set_coords(&self, coords: Vec2) {
        let mut s = self.state.get();
        s.coords = coords;
        self.state.set(s);
    }

    /// Park the pointer off the canvas.
    pub fn leave(&self) {
        self.set_coords(POINTER_OFFSCREEN);
    }

    pub fn world_offset(&self) -> Vec2 {
        self.state.get().world_offset
    }

    pub fn set_world_offset(&self, offset: Vec2) {
        let mut s = self.state.get();
        s.world_offset = offset;
        self.state.set(s);
    }

    pub fn snapshot(&self) -> PointerState {
        self.state.get()
    }
}
