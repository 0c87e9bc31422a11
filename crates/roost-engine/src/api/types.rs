use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Identifies the object a listener is registered for.
/// The bus only compares owners; it never holds the object itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub u32);

/// Axis-aligned box in world coordinates (top-left corner plus size).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

/// Per-frame timing published to the page via a shared buffer.
/// Generic container: every field is an `f32` so JS can read it as a `Float32Array`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameStats {
    pub frames: f32,
    /// Seconds between the last two frames.
    pub last_delta: f32,
    /// Seconds the current run has been animating.
    pub elapsed: f32,
    /// 1.0 while animating, 0.0 otherwise.
    pub animating: f32,
}

impl FrameStats {
    pub const FLOATS: usize = 4;

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(self))
    }
}
