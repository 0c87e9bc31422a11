//! Drawing surface contract.
//!
//! The engine never draws pixels itself. A backend (the canvas 2D context in
//! roost-web, a recorder in tests) implements this trait; the scheduler
//! calls `clear` once per frame and game code draws through [`Drawable`]s.
//!
//! [`Drawable`]: super::source::Drawable

use glam::Vec2;

use super::source::{CanvasId, LayerId};
use super::viewport::Viewport;
use crate::api::types::Bounds;
use crate::assets::cache::LoadedImage;
use crate::error::RenderError;

pub trait Renderer {
    /// Backend identifier (e.g. "canvas2d").
    fn backend(&self) -> &'static str;

    /// Wipe the visible part of the world.
    fn clear(&mut self, viewport: &Viewport);

    /// Shift the drawing origin, in world units.
    fn translate(&mut self, delta: Vec2);

    fn draw_image(&mut self, image: &LoadedImage, dest: &Bounds) -> Result<(), RenderError>;

    /// Draw the `frame` rectangle (sheet pixel space) of a sprite sheet.
    fn draw_sprite_frame(
        &mut self,
        sheet: &LoadedImage,
        frame: &Bounds,
        dest: &Bounds,
    ) -> Result<(), RenderError>;

    fn draw_layer(&mut self, layer: LayerId, dest: &Bounds) -> Result<(), RenderError>;

    fn draw_canvas(&mut self, canvas: CanvasId, dest: &Bounds) -> Result<(), RenderError>;
}

/// Records every call as a short string; used by engine tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingRenderer {
    pub calls: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn backend(&self) -> &'static str {
        "recording"
    }

    fn clear(&mut self, viewport: &Viewport) {
        self.calls
            .borrow_mut()
            .push(format!("clear {},{}", viewport.offset.x, viewport.offset.y));
    }

    fn translate(&mut self, delta: Vec2) {
        self.calls
            .borrow_mut()
            .push(format!("translate {},{}", delta.x, delta.y));
    }

    fn draw_image(&mut self, image: &LoadedImage, _dest: &Bounds) -> Result<(), RenderError> {
        self.calls.borrow_mut().push(format!("image {}", image.handle.0));
        Ok(())
    }

    fn draw_sprite_frame(
        &mut self,
        sheet: &LoadedImage,
        frame: &Bounds,
        _dest: &Bounds,
    ) -> Result<(), RenderError> {
        self.calls.borrow_mut().push(format!(
            "frame {} @{},{}",
            sheet.handle.0, frame.pos.x, frame.pos.y
        ));
        Ok(())
    }

    fn draw_layer(&mut self, layer: LayerId, _dest: &Bounds) -> Result<(), RenderError> {
        self.calls.borrow_mut().push(format!("layer {}", layer.0));
        Ok(())
    }

    fn draw_canvas(&mut self, canvas: CanvasId, _dest: &Bounds) -> Result<(), RenderError> {
        self.calls.borrow_mut().push(format!("canvas {}", canvas.0));
        Ok(())
    }
}
