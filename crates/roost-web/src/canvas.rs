use std::cell::RefCell;
use std::rc::Rc;

use roost_engine::renderer::traits::Renderer;
use roost_engine::{Bounds, CanvasId, LayerId, LoadedImage, RenderError, Vec2, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

const BACKEND: &str = "canvas2d";

#[derive(Default)]
struct SurfaceSlots {
    images: Vec<HtmlImageElement>,
    layers: Vec<HtmlCanvasElement>,
    canvases: Vec<HtmlCanvasElement>,
}

/// DOM objects the engine refers to by id: decoded images, offscreen layers
/// and raw canvases. Clones share the same slots.
#[derive(Clone, Default)]
pub struct Surfaces {
    slots: Rc<RefCell<SurfaceSlots>>,
}

impl Surfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a decoded image; the returned index becomes its `ImageHandle`.
    pub fn add_image(&self, image: HtmlImageElement) -> u32 {
        let mut slots = self.slots.borrow_mut();
        slots.images.push(image);
        (slots.images.len() - 1) as u32
    }

    /// Create an offscreen canvas the game can paint once and draw many times.
    pub fn add_layer(&self, document: &Document, width: u32, height: u32) -> Result<LayerId, JsValue> {
        let layer: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        layer.set_width(width);
        layer.set_height(height);
        let mut slots = self.slots.borrow_mut();
        slots.layers.push(layer);
        Ok(LayerId((slots.layers.len() - 1) as u32))
    }

    pub fn layer(&self, id: LayerId) -> Option<HtmlCanvasElement> {
        self.slots.borrow().layers.get(id.0 as usize).cloned()
    }

    pub fn add_canvas(&self, canvas: HtmlCanvasElement) -> CanvasId {
        let mut slots = self.slots.borrow_mut();
        slots.canvases.push(canvas);
        CanvasId((slots.canvases.len() - 1) as u32)
    }

    fn image(&self, image: &LoadedImage) -> Result<HtmlImageElement, RenderError> {
        self.slots
            .borrow()
            .images
            .get(image.handle.0 as usize)
            .cloned()
            .ok_or_else(|| RenderError::Unresolved(format!("image handle {}", image.handle.0)))
    }

    fn canvas(&self, id: CanvasId) -> Option<HtmlCanvasElement> {
        self.slots.borrow().canvases.get(id.0 as usize).cloned()
    }
}

/// `Renderer` over a 2D canvas context. Coordinates are world units; the
/// context carries the scroll translation.
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    surfaces: Surfaces,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, surfaces: Surfaces) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self { ctx, surfaces })
    }
}

fn backend_error(err: JsValue) -> RenderError {
    RenderError::Backend {
        backend: BACKEND,
        message: err.as_string().unwrap_or_else(|| format!("{:?}", err)),
    }
}

impl Renderer for CanvasRenderer {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    fn clear(&mut self, viewport: &Viewport) {
        self.ctx.clear_rect(
            viewport.offset.x as f64,
            viewport.offset.y as f64,
            viewport.canvas_size.x as f64,
            viewport.canvas_size.y as f64,
        );
    }

    fn translate(&mut self, delta: Vec2) {
        if let Err(err) = self.ctx.translate(delta.x as f64, delta.y as f64) {
            log::warn!("translate failed: {:?}", err);
        }
    }

    fn draw_image(&mut self, image: &LoadedImage, dest: &Bounds) -> Result<(), RenderError> {
        let element = self.surfaces.image(image)?;
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                &element,
                dest.pos.x as f64,
                dest.pos.y as f64,
                dest.size.x as f64,
                dest.size.y as f64,
            )
            .map_err(backend_error)
    }

    fn draw_sprite_frame(
        &mut self,
        sheet: &LoadedImage,
        frame: &Bounds,
        dest: &Bounds,
    ) -> Result<(), RenderError> {
        let element = self.surfaces.image(sheet)?;
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &element,
                frame.pos.x as f64,
                frame.pos.y as f64,
                frame.size.x as f64,
                frame.size.y as f64,
                dest.pos.x as f64,
                dest.pos.y as f64,
                dest.size.x as f64,
                dest.size.y as f64,
            )
            .map_err(backend_error)
    }

    fn draw_layer(&mut self, layer: LayerId, dest: &Bounds) -> Result<(), RenderError> {
        let element = self
            .surfaces
            .layer(layer)
            .ok_or_else(|| RenderError::Unresolved(format!("layer {}", layer.0)))?;
        self.blit_canvas(&element, dest)
    }

    fn draw_canvas(&mut self, canvas: CanvasId, dest: &Bounds) -> Result<(), RenderError> {
        let element = self
            .surfaces
            .canvas(canvas)
            .ok_or_else(|| RenderError::Unresolved(format!("canvas {}", canvas.0)))?;
        self.blit_canvas(&element, dest)
    }
}

impl CanvasRenderer {
    fn blit_canvas(&self, element: &HtmlCanvasElement, dest: &Bounds) -> Result<(), RenderError> {
        self.ctx
            .draw_image_with_html_canvas_element_and_dw_and_dh(
                element,
                dest.pos.x as f64,
                dest.pos.y as f64,
                dest.size.x as f64,
                dest.size.y as f64,
            )
            .map_err(backend_error)
    }
}
