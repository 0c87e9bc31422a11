use std::rc::Rc;

use roost_engine::{
    AnimationScheduler, AssetError, Clock, EngineContext, FrameRequester, FrameStats, Game, GameConfig,
    ImageCache, InputEvent, LayerId, PreloadManifest, Renderer,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement};

use crate::canvas::{CanvasRenderer, Surfaces};
use crate::frames::{self, FrameCallback};
use crate::loader::{DateClock, HtmlImageLoader};

/// Generic game runner that wires a game to the browser.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]` (see [`export_game!`](crate::export_game)),
/// because wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    scheduler: AnimationScheduler<G>,
    config: GameConfig,
    manifest: PreloadManifest,
    surfaces: Surfaces,
    document: Option<Document>,
    /// Flat copy of the latest frame stats for `Float32Array` reads.
    stats: FrameStats,
    last_error: Option<String>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(
        game: G,
        renderer: Box<dyn Renderer>,
        frames: Box<dyn FrameRequester>,
        clock: Rc<dyn Clock>,
        surfaces: Surfaces,
    ) -> Self {
        let config = game.config();
        let ctx = EngineContext::with_clock(&config, clock);
        Self {
            scheduler: AnimationScheduler::with_context(game, ctx, renderer, frames),
            config,
            manifest: PreloadManifest::default(),
            surfaces,
            document: None,
            stats: FrameStats::default(),
            last_error: None,
        }
    }

    /// Bind `game` to the canvas with id `canvas_id`, sized from its config.
    /// `on_frame` must call [`GameRunner::tick`].
    pub fn attach(game: G, canvas_id: &str, on_frame: FrameCallback) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id `{}`", canvas_id)))?
            .dyn_into()
            .map_err(JsValue::from)?;

        let config = game.config();
        canvas.set_width(config.canvas_width as u32);
        canvas.set_height(config.canvas_height as u32);

        let surfaces = Surfaces::new();
        let renderer = CanvasRenderer::new(&canvas, surfaces.clone())?;
        let frames = frames::for_window(window, on_frame, config.frame_interval_ms);

        let mut runner = Self::new(game, Box::new(renderer), frames, Rc::new(DateClock), surfaces);
        runner.document = Some(document);
        Ok(runner)
    }

    /// Parse a preload manifest. Replaces any earlier one.
    pub fn load_manifest(&mut self, json: &str) -> Result<(), AssetError> {
        self.manifest = PreloadManifest::from_json(json)?;
        log::info!("manifest: {} files to preload", self.manifest.preload_list().len());
        Ok(())
    }

    pub fn preload_list(&self) -> Vec<String> {
        self.manifest.preload_list()
    }

    pub fn images(&self) -> ImageCache {
        self.scheduler.ctx().images.clone()
    }

    pub fn image_loader(&self) -> HtmlImageLoader {
        HtmlImageLoader::new(self.surfaces.clone())
    }

    /// Offscreen layer the size of the world.
    pub fn add_world_layer(&self) -> Result<LayerId, JsValue> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| JsValue::from_str("runner is not attached to a document"))?;
        self.surfaces.add_layer(
            document,
            self.config.world_width as u32,
            self.config.world_height as u32,
        )
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn launch(&mut self, first_run: bool) {
        self.scheduler.launch(first_run);
        self.refresh_stats();
    }

    /// One frame. A hook error stops the loop; it is kept for
    /// [`last_error`](Self::last_error) since JS cannot receive it here.
    pub fn tick(&mut self) {
        if let Err(err) = self.scheduler.tick() {
            self.last_error = Some(err.to_string());
        }
        self.refresh_stats();
    }

    /// Message of the hook error that last stopped the loop.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.scheduler.handle_input(event);
    }

    pub fn focus(&mut self) {
        self.scheduler.on_focus();
    }

    pub fn blur(&mut self) {
        self.scheduler.on_blur();
        self.refresh_stats();
    }

    pub fn start_animating(&mut self) {
        self.last_error = None;
        self.scheduler.start_animating();
    }

    pub fn stop_animating(&mut self) {
        self.scheduler.stop_animating();
        self.refresh_stats();
    }

    pub fn scheduler(&self) -> &AnimationScheduler<G> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut AnimationScheduler<G> {
        &mut self.scheduler
    }

    fn refresh_stats(&mut self) {
        self.stats = self.scheduler.frame_stats();
    }

    // ---- Pointer accessors for Float32Array reads ----

    pub fn stats_ptr(&self) -> *const f32 {
        self.stats.as_floats().as_ptr()
    }

    pub fn stats_len(&self) -> u32 {
        FrameStats::FLOATS as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_engine::CanvasId;
    use roost_engine::{Bounds, EngineError, LoadedImage, ManualClock, ManualFrames, RenderError, Vec2, Viewport};

    struct NullRenderer;

    impl Renderer for NullRenderer {
        fn backend(&self) -> &'static str {
            "null"
        }
        fn clear(&mut self, _viewport: &Viewport) {}
        fn translate(&mut self, _delta: Vec2) {}
        fn draw_image(&mut self, _image: &LoadedImage, _dest: &Bounds) -> Result<(), RenderError> {
            Ok(())
        }
        fn draw_sprite_frame(&mut self, _sheet: &LoadedImage, _frame: &Bounds, _dest: &Bounds) -> Result<(), RenderError> {
            Ok(())
        }
        fn draw_layer(&mut self, _layer: LayerId, _dest: &Bounds) -> Result<(), RenderError> {
            Ok(())
        }
        fn draw_canvas(&mut self, _canvas: CanvasId, _dest: &Bounds) -> Result<(), RenderError> {
            Ok(())
        }
    }

    struct Crashy;

    impl Game for Crashy {
        fn setup(&mut self, _ctx: &mut EngineContext, _first_run: bool) -> bool {
            true
        }
        fn update(&mut self, _ctx: &mut EngineContext) -> Result<(), EngineError> {
            Err(EngineError::Hook("nest collapsed".into()))
        }
        fn draw(&mut self, _ctx: &EngineContext, _renderer: &mut dyn Renderer) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[test]
    fn tick_keeps_hook_error_for_js() {
        let frames = ManualFrames::new();
        let clock = ManualClock::new();
        let mut runner = GameRunner::new(
            Crashy,
            Box::new(NullRenderer),
            Box::new(frames.clone()),
            Rc::new(clock.clone()),
            Surfaces::new(),
        );
        runner.launch(true);
        assert!(runner.last_error().is_none());

        clock.advance(16.0);
        assert!(frames.take());
        runner.tick();
        assert_eq!(runner.last_error(), Some("hook failed: nest collapsed"));
        assert!(!runner.scheduler().is_animating());
        assert_eq!(frames.pending(), 0);

        runner.start_animating();
        assert!(runner.last_error().is_none());
    }
}
