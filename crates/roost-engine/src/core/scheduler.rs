//! Frame loop: update, clear, draw, repeat on the platform's repaint callback.
//!
//! ```text
//!            start_animating / focus (after blur)
//!   Stopped ─────────────────────────────────────▶ Running
//!      ▲                                              │
//!      └──────────── stop_animating / blur ───────────┘
//! ```
//!
//! Focus only resumes a run that blur stopped; a manual stop or game over
//! stays stopped.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::api::game::{EngineContext, Game};
use crate::api::types::FrameStats;
use crate::core::profile::{FrameReport, PhaseStats};
use crate::core::time::Timer;
use crate::error::EngineError;
use crate::events::signal::Signal;
use crate::input::queue::InputEvent;
use crate::renderer::traits::Renderer;

/// Platform hook: run the scheduler's `tick` once before the next repaint.
pub trait FrameRequester {
    fn request_frame(&mut self);
}

/// Counts frame requests instead of scheduling anything.
/// Drive it by calling `tick` while `take()` returns true.
#[derive(Clone, Default)]
pub struct ManualFrames {
    pending: Rc<Cell<u32>>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> u32 {
        self.pending.get()
    }

    /// Consume one pending request.
    pub fn take(&self) -> bool {
        let n = self.pending.get();
        if n == 0 {
            return false;
        }
        self.pending.set(n - 1);
        true
    }
}

impl FrameRequester for ManualFrames {
    fn request_frame(&mut self) {
        self.pending.set(self.pending.get() + 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    Start,
    Stop,
    GameOver,
}

/// Shared mailbox for start/stop requests. Clones share the mailbox, so
/// listeners on the bus can capture one. The scheduler applies the request
/// after the current frame, or right after input while stopped.
#[derive(Clone, Default)]
pub struct SchedulerControl {
    pending: Rc<Cell<Option<ControlRequest>>>,
}

impl SchedulerControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_start(&self) {
        self.request(ControlRequest::Start);
    }

    pub fn request_stop(&self) {
        self.request(ControlRequest::Stop);
    }

    pub fn request_game_over(&self) {
        self.request(ControlRequest::GameOver);
    }

    /// Latest request wins, except that a game over is never downgraded.
    fn request(&self, req: ControlRequest) {
        if self.pending.get() != Some(ControlRequest::GameOver) {
            self.pending.set(Some(req));
        }
    }

    pub fn take(&self) -> Option<ControlRequest> {
        self.pending.take()
    }
}

pub struct AnimationScheduler<G: Game> {
    game: G,
    ctx: EngineContext,
    renderer: Box<dyn Renderer>,
    frames: Box<dyn FrameRequester>,
    animating: bool,
    blurred: bool,
    game_over: bool,
    pause_on_blur: bool,
    frame_pending: bool,
    timer: Timer,
    /// Seconds animated in the current run, read without sampling the timer.
    run_elapsed: f64,
    frame_count: u64,
    stats: PhaseStats,
}

impl<G: Game> AnimationScheduler<G> {
    /// Scheduler with a context built from `game.config()` on the system clock.
    pub fn new(game: G, renderer: Box<dyn Renderer>, frames: Box<dyn FrameRequester>) -> Self {
        let ctx = EngineContext::new(&game.config());
        Self::with_context(game, ctx, renderer, frames)
    }

    pub fn with_context(
        game: G,
        ctx: EngineContext,
        renderer: Box<dyn Renderer>,
        frames: Box<dyn FrameRequester>,
    ) -> Self {
        let pause_on_blur = game.config().pause_on_blur;
        let timer = ctx.timer(false);
        Self {
            game,
            ctx,
            renderer,
            frames,
            animating: false,
            blurred: false,
            game_over: false,
            pause_on_blur,
            frame_pending: false,
            timer,
            run_elapsed: 0.0,
            frame_count: 0,
            stats: PhaseStats::default(),
        }
    }

    /// Run the game's setup, start animating unless it declines, then
    /// announce `start` on the bus.
    pub fn launch(&mut self, first_run: bool) {
        let start = self.game.setup(&mut self.ctx, first_run);
        if start {
            self.start_animating();
        }
        self.ctx.events.trigger("start", &Signal::new());
        self.apply_control();
    }

    /// No-op while running. Each run gets a fresh frame timer and zeroed
    /// frame count and phase stats.
    pub fn start_animating(&mut self) {
        if self.animating {
            return;
        }
        self.animating = true;
        self.game_over = false;
        self.timer = self.ctx.timer(false);
        self.timer.start();
        self.run_elapsed = 0.0;
        self.frame_count = 0;
        self.stats.reset();
        log::info!("animation started");
        self.request_frame();
    }

    /// Manual stop: focus will not resume it.
    pub fn stop_animating(&mut self) {
        self.blurred = false;
        self.halt();
    }

    fn halt(&mut self) {
        if !self.animating {
            return;
        }
        self.animating = false;
        self.timer.stop();
        self.run_elapsed = self.timer.elapsed();
        log::info!("animation stopped after {} frames", self.frame_count);
        if self.ctx.debug_mode {
            if let Some(report) = self.report() {
                match serde_json::to_string(&report) {
                    Ok(json) => log::info!("frame report: {}", json),
                    Err(err) => log::warn!("frame report unavailable: {}", err),
                }
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// The page lost focus. Stops a running loop and remembers why.
    pub fn on_blur(&mut self) {
        if !self.pause_on_blur || !self.animating {
            return;
        }
        self.halt();
        self.blurred = true;
    }

    /// The page regained focus. Resumes only a loop that blur stopped.
    pub fn on_focus(&mut self) {
        if self.blurred {
            self.blurred = false;
            self.start_animating();
        }
    }

    pub fn is_blurred(&self) -> bool {
        self.blurred
    }

    /// Stop and wait for a click to restart with `setup(first_run = false)`.
    pub fn game_over(&mut self) {
        self.stop_animating();
        self.game_over = true;
        log::info!("game over");
        self.ctx.events.trigger("gameover", &Signal::new());
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Deliver one input event.
    ///
    /// While running, input is queued and dispatched at the start of the next
    /// frame. While stopped it is dispatched at once, so start buttons and
    /// the click-to-restart after a game over work without a frame loop.
    /// Input still queued from before the stop goes out first.
    pub fn handle_input(&mut self, event: InputEvent) {
        if self.animating {
            self.ctx.push_input(event);
            return;
        }
        self.ctx.dispatch_pending_input();
        self.ctx.dispatch_input(event);
        if self.game_over && matches!(event, InputEvent::Click { .. }) {
            self.game_over = false;
            self.launch(false);
            return;
        }
        self.apply_control();
    }

    /// One frame, called from the platform's repaint callback.
    ///
    /// Hook errors stop the loop (no next frame is requested) and are
    /// returned to the caller.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        self.frame_pending = false;
        if !self.animating {
            return Ok(());
        }

        // The only place the frame timer is sampled.
        let delta = self.timer.delta();
        self.run_elapsed += delta;
        self.frame_count += 1;
        self.ctx.begin_frame(delta, self.frame_count);

        if let Err(err) = self.run_frame(delta) {
            log::error!("frame {} aborted: {}", self.frame_count, err);
            self.stop_animating();
            return Err(err);
        }

        self.apply_control();
        if self.animating {
            self.request_frame();
        }
        Ok(())
    }

    fn run_frame(&mut self, delta: f64) -> Result<(), EngineError> {
        let debug = self.ctx.debug_mode;
        let mut phase = self.ctx.timer(true);

        // update
        self.ctx.dispatch_pending_input();
        let step = self.ctx.update_scroll(delta);
        if step.moved != Vec2::ZERO {
            self.renderer.translate(-step.moved);
        }
        self.game.update(&mut self.ctx)?;
        if debug {
            self.stats.update += phase.delta();
        }

        // clear
        self.renderer.clear(&self.ctx.viewport);
        if debug {
            self.stats.clear += phase.delta();
        }

        // draw
        self.game.draw(&self.ctx, self.renderer.as_mut())?;
        if debug {
            self.stats.draw += phase.delta();
        }
        Ok(())
    }

    fn apply_control(&mut self) {
        match self.ctx.control.take() {
            Some(ControlRequest::Start) => self.start_animating(),
            Some(ControlRequest::Stop) => self.stop_animating(),
            Some(ControlRequest::GameOver) => self.game_over(),
            None => {}
        }
    }

    fn request_frame(&mut self) {
        if !self.frame_pending {
            self.frame_pending = true;
            self.frames.request_frame();
        }
    }

    /// Resize the canvas. If that pulls the viewport offset back inside the
    /// world, the renderer is translated to match.
    pub fn resize_canvas(&mut self, canvas_size: Vec2) {
        let moved = self.ctx.viewport.resize(canvas_size);
        if moved != Vec2::ZERO {
            self.renderer.translate(-moved);
        }
        self.ctx.pointer.set_world_offset(self.ctx.viewport.offset);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_delta(&self) -> f64 {
        self.ctx.last_delta()
    }

    /// Phase statistics for the current (or last) run.
    pub fn report(&self) -> Option<FrameReport> {
        self.stats.report(self.frame_count, self.run_elapsed)
    }

    pub fn frame_stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frame_count as f32,
            last_delta: self.ctx.last_delta() as f32,
            elapsed: self.run_elapsed as f32,
            animating: if self.animating { 1.0 } else { 0.0 },
        }
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }
}
