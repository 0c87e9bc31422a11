use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::cache::ImageCache;
use crate::core::scheduler::SchedulerControl;
use crate::core::time::{Clock, SystemClock, Timer};
use crate::error::EngineError;
use crate::events::behavior::{install_pointer_behaviors, HitBoxes};
use crate::events::bus::EventBus;
use crate::events::signal::Signal;
use crate::input::pointer::Pointer;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::traits::Renderer;
use crate::renderer::viewport::{EdgeScroll, ScrollStep, Viewport};

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Collect per-phase timings and log a report when animation stops.
    pub debug_mode: bool,
    /// World width in world units.
    pub world_width: f32,
    /// World height in world units.
    pub world_height: f32,
    /// Canvas width in pixels.
    pub canvas_width: f32,
    /// Canvas height in pixels.
    pub canvas_height: f32,
    /// Frame cadence when the platform has no repaint callback (default: 1000/60).
    pub frame_interval_ms: f64,
    /// Scroll the viewport when the pointer nears a canvas edge.
    pub edge_scroll: bool,
    /// Edge zone as a fraction of the canvas size (default: 0.2).
    pub scroll_threshold: f32,
    /// Edge scroll speed in pixels per second (default: 350).
    pub scroll_distance: f32,
    /// Stop animating while the page is unfocused (default: true).
    pub pause_on_blur: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debug_mode: false,
            world_width: 800.0,
            world_height: 600.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            frame_interval_ms: 1000.0 / 60.0,
            edge_scroll: false,
            scroll_threshold: EdgeScroll::DEFAULT_THRESHOLD,
            scroll_distance: EdgeScroll::DEFAULT_DISTANCE,
            pause_on_blur: true,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before the context is built.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build (or rebuild) the game state. `first_run` is false when
    /// restarting after a game over. Returning false leaves animation stopped,
    /// e.g. until the player presses a start button.
    fn setup(&mut self, ctx: &mut EngineContext, first_run: bool) -> bool;

    /// Advance the game by one frame; `ctx.last_delta()` is the frame delta.
    fn update(&mut self, ctx: &mut EngineContext) -> Result<(), EngineError>;

    /// Draw the current state. The surface has already been cleared.
    fn draw(&mut self, ctx: &EngineContext, renderer: &mut dyn Renderer) -> Result<(), EngineError>;
}

/// Everything the game shares with the engine, owned by the application root.
pub struct EngineContext {
    pub events: EventBus<Signal>,
    pub images: ImageCache,
    pub pointer: Pointer,
    pub hit_boxes: HitBoxes,
    pub viewport: Viewport,
    pub edge_scroll: EdgeScroll,
    pub input: InputQueue,
    pub debug_mode: bool,
    /// Start/stop requests for the scheduler. Clone it into bus callbacks.
    pub control: SchedulerControl,
    clock: Rc<dyn Clock>,
    last_delta: f64,
    frame: u64,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_clock(config, Rc::new(SystemClock::new()))
    }

    /// Context on an injected clock; every timer it hands out shares it.
    pub fn with_clock(config: &GameConfig, clock: Rc<dyn Clock>) -> Self {
        let events = EventBus::new();
        let pointer = Pointer::new();
        let hit_boxes = HitBoxes::new();
        install_pointer_behaviors(&events, pointer.clone(), hit_boxes.clone());

        let mut edge_scroll = EdgeScroll::new(config.scroll_threshold, config.scroll_distance);
        if config.edge_scroll {
            edge_scroll.enable();
        }

        Self {
            events,
            images: ImageCache::new(),
            pointer,
            hit_boxes,
            viewport: Viewport::new(
                Vec2::new(config.world_width, config.world_height),
                Vec2::new(config.canvas_width, config.canvas_height),
            ),
            edge_scroll,
            input: InputQueue::new(),
            debug_mode: config.debug_mode,
            control: SchedulerControl::new(),
            clock,
            last_delta: 0.0,
            frame: 0,
        }
    }

    /// A new independent timer on the context clock, e.g. for countdowns.
    pub fn timer(&self, auto_start: bool) -> Timer {
        Timer::with_clock(auto_start, Rc::clone(&self.clock))
    }

    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    /// Seconds between the previous frame and this one.
    pub fn last_delta(&self) -> f64 {
        self.last_delta
    }

    /// Frames painted in the current run.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn begin_frame(&mut self, delta: f64, frame: u64) {
        self.last_delta = delta;
        self.frame = frame;
    }

    /// Stop animating once the current frame has been drawn.
    pub fn request_stop(&self) {
        self.control.request_stop();
    }

    /// End the game once the current frame has been drawn; a click restarts it.
    pub fn request_game_over(&self) {
        self.control.request_game_over();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Trigger one input on the bus under its DOM name. Positional events
    /// move the shared pointer first so hover behaviors see them.
    pub fn dispatch_input(&self, event: InputEvent) {
        match event {
            InputEvent::PointerLeave => self.pointer.leave(),
            _ => {
                if let Some(pos) = event.position() {
                    self.pointer.set_coords(pos);
                }
            }
        }
        self.events
            .trigger(event.event_name(), &Signal::from_input(event));
    }

    /// Drain the input queue onto the bus. Returns the dispatched events.
    pub fn dispatch_pending_input(&mut self) -> Vec<InputEvent> {
        let events = self.input.drain();
        for event in &events {
            self.dispatch_input(*event);
        }
        events
    }

    /// Run one edge-scroll step and announce scroll start/stop on the bus.
    pub fn update_scroll(&mut self, delta: f64) -> ScrollStep {
        let step = self
            .edge_scroll
            .update(&mut self.viewport, self.pointer.coords(), delta as f32);
        self.pointer.set_world_offset(self.viewport.offset);
        if let Some(transition) = step.transition {
            self.events
                .trigger(transition.event_name(), &Signal::new());
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Bounds, OwnerId};
    use crate::core::time::ManualClock;
    use std::cell::Cell;

    #[test]
    fn config_from_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "debug_mode": true, "world_width": 3000 }"#).unwrap();
        assert!(config.debug_mode);
        assert_eq!(config.world_width, 3000.0);
        assert_eq!(config.scroll_distance, 350.0);
        assert!(config.pause_on_blur);
    }

    #[test]
    fn context_timers_share_clock() {
        let clock = ManualClock::new();
        let ctx = EngineContext::with_clock(&GameConfig::default(), Rc::new(clock.clone()));
        let mut countdown = ctx.timer(true);
        clock.advance(5000.0);
        assert!((countdown.elapsed() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn input_moves_pointer_before_dispatch() {
        let mut ctx = EngineContext::new(&GameConfig::default());
        let button = OwnerId(7);
        ctx.hit_boxes.set(button, Bounds::new(10.0, 10.0, 40.0, 20.0));
        let pressed = Rc::new(Cell::new(0));
        let p = Rc::clone(&pressed);
        ctx.events.listen(button, "mousedown", move |_, _, _| p.set(p.get() + 1));

        ctx.push_input(InputEvent::PointerDown { pos: Vec2::new(20.0, 15.0) });
        ctx.push_input(InputEvent::PointerDown { pos: Vec2::new(200.0, 15.0) });
        let dispatched = ctx.dispatch_pending_input();
        assert_eq!(dispatched.len(), 2);
        assert_eq!(pressed.get(), 1);
        assert!(ctx.input.is_empty());
    }

    #[test]
    fn scroll_transitions_reach_the_bus() {
        let config = GameConfig {
            world_width: 2000.0,
            edge_scroll: true,
            ..GameConfig::default()
        };
        let mut ctx = EngineContext::new(&config);
        let started = Rc::new(Cell::new(false));
        let s = Rc::clone(&started);
        ctx.events.listen(OwnerId(1), "mousescrollon", move |_, _, _| s.set(true));

        ctx.pointer.set_coords(Vec2::new(790.0, 300.0));
        let step = ctx.update_scroll(0.5);
        assert_eq!(step.moved.x, 175.0);
        assert!(started.get());
        assert_eq!(ctx.pointer.world_offset().x, 175.0);
    }
}
