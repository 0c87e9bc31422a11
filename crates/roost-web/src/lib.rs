pub mod canvas;
pub mod frames;
pub mod loader;
pub mod runner;

pub use canvas::{CanvasRenderer, Surfaces};
pub use frames::{AnimationFrames, FrameCallback, TimeoutFrames};
pub use loader::{DateClock, HtmlImageLoader};
pub use runner::GameRunner;

pub use roost_engine;

#[doc(hidden)]
pub mod __private {
    pub use console_error_panic_hook;
    pub use console_log;
    pub use log;
}

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// The macro generates:
/// - `thread_local!` storage for the GameRunner
/// - a `with_runner()` helper
/// - the wasm-bindgen exports: init, manifest, start, input handlers,
///   focus/blur, start/stop and stats accessors
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::OwlGame;
///
/// roost_web::export_game!(OwlGame, "owls");
/// ```
///
/// The page then calls `game_init("canvas-id")`, optionally
/// `game_load_manifest(json)`, then `game_start()`, which preloads every
/// manifest image and launches the game once they have settled.
///
/// # Arguments
///
/// - `$game_type`: the game struct; implements `roost_engine::Game` and has `fn new() -> Self`
/// - `$game_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        use $crate::roost_engine::{InputEvent, Vec2};

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Runs `f` on the runner. Skips (with a warning) before `game_init`
        /// or when called from inside another runner call.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| match cell.try_borrow_mut() {
                Ok(mut borrow) => match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        $crate::__private::log::warn!("{}: game_init() has not been called", $game_name);
                        None
                    }
                },
                Err(_) => {
                    $crate::__private::log::warn!("{}: runner is busy, call skipped", $game_name);
                    None
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init(canvas_id: &str) -> Result<(), JsValue> {
            $crate::__private::console_error_panic_hook::set_once();
            let _ = $crate::__private::console_log::init_with_level($crate::__private::log::Level::Info);

            let on_frame: $crate::FrameCallback = Closure::new(|_timestamp: f64| {
                with_runner(|r| r.tick());
            });
            let game = <$game_type>::new();
            let runner = $crate::GameRunner::attach(game, canvas_id, on_frame)?;

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            $crate::__private::log::info!("{}: initialized", $game_name);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn game_load_manifest(json: &str) -> Result<(), JsValue> {
            match with_runner(|r| r.load_manifest(json)) {
                Some(Err(err)) => Err(JsValue::from_str(&err.to_string())),
                _ => Ok(()),
            }
        }

        /// Preload the manifest images, then launch the game.
        #[wasm_bindgen]
        pub fn game_start() {
            // The loader may finish synchronously, so preload runs outside
            // the runner borrow.
            let Some((images, files, mut loader)) =
                with_runner(|r| (r.images(), r.preload_list(), r.image_loader()))
            else {
                return;
            };
            let preload = $crate::roost_engine::Preload::on_finish(|count| {
                $crate::__private::log::info!("{}: {} images settled", $game_name, count);
                with_runner(|r| r.launch(true));
            });
            images.preload(&files, &mut loader, preload);
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::PointerDown { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::PointerUp { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::PointerMove { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_click(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::Click { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_leave() {
            with_runner(|r| r.handle_input(InputEvent::PointerLeave));
        }

        #[wasm_bindgen]
        pub fn game_touch_start(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::TouchStart { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_touch_end(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::TouchEnd { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_touch_move(x: f32, y: f32) {
            with_runner(|r| r.handle_input(InputEvent::TouchMove { pos: Vec2::new(x, y) }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.handle_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.handle_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.handle_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Lifecycle ----

        #[wasm_bindgen]
        pub fn game_focus() {
            with_runner(|r| r.focus());
        }

        #[wasm_bindgen]
        pub fn game_blur() {
            with_runner(|r| r.blur());
        }

        #[wasm_bindgen]
        pub fn game_start_animating() {
            with_runner(|r| r.start_animating());
        }

        #[wasm_bindgen]
        pub fn game_stop_animating() {
            with_runner(|r| r.stop_animating());
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_stats_ptr() -> *const f32 {
            with_runner(|r| r.stats_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_stats_len() -> u32 {
            with_runner(|r| r.stats_len()).unwrap_or(0)
        }

        /// Message of the hook error that stopped the loop, if any.
        #[wasm_bindgen]
        pub fn get_last_error() -> Option<String> {
            with_runner(|r| r.last_error().map(str::to_string)).flatten()
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.world_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.world_height()).unwrap_or(0.0)
        }
    };
}
