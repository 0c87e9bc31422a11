pub mod api;
pub mod assets;
pub mod core;
pub mod error;
pub mod events;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use glam::Vec2;

pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{Bounds, FrameStats, OwnerId};
pub use assets::cache::{ImageCache, ImageHandle, ImageLoader, ImageState, LoadedImage, Preload};
pub use assets::manifest::{PreloadManifest, SpriteSheetDescriptor};
pub use crate::core::profile::FrameReport;
pub use crate::core::scheduler::{AnimationScheduler, FrameRequester, ManualFrames, SchedulerControl};
pub use crate::core::time::{Clock, ManualClock, SystemClock, Timer};
pub use error::{AssetError, EngineError, RenderError};
pub use events::behavior::HitBoxes;
pub use events::bus::EventBus;
pub use events::signal::{Event, Signal};
pub use input::pointer::Pointer;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::source::{CanvasId, DrawSource, Drawable, LayerId};
pub use renderer::traits::Renderer;
pub use renderer::viewport::{EdgeScroll, Viewport};
