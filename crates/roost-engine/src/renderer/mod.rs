pub mod source;
pub mod traits;
pub mod viewport;

// Re-export key types for convenient access
pub use source::{CanvasId, DrawSource, Drawable, LayerId};
pub use traits::Renderer;
pub use viewport::{EdgeScroll, ScrollStep, ScrollTransition, Viewport};
