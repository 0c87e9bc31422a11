pub mod cache;
pub mod manifest;

pub use cache::{ImageCache, ImageHandle, ImageLoader, ImageState, LoadCallback, LoadedImage, Preload};
pub use manifest::{PreloadManifest, SpriteSheetDescriptor};
