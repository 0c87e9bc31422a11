use super::traits::Renderer;
use crate::api::types::Bounds;
use crate::assets::cache::{ImageCache, LoadedImage};
use crate::assets::manifest::SpriteSheetDescriptor;
use crate::error::RenderError;

/// Offscreen layer owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayerId(pub u32);

/// Raw canvas owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanvasId(pub u32);

/// What a drawable shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawSource {
    /// A preloaded image, by path.
    ImagePath(String),
    /// One cell of a sprite sheet grid.
    SpriteFrame {
        sheet: String,
        col: u32,
        row: u32,
        frame_width: u32,
        frame_height: u32,
    },
    Layer(LayerId),
    RawCanvas(CanvasId),
}

impl DrawSource {
    pub fn image(path: impl Into<String>) -> Self {
        DrawSource::ImagePath(path.into())
    }

    pub fn sprite_frame(sheet: &SpriteSheetDescriptor, col: u32, row: u32) -> Self {
        DrawSource::SpriteFrame {
            sheet: sheet.path.clone(),
            col,
            row,
            frame_width: sheet.frame_width,
            frame_height: sheet.frame_height,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Resolved {
    Image(LoadedImage),
    Frame { sheet: LoadedImage, frame: Bounds },
    Layer(LayerId),
    Canvas(CanvasId),
}

/// A source bound to a destination box, resolved against the image cache
/// once at construction so drawing never re-inspects the source.
#[derive(Debug, Clone)]
pub struct Drawable {
    source: DrawSource,
    resolved: Resolved,
    pub bounds: Bounds,
}

impl Drawable {
    /// Fails with [`RenderError::Unresolved`] when an image or sheet is not
    /// loaded, or a frame lies outside its sheet.
    pub fn new(source: DrawSource, bounds: Bounds, cache: &ImageCache) -> Result<Self, RenderError> {
        let resolved = resolve(&source, cache)?;
        Ok(Self {
            source,
            resolved,
            bounds,
        })
    }

    pub fn source(&self) -> &DrawSource {
        &self.source
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        match &self.resolved {
            Resolved::Image(image) => renderer.draw_image(image, &self.bounds),
            Resolved::Frame { sheet, frame } => renderer.draw_sprite_frame(sheet, frame, &self.bounds),
            Resolved::Layer(layer) => renderer.draw_layer(*layer, &self.bounds),
            Resolved::Canvas(canvas) => renderer.draw_canvas(*canvas, &self.bounds),
        }
    }
}

fn resolve(source: &DrawSource, cache: &ImageCache) -> Result<Resolved, RenderError> {
    match source {
        DrawSource::ImagePath(path) => cache
            .get(path)
            .map(Resolved::Image)
            .ok_or_else(|| RenderError::Unresolved(path.clone())),
        DrawSource::SpriteFrame {
            sheet,
            col,
            row,
            frame_width,
            frame_height,
        } => {
            let image = cache
                .get(sheet)
                .ok_or_else(|| RenderError::Unresolved(sheet.clone()))?;
            let unresolved = || RenderError::Unresolved(format!("{sheet}[{col},{row}]"));
            let x = col.checked_mul(*frame_width).ok_or_else(unresolved)?;
            let y = row.checked_mul(*frame_height).ok_or_else(unresolved)?;
            let right = x.checked_add(*frame_width).ok_or_else(unresolved)?;
            let bottom = y.checked_add(*frame_height).ok_or_else(unresolved)?;
            if *frame_width == 0 || *frame_height == 0 || right > image.width || bottom > image.height {
                return Err(unresolved());
            }
            Ok(Resolved::Frame {
                sheet: image,
                frame: Bounds::new(x as f32, y as f32, *frame_width as f32, *frame_height as f32),
            })
        }
        DrawSource::Layer(layer) => Ok(Resolved::Layer(*layer)),
        DrawSource::RawCanvas(canvas) => Ok(Resolved::Canvas(*canvas)),
    }
}
