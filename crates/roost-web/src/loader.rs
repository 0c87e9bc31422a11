use std::cell::RefCell;
use std::rc::Rc;

use roost_engine::assets::cache::LoadCallback;
use roost_engine::{AssetError, Clock, ImageHandle, ImageLoader, LoadedImage};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use crate::canvas::Surfaces;

/// `Date.now()` in milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// Loads images through `<img>` elements and keeps the decoded element in
/// the shared [`Surfaces`].
pub struct HtmlImageLoader {
    surfaces: Surfaces,
}

impl HtmlImageLoader {
    pub fn new(surfaces: Surfaces) -> Self {
        Self { surfaces }
    }
}

impl ImageLoader for HtmlImageLoader {
    fn load(&mut self, src: &str, done: LoadCallback) {
        let element = match HtmlImageElement::new() {
            Ok(element) => element,
            Err(err) => {
                done(Err(AssetError::LoadFailed {
                    src: src.to_string(),
                    reason: format!("{:?}", err),
                }));
                return;
            }
        };

        // onload and onerror share the single completion callback.
        let done = Rc::new(RefCell::new(Some(done)));

        let on_load = {
            let done = Rc::clone(&done);
            let surfaces = self.surfaces.clone();
            let element = element.clone();
            Closure::once_into_js(move || {
                if let Some(done) = done.borrow_mut().take() {
                    let width = element.natural_width();
                    let height = element.natural_height();
                    let handle = ImageHandle(surfaces.add_image(element));
                    done(Ok(LoadedImage {
                        handle,
                        width,
                        height,
                    }));
                }
            })
        };

        let on_error = {
            let src = src.to_string();
            Closure::once_into_js(move || {
                if let Some(done) = done.borrow_mut().take() {
                    done(Err(AssetError::LoadFailed {
                        src,
                        reason: "image element reported an error".into(),
                    }));
                }
            })
        };

        element.set_onload(Some(on_load.unchecked_ref()));
        element.set_onerror(Some(on_error.unchecked_ref()));
        element.set_src(src);
    }
}
