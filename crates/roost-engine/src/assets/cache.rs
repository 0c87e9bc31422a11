//! Image cache with asynchronous preloading.
//!
//! The cache only records *that* an image is ready plus its size; the
//! platform keeps the decoded bitmap and looks it up by [`ImageHandle`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::AssetError;

/// Platform-side key for a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedImage {
    pub handle: ImageHandle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Pending,
    Loaded(LoadedImage),
    Failed(String),
}

/// Called exactly once by a loader when an image settles.
pub type LoadCallback = Box<dyn FnOnce(Result<LoadedImage, AssetError>)>;

/// Platform image loading. `load` returns immediately; `done` runs later
/// (or right away, for loaders that can answer synchronously).
pub trait ImageLoader {
    fn load(&mut self, src: &str, done: LoadCallback);
}

/// Progress callbacks for [`ImageCache::preload`].
#[derive(Default)]
pub struct Preload {
    /// `(src, settled_so_far, total)` after each image settles.
    pub on_item: Option<Box<dyn FnMut(&str, usize, usize)>>,
    /// Number of images requested, once all of them have settled.
    pub on_finish: Option<Box<dyn FnOnce(usize)>>,
}

impl Preload {
    pub fn on_finish(f: impl FnOnce(usize) + 'static) -> Self {
        Self {
            on_item: None,
            on_finish: Some(Box::new(f)),
        }
    }

    pub fn with_item(mut self, f: impl FnMut(&str, usize, usize) + 'static) -> Self {
        self.on_item = Some(Box::new(f));
        self
    }
}

struct Progress {
    settled: usize,
    total: usize,
    callbacks: Preload,
}

/// Shared image registry. Clones refer to the same cache.
#[derive(Clone, Default)]
pub struct ImageCache {
    images: Rc<RefCell<HashMap<String, ImageState>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every file in `files`, then report through `preload`.
    ///
    /// A failed image is recorded as [`ImageState::Failed`] and still counts as
    /// settled, so `on_finish` always runs once every load has answered. With
    /// no files it runs immediately with 0. Images already loaded are not
    /// fetched again.
    pub fn preload(&self, files: &[String], loader: &mut dyn ImageLoader, preload: Preload) {
        let total = files.len();
        let progress = Rc::new(RefCell::new(Progress {
            settled: 0,
            total,
            callbacks: preload,
        }));

        if total == 0 {
            finish(&progress);
            return;
        }

        for src in files {
            if self.is_loaded(src) {
                settle(&progress, src);
                continue;
            }
            self.images
                .borrow_mut()
                .insert(src.clone(), ImageState::Pending);

            let cache = self.clone();
            let progress = Rc::clone(&progress);
            let key = src.clone();
            loader.load(
                src,
                Box::new(move |result| {
                    match result {
                        Ok(image) => cache.save(&key, image),
                        Err(err) => {
                            log::warn!("{}", err);
                            cache
                                .images
                                .borrow_mut()
                                .insert(key.clone(), ImageState::Failed(err.to_string()));
                        }
                    }
                    settle(&progress, &key);
                }),
            );
        }
    }

    /// Record an image that finished loading, replacing any previous state.
    pub fn save(&self, src: &str, image: LoadedImage) {
        self.images
            .borrow_mut()
            .insert(src.to_string(), ImageState::Loaded(image));
    }

    pub fn get(&self, src: &str) -> Option<LoadedImage> {
        match self.images.borrow().get(src) {
            Some(ImageState::Loaded(image)) => Some(*image),
            _ => None,
        }
    }

    /// Like [`get`](Self::get) but an error when the image is not ready.
    pub fn require(&self, src: &str) -> Result<LoadedImage, AssetError> {
        self.get(src)
            .ok_or_else(|| AssetError::NotLoaded(src.to_string()))
    }

    pub fn state(&self, src: &str) -> Option<ImageState> {
        self.images.borrow().get(src).cloned()
    }

    pub fn is_loaded(&self, src: &str) -> bool {
        self.get(src).is_some()
    }

    pub fn len(&self) -> usize {
        self.images.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.borrow().is_empty()
    }
}

fn settle(progress: &Rc<RefCell<Progress>>, src: &str) {
    // Callbacks run without the progress borrow held.
    let (mut on_item, settled, total) = {
        let mut p = progress.borrow_mut();
        p.settled += 1;
        (p.callbacks.on_item.take(), p.settled, p.total)
    };
    if let Some(cb) = on_item.as_mut() {
        cb(src, settled, total);
    }
    progress.borrow_mut().callbacks.on_item = on_item;
    if settled == total {
        finish(progress);
    }
}

fn finish(progress: &Rc<RefCell<Progress>>) {
    let (on_finish, total) = {
        let mut p = progress.borrow_mut();
        (p.callbacks.on_finish.take(), p.total)
    };
    log::info!("preloaded {} images", total);
    if let Some(f) = on_finish {
        f(total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Holds callbacks until the test settles them.
    #[derive(Default)]
    struct DeferredLoader {
        pending: Vec<(String, LoadCallback)>,
    }

    impl ImageLoader for DeferredLoader {
        fn load(&mut self, src: &str, done: LoadCallback) {
            self.pending.push((src.to_string(), done));
        }
    }

    impl DeferredLoader {
        fn succeed(&mut self, idx: usize) {
            let (_, done) = self.pending.remove(idx);
            done(Ok(LoadedImage {
                handle: ImageHandle(idx as u32),
                width: 16,
                height: 16,
            }));
        }

        fn fail(&mut self, idx: usize) {
            let (src, done) = self.pending.remove(idx);
            done(Err(AssetError::LoadFailed {
                src,
                reason: "404".into(),
            }));
        }
    }

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finish_waits_for_every_image() {
        let cache = ImageCache::new();
        let mut loader = DeferredLoader::default();
        let finished = Rc::new(Cell::new(None));
        let f = Rc::clone(&finished);
        let items = Rc::new(RefCell::new(Vec::new()));
        let i = Rc::clone(&items);

        cache.preload(
            &files(&["a.png", "b.png"]),
            &mut loader,
            Preload::on_finish(move |n| f.set(Some(n)))
                .with_item(move |src, done, total| i.borrow_mut().push((src.to_string(), done, total))),
        );
        assert_eq!(cache.state("a.png"), Some(ImageState::Pending));
        assert_eq!(finished.get(), None);

        loader.succeed(1);
        assert!(cache.is_loaded("b.png"));
        assert_eq!(finished.get(), None);

        loader.succeed(0);
        assert_eq!(finished.get(), Some(2));
        assert_eq!(
            *items.borrow(),
            vec![("b.png".to_string(), 1, 2), ("a.png".to_string(), 2, 2)]
        );
    }

    #[test]
    fn empty_preload_finishes_immediately() {
        let cache = ImageCache::new();
        let mut loader = DeferredLoader::default();
        let finished = Rc::new(Cell::new(None));
        let f = Rc::clone(&finished);
        cache.preload(&[], &mut loader, Preload::on_finish(move |n| f.set(Some(n))));
        assert_eq!(finished.get(), Some(0));
    }

    #[test]
    fn failures_still_complete() {
        let cache = ImageCache::new();
        let mut loader = DeferredLoader::default();
        let finished = Rc::new(Cell::new(false));
        let f = Rc::clone(&finished);
        cache.preload(
            &files(&["missing.png"]),
            &mut loader,
            Preload::on_finish(move |_| f.set(true)),
        );
        loader.fail(0);
        assert!(finished.get());
        assert!(matches!(cache.state("missing.png"), Some(ImageState::Failed(_))));
        assert!(matches!(cache.require("missing.png"), Err(AssetError::NotLoaded(_))));
    }

    #[test]
    fn already_loaded_images_are_not_refetched() {
        let cache = ImageCache::new();
        cache.save(
            "logo.png",
            LoadedImage {
                handle: ImageHandle(9),
                width: 8,
                height: 8,
            },
        );
        let mut loader = DeferredLoader::default();
        let finished = Rc::new(Cell::new(None));
        let f = Rc::clone(&finished);
        cache.preload(
            &files(&["logo.png"]),
            &mut loader,
            Preload::on_finish(move |n| f.set(Some(n))),
        );
        assert!(loader.pending.is_empty());
        assert_eq!(finished.get(), Some(1));
        assert_eq!(cache.len(), 1);
    }
}
