//! Memoized loading of on-disk artifacts.
//!
//! Each distinct path is loaded at most once for the lifetime of the cache,
//! even when several threads ask for it at the same time. Later requests get
//! the same `Arc` back without touching the filesystem.

use crate::error::{ChurnError, Result};
use crate::models::loader::ModelLoader;
use crate::models::onnx::OnnxClassifier;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, info};

/// One path's entry. `loading` serializes first loads; `value` is set once.
struct Slot<T> {
    loading: Mutex<()>,
    value: OnceLock<Arc<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            loading: Mutex::new(()),
            value: OnceLock::new(),
        }
    }
}

static GLOBAL_LOADER: OnceLock<ArtifactLoader> = OnceLock::new();

/// Keyed cache with at-most-one load per path.
///
/// The outer map lock is held only long enough to find the path's slot; the
/// load itself runs under the slot lock, so different paths load independently.
pub struct ArtifactCache<T> {
    slots: Mutex<HashMap<PathBuf, Arc<Slot<T>>>>,
}

impl<T> ArtifactCache<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached artifact for `path`, running `load` on first access.
    ///
    /// A failed load leaves nothing cached; the next call tries again.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(path.to_path_buf()).or_default())
        };

        let loading = slot.loading.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(artifact) = slot.value.get() {
            debug!(path = %path.display(), "Artifact cache hit");
            return Ok(Arc::clone(artifact));
        }

        match load(path) {
            Ok(artifact) => Ok(Arc::clone(slot.value.get_or_init(|| Arc::new(artifact)))),
            Err(e) => {
                drop(loading);
                self.discard_if_unused(path, &slot);
                Err(e)
            }
        }
    }

    /// Drop the empty slot of a failed path unless another caller holds it.
    fn discard_if_unused(&self, path: &Path, slot: &Arc<Slot<T>>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one held by the failed caller
        if Arc::strong_count(slot) == 2 && slot.value.get().is_none() {
            slots.remove(path);
        }
    }

    /// Number of paths with a successfully loaded artifact.
    pub fn loaded_count(&self) -> usize {
        let slots: Vec<Arc<Slot<T>>> = {
            let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.values().cloned().collect()
        };
        slots.iter().filter(|slot| slot.value.get().is_some()).count()
    }
}

impl<T> Default for ArtifactCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoded page illustration in RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PageImage {
    /// Decode an image file in any format the `image` crate supports.
    pub fn open(path: &Path) -> Result<Self> {
        let decoded = image::open(path).map_err(|e| ChurnError::load(path, e))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Loads the page image and churn model, memoized per path.
pub struct ArtifactLoader {
    model_loader: ModelLoader,
    images: ArtifactCache<PageImage>,
    models: ArtifactCache<OnnxClassifier>,
}

impl ArtifactLoader {
    pub fn new(model_loader: ModelLoader) -> Self {
        Self {
            model_loader,
            images: ArtifactCache::new(),
            models: ArtifactCache::new(),
        }
    }

    /// Install the process-wide loader. The first call wins; later calls
    /// return the loader already installed.
    pub fn init_global(model_loader: ModelLoader) -> &'static ArtifactLoader {
        GLOBAL_LOADER.get_or_init(|| Self::new(model_loader))
    }

    /// Process-wide loader, created with default settings if none was installed.
    pub fn global() -> &'static ArtifactLoader {
        GLOBAL_LOADER.get_or_init(Self::default)
    }

    pub fn load_image<P: AsRef<Path>>(&self, path: P) -> Result<Arc<PageImage>> {
        self.images.get_or_load(path.as_ref(), |path| {
            let image = PageImage::open(path)?;
            info!(
                path = %path.display(),
                width = image.width,
                height = image.height,
                "Page image loaded"
            );
            Ok(image)
        })
    }

    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<Arc<OnnxClassifier>> {
        self.models
            .get_or_load(path.as_ref(), |path| self.model_loader.load_model(path))
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new(ModelLoader::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn read_counting(path: &Path, reads: &AtomicUsize) -> Result<String> {
        reads.fetch_add(1, Ordering::SeqCst);
        fs::read_to_string(path).map_err(|e| ChurnError::load(path, e))
    }

    #[test]
    fn test_same_path_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.txt");
        fs::write(&path, "v1").unwrap();

        let cache = ArtifactCache::new();
        let reads = AtomicUsize::new(0);

        let first = cache.get_or_load(&path, |p| read_counting(p, &reads)).unwrap();
        fs::write(&path, "v2").unwrap();
        let second = cache.get_or_load(&path, |p| read_counting(p, &reads)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.as_str(), "v1");
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_paths_load_separately() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();

        let cache = ArtifactCache::new();
        let reads = AtomicUsize::new(0);
        let loaded_a = cache.get_or_load(&a, |p| read_counting(p, &reads)).unwrap();
        let loaded_b = cache.get_or_load(&b, |p| read_counting(p, &reads)).unwrap();

        assert!(!Arc::ptr_eq(&loaded_a, &loaded_b));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(cache.loaded_count(), 2);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.txt");

        let cache = ArtifactCache::new();
        let reads = AtomicUsize::new(0);
        let err = cache
            .get_or_load(&path, |p| read_counting(p, &reads))
            .unwrap_err();
        assert!(matches!(err, ChurnError::Load { .. }));
        assert_eq!(cache.loaded_count(), 0);
        assert!(cache.slots.lock().unwrap().is_empty());

        fs::write(&path, "ready").unwrap();
        let loaded = cache.get_or_load(&path, |p| read_counting(p, &reads)).unwrap();
        assert_eq!(loaded.as_str(), "ready");
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.txt");
        fs::write(&path, "shared").unwrap();

        let cache = Arc::new(ArtifactCache::new());
        let reads = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let reads = Arc::clone(&reads);
                let path = path.clone();
                thread::spawn(move || {
                    cache
                        .get_or_load(&path, |p| {
                            thread::sleep(Duration::from_millis(20));
                            read_counting(p, &reads)
                        })
                        .unwrap()
                })
            })
            .collect();

        let loaded: Vec<Arc<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(loaded.iter().all(|a| Arc::ptr_eq(a, &loaded[0])));
    }

    #[test]
    fn test_count_does_not_wait_on_in_flight_load() {
        let dir = tempfile::tempdir().unwrap();
        let slow = dir.path().join("slow.txt");
        let fast = dir.path().join("fast.txt");
        fs::write(&slow, "slow").unwrap();
        fs::write(&fast, "fast").unwrap();

        let cache = Arc::new(ArtifactCache::new());
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let loading = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                cache.get_or_load(&slow, |p| {
                    started_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    fs::read_to_string(p).map_err(|e| ChurnError::load(p, e))
                })
            })
        };

        started_rx.recv().unwrap();
        // Neither call may block on the slot the other thread is holding
        assert_eq!(cache.loaded_count(), 0);
        let reads = AtomicUsize::new(0);
        assert_eq!(
            cache.get_or_load(&fast, |p| read_counting(p, &reads)).unwrap().as_str(),
            "fast"
        );

        release_tx.send(()).unwrap();
        loading.join().unwrap().unwrap();
        assert_eq!(cache.loaded_count(), 2);
    }

    #[test]
    fn test_global_loader_is_shared() {
        let first = ArtifactLoader::global();
        let second = ArtifactLoader::global();
        assert!(std::ptr::eq(first, second));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let a = first.load_image(&path).unwrap();
        let b = second.load_image(&path).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_missing_image_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ArtifactLoader::default();

        let err = loader
            .load_image(dir.path().join("main_page_image.jpg"))
            .unwrap_err();
        assert!(matches!(err, ChurnError::Load { .. }));
    }

    #[test]
    fn test_corrupt_image_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main_page_image.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = ArtifactLoader::default().load_image(&path).unwrap_err();
        assert!(matches!(err, ChurnError::Load { .. }));
    }

    #[test]
    fn test_image_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let loader = ArtifactLoader::default();
        let first = loader.load_image(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let second = loader.load_image(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.size(), [4, 2]);
        assert_eq!(&first.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_unreadable_model_path() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ArtifactLoader::default();

        let err = loader
            .load_model(dir.path().join("cat_model.onnx"))
            .unwrap_err();
        assert!(matches!(err, ChurnError::Load { .. }));
    }
}
