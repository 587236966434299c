//! Image resources: loading from URLs on worker threads.
//!
//! Loading is the only asynchronous step in the crate. A request runs the
//! [`ImageLoader`] on a short-lived worker thread and sends the outcome back
//! over a channel; the owner of the scene drains that channel on its own
//! thread, so items never see a partially applied load.

use super::context::ImageData;
use log::{debug, warn};
use std::fs::File;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

/// Errors that can occur while loading an image resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageLoadError {
    #[error("Unsupported image URL '{0}'")]
    UnsupportedUrl(String),

    #[error("Failed to read image {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to decode image {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Image loader could not start: {0}")]
    Spawn(String),

    #[error("Image loader panicked: {0}")]
    Panicked(String),
}

/// Produces decoded images from URLs.
///
/// Called on worker threads, hence `Send + Sync`.
pub trait ImageLoader: Send + Sync {
    fn load(&self, url: &str) -> Result<ImageData, ImageLoadError>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> Result<ImageData, ImageLoadError> + Send + Sync,
{
    fn load(&self, url: &str) -> Result<ImageData, ImageLoadError> {
        self(url)
    }
}

/// Loads PNG files from `file://` URLs or plain paths.
///
/// Relative paths are resolved against `base_dir` when one is set.
#[derive(Debug, Clone, Default)]
pub struct FileImageLoader {
    base_dir: Option<PathBuf>,
}

impl FileImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative paths against `dir`.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Maps a URL or path string to a filesystem path.
    pub fn resolve(&self, url: &str) -> Result<PathBuf, ImageLoadError> {
        let path = match Url::parse(url) {
            Ok(parsed) if parsed.scheme() == "file" => parsed
                .to_file_path()
                .map_err(|_| ImageLoadError::UnsupportedUrl(url.to_string()))?,
            // Single letters are Windows drive prefixes, not schemes.
            Ok(parsed) if parsed.scheme().len() > 1 => {
                return Err(ImageLoadError::UnsupportedUrl(url.to_string()));
            }
            _ => PathBuf::from(url),
        };

        match &self.base_dir {
            Some(base) if path.is_relative() => Ok(base.join(path)),
            _ => Ok(path),
        }
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, url: &str) -> Result<ImageData, ImageLoadError> {
        let path = self.resolve(url)?;
        decode_png(&path)
    }
}

/// Decodes a PNG file into premultiplied ARGB32 pixels.
pub fn decode_png(path: &Path) -> Result<ImageData, ImageLoadError> {
    let display = path.display().to_string();
    let decode_err = |message: String| ImageLoadError::Decode {
        path: display.clone(),
        message,
    };

    let mut file = File::open(path).map_err(|e| ImageLoadError::Read {
        path: display.clone(),
        message: e.to_string(),
    })?;
    let png = cairo::ImageSurface::create_from_png(&mut file)
        .map_err(|e| decode_err(e.to_string()))?;

    // Normalise RGB24 and friends to ARGB32 by painting onto a fresh surface.
    let (width, height) = (png.width(), png.height());
    let mut target = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
        .map_err(|e| decode_err(e.to_string()))?;
    {
        let ctx = cairo::Context::new(&target)
            .map_err(|e| decode_err(e.to_string()))?;
        ctx.set_source_surface(&png, 0.0, 0.0)
            .map_err(|e| decode_err(e.to_string()))?;
        ctx.paint().map_err(|e| decode_err(e.to_string()))?;
    }
    target.flush();

    let stride = target.stride();
    let data = target
        .data()
        .map_err(|e| decode_err(e.to_string()))?
        .to_vec();

    Ok(ImageData {
        width,
        height,
        stride,
        data,
    })
}

/// Result of one load request.
#[derive(Debug)]
pub struct LoadOutcome<K> {
    pub key: K,
    /// Generation the request was made for; stale generations are dropped by the owner.
    pub generation: u64,
    pub url: String,
    pub result: Result<ImageData, ImageLoadError>,
}

/// Dispatches load requests to worker threads and collects their outcomes.
pub struct ImageLoads<K> {
    loader: Arc<dyn ImageLoader>,
    tx: Sender<LoadOutcome<K>>,
    rx: Receiver<LoadOutcome<K>>,
    in_flight: usize,
}

impl<K: Clone + Send + 'static> ImageLoads<K> {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Replaces the loader used by subsequent requests.
    pub fn set_loader(&mut self, loader: Arc<dyn ImageLoader>) {
        self.loader = loader;
    }

    /// Number of requests whose outcome has not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts loading `url` for `key` in the background.
    pub fn request(&mut self, key: K, generation: u64, url: &str) {
        let tx = self.tx.clone();
        let loader = Arc::clone(&self.loader);
        let worker_key = key.clone();
        let worker_url = url.to_string();

        self.in_flight += 1;
        debug!("Requesting image {url} (generation {generation})");

        let spawned = thread::Builder::new()
            .name("canvanim-image".to_string())
            .spawn(move || {
                let result = load_guarded(loader.as_ref(), &worker_url);
                let _ = tx.send(LoadOutcome {
                    key: worker_key,
                    generation,
                    url: worker_url,
                    result,
                });
            });

        if let Err(err) = spawned {
            warn!("Failed to spawn image loader thread: {err}");
            let _ = self.tx.send(LoadOutcome {
                key,
                generation,
                url: url.to_string(),
                result: Err(ImageLoadError::Spawn(err.to_string())),
            });
        }
    }

    /// Collects every outcome that is ready, without blocking.
    pub fn drain(&mut self) -> Vec<LoadOutcome<K>> {
        let outcomes: Vec<_> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        outcomes
    }

    /// Blocks until every in-flight request completed or `timeout` elapsed.
    pub fn wait(&mut self, timeout: Duration) -> Vec<LoadOutcome<K>> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = Vec::new();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    outcomes.push(outcome);
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        "{} image load(s) still pending after {:?}",
                        self.in_flight, timeout
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        outcomes
    }
}

/// Runs `loader`, reporting a panic as [`ImageLoadError::Panicked`].
fn load_guarded(loader: &dyn ImageLoader, url: &str) -> Result<ImageData, ImageLoadError> {
    match panic::catch_unwind(AssertUnwindSafe(|| loader.load(url))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|msg| msg.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(ImageLoadError::Panicked(message))
        }
    }
}
