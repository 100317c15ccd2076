//! Background asset loading
//!
//! Each request gets its own short-lived worker thread that fetches and
//! decodes, then sends the result back over a oneshot channel. The render
//! loop calls [`ModelLoader::poll`] once per frame; it never blocks.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use futures::channel::oneshot;

use super::{decode_image, fbx_loader, gltf_loader, source::AssetSource, LoadedModel};
use crate::{
    error::{AssetError, ModelError, ModelResult},
    gallery::ModelFormat,
    gfx::scene::TextureImage,
};

pub type LoadId = u64;

/// What a worker should produce
#[derive(Debug, Clone, PartialEq)]
pub enum AssetRequest {
    Model { url: String, format: ModelFormat },
    Image { url: String },
}

impl AssetRequest {
    pub fn url(&self) -> &str {
        match self {
            AssetRequest::Model { url, .. } | AssetRequest::Image { url } => url,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LoadedAsset {
    Model(LoadedModel),
    Image(Arc<TextureImage>),
}

/// Owns the in-flight loads of one scene context
///
/// Dropping the loader cancels everything still pending: receivers are
/// dropped and workers see the shared flag before they decode.
pub struct ModelLoader {
    source: Arc<dyn AssetSource>,
    cancelled: Arc<AtomicBool>,
    pending: Vec<(LoadId, oneshot::Receiver<ModelResult<LoadedAsset>>)>,
    next_id: LoadId,
}

impl ModelLoader {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            cancelled: Arc::new(AtomicBool::new(false)),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Starts a load and returns its id
    pub fn request(&mut self, request: AssetRequest) -> LoadId {
        let id = self.next_id;
        self.next_id += 1;

        let (tx, rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let cancelled = Arc::clone(&self.cancelled);
        log::debug!("Load {} started: {}", id, request.url());

        let spawned = thread::Builder::new()
            .name(format!("asset-load-{id}"))
            .spawn(move || {
                let result = run_request(source.as_ref(), &cancelled, &request);
                // The receiver is gone when the load was cancelled
                let _ = tx.send(result);
            });
        if let Err(e) = spawned {
            // tx went down with the closure, poll reports the load as cancelled
            log::warn!("Cannot start load {}: {}", id, e);
        }

        self.pending.push((id, rx));
        id
    }

    /// Collects every load that finished since the last call
    pub fn poll(&mut self) -> Vec<(LoadId, ModelResult<LoadedAsset>)> {
        let mut finished = Vec::new();
        self.pending.retain_mut(|(id, rx)| match rx.try_recv() {
            Ok(Some(result)) => {
                finished.push((*id, result));
                false
            }
            Ok(None) => true,
            Err(oneshot::Canceled) => {
                finished.push((*id, Err(AssetError::Cancelled.into())));
                false
            }
        });
        finished
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: LoadId) -> bool {
        self.pending.iter().any(|(pending, _)| *pending == id)
    }

    /// Forgets one load; its worker finishes into a closed channel
    pub fn cancel(&mut self, id: LoadId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(pending, _)| *pending != id);
        before != self.pending.len()
    }
}

impl Drop for ModelLoader {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
        if !self.pending.is_empty() {
            log::info!("Cancelling {} pending asset loads", self.pending.len());
        }
        self.pending.clear();
    }
}

fn run_request(
    source: &dyn AssetSource,
    cancelled: &AtomicBool,
    request: &AssetRequest,
) -> ModelResult<LoadedAsset> {
    if cancelled.load(Ordering::Relaxed) {
        return Err(AssetError::Cancelled.into());
    }
    let bytes = source.fetch(request.url())?;
    if cancelled.load(Ordering::Relaxed) {
        return Err(AssetError::Cancelled.into());
    }

    match request {
        AssetRequest::Model { url, format } => {
            decode_model(source, url, *format, &bytes).map(LoadedAsset::Model)
        }
        AssetRequest::Image { .. } => {
            decode_image(&bytes).map(|image| LoadedAsset::Image(Arc::new(image)))
        }
    }
}

/// Format dispatch for fetched model bytes
pub fn decode_model(
    source: &dyn AssetSource,
    url: &str,
    format: ModelFormat,
    bytes: &[u8],
) -> ModelResult<LoadedModel> {
    match format {
        ModelFormat::Gltf | ModelFormat::Glb => gltf_loader::load(source, url, bytes),
        ModelFormat::Fbx => fbx_loader::load(bytes),
        ModelFormat::Obj | ModelFormat::Stl => {
            Err(ModelError::UnsupportedFormat(format.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{mpsc, Mutex},
        time::{Duration, Instant},
    };

    /// Serves fixed bytes, counting fetches
    struct MemorySource {
        bytes: Vec<u8>,
        fetches: Mutex<usize>,
    }

    impl AssetSource for MemorySource {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
            *self.fetches.lock().unwrap() += 1;
            if url.contains("missing") {
                return Err(AssetError::Status {
                    url: url.to_string(),
                    status: 404,
                });
            }
            Ok(self.bytes.clone())
        }
    }

    /// Blocks every fetch until the test releases it
    struct GateSource {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl AssetSource for GateSource {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>, AssetError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(Vec::new())
        }
    }

    fn poll_until_done(loader: &mut ModelLoader) -> Vec<(LoadId, ModelResult<LoadedAsset>)> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut done = Vec::new();
        while loader.pending() > 0 && Instant::now() < deadline {
            done.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        done
    }

    #[test]
    fn failed_fetch_is_reported_per_load() {
        let source = Arc::new(MemorySource {
            bytes: b"not a model".to_vec(),
            fetches: Mutex::new(0),
        });
        let mut loader = ModelLoader::new(source);
        let missing = loader.request(AssetRequest::Model {
            url: "/models/missing.glb".into(),
            format: ModelFormat::Glb,
        });

        let done = poll_until_done(&mut loader);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, missing);
        assert!(matches!(
            done[0].1,
            Err(ModelError::Asset(AssetError::Status { status: 404, .. }))
        ));
    }

    #[test]
    fn obj_and_stl_are_not_decoded() {
        let source = MemorySource {
            bytes: Vec::new(),
            fetches: Mutex::new(0),
        };
        for format in [ModelFormat::Obj, ModelFormat::Stl] {
            assert!(matches!(
                decode_model(&source, "a", format, &[]),
                Err(ModelError::UnsupportedFormat(_))
            ));
        }
        assert_eq!(*source.fetches.lock().unwrap(), 0);
    }

    #[test]
    fn explicit_cancel_forgets_the_load() {
        let (_release, gate) = mpsc::channel();
        let mut loader = ModelLoader::new(Arc::new(GateSource {
            gate: Mutex::new(gate),
        }));
        let id = loader.request(AssetRequest::Image {
            url: "/img/a.png".into(),
        });
        assert!(loader.is_pending(id));
        assert!(loader.cancel(id));
        assert!(!loader.is_pending(id));
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn dropping_the_loader_stops_workers_before_decoding() {
        let (release, gate) = mpsc::channel();
        let cancelled;
        {
            let mut loader = ModelLoader::new(Arc::new(GateSource {
                gate: Mutex::new(gate),
            }));
            loader.request(AssetRequest::Model {
                url: "/models/a.glb".into(),
                format: ModelFormat::Glb,
            });
            cancelled = Arc::clone(&loader.cancelled);
            assert_eq!(loader.pending(), 1);
        }
        assert!(cancelled.load(Ordering::Relaxed));
        // the worker wakes into a cancelled loader and exits quietly
        let _ = release.send(());
    }
}
