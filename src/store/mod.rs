//! Session persistence - durable string-keyed storage of engine state
//!
//! The paint surface, drawing layer, history stack, parameter bundle, and
//! reference image are each written under their own key (`keys`). Rasters
//! round-trip through encoded image formats: PNG for the live surfaces and
//! lossless WebP for history snapshots, embedded base64 in a JSON manifest.
//!
//! Restoration is asynchronous - decoding runs off the caller's context -
//! and every key restores independently: a missing or corrupt key degrades
//! to its default instead of failing the whole restore.

mod dir;
mod memory;

pub use dir::DirStore;
pub use memory::MemoryStore;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{EngineParams, PaintEngine};
use crate::raster::Raster;

/// Persisted key names
pub mod keys {
    pub const SURFACE: &str = "surface";
    pub const LAYER: &str = "layer";
    pub const HISTORY: &str = "history";
    pub const HISTORY_INDEX: &str = "history-index";
    pub const PARAMS: &str = "params";
    pub const REFERENCE: &str = "reference";
}

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("codec error: {0}")]
    Codec(String),
}

/// Durable string-keyed byte store
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
    /// Drop every key in a single operation
    fn clear(&mut self) -> Result<(), StoreError>;
}

// --- Raster codecs ---

pub(crate) fn encode_png(raster: &Raster) -> Result<Vec<u8>, StoreError> {
    let img = raster
        .to_rgba_image()
        .ok_or_else(|| StoreError::Codec("raster buffer size mismatch".into()))?;
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

pub(crate) fn decode_png(bytes: &[u8]) -> Result<Raster, StoreError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    Ok(Raster::from_rgba_image(&img))
}

fn encode_webp(raster: &Raster) -> Result<Vec<u8>, StoreError> {
    if raster.data().len() != (raster.width() as usize) * (raster.height() as usize) * 4 {
        return Err(StoreError::Codec("raster buffer size mismatch".into()));
    }
    let encoder = webp::Encoder::from_rgba(raster.data(), raster.width(), raster.height());
    Ok(encoder.encode_lossless().to_vec())
}

fn decode_webp(bytes: &[u8]) -> Result<Raster, StoreError> {
    let decoded = webp::Decoder::new(bytes)
        .decode()
        .ok_or_else(|| StoreError::Codec("WebP decode failed".into()))?;
    Ok(Raster::from_rgba_image(&decoded.to_image().to_rgba8()))
}

/// History snapshots as base64 lossless WebP, oldest first
#[derive(Debug, Serialize, Deserialize)]
struct HistoryManifest {
    entries: Vec<String>,
}

/// Write the full session under the persisted keys.
///
/// Callers that must never fail (e.g. session teardown) should go through
/// [`PaintEngine::persist`], which logs and swallows the error.
pub fn save_session(store: &mut dyn BlobStore, engine: &PaintEngine) -> Result<(), StoreError> {
    store.put(keys::SURFACE, &encode_png(engine.surface())?)?;
    store.put(keys::LAYER, &encode_png(engine.drawing_layer())?)?;

    let manifest = HistoryManifest {
        entries: engine
            .history_entries()
            .map(|entry| encode_webp(entry).map(|bytes| BASE64.encode(bytes)))
            .collect::<Result<_, _>>()?,
    };
    store.put(keys::HISTORY, &serde_json::to_vec(&manifest)?)?;
    store.put(keys::HISTORY_INDEX, &serde_json::to_vec(&engine.history_index())?)?;
    store.put(keys::PARAMS, &serde_json::to_vec(engine.params())?)?;

    match engine.reference() {
        Some(reference) => store.put(keys::REFERENCE, &encode_png(reference)?)?,
        None => store.remove(keys::REFERENCE)?,
    }

    tracing::info!(
        "session saved: {} history entries at index {}",
        engine.history_len(),
        engine.history_index()
    );
    Ok(())
}

/// Session state recovered from a store; absent fields fall back to engine
/// defaults when applied.
#[derive(Debug, Default)]
pub struct RestoredSession {
    pub surface: Option<Raster>,
    pub layer: Option<Raster>,
    pub history: Option<(Vec<Raster>, usize)>,
    pub params: Option<EngineParams>,
    pub reference: Option<Raster>,
}

/// Read and decode a persisted session.
///
/// Image decoding runs on the blocking pool. Each key restores
/// independently; read, parse, or decode failures are logged and leave the
/// corresponding field `None`.
pub async fn restore_session(store: &dyn BlobStore) -> RestoredSession {
    let mut restored = RestoredSession {
        surface: restore_raster(store, keys::SURFACE).await,
        layer: restore_raster(store, keys::LAYER).await,
        reference: restore_raster(store, keys::REFERENCE).await,
        ..RestoredSession::default()
    };

    if let Some(bytes) = read_key(store, keys::PARAMS) {
        match serde_json::from_slice::<EngineParams>(&bytes) {
            Ok(params) => restored.params = Some(params),
            Err(e) => tracing::warn!("ignoring unreadable parameter bundle: {}", e),
        }
    }

    restored.history = restore_history(store).await;
    restored
}

async fn restore_history(store: &dyn BlobStore) -> Option<(Vec<Raster>, usize)> {
    let bytes = read_key(store, keys::HISTORY)?;
    let manifest = match serde_json::from_slice::<HistoryManifest>(&bytes) {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::warn!("ignoring unreadable history manifest: {}", e);
            return None;
        }
    };

    let decoded = tokio::task::spawn_blocking(move || {
        let mut entries = Vec::with_capacity(manifest.entries.len());
        for (i, encoded) in manifest.entries.iter().enumerate() {
            let raster = BASE64
                .decode(encoded)
                .map_err(|e| StoreError::Codec(e.to_string()))
                .and_then(|bytes| decode_webp(&bytes));
            match raster {
                Ok(raster) => entries.push(raster),
                Err(e) => tracing::warn!("skipping undecodable history entry {}: {}", i, e),
            }
        }
        entries
    })
    .await;

    let entries = match decoded {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("history decode task failed: {}", e);
            return None;
        }
    };
    if entries.is_empty() {
        return None;
    }

    // Absent or unreadable index points at the newest entry
    let index = read_key(store, keys::HISTORY_INDEX)
        .and_then(|bytes| serde_json::from_slice::<usize>(&bytes).ok())
        .unwrap_or(entries.len() - 1);

    Some((entries, index))
}

async fn restore_raster(store: &dyn BlobStore, key: &str) -> Option<Raster> {
    let bytes = read_key(store, key)?;
    let key = key.to_string();
    match tokio::task::spawn_blocking(move || decode_png(&bytes)).await {
        Ok(Ok(raster)) => Some(raster),
        Ok(Err(e)) => {
            tracing::warn!("ignoring undecodable '{}' image: {}", key, e);
            None
        }
        Err(e) => {
            tracing::warn!("decode task for '{}' failed: {}", key, e);
            None
        }
    }
}

fn read_key(store: &dyn BlobStore, key: &str) -> Option<Vec<u8>> {
    match store.get(key) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("failed to read '{}', treating as absent: {}", key, e);
            None
        }
    }
}

/// Clear every persisted key. The caller reseeds the engine afterwards
/// (see [`PaintEngine::reset`]).
pub fn reset_session(store: &mut dyn BlobStore) -> Result<(), StoreError> {
    store.clear()?;
    tracing::info!("persisted session cleared");
    Ok(())
}
