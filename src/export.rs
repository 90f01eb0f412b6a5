//! Surface export - encoded snapshots for download

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::EngineError;
use crate::raster::Raster;
use crate::store;

/// Encode the composited surface as PNG bytes.
///
/// Failures surface as an error and leave the engine untouched - the
/// surface is only read.
pub fn export_png(surface: &Raster) -> Result<Vec<u8>, EngineError> {
    Ok(store::encode_png(surface)?)
}

/// Build a download file name with a collision-resistant timestamp,
/// e.g. `painting-68b1f2a3-2f4c91e0.png`.
pub fn export_file_name(prefix: &str) -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}-{:x}-{:x}.png", prefix, now.as_secs(), now.subsec_nanos())
}
