//! refpaint - reference-image painting engine
//!
//! Brush stamps sample pixels from a loaded reference image, optionally run
//! through a convolution effect, and composite through a shape mask onto a
//! transparent drawing layer over a background fill. The engine keeps a
//! bounded undo/redo stack of full-surface snapshots and can persist the
//! whole session to a durable string-keyed store.

pub mod brush;
pub mod effect;
pub mod engine;
pub mod error;
pub mod export;
pub mod history;
pub mod raster;
pub mod sample;
pub mod store;

pub use engine::{EngineParams, PaintEngine};
pub use error::EngineError;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for embedding applications
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "refpaint=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("refpaint initializing...");
}
