//! Brush module - shape masks, stamp compositing, and stroke interpolation

mod interpolation;
mod mask;
mod stamp;

pub use interpolation::interpolate_linear;
pub use mask::StampMask;
pub use stamp::stamp;

use serde::{Deserialize, Serialize};

/// Brush footprint shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BrushShape {
    /// Disk of diameter = brush size
    #[default]
    Circle,
    /// Full bounding box
    Square,
    /// Disk stamped at every interpolated point along the stroke path
    Continuous,
}

impl BrushShape {
    /// Whether stroke segments are rasterized point-by-point
    pub fn is_continuous(self) -> bool {
        matches!(self, BrushShape::Continuous)
    }
}
