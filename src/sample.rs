//! Sampling strategies - select the reference-image region feeding each stamp
//!
//! The sampler turns a pointer step (previous position, current position,
//! elapsed time) into a source rectangle of the reference image. Scan modes
//! keep a persistent cursor that walks the image column by column (or row by
//! row) at a rate proportional to pointer speed; the cursor survives stroke
//! boundaries and is only reset when the sampling mode changes.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::raster::Rect;

/// How the next source rect is chosen from the reference image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingMode {
    /// Directly under the pointer, mapped into image space
    #[default]
    Normal,
    /// Walk the image top-to-bottom, column by column
    VerticalScan,
    /// Walk the image left-to-right, row by row
    HorizontalScan,
    /// Uniformly random origin on every stamp
    Random,
}

/// Direction a scan cursor advances in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ScanDirection {
    #[default]
    Forward,
    Backward,
}

/// Multiplier from pointer speed (px/ms) to the scan offset increment
pub const SCAN_SPEED_SCALE: f32 = 8.0;

/// Persistent scan position used by the scan modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanCursor {
    /// Accumulated offset along the scan axis (y for vertical, x for horizontal)
    pub offset: u32,
    /// Current column index (vertical scan)
    pub column: u32,
    /// Current row index (horizontal scan)
    pub row: u32,
}

/// One pointer step, as seen by the sampler
#[derive(Debug, Clone, Copy)]
pub struct SampleContext {
    /// Previous pointer position in surface space
    pub prev: (f32, f32),
    /// Current pointer position in surface space
    pub pos: (f32, f32),
    /// Milliseconds since the previous pointer event
    pub elapsed_ms: u64,
    /// Brush size in surface pixels
    pub brush_size: u32,
    /// Paint surface dimensions
    pub canvas: (u32, u32),
    /// Reference image dimensions
    pub image: (u32, u32),
}

impl SampleContext {
    /// Pointer speed in surface pixels per millisecond
    pub fn speed(&self) -> f32 {
        let dx = self.pos.0 - self.prev.0;
        let dy = self.pos.1 - self.prev.1;
        let dist = (dx * dx + dy * dy).sqrt();
        dist / self.elapsed_ms.max(1) as f32
    }
}

/// Produces source rects and owns the scan cursor
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    mode: SamplingMode,
    direction: ScanDirection,
    pub cursor: ScanCursor,
}

impl Sampler {
    pub fn new(mode: SamplingMode, direction: ScanDirection) -> Self {
        Self {
            mode,
            direction,
            cursor: ScanCursor::default(),
        }
    }

    pub fn mode(&self) -> SamplingMode {
        self.mode
    }

    pub fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// Switch sampling mode. Changing mode resets the cursor to the origin.
    pub fn set_mode(&mut self, mode: SamplingMode) {
        if mode != self.mode {
            self.mode = mode;
            self.cursor = ScanCursor::default();
        }
    }

    pub fn set_direction(&mut self, direction: ScanDirection) {
        self.direction = direction;
    }

    /// Produce the source rect for the next stamp and advance the cursor.
    ///
    /// The returned rect always lies fully inside the reference image.
    pub fn source_rect(&mut self, ctx: &SampleContext) -> Rect {
        let (iw, ih) = ctx.image;
        let (cw, ch) = ctx.canvas;

        // Brush size mapped into image space: floor for origins, ceil for
        // sizes, so the source window never undershoots the brush footprint.
        let scale_x = iw as f32 / cw.max(1) as f32;
        let scale_y = ih as f32 / ch.max(1) as f32;
        let sw = ((ctx.brush_size as f32 * scale_x).ceil() as u32).clamp(1, iw);
        let sh = ((ctx.brush_size as f32 * scale_y).ceil() as u32).clamp(1, ih);

        match self.mode {
            SamplingMode::Normal => {
                let x = (ctx.pos.0.max(0.0) * scale_x).floor() as u32;
                let y = (ctx.pos.1.max(0.0) * scale_y).floor() as u32;
                Rect::new(x, y, sw, sh).clamped(iw, ih)
            }
            SamplingMode::VerticalScan => {
                let max_off = ih - sh;
                let cols = (iw / sw).max(1);
                self.advance(ctx, max_off, cols, Axis::Vertical);
                let x = (self.cursor.column * sw).min(iw - sw);
                Rect::new(x, self.cursor.offset, sw, sh)
            }
            SamplingMode::HorizontalScan => {
                let max_off = iw - sw;
                let rows = (ih / sh).max(1);
                self.advance(ctx, max_off, rows, Axis::Horizontal);
                let y = (self.cursor.row * sh).min(ih - sh);
                Rect::new(self.cursor.offset, y, sw, sh)
            }
            SamplingMode::Random => {
                let mut rng = rand::thread_rng();
                let x = rng.gen_range(0..=iw - sw);
                let y = rng.gen_range(0..=ih - sh);
                Rect::new(x, y, sw, sh)
            }
        }
    }

    /// Accumulate the speed-derived increment; wrap the lane index and reset
    /// the offset to the entry edge on overflow or underflow.
    fn advance(&mut self, ctx: &SampleContext, max_off: u32, lanes: u32, axis: Axis) {
        let step = (ctx.speed() * SCAN_SPEED_SCALE).ceil() as i64;
        let signed = match self.direction {
            ScanDirection::Forward => self.cursor.offset as i64 + step,
            ScanDirection::Backward => self.cursor.offset as i64 - step,
        };

        let lane = match axis {
            Axis::Vertical => &mut self.cursor.column,
            Axis::Horizontal => &mut self.cursor.row,
        };

        if signed > max_off as i64 {
            *lane = (*lane + 1) % lanes;
            self.cursor.offset = 0;
        } else if signed < 0 {
            *lane = if *lane == 0 { lanes - 1 } else { *lane - 1 };
            self.cursor.offset = max_off;
        } else {
            self.cursor.offset = signed as u32;
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Vertical,
    Horizontal,
}
