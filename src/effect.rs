//! Stamp effects - box blur and 3x3 convolution over sampled pixel blocks
//!
//! Every effect is a pure function of (input block, strength): identical
//! inputs always produce identical outputs, and the input block is never
//! mutated. Out-of-bounds sampling coordinates clamp to the block edges.

use serde::{Deserialize, Serialize};

use crate::raster::PixelBlock;

/// Effect applied to each sampled block before stamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    #[default]
    None,
    Blur,
    Sharpen,
    Edge,
}

/// Upper bound for the effect strength parameter
pub const MAX_STRENGTH: u8 = 10;

const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];
const EDGE_KERNEL: [[f32; 3]; 3] = [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]];

/// Apply `kind` at `strength` to `block`, returning a new block of
/// identical dimensions.
pub fn apply(kind: EffectKind, block: &PixelBlock, strength: u8) -> PixelBlock {
    let strength = strength.min(MAX_STRENGTH);
    match kind {
        EffectKind::None => block.clone(),
        EffectKind::Blur => box_blur(block, strength as u32),
        EffectKind::Sharpen => convolve3(block, &SHARPEN_KERNEL, strength),
        EffectKind::Edge => convolve3(block, &EDGE_KERNEL, strength),
    }
}

/// Unweighted mean over a (2r+1) x (2r+1) window, edge-clamped.
///
/// Alpha is averaged exactly like the color channels. Radius 0 is the
/// identity transform.
fn box_blur(block: &PixelBlock, radius: u32) -> PixelBlock {
    if radius == 0 || block.width() == 0 || block.height() == 0 {
        return block.clone();
    }

    let (w, h) = (block.width(), block.height());
    let r = radius as i64;
    let mut out = PixelBlock::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let mut sum = [0.0f32; 4];
            let mut count = 0.0f32;
            for wy in -r..=r {
                let sy = (y as i64 + wy).clamp(0, h as i64 - 1) as u32;
                for wx in -r..=r {
                    let sx = (x as i64 + wx).clamp(0, w as i64 - 1) as u32;
                    let px = block.pixel(sx, sy);
                    for c in 0..4 {
                        sum[c] += px[c] as f32;
                    }
                    count += 1.0;
                }
            }
            let mut px = [0u8; 4];
            for c in 0..4 {
                px[c] = (sum[c] / count).round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(x, y, px);
        }
    }
    out
}

/// Shared 3x3 convolution: the raw kernel sum is blended with the original
/// pixel by `strength / 10`, clamped to [0, 255]. Alpha passes through.
fn convolve3(block: &PixelBlock, kernel: &[[f32; 3]; 3], strength: u8) -> PixelBlock {
    if block.width() == 0 || block.height() == 0 {
        return block.clone();
    }

    let (w, h) = (block.width(), block.height());
    let blend = strength as f32 / MAX_STRENGTH as f32;
    let mut out = PixelBlock::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let orig = block.pixel(x, y);
            let mut sum = [0.0f32; 3];
            for (ky, row) in kernel.iter().enumerate() {
                let sy = (y as i64 + ky as i64 - 1).clamp(0, h as i64 - 1) as u32;
                for (kx, k) in row.iter().enumerate() {
                    let sx = (x as i64 + kx as i64 - 1).clamp(0, w as i64 - 1) as u32;
                    let px = block.pixel(sx, sy);
                    for c in 0..3 {
                        sum[c] += *k * px[c] as f32;
                    }
                }
            }
            let mut px = [0u8; 4];
            for c in 0..3 {
                let v = orig[c] as f32 + (sum[c] - orig[c] as f32) * blend;
                px[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            px[3] = orig[3];
            out.put_pixel(x, y, px);
        }
    }
    out
}
