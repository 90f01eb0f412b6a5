//! Stamp compositing - one brush application at a single point
//!
//! A stamp stretches the sampled block over the brush bounding box, writes
//! the mask-covered pixels into the drawing layer with alpha-over
//! compositing, and recomposes the touched surface region over the
//! background fill. Painting into the layer (rather than the surface) is
//! what lets strokes survive background-color changes.

use super::StampMask;
use crate::raster::{compose_region, PixelBlock, Raster, Rect};

/// Composite one stamp centered on (cx, cy).
///
/// Returns the touched surface region, or `None` when the stamp lies fully
/// outside the surface.
pub fn stamp(
    layer: &mut Raster,
    surface: &mut Raster,
    background: [u8; 3],
    block: &PixelBlock,
    mask: &StampMask,
    cx: f32,
    cy: f32,
) -> Option<Rect> {
    let size = mask.size();
    if size == 0 || surface.width() == 0 || surface.height() == 0 {
        return None;
    }

    let half = size as f32 / 2.0;
    let left = (cx - half).floor() as i64;
    let top = (cy - half).floor() as i64;

    let width = surface.width() as i64;
    let height = surface.height() as i64;
    if left + size as i64 <= 0 || top + size as i64 <= 0 || left >= width || top >= height {
        return None;
    }

    let resampled = block.resampled(size, size);

    for dy in 0..size {
        let ty = top + dy as i64;
        if ty < 0 || ty >= height {
            continue;
        }
        for dx in 0..size {
            let tx = left + dx as i64;
            if tx < 0 || tx >= width {
                continue;
            }
            if !mask.covers(dx, dy) {
                continue;
            }
            let src = resampled.pixel(dx, dy);
            if src[3] == 0 {
                continue;
            }
            let (tx, ty) = (tx as u32, ty as u32);
            let dst = layer.pixel(tx, ty);
            layer.put_pixel(tx, ty, alpha_over(dst, src));
        }
    }

    // Clipped bounding box of the stamp
    let x0 = left.max(0) as u32;
    let y0 = top.max(0) as u32;
    let x1 = (left + size as i64).min(width) as u32;
    let y1 = (top + size as i64).min(height) as u32;
    let dirty = Rect::new(x0, y0, x1 - x0, y1 - y0);

    compose_region(surface, background, layer, dirty);
    Some(dirty)
}

/// Standard straight-alpha "over" operator: `src` over `dst`
#[inline]
fn alpha_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}
