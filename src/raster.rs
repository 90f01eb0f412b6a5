//! Raster surfaces - flat RGBA8 pixel grids with region read/write
//!
//! All pixel data is stored as straight (non-premultiplied) alpha in a flat
//! `Vec<u8>`, four bytes per pixel. The same type backs the paint surface,
//! the drawing layer, and the reference image.

use image::RgbaImage;
use rayon::prelude::*;

/// A rectangular region in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Clamp this rect so it lies fully inside `width` x `height`.
    ///
    /// The size is preserved where possible by sliding the origin back;
    /// a rect larger than the bounds is shrunk to fit.
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let w = self.w.min(width).max(1);
        let h = self.h.min(height).max(1);
        let x = self.x.min(width.saturating_sub(w));
        let y = self.y.min(height.saturating_sub(h));
        Self { x, y, w, h }
    }
}

/// A sampled block of pixels, detached from any surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBlock {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBlock {
    /// Create a transparent block
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Nearest-neighbor resample to `width` x `height`.
    ///
    /// Used to stretch a source rect sampled in reference-image space onto
    /// the brush bounding box in surface space.
    pub fn resampled(&self, width: u32, height: u32) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = PixelBlock::new(width, height);
        if self.width == 0 || self.height == 0 || width == 0 || height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            let sy = sy.min(self.height - 1);
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                let sx = sx.min(self.width - 1);
                out.put_pixel(x, y, self.pixel(sx, sy));
            }
        }
        out
    }
}

/// A fixed-size RGBA8 raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Create a fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Create an opaque raster filled with a single color
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut raster = Self::new(width, height);
        raster.fill_rgb(rgb);
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fill with an opaque color
    pub fn fill_rgb(&mut self, rgb: [u8; 3]) {
        for px in self.data.chunks_exact_mut(4) {
            px[0] = rgb[0];
            px[1] = rgb[1];
            px[2] = rgb[2];
            px[3] = 255;
        }
    }

    /// Copy the region `rect` (clamped to bounds) into a detached block
    pub fn read_block(&self, rect: Rect) -> PixelBlock {
        let rect = rect.clamped(self.width, self.height);
        let mut block = PixelBlock::new(rect.w, rect.h);
        for y in 0..rect.h {
            for x in 0..rect.w {
                block.put_pixel(x, y, self.pixel(rect.x + x, rect.y + y));
            }
        }
        block
    }

    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.as_raw().clone(),
        }
    }
}

/// Recompose the full surface as `background fill` under `layer`.
///
/// The layer's straight alpha is blended over the opaque background; the
/// result is always opaque. Parallelized by row - this runs on every
/// background-color change.
pub fn compose(surface: &mut Raster, background: [u8; 3], layer: &Raster) {
    let stride = surface.width as usize * 4;
    let layer_data = layer.data();
    surface
        .data
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &layer_data[y * stride..(y + 1) * stride];
            for px in 0..row_out.len() / 4 {
                let i = px * 4;
                blend_over_background(&mut row_out[i..i + 4], background, &row_in[i..i + 4]);
            }
        });
}

/// Recompose only the pixels inside `rect` (clamped). Serial - stamp-sized.
pub fn compose_region(surface: &mut Raster, background: [u8; 3], layer: &Raster, rect: Rect) {
    let rect = rect.clamped(surface.width, surface.height);
    for y in rect.y..rect.y + rect.h {
        for x in rect.x..rect.x + rect.w {
            let lp = layer.pixel(x, y);
            let mut out = [0u8; 4];
            blend_over_background(&mut out, background, &lp);
            surface.put_pixel(x, y, out);
        }
    }
}

#[inline]
fn blend_over_background(out: &mut [u8], background: [u8; 3], layer_px: &[u8]) {
    let a = layer_px[3] as f32 / 255.0;
    for c in 0..3 {
        let v = layer_px[c] as f32 * a + background[c] as f32 * (1.0 - a);
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = 255;
}
