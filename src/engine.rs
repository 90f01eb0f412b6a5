//! Painting engine - owns the surfaces, parameters, history, and session state
//!
//! All mutation happens synchronously inside the caller's event context:
//! the engine exclusively owns the paint surface, the drawing layer, and
//! the history stack, so no locking is involved. The paint surface is
//! always the background fill composited under the drawing layer; stamps
//! write to the layer and recompose the touched region.

use serde::{Deserialize, Serialize};

use crate::brush::{self, BrushShape, StampMask};
use crate::effect::{self, EffectKind, MAX_STRENGTH};
use crate::error::EngineError;
use crate::history::{HistoryStack, DEFAULT_CAPACITY};
use crate::raster::{compose, Raster};
use crate::sample::{SampleContext, Sampler, SamplingMode, ScanDirection};
use crate::store::{self, BlobStore, RestoredSession};

/// Surfaces larger than this are rejected at construction
pub const MAX_DIMENSION: u32 = 16384;

/// Upper bound for the brush size parameter
pub const MAX_BRUSH_SIZE: u32 = 512;

/// The full parameter bundle: brush, effect, sampling, and view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineParams {
    /// Brush size in surface pixels
    pub brush_size: u32,
    pub brush_shape: BrushShape,
    pub effect: EffectKind,
    /// Effect strength, 0..=10
    pub effect_strength: u8,
    pub sampling_mode: SamplingMode,
    pub sampling_direction: ScanDirection,
    /// Background fill color
    pub background: [u8; 3],
    /// Whether the UI overlays the reference image on the surface
    pub show_reference: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            brush_size: 5,
            brush_shape: BrushShape::Circle,
            effect: EffectKind::None,
            effect_strength: 5,
            sampling_mode: SamplingMode::Normal,
            sampling_direction: ScanDirection::Forward,
            background: [255, 255, 255],
            show_reference: false,
        }
    }
}

impl EngineParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.brush_size == 0 || self.brush_size > MAX_BRUSH_SIZE {
            return Err(EngineError::InvalidParam(format!(
                "brush size {} out of range 1..={}",
                self.brush_size, MAX_BRUSH_SIZE
            )));
        }
        if self.effect_strength > MAX_STRENGTH {
            return Err(EngineError::InvalidParam(format!(
                "effect strength {} out of range 0..={}",
                self.effect_strength, MAX_STRENGTH
            )));
        }
        Ok(())
    }
}

/// In-flight stroke bookkeeping
#[derive(Debug, Clone, Copy)]
struct StrokeState {
    x: f32,
    y: f32,
    time_ms: u64,
    /// Whether any stamp landed, i.e. whether stroke end records a snapshot
    stamped: bool,
}

/// The painting engine
pub struct PaintEngine {
    width: u32,
    height: u32,
    surface: Raster,
    layer: Raster,
    reference: Option<Raster>,
    params: EngineParams,
    sampler: Sampler,
    history: HistoryStack,
    stroke: Option<StrokeState>,
    /// Set on the first pointer-down; guards against a late async restore
    /// clobbering work in progress.
    stroke_seen: bool,
}

impl PaintEngine {
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        Self::with_params(width, height, EngineParams::default())
    }

    pub fn with_params(width: u32, height: u32, params: EngineParams) -> Result<Self, EngineError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(EngineError::InvalidParam(format!(
                "surface dimensions {}x{} out of range 1..={}",
                width, height, MAX_DIMENSION
            )));
        }
        params.validate()?;

        let surface = Raster::filled(width, height, params.background);
        let mut history = HistoryStack::new(DEFAULT_CAPACITY);
        history.seed(surface.clone());

        Ok(Self {
            width,
            height,
            layer: Raster::new(width, height),
            sampler: Sampler::new(params.sampling_mode, params.sampling_direction),
            surface,
            reference: None,
            params,
            history,
            stroke: None,
            stroke_seen: false,
        })
    }

    // --- Accessors ---

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn surface(&self) -> &Raster {
        &self.surface
    }

    pub fn drawing_layer(&self) -> &Raster {
        &self.layer
    }

    pub fn reference(&self) -> Option<&Raster> {
        self.reference.as_ref()
    }

    pub fn has_reference(&self) -> bool {
        self.reference.is_some()
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    pub fn history_entries(&self) -> impl Iterator<Item = &Raster> {
        self.history.entries()
    }

    // --- Pointer events ---

    /// Begin a stroke and stamp at the pressed position.
    pub fn pointer_down(&mut self, x: f32, y: f32, time_ms: u64) -> Result<(), EngineError> {
        if self.reference.is_none() {
            return Err(EngineError::NoReference);
        }
        self.stroke = Some(StrokeState {
            x,
            y,
            time_ms,
            stamped: false,
        });
        self.stroke_seen = true;
        self.stroke_to(x, y, time_ms)
    }

    /// Continue the active stroke. A move without a preceding pointer-down
    /// is ignored.
    pub fn pointer_move(&mut self, x: f32, y: f32, time_ms: u64) -> Result<(), EngineError> {
        if self.stroke.is_none() {
            return Ok(());
        }
        self.stroke_to(x, y, time_ms)
    }

    pub fn pointer_up(&mut self) {
        self.finish_stroke();
    }

    pub fn pointer_leave(&mut self) {
        self.finish_stroke();
    }

    /// Sample, filter, and stamp one stroke step ending at (x, y).
    fn stroke_to(&mut self, x: f32, y: f32, time_ms: u64) -> Result<(), EngineError> {
        let Some(prev) = self.stroke else {
            return Ok(());
        };
        let Some(reference) = self.reference.as_ref() else {
            return Err(EngineError::NoReference);
        };

        let ctx = SampleContext {
            prev: (prev.x, prev.y),
            pos: (x, y),
            elapsed_ms: time_ms.saturating_sub(prev.time_ms),
            brush_size: self.params.brush_size,
            canvas: (self.width, self.height),
            image: (reference.width(), reference.height()),
        };
        let rect = self.sampler.source_rect(&ctx);
        let sampled = reference.read_block(rect);

        let block = effect::apply(self.params.effect, &sampled, self.params.effect_strength);
        let mask = StampMask::for_shape(self.params.brush_shape, self.params.brush_size);
        let background = self.params.background;

        if self.params.brush_shape.is_continuous() {
            for (px, py) in brush::interpolate_linear((prev.x, prev.y), (x, y)) {
                brush::stamp(&mut self.layer, &mut self.surface, background, &block, &mask, px, py);
            }
        } else {
            brush::stamp(&mut self.layer, &mut self.surface, background, &block, &mask, x, y);
        }

        self.stroke = Some(StrokeState {
            x,
            y,
            time_ms,
            stamped: true,
        });
        Ok(())
    }

    /// Commit the active stroke: snapshot the surface if anything was stamped.
    fn finish_stroke(&mut self) {
        if let Some(stroke) = self.stroke.take() {
            if stroke.stamped {
                self.history.push(self.surface.clone());
                tracing::debug!(
                    "stroke committed: history at {}/{}",
                    self.history.index() + 1,
                    self.history.len()
                );
            }
        }
    }

    // --- Parameter changes ---

    pub fn set_brush_size(&mut self, size: u32) -> Result<(), EngineError> {
        if size == 0 || size > MAX_BRUSH_SIZE {
            return Err(EngineError::InvalidParam(format!(
                "brush size {} out of range 1..={}",
                size, MAX_BRUSH_SIZE
            )));
        }
        self.params.brush_size = size;
        Ok(())
    }

    pub fn set_brush_shape(&mut self, shape: BrushShape) {
        self.params.brush_shape = shape;
    }

    pub fn set_effect(&mut self, kind: EffectKind) {
        self.params.effect = kind;
    }

    pub fn set_effect_strength(&mut self, strength: u8) -> Result<(), EngineError> {
        if strength > MAX_STRENGTH {
            return Err(EngineError::InvalidParam(format!(
                "effect strength {} out of range 0..={}",
                strength, MAX_STRENGTH
            )));
        }
        self.params.effect_strength = strength;
        Ok(())
    }

    /// Switch sampling mode; a mode change resets the scan cursor.
    pub fn set_sampling_mode(&mut self, mode: SamplingMode) {
        self.params.sampling_mode = mode;
        self.sampler.set_mode(mode);
    }

    pub fn set_sampling_direction(&mut self, direction: ScanDirection) {
        self.params.sampling_direction = direction;
        self.sampler.set_direction(direction);
    }

    /// Change the background fill and recompose the full surface. Drawing
    /// layer content is never read or altered by this.
    pub fn set_background(&mut self, rgb: [u8; 3]) {
        self.params.background = rgb;
        compose(&mut self.surface, rgb, &self.layer);
    }

    pub fn set_show_reference(&mut self, show: bool) {
        self.params.show_reference = show;
    }

    // --- Reference image ---

    /// Decode and install a new reference image. On failure the engine
    /// keeps its prior state.
    pub fn load_reference(&mut self, bytes: &[u8]) -> Result<(), EngineError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        tracing::info!("reference image loaded: {}x{}", img.width(), img.height());
        self.reference = Some(Raster::from_rgba_image(&img));
        Ok(())
    }

    /// Install an already-decoded reference image
    pub fn set_reference(&mut self, raster: Raster) {
        self.reference = Some(raster);
    }

    // --- History ---

    /// Step back one snapshot. Returns whether an undo was applied. The
    /// drawing layer is resynchronized from the restored surface, since a
    /// snapshot encodes drawn and background state together.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                let restored = snapshot.clone();
                self.surface = restored.clone();
                self.layer = restored;
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot. Returns whether a redo was applied.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                let restored = snapshot.clone();
                self.surface = restored.clone();
                self.layer = restored;
                true
            }
            None => false,
        }
    }

    // --- Session ---

    /// Clear the drawing layer, refill the background, and reseed history
    /// with a single empty snapshot.
    pub fn reset(&mut self) {
        self.layer.clear();
        self.surface = Raster::filled(self.width, self.height, self.params.background);
        self.history.seed(self.surface.clone());
        self.stroke = None;
        self.stroke_seen = false;
        tracing::info!("engine reset");
    }

    /// Save the session, logging instead of failing - used on teardown
    /// paths where an error must not surface as a crash.
    pub fn persist(&self, store: &mut dyn BlobStore) {
        if let Err(e) = store::save_session(store, self) {
            tracing::warn!("session save skipped: {}", e);
        }
    }

    /// Apply an asynchronously restored session.
    ///
    /// Returns `false` (leaving the engine untouched) when a stroke has
    /// already begun - the user's new work wins over the late restore.
    /// Fields with mismatched dimensions or invalid values are skipped
    /// individually.
    pub fn apply_restored(&mut self, restored: RestoredSession) -> bool {
        if self.stroke_seen {
            tracing::warn!("discarding restored session: a stroke has already begun");
            return false;
        }

        if let Some(params) = restored.params {
            match params.validate() {
                Ok(()) => {
                    self.sampler.set_mode(params.sampling_mode);
                    self.sampler.set_direction(params.sampling_direction);
                    self.params = params;
                }
                Err(e) => tracing::warn!("ignoring restored parameters: {}", e),
            }
        }

        if let Some(reference) = restored.reference {
            self.reference = Some(reference);
        }

        if let Some(layer) = restored.layer {
            if layer.width() == self.width && layer.height() == self.height {
                self.layer = layer;
            } else {
                tracing::warn!("ignoring restored layer with mismatched dimensions");
            }
        }

        match restored.surface {
            Some(surface) if surface.width() == self.width && surface.height() == self.height => {
                self.surface = surface;
            }
            Some(_) => {
                tracing::warn!("ignoring restored surface with mismatched dimensions");
                compose(&mut self.surface, self.params.background, &self.layer);
            }
            None => compose(&mut self.surface, self.params.background, &self.layer),
        }

        match restored.history {
            Some((entries, index)) => {
                let entries: Vec<Raster> = entries
                    .into_iter()
                    .filter(|e| e.width() == self.width && e.height() == self.height)
                    .collect();
                if entries.is_empty() {
                    self.history.seed(self.surface.clone());
                } else {
                    self.history =
                        HistoryStack::from_entries(entries, index, self.history.capacity());
                }
            }
            None => self.history.seed(self.surface.clone()),
        }

        tracing::info!(
            "session restored: {} history entries at index {}",
            self.history.len(),
            self.history.index()
        );
        true
    }

    // --- Export ---

    /// Encode the current surface for download
    pub fn export_png(&self) -> Result<Vec<u8>, EngineError> {
        crate::export::export_png(&self.surface)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sample::ScanCursor;

    const RED: [u8; 4] = [200, 20, 10, 255];

    fn engine_with_solid_reference(size: u32) -> PaintEngine {
        let mut engine = PaintEngine::new(size, size).unwrap();
        engine.set_reference(Raster::filled(size, size, [RED[0], RED[1], RED[2]]));
        engine
    }

    #[test]
    fn test_dimensions_are_validated() {
        assert!(PaintEngine::new(0, 100).is_err());
        assert!(PaintEngine::new(100, 0).is_err());
        assert!(PaintEngine::new(MAX_DIMENSION + 1, 100).is_err());
        assert!(PaintEngine::new(100, 100).is_ok());
    }

    #[test]
    fn test_stamp_without_reference_is_gated() {
        let mut engine = PaintEngine::new(50, 50).unwrap();
        let before = engine.surface().clone();

        assert!(matches!(
            engine.pointer_down(25.0, 25.0, 0),
            Err(EngineError::NoReference)
        ));
        engine.pointer_up();

        assert_eq!(engine.surface(), &before);
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn test_circle_stamp_alpha_matches_mask_exactly() {
        let mut engine = engine_with_solid_reference(100);
        engine.set_brush_size(10).unwrap();
        engine.pointer_down(50.0, 50.0, 0).unwrap();
        engine.pointer_up();

        let mask = StampMask::circle(10);
        for dy in 0..10 {
            for dx in 0..10 {
                let alpha = engine.drawing_layer().pixel(45 + dx, 45 + dy)[3];
                let expected = if mask.covers(dx, dy) { 255 } else { 0 };
                assert_eq!(alpha, expected, "mask mismatch at ({}, {})", dx, dy);
            }
        }
        // painted pixels carry the sampled reference color
        assert_eq!(engine.surface().pixel(50, 50), RED);
    }

    #[test]
    fn test_normal_sampling_reads_under_the_pointer() {
        let mut engine = PaintEngine::new(100, 100).unwrap();
        // left half red, right half blue
        let mut reference = Raster::filled(100, 100, [200, 0, 0]);
        for y in 0..100 {
            for x in 50..100 {
                reference.put_pixel(x, y, [0, 0, 200, 255]);
            }
        }
        engine.set_reference(reference);
        engine.set_brush_size(10).unwrap();
        engine.set_brush_shape(BrushShape::Square);

        engine.pointer_down(50.0, 50.0, 0).unwrap();
        engine.pointer_up();

        // the source rect starts at the pointer, so the whole stamp is blue
        assert_eq!(engine.drawing_layer().pixel(46, 50), [0, 0, 200, 255]);
        assert_eq!(engine.drawing_layer().pixel(54, 50), [0, 0, 200, 255]);
    }

    #[test]
    fn test_snapshots_then_undos_restore_initial_pixels() {
        let mut engine = engine_with_solid_reference(60);
        let initial = engine.surface().clone();

        for (i, spot) in [(10.0, 10.0), (30.0, 30.0), (50.0, 50.0)].iter().enumerate() {
            engine.pointer_down(spot.0, spot.1, i as u64 * 100).unwrap();
            engine.pointer_up();
        }
        assert_ne!(engine.surface(), &initial);

        for _ in 0..3 {
            assert!(engine.undo());
        }
        assert_eq!(engine.surface(), &initial);
        assert!(!engine.undo());
    }

    #[test]
    fn test_undo_then_redo_restores_pre_undo_pixels() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_down(20.0, 20.0, 0).unwrap();
        engine.pointer_up();
        let drawn = engine.surface().clone();

        assert!(engine.undo());
        assert_ne!(engine.surface(), &drawn);
        assert!(engine.redo());
        assert_eq!(engine.surface(), &drawn);
        assert!(!engine.redo());
    }

    #[test]
    fn test_stroke_after_undo_discards_redo() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_down(20.0, 20.0, 0).unwrap();
        engine.pointer_up();
        engine.pointer_down(40.0, 40.0, 100).unwrap();
        engine.pointer_up();

        engine.undo();
        assert!(engine.can_redo());

        engine.pointer_down(10.0, 50.0, 200).unwrap();
        engine.pointer_up();
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_history_is_capped_across_many_strokes() {
        let mut engine = engine_with_solid_reference(30);
        for i in 0..60u64 {
            engine
                .pointer_down((i % 20) as f32 + 5.0, (i / 20) as f32 * 8.0 + 5.0, i * 50)
                .unwrap();
            engine.pointer_up();
        }

        assert_eq!(engine.history_len(), DEFAULT_CAPACITY);
        let mut undos = 0;
        while engine.undo() {
            undos += 1;
        }
        assert_eq!(undos, DEFAULT_CAPACITY - 1);
        assert_eq!(engine.history_index(), 0);
    }

    #[test]
    fn test_undo_resynchronizes_drawing_layer_from_snapshot() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_down(20.0, 20.0, 0).unwrap();
        engine.pointer_up();
        engine.pointer_down(40.0, 40.0, 100).unwrap();
        engine.pointer_up();

        engine.undo();
        assert_eq!(engine.drawing_layer(), engine.surface());
    }

    #[test]
    fn test_background_change_preserves_painted_pixels() {
        let mut engine = engine_with_solid_reference(60);
        engine.set_brush_size(10).unwrap();
        engine.pointer_down(30.0, 30.0, 0).unwrap();
        engine.pointer_up();
        let layer_before = engine.drawing_layer().clone();

        engine.set_background([0, 0, 255]);

        assert_eq!(engine.drawing_layer(), &layer_before);
        assert_eq!(engine.surface().pixel(30, 30), RED);
        assert_eq!(engine.surface().pixel(5, 5), [0, 0, 255, 255]);
    }

    #[test]
    fn test_continuous_shape_paints_the_whole_segment() {
        let mut engine = engine_with_solid_reference(60);
        engine.set_brush_size(10).unwrap();
        engine.set_brush_shape(BrushShape::Continuous);

        engine.pointer_down(10.0, 30.0, 0).unwrap();
        engine.pointer_move(50.0, 30.0, 16).unwrap();
        engine.pointer_up();

        for x in 10..=50 {
            assert_eq!(engine.drawing_layer().pixel(x, 30)[3], 255, "gap at x={}", x);
        }
    }

    #[test]
    fn test_circle_shape_does_not_interpolate() {
        let mut engine = engine_with_solid_reference(60);
        engine.set_brush_size(10).unwrap();

        engine.pointer_down(10.0, 30.0, 0).unwrap();
        engine.pointer_move(50.0, 30.0, 16).unwrap();
        engine.pointer_up();

        // one stamp per event: the midpoint between the two stamps is bare
        assert_eq!(engine.drawing_layer().pixel(30, 30)[3], 0);
        assert_eq!(engine.drawing_layer().pixel(10, 30)[3], 255);
        assert_eq!(engine.drawing_layer().pixel(50, 30)[3], 255);
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_move(30.0, 30.0, 0).unwrap();
        engine.pointer_up();
        assert!(engine.drawing_layer().data().iter().all(|&b| b == 0));
        assert_eq!(engine.history_len(), 1);
    }

    #[test]
    fn test_pointer_leave_commits_like_pointer_up() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_down(20.0, 20.0, 0).unwrap();
        engine.pointer_leave();
        assert_eq!(engine.history_len(), 2);
        assert!(engine.can_undo());
    }

    #[test]
    fn test_param_setters_validate_ranges() {
        let mut engine = PaintEngine::new(50, 50).unwrap();
        assert!(engine.set_brush_size(0).is_err());
        assert!(engine.set_brush_size(MAX_BRUSH_SIZE + 1).is_err());
        assert!(engine.set_brush_size(32).is_ok());
        assert!(engine.set_effect_strength(MAX_STRENGTH + 1).is_err());
        assert!(engine.set_effect_strength(0).is_ok());
        assert_eq!(engine.params().brush_size, 32);
    }

    #[test]
    fn test_sampling_mode_change_resets_cursor() {
        let mut engine = engine_with_solid_reference(100);
        engine.set_sampling_mode(SamplingMode::VerticalScan);
        engine.pointer_down(10.0, 10.0, 0).unwrap();
        engine.pointer_move(40.0, 50.0, 8).unwrap();
        engine.pointer_up();
        assert_ne!(engine.sampler().cursor, ScanCursor::default());

        engine.set_sampling_mode(SamplingMode::HorizontalScan);
        assert_eq!(engine.sampler().cursor, ScanCursor::default());
    }

    #[test]
    fn test_scan_cursor_persists_across_strokes() {
        let mut engine = engine_with_solid_reference(100);
        engine.set_sampling_mode(SamplingMode::VerticalScan);
        engine.pointer_down(10.0, 10.0, 0).unwrap();
        engine.pointer_move(40.0, 50.0, 8).unwrap();
        engine.pointer_up();
        let cursor = engine.sampler().cursor;
        assert_ne!(cursor, ScanCursor::default());

        // the next stroke continues from the carried-over offset
        engine.pointer_down(10.0, 10.0, 100).unwrap();
        engine.pointer_move(40.0, 50.0, 108).unwrap();
        engine.pointer_up();
        assert_ne!(engine.sampler().cursor, cursor);
    }

    #[test]
    fn test_reset_restores_pristine_state() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_down(20.0, 20.0, 0).unwrap();
        engine.pointer_up();
        engine.reset();

        assert!(engine.drawing_layer().data().iter().all(|&b| b == 0));
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.history_index(), 0);
        assert_eq!(
            engine.surface(),
            &Raster::filled(60, 60, engine.params().background)
        );
    }

    #[test]
    fn test_load_reference_failure_keeps_prior_state() {
        let mut engine = PaintEngine::new(50, 50).unwrap();
        assert!(engine.load_reference(b"definitely not an image").is_err());
        assert!(!engine.has_reference());

        let good = crate::export::export_png(&Raster::filled(8, 8, [1, 2, 3])).unwrap();
        engine.load_reference(&good).unwrap();
        assert!(engine.has_reference());

        // a later bad load keeps the existing reference
        assert!(engine.load_reference(b"garbage").is_err());
        assert!(engine.has_reference());
    }

    #[test]
    fn test_restore_is_rejected_after_a_stroke() {
        let mut engine = engine_with_solid_reference(60);
        engine.pointer_down(20.0, 20.0, 0).unwrap();
        engine.pointer_up();

        let restored = RestoredSession::default();
        assert!(!engine.apply_restored(restored));
    }

    #[test]
    fn test_restore_with_mismatched_dimensions_is_skipped() {
        let mut engine = PaintEngine::new(60, 60).unwrap();
        let restored = RestoredSession {
            surface: Some(Raster::filled(10, 10, [1, 1, 1])),
            layer: Some(Raster::new(10, 10)),
            history: Some((vec![Raster::filled(10, 10, [1, 1, 1])], 0)),
            ..RestoredSession::default()
        };
        assert!(engine.apply_restored(restored));
        assert_eq!(engine.surface().width(), 60);
        assert_eq!(engine.history_len(), 1);
        assert_eq!(engine.history_entries().next().unwrap().width(), 60);
    }

    #[test]
    fn test_export_png_reflects_surface() {
        let mut engine = engine_with_solid_reference(30);
        engine.pointer_down(15.0, 15.0, 0).unwrap();
        engine.pointer_up();

        let bytes = engine.export_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&Raster::from_rgba_image(&decoded), engine.surface());
    }
}
