//! Stamp pipeline benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use refpaint_lib::brush::BrushShape;
use refpaint_lib::effect::EffectKind;
use refpaint_lib::engine::PaintEngine;
use refpaint_lib::raster::Raster;

fn engine_with_reference(size: u32) -> PaintEngine {
    let mut engine = PaintEngine::new(size, size).expect("valid dimensions");
    engine.set_reference(Raster::filled(size, size, [180, 90, 45]));
    engine
}

fn stroke(engine: &mut PaintEngine, points: usize) {
    engine.pointer_down(10.0, 10.0, 0).expect("reference is loaded");
    for i in 1..points {
        let t = i as f32 / points as f32;
        let x = 10.0 + t * 480.0;
        let y = 250.0 + (t * std::f32::consts::PI * 4.0).sin() * 100.0;
        engine
            .pointer_move(x, y, i as u64 * 8)
            .expect("reference is loaded");
    }
    engine.pointer_up();
}

fn benchmark_stroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stroke");

    for count in [10usize, 50, 100].iter() {
        group.bench_with_input(BenchmarkId::new("points", count), count, |b, &count| {
            let mut engine = engine_with_reference(512);
            engine.set_brush_size(24).expect("in range");
            b.iter(|| stroke(&mut engine, count))
        });
    }

    group.finish();
}

fn benchmark_brush_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Brush Shape Impact");

    for (name, shape) in [
        ("circle", BrushShape::Circle),
        ("square", BrushShape::Square),
        ("continuous", BrushShape::Continuous),
    ] {
        group.bench_function(name, |b| {
            let mut engine = engine_with_reference(512);
            engine.set_brush_size(24).expect("in range");
            engine.set_brush_shape(shape);
            b.iter(|| stroke(&mut engine, 50))
        });
    }

    group.finish();
}

fn benchmark_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("Effect Impact");

    for (name, kind) in [
        ("none", EffectKind::None),
        ("blur", EffectKind::Blur),
        ("sharpen", EffectKind::Sharpen),
        ("edge", EffectKind::Edge),
    ] {
        group.bench_function(name, |b| {
            let mut engine = engine_with_reference(512);
            engine.set_brush_size(24).expect("in range");
            engine.set_effect(kind);
            b.iter(|| stroke(&mut engine, 50))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_stroke, benchmark_brush_shapes, benchmark_effects);
criterion_main!(benches);
