//! Performance benchmarks for tempo profiling

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempo_profile::{
    analyze_timeline, analyze_timelines, smooth_tempo_curve, AnalysisConfig, TempoTimeline,
};

/// Synthetic rubato timeline: 200 change points wobbling around 94 BPM
fn synthetic_timeline(points: usize) -> TempoTimeline {
    let change_times: Vec<f32> = (0..points).map(|i| i as f32 * 1.5).collect();
    let tempos: Vec<f32> = (0..points)
        .map(|i| 94.0 + (i as f32 * 0.37).sin() * 8.0)
        .collect();
    TempoTimeline::new(change_times, tempos).expect("synthetic timeline is valid")
}

fn bench_analyze_timeline(c: &mut Criterion) {
    let timeline = synthetic_timeline(200);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_timeline_200", |b| {
        b.iter(|| {
            let _ = analyze_timeline(black_box(&timeline), black_box(&config));
        });
    });
}

fn bench_smooth_curve(c: &mut Criterion) {
    let timeline = synthetic_timeline(2_000);

    c.bench_function("smooth_tempo_curve_2000", |b| {
        b.iter(|| {
            let _ = smooth_tempo_curve(black_box(timeline.tempos()), black_box("Andante"));
        });
    });
}

fn bench_analyze_batch(c: &mut Criterion) {
    let timelines: Vec<TempoTimeline> = (0..64).map(|_| synthetic_timeline(200)).collect();
    let config = AnalysisConfig::default();

    c.bench_function("analyze_timelines_64x200", |b| {
        b.iter(|| {
            let _ = analyze_timelines(black_box(&timelines), black_box(&config));
        });
    });
}

criterion_group!(benches, bench_analyze_timeline, bench_smooth_curve, bench_analyze_batch);
criterion_main!(benches);
