//! Transform and derivation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lib_dsp::fft;
use lib_dsp::time::{SampledSignal, UnevenSamples};
use lib_dsp::Signal;
use lib_types::InterpolationKind;

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    for len in [512usize, 1000, 4096, 16384].iter() {
        let signal: Vec<f64> = (0..*len).map(|i| (i as f64 * 0.01).sin()).collect();
        let spectrum = fft::forward(&signal);

        group.bench_with_input(BenchmarkId::new("forward", len), &signal, |b, s| {
            b.iter(|| fft::forward(black_box(s)));
        });

        group.bench_with_input(BenchmarkId::new("inverse", len), &spectrum, |b, s| {
            b.iter(|| fft::inverse(*len, black_box(s)));
        });
    }

    group.finish();
}

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");

    let len = 4096;
    let t: Vec<f64> = (0..len).map(|i| i as f64 * 0.1 + 0.03 * (i as f64).sin()).collect();
    let y: Vec<f64> = t.iter().map(|v| (v * 0.7).cos()).collect();

    for kind in [
        InterpolationKind::Linear,
        InterpolationKind::cubic(),
        InterpolationKind::akima(),
    ] {
        let uneven = UnevenSamples::new(t.clone(), y.clone()).with_interpolation(kind);
        group.bench_with_input(BenchmarkId::new("to_even", format!("{:?}", kind)), &uneven, |b, u| {
            b.iter(|| black_box(u).to_even(Some(0.05)).len());
        });
    }

    let even: Vec<f64> = (0..len).map(|i| (i as f64 * 0.02).sin()).collect();
    group.bench_function("envelope", |b| {
        b.iter(|| {
            let signal = Signal::from_samples(black_box(even.clone()), 0.5, 0.0);
            signal.envelope().len()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_transform, bench_derivation);
criterion_main!(benches);
