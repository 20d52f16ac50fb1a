use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use signal_lab::filters::{CicFilter, WindowType};
use signal_lab::sample::{add_cos, SampleBuffer};
use signal_lab::spectrum::{compute_dft, compute_fft};

fn tone(n: usize, rate: u32) -> SampleBuffer {
    let mut buf = SampleBuffer::allocate(n, rate).unwrap();
    add_cos(&mut buf, rate as f64 / 8.0, 1.0, 0.0);
    buf
}

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");
    for &bins in &[256usize, 1024, 4096] {
        let input = tone(bins, 48_000);
        group.bench_with_input(BenchmarkId::from_parameter(bins), &bins, |b, &bins| {
            b.iter(|| compute_fft(black_box(&input), bins, WindowType::BlackmanHarris).unwrap())
        });
    }
    group.finish();
}

fn bench_dft(c: &mut Criterion) {
    let mut group = c.benchmark_group("dft");
    let input = tone(8192, 8192);
    for &bins in &[20usize, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(bins), &bins, |b, &bins| {
            b.iter(|| {
                compute_dft(black_box(&input), bins, 990.0, 1010.0, WindowType::Hann).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_cic(c: &mut Criterion) {
    let input = tone(65_536, 1_024_000);
    c.bench_function("cic_decimate_n3_r16", |b| {
        let mut cic = CicFilter::new(3, 1, 16).unwrap();
        b.iter(|| {
            cic.reset();
            cic.decimate(black_box(&input)).unwrap()
        })
    });
}

criterion_group!(benches, bench_fft, bench_dft, bench_cic);
criterion_main!(benches);
