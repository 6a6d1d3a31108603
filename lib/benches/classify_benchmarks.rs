use asciify::{Asciifier, GlyphRamp, LookupMode, ToneCurve};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};

fn gradient(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]))
}

fn bench_classify_pixel(c: &mut Criterion) {
    let scan = Asciifier::new(GlyphRamp::default(), ToneCurve::ContrastLow)
        .unwrap()
        .with_lookup(LookupMode::Scan);
    let table = scan.clone().with_lookup(LookupMode::Table);

    c.bench_function("classify_bright_scan", |b| {
        b.iter(|| black_box(scan.classify(black_box(250))))
    });

    c.bench_function("classify_bright_table", |b| {
        b.iter(|| black_box(table.classify(black_box(250))))
    });
}

fn bench_convert_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_grid");

    // 640x480 camera frames at 12.5%, 25% and 50%
    for (width, height) in [(80u32, 60u32), (160, 120), (320, 240)] {
        let grid = gradient(width, height);
        for mode in [LookupMode::Scan, LookupMode::Table] {
            let asciifier = Asciifier::new(GlyphRamp::default(), ToneCurve::Identity)
                .unwrap()
                .with_lookup(mode);
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), format!("{width}x{height}")),
                &grid,
                |b, grid| b.iter(|| black_box(asciifier.convert(grid))),
            );
        }
    }

    group.finish();
}

fn bench_build_table(c: &mut Criterion) {
    c.bench_function("build_default_table", |b| {
        b.iter(|| {
            black_box(Asciifier::new(GlyphRamp::default(), black_box(ToneCurve::ContrastHigh)).unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_classify_pixel,
    bench_convert_grid,
    bench_build_table
);
criterion_main!(benches);
