use std::time::Duration;

use colorbuddy::{
    wu, Color, ColorCounts, KmeansOptions, PalettePipeline, PaletteSize, PixelImage, QuantizeMethod,
};
use criterion::{
    criterion_group, criterion_main, measurement::WallTime, Bencher, BenchmarkId, Criterion,
    SamplingMode,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// Synthetic test images: a smooth gradient and uniform noise.
fn images() -> Vec<(String, PixelImage)> {
    let (width, height) = (512u32, 512u32);

    #[allow(clippy::cast_possible_truncation)]
    let gradient = (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            Color::new((x / 2) as u8, (y / 2) as u8, ((x + y) / 4) as u8)
        })
        .collect();

    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
    let noise = (0..width * height)
        .map(|_| Color::from_components(rng.gen()))
        .collect();

    vec![
        ("gradient".into(), PixelImage::new(width, height, gradient).unwrap()),
        ("noise".into(), PixelImage::new(width, height, noise).unwrap()),
    ]
}

fn bench<T>(
    c: &mut Criterion,
    group: &str,
    inputs: &[(String, T)],
    mut f: impl FnMut(&mut Bencher<WallTime>, &(PaletteSize, &T)),
) {
    let mut group = c.benchmark_group(group);
    group
        .sample_size(30)
        .noise_threshold(0.05)
        .sampling_mode(SamplingMode::Flat)
        .warm_up_time(Duration::from_millis(500));

    for k in [PaletteSize::DEFAULT, PaletteSize::MAX] {
        group.measurement_time(Duration::from_secs(3));
        for (name, input) in inputs {
            group.bench_with_input(BenchmarkId::new(k.to_string(), name), &(k, input), &mut f);
        }
    }
}

fn color_counts(c: &mut Criterion) {
    let images = images();
    let mut group = c.benchmark_group("color_counts");
    for (name, image) in &images {
        group.bench_with_input(BenchmarkId::new("single", name), image, |b, image| {
            b.iter(|| ColorCounts::new(image));
        });
        group.bench_with_input(BenchmarkId::new("par", name), image, |b, image| {
            b.iter(|| ColorCounts::new_par(image));
        });
    }
}

fn wu_palette(c: &mut Criterion) {
    let counts = images()
        .iter()
        .map(|(name, image)| (name.clone(), ColorCounts::new_par(image)))
        .collect::<Vec<_>>();

    bench(c, "wu_palette", &counts, |b, &(k, counts)| b.iter(|| wu::palette(counts, k)));
}

fn pipeline_wu(c: &mut Criterion) {
    let images = images();
    bench(c, "pipeline_wu", &images, |b, &(k, image)| {
        b.iter(|| PalettePipeline::new(image).palette_size(k).palette_par());
    });
}

fn pipeline_kmeans(c: &mut Criterion) {
    let images = images();
    bench(c, "pipeline_kmeans", &images, |b, &(k, image)| {
        b.iter(|| {
            PalettePipeline::new(image)
                .palette_size(k)
                .quantize_method(QuantizeMethod::Kmeans(KmeansOptions::new()))
                .palette_par()
        });
    });
}

criterion_group!(benches, color_counts, wu_palette, pipeline_wu, pipeline_kmeans);
criterion_main!(benches);
