use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use lens_shading_rs::lens_shading::{AnalysisConfig, LensShadingPipeline};
use lens_shading_rs::lens_shading::raw::unpack::{PIXEL_DATA_OFFSET, scanline_stride};
use lens_shading_rs::lens_shading::raw::BitDepth;

/// Builds a BRCM capture with a radial falloff in every channel.
fn generate_mock_capture(width: u16, height: u16, bit_depth: BitDepth) -> Vec<u8> {
    let stride = scanline_stride(width, 0, bit_depth);
    let mut data = vec![0u8; PIXEL_DATA_OFFSET + stride * usize::from(height)];

    data[..4].copy_from_slice(b"BRCM");
    data[16..22].copy_from_slice(b"imx219");
    let header = &mut data[0xB0..0xB0 + 70];
    header[32..34].copy_from_slice(&width.to_le_bytes());
    header[34..36].copy_from_slice(&height.to_le_bytes());
    header[66..68].copy_from_slice(&33u16.to_le_bytes());
    header[69] = bit_depth.tag();

    let (cx, cy) = (f32::from(width) / 2.0, f32::from(height) / 2.0);
    let radius = (cx * cx + cy * cy).sqrt();
    for y in 0..usize::from(height) {
        let row = PIXEL_DATA_OFFSET + y * stride;
        for x in (0..usize::from(width)).step_by(4) {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let falloff = 1.0 - 0.6 * (dx * dx + dy * dy).sqrt() / radius;
            let msb = (200.0 * falloff) as u8;
            let at = row + (x / 4) * bit_depth.cluster_bytes();
            for byte in &mut data[at..at + 4] {
                *byte = msb;
            }
        }
    }
    data
}

fn benchmark_capture_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis_by_size");

    let sizes = vec![
        (640, 480, "640x480"),
        (1640, 1232, "1640x1232"),
        (3280, 2464, "3280x2464"),
    ];

    for (width, height, label) in sizes {
        let capture = generate_mock_capture(width, height, BitDepth::Raw10);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &capture,
            |b, data| {
                let pipeline = LensShadingPipeline::new(AnalysisConfig::default());

                b.iter(|| {
                    let _ = pipeline.analyse(black_box(data));
                });
            },
        );
    }

    group.finish();
}

fn benchmark_bit_depths(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_depth");

    for (bit_depth, label) in [(BitDepth::Raw10, "raw10"), (BitDepth::Raw12, "raw12")] {
        let capture = generate_mock_capture(1640, 1232, bit_depth);
        group.bench_with_input(BenchmarkId::from_parameter(label), &capture, |b, data| {
            let pipeline = LensShadingPipeline::new(AnalysisConfig::default());
            b.iter(|| {
                let _ = pipeline.analyse(black_box(data));
            });
        });
    }

    group.finish();
}

fn benchmark_cell_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_size");
    let capture = generate_mock_capture(1640, 1232, BitDepth::Raw10);

    for size in [2u8, 4, 16, 32] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &capture, |b, data| {
            let config = AnalysisConfig::builder()
                .cell_size(size)
                .build()
                .expect("valid cell size");
            let pipeline = LensShadingPipeline::new(config);
            b.iter(|| {
                let _ = pipeline.analyse(black_box(data));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_capture_sizes,
    benchmark_bit_depths,
    benchmark_cell_sizes
);
criterion_main!(benches);
