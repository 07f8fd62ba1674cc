//! Throughput benchmarks for epoch extraction and quality assessment

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eeg_processing::{EpochExtractor, PipelineConfig, QualityAssessor, QualityConfig};
use eeg_simulation::{apply_artifacts, montage, Artifact, EegConfig, EegSimulator};

fn simulated(duration: f64, channels: usize) -> eeg_core::MultiChannelSignal {
    let config = EegConfig {
        channel_names: montage(channels),
        seed: Some(11),
        ..EegConfig::default()
    };
    let signal = EegSimulator::new(config).unwrap().generate(duration).unwrap();
    apply_artifacts(
        signal,
        &[
            Artifact::Dropout { channel: 0, start: 300, len: 200 },
            Artifact::Flatline { channel: 1, start: 900, len: 400, level: 0.0 },
        ],
    )
    .unwrap()
}

/// Benchmark single-epoch assessment across epoch sizes
fn bench_assess(c: &mut Criterion) {
    let mut group = c.benchmark_group("assess_epoch");
    let assessor = QualityAssessor::new(QualityConfig::default()).unwrap();

    for &seconds in &[10.0, 60.0, 300.0] {
        for &channels in &[1usize, 8] {
            let config = PipelineConfig::default().with_epoch_length(seconds);
            let extractor = EpochExtractor::new(config.epoch).unwrap();
            let table = extractor.extract(&simulated(seconds, channels), None);
            let epoch = table.epochs()[0].clone();

            group.bench_with_input(
                BenchmarkId::new("metrics", format!("{}s_{}ch", seconds, channels)),
                &epoch,
                |b, epoch| b.iter(|| black_box(assessor.assess(black_box(epoch)).unwrap())),
            );
        }
    }

    group.finish();
}

/// Benchmark extraction over a long recording
fn bench_extract(c: &mut Criterion) {
    let signal = simulated(1800.0, 8);
    let extractor = EpochExtractor::new(PipelineConfig::screening(128.0).epoch).unwrap();

    c.bench_function("extract_30min_8ch", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&signal), None)))
    });
}

criterion_group!(benches, bench_assess, bench_extract);
criterion_main!(benches);
