use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use pw_core::config::SynthConfig;
use pw_core::grid::BrightnessGrid;
use pw_synth::synthesizer::Synthesizer;

fn bench_synthesize(c: &mut Criterion) {
    // Dense 64×64 grid: every column contributes to every sample.
    let config = SynthConfig {
        resolution: 64,
        ..SynthConfig::default()
    };
    let synth = match Synthesizer::new(config) {
        Ok(s) => s,
        Err(e) => panic!("config de bench invalide : {e}"),
    };
    let grid = BrightnessGrid::from_fn(64, |r, c| ((r * 31 + c * 17) % 256) as f32 / 255.0);
    let energy = grid.row_energy();

    c.bench_function("synthesize_dense_64", |b| {
        b.iter(|| synth.synthesize(black_box(&grid), black_box(&energy)));
    });

    // Sparse 256×256 grid: one bright column, the typical test pattern.
    let synth = match Synthesizer::new(SynthConfig::default()) {
        Ok(s) => s,
        Err(e) => panic!("config de bench invalide : {e}"),
    };
    let grid = BrightnessGrid::from_fn(256, |_, c| if c == 64 { 1.0 } else { 0.0 });
    let energy = grid.row_energy();

    c.bench_function("synthesize_line_256", |b| {
        b.iter(|| synth.synthesize(black_box(&grid), black_box(&energy)));
    });
}

criterion_group!(benches, bench_synthesize);
criterion_main!(benches);
