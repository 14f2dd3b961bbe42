use std::sync::Arc;

use am_dsp::{encode, shape, GeneratorId, ShapeConfig, SAMPLE_RATE};
use am_engine::{ChannelControl, Engine, MAX_CHANNELS};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn full_engine(output_channels: u16) -> Engine {
    let mut rng = StdRng::seed_from_u64(7);
    let mut engine = Engine::new(output_channels);
    for _ in 0..MAX_CHANNELS {
        let raw = am_dsp::generate(GeneratorId::WhiteNoise, SAMPLE_RATE, 1.0, &mut rng);
        let shaped = shape(raw, &ShapeConfig::smoothed(8), SAMPLE_RATE);
        let control = Arc::new(ChannelControl::new(0.5));
        control.start_loop();
        engine
            .add_voice(Arc::new(encode(&shaped, output_channels)), control)
            .unwrap();
    }
    engine
}

fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("Engine mix");

    for width in [1u16, 2] {
        let mut engine = full_engine(width);
        let mut frame = [0i16; 2];
        group.bench_function(format!("8 channels, {} out, 1024 frames", width), |b| {
            b.iter(|| {
                for _ in 0..1024 {
                    engine.next_frame(&mut frame[..width as usize]);
                    black_box(&frame);
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mix);
criterion_main!(benches);
