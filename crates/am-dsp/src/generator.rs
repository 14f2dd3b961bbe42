//! Noise generators.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::signal::{sample_count, RawSignal};

/// Procedural waveform algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorId {
    /// Independent standard-normal samples.
    WhiteNoise,
    /// White noise through a 3-pole -3 dB/octave filter.
    PinkNoise,
    /// Leaky integration of white noise (-6 dB/octave).
    BrownNoise,
}

impl GeneratorId {
    pub fn label(self) -> &'static str {
        match self {
            GeneratorId::WhiteNoise => "white",
            GeneratorId::PinkNoise => "pink",
            GeneratorId::BrownNoise => "brown",
        }
    }
}

/// Anything that can fill a raw buffer.
pub trait Generator {
    fn generate(&mut self, duration_secs: f32) -> RawSignal;
}

/// Generate `duration_secs` of `id` noise at `sample_rate`.
pub fn generate<R: Rng + ?Sized>(
    id: GeneratorId,
    sample_rate: u32,
    duration_secs: f32,
    rng: &mut R,
) -> RawSignal {
    let len = sample_count(sample_rate, duration_secs);
    let samples = match id {
        GeneratorId::WhiteNoise => white(len, rng),
        GeneratorId::PinkNoise => pink(len, rng),
        GeneratorId::BrownNoise => brown(len, rng),
    };
    RawSignal::new(samples)
}

fn white<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f32> {
    (0..len).map(|_| rng.sample::<f32, _>(StandardNormal)).collect()
}

// Paul Kellet's economy pink filter.
fn pink<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f32> {
    let (mut b0, mut b1, mut b2) = (0.0f32, 0.0f32, 0.0f32);
    (0..len)
        .map(|_| {
            let w: f32 = rng.sample(StandardNormal);
            b0 = 0.99765 * b0 + w * 0.099_046;
            b1 = 0.96300 * b1 + w * 0.296_516_4;
            b2 = 0.57000 * b2 + w * 1.052_691_3;
            b0 + b1 + b2 + w * 0.1848
        })
        .collect()
}

fn brown<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<f32> {
    let mut y = 0.0f32;
    (0..len)
        .map(|_| {
            let w: f32 = rng.sample(StandardNormal);
            y = 0.998 * y + 0.02 * w;
            y
        })
        .collect()
}

/// A [`GeneratorId`] bound to its own randomness source.
pub struct NoiseGenerator<R> {
    pub id: GeneratorId,
    pub sample_rate: u32,
    rng: R,
}

impl<R: Rng> NoiseGenerator<R> {
    pub fn new(id: GeneratorId, sample_rate: u32, rng: R) -> Self {
        Self {
            id,
            sample_rate,
            rng,
        }
    }
}

impl<R: Rng> Generator for NoiseGenerator<R> {
    fn generate(&mut self, duration_secs: f32) -> RawSignal {
        generate(self.id, self.sample_rate, duration_secs, &mut self.rng)
    }
}

/// Adapts a zero-argument buffer producer.
///
/// The producer decides the buffer length on its own, so `duration_secs` is
/// ignored.
pub struct FnGenerator<F>(pub F);

impl<F> Generator for FnGenerator<F>
where
    F: FnMut() -> Vec<f32>,
{
    fn generate(&mut self, _duration_secs: f32) -> RawSignal {
        RawSignal::new((self.0)())
    }
}
