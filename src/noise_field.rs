//! Seeded simplex noise field with fractal sampling.

use noise::{NoiseFn, Simplex};

/// 2D simplex noise keyed by a 32-bit seed.
#[derive(Clone)]
pub struct NoiseField {
    seed: u32,
    simplex: Simplex,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Single-octave sample in `[-1, 1]`.
    pub fn noise_2d(&self, x: f64, y: f64) -> f64 {
        self.simplex.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Fractional Brownian motion, normalized by total amplitude so the result
    /// stays in `[-1, 1]`.
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves.max(1) {
            total += amplitude * self.noise_2d(x * frequency, y * frequency);
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_value
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}
