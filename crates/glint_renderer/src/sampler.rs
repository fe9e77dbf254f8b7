//! Stateless hash-based sampling.
//!
//! Every random draw is a pure function of an integer seed, so a frame is a
//! deterministic function of (pixel, step, sample index) no matter how the
//! pixels are scheduled across threads. Logically distinct draws multiply
//! the base seed by their own stream constant to stay decorrelated.

use glint_math::Vec3;
use std::f32::consts::TAU;

/// Number of distinct values `random` can return.
pub const RANDOM_RESOLUTION: u32 = 10_000;

/// Seed multipliers, one per logically distinct random quantity.
pub mod stream {
    pub const JITTER_X: u32 = 73_856_093;
    pub const JITTER_Y: u32 = 19_349_663;
    pub const LENS_ANGLE: u32 = 83_492_791;
    pub const BALL_AZIMUTH: u32 = 2_654_435_761;
    pub const BALL_POLAR: u32 = 805_459_861;
    pub const BALL_RADIUS: u32 = 3_674_653_429;
    pub const FRESNEL: u32 = 1_500_450_271;
}

// Mixing constants for seed derivation
const STEP_MIX: u32 = 0x9E37_79B9;
const SAMPLE_MIX: u32 = 0x85EB_CA6B;
const BOUNCE_MIX: u32 = 0xC2B2_AE35;

/// Integer avalanche hash (Thomas Wang).
#[inline]
pub fn wang_hash(mut seed: u32) -> u32 {
    seed = (seed ^ 61) ^ (seed >> 16);
    seed = seed.wrapping_mul(9);
    seed ^= seed >> 4;
    seed = seed.wrapping_mul(0x27d4_eb2d);
    seed ^= seed >> 15;
    seed
}

/// Uniform sample in [0, 1), quantized to `1 / RANDOM_RESOLUTION`.
#[inline]
pub fn random(seed: u32) -> f32 {
    (wang_hash(seed) % RANDOM_RESOLUTION) as f32 / RANDOM_RESOLUTION as f32
}

/// A base seed from which the independent draws of one sample are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sampler {
    seed: u32,
}

impl Sampler {
    /// Wrap a raw seed. The seed is forced odd so that stream multipliers
    /// never collapse it to zero.
    pub fn new(seed: u32) -> Self {
        Self { seed: seed | 1 }
    }

    /// Seed for one camera sample of one pixel in one frame.
    pub fn for_pixel(x: u32, y: u32, width: u32, sample: u32, step: u32) -> Self {
        let pixel = y.wrapping_mul(width).wrapping_add(x);
        let mut h = wang_hash(pixel);
        h = wang_hash(h ^ step.wrapping_mul(STEP_MIX));
        h = wang_hash(h ^ sample.wrapping_mul(SAMPLE_MIX));
        Self::new(h)
    }

    /// Derived seed for the scattering event at `depth` along this path.
    pub fn for_bounce(&self, depth: u32) -> Self {
        Self::new(wang_hash(self.seed ^ depth.wrapping_add(1).wrapping_mul(BOUNCE_MIX)))
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Draw from the given stream.
    #[inline]
    pub fn draw(&self, stream: u32) -> f32 {
        random(self.seed.wrapping_mul(stream))
    }

    /// Point inside the unit ball from independent azimuth, polar angle
    /// and radius draws.
    pub fn unit_ball(&self) -> Vec3 {
        let phi = self.draw(stream::BALL_AZIMUTH) * TAU;
        let theta = (2.0 * self.draw(stream::BALL_POLAR) - 1.0).acos();
        let r = self.draw(stream::BALL_RADIUS).cbrt();

        let (sin_theta, cos_theta) = theta.sin_cos();
        let (sin_phi, cos_phi) = phi.sin_cos();
        Vec3::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta) * r
    }
}
