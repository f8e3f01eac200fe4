//! Procedural spiral galaxy generation.
//!
//! Every particle gets a random distance from the center, is assigned to a
//! spiral arm by index, twisted in proportion to its distance, and jittered
//! on each axis by an offset that sharpens towards zero as
//! [`GalaxyParams::randomness_power`] grows. Its color fades from the inside
//! color to the outside color with distance.
//!
//! Distances are drawn linearly (`U(0,1) * radius`), not area-uniformly, so
//! particles bunch up near the core. That bias is the look of the galaxy and
//! is kept as-is.
//!
//! # Example
//!
//! ```
//! use galaxy::generator::{generate_with, RngSampler};
//! use galaxy::GalaxyParams;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let params = GalaxyParams { count: 1_000, ..Default::default() };
//! let mut sampler = RngSampler::new(StdRng::seed_from_u64(7));
//! let buffers = generate_with(&params, &mut sampler);
//! assert_eq!(buffers.positions.len(), 3 * 1_000);
//! ```

use std::f32::consts::TAU;
use std::time::Instant;

use glam::Vec3;
use rand::Rng;

use crate::params::GalaxyParams;

/// Source of uniform random values in `[0, 1)`.
///
/// [`generate_with`] pulls exactly seven values per particle, in this order:
/// radius, then magnitude and sign for X, Y and Z.
pub trait Sampler {
    fn uniform(&mut self) -> f32;
}

/// Adapts any `rand` RNG into a [`Sampler`].
#[derive(Debug, Clone)]
pub struct RngSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Sampler for RngSampler<R> {
    #[inline]
    fn uniform(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replays a fixed list of values, wrapping around at the end.
///
/// Handy for pinning generator output to known numbers.
#[derive(Debug, Clone)]
pub struct SequenceSampler {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSampler {
    /// # Panics
    ///
    /// Panics if `values` is empty.
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "SequenceSampler needs at least one value");
        Self { values, cursor: 0 }
    }

    /// A sampler that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl Sampler for SequenceSampler {
    fn uniform(&mut self) -> f32 {
        let value = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Interleaved per-particle positions `[x, y, z, ...]` and linear colors
/// `[r, g, b, ...]`, each `3 * count` floats long.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffers {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

impl ParticleBuffers {
    fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
        }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of particle `i`.
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// Color of particle `i`.
    pub fn color(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[i * 3..i * 3 + 3])
    }
}

/// Base angle of the arm particle `index` belongs to.
///
/// Arms are evenly spaced and assigned round-robin, so indices `i` and
/// `i + branches` always share an arm.
#[inline]
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// Largest magnitude a single axis offset can reach for `power`.
///
/// Offsets are `|u - 0.5|^power` with `|u - 0.5| <= 0.5`.
#[inline]
pub fn max_offset(power: f32) -> f32 {
    0.5f32.powf(power)
}

/// Signed jitter for one axis.
///
/// A draw of exactly `0.5` is zero jitter even at `power == 0`, where `0^0`
/// would otherwise read as 1.
#[inline]
pub fn axis_offset(magnitude_draw: f32, sign_draw: f32, power: f32) -> f32 {
    let distance = (magnitude_draw - 0.5).abs();
    let magnitude = if distance == 0.0 {
        0.0
    } else {
        distance.powf(power)
    };
    let sign = if sign_draw < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign
}

/// Generate a galaxy using the thread-local RNG.
///
/// Output is not reproducible between calls; use [`generate_with`] with a
/// seeded sampler for that.
pub fn generate(params: &GalaxyParams) -> ParticleBuffers {
    generate_with(params, &mut RngSampler::new(rand::thread_rng()))
}

/// Generate a galaxy, drawing all randomness from `sampler`.
pub fn generate_with<S: Sampler + ?Sized>(params: &GalaxyParams, sampler: &mut S) -> ParticleBuffers {
    let started = Instant::now();
    let mut buffers = ParticleBuffers::with_capacity(params.count as usize);

    for i in 0..params.count {
        let radius = sampler.uniform() * params.radius;
        let spin_angle = radius * params.spin;
        let angle = branch_angle(i, params.branches) + spin_angle;

        let offset_x = axis_offset(sampler.uniform(), sampler.uniform(), params.randomness_power);
        let offset_y = axis_offset(sampler.uniform(), sampler.uniform(), params.randomness_power);
        let offset_z = axis_offset(sampler.uniform(), sampler.uniform(), params.randomness_power);

        buffers.positions.extend_from_slice(&[
            angle.cos() * radius + offset_x,
            offset_y,
            angle.sin() * radius + offset_z,
        ]);

        let color = params
            .inside_color
            .lerp(params.outside_color, radius / params.radius);
        buffers.colors.extend_from_slice(&color.to_array());
    }

    log::debug!(
        "generated {} particles in {:.1} ms",
        params.count,
        started.elapsed().as_secs_f64() * 1000.0
    );
    buffers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_angle_spacing() {
        assert_eq!(branch_angle(0, 4), 0.0);
        assert!((branch_angle(1, 4) - TAU / 4.0).abs() < 1e-6);
        assert!((branch_angle(3, 4) - 3.0 * TAU / 4.0).abs() < 1e-6);
        assert_eq!(branch_angle(4, 4), 0.0);
        assert_eq!(branch_angle(17, 1), 0.0);
    }

    #[test]
    fn test_axis_offset_zero_at_center_draw() {
        for power in [0.0, 1.0, 2.5, 5.0] {
            assert_eq!(axis_offset(0.5, 0.1, power), 0.0);
        }
    }

    #[test]
    fn test_axis_offset_power_zero_is_unit() {
        assert_eq!(axis_offset(0.9, 0.2, 0.0), 1.0);
        assert_eq!(axis_offset(0.1, 0.7, 0.0), -1.0);
    }

    #[test]
    fn test_axis_offset_sign_and_magnitude() {
        // |0.0 - 0.5|^2 = 0.25
        assert!((axis_offset(0.0, 0.0, 2.0) - 0.25).abs() < 1e-6);
        assert!((axis_offset(0.0, 0.5, 2.0) + 0.25).abs() < 1e-6);
        // |0.75 - 0.5|^1 = 0.25
        assert!((axis_offset(0.75, 0.99, 1.0) + 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_higher_power_tightens_offsets() {
        let loose = axis_offset(0.1, 0.0, 1.0);
        let tight = axis_offset(0.1, 0.0, 4.0);
        assert!(tight < loose);
        assert!(tight > 0.0);
    }

    #[test]
    fn test_max_offset() {
        assert_eq!(max_offset(0.0), 1.0);
        assert_eq!(max_offset(1.0), 0.5);
        assert_eq!(max_offset(2.0), 0.25);
    }

    #[test]
    fn test_sequence_sampler_wraps() {
        let mut s = SequenceSampler::new(vec![0.1, 0.2]);
        assert_eq!(s.uniform(), 0.1);
        assert_eq!(s.uniform(), 0.2);
        assert_eq!(s.uniform(), 0.1);
    }

    #[test]
    fn test_draws_seven_values_per_particle() {
        // radius, then (magnitude, sign) for x, y, z
        let mut sampler = SequenceSampler::new(vec![0.5, 1.0, 0.0, 0.5, 0.0, 0.5, 0.0, 0.9]);
        let params = GalaxyParams {
            count: 1,
            branches: 1,
            spin: 0.0,
            radius: 10.0,
            randomness_power: 1.0,
            ..Default::default()
        };
        let buffers = generate_with(&params, &mut sampler);
        let p = buffers.position(0);
        assert!((p.x - 5.5).abs() < 1e-5);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
        // The eighth value is the next particle's radius draw
        assert_eq!(sampler.uniform(), 0.9);
    }
}
