//! Galaxy parameter set and the ranges the tweak panel exposes.

use crate::color::Rgb;
use crate::error::ParamError;

/// Default inner (core) color, sRGB.
pub const DEFAULT_INSIDE_HEX: &str = "#eb8cf2";
/// Default outer (rim) color, sRGB.
pub const DEFAULT_OUTSIDE_HEX: &str = "#0946e3";

/// Slider bounds for one numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Slider ranges, `(min, max, step)` per field.
pub mod ranges {
    use super::ParamRange;

    pub const COUNT: ParamRange = ParamRange::new(10.0, 200_000.0, 100.0);
    pub const SIZE: ParamRange = ParamRange::new(0.001, 0.1, 0.001);
    pub const RADIUS: ParamRange = ParamRange::new(2.0, 20.0, 1.0);
    pub const SPIN: ParamRange = ParamRange::new(-5.0, 5.0, 1.0);
    pub const BRANCHES: ParamRange = ParamRange::new(1.0, 20.0, 1.0);
    pub const RANDOMNESS_POWER: ParamRange = ParamRange::new(0.0, 5.0, 1.0);
}

/// One immutable snapshot of everything that shapes a galaxy.
///
/// The tweak panel edits its own working copy and hands a fresh snapshot to
/// the scene driver when an edit finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParams {
    /// Number of particles.
    pub count: u32,
    /// Point size in world units (attenuated with distance).
    pub size: f32,
    /// Outer radius of the disc.
    pub radius: f32,
    /// Twist applied per unit of radius, in radians.
    pub spin: f32,
    /// Number of spiral arms.
    pub branches: u32,
    /// Exponent that pulls the per-axis jitter towards zero.
    pub randomness_power: f32,
    /// Color at the center.
    pub inside_color: Rgb,
    /// Color at the rim.
    pub outside_color: Rgb,
}

impl GalaxyParams {
    /// Check the invariants the generator relies on.
    ///
    /// A count of zero is valid and yields an empty galaxy.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.branches == 0 {
            return Err(ParamError::ZeroBranches);
        }
        positive("size", self.size)?;
        positive("radius", self.radius)?;
        if !self.spin.is_finite() {
            return Err(ParamError::NotFinite {
                name: "spin",
                value: self.spin,
            });
        }
        if !self.randomness_power.is_finite() {
            return Err(ParamError::NotFinite {
                name: "randomness power",
                value: self.randomness_power,
            });
        }
        if self.randomness_power < 0.0 {
            return Err(ParamError::NegativePower(self.randomness_power));
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NotPositive { name, value })
    }
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 10.0,
            spin: 1.5,
            branches: 5,
            randomness_power: 2.0,
            inside_color: Rgb::from_hex(DEFAULT_INSIDE_HEX).unwrap_or(Rgb::WHITE),
            outside_color: Rgb::from_hex(DEFAULT_OUTSIDE_HEX).unwrap_or(Rgb::WHITE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = GalaxyParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.count, 100_000);
        assert_eq!(params.branches, 5);
        assert_eq!(params.inside_color.to_hex(), DEFAULT_INSIDE_HEX);
        assert_eq!(params.outside_color.to_hex(), DEFAULT_OUTSIDE_HEX);
    }

    #[test]
    fn test_defaults_sit_inside_slider_ranges() {
        let p = GalaxyParams::default();
        assert!(ranges::COUNT.contains(p.count as f64));
        assert!(ranges::SIZE.contains(p.size as f64));
        assert!(ranges::RADIUS.contains(p.radius as f64));
        assert!(ranges::SPIN.contains(p.spin as f64));
        assert!(ranges::BRANCHES.contains(p.branches as f64));
        assert!(ranges::RANDOMNESS_POWER.contains(p.randomness_power as f64));
    }

    #[test]
    fn test_empty_galaxy_is_valid() {
        let p = GalaxyParams {
            count: 0,
            ..Default::default()
        };
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = GalaxyParams::default();

        let p = GalaxyParams { branches: 0, ..base };
        assert_eq!(p.validate(), Err(ParamError::ZeroBranches));

        let p = GalaxyParams { radius: 0.0, ..base };
        assert!(matches!(p.validate(), Err(ParamError::NotPositive { name: "radius", .. })));

        let p = GalaxyParams { size: f32::NAN, ..base };
        assert!(matches!(p.validate(), Err(ParamError::NotPositive { name: "size", .. })));

        let p = GalaxyParams { randomness_power: -1.0, ..base };
        assert_eq!(p.validate(), Err(ParamError::NegativePower(-1.0)));

        let p = GalaxyParams { spin: f32::INFINITY, ..base };
        assert!(matches!(p.validate(), Err(ParamError::NotFinite { name: "spin", .. })));
    }
}
