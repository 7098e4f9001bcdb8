//! Star field generation: a spherical shell of stars around the planet.
//!
//! Positions are uniform over the sphere surface (inverse-CDF polar angle), colors
//! come from a synthetic temperature mapped through seven bands, and sizes from a
//! weighted tier draw where most stars are tiny and a few are bright.

use glam::Vec3;
use rand::prelude::*;

/// Inner radius of the star shell (inclusive).
pub const SHELL_MIN_RADIUS: f32 = 100.0;
/// Outer radius of the star shell (exclusive).
pub const SHELL_MAX_RADIUS: f32 = 1600.0;

/// Lowest synthetic temperature (inclusive).
pub const MIN_TEMPERATURE: f32 = 2000.0;
/// Highest synthetic temperature (exclusive).
pub const MAX_TEMPERATURE: f32 = 10000.0;

/// Largest field [`StarField::generate_requested`] will build.
pub const MAX_STARS: usize = 1_000_000;

/// Half-open sampling range `[lo, hi)`; `lo == hi` means a fixed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub lo: f32,
    pub hi: f32,
}

impl ChannelRange {
    const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.lo + (self.hi - self.lo) * rng.gen::<f32>()
    }

    /// Whether `v` could have been produced by [`Self::sample`].
    pub fn contains(&self, v: f32) -> bool {
        if self.lo == self.hi {
            v == self.lo
        } else {
            v >= self.lo && v <= self.hi
        }
    }
}

/// One temperature band: every star at or above `min_temperature` (and below the
/// previous band) samples its RGB channels from these ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureBand {
    pub name: &'static str,
    pub min_temperature: f32,
    pub r: ChannelRange,
    pub g: ChannelRange,
    pub b: ChannelRange,
}

/// Bands ordered hottest first. The last band catches everything below 2500.
pub const TEMPERATURE_BANDS: [TemperatureBand; 7] = [
    TemperatureBand {
        name: "blue",
        min_temperature: 8000.0,
        r: ChannelRange::new(0.6, 0.8),
        g: ChannelRange::new(0.7, 0.9),
        b: ChannelRange::new(1.0, 1.0),
    },
    TemperatureBand {
        name: "blue-white",
        min_temperature: 6000.0,
        r: ChannelRange::new(0.85, 0.95),
        g: ChannelRange::new(0.9, 1.0),
        b: ChannelRange::new(1.0, 1.0),
    },
    TemperatureBand {
        name: "white",
        min_temperature: 5000.0,
        r: ChannelRange::new(1.0, 1.0),
        g: ChannelRange::new(0.95, 1.0),
        b: ChannelRange::new(0.85, 0.95),
    },
    TemperatureBand {
        name: "yellow",
        min_temperature: 4000.0,
        r: ChannelRange::new(1.0, 1.0),
        g: ChannelRange::new(0.85, 0.95),
        b: ChannelRange::new(0.6, 0.75),
    },
    TemperatureBand {
        name: "orange",
        min_temperature: 3000.0,
        r: ChannelRange::new(1.0, 1.0),
        g: ChannelRange::new(0.6, 0.75),
        b: ChannelRange::new(0.3, 0.45),
    },
    TemperatureBand {
        name: "red-orange",
        min_temperature: 2500.0,
        r: ChannelRange::new(1.0, 1.0),
        g: ChannelRange::new(0.4, 0.55),
        b: ChannelRange::new(0.2, 0.3),
    },
    TemperatureBand {
        name: "red",
        min_temperature: f32::NEG_INFINITY,
        r: ChannelRange::new(0.9, 1.0),
        g: ChannelRange::new(0.25, 0.4),
        b: ChannelRange::new(0.15, 0.25),
    },
];

/// The band a temperature falls into.
pub fn band_for_temperature(temperature: f32) -> &'static TemperatureBand {
    TEMPERATURE_BANDS
        .iter()
        .find(|band| temperature >= band.min_temperature)
        .unwrap_or(&TEMPERATURE_BANDS[TEMPERATURE_BANDS.len() - 1])
}

/// Sample an RGB color for a star of the given temperature.
pub fn color_for_temperature<R: Rng + ?Sized>(temperature: f32, rng: &mut R) -> Vec3 {
    let band = band_for_temperature(temperature);
    Vec3::new(band.r.sample(rng), band.g.sample(rng), band.b.sample(rng))
}

/// Apparent size tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Tiny,
    Small,
    Medium,
    Bright,
}

impl SizeTier {
    pub const TINY_SIZE: f32 = 1.0;
    pub const SMALL_SIZE: f32 = 1.5;
    pub const MEDIUM_SIZE: f32 = 2.2;
    pub const BRIGHT_BASE: f32 = 3.0;
    pub const BRIGHT_JITTER: f32 = 2.0;

    /// Tier for one uniform draw in [0, 1): 70% / 20% / 8% / 2%.
    pub fn from_draw(u: f32) -> Self {
        match u {
            u if u < 0.70 => SizeTier::Tiny,
            u if u < 0.90 => SizeTier::Small,
            u if u < 0.98 => SizeTier::Medium,
            _ => SizeTier::Bright,
        }
    }

    pub fn sample_size<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        match self {
            SizeTier::Tiny => Self::TINY_SIZE,
            SizeTier::Small => Self::SMALL_SIZE,
            SizeTier::Medium => Self::MEDIUM_SIZE,
            SizeTier::Bright => Self::BRIGHT_BASE + rng.gen::<f32>() * Self::BRIGHT_JITTER,
        }
    }

    /// Whether `size` is a value this generator can produce.
    pub fn is_valid_size(size: f32) -> bool {
        size == Self::TINY_SIZE
            || size == Self::SMALL_SIZE
            || size == Self::MEDIUM_SIZE
            || (Self::BRIGHT_BASE..=Self::BRIGHT_BASE + Self::BRIGHT_JITTER).contains(&size)
    }
}

/// A single generated star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarRecord {
    pub position: Vec3,
    pub color: Vec3,
    pub size: f32,
}

impl StarRecord {
    /// Sample one star.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let radius = SHELL_MIN_RADIUS + rng.gen::<f32>() * (SHELL_MAX_RADIUS - SHELL_MIN_RADIUS);
        let position = unit_sphere_point(rng) * radius;

        let temperature = MIN_TEMPERATURE + rng.gen::<f32>() * (MAX_TEMPERATURE - MIN_TEMPERATURE);
        let color = color_for_temperature(temperature, rng);

        let size = SizeTier::from_draw(rng.gen::<f32>()).sample_size(rng);

        Self {
            position,
            color,
            size,
        }
    }
}

/// Uniform point on the unit sphere. Sampling the polar angle through its inverse CDF
/// keeps density constant per unit area instead of piling up at the poles.
pub fn unit_sphere_point<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = (1.0 - 2.0 * rng.gen::<f32>()).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Generated star attributes as parallel arrays of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarField {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub sizes: Vec<f32>,
}

impl StarField {
    /// Generate `count` stars with a thread-local RNG. Not reproducible across calls.
    pub fn generate(count: usize) -> Self {
        Self::generate_with_rng(count, &mut thread_rng())
    }

    /// Generate `count` stars from the given RNG (seed it for reproducible fields).
    pub fn generate_with_rng<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut field = Self {
            positions: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
            sizes: Vec::with_capacity(count),
        };
        for _ in 0..count {
            let star = StarRecord::sample(rng);
            field.positions.push(star.position);
            field.colors.push(star.color);
            field.sizes.push(star.size);
        }
        field
    }

    /// Generate from an untrusted count. This is the entry point for counts that come
    /// from outside the crate (saved state, config, hosts).
    ///
    /// Negative, NaN, infinite and over-[`MAX_STARS`] requests yield an empty field;
    /// fractional requests are truncated.
    pub fn generate_requested(requested: f64) -> Self {
        match sanitize_count(requested) {
            Some(count) => Self::generate(count),
            None => {
                log::warn!("Rejected star field request for {} stars", requested);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Star at index `i`, if in range.
    pub fn get(&self, i: usize) -> Option<StarRecord> {
        Some(StarRecord {
            position: *self.positions.get(i)?,
            color: *self.colors.get(i)?,
            size: *self.sizes.get(i)?,
        })
    }
}

/// Convert a requested count into a usable one, or `None` if it cannot be honoured.
pub fn sanitize_count(requested: f64) -> Option<usize> {
    if !requested.is_finite() || requested < 0.0 || requested.floor() > MAX_STARS as f64 {
        return None;
    }
    Some(requested.floor() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn generate_returns_requested_count() {
        for n in [0usize, 1, 7, 1000, 2500] {
            let field = StarField::generate(n);
            assert_eq!(field.positions.len(), n);
            assert_eq!(field.colors.len(), n);
            assert_eq!(field.sizes.len(), n);
        }
    }

    #[test]
    fn colors_in_unit_range_and_sizes_from_tiers() {
        let field = StarField::generate_with_rng(20_000, &mut seeded(7));
        for (c, &s) in field.colors.iter().zip(field.sizes.iter()) {
            for ch in c.to_array() {
                assert!((0.0..=1.0).contains(&ch), "channel {ch} out of range");
            }
            assert!(SizeTier::is_valid_size(s), "unexpected size {s}");
        }
    }

    #[test]
    fn positions_lie_in_shell() {
        let field = StarField::generate_with_rng(50_000, &mut seeded(11));
        for p in &field.positions {
            let r = p.length();
            assert!(r >= SHELL_MIN_RADIUS - 1e-2, "radius {r} below shell");
            assert!(r < SHELL_MAX_RADIUS + 1e-2, "radius {r} above shell");
        }
    }

    /// Any axis projection of a uniform sphere is uniform on [-1, 1].
    #[test]
    fn angular_distribution_is_uniform_over_sphere() {
        let n = 100_000;
        let field = StarField::generate_with_rng(n, &mut seeded(42));
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let mut bins = [0usize; 10];
            for p in &field.positions {
                let t = p.normalize().dot(axis);
                let bin = (((t + 1.0) / 2.0) * 10.0).floor().clamp(0.0, 9.0) as usize;
                bins[bin] += 1;
            }
            for (i, &count) in bins.iter().enumerate() {
                let frac = count as f64 / n as f64;
                assert!(
                    (frac - 0.1).abs() < 0.01,
                    "axis {axis:?} bin {i} holds {frac:.4} of stars"
                );
            }
        }
    }

    #[test]
    fn size_tier_frequencies() {
        let mut rng = seeded(3);
        let n = 100_000;
        let mut counts = [0usize; 4];
        for _ in 0..n {
            let idx = match SizeTier::from_draw(rng.gen::<f32>()) {
                SizeTier::Tiny => 0,
                SizeTier::Small => 1,
                SizeTier::Medium => 2,
                SizeTier::Bright => 3,
            };
            counts[idx] += 1;
        }
        let expected = [0.70, 0.20, 0.08, 0.02];
        for (count, want) in counts.iter().zip(expected) {
            let frac = *count as f64 / n as f64;
            assert!((frac - want).abs() < 0.01, "tier fraction {frac} vs {want}");
        }
    }

    #[test]
    fn size_tier_cutoffs() {
        assert_eq!(SizeTier::from_draw(0.0), SizeTier::Tiny);
        assert_eq!(SizeTier::from_draw(0.6999), SizeTier::Tiny);
        assert_eq!(SizeTier::from_draw(0.70), SizeTier::Small);
        assert_eq!(SizeTier::from_draw(0.90), SizeTier::Medium);
        assert_eq!(SizeTier::from_draw(0.98), SizeTier::Bright);
        assert_eq!(SizeTier::from_draw(0.9999), SizeTier::Bright);
    }

    #[test]
    fn band_lookup_follows_boundaries() {
        let names: Vec<_> = [9000.0, 8000.0, 7999.0, 6000.0, 5500.0, 4500.0, 3500.0, 2700.0, 2499.0, 2000.0]
            .iter()
            .map(|&t| band_for_temperature(t).name)
            .collect();
        assert_eq!(
            names,
            vec![
                "blue", "blue", "blue-white", "blue-white", "white", "yellow", "orange",
                "red-orange", "red", "red"
            ]
        );
    }

    #[test]
    fn band_table_is_ordered_hottest_first() {
        for pair in TEMPERATURE_BANDS.windows(2) {
            assert!(pair[0].min_temperature > pair[1].min_temperature);
        }
        // Blue channel falls off as temperature drops.
        for pair in TEMPERATURE_BANDS.windows(2) {
            assert!(pair[0].b.lo >= pair[1].b.lo);
        }
    }

    #[test]
    fn sampled_color_stays_inside_its_band() {
        let mut rng = seeded(99);
        for _ in 0..5000 {
            let t = MIN_TEMPERATURE + rng.gen::<f32>() * (MAX_TEMPERATURE - MIN_TEMPERATURE);
            let band = band_for_temperature(t);
            let c = color_for_temperature(t, &mut rng);
            assert!(band.r.contains(c.x), "{} r {}", band.name, c.x);
            assert!(band.g.contains(c.y), "{} g {}", band.name, c.y);
            assert!(band.b.contains(c.z), "{} b {}", band.name, c.z);
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = StarField::generate_with_rng(500, &mut seeded(5));
        let b = StarField::generate_with_rng(500, &mut seeded(5));
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_requests_yield_empty_field() {
        assert!(StarField::generate_requested(-1.0).is_empty());
        assert!(StarField::generate_requested(f64::NAN).is_empty());
        assert!(StarField::generate_requested(f64::INFINITY).is_empty());
        assert_eq!(StarField::generate_requested(3.7).len(), 3);
        assert_eq!(sanitize_count(0.0), Some(0));
    }

    #[test]
    fn oversized_requests_yield_empty_field() {
        assert!(StarField::generate_requested(1e30).is_empty());
        assert!(StarField::generate_requested(f64::MAX).is_empty());
        assert_eq!(sanitize_count(MAX_STARS as f64 + 1.0), None);
        assert_eq!(sanitize_count(MAX_STARS as f64), Some(MAX_STARS));
        assert_eq!(sanitize_count(MAX_STARS as f64 + 0.5), Some(MAX_STARS));
    }

    #[test]
    fn get_returns_parallel_attributes() {
        let field = StarField::generate_with_rng(3, &mut seeded(1));
        let star = field.get(2).expect("index in range");
        assert_eq!(star.position, field.positions[2]);
        assert_eq!(star.size, field.sizes[2]);
        assert!(field.get(3).is_none());
    }
}
