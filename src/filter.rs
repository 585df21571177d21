//! Frequency-domain filters over centered spectra.
//!
//! Every filter is a pure function of its input spectrum: it allocates and
//! returns a new spectrum, so the bank can evaluate them in any order or in
//! parallel.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_4;

use num_complex::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::error::Result;
use crate::grid::Grid;
use crate::reconstruct::reconstruct;
use crate::spectrum::{Centered, Spectrum};

const ZERO: Complex<f64> = Complex::new(0.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    /// Keeps bins with `d <= radius`.
    LowPass { radius: f64 },
    /// Keeps bins with `d > radius`.
    HighPass { radius: f64 },
    /// Keeps bins with `inner < d <= outer`.
    BandPass { inner: f64, outer: f64 },
    /// Adds `angle` radians to the phase of every bin.
    PhaseRotate { angle: f64 },
    /// Scales each bin by `1 + 2·d/d_max`.
    EdgeEnhance,
}

/// `min(H/2, W/2)`, the radius unit the default filters are expressed in.
fn half_extent(height: usize, width: usize) -> f64 {
    (height / 2).min(width / 2) as f64
}

impl Filter {
    pub fn low_pass_for(height: usize, width: usize) -> Self {
        Filter::LowPass {
            radius: half_extent(height, width) / 4.0,
        }
    }

    pub fn high_pass_for(height: usize, width: usize) -> Self {
        Filter::HighPass {
            radius: half_extent(height, width) / 4.0,
        }
    }

    pub fn band_pass_for(height: usize, width: usize) -> Self {
        let extent = half_extent(height, width);
        Filter::BandPass {
            inner: extent / 8.0,
            outer: extent / 2.0,
        }
    }

    pub fn phase_rotate() -> Self {
        Filter::PhaseRotate { angle: FRAC_PI_4 }
    }

    /// Test-case name of the filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::LowPass { .. } => "low_pass",
            Filter::HighPass { .. } => "high_pass",
            Filter::BandPass { .. } => "band_pass",
            Filter::PhaseRotate { .. } => "phase_shift",
            Filter::EdgeEnhance => "edge_enhance",
        }
    }

    pub fn apply(&self, spectrum: &Spectrum<Centered>) -> Spectrum<Centered> {
        match *self {
            Filter::LowPass { radius } => {
                spectrum.map_bins(|y, x, &bin| {
                    if spectrum.distance(y, x) > radius { ZERO } else { bin }
                })
            }
            Filter::HighPass { radius } => {
                spectrum.map_bins(|y, x, &bin| {
                    if spectrum.distance(y, x) <= radius { ZERO } else { bin }
                })
            }
            Filter::BandPass { inner, outer } => spectrum.map_bins(|y, x, &bin| {
                let d = spectrum.distance(y, x);
                if d <= inner || d > outer { ZERO } else { bin }
            }),
            Filter::PhaseRotate { angle } => {
                let rotation = Complex::from_polar(1.0, angle);
                spectrum.map_bins(|_, _, &bin| bin * rotation)
            }
            Filter::EdgeEnhance => {
                let (cy, cx) = spectrum.center();
                let d_max = ((cx * cx + cy * cy) as f64).sqrt();
                spectrum.map_bins(|y, x, &bin| {
                    if d_max > 0.0 {
                        bin * (1.0 + 2.0 * spectrum.distance(y, x) / d_max)
                    } else {
                        bin
                    }
                })
            }
        }
    }
}

/// The five canonical filters, in a fixed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterBank {
    filters: Vec<Filter>,
}

impl FilterBank {
    /// Default parameters for a spectrum of `height × width`.
    pub fn defaults_for(height: usize, width: usize) -> Self {
        Self::from_config(height, width, &FilterConfig::default())
    }

    pub fn from_config(height: usize, width: usize, config: &FilterConfig) -> Self {
        let low = match config.low_pass_radius {
            Some(radius) => Filter::LowPass { radius },
            None => Filter::low_pass_for(height, width),
        };
        let high = match config.high_pass_radius {
            Some(radius) => Filter::HighPass { radius },
            None => Filter::high_pass_for(height, width),
        };
        let band = match Filter::band_pass_for(height, width) {
            Filter::BandPass { inner, outer } => Filter::BandPass {
                inner: config.band_inner.unwrap_or(inner),
                outer: config.band_outer.unwrap_or(outer),
            },
            other => other,
        };
        let phase = config
            .phase_angle
            .map_or_else(Filter::phase_rotate, |angle| Filter::PhaseRotate { angle });

        Self {
            filters: vec![low, high, band, phase, Filter::EdgeEnhance],
        }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Applies every filter to `spectrum`, keyed by filter name.
    pub fn apply_all(
        &self,
        spectrum: &Spectrum<Centered>,
    ) -> BTreeMap<&'static str, Spectrum<Centered>> {
        self.filters
            .par_iter()
            .map(|filter| (filter.name(), filter.apply(spectrum)))
            .collect()
    }

    /// Filters `spectrum` and reconstructs each output into the spatial
    /// domain.
    pub fn run(&self, spectrum: &Spectrum<Centered>) -> Result<TestCaseSet> {
        let cases = self
            .filters
            .par_iter()
            .map(|filter| {
                let _span = tracing::debug_span!("filter", name = filter.name()).entered();
                let filtered = filter.apply(spectrum);
                reconstruct(&filtered).map(|image| (filter.name(), image))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(TestCaseSet { cases })
    }
}

/// Reconstructed spatial-domain image per filter name.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseSet {
    cases: BTreeMap<&'static str, Grid<f64>>,
}

impl TestCaseSet {
    pub fn get(&self, name: &str) -> Option<&Grid<f64>> {
        self.cases.get(name)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Grid<f64>)> {
        self.cases.iter().map(|(name, image)| (*name, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{forward_2d, shift};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_centered(height: usize, width: usize, seed: u64) -> Spectrum<Centered> {
        let mut rng = StdRng::seed_from_u64(seed);
        let image = Grid::from_fn(height, width, |_, _| rng.gen_range(0.0..255.0)).unwrap();
        shift(&forward_2d(&image).unwrap())
    }

    #[test]
    fn defaults_follow_grid_size() {
        let bank = FilterBank::defaults_for(64, 128);
        assert_eq!(
            bank.filters(),
            &[
                Filter::LowPass { radius: 8.0 },
                Filter::HighPass { radius: 8.0 },
                Filter::BandPass {
                    inner: 4.0,
                    outer: 16.0
                },
                Filter::PhaseRotate { angle: FRAC_PI_4 },
                Filter::EdgeEnhance,
            ]
        );
    }

    #[test]
    fn config_overrides_defaults() {
        let config = FilterConfig {
            low_pass_radius: Some(3.0),
            band_outer: Some(10.0),
            ..FilterConfig::default()
        };
        let bank = FilterBank::from_config(32, 32, &config);
        assert_eq!(bank.filters()[0], Filter::LowPass { radius: 3.0 });
        assert_eq!(
            bank.filters()[2],
            Filter::BandPass {
                inner: 2.0,
                outer: 10.0
            }
        );
    }

    #[test]
    fn low_and_high_pass_partition_the_spectrum() {
        let spectrum = random_centered(16, 20, 8);
        for radius in [0.0, 1.5, 3.0, 7.0, 100.0] {
            let low = Filter::LowPass { radius }.apply(&spectrum);
            let high = Filter::HighPass { radius }.apply(&spectrum);
            for ((l, h), s) in low
                .bins()
                .as_slice()
                .iter()
                .zip(high.bins().as_slice())
                .zip(spectrum.bins().as_slice())
            {
                assert_eq!(l + h, *s);
            }
        }
    }

    #[test]
    fn band_pass_keeps_only_the_ring() {
        let spectrum = random_centered(32, 32, 2);
        let band = Filter::BandPass { inner: 2.0, outer: 8.0 }.apply(&spectrum);
        for y in 0..32 {
            for x in 0..32 {
                let d = spectrum.distance(y, x);
                let kept = band.bins()[(y, x)];
                if d <= 2.0 || d > 8.0 {
                    assert_eq!(kept, ZERO);
                } else {
                    assert_eq!(kept, spectrum.bins()[(y, x)]);
                }
            }
        }
    }

    #[test]
    fn phase_rotation_preserves_magnitude() {
        let spectrum = random_centered(12, 12, 3);
        for angle in [FRAC_PI_4, 1.0, -2.5, 10.0] {
            let rotated = Filter::PhaseRotate { angle }.apply(&spectrum);
            for (a, b) in rotated.bins().as_slice().iter().zip(spectrum.bins().as_slice()) {
                assert!((a.norm() - b.norm()).abs() <= 1e-9 * b.norm().max(1.0));
            }
        }
    }

    #[test]
    fn edge_enhance_leaves_dc_and_boosts_corners() {
        let spectrum = random_centered(16, 16, 4);
        let boosted = Filter::EdgeEnhance.apply(&spectrum);
        assert_eq!(boosted.dc(), spectrum.dc());
        // (0, 0) sits at d_max from the center.
        let corner = boosted.bins()[(0, 0)];
        assert!((corner - spectrum.bins()[(0, 0)] * 3.0).norm() < 1e-9);
    }

    #[test]
    fn edge_enhance_on_single_bin_is_identity() {
        let spectrum = random_centered(1, 1, 5);
        assert_eq!(Filter::EdgeEnhance.apply(&spectrum), spectrum);
    }

    #[test]
    fn filters_do_not_touch_their_input() {
        let spectrum = random_centered(8, 8, 6);
        let before = spectrum.clone();
        let bank = FilterBank::defaults_for(8, 8);
        let outputs = bank.apply_all(&spectrum);
        assert_eq!(outputs.len(), 5);
        assert_eq!(spectrum, before);
    }

    #[test]
    fn run_produces_every_test_case() {
        let spectrum = random_centered(16, 16, 7);
        let cases = FilterBank::defaults_for(16, 16).run(&spectrum).unwrap();
        let names: Vec<_> = cases.iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["band_pass", "edge_enhance", "high_pass", "low_pass", "phase_shift"]
        );
        assert!(cases.iter().all(|(_, image)| image.dims() == (16, 16)));
    }
}
