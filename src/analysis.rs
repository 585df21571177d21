//! Read-only views of a spectrum for display.

use crate::grid::Grid;
use crate::spectrum::{Layout, Spectrum};

/// `20·ln(|X| + 1)` per bin.
pub fn log_magnitude<L: Layout>(spectrum: &Spectrum<L>) -> Grid<f64> {
    spectrum.bins().map(|c| 20.0 * (c.norm() + 1.0).ln())
}

pub fn magnitude<L: Layout>(spectrum: &Spectrum<L>) -> Grid<f64> {
    spectrum.bins().map(|c| c.norm())
}

pub fn phase<L: Layout>(spectrum: &Spectrum<L>) -> Grid<f64> {
    spectrum.bins().map(|c| c.arg())
}

pub fn real_part<L: Layout>(spectrum: &Spectrum<L>) -> Grid<f64> {
    spectrum.bins().map(|c| c.re)
}

pub fn imag_part<L: Layout>(spectrum: &Spectrum<L>) -> Grid<f64> {
    spectrum.bins().map(|c| c.im)
}

/// Linearly rescales a field onto `[0, 255]`.
///
/// A flat field (`max == min`) maps to all zeros.
pub fn normalize(field: &Grid<f64>) -> Grid<f64> {
    let min = field.min();
    let range = field.max() - min;
    if range > 0.0 {
        field.map(|&v| (v - min) / range * 255.0)
    } else {
        field.map(|_| 0.0)
    }
}
