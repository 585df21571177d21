//! The 2-D transform engine.
//!
//! A 2-D DFT is computed as two separable passes: every row is transformed
//! first ([`row_pass`]) and the columns of that intermediate second
//! ([`column_pass`]). Each pass allocates its own output, and rows/columns
//! are spread across the rayon pool.
//!
//! Spectra carry their layout in the type. Transforms produce and consume
//! [`Spectrum<Natural>`] (DC at `[0, 0]`); filters only accept
//! [`Spectrum<Centered>`] (DC at `[H/2, W/2]`). [`shift`] and [`unshift`]
//! convert between the two.

use std::marker::PhantomData;

use num_complex::Complex;
use rayon::prelude::*;

use crate::error::Result;
use crate::fft::{forward_1d, inverse_1d};
use crate::grid::Grid;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Natural {}
    impl Sealed for super::Centered {}
}

/// Bin ordering of a spectrum.
pub trait Layout: sealed::Sealed + Copy + Send + Sync + 'static {
    const CENTERED: bool;
}

/// DC component at `[0, 0]`, as produced by a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

/// DC component at `[H/2, W/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Centered;

impl Layout for Natural {
    const CENTERED: bool = false;
}

impl Layout for Centered {
    const CENTERED: bool = true;
}

/// An `H×W` grid of complex bins in layout `L`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<L: Layout> {
    bins: Grid<Complex<f64>>,
    layout: PhantomData<L>,
}

impl<L: Layout> Spectrum<L> {
    pub(crate) fn from_bins_unchecked(bins: Grid<Complex<f64>>) -> Self {
        Self {
            bins,
            layout: PhantomData,
        }
    }

    pub fn bins(&self) -> &Grid<Complex<f64>> {
        &self.bins
    }

    pub fn into_bins(self) -> Grid<Complex<f64>> {
        self.bins
    }

    pub fn dims(&self) -> (usize, usize) {
        self.bins.dims()
    }

    pub fn is_centered(&self) -> bool {
        L::CENTERED
    }

    /// The same bins in natural order; unshifts a centered spectrum.
    pub fn to_natural(&self) -> Spectrum<Natural> {
        let bins = if L::CENTERED {
            unshift_bins(&self.bins)
        } else {
            self.bins.clone()
        };
        Spectrum::from_bins_unchecked(bins)
    }

    /// Elementwise transform of the bins, keeping the layout.
    pub fn map_bins(&self, f: impl FnMut(usize, usize, &Complex<f64>) -> Complex<f64>) -> Self {
        Self::from_bins_unchecked(self.bins.map_indexed(f))
    }
}

impl Spectrum<Natural> {
    /// Treats an arbitrary grid of bins as a naturally ordered spectrum.
    pub fn from_bins(bins: Grid<Complex<f64>>) -> Self {
        Self::from_bins_unchecked(bins)
    }
}

impl Spectrum<Centered> {
    /// The zero-frequency position `(H/2, W/2)`.
    pub fn center(&self) -> (usize, usize) {
        let (h, w) = self.dims();
        (h / 2, w / 2)
    }

    /// Euclidean distance of bin `(y, x)` from the zero-frequency bin.
    pub fn distance(&self, y: usize, x: usize) -> f64 {
        let (cy, cx) = self.center();
        let dy = y as f64 - cy as f64;
        let dx = x as f64 - cx as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The zero-frequency bin.
    pub fn dc(&self) -> Complex<f64> {
        self.bins[self.center()]
    }
}

fn transform_rows(
    grid: &Grid<Complex<f64>>,
    pass: fn(&[Complex<f64>]) -> Result<Vec<Complex<f64>>>,
) -> Result<Grid<Complex<f64>>> {
    let rows = grid
        .as_slice()
        .par_chunks_exact(grid.width())
        .map(pass)
        .collect::<Result<Vec<_>>>()?;
    Grid::from_rows(rows)
}

fn transform_columns(
    grid: &Grid<Complex<f64>>,
    pass: fn(&[Complex<f64>]) -> Result<Vec<Complex<f64>>>,
) -> Result<Grid<Complex<f64>>> {
    Ok(transform_rows(&grid.transpose(), pass)?.transpose())
}

/// Forward 1-D transform of every row: the "horizontal pass only" result.
pub fn row_pass(input: &Grid<Complex<f64>>) -> Result<Spectrum<Natural>> {
    transform_rows(input, forward_1d).map(Spectrum::from_bins_unchecked)
}

/// Forward 1-D transform of every column of a row-transformed grid.
pub fn column_pass(rows_done: &Spectrum<Natural>) -> Result<Spectrum<Natural>> {
    transform_columns(&rows_done.bins, forward_1d).map(Spectrum::from_bins_unchecked)
}

/// Unnormalized forward 2-D DFT of a complex grid.
pub fn forward_2d_complex(input: &Grid<Complex<f64>>) -> Result<Spectrum<Natural>> {
    let (height, width) = input.dims();
    tracing::trace!(height, width, "forward 2-D transform");
    column_pass(&row_pass(input)?)
}

/// Unnormalized forward 2-D DFT of a real grid.
pub fn forward_2d(input: &Grid<f64>) -> Result<Spectrum<Natural>> {
    forward_2d_complex(&input.to_complex())
}

/// Inverse 2-D DFT: inverse columns, then inverse rows, `1/(H·W)` overall.
pub fn inverse_2d(spectrum: &Spectrum<Natural>) -> Result<Grid<Complex<f64>>> {
    let (height, width) = spectrum.dims();
    tracing::trace!(height, width, "inverse 2-D transform");
    let columns_done = transform_columns(&spectrum.bins, inverse_1d)?;
    transform_rows(&columns_done, inverse_1d)
}

/// Moves the zero-frequency bin to `(H/2, W/2)` by rolling each axis by
/// half its length.
pub fn shift(spectrum: &Spectrum<Natural>) -> Spectrum<Centered> {
    let (h, w) = spectrum.dims();
    let bins = &spectrum.bins;
    Spectrum::from_bins_unchecked(
        bins.map_indexed(|y, x, _| bins[((y + h - h / 2) % h, (x + w - w / 2) % w)]),
    )
}

fn unshift_bins(bins: &Grid<Complex<f64>>) -> Grid<Complex<f64>> {
    let (h, w) = bins.dims();
    bins.map_indexed(|y, x, _| bins[((y + h / 2) % h, (x + w / 2) % w)])
}

/// Exact inverse of [`shift`]; the same permutation when both sides are even.
pub fn unshift(spectrum: &Spectrum<Centered>) -> Spectrum<Natural> {
    Spectrum::from_bins_unchecked(unshift_bins(&spectrum.bins))
}
