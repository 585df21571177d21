use serde::Serialize;

use crate::error::Result;
use crate::grid::Grid;
use crate::spectrum::{Layout, Spectrum, inverse_2d};

/// Inverse-transforms a spectrum back to a real image.
///
/// A centered spectrum is unshifted first. The magnitude of each complex
/// sample is kept, dropping the residual imaginary part left by rounding.
pub fn reconstruct<L: Layout>(spectrum: &Spectrum<L>) -> Result<Grid<f64>> {
    let spatial = inverse_2d(&spectrum.to_natural())?;
    Ok(spatial.map(|c| c.norm()))
}

/// Pointwise and aggregate reconstruction error. No tolerance is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// `|original - reconstructed|` per sample.
    pub error_grid: Grid<f64>,
    pub max_error: f64,
    pub mean_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorStats {
    pub max_error: f64,
    pub mean_error: f64,
}

impl ErrorReport {
    pub fn stats(&self) -> ErrorStats {
        ErrorStats {
            max_error: self.max_error,
            mean_error: self.mean_error,
        }
    }
}

pub fn error_report(original: &Grid<f64>, reconstructed: &Grid<f64>) -> Result<ErrorReport> {
    original.ensure_same_dims(reconstructed)?;
    let error_grid = original.map_indexed(|y, x, &v| (v - reconstructed[(y, x)]).abs());
    Ok(ErrorReport {
        max_error: error_grid.max(),
        mean_error: error_grid.mean(),
        error_grid,
    })
}
