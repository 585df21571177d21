//! End-to-end analysis of one image.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info_span};

use crate::analysis::{imag_part, log_magnitude, normalize, real_part};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::filter::{FilterBank, TestCaseSet};
use crate::grid::{Grid, Image};
use crate::reconstruct::{ErrorReport, ErrorStats, error_report, reconstruct};
use crate::spectrum::{column_pass, row_pass, shift};

/// Everything derived from one input image.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Grayscale input the engine transformed.
    pub input: Grid<f64>,
    /// Log magnitude after the row pass only, centered.
    pub horizontal_magnitude: Grid<f64>,
    /// Log magnitude of the full centered spectrum.
    pub magnitude: Grid<f64>,
    /// Real part of the centered spectrum, normalized to `[0, 255]`.
    pub real: Grid<f64>,
    /// Imaginary part of the centered spectrum, normalized to `[0, 255]`.
    pub imag: Grid<f64>,
    pub reconstruction: Grid<f64>,
    pub error: ErrorReport,
    pub test_cases: TestCaseSet,
    /// Error of each filtered reconstruction against the input.
    pub filter_errors: BTreeMap<&'static str, ErrorStats>,
}

/// Scalar digest of an [`AnalysisReport`].
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub pattern: String,
    pub height: usize,
    pub width: usize,
    /// Sum of all input samples, the expected zero-frequency bin.
    pub sample_sum: f64,
    pub round_trip: ErrorStats,
    pub filters: BTreeMap<&'static str, ErrorStats>,
}

impl AnalysisReport {
    pub fn summary(&self, pattern: &str) -> ReportSummary {
        let (height, width) = self.input.dims();
        ReportSummary {
            pattern: pattern.to_owned(),
            height,
            width,
            sample_sum: self.input.sum(),
            round_trip: self.error.stats(),
            filters: self.filter_errors.clone(),
        }
    }
}

/// Runs the forward transform, display projections, unfiltered round trip
/// and the filter bank over `image`.
pub fn analyze(image: &Image, filters: &FilterConfig) -> Result<AnalysisReport> {
    let _span = info_span!("analyze", height = image.height(), width = image.width()).entered();

    let input = image.to_grayscale();
    let rows = row_pass(&input.to_complex())?;
    let horizontal_magnitude = log_magnitude(&shift(&rows));

    let spectrum = shift(&column_pass(&rows)?);
    debug!(dc = spectrum.dc().re, "forward transform done");

    let reconstruction = reconstruct(&spectrum)?;
    let error = error_report(&input, &reconstruction)?;
    debug!(max_error = error.max_error, mean_error = error.mean_error, "round trip");

    let (height, width) = spectrum.dims();
    let test_cases = FilterBank::from_config(height, width, filters).run(&spectrum)?;
    let filter_errors = test_cases
        .iter()
        .map(|(name, output)| error_report(&input, output).map(|report| (name, report.stats())))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(AnalysisReport {
        horizontal_magnitude,
        magnitude: log_magnitude(&spectrum),
        real: normalize(&real_part(&spectrum)),
        imag: normalize(&imag_part(&spectrum)),
        reconstruction,
        error,
        test_cases,
        filter_errors,
        input,
    })
}
