pub mod analysis;
pub mod config;
pub mod error;
pub mod fft;
pub mod filter;
pub mod grid;
pub mod harness;
pub mod pattern;
pub mod reconstruct;
pub mod spectrum;

pub use error::{DftError, Result};
pub use grid::{Grid, Image};
pub use spectrum::{Centered, Natural, Spectrum};
