//! Synthetic test images with known frequency content.
//!
//! Every generator quantizes to the 8-bit range the way an `u8` image would
//! (clamp, then truncate) and returns a three-channel [`Image`].

use std::f64::consts::PI;

use num_complex::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{Grid, Image};

const TAU: f64 = 2.0 * PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pattern {
    /// Product of a horizontal and a vertical sine.
    Sine { fx: f64, fy: f64 },
    /// A single 255 sample at the grid center.
    Impulse,
    Checkerboard { check_size: usize },
    /// `cos(2π·rings·r)` over the unit disk.
    Circles { rings: f64 },
    Stripes { stripe_width: f64 },
    /// A different sine product per channel.
    Colorful { fx: f64, fy: f64 },
    RainbowSpiral { revolutions: f64 },
    Mandelbrot { max_iter: usize },
    /// Gaussian noise around mid-gray.
    Noise { seed: u64 },
}

impl Pattern {
    pub const NAMES: [&'static str; 9] = [
        "sine",
        "impulse",
        "checkerboard",
        "circles",
        "stripes",
        "colorful",
        "rainbow_spiral",
        "mandelbrot",
        "noise",
    ];

    /// The pattern registered under `name`, with its stock parameters.
    pub fn named(name: &str) -> Option<Self> {
        let pattern = match name {
            "sine" => Pattern::Sine { fx: 8.0, fy: 8.0 },
            "impulse" => Pattern::Impulse,
            "checkerboard" => Pattern::Checkerboard { check_size: 32 },
            "circles" => Pattern::Circles { rings: 8.0 },
            "stripes" => Pattern::Stripes { stripe_width: 16.0 },
            "colorful" => Pattern::Colorful { fx: 5.0, fy: 5.0 },
            "rainbow_spiral" => Pattern::RainbowSpiral { revolutions: 3.0 },
            "mandelbrot" => Pattern::Mandelbrot { max_iter: 100 },
            "noise" => Pattern::Noise { seed: 0x5eed },
            _ => return None,
        };
        Some(pattern)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Sine { .. } => "sine",
            Pattern::Impulse => "impulse",
            Pattern::Checkerboard { .. } => "checkerboard",
            Pattern::Circles { .. } => "circles",
            Pattern::Stripes { .. } => "stripes",
            Pattern::Colorful { .. } => "colorful",
            Pattern::RainbowSpiral { .. } => "rainbow_spiral",
            Pattern::Mandelbrot { .. } => "mandelbrot",
            Pattern::Noise { .. } => "noise",
        }
    }

    pub fn generate(&self, height: usize, width: usize) -> Result<Image> {
        match *self {
            Pattern::Sine { fx, fy } => gray(unit_field(height, width, 0.0, 1.0, |x, y| {
                (TAU * fx * x).sin() * (TAU * fy * y).sin()
            })?),
            Pattern::Impulse => gray(Grid::from_fn(height, width, |y, x| {
                if (y, x) == (height / 2, width / 2) { 255.0 } else { 0.0 }
            })?),
            Pattern::Checkerboard { check_size } => {
                let check = check_size.max(1);
                gray(Grid::from_fn(height, width, |y, x| {
                    if (y / check + x / check) % 2 == 0 { 255.0 } else { 0.0 }
                })?)
            }
            Pattern::Circles { rings } => gray(unit_field(height, width, -1.0, 1.0, |x, y| {
                (TAU * rings * x.hypot(y)).cos()
            })?),
            Pattern::Stripes { stripe_width } => {
                let scale = width as f64 / stripe_width;
                gray(unit_field(height, width, -1.0, 1.0, |x, y| ((x + y) * scale).sin())?)
            }
            Pattern::Colorful { fx, fy } => {
                let r = unit_field(height, width, 0.0, 1.0, |x, y| {
                    (TAU * fx * x).sin() * (TAU * fy * y).cos()
                })?;
                let g = unit_field(height, width, 0.0, 1.0, |x, y| {
                    (TAU * (fx + 3.0) * x).sin() * (TAU * fy * y).sin()
                })?;
                let b = unit_field(height, width, 0.0, 1.0, |x, y| {
                    (TAU * fx * x).cos() * (TAU * (fy + 3.0) * y).sin()
                })?;
                Image::from_planes(&[r, g, b])
            }
            Pattern::RainbowSpiral { revolutions } => rainbow_spiral(height, width, revolutions),
            Pattern::Mandelbrot { max_iter } => mandelbrot(height, width, max_iter),
            Pattern::Noise { seed } => noise(height, width, seed),
        }
    }
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => return Vec::new(),
        1 => return vec![start],
        _ => {}
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn quantize(value: f64) -> f64 {
    value.clamp(0.0, 255.0).trunc()
}

/// Samples `f(x, y) ∈ [-1, 1]` on `[start, end]²` and maps it onto `[0, 255]`.
fn unit_field(
    height: usize,
    width: usize,
    start: f64,
    end: f64,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Grid<f64>> {
    let xs = linspace(start, end, width);
    let ys = linspace(start, end, height);
    Grid::from_fn(height, width, |y, x| quantize((f(xs[x], ys[y]) + 1.0) / 2.0 * 255.0))
}

fn gray(plane: Grid<f64>) -> Result<Image> {
    Image::from_gray(&plane, 3)
}

fn rainbow_spiral(height: usize, width: usize, revolutions: f64) -> Result<Image> {
    let xs = linspace(-1.0, 1.0, width);
    let ys = linspace(-1.0, 1.0, height);
    let channel = |offset: f64| {
        Grid::from_fn(height, width, |y, x| {
            let (px, py) = (xs[x], ys[y]);
            let r = px.hypot(py);
            let phase = py.atan2(px) + revolutions * TAU * r;
            let fade = (1.0 - r).clamp(0.0, 1.0).sqrt();
            let value = quantize(((phase + offset).sin() + 1.0) / 2.0 * 255.0);
            quantize(value * fade)
        })
    };
    Image::from_planes(&[channel(0.0)?, channel(TAU / 3.0)?, channel(2.0 * TAU / 3.0)?])
}

/// Iteration at which `z` first leaves the radius-2 disk, or 0 if it never does.
fn escape_iteration(c: Complex<f64>, max_iter: usize) -> usize {
    let mut z = Complex::new(0.0, 0.0);
    for i in 0..max_iter {
        z = z * z + c;
        if z.norm() >= 2.0 {
            return i;
        }
    }
    0
}

fn mandelbrot(height: usize, width: usize, max_iter: usize) -> Result<Image> {
    let xs = linspace(-2.0, 1.0, width);
    let ys = linspace(-1.5, 1.5, height);
    let escape = Grid::from_fn(height, width, |y, x| {
        escape_iteration(Complex::new(xs[x], ys[y]), max_iter) as f64 / max_iter.max(1) as f64
    })?;
    let channel =
        |harmonic: f64| escape.map(|&t| quantize((t * harmonic * PI).sin() * 127.0 + 128.0));
    Image::from_planes(&[channel(2.0), channel(4.0), channel(6.0)])
}

// Sum of twelve uniforms minus six: a cheap unit normal.
fn standard_gaussian(rng: &mut impl Rng) -> f64 {
    let sum: f64 = (0..12).map(|_| rng.gen_range(0.0..1.0)).sum();
    sum - 6.0
}

fn noise(height: usize, width: usize, seed: u64) -> Result<Image> {
    let mut rng = StdRng::seed_from_u64(seed);
    gray(Grid::from_fn(height, width, |_, _| {
        quantize(128.0 + 40.0 * standard_gaussian(&mut rng))
    })?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DftError;

    #[test]
    fn every_name_resolves() {
        for name in Pattern::NAMES {
            let pattern = Pattern::named(name).unwrap();
            assert_eq!(pattern.name(), name);
        }
        assert_eq!(Pattern::named("plaid"), None);
    }

    #[test]
    fn patterns_stay_in_byte_range() {
        for name in Pattern::NAMES {
            let image = Pattern::named(name).unwrap().generate(32, 48).unwrap();
            assert_eq!((image.height(), image.width(), image.channels()), (32, 48, 3));
            let gray = image.to_grayscale();
            assert!(gray.min() >= 0.0 && gray.max() <= 255.0, "{name}");
        }
    }

    #[test]
    fn empty_dimensions_are_rejected() {
        for name in Pattern::NAMES {
            let pattern = Pattern::named(name).unwrap();
            assert_eq!(pattern.generate(0, 0), Err(DftError::EmptyGrid), "{name}");
            assert_eq!(pattern.generate(0, 8), Err(DftError::EmptyGrid), "{name}");
            assert_eq!(pattern.generate(8, 0), Err(DftError::EmptyGrid), "{name}");
        }
    }

    #[test]
    fn impulse_is_a_single_sample() {
        let gray = Pattern::Impulse.generate(64, 64).unwrap().to_grayscale();
        assert_eq!(gray[(32, 32)], 255.0);
        assert_eq!(gray.sum(), 255.0);
    }

    #[test]
    fn checkerboard_blocks() {
        let gray = Pattern::Checkerboard { check_size: 4 }
            .generate(8, 8)
            .unwrap()
            .to_grayscale();
        assert_eq!(gray[(0, 0)], 255.0);
        assert_eq!(gray[(0, 4)], 0.0);
        assert_eq!(gray[(4, 4)], 255.0);
        assert_eq!(gray.mean(), 127.5);
    }

    #[test]
    fn noise_is_reproducible() {
        let a = Pattern::Noise { seed: 3 }.generate(8, 8).unwrap();
        let b = Pattern::Noise { seed: 3 }.generate(8, 8).unwrap();
        let c = Pattern::Noise { seed: 4 }.generate(8, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn colorful_channels_differ() {
        let image = Pattern::named("colorful").unwrap().generate(16, 16).unwrap();
        let differs = (0..16).any(|x| {
            let px = image.pixel(5, x);
            px[0] != px[1] || px[1] != px[2]
        });
        assert!(differs);
    }
}
