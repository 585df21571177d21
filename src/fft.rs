use num_complex::Complex;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::f64::consts::PI;

use crate::error::{DftError, Result};

const ROOTS_CACHE_BITS: usize = 13;

const TAU: f64 = 2.0 * PI;

// Entry k holds root(k, 2^ROOTS_CACHE_BITS); shorter power-of-two lengths
// index it with a stride.
static ROOTS_OF_UNITY: Lazy<Vec<Complex<f64>>> = Lazy::new(|| {
    let n = 1 << ROOTS_CACHE_BITS;
    (0..n).map(|k| twiddle(k, n)).collect()
});

fn twiddle(k: usize, n: usize) -> Complex<f64> {
    let theta = -TAU * (k as f64) / (n as f64);
    Complex::new(theta.cos(), theta.sin())
}

/// Root lookup for an exponent already reduced into `0..n`, `n > 0`.
fn root(k: usize, n: usize) -> Complex<f64> {
    debug_assert!(k < n);
    if n.is_power_of_two() && n <= 1 << ROOTS_CACHE_BITS {
        let bits = n.trailing_zeros() as usize;
        ROOTS_OF_UNITY[k << (ROOTS_CACHE_BITS - bits)]
    } else {
        twiddle(k, n)
    }
}

/// The primitive `n`-th root of unity raised to the `-k` power,
/// `cos(-2πk/n) + i·sin(-2πk/n)`.
///
/// `k` may be negative or exceed `n`; it is reduced modulo `n`.
pub fn root_of_unity(k: i64, n: usize) -> Result<Complex<f64>> {
    if n == 0 {
        return Err(DftError::ZeroLength);
    }
    let i = k.rem_euclid(n as i64) as usize;
    Ok(root(i, n))
}

/// `exp(-2πik/n)` evaluated through the complex exponential.
pub fn reference_root(k: i64, n: usize) -> Result<Complex<f64>> {
    if n == 0 {
        return Err(DftError::ZeroLength);
    }
    Ok((Complex::i() * (-TAU * (k as f64) / (n as f64))).exp())
}

/// One row of the root-of-unity check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootComparison {
    pub k: usize,
    pub computed: Complex<f64>,
    pub reference: Complex<f64>,
}

impl RootComparison {
    /// Largest absolute difference over the real and imaginary parts.
    pub fn deviation(&self) -> f64 {
        let diff = self.computed - self.reference;
        diff.re.abs().max(diff.im.abs())
    }
}

/// Compares `root_of_unity` with `reference_root` for `k = 0 .. n/2 - 1`.
pub fn compare_roots(n: usize) -> Result<Vec<RootComparison>> {
    if n == 0 {
        return Err(DftError::ZeroLength);
    }
    (0..n / 2)
        .map(|k| {
            Ok(RootComparison {
                k,
                computed: root_of_unity(k as i64, n)?,
                reference: reference_root(k as i64, n)?,
            })
        })
        .collect()
}

fn transform(input: &[Complex<f64>], is_inverse: bool) -> Vec<Complex<f64>> {
    let n = input.len();
    if n.is_power_of_two() {
        radix2(input, is_inverse)
    } else {
        direct(input, is_inverse)
    }
}

fn radix2(input: &[Complex<f64>], is_inverse: bool) -> Vec<Complex<f64>> {
    let n = input.len();
    debug_assert!(n.is_power_of_two());

    if n == 1 {
        return vec![input[0]];
    }

    let evens: Vec<Complex<f64>> = input.iter().step_by(2).copied().collect();
    let odds: Vec<Complex<f64>> = input.iter().skip(1).step_by(2).copied().collect();
    let even_fft = radix2(&evens, is_inverse);
    let odd_fft = radix2(&odds, is_inverse);

    let half_n = n / 2;
    let mut output = vec![Complex::new(0.0, 0.0); n];
    for k in 0..half_n {
        let exponent = if is_inverse { (n - k) % n } else { k };
        let twisted = root(exponent, n) * odd_fft[k];
        output[k] = even_fft[k] + twisted;
        output[k + half_n] = even_fft[k] - twisted;
    }

    output
}

fn direct(input: &[Complex<f64>], is_inverse: bool) -> Vec<Complex<f64>> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(j, x)| {
                    let exponent = (k * j) % n;
                    let exponent = if is_inverse { (n - exponent) % n } else { exponent };
                    x * root(exponent, n)
                })
                .sum::<Complex<f64>>()
        })
        .collect()
}

/// Unnormalized forward DFT, `X[k] = Σ x[n]·root(k·n mod N, N)`.
///
/// Power-of-two lengths take the radix-2 path, every other length is summed
/// directly.
pub fn forward_1d(input: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
    if input.is_empty() {
        return Err(DftError::ZeroLength);
    }
    Ok(transform(input, false))
}

/// Forward DFT of a real sequence.
pub fn forward_1d_real(input: &[f64]) -> Result<Vec<Complex<f64>>> {
    let as_complex: Vec<Complex<f64>> = input.iter().map(|&x| Complex::new(x, 0.0)).collect();
    forward_1d(&as_complex)
}

/// Inverse DFT carrying the `1/N` normalization.
pub fn inverse_1d(input: &[Complex<f64>]) -> Result<Vec<Complex<f64>>> {
    if input.is_empty() {
        return Err(DftError::ZeroLength);
    }
    let scale = 1.0 / input.len() as f64;
    Ok(transform(input, true)
        .into_iter()
        .map(|x| x * scale)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rustfft::FftPlanner;

    fn random_sequence(len: usize, seed: u64) -> Vec<Complex<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..len)
            .map(|_| Complex::new(rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)))
            .collect()
    }

    #[test]
    fn roots_match_complex_exponential() {
        let table = compare_roots(8).unwrap();
        assert_eq!(table.len(), 4);
        for row in &table {
            assert_abs_diff_eq!(row.computed.re, row.reference.re, epsilon = 1e-9);
            assert_abs_diff_eq!(row.computed.im, row.reference.im, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(table[2].computed.im, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn cached_and_uncached_roots_agree() {
        for n in [1usize, 2, 3, 12, 64, 1 << ROOTS_CACHE_BITS, 1 << (ROOTS_CACHE_BITS + 1)] {
            for k in [-5i64, 0, 1, 7, 1000] {
                let cached = root_of_unity(k, n).unwrap();
                let reference = reference_root(k, n).unwrap();
                assert!((cached - reference).norm() < 1e-9, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn zero_length_is_rejected() {
        assert_eq!(root_of_unity(1, 0), Err(DftError::ZeroLength));
        assert_eq!(compare_roots(0), Err(DftError::ZeroLength));
        assert_eq!(forward_1d(&[]), Err(DftError::ZeroLength));
        assert_eq!(inverse_1d(&[]), Err(DftError::ZeroLength));
    }

    #[test]
    fn round_trip_power_of_two_and_odd_lengths() {
        for (seed, len) in [1usize, 2, 17, 256].into_iter().enumerate() {
            let signal = random_sequence(len, seed as u64);
            let recovered = inverse_1d(&forward_1d(&signal).unwrap()).unwrap();
            assert_eq!(recovered.len(), len);
            for (a, b) in signal.iter().zip(&recovered) {
                assert_abs_diff_eq!(a.re, b.re, epsilon = 1e-6);
                assert_abs_diff_eq!(a.im, b.im, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn forward_matches_rustfft() {
        let mut planner = FftPlanner::<f64>::new();
        for len in [5usize, 17, 64, 96] {
            let signal = random_sequence(len, 42);
            let ours = forward_1d(&signal).unwrap();

            let mut theirs = signal.clone();
            planner.plan_fft_forward(len).process(&mut theirs);

            for (a, b) in ours.iter().zip(&theirs) {
                assert!((a - b).norm() < 1e-6, "len {len}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn real_input_single_tone() {
        let n = 32;
        let signal: Vec<f64> = (0..n)
            .map(|i| (TAU * 3.0 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = forward_1d_real(&signal).unwrap();
        assert_abs_diff_eq!(spectrum[3].re, n as f64 / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum[n - 3].re, n as f64 / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum[0].norm(), 0.0, epsilon = 1e-9);
    }
}
