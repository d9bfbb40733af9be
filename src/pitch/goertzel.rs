//! Single-bin frequency detector.
//!
//! Evaluates one DFT coefficient at an arbitrary (not necessarily bin-centred)
//! frequency over a fixed-length block:
//! `y = e^{iwN} · Σ_k x[k] · win[k] · e^{-iwk}` with `w = 2π·f/rate`.
//! See <https://en.wikipedia.org/wiki/Goertzel_algorithm>, eqn 6.

use rustfft::num_complex::Complex;
use std::f64::consts::PI;

use crate::audio::window::WindowFunction;
use crate::error::DetectError;

/// Immutable after construction; shared read-only across windows and threads.
#[derive(Clone, Debug)]
pub struct GoertzelFilter {
    coeffs: Vec<Complex<f64>>,
    norm: Complex<f64>,
}

impl GoertzelFilter {
    pub fn new(
        freq: f64,
        sample_rate: u32,
        len: usize,
        window: WindowFunction,
    ) -> Result<Self, DetectError> {
        if sample_rate == 0 {
            return Err(DetectError::InvalidSampleRate);
        }
        if len == 0 {
            return Err(DetectError::InvalidWindowLength { samples: len });
        }

        let w = 2.0 * PI * freq / sample_rate as f64;
        let coeffs = window
            .coefficients(len)
            .into_iter()
            .enumerate()
            .map(|(k, weight)| Complex::from_polar(weight, -w * k as f64))
            .collect();

        Ok(Self {
            coeffs,
            norm: Complex::from_polar(1.0, w * len as f64),
        })
    }

    /// Number of samples this filter consumes per window.
    pub fn window_len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn respond(&self, window: &[f64]) -> Result<Complex<f64>, DetectError> {
        if window.len() != self.coeffs.len() {
            return Err(DetectError::ResponseLength {
                expected: self.coeffs.len(),
                actual: window.len(),
            });
        }
        let dot: Complex<f64> = self
            .coeffs
            .iter()
            .zip(window)
            .map(|(&c, &x)| c * x)
            .sum();
        Ok(self.norm * dot)
    }

    /// Magnitude of the response.
    pub fn power(&self, window: &[f64]) -> Result<f64, DetectError> {
        self.respond(window).map(|y| y.norm())
    }
}
