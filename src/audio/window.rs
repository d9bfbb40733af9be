//! Smoothing windows applied to filter coefficients.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// Rectangular window: coefficients are left as a plain DFT kernel.
    None,
    Hann,
    /// <https://en.wikipedia.org/wiki/Window_function#Blackman_window>
    #[default]
    Blackman,
}

impl WindowFunction {
    /// Window weights for a block of `len` samples (symmetric form).
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        if len == 1 {
            return vec![1.0];
        }
        let denom = len.saturating_sub(1) as f64;
        (0..len)
            .map(|n| {
                let x = n as f64 / denom;
                match self {
                    WindowFunction::None => 1.0,
                    WindowFunction::Hann => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                    WindowFunction::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                }
            })
            .collect()
    }
}
