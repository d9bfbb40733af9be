use serde::{Deserialize, Serialize};

use super::goertzel::GoertzelFilter;
use super::notes::NoteTable;
use crate::audio::window::WindowFunction;
use crate::error::DetectError;

/// Longest window any filter may span.
const MAX_WINDOW_SECONDS: f64 = 10.0;

/// How many samples each filter looks at. One policy per run; never mixed.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum WindowPolicy {
    /// A single wall-clock window shared by every filter.
    Fixed { ms: f64 },
    /// Each filter spans a fixed number of cycles of its own frequency.
    Cycles { cycles: f64 },
}

impl Default for WindowPolicy {
    fn default() -> Self {
        WindowPolicy::Fixed { ms: 50.0 }
    }
}

impl WindowPolicy {
    fn parameter(&self) -> f64 {
        match *self {
            WindowPolicy::Fixed { ms } => ms,
            WindowPolicy::Cycles { cycles } => cycles,
        }
    }

    /// Window length in samples for a filter tuned to `freq`, bounded
    /// before anything is allocated.
    pub fn window_len(&self, freq: f64, sample_rate: u32) -> Result<usize, DetectError> {
        let rate = sample_rate as f64;
        let samples = match *self {
            WindowPolicy::Fixed { ms } => rate * ms / 1000.0,
            WindowPolicy::Cycles { cycles } => cycles * rate / freq,
        };
        if !(samples.is_finite() && samples <= rate * MAX_WINDOW_SECONDS) {
            return Err(DetectError::WindowTooLong {
                seconds: samples / rate,
                max_seconds: MAX_WINDOW_SECONDS,
            });
        }
        Ok(samples as usize)
    }
}

/// One filter per note, index-aligned with the note table.
///
/// Every call to [`FilterBank::respond_all`] takes a block of `stride` samples.
/// Under the fixed policy all filters consume the whole block; under the cycle
/// policy each filter reads the prefix matching its own length.
#[derive(Clone, Debug)]
pub struct FilterBank {
    filters: Vec<GoertzelFilter>,
    stride: usize,
}

impl FilterBank {
    pub fn new(
        table: &NoteTable,
        sample_rate: u32,
        policy: WindowPolicy,
        window: WindowFunction,
    ) -> Result<Self, DetectError> {
        let param = policy.parameter();
        if !(param.is_finite() && param > 0.0) {
            return Err(DetectError::InvalidWindowParameter(param));
        }

        let filters = table
            .iter()
            .map(|note| {
                let len = policy.window_len(note.frequency, sample_rate)?;
                GoertzelFilter::new(note.frequency, sample_rate, len, window)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let stride = filters.iter().map(|f| f.window_len()).max().unwrap_or(0);

        if let WindowPolicy::Fixed { .. } = policy {
            if let Some(f) = filters.iter().find(|f| f.window_len() != stride) {
                return Err(DetectError::ResponseLength {
                    expected: stride,
                    actual: f.window_len(),
                });
            }
        }

        log::debug!(
            "Filter bank: {} filters, {:?}, stride {} samples",
            filters.len(),
            policy,
            stride
        );

        Ok(Self { filters, stride })
    }

    /// Samples consumed per scanned window.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn filters(&self) -> &[GoertzelFilter] {
        &self.filters
    }

    /// Magnitude response of every filter, in note table order.
    pub fn respond_all(&self, window: &[f64]) -> Result<Vec<f64>, DetectError> {
        if window.len() != self.stride {
            return Err(DetectError::ResponseLength {
                expected: self.stride,
                actual: window.len(),
            });
        }
        self.filters
            .iter()
            .map(|f| f.power(&window[..f.window_len()]))
            .collect()
    }
}
