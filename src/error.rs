use thiserror::Error;

/// Failures raised by the detector pipeline.
///
/// Configuration and format errors are reported eagerly, before any window is
/// scanned. `ResponseLength` means a window was cut to the wrong size and is
/// never expected in a correctly configured run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    #[error("invalid key range: low key {low} is above high key {high}")]
    InvalidKeyRange { low: i32, high: i32 },

    #[error("key {key} is outside the supported range {min}..={max}")]
    KeyOutOfRange { key: i32, min: i32, max: i32 },

    #[error("window length must be at least one sample, got {samples}")]
    InvalidWindowLength { samples: usize },

    #[error("window of {seconds:.3}s exceeds the {max_seconds}s limit")]
    WindowTooLong { seconds: f64, max_seconds: f64 },

    #[error("window policy parameter must be a positive number, got {0}")]
    InvalidWindowParameter(f64),

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("detector was built for {expected}Hz audio but the signal is {actual}Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("noise threshold must be a non-negative number, got {0}")]
    InvalidThreshold(f64),

    #[error(
        "unsupported audio format: {channels} channel(s) with {sample_width}-byte samples \
         (expected mono 16-bit)"
    )]
    UnsupportedFormat { channels: u16, sample_width: u16 },

    #[error("filter expects windows of {expected} samples, got {actual}")]
    ResponseLength { expected: usize, actual: usize },
}
