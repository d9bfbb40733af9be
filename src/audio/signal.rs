use super::decode::PcmAudio;
use crate::error::DetectError;

/// Full-scale divisor for signed 16-bit PCM.
const I16_SCALE: f64 = 32768.0;

/// Mono signal normalized to roughly [-1, 1].
#[derive(Clone, Debug)]
pub struct AudioSignal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioSignal {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, DetectError> {
        if sample_rate == 0 {
            return Err(DetectError::InvalidSampleRate);
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Validates the decoded layout (mono, 2-byte samples) and normalizes.
    pub fn from_pcm(pcm: &PcmAudio) -> Result<Self, DetectError> {
        pcm.check_format()?;
        let samples = pcm
            .samples
            .iter()
            .map(|&s| s as f64 / I16_SCALE)
            .collect();
        Self::new(samples, pcm.sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm(channels: u16, sample_width: u16, samples: Vec<i16>) -> PcmAudio {
        PcmAudio {
            samples,
            sample_rate: 48_000,
            channels,
            sample_width,
        }
    }

    #[test]
    fn normalizes_by_full_scale() {
        let signal = AudioSignal::from_pcm(&pcm(1, 2, vec![0, 16384, -32768])).unwrap();
        assert_eq!(signal.samples(), &[0.0, 0.5, -1.0]);
        assert_eq!(signal.sample_rate(), 48_000);
    }

    #[test]
    fn rejects_stereo() {
        let err = AudioSignal::from_pcm(&pcm(2, 2, vec![0; 8])).unwrap_err();
        assert_eq!(
            err,
            DetectError::UnsupportedFormat {
                channels: 2,
                sample_width: 2
            }
        );
    }

    #[test]
    fn rejects_wrong_sample_width() {
        let err = AudioSignal::from_pcm(&pcm(1, 3, vec![0; 8])).unwrap_err();
        assert!(matches!(err, DetectError::UnsupportedFormat { sample_width: 3, .. }));
    }

    #[test]
    fn rejects_zero_rate() {
        assert_eq!(
            AudioSignal::new(vec![0.0], 0).unwrap_err(),
            DetectError::InvalidSampleRate
        );
    }
}
