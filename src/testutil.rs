//! Synthetic signals and WAV fixtures shared by the unit tests.

use std::f64::consts::PI;
use std::path::PathBuf;

pub fn sine(freq: f64, amplitude: f64, sample_rate: u32, len: usize) -> Vec<f64> {
    let w = 2.0 * PI * freq / sample_rate as f64;
    (0..len).map(|t| amplitude * (w * t as f64).sin()).collect()
}

/// Quantizes normalized samples the way a 16-bit writer would.
pub fn to_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s * 32768.0).clamp(i16::MIN as f64, i16::MAX as f64) as i16)
        .collect()
}

pub fn write_wav(
    name: &str,
    channels: u16,
    bits_per_sample: u16,
    sample_rate: u32,
    samples: &[i16],
) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "findnotes-{}-{}.wav",
        name,
        std::process::id()
    ));
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for &s in samples {
        if bits_per_sample == 8 {
            writer.write_sample(s as i8).unwrap();
        } else {
            writer.write_sample(s).unwrap();
        }
    }
    writer.finalize().unwrap();
    path
}
