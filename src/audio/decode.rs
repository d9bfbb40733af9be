use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CodecParameters, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::DetectError;

/// Raw interleaved PCM as it comes out of the container, before validation.
#[derive(Clone, Debug)]
pub struct PcmAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub channels: u16,
    /// Bytes per sample.
    pub sample_width: u16,
}

impl PcmAudio {
    pub fn check_format(&self) -> Result<(), DetectError> {
        check_layout(self.channels, self.sample_width)
    }
}

fn check_layout(channels: u16, sample_width: u16) -> Result<(), DetectError> {
    if channels != 1 || sample_width != 2 {
        return Err(DetectError::UnsupportedFormat {
            channels,
            sample_width,
        });
    }
    Ok(())
}

/// Channel count, sample rate and bytes per sample as declared by the header.
fn header_layout(params: &CodecParameters) -> Result<(u16, u32, u16)> {
    let channels = params.channels.context("Unknown channel layout")?.count() as u16;
    let sample_rate = params.sample_rate.context("Unknown sample rate")?;
    let bits = params.bits_per_sample.context("Unknown sample width")?;
    Ok((channels, sample_rate, bits.div_ceil(8) as u16))
}

pub fn decode_wav(path: &Path) -> Result<PcmAudio> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let (channels, sample_rate, sample_width) = header_layout(&track.codec_params)?;

    // The header alone is enough to reject a bad layout.
    check_layout(channels, sample_width)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut all_samples: Vec<i16> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<i16>::new(decoded.frames() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        all_samples.extend_from_slice(sample_buf.samples());
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.2}s",
        all_samples.len(),
        sample_rate,
        all_samples.len() as f32 / sample_rate as f32
    );

    Ok(PcmAudio {
        samples: all_samples,
        sample_rate,
        channels,
        sample_width,
    })
}
