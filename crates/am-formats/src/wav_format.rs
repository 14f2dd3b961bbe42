//! WAV encoding and decoding for 16-bit PCM audio.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use am_dsp::EncodedBuffer;

use crate::FormatError;

// --- Reading ---

/// Load a WAV file from disk into a playback-ready buffer.
pub fn load_wav(path: impl AsRef<Path>) -> Result<EncodedBuffer, FormatError> {
    let file = File::open(path.as_ref()).map_err(|e| FormatError::Io(e.to_string()))?;
    decode_wav(BufReader::new(file))
}

/// Decode a WAV stream. Samples are kept interleaved, exactly as stored.
pub fn decode_wav<R: Read>(reader: R) -> Result<EncodedBuffer, FormatError> {
    let mut reader = hound::WavReader::new(reader)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(FormatError::Unsupported {
            bits: spec.bits_per_sample,
            float: spec.sample_format == hound::SampleFormat::Float,
        });
    }

    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<i16>, hound::Error>>()?;

    log::debug!(
        "Decoded WAV: {} ch @ {}Hz, {} samples",
        spec.channels,
        spec.sample_rate,
        samples.len()
    );
    Ok(EncodedBuffer::new(samples, spec.channels, spec.sample_rate))
}

// --- Writing ---

/// Write `buffer` as 16-bit PCM WAV.
pub fn write_wav(path: impl AsRef<Path>, buffer: &EncodedBuffer) -> Result<(), FormatError> {
    let spec = hound::WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path.as_ref(), spec)?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
