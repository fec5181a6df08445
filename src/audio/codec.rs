// Canonical PCM WAV codec (44-byte header, 16-bit little-endian samples).
//
// Encoding is a pure function of the buffer: identical input always yields
// identical bytes, so the output can be compared byte-for-byte by other WAV
// readers. Decoding only accepts the same canonical layout this encoder
// produces and classifies every rejection.

use thiserror::Error;

use super::buffer::SampleBuffer;

/// Size of the canonical RIFF/WAVE/fmt/data header, in bytes.
pub const HEADER_LEN: usize = 44;

const PCM_FORMAT: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: usize = 2;

/// Why a byte stream was rejected by [`decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A chunk signature is missing or wrong, or the header is incomplete.
    #[error("malformed WAV header: {0}")]
    MalformedHeader(&'static str),

    /// The header declares more sample data than the stream contains.
    #[error("WAV data truncated: header declares {declared} bytes but only {available} remain")]
    TruncatedData { declared: usize, available: usize },

    /// Structurally valid WAV, but not 16-bit integer PCM.
    #[error("unsupported WAV encoding: format {audio_format}, {bits_per_sample} bits per sample")]
    UnsupportedFormat {
        audio_format: u16,
        bits_per_sample: u16,
    },
}

/// Serialize a buffer into canonical WAV bytes.
///
/// Output length is exactly `44 + samples.len() * 2`. Samples are converted
/// with `round(s * 32767)` clamped to the i16 range, so out-of-range input
/// clips instead of wrapping.
pub fn encode(buffer: &SampleBuffer) -> Vec<u8> {
    let data_len = (buffer.samples.len() * BYTES_PER_SAMPLE) as u32;
    let byte_rate = buffer.sample_rate * buffer.channels as u32 * BYTES_PER_SAMPLE as u32;
    let block_align = buffer.channels * BYTES_PER_SAMPLE as u16;

    let mut bytes = Vec::with_capacity(HEADER_LEN + data_len as usize);

    // RIFF chunk
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(HEADER_LEN as u32 + data_len - 8).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    bytes.extend_from_slice(&buffer.channels.to_le_bytes());
    bytes.extend_from_slice(&buffer.sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // data sub-chunk
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for &sample in &buffer.samples {
        bytes.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }

    bytes
}

/// Parse canonical WAV bytes back into a buffer.
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::MalformedHeader("header shorter than 44 bytes"));
    }

    if &bytes[0..4] != b"RIFF" {
        return Err(DecodeError::MalformedHeader("missing RIFF signature"));
    }
    if &bytes[8..12] != b"WAVE" {
        return Err(DecodeError::MalformedHeader("missing WAVE signature"));
    }
    if &bytes[12..16] != b"fmt " {
        return Err(DecodeError::MalformedHeader("missing fmt chunk"));
    }
    if &bytes[36..40] != b"data" {
        return Err(DecodeError::MalformedHeader("missing data chunk"));
    }

    let audio_format = read_u16(bytes, 20);
    let bits_per_sample = read_u16(bytes, 34);
    if audio_format != PCM_FORMAT || bits_per_sample != BITS_PER_SAMPLE {
        return Err(DecodeError::UnsupportedFormat {
            audio_format,
            bits_per_sample,
        });
    }

    let channels = read_u16(bytes, 22);
    if channels == 0 {
        return Err(DecodeError::MalformedHeader("zero channel count"));
    }
    let sample_rate = read_u32(bytes, 24);

    let declared = read_u32(bytes, 40) as usize;
    let available = bytes.len() - HEADER_LEN;
    if declared > available {
        return Err(DecodeError::TruncatedData {
            declared,
            available,
        });
    }

    let samples: Vec<f32> = bytes[HEADER_LEN..HEADER_LEN + declared]
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32767.0)
        .collect();

    Ok(SampleBuffer::new(samples, channels, sample_rate))
}

fn sample_to_i16(sample: f32) -> i16 {
    (sample * 32767.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
