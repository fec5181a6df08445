// Trailing-silence trimming for pre-allocated capture buffers.
//
// A capture buffer is always sized for the maximum recording duration; when
// the user stops early, only the proportional prefix was actually recorded
// and the rest is silence. The retained count is the fraction of elapsed
// time over maximum duration.

use tracing::debug;

use super::buffer::SampleBuffer;
use crate::error::RecorderError;

/// Discard the unrecorded tail of `buffer`.
///
/// Retains `floor(len * elapsed / max)` samples, rounded down to a whole
/// frame so the channel interleave survives. A recording that ran to
/// completion (retained count within one sample of the full length) is
/// returned unchanged.
pub fn trim_trailing_silence(
    buffer: &SampleBuffer,
    elapsed_secs: f32,
    max_duration_secs: u32,
) -> Result<SampleBuffer, RecorderError> {
    if max_duration_secs == 0 {
        return Err(RecorderError::InvalidDuration);
    }

    let total = buffer.samples.len();
    let fraction = elapsed_secs.max(0.0) / max_duration_secs as f32;
    let mut retained = (total as f64 * fraction as f64) as usize;

    if retained + 1 >= total {
        // Ran the full duration, nothing to cut.
        return Ok(buffer.clone());
    }

    // Keep whole frames only.
    retained -= retained % buffer.channels.max(1) as usize;

    debug!(
        "Trimming capture buffer: {} of {} samples retained ({:.1}s of {}s)",
        retained, total, elapsed_secs, max_duration_secs
    );

    Ok(SampleBuffer::new(
        buffer.samples[..retained].to_vec(),
        buffer.channels,
        buffer.sample_rate,
    ))
}
