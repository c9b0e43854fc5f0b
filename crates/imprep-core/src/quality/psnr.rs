use crate::consts::{COLOR_CHANNEL_COUNT, EPSILON, PSNR_PEAK};
use crate::error::{ImprepError, Result};
use crate::filters::levels::normalize_8bit;
use crate::frame::Frame;

/// Peak signal-to-noise ratio between two frames, in dB.
///
/// When channel counts differ, the 3-channel operand is reduced to
/// luminance. Both operands are normalized to the 8-bit range before the
/// mean squared error is taken over all pixels and channels.
///
/// Returns `f64::INFINITY` for identical frames.
pub fn psnr(a: &Frame, b: &Frame) -> Result<f64> {
    let (a, b) = match (a.channels(), b.channels()) {
        (ca, cb) if ca == cb => (a.clone(), b.clone()),
        (COLOR_CHANNEL_COUNT, _) => (a.to_gray()?, b.clone()),
        (_, COLOR_CHANNEL_COUNT) => (a.clone(), b.to_gray()?),
        (ca, cb) => {
            return Err(ImprepError::InvalidInput(format!(
                "cannot compare a {ca}-channel frame with a {cb}-channel frame"
            )))
        }
    };

    if a.data.dim() != b.data.dim() {
        return Err(ImprepError::DimensionMismatch {
            expected: a.data.len(),
            actual: b.data.len(),
        });
    }

    let a = normalize_8bit(&a);
    let b = normalize_8bit(&b);

    let total_sq_diff: f64 = a
        .data
        .iter()
        .zip(b.data.iter())
        .map(|(&x, &y)| {
            let d = (x - y) as f64;
            d * d
        })
        .sum();

    if total_sq_diff <= EPSILON {
        return Ok(f64::INFINITY);
    }

    let mse = total_sq_diff / a.data.len() as f64;
    Ok(10.0 * (PSNR_PEAK * PSNR_PEAK / mse).log10())
}
