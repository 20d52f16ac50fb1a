//! Discrete Fourier transform over an arbitrary frequency range
//!
//! Works for any number of bins (the FFT requires a power of 2) and any
//! frequency range. Each bin correlates the input against a complex
//! exponential at the bin's center frequency. The exponential is advanced
//! by repeated multiplication with a precomputed rotation, so each bin costs
//! one sin/cos pair instead of one per sample.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{DspError, DspResult};
use crate::filters::windows::WindowType;
use crate::sample::{SampleBuffer, SampleKind};

/// Compute a DFT of `input` with `bins` bins spanning `[freq_start, freq_end]`
///
/// Bin `k` analyses `freq_start + (k + 0.5) * (freq_end - freq_start) / bins`.
/// Every bin integrates over exactly one second of input (`r` samples,
/// where `r` is the input's sample rate) regardless of `bins`; samples past
/// the end of the buffer count as zero and samples past one second are not
/// used. The window is evaluated across that one-second span.
///
/// # Errors
/// [`DspError::InvalidParameter`] when `bins` is 0 or either frequency is
/// not finite.
pub fn compute_dft(
    input: &SampleBuffer,
    bins: usize,
    freq_start: f64,
    freq_end: f64,
    window: WindowType,
) -> DspResult<SampleBuffer> {
    if bins == 0 {
        return Err(DspError::InvalidParameter("DFT needs at least one bin".into()));
    }
    if !freq_start.is_finite() || !freq_end.is_finite() {
        return Err(DspError::InvalidParameter(format!(
            "DFT frequency range [{}, {}] is not finite",
            freq_start, freq_end
        )));
    }

    let rate = input.sample_rate();
    let span = rate as usize;
    if (freq_end - freq_start).abs() > rate as f64 {
        log::warn!(
            "dft: range [{}, {}] Hz is wider than the {} Hz sample rate, bins will alias",
            freq_start,
            freq_end,
            rate
        );
    }
    log::debug!(
        "dft: {} bins over [{}, {}] Hz, integrating {} samples, {} window",
        bins,
        freq_start,
        freq_end,
        span,
        window.name()
    );

    let mut result = SampleBuffer::allocate(bins, rate)?;
    result.kind = SampleKind::Dft;
    result.min_freq = freq_start;
    result.max_freq = freq_end;
    result.center_freq = (freq_start + freq_end) / 2.0;

    // Zero samples contribute nothing, so stop at the end of the data
    let samples = &input.data()[..input.len().min(span)];
    let weights: Vec<f64> = (0..samples.len())
        .map(|t| window.coefficient(t, span))
        .collect();

    let step = (freq_end - freq_start) / bins as f64;
    for k in 0..bins {
        let freq = freq_start + (k as f64 + 0.5) * step;
        let rotation = Complex64::from_polar(1.0, -2.0 * PI * freq / rate as f64);

        let mut root = Complex64::new(1.0, 0.0);
        let mut sum = Complex64::new(0.0, 0.0);
        for (&sample, &w) in samples.iter().zip(&weights) {
            sum += sample * w * root;
            root *= rotation;
        }
        result.set(k, sum);
    }

    Ok(result)
}
