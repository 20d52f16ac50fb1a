//! Radix-2 FFT engine
//!
//! Iterative decimation-in-time transform for power-of-two bin counts, plus
//! an inverse computed with the forward transform.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{DspError, DspResult};
use crate::filters::windows::WindowType;
use crate::sample::{SampleBuffer, SampleKind};

/// Reverse the low `bits` bits of `i`
#[inline]
fn reflect(i: usize, bits: u32) -> usize {
    if bits == 0 {
        0
    } else {
        i.reverse_bits() >> (usize::BITS - bits)
    }
}

/// Combine 1-bin DFTs into 2-bin DFTs, 2-bin into 4-bin, and so on until
/// one `n`-bin DFT remains. Input must already be in bit-reversed order.
fn butterflies(x: &mut [Complex64]) {
    let n = x.len();
    let mut span = 2;

    while span <= n {
        let half = span / 2;

        // Multiplying by the unit root increment `half` times walks the
        // unit root halfway around the circle.
        let uri = Complex64::from_polar(1.0, -PI / half as f64);
        let mut ur = Complex64::new(1.0, 0.0);

        for j in 0..half {
            for k in (j..n).step_by(span) {
                let alpha = x[k + half] * ur;
                // x[k + half] must be written before x[k] changes
                x[k + half] = x[k] - alpha;
                x[k] += alpha;
            }
            ur *= uri;
        }
        span <<= 1;
    }
}

/// Compute the FFT of `input` in `bins` bins
///
/// Shorthand for [`compute_fft_centered`] with a center of 0, i.e. directly
/// sampled data covering 0 Hz to the sample rate.
pub fn compute_fft(input: &SampleBuffer, bins: usize, window: WindowType) -> DspResult<SampleBuffer> {
    compute_fft_centered(input, bins, window, 0.0)
}

/// Compute the FFT of `input` in `bins` bins
///
/// Samples past the end of `input` are treated as zero; samples past
/// `bins` are ignored. The window is evaluated at each sample's original
/// (not bit-reversed) position.
///
/// # Arguments
/// * `bins` - Number of output bins, must be a power of two
/// * `window` - Window applied while loading the samples
/// * `center` - Center frequency of the data in Hz. 0 tags the result as a
///   real FFT spanning `[0, r]`, anything else as a complex FFT spanning
///   `[center - r/2, center + r/2]`
///
/// # Errors
/// [`DspError::InvalidBinCount`] when `bins` is not a power of two. Nothing
/// is allocated in that case.
pub fn compute_fft_centered(
    input: &SampleBuffer,
    bins: usize,
    window: WindowType,
    center: f64,
) -> DspResult<SampleBuffer> {
    if !bins.is_power_of_two() {
        return Err(DspError::InvalidBinCount(bins));
    }
    let bits = bins.trailing_zeros();
    let rate = input.sample_rate();
    let half_span = rate as f64 / 2.0;

    log::debug!(
        "fft: {} samples -> {} bins ({} stages), {} window",
        input.len(),
        bins,
        bits,
        window.name()
    );

    let mut result = SampleBuffer::allocate(bins, rate)?;
    result.center_freq = center;
    if center == 0.0 {
        result.kind = SampleKind::RealFft;
        result.min_freq = 0.0;
        result.max_freq = 2.0 * half_span;
    } else {
        result.kind = SampleKind::Fft;
        result.min_freq = center - half_span;
        result.max_freq = center + half_span;
    }

    // Sort into place rather than in place so the source survives
    let src = input.data();
    for (i, slot) in result.data_mut().iter_mut().enumerate() {
        let k = reflect(i, bits);
        let sample = src.get(k).copied().unwrap_or_default();
        *slot = sample * window.coefficient(k, bins);
    }

    butterflies(result.data_mut());
    result.recompute_extrema();

    Ok(result)
}

/// Compute the inverse FFT of a spectrum buffer
///
/// Runs the forward transform a second time and unscrambles the result:
/// bins 0 and N/2 are divided by N, every other bin `k` trades places with
/// bin `N - k` and is divided by N. The spectrum's length must be a power
/// of two.
pub fn compute_ifft(spectrum: &SampleBuffer) -> DspResult<SampleBuffer> {
    let n = spectrum.len();
    let mut res = compute_fft(spectrum, n, WindowType::Rectangular)?;

    let scale = n as f64;
    let data = res.data_mut();
    data[0] /= scale;
    if n > 1 {
        data[n / 2] /= scale;
    }
    for k in 1..n / 2 {
        let td = data[k] / scale;
        data[k] = data[n - k] / scale;
        data[n - k] = td;
    }

    res.kind = SampleKind::Signal;
    res.center_freq = 0.0;
    res.min_freq = res.sample_rate() as f64;
    res.max_freq = 0.0;
    res.recompute_extrema();

    Ok(res)
}

/// Fixed-size FFT engine
///
/// Validates the bin count once so repeated transforms of the same shape
/// cannot fail on it.
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// FFT size (number of bins)
    bins: usize,

    window: WindowType,

    /// Center frequency tagged onto results (0 = directly sampled data)
    center_freq: f64,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `bins` - FFT size, must be a power of two
    /// * `window` - Window applied to every forward transform
    pub fn new(bins: usize, window: WindowType) -> DspResult<Self> {
        if !bins.is_power_of_two() {
            return Err(DspError::InvalidBinCount(bins));
        }
        Ok(Self {
            bins,
            window,
            center_freq: 0.0,
        })
    }

    pub fn with_center(mut self, center_freq: f64) -> Self {
        self.center_freq = center_freq;
        self
    }

    /// Forward transform
    pub fn forward(&self, input: &SampleBuffer) -> DspResult<SampleBuffer> {
        compute_fft_centered(input, self.bins, self.window, self.center_freq)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::FftPlanner;

    fn test_signal(n: usize) -> Vec<Complex64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                Complex64::new((0.3 * t).sin() + 0.25 * t / n as f64, (0.7 * t).cos() * 0.5)
            })
            .collect()
    }

    fn reference_fft(samples: &[Complex64], bins: usize) -> Vec<Complex64> {
        let mut buffer = samples.to_vec();
        buffer.resize(bins, Complex64::new(0.0, 0.0));
        FftPlanner::<f64>::new()
            .plan_fft_forward(bins)
            .process(&mut buffer);
        buffer
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(0, 0), 0);
        assert_eq!(reflect(1, 3), 4);
        assert_eq!(reflect(3, 3), 6);
        assert_eq!(reflect(6, 4), 6);
        assert_eq!(reflect(1, 10), 512);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let buf = SampleBuffer::allocate(100, 1000).unwrap();
        for bins in [0, 3, 100, 1000, 1023] {
            assert_eq!(
                compute_fft(&buf, bins, WindowType::Rectangular),
                Err(DspError::InvalidBinCount(bins))
            );
        }
        assert!(FftEngine::new(48, WindowType::Hann).is_err());
    }

    #[test]
    fn test_impulse_is_flat() {
        let mut buf = SampleBuffer::allocate(64, 64).unwrap();
        buf.set(0, Complex64::new(1.0, 0.0));

        let fft = compute_fft(&buf, 64, WindowType::Rectangular).unwrap();
        assert!(fft.data().iter().all(|c| (c.norm() - 1.0).abs() < 1e-12));
        assert!((fft.sample_max - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_reference_fft() {
        let samples = test_signal(256);
        let buf = SampleBuffer::from_samples(&samples, 256, SampleKind::Signal).unwrap();

        let fft = compute_fft(&buf, 256, WindowType::Rectangular).unwrap();
        let expected = reference_fft(&samples, 256);

        for (a, b) in fft.data().iter().zip(&expected) {
            assert!((a - b).norm() < 1e-9, "{} vs {}", a, b);
        }
    }

    #[test]
    fn test_window_uses_original_index() {
        let samples = test_signal(128);
        let buf = SampleBuffer::from_samples(&samples, 1000, SampleKind::Signal).unwrap();

        let fft = compute_fft(&buf, 128, WindowType::Hann).unwrap();
        let windowed: Vec<Complex64> = samples
            .iter()
            .enumerate()
            .map(|(k, s)| *s * WindowType::Hann.coefficient(k, 128))
            .collect();
        let expected = reference_fft(&windowed, 128);

        for (a, b) in fft.data().iter().zip(&expected) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_zero_pads_short_input() {
        let samples = test_signal(20);
        let buf = SampleBuffer::from_samples(&samples, 100, SampleKind::Signal).unwrap();

        let fft = compute_fft(&buf, 32, WindowType::Rectangular).unwrap();
        let expected = reference_fft(&samples, 32);
        for (a, b) in fft.data().iter().zip(&expected) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn test_round_trip() {
        let samples = test_signal(12);
        let buf = SampleBuffer::from_samples(&samples, 48, SampleKind::Signal).unwrap();

        for bins in [16, 64] {
            let fft = compute_fft(&buf, bins, WindowType::Rectangular).unwrap();
            let back = compute_ifft(&fft).unwrap();

            assert_eq!(back.len(), bins);
            assert_eq!(back.kind, SampleKind::Signal);
            for (i, s) in back.data().iter().enumerate() {
                let expected = samples.get(i).copied().unwrap_or_default();
                assert!((s - expected).norm() < 1e-12, "bin {}: {} vs {}", i, s, expected);
            }
        }
    }

    #[test]
    fn test_single_bin() {
        let buf = SampleBuffer::from_samples(&[Complex64::new(2.0, -1.0)], 10, SampleKind::Signal)
            .unwrap();
        let fft = compute_fft(&buf, 1, WindowType::Rectangular).unwrap();
        assert_eq!(fft.data()[0], Complex64::new(2.0, -1.0));

        let back = compute_ifft(&fft).unwrap();
        assert_eq!(back.data()[0], Complex64::new(2.0, -1.0));
    }

    #[test]
    fn test_ifft_rejects_odd_sizes() {
        let buf = SampleBuffer::allocate(12, 12).unwrap();
        assert_eq!(compute_ifft(&buf), Err(DspError::InvalidBinCount(12)));
    }

    #[test]
    fn test_frequency_metadata() {
        let buf = SampleBuffer::allocate(16, 8000).unwrap();

        let real = compute_fft(&buf, 16, WindowType::Rectangular).unwrap();
        assert_eq!(real.kind, SampleKind::RealFft);
        assert_eq!(real.min_freq, 0.0);
        assert_eq!(real.max_freq, 8000.0);
        assert_eq!(real.bin_frequency(2), 1000.0);

        let engine = FftEngine::new(16, WindowType::Rectangular)
            .unwrap()
            .with_center(100_000.0);
        let iq = engine.forward(&buf).unwrap();
        assert_eq!(iq.kind, SampleKind::Fft);
        assert_eq!(iq.min_freq, 96_000.0);
        assert_eq!(iq.max_freq, 104_000.0);
        assert_eq!(iq.bin_width(), 500.0);
    }

    #[test]
    fn test_input_is_untouched() {
        let samples = test_signal(32);
        let buf = SampleBuffer::from_samples(&samples, 32, SampleKind::Signal).unwrap();
        let before = buf.clone();
        let _ = compute_fft(&buf, 32, WindowType::BlackmanHarris).unwrap();
        assert_eq!(buf, before);
    }
}
