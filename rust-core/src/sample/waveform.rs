//! Test waveform generation
//!
//! Adds periodic basis functions into a sample buffer at a given frequency,
//! amplitude and phase. Analytic signals carry a quadrature channel that
//! lags the in-phase channel by a quarter period (90 degrees).

use num_complex::Complex64;
use std::f64::consts::PI;

use super::buffer::{SampleBuffer, SampleKind};

/// Periodic basis function shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// a·cos(θ), spans ±a
    Cosine,
    /// Spans ±a/2 so there is no DC component
    Triangle,
    /// Rising ramp from -a/2 to +a/2
    Sawtooth,
    /// -a/2 for the first half period, +a/2 for the second
    Square,
}

/// Whether a generator writes both channels or only in-phase data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignalMode {
    /// I/Q data, quadrature lags in-phase by 90 degrees
    #[default]
    Analytic,
    /// In-phase only, quadrature left untouched
    Real,
}

/// Fractional position within the current period, in [0, 1)
#[inline]
fn period_index(t: usize, sample_rate: u32, freq: f64, phase: f64) -> f64 {
    let p = t as f64 * freq / sample_rate as f64 + phase / (2.0 * PI);
    p - p.floor()
}

/// Triangle over one period: 0 → 0.5 → -0.5 → 0
fn triangle(p: f64) -> f64 {
    if p < 0.25 {
        p * 2.0
    } else if p < 0.75 {
        0.5 - (p - 0.25) * 2.0
    } else {
        -0.5 + (p - 0.75) * 2.0
    }
}

impl Waveform {
    /// Channel value at period index `p` for amplitude `a`
    pub fn value(self, p: f64, a: f64) -> f64 {
        match self {
            Waveform::Cosine => a * (2.0 * PI * p).cos(),
            Waveform::Triangle => a * triangle(p),
            Waveform::Sawtooth => a * (p - 0.5),
            Waveform::Square => {
                if p >= 0.5 {
                    a / 2.0
                } else {
                    -a / 2.0
                }
            }
        }
    }

    /// Complex sample for this shape at period index `p`
    fn sample(self, p: f64, a: f64, mode: SignalMode) -> Complex64 {
        match mode {
            SignalMode::Analytic => {
                let q = (p - 0.25).rem_euclid(1.0);
                Complex64::new(self.value(p, a), self.value(q, a))
            }
            SignalMode::Real => Complex64::new(self.value(p, a), 0.0),
        }
    }
}

/// Add a waveform into every sample of `buf`
///
/// # Arguments
/// * `freq` - Frequency in Hz
/// * `amplitude` - Peak amplitude (see [`Waveform`] for each shape's span)
/// * `phase` - Starting phase in radians
/// * `mode` - Analytic (I/Q) or real-only output
pub fn add_waveform(
    buf: &mut SampleBuffer,
    waveform: Waveform,
    freq: f64,
    amplitude: f64,
    phase: f64,
    mode: SignalMode,
) {
    let rate = buf.sample_rate();
    for t in 0..buf.len() {
        let p = period_index(t, rate, freq, phase);
        let value = buf.data()[t] + waveform.sample(p, amplitude, mode);
        buf.set(t, value);
    }

    buf.kind = match (mode, buf.kind) {
        (SignalMode::Analytic, _) | (SignalMode::Real, SampleKind::Signal) => SampleKind::Signal,
        (SignalMode::Real, _) => SampleKind::RealSignal,
    };
}

/// Add an analytic cosine, a·e^(iθ)
pub fn add_cos(buf: &mut SampleBuffer, freq: f64, amplitude: f64, phase: f64) {
    add_waveform(buf, Waveform::Cosine, freq, amplitude, phase, SignalMode::Analytic);
}

/// Add a real cosine, a·cos(θ)
pub fn add_cos_real(buf: &mut SampleBuffer, freq: f64, amplitude: f64, phase: f64) {
    add_waveform(buf, Waveform::Cosine, freq, amplitude, phase, SignalMode::Real);
}

/// Multiply the buffer by a cosine (frequency translation)
///
/// Analytic mode multiplies by a·e^(iθ), shifting the whole spectrum up by
/// `freq`. Real mode multiplies by a·cos(θ), producing both sum and
/// difference images.
pub fn mix_cos(buf: &mut SampleBuffer, freq: f64, amplitude: f64, phase: f64, mode: SignalMode) {
    let rate = buf.sample_rate() as f64;
    buf.reset_extrema();
    for t in 0..buf.len() {
        let theta = 2.0 * PI * freq * t as f64 / rate + phase;
        let lo = match mode {
            SignalMode::Analytic => Complex64::from_polar(amplitude, theta),
            SignalMode::Real => Complex64::new(amplitude * theta.cos(), 0.0),
        };
        let value = buf.data()[t] * lo;
        buf.set(t, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_analytic_is_unit_circle() {
        let mut buf = SampleBuffer::allocate(64, 64).unwrap();
        add_cos(&mut buf, 4.0, 1.0, 0.0);

        assert_eq!(buf.kind, SampleKind::Signal);
        for (t, s) in buf.data().iter().enumerate() {
            let theta = 2.0 * PI * 4.0 * t as f64 / 64.0;
            assert!((s.re - theta.cos()).abs() < 1e-9);
            assert!((s.im - theta.sin()).abs() < 1e-9);
        }
        assert!((buf.sample_max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_real_cosine_leaves_quadrature() {
        let mut buf = SampleBuffer::allocate(32, 32).unwrap();
        add_cos_real(&mut buf, 2.0, 0.5, PI / 2.0);

        assert_eq!(buf.kind, SampleKind::RealSignal);
        assert!(buf.data().iter().all(|s| s.im == 0.0));
        // cos(π/2) at t = 0
        assert!(buf.data()[0].re.abs() < 1e-9);
    }

    #[test]
    fn test_square_and_sawtooth_have_no_dc() {
        for shape in [Waveform::Square, Waveform::Sawtooth, Waveform::Triangle] {
            let mut buf = SampleBuffer::allocate(100, 100).unwrap();
            add_waveform(&mut buf, shape, 5.0, 2.0, 0.0, SignalMode::Real);
            let mean: f64 = buf.data().iter().map(|s| s.re).sum::<f64>() / 100.0;
            assert!(mean.abs() < 0.1, "{:?} mean {}", shape, mean);
            assert!(buf.data().iter().all(|s| s.re.abs() <= 1.0 + 1e-12));
        }
    }

    #[test]
    fn test_triangle_quadrature_lags() {
        let mut buf = SampleBuffer::allocate(4, 4).unwrap();
        add_waveform(&mut buf, Waveform::Triangle, 1.0, 1.0, 0.0, SignalMode::Analytic);

        // Q at t is I at t - quarter period
        let d = buf.data();
        assert!((d[1].im - d[0].re).abs() < 1e-12);
        assert!((d[2].im - d[1].re).abs() < 1e-12);
    }

    #[test]
    fn test_mix_shifts_analytic_tone() {
        let mut buf = SampleBuffer::allocate(16, 16).unwrap();
        add_cos(&mut buf, 2.0, 1.0, 0.0);
        mix_cos(&mut buf, 3.0, 1.0, 0.0, SignalMode::Analytic);

        let theta = 2.0 * PI * 5.0 * 7.0 / 16.0;
        assert!((buf.data()[7].re - theta.cos()).abs() < 1e-9);
        assert!((buf.data()[7].im - theta.sin()).abs() < 1e-9);
    }
}
