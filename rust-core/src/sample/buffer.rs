//! Sample buffers
//!
//! A bucket of `n` complex samples collected at a rate of `r` samples per
//! second, so `n / r` seconds worth of signal. Transforms and filters never
//! resize a buffer, they hand back a newly allocated one.

use num_complex::Complex64;

use crate::error::{DspError, DspResult};

/// What the samples in a buffer represent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleKind {
    #[default]
    Unknown,
    /// Complex FFT output around a center frequency
    Fft,
    /// FFT output computed from directly sampled (real) data
    RealFft,
    Dft,
    /// Signal with in-phase data only
    RealSignal,
    /// Signal with both in-phase and quadrature data
    Signal,
    Custom,
}

/// Complex sample buffer with the metadata plotting code needs
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Smallest magnitude seen since the extrema were last reset
    pub sample_min: f64,

    /// Largest magnitude seen since the extrema were last reset
    pub sample_max: f64,

    /// Lowest frequency represented (Hz)
    pub min_freq: f64,

    /// Highest frequency represented (Hz)
    pub max_freq: f64,

    /// Center frequency for spectra (Hz)
    pub center_freq: f64,

    pub kind: SampleKind,

    sample_rate: u32,
    data: Vec<Complex64>,
}

impl SampleBuffer {
    /// Allocate a zero-filled buffer of `n` samples at `sample_rate` Hz
    ///
    /// The frequency range starts out inverted (`min_freq = r`,
    /// `max_freq = 0`) so that any real signal overrides it.
    pub fn allocate(n: usize, sample_rate: u32) -> DspResult<Self> {
        if n == 0 {
            return Err(DspError::InvalidParameter(
                "buffer length must be at least one sample".into(),
            ));
        }
        if sample_rate == 0 {
            return Err(DspError::InvalidParameter(
                "sample rate must be positive".into(),
            ));
        }
        Self::zeroed(n, sample_rate)
    }

    /// Allocate without the length check; filters use this for outputs
    /// that may legitimately hold no samples
    pub(crate) fn zeroed(n: usize, sample_rate: u32) -> DspResult<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|_| DspError::AllocationFailure { samples: n })?;
        data.resize(n, Complex64::new(0.0, 0.0));

        log::trace!("allocated {} samples at {} Hz", n, sample_rate);

        Ok(Self {
            sample_min: 0.0,
            sample_max: 0.0,
            min_freq: sample_rate as f64,
            max_freq: 0.0,
            center_freq: 0.0,
            kind: SampleKind::Unknown,
            sample_rate,
            data,
        })
    }

    /// Build a buffer around existing samples
    pub fn from_samples(samples: &[Complex64], sample_rate: u32, kind: SampleKind) -> DspResult<Self> {
        let mut buf = Self::allocate(samples.len(), sample_rate)?;
        buf.data.copy_from_slice(samples);
        buf.kind = kind;
        buf.recompute_extrema();
        Ok(buf)
    }

    /// Build a real-only signal buffer (quadrature channel zero)
    pub fn from_real(samples: &[f64], sample_rate: u32) -> DspResult<Self> {
        let mut buf = Self::allocate(samples.len(), sample_rate)?;
        for (i, &s) in samples.iter().enumerate() {
            buf.set(i, Complex64::new(s, 0.0));
        }
        buf.kind = SampleKind::RealSignal;
        Ok(buf)
    }

    /// Give the buffer back; storage is freed here
    pub fn release(self) {
        log::trace!("released {} samples", self.data.len());
    }

    /// Zero every sample, leaving metadata untouched
    pub fn clear(&mut self) {
        self.data.fill(Complex64::new(0.0, 0.0));
    }

    /// Fold the magnitude of `data[index]` into the running extrema
    ///
    /// # Panics
    /// Panics if `index >= n`.
    #[inline]
    pub fn update_extrema(&mut self, index: usize) {
        let mag = self.data[index].norm();
        self.sample_min = self.sample_min.min(mag);
        self.sample_max = self.sample_max.max(mag);
    }

    pub fn reset_extrema(&mut self) {
        self.sample_min = 0.0;
        self.sample_max = 0.0;
    }

    /// Reset the extrema and fold in every sample
    pub fn recompute_extrema(&mut self) {
        self.reset_extrema();
        for i in 0..self.data.len() {
            self.update_extrema(i);
        }
    }

    /// Write one sample and keep the extrema current
    #[inline]
    pub fn set(&mut self, index: usize, value: Complex64) {
        self.data[index] = value;
        self.update_extrema(index);
    }

    /// Number of samples (`n`)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Only filter outputs that completed no output period are empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample rate (`r`) in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Mutable view of the samples
    ///
    /// Callers writing through this slice are responsible for calling
    /// [`update_extrema`](Self::update_extrema) or
    /// [`recompute_extrema`](Self::recompute_extrema) afterwards.
    pub fn data_mut(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Magnitude |x[k]| of every sample
    pub fn magnitudes(&self) -> Vec<f64> {
        self.data.iter().map(|c| c.norm()).collect()
    }

    /// Frequency (Hz) that bin `k` represents in a spectrum buffer
    ///
    /// DFT bins are centered in their slice of the range, FFT bins start
    /// at their slice's lower edge.
    pub fn bin_frequency(&self, k: usize) -> f64 {
        let step = (self.max_freq - self.min_freq) / self.data.len() as f64;
        match self.kind {
            SampleKind::Dft => self.min_freq + (k as f64 + 0.5) * step,
            _ => self.min_freq + k as f64 * step,
        }
    }

    /// Width of one bin in Hz
    pub fn bin_width(&self) -> f64 {
        (self.max_freq - self.min_freq) / self.data.len() as f64
    }
}
