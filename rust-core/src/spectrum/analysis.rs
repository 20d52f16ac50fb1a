//! High-level spectrum analyzer
//!
//! Picks the FFT for power-of-two bin counts and falls back to the DFT for
//! anything else, with optional amplitude correction for the window.

use super::dft::compute_dft;
use super::fft::FftEngine;
use super::windowing::window_correction_factor;
use crate::error::{DspError, DspResult};
use crate::filters::windows::WindowType;
use crate::sample::SampleBuffer;

/// Floor applied to magnitudes before taking the log
const MAGNITUDE_FLOOR: f64 = 1e-10;

/// Spectrum analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Number of output bins; powers of 2 take the FFT path
    pub bins: usize,

    /// Window type for spectral analysis
    pub window: WindowType,

    /// Center frequency of the data in Hz (0 = directly sampled)
    pub center_freq: f64,

    /// Apply amplitude correction for windowing
    pub apply_correction: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            bins: 1024,
            window: WindowType::BlackmanHarris,
            center_freq: 0.0,
            apply_correction: true,
        }
    }
}

/// Spectrum analyzer over sample buffers
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,

    /// Present only when `bins` is a power of 2
    fft_engine: Option<FftEngine>,
}

impl SpectrumAnalyzer {
    /// Create new spectrum analyzer
    pub fn new(config: AnalyzerConfig) -> DspResult<Self> {
        let fft_engine = Self::engine_for(&config)?;
        Ok(Self { config, fft_engine })
    }

    fn engine_for(config: &AnalyzerConfig) -> DspResult<Option<FftEngine>> {
        if config.bins == 0 {
            return Err(DspError::InvalidParameter(
                "analyzer needs at least one bin".into(),
            ));
        }
        if !config.center_freq.is_finite() {
            return Err(DspError::InvalidParameter(format!(
                "center frequency {} is not finite",
                config.center_freq
            )));
        }
        if config.bins.is_power_of_two() {
            Ok(Some(
                FftEngine::new(config.bins, config.window)?.with_center(config.center_freq),
            ))
        } else {
            log::debug!("analyzer: {} bins is not a power of 2, using the DFT", config.bins);
            Ok(None)
        }
    }

    /// Frequency range `[lo, hi]` covered at the given sample rate
    fn span(&self, sample_rate: u32) -> (f64, f64) {
        let r = sample_rate as f64;
        if self.config.center_freq == 0.0 {
            (0.0, r)
        } else {
            (self.config.center_freq - r / 2.0, self.config.center_freq + r / 2.0)
        }
    }

    /// Analyze signal and return its spectrum
    ///
    /// The result carries the bin frequencies in its metadata. With
    /// correction on, every bin is divided by the window's coherent gain so
    /// an on-bin tone reads the same under any window.
    pub fn analyze(&self, signal: &SampleBuffer) -> DspResult<SampleBuffer> {
        let rate = signal.sample_rate();
        let (mut spectrum, window_len) = match &self.fft_engine {
            Some(engine) => (engine.forward(signal)?, self.config.bins),
            None => {
                let (lo, hi) = self.span(rate);
                let dft = compute_dft(signal, self.config.bins, lo, hi, self.config.window)?;
                (dft, rate as usize)
            }
        };

        if self.config.apply_correction && self.config.window != WindowType::Rectangular {
            let factor = window_correction_factor(self.config.window, window_len);
            for s in spectrum.data_mut() {
                *s *= factor;
            }
            spectrum.recompute_extrema();
        }

        Ok(spectrum)
    }

    /// Analyze and return magnitude in dB relative to `reference`
    pub fn analyze_db(&self, signal: &SampleBuffer, reference: f64) -> DspResult<Vec<f64>> {
        Ok(magnitude_db(&self.analyze(signal)?, reference))
    }

    /// Get frequency bins in Hz for data at `sample_rate`
    pub fn frequency_bins_hz(&self, sample_rate: u32) -> Vec<f64> {
        let (lo, hi) = self.span(sample_rate);
        let step = (hi - lo) / self.config.bins as f64;
        let offset = if self.uses_fft() { 0.0 } else { 0.5 };
        (0..self.config.bins)
            .map(|k| lo + (k as f64 + offset) * step)
            .collect()
    }

    /// Update configuration
    ///
    /// On error the previous configuration stays in effect.
    pub fn update_config(&mut self, config: AnalyzerConfig) -> DspResult<()> {
        self.fft_engine = Self::engine_for(&config)?;
        self.config = config;
        Ok(())
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn uses_fft(&self) -> bool {
        self.fft_engine.is_some()
    }

    /// Get number of frequency bins
    pub fn num_bins(&self) -> usize {
        self.config.bins
    }
}

/// Magnitude of every bin in dB, `20·log10(|X| / reference)`
///
/// Magnitudes are floored at 1e-10 so silent bins stay finite.
pub fn magnitude_db(spectrum: &SampleBuffer, reference: f64) -> Vec<f64> {
    spectrum
        .data()
        .iter()
        .map(|c| 20.0 * (c.norm().max(MAGNITUDE_FLOOR) / reference).log10())
        .collect()
}
