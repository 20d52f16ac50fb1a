//! Spectral analysis with the FFT and DFT

pub mod fft;
pub mod dft;
pub mod windowing;
pub mod analysis;

pub use fft::{compute_fft, compute_fft_centered, compute_ifft, FftEngine};
pub use dft::compute_dft;
pub use windowing::apply_window;
pub use analysis::{magnitude_db, AnalyzerConfig, SpectrumAnalyzer};
