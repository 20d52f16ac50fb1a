//! Signal Lab - Teaching DSP Core
//!
//! Complex sample buffers, windowed FFT/DFT spectra, CIC decimation, FIR
//! filtering and general difference equations, small enough to read end to
//! end.

pub mod error;
pub mod filters;
pub mod sample;
pub mod spectrum;

pub use error::{DspError, DspResult};
pub use filters::{CicFilter, DifferenceEquation, FirFilter, WindowType};
pub use sample::{SampleBuffer, SampleKind};
pub use spectrum::{compute_dft, compute_fft, compute_ifft, SpectrumAnalyzer};
