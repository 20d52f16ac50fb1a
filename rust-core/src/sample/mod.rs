//! Sample buffers and test signal generation

pub mod buffer;
pub mod waveform;

pub use buffer::{SampleBuffer, SampleKind};
pub use waveform::{add_cos, add_cos_real, add_waveform, mix_cos, SignalMode, Waveform};
