//! Windowing sample buffers before transforming them
//!
//! Applies windows to time-domain buffers to reduce spectral leakage

use crate::filters::windows::{generate_window, WindowType};
use crate::sample::SampleBuffer;

/// Apply a window in place to the first `bins` samples
///
/// The coefficient is a real scalar applied identically to the in-phase and
/// quadrature channels. A `bins` of 0, or one larger than the buffer,
/// windows the whole buffer. The rectangular window leaves the buffer
/// untouched.
pub fn apply_window(buf: &mut SampleBuffer, window_type: WindowType, bins: usize) {
    if window_type == WindowType::Rectangular {
        return;
    }

    let bins = if bins == 0 || bins > buf.len() {
        buf.len()
    } else {
        bins
    };

    for (k, s) in buf.data_mut()[..bins].iter_mut().enumerate() {
        *s *= window_type.coefficient(k, bins);
    }
    buf.recompute_extrema();
}

/// Calculate window correction factor
///
/// When applying windows, the signal amplitude is reduced. This factor
/// can be used to correct the transform magnitude.
///
/// # Arguments
/// * `window_type` - Type of window
/// * `length` - Window length
///
/// # Returns
/// Correction factor (multiply magnitude by this)
pub fn window_correction_factor(window_type: WindowType, length: usize) -> f64 {
    let window = generate_window(window_type, length);
    let sum: f64 = window.iter().sum();
    length as f64 / sum
}
