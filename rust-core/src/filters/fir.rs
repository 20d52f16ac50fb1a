//! FIR filters built from tap descriptors
//!
//! Taps come from an external design tool (Parks-McClellan / Remez) as a
//! small text descriptor:
//!
//! ```text
//! # Lines starting with '#' are comments, blank lines are ignored
//! name: 15 tap low pass
//! taps: 15
//! -0.0123
//! 0.0456
//! ...
//! ```
//!
//! One coefficient per line; anything after the number on a line is
//! ignored. The filter runs either over a whole sample buffer or sample by
//! sample with a ring-buffer delay line.

use num_complex::Complex64;
use std::str::FromStr;

use crate::error::{DspError, DspResult};
use crate::filters::windows::WindowType;
use crate::sample::{SampleBuffer, SampleKind};
use crate::spectrum::fft::compute_fft;

/// Non-blank, non-comment lines with their 1-based line numbers
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Value after a case-insensitive `key:` prefix
fn keyed_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (head, rest) = line.split_once(':')?;
    if head.trim().eq_ignore_ascii_case(key) {
        Some(rest.trim()).filter(|v| !v.is_empty())
    } else {
        None
    }
}

fn descriptor_error(line: usize, reason: impl Into<String>) -> DspError {
    DspError::InvalidFilterDescriptor {
        line,
        reason: reason.into(),
    }
}

/// FIR filter with a zero-allocation ring-buffer delay line
#[derive(Debug, Clone)]
pub struct FirFilter {
    name: String,

    /// Filter coefficients h[n]
    coefficients: Vec<f64>,

    /// Ring buffer state (delay line), stores the previous M samples where
    /// M is the filter length
    state_buffer: Vec<Complex64>,

    /// Current write position in ring buffer
    cursor: usize,
}

impl FirFilter {
    /// Create a new FIR filter with given coefficients
    ///
    /// # Arguments
    /// * `name` - Label carried through to logs and plots
    /// * `coefficients` - Filter coefficients h[n] for n = 0..M-1, at least one
    pub fn new(name: impl Into<String>, coefficients: Vec<f64>) -> DspResult<Self> {
        if coefficients.is_empty() {
            return Err(DspError::InvalidParameter(
                "FIR filter needs at least one tap".into(),
            ));
        }
        let state_buffer = vec![Complex64::new(0.0, 0.0); coefficients.len()];

        Ok(Self {
            name: name.into(),
            coefficients,
            state_buffer,
            cursor: 0,
        })
    }

    /// Parse a tap descriptor
    ///
    /// # Errors
    /// [`DspError::InvalidFilterDescriptor`] naming the offending line when
    /// the name or tap count is missing or malformed, or the tap data ends
    /// early or does not parse.
    pub fn from_descriptor(text: &str) -> DspResult<Self> {
        let mut lines = content_lines(text);

        let (line_no, line) = lines
            .next()
            .ok_or_else(|| descriptor_error(0, "missing name"))?;
        let name = keyed_value(line, "name")
            .ok_or_else(|| descriptor_error(line_no, format!("unable to parse name out of '{}'", line)))?
            .to_string();

        let (line_no, line) = lines
            .next()
            .ok_or_else(|| descriptor_error(line_no, "missing number of taps"))?;
        let n_taps = keyed_value(line, "taps")
            .and_then(|v| v.split_whitespace().next())
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                descriptor_error(line_no, format!("unable to parse number of taps from '{}'", line))
            })?;

        let mut taps = Vec::with_capacity(n_taps);
        let mut last_line = line_no;
        for i in 0..n_taps {
            let (line_no, line) = lines.next().ok_or_else(|| {
                descriptor_error(last_line, format!("unexpected end of tap data at tap #{}", i))
            })?;
            let value = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .next()
                .and_then(|v| v.parse::<f64>().ok())
                .ok_or_else(|| descriptor_error(line_no, format!("bad tap value '{}'", line)))?;
            taps.push(value);
            last_line = line_no;
        }

        if let Some((line_no, _)) = lines.next() {
            log::warn!(
                "fir '{}': extra data after tap data ignored (line {})",
                name,
                line_no
            );
        }

        log::debug!("fir: loaded '{}' with {} taps", name, n_taps);
        Self::new(name, taps)
    }

    /// Process single sample through the delay line
    ///
    /// # Returns
    /// Filtered output sample y[n]
    #[inline]
    pub fn process_sample(&mut self, input: Complex64) -> Complex64 {
        let length = self.coefficients.len();
        self.state_buffer[self.cursor] = input;

        // y[n] = Σ h[k] * x[n-k], reading back through the ring
        let mut output = Complex64::new(0.0, 0.0);
        for (k, &coeff) in self.coefficients.iter().enumerate() {
            let idx = (self.cursor + length - k) % length;
            output += self.state_buffer[idx] * coeff;
        }

        self.cursor = (self.cursor + 1) % length;
        output
    }

    /// Process a block of samples, continuing from the current state
    pub fn process_block(&mut self, input: &[Complex64]) -> Vec<Complex64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Reset filter state (clear delay line)
    pub fn reset(&mut self) {
        self.state_buffer.fill(Complex64::new(0.0, 0.0));
        self.cursor = 0;
    }

    /// Filter a whole buffer from a quiet start
    ///
    /// y(n) = Σ h(k)·x(n-k), with x taken as zero before the first sample.
    /// The result has the input's length, rate and signal kind, so an empty
    /// buffer (a decimator output shorter than one period) filters to an
    /// empty buffer. The streaming delay line is not touched.
    pub fn filter(&self, signal: &SampleBuffer) -> DspResult<SampleBuffer> {
        let mut res = SampleBuffer::zeroed(signal.len(), signal.sample_rate())?;
        res.kind = match signal.kind {
            SampleKind::RealSignal => SampleKind::RealSignal,
            _ => SampleKind::Signal,
        };

        let x = signal.data();
        for n in 0..x.len() {
            let y = self
                .coefficients
                .iter()
                .take(n + 1)
                .enumerate()
                .fold(Complex64::new(0.0, 0.0), |acc, (k, &h)| acc + x[n - k] * h);
            res.set(n, y);
        }
        Ok(res)
    }

    /// Frequency response as a `bins`-point FFT of the zero-padded taps
    ///
    /// `bins` must be a power of two no smaller than the tap count.
    pub fn frequency_response(&self, bins: usize, sample_rate: u32) -> DspResult<SampleBuffer> {
        if bins < self.coefficients.len() {
            return Err(DspError::InvalidParameter(format!(
                "{} bins cannot hold {} taps",
                bins,
                self.coefficients.len()
            )));
        }
        let impulse = SampleBuffer::from_real(&self.coefficients, sample_rate)?;
        compute_fft(&impulse, bins, WindowType::Rectangular)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filter coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Get filter length
    pub fn length(&self) -> usize {
        self.coefficients.len()
    }
}

impl FromStr for FirFilter {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_descriptor(s)
    }
}
