//! General linear difference equations
//!
//! ```text
//!          NA                     NB-1
//! y[n] =   Σ  A[k]·y[n-k]    +    Σ  B[k]·x[n-k]
//!         k=1                     k=0
//! ```
//!
//! Feedback terms are added, not subtracted: a one-pole smoother
//! `y[n] = 0.9·y[n-1] + 0.1·x[n]` has `A = [0.9]`, `B = [0.1]`. With no
//! feedback coefficients the equation is a plain FIR convolution.

use num_complex::Complex64;

use crate::error::{DspError, DspResult};
use crate::sample::{SampleBuffer, SampleKind};

/// Difference equation with complex coefficients and optional initial
/// output history
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceEquation {
    /// B[0..NB], applied to x[n], x[n-1], ...
    feedforward: Vec<Complex64>,

    /// A[0..NA], applied to y[n-1], y[n-2], ...
    feedback: Vec<Complex64>,

    /// y[-1], y[-2], ..., y[-NA]; empty means a quiet start
    initial: Vec<Complex64>,
}

impl DifferenceEquation {
    /// Create an equation that starts from zero output history
    pub fn new(feedforward: Vec<Complex64>, feedback: Vec<Complex64>) -> Self {
        Self {
            feedforward,
            feedback,
            initial: Vec::new(),
        }
    }

    /// Seed the output history, `initial[k]` being y[-(k + 1)]
    ///
    /// # Errors
    /// [`DspError::InvalidParameter`] unless `initial` is empty or holds
    /// exactly one value per feedback coefficient.
    pub fn with_initial_outputs(mut self, initial: Vec<Complex64>) -> DspResult<Self> {
        if !initial.is_empty() && initial.len() != self.feedback.len() {
            return Err(DspError::InvalidParameter(format!(
                "{} initial outputs given for {} feedback coefficients",
                initial.len(),
                self.feedback.len()
            )));
        }
        self.initial = initial;
        Ok(self)
    }

    pub fn is_recursive(&self) -> bool {
        !self.feedback.is_empty()
    }

    pub fn feedforward(&self) -> &[Complex64] {
        &self.feedforward
    }

    pub fn feedback(&self) -> &[Complex64] {
        &self.feedback
    }

    fn has_real_coefficients(&self) -> bool {
        self.feedforward
            .iter()
            .chain(&self.feedback)
            .chain(&self.initial)
            .all(|c| c.im == 0.0)
    }

    /// y[i - k] for k >= 1, reaching into the seeded history before the start
    #[inline]
    fn past_output(&self, y: &[Complex64], i: usize, k: usize) -> Complex64 {
        if k <= i {
            y[i - k]
        } else {
            self.initial.get(k - 1).copied().unwrap_or_default()
        }
    }

    /// Run `input` through the equation
    ///
    /// The result has the input's length and rate. It stays a real signal
    /// only when the input is real and every coefficient and initial value
    /// is real.
    pub fn solve(&self, input: &SampleBuffer) -> DspResult<SampleBuffer> {
        let n = input.len();
        let mut res = SampleBuffer::zeroed(n, input.sample_rate())?;
        res.kind = if input.kind == SampleKind::RealSignal && self.has_real_coefficients() {
            SampleKind::RealSignal
        } else {
            SampleKind::Signal
        };

        log::debug!(
            "diff: {} samples, {} feedforward / {} feedback terms{}",
            n,
            self.feedforward.len(),
            self.feedback.len(),
            if self.initial.is_empty() { "" } else { ", seeded" }
        );

        let x = input.data();
        for i in 0..n {
            let recursive = self
                .feedback
                .iter()
                .enumerate()
                .fold(Complex64::new(0.0, 0.0), |acc, (k, &a)| {
                    acc + a * self.past_output(res.data(), i, k + 1)
                });

            let direct = self
                .feedforward
                .iter()
                .take(i + 1)
                .enumerate()
                .fold(Complex64::new(0.0, 0.0), |acc, (k, &b)| acc + b * x[i - k]);

            res.set(i, recursive + direct);
        }

        Ok(res)
    }
}

/// One-shot form of [`DifferenceEquation::solve`]
///
/// `initial` must be empty or hold one value per feedback coefficient.
pub fn solve_difference_equation(
    input: &SampleBuffer,
    feedforward: &[Complex64],
    feedback: &[Complex64],
    initial: &[Complex64],
) -> DspResult<SampleBuffer> {
    DifferenceEquation::new(feedforward.to_vec(), feedback.to_vec())
        .with_initial_outputs(initial.to_vec())?
        .solve(input)
}
