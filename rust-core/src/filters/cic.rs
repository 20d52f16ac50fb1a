//! CIC (Cascaded Integrator-Comb) decimation filter
//!
//! N integrators run at the input rate, the stream is decimated by R, then
//! N combs run at the output rate. Only adders and delays, no multipliers.
//!
//! ```text
//! Decimator:  Integrator stages → Downsample → Comb stages
//!
//! H(z) = [(1 - z^(-RM)) / (1 - z^(-1))]^N        DC gain = (RM)^N
//! ```
//!
//! Accumulators are wide complex doubles; there is no fixed word size and
//! no wraparound. The filter is stateful across calls: a trailing partial
//! decimation period stays in the integrators and counts towards the next
//! call. Call [`CicFilter::reset`] before feeding an unrelated stream.

use num_complex::Complex64;

use crate::error::{DspError, DspResult};
use crate::sample::{SampleBuffer, SampleKind};

/// Order in which the integrator chain is evaluated on each input sample
///
/// The two orders settle to the same DC gain but give different outputs
/// while the filter is filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorOrder {
    /// Single forward sweep: stage k accumulates stage k-1's value from
    /// this same input cycle
    #[default]
    Cascade,

    /// Registered hardware ordering: every stage accumulates its
    /// predecessor's value from the previous input cycle
    Pipelined,
}

/// CIC filter configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CicConfig {
    /// Number of integrator/comb stages (N)
    pub stages: usize,

    /// Comb differential delay (M), 1 or 2
    pub comb_delay: usize,

    /// Decimation ratio (R)
    pub ratio: usize,

    pub integrator_order: IntegratorOrder,
}

impl Default for CicConfig {
    fn default() -> Self {
        Self {
            stages: 3,
            comb_delay: 1,
            ratio: 8,
            integrator_order: IntegratorOrder::Cascade,
        }
    }
}

/// One integrator/comb pair
#[derive(Debug, Clone, Copy, Default)]
struct CicStage {
    /// Integrator accumulator
    integrator: Complex64,

    /// Last three comb inputs. The newest sits at `ndx`, the one before at
    /// `ndx + 1` and the oldest at `ndx + 2` (mod 3).
    history: [Complex64; 3],

    ndx: usize,
}

impl CicStage {
    /// Store a new comb input, rotating the ring backwards
    #[inline]
    fn push_comb(&mut self, x: Complex64) {
        self.ndx = (self.ndx + 2) % 3;
        self.history[self.ndx] = x;
    }

    /// x(n) - x(n - M)
    #[inline]
    fn comb_value(&self, comb_delay: usize) -> Complex64 {
        let lag = if comb_delay == 1 { 1 } else { 2 };
        self.history[self.ndx] - self.history[(self.ndx + lag) % 3]
    }
}

/// N-stage CIC decimation filter
///
/// One instance models one decimation pipeline. It is not reentrant: feeding
/// two logically distinct streams through it without a [`reset`](Self::reset)
/// in between mixes their state.
#[derive(Debug, Clone)]
pub struct CicFilter {
    stages: Vec<CicStage>,
    comb_delay: usize,
    ratio: usize,
    order: IntegratorOrder,

    /// Input samples seen, mod R
    iteration: usize,
}

impl CicFilter {
    /// Create a CIC decimator with the cascade integrator order
    ///
    /// # Arguments
    /// * `stages` - Number of integrator/comb stages (N), at least 1
    /// * `comb_delay` - Comb differential delay (M), 1 or 2
    /// * `ratio` - Decimation ratio (R), at least 1
    pub fn new(stages: usize, comb_delay: usize, ratio: usize) -> DspResult<Self> {
        Self::from_config(CicConfig {
            stages,
            comb_delay,
            ratio,
            integrator_order: IntegratorOrder::Cascade,
        })
    }

    pub fn from_config(config: CicConfig) -> DspResult<Self> {
        if config.stages == 0 {
            return Err(DspError::InvalidParameter(
                "CIC filter needs at least one stage".into(),
            ));
        }
        if config.ratio == 0 {
            return Err(DspError::InvalidParameter(
                "CIC decimation ratio must be at least 1".into(),
            ));
        }
        if !(1..=2).contains(&config.comb_delay) {
            return Err(DspError::InvalidParameter(format!(
                "CIC comb delay must be 1 or 2, got {}",
                config.comb_delay
            )));
        }

        let mut stages = Vec::new();
        stages
            .try_reserve_exact(config.stages)
            .map_err(|_| DspError::AllocationFailure {
                samples: config.stages,
            })?;
        stages.resize(config.stages, CicStage::default());

        log::debug!(
            "cic: N={} M={} R={} {:?} integrators",
            config.stages,
            config.comb_delay,
            config.ratio,
            config.integrator_order
        );

        Ok(Self {
            stages,
            comb_delay: config.comb_delay,
            ratio: config.ratio,
            order: config.integrator_order,
            iteration: 0,
        })
    }

    /// Builder-style override of the integrator order
    pub fn with_integrator_order(mut self, order: IntegratorOrder) -> Self {
        self.order = order;
        self
    }

    /// Run the integrator chain for one input sample
    #[inline]
    fn integrate(&mut self, input: Complex64) {
        match self.order {
            IntegratorOrder::Cascade => {
                let mut acc = input;
                for stage in self.stages.iter_mut() {
                    stage.integrator += acc;
                    acc = stage.integrator;
                }
            }
            IntegratorOrder::Pipelined => {
                // Walk backwards so each stage still sees last cycle's
                // predecessor value
                for k in (1..self.stages.len()).rev() {
                    let prev = self.stages[k - 1].integrator;
                    self.stages[k].integrator += prev;
                }
                self.stages[0].integrator += input;
            }
        }
    }

    /// Run the comb chain at a decimation instant and return its output
    #[inline]
    fn comb(&mut self) -> Complex64 {
        let last = self.stages.len() - 1;
        let mut value = self.stages[last].integrator;
        for stage in self.stages.iter_mut() {
            stage.push_comb(value);
            value = stage.comb_value(self.comb_delay);
        }
        value
    }

    /// Process a single input sample
    ///
    /// Returns `Some(output)` at each decimation instant (every R-th sample
    /// since the last reset), `None` otherwise.
    pub fn process_sample(&mut self, input: Complex64) -> Option<Complex64> {
        self.iteration = (self.iteration + 1) % self.ratio;
        self.integrate(input);

        if self.iteration == 0 {
            Some(self.comb())
        } else {
            None
        }
    }

    /// Number of outputs the next `n` input samples will produce
    pub fn output_len(&self, n: usize) -> usize {
        (self.iteration + n) / self.ratio
    }

    /// Decimate a buffer
    ///
    /// The result runs at `r / R` and holds one sample per decimation
    /// instant reached: `floor(n / R)` samples on a freshly reset filter.
    /// Leftover input short of a full period is neither emitted nor padded.
    ///
    /// # Errors
    /// [`DspError::InvalidParameter`] when `R` exceeds the input's sample
    /// rate (the output rate would be 0); the filter state is untouched in
    /// that case.
    pub fn decimate(&mut self, input: &SampleBuffer) -> DspResult<SampleBuffer> {
        let ratio = u32::try_from(self.ratio).unwrap_or(u32::MAX);
        let out_rate = input.sample_rate() / ratio;
        if out_rate == 0 {
            return Err(DspError::InvalidParameter(format!(
                "decimation ratio {} exceeds the {} Hz sample rate",
                self.ratio,
                input.sample_rate()
            )));
        }

        let mut res = SampleBuffer::zeroed(self.output_len(input.len()), out_rate)?;
        res.kind = match input.kind {
            SampleKind::RealSignal => SampleKind::RealSignal,
            _ => SampleKind::Signal,
        };

        log::debug!(
            "cic: decimating {} samples at {} Hz -> {} samples at {} Hz",
            input.len(),
            input.sample_rate(),
            res.len(),
            out_rate
        );

        let mut ndx = 0;
        for &sample in input.data() {
            if let Some(out) = self.process_sample(sample) {
                res.set(ndx, out);
                ndx += 1;
            }
        }

        Ok(res)
    }

    /// Zero every integrator, comb history and the iteration counter
    pub fn reset(&mut self) {
        self.stages.fill(CicStage::default());
        self.iteration = 0;
    }

    /// Unnormalized DC gain, (R·M)^N
    pub fn gain(&self) -> f64 {
        let stages = i32::try_from(self.stages.len()).unwrap_or(i32::MAX);
        (self.ratio as f64 * self.comb_delay as f64).powi(stages)
    }

    /// Get the number of stages
    pub fn stages(&self) -> usize {
        self.stages.len()
    }

    pub fn comb_delay(&self) -> usize {
        self.comb_delay
    }

    /// Get the decimation ratio
    pub fn ratio(&self) -> usize {
        self.ratio
    }

    pub fn integrator_order(&self) -> IntegratorOrder {
        self.order
    }
}
