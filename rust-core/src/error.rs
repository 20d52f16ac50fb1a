//! Error types shared by the buffers, transforms and filters

use thiserror::Error;

/// Errors that can occur while allocating, transforming or filtering samples
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    /// Storage for a sample buffer could not be reserved
    #[error("unable to allocate a buffer of {samples} samples")]
    AllocationFailure { samples: usize },

    /// FFT size is not an exact power of two
    #[error("{0} is not a power of 2")]
    InvalidBinCount(usize),

    /// Size, rate, range or filter setting outside what the operation accepts
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// FIR descriptor text could not be parsed
    #[error("filter descriptor line {line}: {reason}")]
    InvalidFilterDescriptor { line: usize, reason: String },
}

/// Result type alias for DSP operations
pub type DspResult<T> = Result<T, DspError>;
