//! Window functions and time-domain filters

pub mod windows;
pub mod cic;
pub mod fir;
pub mod diff;

pub use windows::{WindowType, generate_window};
pub use cic::{CicConfig, CicFilter, IntegratorOrder};
pub use fir::FirFilter;
pub use diff::{solve_difference_equation, DifferenceEquation};
