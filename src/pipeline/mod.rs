//! Pipeline module - the statistical stages of the analysis

pub mod binning;
pub mod chi_square;
pub mod clean;
pub mod columns;
pub mod correlation;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod ols;
pub mod stationarity;

pub use binning::*;
pub use chi_square::*;
pub use clean::*;
pub use columns::*;
pub use correlation::*;
pub use error::StatsError;
pub use forecast::*;
pub use loader::*;
pub use stationarity::*;
