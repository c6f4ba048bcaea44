//! airstat: Weather and Air Quality Statistics Library
//!
//! Loads and cleans a weather / air-quality table, tests the relationship
//! between temperature and air quality, checks series for stationarity and
//! forecasts temperature with an automatically selected ARIMA model.

pub mod charts;
pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
