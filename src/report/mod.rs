//! Report module - console tables and JSON export of analysis results

pub mod export;
pub mod results;
pub mod summary;

pub use export::*;
pub use results::*;
pub use summary::*;
