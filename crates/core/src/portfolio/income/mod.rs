//! Dividend income statistics and payment periodicity.

mod dividend_calculation;
mod income_model;


pub use dividend_calculation::DividendCalculation;
pub use income_model::{DividendStatistics, Periodicity};
