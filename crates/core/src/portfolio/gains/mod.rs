//! Realized and unrealized capital gains, at a point in time and per day.

mod capital_gains_calculation;
mod daily_capital_gains;
mod gains_model;


pub use capital_gains_calculation::CapitalGainsCalculation;
pub use daily_capital_gains::{DailyCapitalGains, DailyCapitalGainsCalculation};
pub use gains_model::{CapitalGainsRecord, CapitalGainsResult, TrailEntry, TrailLabel};
