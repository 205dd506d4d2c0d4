//! Lot tracking under the FIFO and moving-average conventions.

mod cost_calculation;
mod lot_tracker;
mod lots_model;

#[cfg(test)]
mod lot_tracker_tests;

pub use cost_calculation::{CostCalculation, CostCalculationResult};
pub(crate) use lot_tracker::ConvertedAmounts;
pub use lot_tracker::LotTracker;
pub use lots_model::{CostMethod, Disposal, DividendPayment, Lot, LotConsumption, MovingAverage};
