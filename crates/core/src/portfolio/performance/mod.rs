//! Money-weighted return (IRR) of a position over a period.

mod irr_calculation;
mod performance_model;


pub use irr_calculation::{calculate_xirr, IrrCalculation};
pub use performance_model::{CashFlow, IrrMethod, IrrResult};
