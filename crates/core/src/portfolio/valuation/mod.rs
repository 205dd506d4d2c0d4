mod valuation_calculator;
mod valuation_model;

pub use valuation_calculator::value_position;
pub use valuation_model::Valuation;
