//! Transactions module - the read-only input the engine replays.

mod transactions_constants;
mod transactions_model;


pub use transactions_constants::*;
pub use transactions_model::*;
