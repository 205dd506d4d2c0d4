//! Quote lookup module.
//!
//! - [`model`] - Price points for securities
//! - [`store`] - The lookup trait the engine consumes
//! - [`price_history`] - In-memory implementation backed by sorted series

pub mod model;
pub mod price_history;
pub mod store;

pub use model::SecurityPrice;
pub use price_history::PriceHistory;
pub use store::QuoteStore;
