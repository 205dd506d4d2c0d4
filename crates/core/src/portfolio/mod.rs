//! Position accounting: lots, gains, income, returns and valuation.

pub mod gains;
pub mod income;
pub mod lots;
pub mod performance;
pub mod snapshot;
pub mod valuation;

pub use gains::*;
pub use income::*;
pub use lots::*;
pub use performance::*;
pub use snapshot::*;
pub use valuation::*;
