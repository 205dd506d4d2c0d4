//! Per-security performance records and the portfolio-wide snapshot.

mod security_performance_record;
mod security_performance_snapshot;

#[cfg(test)]
mod security_performance_record_tests;

pub use security_performance_record::SecurityPerformanceRecord;
pub use security_performance_snapshot::{SecurityCalculationFailure, SecurityPerformanceSnapshot};
