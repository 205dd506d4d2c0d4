pub mod interval;
pub mod time_utils;

pub use interval::Interval;
