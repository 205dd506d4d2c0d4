/// Decimal places of a materialized money amount (minor currency unit).
pub const MONEY_SCALE: u32 = 2;

/// Decimal places carried by share counts.
pub const SHARE_SCALE: u32 = 8;

/// Decimal places for per-share cost figures.
pub const QUOTE_SCALE: u32 = 4;

/// Decimal places kept on yields and other ratios.
pub const RATIO_SCALE: u32 = 8;

/// Quantity threshold for significant positions
pub const QUANTITY_THRESHOLD: &str = "0.00000001";

/// Day-count basis used for annualizing returns (act/365).
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Average month length used to express gaps between payments in months.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.4375;

/// Default term currency when none is configured.
pub const DEFAULT_TERM_CURRENCY: &str = "EUR";
