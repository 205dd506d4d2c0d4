use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// How regularly a security pays dividends, from least to most informative
/// for irregular series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Periodicity {
    /// No payments.
    None,
    /// A single payment; not enough history to classify.
    Unknown,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Periodicity {
    /// Bucket for a gap between two payments, in whole months.
    pub fn from_gap_months(months: i64) -> Self {
        match months {
            m if m <= 1 => Periodicity::Monthly,
            m if m <= 3 => Periodicity::Quarterly,
            m if m <= 6 => Periodicity::SemiAnnual,
            _ => Periodicity::Annual,
        }
    }

    /// Months between two regular payments.
    pub fn nominal_months(self) -> Option<i64> {
        match self {
            Periodicity::Monthly => Some(1),
            Periodicity::Quarterly => Some(3),
            Periodicity::SemiAnnual => Some(6),
            Periodicity::Annual => Some(12),
            Periodicity::None | Periodicity::Unknown => None,
        }
    }

    /// The next less frequent rhythm.
    pub fn coarser(self) -> Option<Periodicity> {
        match self {
            Periodicity::Monthly => Some(Periodicity::Quarterly),
            Periodicity::Quarterly => Some(Periodicity::SemiAnnual),
            Periodicity::SemiAnnual => Some(Periodicity::Annual),
            _ => None,
        }
    }
}

/// Dividend figures of one security over a reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendStatistics {
    /// Payments inside the period.
    pub event_count: usize,
    /// Gross dividends inside the period.
    pub sum: Money,
    /// Dividends received after withheld taxes.
    pub net_sum: Money,
    pub last_payment: Option<NaiveDate>,
    /// Sum over the period's payments of gross amount per entitled share.
    pub dividend_per_share: Decimal,
    pub periodicity: Periodicity,
    /// Period dividends over the closing FIFO cost.
    pub personal_yield_fifo: Option<Decimal>,
    /// Period dividends over the closing moving-average cost.
    pub personal_yield_moving_average: Option<Decimal>,
    /// Average yearly sum of per-payment yields on moving-average cost.
    pub rate_of_return_per_year: Option<Decimal>,
    /// Dividends of the trailing window over the closing FIFO cost.
    pub yield_on_cost: Option<Decimal>,
}
