use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// What a trail entry contributes to a figure.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrailLabel {
    /// Gross value received on a disposal.
    Proceeds,
    /// Cost basis relieved from a lot by a disposal.
    CostRecovered,
    /// Cost basis still carried by an open lot.
    OpenLotCost,
    /// Market value of the held shares on the valuation date.
    MarketValue,
}

/// One step of an auditable computation. Signed amounts of a record's
/// trail add up to the record's figure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrailEntry {
    pub transaction_id: Option<String>,
    pub date: NaiveDate,
    pub label: TrailLabel,
    pub shares: Decimal,
    pub amount: Decimal,
}

/// A realized or unrealized gain in the term currency plus its trail.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsRecord {
    pub gains: Money,
    /// Part of the gain caused by exchange-rate moves between acquisition
    /// and disposal (or valuation). Zero for securities quoted in the term
    /// currency.
    pub forex_gains: Money,
    pub trail: Vec<TrailEntry>,
}

impl CapitalGainsRecord {
    pub fn zero(currency: &str) -> Self {
        CapitalGainsRecord {
            gains: Money::zero(currency),
            forex_gains: Money::zero(currency),
            trail: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: TrailEntry) {
        self.gains.amount += entry.amount;
        self.trail.push(entry);
    }

    pub(crate) fn add_forex_gains(&mut self, amount: Decimal) {
        self.forex_gains.amount += amount;
    }

    /// Sum of the signed trail amounts.
    pub fn trail_total(&self) -> Decimal {
        self.trail.iter().map(|entry| entry.amount).sum()
    }

    /// Adds another record of the same currency (trails are concatenated).
    pub fn merge(mut self, other: &CapitalGainsRecord) -> Self {
        self.gains = self.gains + &other.gains;
        self.forex_gains = self.forex_gains + &other.forex_gains;
        self.trail.extend(other.trail.iter().cloned());
        self
    }
}

/// Point-in-time capital gains for one security under both conventions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsResult {
    /// Every disposal up to the valuation date.
    pub realized_fifo: CapitalGainsRecord,
    pub realized_moving_average: CapitalGainsRecord,
    /// Disposals inside the reporting period only.
    pub period_realized_fifo: CapitalGainsRecord,
    pub period_realized_moving_average: CapitalGainsRecord,
    /// `None` when shares are held but no price is known.
    pub unrealized_fifo: Option<CapitalGainsRecord>,
    pub unrealized_moving_average: Option<CapitalGainsRecord>,
}
