use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{is_quantity_significant, round_amount};

/// Cost convention used to relieve cost basis on disposals.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostMethod {
    #[default]
    Fifo,
    MovingAverage,
}

/// An open purchase lot. Amounts are in the term currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Id of the acquiring transaction.
    pub transaction_id: String,
    pub acquisition_date: NaiveDate,
    /// Shares still open.
    pub shares: Decimal,
    /// Shares originally acquired.
    pub original_shares: Decimal,
    /// Remaining cost including fees, excluding taxes.
    pub cost: Decimal,
    /// Remaining cost at gross value (no fees, no taxes).
    pub net_cost: Decimal,
}

impl Lot {
    /// Cost of `shares` taken from this lot. Taking the whole lot yields its
    /// whole remaining cost so nothing is left behind by rounding.
    pub(crate) fn slice(&self, shares: Decimal) -> (Decimal, Decimal) {
        if shares >= self.shares {
            return (self.cost, self.net_cost);
        }
        (
            round_amount(self.cost * shares / self.shares),
            round_amount(self.net_cost * shares / self.shares),
        )
    }
}

/// Running pool for the moving-average convention.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovingAverage {
    pub shares: Decimal,
    pub cost: Decimal,
    pub net_cost: Decimal,
}

impl MovingAverage {
    pub(crate) fn add(&mut self, shares: Decimal, cost: Decimal, net_cost: Decimal) {
        self.shares += shares;
        self.cost += cost;
        self.net_cost += net_cost;
    }

    /// Removes `shares` from the pool and returns the (cost, net cost) given
    /// up, which is `shares` times the average unit cost. Emptying the pool
    /// gives up everything.
    pub(crate) fn consume(&mut self, shares: Decimal) -> (Decimal, Decimal) {
        if self.shares <= Decimal::ZERO {
            return (Decimal::ZERO, Decimal::ZERO);
        }
        let remaining = self.shares - shares;
        if remaining <= Decimal::ZERO || !is_quantity_significant(&remaining) {
            let consumed = (self.cost, self.net_cost);
            *self = MovingAverage::default();
            return consumed;
        }
        let cost = round_amount(self.cost * shares / self.shares);
        let net_cost = round_amount(self.net_cost * shares / self.shares);
        self.shares = remaining;
        self.cost -= cost;
        self.net_cost -= net_cost;
        (cost, net_cost)
    }
}

/// Part of a lot relieved by a disposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LotConsumption {
    pub transaction_id: String,
    pub acquisition_date: NaiveDate,
    pub shares: Decimal,
    pub cost: Decimal,
    pub net_cost: Decimal,
}

/// Result of replaying one sale or outbound transfer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Disposal {
    pub transaction_id: String,
    pub date: NaiveDate,
    /// Shares requested by the transaction.
    pub shares: Decimal,
    /// Shares matched against open lots.
    pub matched_shares: Decimal,
    /// Oversold shares with no cost basis (short leg).
    pub unmatched_shares: Decimal,
    /// Gross value received, in the term currency.
    pub proceeds: Decimal,
    pub fifo_consumed: Vec<LotConsumption>,
    pub fifo_cost: Decimal,
    pub fifo_net_cost: Decimal,
    pub moving_average_cost: Decimal,
    pub moving_average_net_cost: Decimal,
}

impl Disposal {
    /// Proceeds minus the net cost relieved under `method`.
    pub fn realized_gain(&self, method: CostMethod) -> Decimal {
        match method {
            CostMethod::Fifo => self.proceeds - self.fifo_net_cost,
            CostMethod::MovingAverage => self.proceeds - self.moving_average_net_cost,
        }
    }

    /// Share of the proceeds attributable to the unmatched shares.
    pub fn unmatched_proceeds(&self) -> Decimal {
        if self.unmatched_shares.is_zero() || self.shares.is_zero() {
            return Decimal::ZERO;
        }
        round_amount(self.proceeds * self.unmatched_shares / self.shares)
    }
}

/// A dividend together with the position it was paid on.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DividendPayment {
    pub transaction_id: String,
    pub date: NaiveDate,
    /// Gross dividend (before withheld taxes) in the term currency.
    pub amount: Decimal,
    /// Amount actually received in the term currency.
    pub net_amount: Decimal,
    pub taxes: Decimal,
    /// Shares the dividend was declared on.
    pub shares: Decimal,
    /// Shares held by the tracker when the dividend was replayed.
    pub shares_held: Decimal,
    pub fifo_cost: Decimal,
    pub moving_average_cost: Decimal,
}
