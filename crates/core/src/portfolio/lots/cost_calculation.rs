use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lot_tracker::LotTracker;
use crate::errors::Result;
use crate::fx::CurrencyConverterTrait;
use crate::money::{round_quote, Money};
use crate::portfolio::gains::{TrailEntry, TrailLabel};
use crate::transactions::Transaction;

/// Cost basis of the shares still held at the end of a replay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostCalculationResult {
    pub shares_held: Decimal,
    /// FIFO cost including fees.
    pub fifo_cost: Money,
    /// FIFO cost at gross value.
    pub net_fifo_cost: Money,
    pub moving_average_cost: Money,
    pub net_moving_average_cost: Money,
    /// Net FIFO cost per held share; `None` when nothing is held.
    pub fifo_cost_per_share: Option<Decimal>,
    pub moving_average_cost_per_share: Option<Decimal>,
    /// Fees paid over the replay.
    pub fees: Money,
    /// Taxes paid over the replay.
    pub taxes: Money,
    /// One entry per open lot, summing to `fifo_cost`.
    pub fifo_cost_trail: Vec<TrailEntry>,
}

impl CostCalculationResult {
    pub fn fifo_cost(&self) -> &Money {
        &self.fifo_cost
    }

    pub fn moving_average_cost(&self) -> &Money {
        &self.moving_average_cost
    }
}

/// Summarises a replayed [`LotTracker`] into cost figures.
pub struct CostCalculation;

impl CostCalculation {
    /// Replays `transactions` for one security and summarises the result.
    pub fn perform<'a, I>(
        security_id: &str,
        term_currency: &str,
        transactions: I,
        converter: &dyn CurrencyConverterTrait,
    ) -> Result<CostCalculationResult>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let tracker = LotTracker::new(security_id, term_currency).replay(transactions, converter)?;
        Ok(Self::from_tracker(&tracker))
    }

    pub fn from_tracker(tracker: &LotTracker) -> CostCalculationResult {
        let currency = tracker.term_currency();
        let shares_held = tracker.shares_held();
        let average = tracker.moving_average();

        // Held shares and pooled shares move together; an empty position carries no cost.
        let (fifo_cost, net_fifo_cost, ma_cost, ma_net_cost) = if shares_held.is_zero() {
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        } else {
            (
                tracker.fifo_cost(),
                tracker.net_fifo_cost(),
                average.cost,
                average.net_cost,
            )
        };

        let per_share = |cost: Decimal| {
            if shares_held.is_zero() {
                None
            } else {
                Some(round_quote(cost / shares_held))
            }
        };

        let fifo_cost_trail = tracker
            .lots()
            .iter()
            .map(|lot| TrailEntry {
                transaction_id: Some(lot.transaction_id.clone()),
                date: lot.acquisition_date,
                label: TrailLabel::OpenLotCost,
                shares: lot.shares,
                amount: lot.cost,
            })
            .collect();

        CostCalculationResult {
            shares_held,
            fifo_cost: Money::new(fifo_cost, currency),
            net_fifo_cost: Money::new(net_fifo_cost, currency),
            moving_average_cost: Money::new(ma_cost, currency),
            net_moving_average_cost: Money::new(ma_net_cost, currency),
            fifo_cost_per_share: per_share(net_fifo_cost),
            moving_average_cost_per_share: per_share(ma_net_cost),
            fees: Money::new(tracker.fees(), currency),
            taxes: Money::new(tracker.taxes(), currency),
            fifo_cost_trail,
        }
    }
}
