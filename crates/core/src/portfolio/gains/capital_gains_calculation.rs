use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::gains_model::{CapitalGainsRecord, CapitalGainsResult, TrailEntry, TrailLabel};
use crate::errors::Result;
use crate::fx::CurrencyConverterTrait;
use crate::money::round_amount;
use crate::portfolio::lots::{CostMethod, Disposal, LotTracker};
use crate::portfolio::valuation::Valuation;
use crate::transactions::Security;

/// Unrealized gain of the tracker's position under `method`.
///
/// An empty position has no unrealized gain even without a price; a held
/// position without a market value has no computable gain.
pub(crate) fn unrealized_gain(
    tracker: &LotTracker,
    valuation: &Valuation,
    method: CostMethod,
) -> Option<Decimal> {
    if tracker.shares_held().is_zero() {
        return Some(Decimal::ZERO);
    }
    let market_value = valuation.market_value?;
    let remaining = match method {
        CostMethod::Fifo => tracker.net_fifo_cost(),
        CostMethod::MovingAverage => tracker.moving_average().net_cost,
    };
    Some(market_value - remaining)
}

/// Capital gains at one point in time, derived from replayed lot trackers.
pub struct CapitalGainsCalculation<'a> {
    security: &'a Security,
    term_currency: &'a str,
    converter: &'a dyn CurrencyConverterTrait,
}

impl<'a> CapitalGainsCalculation<'a> {
    pub fn new(
        security: &'a Security,
        term_currency: &'a str,
        converter: &'a dyn CurrencyConverterTrait,
    ) -> Self {
        CapitalGainsCalculation {
            security,
            term_currency,
            converter,
        }
    }

    /// Computes realized and unrealized gains.
    ///
    /// `opening` is the tracker state at the start of the reporting period,
    /// `closing` the state at its end; disposals replayed between the two are
    /// the period's disposals. `valuation` marks the closing position.
    pub fn perform(
        &self,
        opening: &LotTracker,
        closing: &LotTracker,
        valuation: &Valuation,
    ) -> Result<CapitalGainsResult> {
        let all = closing.disposals();
        let period = all.get(opening.disposals().len()..).unwrap_or(&[]);

        Ok(CapitalGainsResult {
            realized_fifo: self.realized(all, CostMethod::Fifo)?,
            realized_moving_average: self.realized(all, CostMethod::MovingAverage)?,
            period_realized_fifo: self.realized(period, CostMethod::Fifo)?,
            period_realized_moving_average: self.realized(period, CostMethod::MovingAverage)?,
            unrealized_fifo: self.unrealized(closing, valuation, CostMethod::Fifo)?,
            unrealized_moving_average: self.unrealized(
                closing,
                valuation,
                CostMethod::MovingAverage,
            )?,
        })
    }

    /// Realized gains over `disposals`.
    pub fn realized(&self, disposals: &[Disposal], method: CostMethod) -> Result<CapitalGainsRecord> {
        let mut record = CapitalGainsRecord::zero(self.term_currency);

        for disposal in disposals {
            record.push(TrailEntry {
                transaction_id: Some(disposal.transaction_id.clone()),
                date: disposal.date,
                label: TrailLabel::Proceeds,
                shares: disposal.shares,
                amount: disposal.proceeds,
            });

            match method {
                CostMethod::Fifo => {
                    for consumption in &disposal.fifo_consumed {
                        record.push(TrailEntry {
                            transaction_id: Some(consumption.transaction_id.clone()),
                            date: consumption.acquisition_date,
                            label: TrailLabel::CostRecovered,
                            shares: consumption.shares,
                            amount: -consumption.net_cost,
                        });
                        let forex = self.forex_gain(
                            consumption.net_cost,
                            consumption.acquisition_date,
                            disposal.date,
                        )?;
                        record.add_forex_gains(forex);
                    }
                }
                CostMethod::MovingAverage => {
                    if disposal.matched_shares > Decimal::ZERO {
                        record.push(TrailEntry {
                            transaction_id: Some(disposal.transaction_id.clone()),
                            date: disposal.date,
                            label: TrailLabel::CostRecovered,
                            shares: disposal.matched_shares,
                            amount: -disposal.moving_average_net_cost,
                        });
                    }
                }
            }
        }

        Ok(record)
    }

    /// Unrealized gains of the tracker's open position.
    pub fn unrealized(
        &self,
        tracker: &LotTracker,
        valuation: &Valuation,
        method: CostMethod,
    ) -> Result<Option<CapitalGainsRecord>> {
        let mut record = CapitalGainsRecord::zero(self.term_currency);
        let shares_held = tracker.shares_held();
        if shares_held.is_zero() {
            return Ok(Some(record));
        }
        let Some(market_value) = valuation.market_value else {
            return Ok(None);
        };

        record.push(TrailEntry {
            transaction_id: None,
            date: valuation.date,
            label: TrailLabel::MarketValue,
            shares: shares_held,
            amount: market_value,
        });

        match method {
            CostMethod::Fifo => {
                for lot in tracker.lots() {
                    record.push(TrailEntry {
                        transaction_id: Some(lot.transaction_id.clone()),
                        date: lot.acquisition_date,
                        label: TrailLabel::OpenLotCost,
                        shares: lot.shares,
                        amount: -lot.net_cost,
                    });
                    let forex =
                        self.forex_gain(lot.net_cost, lot.acquisition_date, valuation.date)?;
                    record.add_forex_gains(forex);
                }
            }
            CostMethod::MovingAverage => {
                record.push(TrailEntry {
                    transaction_id: None,
                    date: valuation.date,
                    label: TrailLabel::OpenLotCost,
                    shares: shares_held,
                    amount: -tracker.moving_average().net_cost,
                });
            }
        }

        debug_assert_eq!(
            Some(record.gains.amount),
            unrealized_gain(tracker, valuation, method)
        );
        Ok(Some(record))
    }

    /// Gain on `cost` caused only by the exchange rate moving between
    /// `acquired` and `valued`: the cost is taken into the security currency
    /// at acquisition and brought back at the later date.
    fn forex_gain(&self, cost: Decimal, acquired: NaiveDate, valued: NaiveDate) -> Result<Decimal> {
        if self.security.currency == self.term_currency || cost.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let in_security_currency = self.converter.get_rate(
            self.term_currency,
            &self.security.currency,
            acquired,
        )? * cost;
        let back = self.converter.convert_amount(
            in_security_currency,
            &self.security.currency,
            self.term_currency,
            valued,
        )?;
        Ok(round_amount(back) - cost)
    }
}
