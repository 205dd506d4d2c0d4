use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::RATIO_SCALE;
use crate::errors::Result;
use crate::fx::CurrencyConverterTrait;
use crate::money::Money;
use crate::portfolio::gains::{
    CapitalGainsCalculation, CapitalGainsResult, DailyCapitalGains, DailyCapitalGainsCalculation,
};
use crate::portfolio::income::{DividendCalculation, DividendStatistics};
use crate::portfolio::lots::{CostCalculation, CostCalculationResult, LotTracker};
use crate::portfolio::performance::{calculate_xirr, IrrCalculation, IrrResult};
use crate::portfolio::valuation::value_position;
use crate::quotes::{QuoteStore, SecurityPrice};
use crate::settings::CalculationSettings;
use crate::transactions::{sort_chronologically, Security, Transaction, TransactionKind};
use crate::utils::Interval;

/// Performance of one security over a reporting interval, in the term
/// currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPerformanceRecord {
    pub security: Security,
    pub interval: Interval,
    pub term_currency: String,
    /// Shares held at the interval start.
    pub opening_shares: Decimal,
    /// Shares held at the interval end.
    pub shares_held: Decimal,
    /// Latest price at or before the interval end, in the security currency.
    pub quote: Option<SecurityPrice>,
    pub opening_market_value: Option<Money>,
    pub market_value: Option<Money>,
    pub cost: CostCalculationResult,
    pub capital_gains: CapitalGainsResult,
    /// Market value minus FIFO cost.
    pub capital_gains_on_holdings: Option<Money>,
    pub capital_gains_on_holdings_percent: Option<Decimal>,
    /// Market value minus moving-average cost.
    pub capital_gains_on_holdings_moving_average: Option<Money>,
    pub capital_gains_on_holdings_moving_average_percent: Option<Decimal>,
    /// Sum of the period's cash flows, valuations included.
    pub delta: Option<Money>,
    pub dividends: DividendStatistics,
    pub irr: IrrResult,
    pub daily: Option<DailyCapitalGains>,
}

impl SecurityPerformanceRecord {
    /// Calculates the record from the security's transactions.
    ///
    /// Transactions on or before the interval start shape the opening
    /// position; those after the end are ignored except for the dividend
    /// periodicity, which looks at every known payment.
    pub fn calculate(
        security: &Security,
        transactions: &[Transaction],
        interval: Interval,
        converter: &dyn CurrencyConverterTrait,
        quotes: &dyn QuoteStore,
        settings: &CalculationSettings,
    ) -> Result<Self> {
        let term = settings.term_currency.as_str();
        debug!(
            "Calculating performance of {} from {} to {}",
            security.id, interval.start, interval.end
        );

        let mut sorted = transactions.to_vec();
        sort_chronologically(&mut sorted);
        let split = sorted.partition_point(|t| interval.is_historical(t.trade_date()));
        let end = sorted.partition_point(|t| !interval.is_after(t.trade_date()));
        let period = &sorted[split..end];

        let opening = LotTracker::new(&security.id, term).replay(&sorted[..split], converter)?;
        let closing = opening.clone().replay(period, converter)?;

        let opening_valuation = value_position(
            security,
            opening.shares_held(),
            interval.start,
            term,
            quotes,
            converter,
        )?;
        let closing_valuation = value_position(
            security,
            closing.shares_held(),
            interval.end,
            term,
            quotes,
            converter,
        )?;
        if !closing_valuation.is_available() {
            warn!(
                "No price for {} on or before {}; unrealized gains are unavailable",
                security.id, interval.end
            );
        }

        let cost = CostCalculation::from_tracker(&closing);
        let capital_gains = CapitalGainsCalculation::new(security, term, converter).perform(
            &opening,
            &closing,
            &closing_valuation,
        )?;

        let market_value = closing_valuation.market_value;
        let on_holdings = |cost: Decimal| market_value.map(|value| value - cost);
        let percent = |cost: Decimal| market_value.and_then(|value| gain_ratio(value, cost));

        let (delta, irr) = match (opening_valuation.market_value, market_value) {
            (Some(opening_value), Some(closing_value)) => {
                let flows = IrrCalculation::new(term, converter).cash_flows(
                    period,
                    &interval,
                    opening_value,
                    closing_value,
                )?;
                let delta: Decimal = flows.iter().map(|flow| flow.amount).sum();
                (
                    Some(Money::new(delta, term)),
                    calculate_xirr(&flows, &settings.irr),
                )
            }
            _ => {
                warn!(
                    "Missing opening or closing valuation for {}; IRR is undefined",
                    security.id
                );
                (None, IrrResult::undefined(0))
            }
        };

        let payment_dates: Vec<_> = sorted
            .iter()
            .filter(|t| matches!(t.kind, TransactionKind::Dividend { .. }))
            .map(|t| t.trade_date())
            .collect();
        let dividends = DividendCalculation::perform(
            &closing,
            &interval,
            &payment_dates,
            settings.dividend_yield_window_days,
        );

        let daily = if settings.include_daily {
            Some(
                DailyCapitalGainsCalculation::new(
                    security,
                    term,
                    settings.daily_cost_method,
                    converter,
                    quotes,
                )
                .calculate(&sorted, interval)?,
            )
        } else {
            None
        };

        Ok(SecurityPerformanceRecord {
            security: security.clone(),
            interval,
            term_currency: term.to_string(),
            opening_shares: opening.shares_held(),
            shares_held: closing.shares_held(),
            quote: closing_valuation.price.clone(),
            opening_market_value: opening_valuation
                .market_value
                .map(|value| Money::new(value, term)),
            market_value: market_value.map(|value| Money::new(value, term)),
            capital_gains_on_holdings: on_holdings(cost.fifo_cost.amount)
                .map(|gain| Money::new(gain, term)),
            capital_gains_on_holdings_percent: percent(cost.fifo_cost.amount),
            capital_gains_on_holdings_moving_average: on_holdings(cost.moving_average_cost.amount)
                .map(|gain| Money::new(gain, term)),
            capital_gains_on_holdings_moving_average_percent: percent(
                cost.moving_average_cost.amount,
            ),
            cost,
            capital_gains,
            delta,
            dividends,
            irr,
            daily,
        })
    }

    /// True when the position was open at the start or moved during the
    /// interval.
    pub(crate) fn is_active(&self, transactions: &[Transaction]) -> bool {
        !self.opening_shares.is_zero()
            || transactions
                .iter()
                .any(|t| self.interval.contains(t.trade_date()))
    }
}

/// `value / cost - 1`; zero when both are zero, undefined without cost.
fn gain_ratio(value: Decimal, cost: Decimal) -> Option<Decimal> {
    if cost.is_zero() {
        return value.is_zero().then_some(Decimal::ZERO);
    }
    Some((value / cost - Decimal::ONE).round_dp(RATIO_SCALE))
}
