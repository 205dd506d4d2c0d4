use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::performance_model::{CashFlow, IrrMethod, IrrResult};
use crate::errors::Result;
use crate::fx::CurrencyConverterTrait;
use crate::portfolio::lots::ConvertedAmounts;
use crate::settings::IrrSettings;
use crate::transactions::{Transaction, TransactionKind};
use crate::utils::time_utils::year_fraction;
use crate::utils::Interval;

/// Solves `Σ cf / (1 + r)^(days / 365) = 0` for `r`.
///
/// Newton-Raphson runs first from `settings.initial_guess`. When it stalls,
/// produces a non-finite step or leaves the configured bounds, bisection
/// takes over on `[lower_bound, upper_bound]`, provided the NPV changes sign
/// there. Flows of a single sign, fewer than two non-zero flows or a missing
/// bracket leave the rate undefined.
pub fn calculate_xirr(flows: &[CashFlow], settings: &IrrSettings) -> IrrResult {
    let Some(first_date) = flows.iter().map(|flow| flow.date).min() else {
        return IrrResult::undefined(0);
    };

    let series: Vec<(f64, f64)> = flows
        .iter()
        .filter_map(|flow| {
            flow.amount
                .to_f64()
                .map(|amount| (amount, year_fraction(first_date, flow.date)))
        })
        .filter(|(amount, _)| *amount != 0.0)
        .collect();

    let has_inflow = series.iter().any(|(amount, _)| *amount > 0.0);
    let has_outflow = series.iter().any(|(amount, _)| *amount < 0.0);
    if series.len() < 2 || !has_inflow || !has_outflow {
        return IrrResult::undefined(0);
    }

    let mut iterations = 0;
    let mut rate = settings.initial_guess;
    for _ in 0..settings.max_iterations {
        iterations += 1;
        let (npv, derivative) = npv_and_derivative(&series, rate);
        if !npv.is_finite() || !derivative.is_finite() || derivative.abs() < f64::EPSILON {
            break;
        }

        let next = rate - npv / derivative;
        if !next.is_finite() || next < settings.lower_bound || next > settings.upper_bound {
            break;
        }
        if (next - rate).abs() < settings.tolerance {
            return IrrResult::converged(next, IrrMethod::Newton, iterations);
        }
        rate = next;
    }

    debug!(
        "Newton-Raphson did not converge after {} iterations, falling back to bisection",
        iterations
    );
    bisect(&series, settings, iterations)
}

fn bisect(series: &[(f64, f64)], settings: &IrrSettings, mut iterations: u32) -> IrrResult {
    let mut low = settings.lower_bound;
    let mut high = settings.upper_bound;
    let mut npv_low = npv_and_derivative(series, low).0;
    let npv_high = npv_and_derivative(series, high).0;

    if !npv_low.is_finite() || !npv_high.is_finite() {
        return IrrResult::undefined(iterations);
    }
    if npv_low == 0.0 {
        return IrrResult::converged(low, IrrMethod::Bisection, iterations);
    }
    if npv_high == 0.0 {
        return IrrResult::converged(high, IrrMethod::Bisection, iterations);
    }
    if npv_low.signum() == npv_high.signum() {
        debug!("No sign change of the NPV within [{}, {}]", low, high);
        return IrrResult::undefined(iterations);
    }

    for _ in 0..settings.bisection_iterations {
        iterations += 1;
        let mid = (low + high) / 2.0;
        let npv_mid = npv_and_derivative(series, mid).0;
        if npv_mid == 0.0 || (high - low) / 2.0 < settings.tolerance {
            return IrrResult::converged(mid, IrrMethod::Bisection, iterations);
        }
        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }
    IrrResult::undefined(iterations)
}

/// NPV of `(amount, years)` pairs at `rate` and its derivative in `rate`.
fn npv_and_derivative(series: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut derivative = 0.0;
    for (amount, years) in series {
        let discount = (1.0 + rate).powf(*years);
        npv += amount / discount;
        derivative -= years * amount / (discount * (1.0 + rate));
    }
    (npv, derivative)
}

/// Builds the cash flows of one position over an interval.
pub struct IrrCalculation<'a> {
    term_currency: &'a str,
    converter: &'a dyn CurrencyConverterTrait,
}

impl<'a> IrrCalculation<'a> {
    pub fn new(term_currency: &'a str, converter: &'a dyn CurrencyConverterTrait) -> Self {
        IrrCalculation {
            term_currency,
            converter,
        }
    }

    /// The opening market value is invested at the start of the interval and
    /// the closing market value is received at its end; in between, every
    /// transaction of the period moves its converted amount in or out.
    /// Zero flows are dropped.
    pub fn cash_flows(
        &self,
        transactions: &[Transaction],
        interval: &Interval,
        opening_value: Decimal,
        closing_value: Decimal,
    ) -> Result<Vec<CashFlow>> {
        let mut flows = vec![CashFlow::new(interval.start, -opening_value)];

        for transaction in transactions
            .iter()
            .filter(|t| interval.contains(t.trade_date()))
        {
            let amount =
                ConvertedAmounts::of(transaction, self.term_currency, self.converter)?.amount;
            let signed = match transaction.kind {
                TransactionKind::Buy { .. }
                | TransactionKind::InboundTransfer { .. }
                | TransactionKind::InterestCharge
                | TransactionKind::Fee
                | TransactionKind::Tax => -amount,
                TransactionKind::Sell { .. }
                | TransactionKind::OutboundTransfer { .. }
                | TransactionKind::Dividend { .. }
                | TransactionKind::Interest
                | TransactionKind::FeeRefund
                | TransactionKind::TaxRefund => amount,
            };
            flows.push(CashFlow::new(transaction.trade_date(), signed));
        }

        flows.push(CashFlow::new(interval.end, closing_value));
        flows.retain(|flow| !flow.amount.is_zero());
        Ok(flows)
    }
}
