use log::{debug, error, info};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::security_performance_record::SecurityPerformanceRecord;
use crate::errors::{CalculatorError, Error, Result};
use crate::fx::CurrencyConverterTrait;
use crate::money::Money;
use crate::portfolio::gains::DailyCapitalGains;
use crate::portfolio::lots::CostMethod;
use crate::quotes::QuoteStore;
use crate::settings::CalculationSettings;
use crate::transactions::{Security, Transaction};
use crate::utils::Interval;

/// A security whose record could not be calculated.
#[derive(Debug)]
pub struct SecurityCalculationFailure {
    pub security_id: String,
    pub error: Error,
}

/// Performance records of every active security over one interval.
///
/// A failure in one security is collected in [`failures`](Self::failures)
/// and never aborts the others.
#[derive(Debug)]
pub struct SecurityPerformanceSnapshot {
    interval: Interval,
    term_currency: String,
    daily_cost_method: Option<CostMethod>,
    records: Vec<SecurityPerformanceRecord>,
    failures: Vec<SecurityCalculationFailure>,
}

impl SecurityPerformanceSnapshot {
    /// Groups `transactions` by security and calculates one record per
    /// security that was held at the start or traded during the interval.
    /// Transactions without a security are ignored.
    pub fn create(
        securities: &[Security],
        transactions: &[Transaction],
        interval: Interval,
        converter: &dyn CurrencyConverterTrait,
        quotes: &dyn QuoteStore,
        settings: &CalculationSettings,
    ) -> Result<Self> {
        settings.validate()?;

        let mut groups: BTreeMap<&str, Vec<Transaction>> = BTreeMap::new();
        for transaction in transactions {
            if let Some(security_id) = transaction.security_id.as_deref() {
                groups
                    .entry(security_id)
                    .or_default()
                    .push(transaction.clone());
            }
        }

        let by_id: BTreeMap<&str, &Security> =
            securities.iter().map(|s| (s.id.as_str(), s)).collect();
        let mut failures = Vec::new();
        let mut jobs = Vec::with_capacity(groups.len());
        for (security_id, group) in groups {
            match by_id.get(security_id) {
                Some(security) => jobs.push((*security, group)),
                None => {
                    error!("Transactions reference unknown security {}", security_id);
                    failures.push(SecurityCalculationFailure {
                        security_id: security_id.to_string(),
                        error: CalculatorError::UnknownSecurity(security_id.to_string()).into(),
                    });
                }
            }
        }

        info!(
            "Calculating performance of {} securities from {} to {}",
            jobs.len(),
            interval.start,
            interval.end
        );

        let calculate = |(security, group): &(&Security, Vec<Transaction>)| {
            let outcome = SecurityPerformanceRecord::calculate(
                security, group, interval, converter, quotes, settings,
            )
            .map(|record| {
                let active = record.is_active(group);
                (record, active)
            });
            (security.id.clone(), outcome)
        };
        let outcomes: Vec<_> = if settings.parallel {
            jobs.par_iter().map(calculate).collect()
        } else {
            jobs.iter().map(calculate).collect()
        };

        let mut records = Vec::with_capacity(outcomes.len());
        for (security_id, outcome) in outcomes {
            match outcome {
                Ok((record, true)) => records.push(record),
                Ok((_, false)) => debug!("Skipping {}: no position and no activity", security_id),
                Err(err) => {
                    error!("Performance calculation failed for {}: {}", security_id, err);
                    failures.push(SecurityCalculationFailure {
                        security_id,
                        error: err,
                    });
                }
            }
        }
        failures.sort_by(|a, b| a.security_id.cmp(&b.security_id));

        Ok(SecurityPerformanceSnapshot {
            interval,
            term_currency: settings.term_currency.clone(),
            daily_cost_method: settings.include_daily.then_some(settings.daily_cost_method),
            records,
            failures,
        })
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn term_currency(&self) -> &str {
        &self.term_currency
    }

    /// Records sorted by security id.
    pub fn records(&self) -> &[SecurityPerformanceRecord] {
        &self.records
    }

    pub fn record(&self, security_id: &str) -> Option<&SecurityPerformanceRecord> {
        self.records.iter().find(|r| r.security.id == security_id)
    }

    pub fn failures(&self) -> &[SecurityCalculationFailure] {
        &self.failures
    }

    pub fn total_shares_held(&self) -> Decimal {
        self.records.iter().map(|r| r.shares_held).sum()
    }

    /// Sum of the available market values.
    pub fn total_market_value(&self) -> Money {
        Money::sum(
            &self.term_currency,
            self.records.iter().filter_map(|r| r.market_value.as_ref()),
        )
    }

    /// True when a held position could not be valued.
    pub fn has_unavailable_market_value(&self) -> bool {
        self.records.iter().any(|r| r.market_value.is_none())
    }

    /// Realized FIFO gains of the period.
    pub fn total_realized_fifo(&self) -> Money {
        Money::sum(
            &self.term_currency,
            self.records
                .iter()
                .map(|r| &r.capital_gains.period_realized_fifo.gains),
        )
    }

    /// Realized moving-average gains of the period.
    pub fn total_realized_moving_average(&self) -> Money {
        Money::sum(
            &self.term_currency,
            self.records
                .iter()
                .map(|r| &r.capital_gains.period_realized_moving_average.gains),
        )
    }

    /// Unrealized FIFO gains at the interval end, over the valued positions.
    pub fn total_unrealized_fifo(&self) -> Money {
        Money::sum(
            &self.term_currency,
            self.records
                .iter()
                .filter_map(|r| r.capital_gains.unrealized_fifo.as_ref())
                .map(|record| &record.gains),
        )
    }

    pub fn total_unrealized_moving_average(&self) -> Money {
        Money::sum(
            &self.term_currency,
            self.records
                .iter()
                .filter_map(|r| r.capital_gains.unrealized_moving_average.as_ref())
                .map(|record| &record.gains),
        )
    }

    /// Gross dividends of the period.
    pub fn total_dividends(&self) -> Money {
        Money::sum(
            &self.term_currency,
            self.records.iter().map(|r| &r.dividends.sum),
        )
    }

    /// Daily series of all records merged; `None` unless daily series were
    /// requested.
    pub fn daily(&self) -> Result<Option<DailyCapitalGains>> {
        let Some(method) = self.daily_cost_method else {
            return Ok(None);
        };
        let mut merged = DailyCapitalGains::empty(self.interval, &self.term_currency, method);
        for daily in self.records.iter().filter_map(|r| r.daily.as_ref()) {
            merged = merged.merge(daily)?;
        }
        Ok(Some(merged))
    }
}
