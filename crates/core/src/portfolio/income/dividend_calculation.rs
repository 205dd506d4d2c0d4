use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::income_model::{DividendStatistics, Periodicity};
use crate::constants::RATIO_SCALE;
use crate::money::{round_quote, Money};
use crate::portfolio::lots::{DividendPayment, LotTracker};
use crate::utils::time_utils::months_between_rounded;
use crate::utils::Interval;

pub struct DividendCalculation;

impl DividendCalculation {
    /// Classifies the payment rhythm from all known payment dates.
    ///
    /// Each gap between consecutive payments is rounded to whole months and
    /// bucketed. A gap of up to twice the finest rhythm counts as that rhythm
    /// with one missed payment, provided the finer rhythm is seen at least as
    /// often as the next coarser one. The most frequent bucket then wins and
    /// a tie goes to the bucket observed most recently. Payments less than
    /// half a month apart are treated as one event.
    pub fn periodicity(dates: &[NaiveDate]) -> Periodicity {
        let mut sorted = dates.to_vec();
        sorted.sort();
        sorted.dedup();

        match sorted.len() {
            0 => return Periodicity::None,
            1 => return Periodicity::Unknown,
            _ => {}
        }

        let gaps: Vec<(Periodicity, i64)> = sorted
            .windows(2)
            .map(|pair| months_between_rounded(pair[0], pair[1]))
            .filter(|months| *months > 0)
            .map(|months| (Periodicity::from_gap_months(months), months))
            .collect();

        // bucket -> (count, index of latest gap)
        let mut tally: BTreeMap<Periodicity, (usize, usize)> = BTreeMap::new();
        for (index, bucket) in Self::absorb_missed_payments(&gaps).into_iter().enumerate() {
            let entry = tally.entry(bucket).or_insert((0, index));
            entry.0 += 1;
            entry.1 = index;
        }

        tally
            .into_iter()
            .max_by_key(|(_, (count, latest))| (*count, *latest))
            .map(|(bucket, _)| bucket)
            .unwrap_or(Periodicity::Unknown)
    }

    /// Re-buckets gaps of the next coarser rhythm that span at most two
    /// periods of the finest rhythm.
    fn absorb_missed_payments(gaps: &[(Periodicity, i64)]) -> Vec<Periodicity> {
        let buckets = gaps.iter().map(|(bucket, _)| *bucket);
        let Some(finest) = buckets.clone().min() else {
            return Vec::new();
        };
        let (Some(nominal), Some(coarser)) = (finest.nominal_months(), finest.coarser()) else {
            return buckets.collect();
        };

        let count = |wanted: Periodicity| buckets.clone().filter(|b| *b == wanted).count();
        if count(finest) < count(coarser) {
            return buckets.collect();
        }

        gaps.iter()
            .map(|&(bucket, months)| {
                if bucket == coarser && months <= 2 * nominal {
                    finest
                } else {
                    bucket
                }
            })
            .collect()
    }

    /// Average over calendar years of the summed per-payment yields, each
    /// payment measured against the moving-average cost held when it was
    /// paid. Payments made while no cost was held are ignored.
    pub fn rate_of_return_per_year(payments: &[DividendPayment]) -> Option<Decimal> {
        let mut per_year: BTreeMap<i32, Decimal> = BTreeMap::new();
        for payment in payments {
            if payment.moving_average_cost <= Decimal::ZERO {
                continue;
            }
            *per_year.entry(payment.date.year()).or_insert(Decimal::ZERO) +=
                payment.amount / payment.moving_average_cost;
        }
        if per_year.is_empty() {
            return None;
        }
        let total: Decimal = per_year.values().copied().sum();
        Some((total / Decimal::from(per_year.len())).round_dp(RATIO_SCALE))
    }

    /// Gross dividends of the `window_days` up to and including `as_of`,
    /// divided by `cost`.
    pub fn yield_on_cost(
        payments: &[DividendPayment],
        as_of: NaiveDate,
        window_days: i64,
        cost: Decimal,
    ) -> Option<Decimal> {
        if cost <= Decimal::ZERO {
            return None;
        }
        let from = as_of - Duration::days(window_days);
        let sum: Decimal = payments
            .iter()
            .filter(|p| p.date > from && p.date <= as_of)
            .map(|p| p.amount)
            .sum();
        Some((sum / cost).round_dp(RATIO_SCALE))
    }

    /// Dividend figures for the period of `interval`.
    ///
    /// `closing` is the tracker replayed through the end of the period;
    /// `all_dates` are every known payment date of the security and only
    /// feed the periodicity.
    pub fn perform(
        closing: &LotTracker,
        interval: &Interval,
        all_dates: &[NaiveDate],
        window_days: i64,
    ) -> DividendStatistics {
        let currency = closing.term_currency();
        let payments = closing.dividends();
        let in_period: Vec<&DividendPayment> = payments
            .iter()
            .filter(|p| interval.contains(p.date))
            .collect();

        let sum: Decimal = in_period.iter().map(|p| p.amount).sum();
        let net_sum: Decimal = in_period.iter().map(|p| p.net_amount).sum();
        let dividend_per_share: Decimal = in_period
            .iter()
            .filter(|p| p.shares > Decimal::ZERO)
            .map(|p| p.amount / p.shares)
            .sum();

        let ratio = |cost: Decimal| {
            if closing.shares_held().is_zero() || cost <= Decimal::ZERO {
                None
            } else {
                Some((sum / cost).round_dp(RATIO_SCALE))
            }
        };

        DividendStatistics {
            event_count: in_period.len(),
            sum: Money::new(sum, currency),
            net_sum: Money::new(net_sum, currency),
            last_payment: in_period.iter().map(|p| p.date).max(),
            dividend_per_share: round_quote(dividend_per_share),
            periodicity: Self::periodicity(all_dates),
            personal_yield_fifo: ratio(closing.fifo_cost()),
            personal_yield_moving_average: ratio(closing.moving_average().cost),
            rate_of_return_per_year: Self::rate_of_return_per_year(payments),
            yield_on_cost: Self::yield_on_cost(
                payments,
                interval.end,
                window_days,
                closing.fifo_cost(),
            ),
        }
    }
}
