use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::VecDeque;

use super::lots_model::{Disposal, DividendPayment, Lot, LotConsumption, MovingAverage};
use crate::errors::{CalculatorError, Result};
use crate::fx::CurrencyConverterTrait;
use crate::money::{is_quantity_significant, round_amount};
use crate::transactions::{Transaction, TransactionKind};

/// Monetary parts of a transaction converted into the term currency at the
/// transaction's own date.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConvertedAmounts {
    pub amount: Decimal,
    pub fees: Decimal,
    pub taxes: Decimal,
    pub gross_value: Decimal,
}

impl ConvertedAmounts {
    pub(crate) fn of(
        transaction: &Transaction,
        term_currency: &str,
        converter: &dyn CurrencyConverterTrait,
    ) -> Result<Self> {
        let date = transaction.trade_date();
        let local = transaction.currency();

        // Units normally share the transaction currency; bring strays over first.
        let mut local_fees = Decimal::ZERO;
        for fee in transaction.fees() {
            local_fees += converter.convert_amount(fee.amount, &fee.currency, local, date)?;
        }
        let mut local_taxes = Decimal::ZERO;
        for tax in transaction.taxes() {
            local_taxes += converter.convert_amount(tax.amount, &tax.currency, local, date)?;
        }

        // A gross-value unit quoted in the term currency carries the rate the
        // trade was actually settled at.
        let settled_rate = transaction
            .gross_value_unit()
            .filter(|(_, forex, rate)| forex.currency == term_currency && *rate > Decimal::ZERO)
            .map(|(_, _, rate)| Decimal::ONE / rate);

        let to_term = |value: Decimal| -> Result<Decimal> {
            match settled_rate {
                Some(rate) if local != term_currency => Ok(round_amount(value * rate)),
                _ => Ok(round_amount(converter.convert_amount(
                    value,
                    local,
                    term_currency,
                    date,
                )?)),
            }
        };

        let gross_value = match transaction.gross_value_unit() {
            Some((_, forex, _)) if forex.currency == term_currency => round_amount(forex.amount),
            Some((gross, _, _)) => round_amount(converter.convert_amount(
                gross.amount,
                &gross.currency,
                term_currency,
                date,
            )?),
            None if transaction.kind.is_outflow() => {
                to_term(transaction.amount.amount - local_fees - local_taxes)?
            }
            None => to_term(transaction.amount.amount + local_fees + local_taxes)?,
        };

        Ok(ConvertedAmounts {
            amount: to_term(transaction.amount.amount)?,
            fees: to_term(local_fees)?,
            taxes: to_term(local_taxes)?,
            gross_value,
        })
    }
}

/// Per-security replay state for both cost conventions.
///
/// The tracker is advanced with [`LotTracker::apply`], which consumes the
/// current state and returns the next one, so a replay is a plain fold over
/// the chronologically sorted transactions. All amounts are in the term
/// currency.
#[derive(Debug, Clone)]
pub struct LotTracker {
    security_id: String,
    term_currency: String,
    lots: VecDeque<Lot>,
    moving_average: MovingAverage,
    fees: Decimal,
    taxes: Decimal,
    disposals: Vec<Disposal>,
    dividends: Vec<DividendPayment>,
    last_date: Option<NaiveDate>,
}

impl LotTracker {
    pub fn new(security_id: &str, term_currency: &str) -> Self {
        LotTracker {
            security_id: security_id.to_string(),
            term_currency: term_currency.to_string(),
            lots: VecDeque::new(),
            moving_average: MovingAverage::default(),
            fees: Decimal::ZERO,
            taxes: Decimal::ZERO,
            disposals: Vec::new(),
            dividends: Vec::new(),
            last_date: None,
        }
    }

    /// Folds `transactions` into the tracker in iteration order.
    pub fn replay<'a, I>(self, transactions: I, converter: &dyn CurrencyConverterTrait) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .try_fold(self, |tracker, transaction| tracker.apply(transaction, converter))
    }

    /// Applies one transaction and returns the resulting state.
    pub fn apply(
        mut self,
        transaction: &Transaction,
        converter: &dyn CurrencyConverterTrait,
    ) -> Result<Self> {
        match transaction.security_id.as_deref() {
            None => {
                debug!(
                    "Skipping cash transaction {} without security while replaying {}",
                    transaction.id, self.security_id
                );
                return Ok(self);
            }
            Some(id) if id != self.security_id => {
                return Err(CalculatorError::ForeignTransaction {
                    transaction_id: transaction.id.clone(),
                    expected: self.security_id.clone(),
                    found: id.to_string(),
                }
                .into());
            }
            Some(_) => {}
        }
        transaction.validate()?;

        if let Some(last) = self.last_date {
            if transaction.trade_date() < last {
                return Err(CalculatorError::InvalidTransaction(format!(
                    "Transaction {} on {} is out of chronological order (previous {})",
                    transaction.id,
                    transaction.trade_date(),
                    last
                ))
                .into());
            }
        }
        self.last_date = Some(transaction.trade_date());

        let amounts = ConvertedAmounts::of(transaction, &self.term_currency, converter)?;

        match transaction.kind {
            TransactionKind::Buy { shares } | TransactionKind::InboundTransfer { shares } => {
                self.acquire(transaction, shares, &amounts);
            }
            TransactionKind::Sell { shares } | TransactionKind::OutboundTransfer { shares } => {
                self.dispose(transaction, shares, &amounts);
            }
            TransactionKind::Dividend { shares } => {
                self.record_dividend(transaction, shares, &amounts);
            }
            TransactionKind::Fee => self.fees += amounts.amount,
            TransactionKind::FeeRefund => self.fees -= amounts.amount,
            TransactionKind::Tax => self.taxes += amounts.amount,
            TransactionKind::TaxRefund => self.taxes -= amounts.amount,
            TransactionKind::Interest | TransactionKind::InterestCharge => {}
        }

        self.fees += amounts.fees;
        self.taxes += amounts.taxes;
        Ok(self)
    }

    fn acquire(&mut self, transaction: &Transaction, shares: Decimal, amounts: &ConvertedAmounts) {
        if !shares.is_sign_positive() || !is_quantity_significant(&shares) {
            warn!(
                "Skipping lot for transaction {} with non-positive shares: {}",
                transaction.id, shares
            );
            return;
        }

        let cost = amounts.gross_value + amounts.fees;
        let net_cost = amounts.gross_value;

        self.lots.push_back(Lot {
            transaction_id: transaction.id.clone(),
            acquisition_date: transaction.trade_date(),
            shares,
            original_shares: shares,
            cost,
            net_cost,
        });
        self.moving_average.add(shares, cost, net_cost);
    }

    fn dispose(&mut self, transaction: &Transaction, shares: Decimal, amounts: &ConvertedAmounts) {
        if !shares.is_sign_positive() || !is_quantity_significant(&shares) {
            warn!(
                "Skipping disposal {} with non-positive shares: {}",
                transaction.id, shares
            );
            return;
        }

        let mut remaining = shares;
        let mut consumed = Vec::new();
        let mut fifo_cost = Decimal::ZERO;
        let mut fifo_net_cost = Decimal::ZERO;

        while remaining > Decimal::ZERO {
            let Some(lot) = self.lots.front_mut() else {
                break;
            };
            let taken = remaining.min(lot.shares);
            let (cost, net_cost) = lot.slice(taken);

            consumed.push(LotConsumption {
                transaction_id: lot.transaction_id.clone(),
                acquisition_date: lot.acquisition_date,
                shares: taken,
                cost,
                net_cost,
            });
            fifo_cost += cost;
            fifo_net_cost += net_cost;
            remaining -= taken;

            lot.shares -= taken;
            lot.cost -= cost;
            lot.net_cost -= net_cost;
            if lot.shares <= Decimal::ZERO {
                self.lots.pop_front();
            }
        }

        if remaining > Decimal::ZERO {
            warn!(
                "Transaction {} sells {} shares of {} but only {} were held; {} shares have no cost basis",
                transaction.id,
                shares,
                self.security_id,
                shares - remaining,
                remaining
            );
        }

        let (moving_average_cost, moving_average_net_cost) = self.moving_average.consume(shares);
        if self.lots.is_empty() {
            self.moving_average = MovingAverage::default();
        }

        self.disposals.push(Disposal {
            transaction_id: transaction.id.clone(),
            date: transaction.trade_date(),
            shares,
            matched_shares: shares - remaining,
            unmatched_shares: remaining,
            proceeds: amounts.gross_value,
            fifo_consumed: consumed,
            fifo_cost,
            fifo_net_cost,
            moving_average_cost,
            moving_average_net_cost,
        });
    }

    fn record_dividend(
        &mut self,
        transaction: &Transaction,
        shares: Decimal,
        amounts: &ConvertedAmounts,
    ) {
        self.dividends.push(DividendPayment {
            transaction_id: transaction.id.clone(),
            date: transaction.trade_date(),
            amount: amounts.gross_value,
            net_amount: amounts.amount,
            taxes: amounts.taxes,
            shares,
            shares_held: self.shares_held(),
            fifo_cost: self.fifo_cost(),
            moving_average_cost: self.moving_average.cost,
        });
    }

    pub fn security_id(&self) -> &str {
        &self.security_id
    }

    pub fn term_currency(&self) -> &str {
        &self.term_currency
    }

    pub fn lots(&self) -> &VecDeque<Lot> {
        &self.lots
    }

    pub fn moving_average(&self) -> &MovingAverage {
        &self.moving_average
    }

    pub fn shares_held(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.shares).sum()
    }

    pub fn fifo_cost(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.cost).sum()
    }

    pub fn net_fifo_cost(&self) -> Decimal {
        self.lots.iter().map(|lot| lot.net_cost).sum()
    }

    pub fn fees(&self) -> Decimal {
        self.fees
    }

    pub fn taxes(&self) -> Decimal {
        self.taxes
    }

    /// Every disposal replayed so far, oldest first.
    pub fn disposals(&self) -> &[Disposal] {
        &self.disposals
    }

    /// Every dividend replayed so far, oldest first.
    pub fn dividends(&self) -> &[DividendPayment] {
        &self.dividends
    }
}
