//! Builders shared by unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::fx::CurrencyConverter;
use crate::money::Money;
use crate::transactions::{Transaction, TransactionKind, Unit};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(0, 0, 0).unwrap()
}

pub fn eur(amount: Decimal) -> Money {
    Money::new(amount, "EUR")
}

pub fn no_rates() -> CurrencyConverter {
    CurrencyConverter::default()
}

pub fn tx(
    id: &str,
    security: &str,
    when: NaiveDate,
    kind: TransactionKind,
    amount: Money,
) -> Transaction {
    Transaction::new(kind, when.and_hms_opt(0, 0, 0).unwrap(), Some(security), amount).with_id(id)
}

pub fn buy(id: &str, security: &str, when: NaiveDate, shares: Decimal, amount: Decimal) -> Transaction {
    tx(id, security, when, TransactionKind::Buy { shares }, eur(amount))
}

pub fn sell(id: &str, security: &str, when: NaiveDate, shares: Decimal, amount: Decimal) -> Transaction {
    tx(id, security, when, TransactionKind::Sell { shares }, eur(amount))
}

pub fn dividend(
    id: &str,
    security: &str,
    when: NaiveDate,
    shares: Decimal,
    amount: Decimal,
) -> Transaction {
    tx(id, security, when, TransactionKind::Dividend { shares }, eur(amount))
}

pub fn with_fee(t: Transaction, fee: Decimal) -> Transaction {
    let currency = t.amount.currency.clone();
    t.with_unit(Unit::fee(Money::new(fee, &currency)))
}

pub fn with_tax(t: Transaction, tax: Decimal) -> Transaction {
    let currency = t.amount.currency.clone();
    t.with_unit(Unit::tax(Money::new(tax, &currency)))
}
