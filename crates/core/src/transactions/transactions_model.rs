use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ValidationError};
use crate::money::Money;

/// A security tracked by the engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub id: String,
    pub name: String,
    /// Currency the security is quoted in.
    pub currency: String,
}

impl Security {
    pub fn new(id: &str, name: &str, currency: &str) -> Self {
        Security {
            id: id.to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
        }
    }
}

/// What a transaction does. Share-moving kinds carry their share count.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Buy { shares: Decimal },
    Sell { shares: Decimal },
    InboundTransfer { shares: Decimal },
    OutboundTransfer { shares: Decimal },
    /// `shares` is the entitled share count the dividend was paid on.
    Dividend { shares: Decimal },
    Interest,
    InterestCharge,
    Fee,
    FeeRefund,
    Tax,
    TaxRefund,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        use crate::transactions::transactions_constants::*;
        match self {
            TransactionKind::Buy { .. } => TRANSACTION_TYPE_BUY,
            TransactionKind::Sell { .. } => TRANSACTION_TYPE_SELL,
            TransactionKind::InboundTransfer { .. } => TRANSACTION_TYPE_INBOUND_TRANSFER,
            TransactionKind::OutboundTransfer { .. } => TRANSACTION_TYPE_OUTBOUND_TRANSFER,
            TransactionKind::Dividend { .. } => TRANSACTION_TYPE_DIVIDEND,
            TransactionKind::Interest => TRANSACTION_TYPE_INTEREST,
            TransactionKind::InterestCharge => TRANSACTION_TYPE_INTEREST_CHARGE,
            TransactionKind::Fee => TRANSACTION_TYPE_FEE,
            TransactionKind::FeeRefund => TRANSACTION_TYPE_FEE_REFUND,
            TransactionKind::Tax => TRANSACTION_TYPE_TAX,
            TransactionKind::TaxRefund => TRANSACTION_TYPE_TAX_REFUND,
        }
    }

    /// Builds a kind from its wire name. `shares` is ignored for cash kinds.
    pub fn from_parts(name: &str, shares: Decimal) -> std::result::Result<Self, String> {
        use crate::transactions::transactions_constants::*;
        match name {
            s if s == TRANSACTION_TYPE_BUY => Ok(TransactionKind::Buy { shares }),
            s if s == TRANSACTION_TYPE_SELL => Ok(TransactionKind::Sell { shares }),
            s if s == TRANSACTION_TYPE_INBOUND_TRANSFER => {
                Ok(TransactionKind::InboundTransfer { shares })
            }
            s if s == TRANSACTION_TYPE_OUTBOUND_TRANSFER => {
                Ok(TransactionKind::OutboundTransfer { shares })
            }
            s if s == TRANSACTION_TYPE_DIVIDEND => Ok(TransactionKind::Dividend { shares }),
            s if s == TRANSACTION_TYPE_INTEREST => Ok(TransactionKind::Interest),
            s if s == TRANSACTION_TYPE_INTEREST_CHARGE => Ok(TransactionKind::InterestCharge),
            s if s == TRANSACTION_TYPE_FEE => Ok(TransactionKind::Fee),
            s if s == TRANSACTION_TYPE_FEE_REFUND => Ok(TransactionKind::FeeRefund),
            s if s == TRANSACTION_TYPE_TAX => Ok(TransactionKind::Tax),
            s if s == TRANSACTION_TYPE_TAX_REFUND => Ok(TransactionKind::TaxRefund),
            _ => Err(format!("Unknown transaction type: {}", name)),
        }
    }

    /// Share count carried by the kind, zero for cash-only kinds.
    pub fn shares(&self) -> Decimal {
        match self {
            TransactionKind::Buy { shares }
            | TransactionKind::Sell { shares }
            | TransactionKind::InboundTransfer { shares }
            | TransactionKind::OutboundTransfer { shares }
            | TransactionKind::Dividend { shares } => *shares,
            TransactionKind::Interest
            | TransactionKind::InterestCharge
            | TransactionKind::Fee
            | TransactionKind::FeeRefund
            | TransactionKind::Tax
            | TransactionKind::TaxRefund => Decimal::ZERO,
        }
    }

    /// True for kinds that open a lot.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            TransactionKind::Buy { .. } | TransactionKind::InboundTransfer { .. }
        )
    }

    /// True for kinds that consume lots.
    pub fn is_disposal(&self) -> bool {
        matches!(
            self,
            TransactionKind::Sell { .. } | TransactionKind::OutboundTransfer { .. }
        )
    }

    /// True when the monetary amount leaves the investor's pocket.
    pub fn is_outflow(&self) -> bool {
        match self {
            TransactionKind::Buy { .. }
            | TransactionKind::InboundTransfer { .. }
            | TransactionKind::InterestCharge
            | TransactionKind::Fee
            | TransactionKind::Tax => true,
            TransactionKind::Sell { .. }
            | TransactionKind::OutboundTransfer { .. }
            | TransactionKind::Dividend { .. }
            | TransactionKind::Interest
            | TransactionKind::FeeRefund
            | TransactionKind::TaxRefund => false,
        }
    }
}

/// A component of a transaction's monetary amount.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    Fee { amount: Money },
    Tax { amount: Money },
    /// Gross value of a foreign-currency trade: `amount` in the transaction
    /// currency, `forex` in the security currency, `exchange_rate` converting
    /// forex into local.
    GrossValue {
        amount: Money,
        forex: Money,
        exchange_rate: Decimal,
    },
}

impl Unit {
    pub fn fee(amount: Money) -> Self {
        Unit::Fee { amount }
    }

    pub fn tax(amount: Money) -> Self {
        Unit::Tax { amount }
    }

    pub fn gross_value(amount: Money, forex: Money, exchange_rate: Decimal) -> Self {
        Unit::GrossValue {
            amount,
            forex,
            exchange_rate,
        }
    }
}

/// An immutable entry from the transaction history.
///
/// `amount` is what moved in cash: for a buy the total paid including fees
/// and taxes, for a sale or dividend the net amount received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDateTime,
    pub security_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Money,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        date: NaiveDateTime,
        security_id: Option<&str>,
        amount: Money,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4().to_string(),
            date,
            security_id: security_id.map(str::to_string),
            kind,
            amount,
            units: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn trade_date(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn shares(&self) -> Decimal {
        self.kind.shares()
    }

    pub fn currency(&self) -> &str {
        &self.amount.currency
    }

    pub fn fees(&self) -> impl Iterator<Item = &Money> {
        self.units.iter().filter_map(|unit| match unit {
            Unit::Fee { amount } => Some(amount),
            _ => None,
        })
    }

    pub fn taxes(&self) -> impl Iterator<Item = &Money> {
        self.units.iter().filter_map(|unit| match unit {
            Unit::Tax { amount } => Some(amount),
            _ => None,
        })
    }

    /// The gross-value unit of a foreign-currency trade, if any.
    pub fn gross_value_unit(&self) -> Option<(&Money, &Money, Decimal)> {
        self.units.iter().find_map(|unit| match unit {
            Unit::GrossValue {
                amount,
                forex,
                exchange_rate,
            } => Some((amount, forex, *exchange_rate)),
            _ => None,
        })
    }

    pub fn belongs_to(&self, security_id: &str) -> bool {
        self.security_id.as_deref() == Some(security_id)
    }

    /// Rejects negative shares and negative amounts.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        if self.shares().is_sign_negative() && !self.shares().is_zero() {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction {} has negative shares {}",
                self.id,
                self.shares()
            ))
            .into());
        }
        if self.amount.is_negative() {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction {} has negative amount {}",
                self.id, self.amount
            ))
            .into());
        }
        let negative_unit = self.units.iter().any(|unit| match unit {
            Unit::Fee { amount } | Unit::Tax { amount } => amount.is_negative(),
            Unit::GrossValue { amount, forex, .. } => amount.is_negative() || forex.is_negative(),
        });
        if negative_unit {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction {} has a negative unit",
                self.id
            ))
            .into());
        }
        Ok(())
    }
}

/// Stable sort by timestamp; transactions at the same instant keep input order.
pub fn sort_chronologically(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|t| t.date);
}
