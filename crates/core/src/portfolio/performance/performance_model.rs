use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dated cash flow from the investor's point of view: money paid in is
/// negative, money received is positive. Amounts are in the term currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        CashFlow { date, amount }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IrrMethod {
    Newton,
    Bisection,
}

/// Outcome of the IRR solver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IrrResult {
    /// Annual rate as a ratio (0.1 = 10%); `None` when undefined.
    pub irr: Option<f64>,
    /// Solver that produced the rate.
    pub method: Option<IrrMethod>,
    pub iterations: u32,
}

impl IrrResult {
    pub fn undefined(iterations: u32) -> Self {
        IrrResult {
            irr: None,
            method: None,
            iterations,
        }
    }

    pub(crate) fn converged(irr: f64, method: IrrMethod, iterations: u32) -> Self {
        IrrResult {
            irr: Some(irr),
            method: Some(method),
            iterations,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.irr.is_some()
    }
}
