use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use super::fx_errors::FxError;
use crate::constants::MONEY_SCALE;

/// Source of exchange rates for the calculation engine.
///
/// Implementations must be pure lookups over pre-loaded data; the engine calls
/// them synchronously, possibly from several rayon workers at once.
pub trait CurrencyConverterTrait: Send + Sync {
    /// Rate to multiply an amount in `from_currency` by to obtain `to_currency`.
    fn get_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError>;

    /// Converts `amount` and rounds the result to the minor currency unit.
    /// Never substitutes a rate when none is available.
    fn convert_amount(
        &self,
        amount: Decimal,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Decimal, FxError> {
        if from_currency == to_currency {
            return Ok(amount);
        }
        let rate = self.get_rate(from_currency, to_currency, date)?;
        Ok((amount * rate).round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero))
    }
}
