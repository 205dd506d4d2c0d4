use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::valuation_model::Valuation;
use crate::errors::Result;
use crate::fx::CurrencyConverterTrait;
use crate::money::round_amount;
use crate::quotes::QuoteStore;
use crate::transactions::Security;

/// Values `shares` of `security` on `date` in the term currency.
///
/// The value is `round(shares * price)` in the security currency, converted
/// at `date`. A missing price leaves the value unavailable; a missing
/// exchange rate is an error.
pub fn value_position(
    security: &Security,
    shares: Decimal,
    date: NaiveDate,
    term_currency: &str,
    quotes: &dyn QuoteStore,
    converter: &dyn CurrencyConverterTrait,
) -> Result<Valuation> {
    let price = quotes.latest_price(&security.id, date);

    let market_value = if shares.is_zero() {
        Some(Decimal::ZERO)
    } else if let Some(quote) = &price {
        let local = round_amount(shares * quote.value);
        Some(round_amount(converter.convert_amount(
            local,
            &security.currency,
            term_currency,
            date,
        )?))
    } else {
        debug!(
            "No price for {} on or before {}; market value unavailable",
            security.id, date
        );
        None
    };

    Ok(Valuation {
        date,
        shares,
        price,
        market_value,
    })
}
