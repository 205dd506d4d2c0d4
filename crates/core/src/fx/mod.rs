//! FX (Foreign Exchange) module - exchange-rate models, the converter trait and
//! an in-memory graph-backed converter.

pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_traits;

pub use currency_converter::CurrencyConverter;
pub use fx_errors::FxError;
pub use fx_model::ExchangeRate;
pub use fx_traits::CurrencyConverterTrait;
