use super::*;
use crate::errors::{CalculatorError, Error};
use crate::fx::FxError;
use crate::portfolio::performance::IrrMethod;
use crate::quotes::PriceHistory;
use crate::settings::CalculationSettings;
use crate::testing::*;
use crate::transactions::{Security, Transaction, TransactionKind};
use crate::utils::Interval;
use crate::money::Money;
use rust_decimal_macros::dec;

fn sap() -> Security {
    Security::new("SAP", "SAP SE", "EUR")
}

fn year_2020() -> Interval {
    Interval::of(date(2019, 12, 31), date(2020, 12, 31)).unwrap()
}

fn trades() -> Vec<Transaction> {
    vec![
        buy("b1", "SAP", date(2019, 6, 1), dec!(100), dec!(10000)),
        dividend("d1", "SAP", date(2020, 5, 1), dec!(100), dec!(200)),
        sell("s1", "SAP", date(2020, 8, 1), dec!(50), dec!(6000)),
    ]
}

fn prices() -> PriceHistory {
    PriceHistory::new().with_prices(
        "SAP",
        vec![(date(2019, 12, 31), dec!(105)), (date(2020, 12, 31), dec!(110))],
    )
}

#[test]
fn test_record_over_a_year() {
    let record = SecurityPerformanceRecord::calculate(
        &sap(),
        &trades(),
        year_2020(),
        &no_rates(),
        &prices(),
        &CalculationSettings::default(),
    )
    .unwrap();

    assert_eq!(record.opening_shares, dec!(100));
    assert_eq!(record.shares_held, dec!(50));
    assert_eq!(record.quote.as_ref().unwrap().value, dec!(110));
    assert_eq!(record.opening_market_value, Some(eur(dec!(10500))));
    assert_eq!(record.market_value, Some(eur(dec!(5500))));

    assert_eq!(record.cost.fifo_cost.amount, dec!(5000));
    assert_eq!(record.cost.fifo_cost_per_share, Some(dec!(100)));
    assert_eq!(record.capital_gains_on_holdings, Some(eur(dec!(500))));
    assert_eq!(record.capital_gains_on_holdings_percent, Some(dec!(0.1)));
    assert_eq!(
        record.capital_gains_on_holdings_moving_average,
        Some(eur(dec!(500)))
    );

    assert_eq!(record.capital_gains.period_realized_fifo.gains.amount, dec!(1000));
    assert_eq!(
        record.capital_gains.unrealized_fifo.as_ref().unwrap().gains.amount,
        dec!(500)
    );

    // -10500 + 200 + 6000 + 5500
    assert_eq!(record.delta, Some(eur(dec!(1200))));
    let irr = record.irr.irr.unwrap();
    assert!((irr - 0.14994300).abs() < 1e-6, "irr was {}", irr);
    assert_eq!(record.irr.method, Some(IrrMethod::Newton));

    assert_eq!(record.dividends.event_count, 1);
    assert_eq!(record.dividends.sum, eur(dec!(200)));
    assert!(record.daily.is_none());
}

#[test]
fn test_record_sorts_its_input() {
    let mut shuffled = trades();
    shuffled.reverse();

    let settings = CalculationSettings::default();
    let sorted = SecurityPerformanceRecord::calculate(
        &sap(),
        &trades(),
        year_2020(),
        &no_rates(),
        &prices(),
        &settings,
    )
    .unwrap();
    let unsorted = SecurityPerformanceRecord::calculate(
        &sap(),
        &shuffled,
        year_2020(),
        &no_rates(),
        &prices(),
        &settings,
    )
    .unwrap();

    assert_eq!(sorted, unsorted);
}

#[test]
fn test_missing_closing_price_leaves_returns_undefined() {
    let quotes = PriceHistory::new().with_prices("SAP", vec![(date(2019, 12, 31), dec!(105))]);
    let transactions = vec![buy("b1", "SAP", date(2019, 6, 1), dec!(100), dec!(10000))];
    let interval = Interval::of(date(2018, 12, 31), date(2019, 12, 30)).unwrap();

    let record = SecurityPerformanceRecord::calculate(
        &sap(),
        &transactions,
        interval,
        &no_rates(),
        &quotes,
        &CalculationSettings::default(),
    )
    .unwrap();

    assert_eq!(record.shares_held, dec!(100));
    assert!(record.quote.is_none());
    assert!(record.market_value.is_none());
    assert!(record.capital_gains_on_holdings.is_none());
    assert!(record.capital_gains_on_holdings_percent.is_none());
    assert!(record.capital_gains.unrealized_fifo.is_none());
    assert!(record.delta.is_none());
    assert!(record.irr.irr.is_none());
    assert_eq!(record.cost.fifo_cost.amount, dec!(10000));
}

#[test]
fn test_liquidated_position_has_zero_percent_gain() {
    let transactions = vec![
        buy("b1", "SAP", date(2020, 2, 1), dec!(10), dec!(1000)),
        sell("s1", "SAP", date(2020, 3, 1), dec!(10), dec!(1200)),
    ];

    let record = SecurityPerformanceRecord::calculate(
        &sap(),
        &transactions,
        year_2020(),
        &no_rates(),
        &PriceHistory::new(),
        &CalculationSettings::default(),
    )
    .unwrap();

    assert_eq!(record.market_value, Some(eur(dec!(0))));
    assert_eq!(record.capital_gains_on_holdings, Some(eur(dec!(0))));
    assert_eq!(record.capital_gains_on_holdings_percent, Some(dec!(0)));
    assert_eq!(record.delta, Some(eur(dec!(200))));
    assert!(record.irr.is_defined());
}

#[test]
fn test_record_with_daily_series_matches_point_in_time_gains() {
    let settings = CalculationSettings {
        include_daily: true,
        ..Default::default()
    };

    let record = SecurityPerformanceRecord::calculate(
        &sap(),
        &trades(),
        year_2020(),
        &no_rates(),
        &prices(),
        &settings,
    )
    .unwrap();

    let daily = record.daily.as_ref().unwrap();
    assert_eq!(
        daily.get_total_realized_gains(),
        record.capital_gains.period_realized_fifo.gains
    );
    assert_eq!(
        daily.get_total_unrealized_gains(),
        record
            .capital_gains
            .unrealized_fifo
            .as_ref()
            .map(|gains| gains.gains.clone())
    );
}

#[test]
fn test_transactions_after_the_interval_are_ignored() {
    let mut transactions = trades();
    transactions.push(sell("s2", "SAP", date(2021, 2, 1), dec!(50), dec!(7000)));

    let record = SecurityPerformanceRecord::calculate(
        &sap(),
        &transactions,
        year_2020(),
        &no_rates(),
        &prices(),
        &CalculationSettings::default(),
    )
    .unwrap();

    assert_eq!(record.shares_held, dec!(50));
    assert_eq!(record.capital_gains.realized_fifo.gains.amount, dec!(1000));
}

#[test]
fn test_foreign_transaction_is_an_error() {
    let mut transactions = trades();
    transactions.push(buy("x1", "BAS", date(2020, 3, 1), dec!(1), dec!(50)));

    let result = SecurityPerformanceRecord::calculate(
        &sap(),
        &transactions,
        year_2020(),
        &no_rates(),
        &prices(),
        &CalculationSettings::default(),
    );

    assert!(matches!(
        result,
        Err(Error::Calculation(CalculatorError::ForeignTransaction { .. }))
    ));
}

#[test]
fn test_missing_exchange_rate_is_an_error() {
    let apple = Security::new("AAPL", "Apple", "USD");
    let transactions = vec![tx(
        "b1",
        "AAPL",
        date(2020, 2, 1),
        TransactionKind::Buy { shares: dec!(10) },
        Money::new(dec!(1000), "USD"),
    )];

    let result = SecurityPerformanceRecord::calculate(
        &apple,
        &transactions,
        year_2020(),
        &no_rates(),
        &PriceHistory::new(),
        &CalculationSettings::default(),
    );

    assert!(matches!(result, Err(Error::Fx(FxError::RateNotFound(_)))));
}
