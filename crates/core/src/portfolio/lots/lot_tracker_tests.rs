use super::*;
use crate::fx::{CurrencyConverter, ExchangeRate};
use crate::money::Money;
use crate::testing::*;
use crate::transactions::{Transaction, TransactionKind, Unit};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn replay(transactions: &[Transaction]) -> LotTracker {
    LotTracker::new("SAP", "EUR")
        .replay(transactions, &no_rates())
        .unwrap()
}

#[test]
fn test_fifo_and_moving_average_diverge_on_pooled_lots() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2010, 1, 1), dec!(109), dec!(3149.20)),
        buy("b2", "SAP", date(2010, 2, 1), dec!(52), dec!(1684.92)),
        sell("s1", "SAP", date(2010, 3, 1), dec!(15), dec!(531.50)),
    ]);

    let disposal = &tracker.disposals()[0];
    assert_eq!(disposal.fifo_net_cost, dec!(433.38));
    assert_eq!(disposal.realized_gain(CostMethod::Fifo), dec!(98.12));
    assert_eq!(disposal.moving_average_net_cost, dec!(450.38));
    assert_eq!(disposal.realized_gain(CostMethod::MovingAverage), dec!(81.12));

    assert_eq!(tracker.shares_held(), dec!(146));
    assert_eq!(tracker.fifo_cost(), dec!(3149.20) - dec!(433.38) + dec!(1684.92));
    assert_eq!(tracker.moving_average().cost, dec!(4383.74));
}

#[test]
fn test_single_lot_keeps_conventions_equal() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2010, 1, 1), dec!(109), dec!(3149.20)),
        sell("s1", "SAP", date(2010, 3, 1), dec!(15), dec!(531.50)),
        sell("s2", "SAP", date(2010, 4, 1), dec!(40), dec!(1500)),
    ]);

    assert_eq!(tracker.fifo_cost(), tracker.moving_average().cost);
    for disposal in tracker.disposals() {
        assert_eq!(disposal.fifo_net_cost, disposal.moving_average_net_cost);
    }
}

#[test]
fn test_fees_enter_cost_and_taxes_do_not() {
    let purchase = with_tax(
        with_fee(buy("b1", "SAP", date(2020, 1, 1), dec!(10), dec!(1010)), dec!(7)),
        dec!(3),
    );
    let tracker = replay(&[purchase]);

    let lot = &tracker.lots()[0];
    assert_eq!(lot.net_cost, dec!(1000));
    assert_eq!(lot.cost, dec!(1007));
    assert_eq!(tracker.fees(), dec!(7));
    assert_eq!(tracker.taxes(), dec!(3));
}

#[test]
fn test_partial_consumption_leaves_no_residue() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2020, 1, 1), dec!(3), dec!(100)),
        sell("s1", "SAP", date(2020, 2, 1), dec!(1), dec!(40)),
        sell("s2", "SAP", date(2020, 3, 1), dec!(1), dec!(40)),
        sell("s3", "SAP", date(2020, 4, 1), dec!(1), dec!(40)),
    ]);

    let consumed: Vec<Decimal> = tracker.disposals().iter().map(|d| d.fifo_net_cost).collect();
    assert_eq!(consumed, vec![dec!(33.33), dec!(33.34), dec!(33.33)]);
    assert_eq!(consumed.iter().copied().sum::<Decimal>(), dec!(100));
    assert!(tracker.lots().is_empty());
    assert_eq!(tracker.fifo_cost(), dec!(0));
    assert_eq!(*tracker.moving_average(), MovingAverage::default());
}

#[test]
fn test_disposal_spanning_lots() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2020, 1, 1), dec!(10), dec!(100)),
        buy("b2", "SAP", date(2020, 1, 2), dec!(10), dec!(200)),
        sell("s1", "SAP", date(2020, 2, 1), dec!(15), dec!(450)),
    ]);

    let disposal = &tracker.disposals()[0];
    assert_eq!(disposal.fifo_consumed.len(), 2);
    assert_eq!(disposal.fifo_consumed[0].transaction_id, "b1");
    assert_eq!(disposal.fifo_consumed[0].net_cost, dec!(100));
    assert_eq!(disposal.fifo_consumed[1].shares, dec!(5));
    assert_eq!(disposal.fifo_consumed[1].net_cost, dec!(100));
    assert_eq!(disposal.realized_gain(CostMethod::Fifo), dec!(250));

    let remaining = &tracker.lots()[0];
    assert_eq!(remaining.transaction_id, "b2");
    assert_eq!(remaining.shares, dec!(5));
    assert_eq!(remaining.original_shares, dec!(10));
    assert_eq!(remaining.net_cost, dec!(100));
}

#[test]
fn test_short_sale_realizes_full_proceeds() {
    let tracker = replay(&[
        sell("s1", "SAP", date(2021, 1, 1), dec!(100), dec!(10000)),
        buy("b1", "SAP", date(2021, 1, 5), dec!(100), dec!(8000)),
    ]);

    let disposal = &tracker.disposals()[0];
    assert_eq!(disposal.matched_shares, dec!(0));
    assert_eq!(disposal.unmatched_shares, dec!(100));
    assert_eq!(disposal.unmatched_proceeds(), dec!(10000));
    assert_eq!(disposal.realized_gain(CostMethod::Fifo), dec!(10000));
    assert_eq!(disposal.realized_gain(CostMethod::MovingAverage), dec!(10000));

    // The cover is a fresh acquisition.
    assert_eq!(tracker.shares_held(), dec!(100));
    assert_eq!(tracker.fifo_cost(), dec!(8000));
}

#[test]
fn test_oversell_of_existing_long() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2021, 1, 1), dec!(50), dec!(5000)),
        sell("s1", "SAP", date(2021, 1, 2), dec!(100), dec!(11000)),
    ]);

    let disposal = &tracker.disposals()[0];
    assert_eq!(disposal.matched_shares, dec!(50));
    assert_eq!(disposal.unmatched_shares, dec!(50));
    assert_eq!(disposal.unmatched_proceeds(), dec!(5500));
    assert_eq!(disposal.realized_gain(CostMethod::Fifo), dec!(6000));
    assert_eq!(disposal.realized_gain(CostMethod::MovingAverage), dec!(6000));
    assert_eq!(tracker.shares_held(), dec!(0));
    assert_eq!(tracker.moving_average().cost, dec!(0));
}

#[test]
fn test_dividend_captures_cost_at_payment() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2019, 1, 1), dec!(10), dec!(1000)),
        with_tax(
            dividend("d1", "SAP", date(2019, 6, 1), dec!(10), dec!(75)),
            dec!(25),
        ),
    ]);

    let payment = &tracker.dividends()[0];
    assert_eq!(payment.amount, dec!(100));
    assert_eq!(payment.net_amount, dec!(75));
    assert_eq!(payment.taxes, dec!(25));
    assert_eq!(payment.shares_held, dec!(10));
    assert_eq!(payment.moving_average_cost, dec!(1000));
    assert_eq!(tracker.taxes(), dec!(25));
}

#[test]
fn test_standalone_fees_and_taxes() {
    let tracker = replay(&[
        buy("b1", "SAP", date(2019, 1, 1), dec!(10), dec!(1000)),
        tx("f1", "SAP", date(2019, 2, 1), TransactionKind::Fee, eur(dec!(12))),
        tx("f2", "SAP", date(2019, 3, 1), TransactionKind::FeeRefund, eur(dec!(2))),
        tx("t1", "SAP", date(2019, 4, 1), TransactionKind::Tax, eur(dec!(5))),
        tx("t2", "SAP", date(2019, 5, 1), TransactionKind::TaxRefund, eur(dec!(1))),
        tx("i1", "SAP", date(2019, 6, 1), TransactionKind::Interest, eur(dec!(9))),
    ]);

    assert_eq!(tracker.fees(), dec!(10));
    assert_eq!(tracker.taxes(), dec!(4));
    assert_eq!(tracker.fifo_cost(), dec!(1000));
}

#[test]
fn test_foreign_currency_converted_at_transaction_date() {
    let converter = CurrencyConverter::new(vec![
        ExchangeRate::new("USD", "EUR", dec!(0.80), date(2020, 1, 1)),
        ExchangeRate::new("USD", "EUR", dec!(0.90), date(2020, 6, 1)),
    ])
    .unwrap();
    let usd = |amount| Money::new(amount, "USD");
    let transactions = vec![
        tx("b1", "AAPL", date(2020, 1, 1), TransactionKind::Buy { shares: dec!(10) }, usd(dec!(1000))),
        tx("s1", "AAPL", date(2020, 6, 1), TransactionKind::Sell { shares: dec!(10) }, usd(dec!(1000))),
    ];

    let tracker = LotTracker::new("AAPL", "EUR")
        .replay(&transactions, &converter)
        .unwrap();

    let disposal = &tracker.disposals()[0];
    assert_eq!(disposal.fifo_net_cost, dec!(800));
    assert_eq!(disposal.proceeds, dec!(900));
    assert_eq!(disposal.realized_gain(CostMethod::Fifo), dec!(100));
}

#[test]
fn test_gross_value_unit_in_term_currency_is_used_directly() {
    let delivery = tx(
        "in1",
        "AAPL",
        date(2020, 1, 1),
        TransactionKind::InboundTransfer { shares: dec!(100) },
        Money::new(dec!(10000), "USD"),
    )
    .with_unit(Unit::gross_value(
        Money::new(dec!(10000), "USD"),
        Money::new(dec!(8000), "EUR"),
        dec!(1.25),
    ));

    let tracker = LotTracker::new("AAPL", "EUR")
        .replay([&delivery], &no_rates())
        .unwrap();
    assert_eq!(tracker.net_fifo_cost(), dec!(8000));
}

#[test]
fn test_missing_rate_is_a_hard_failure() {
    let purchase = tx(
        "b1",
        "AAPL",
        date(2020, 1, 1),
        TransactionKind::Buy { shares: dec!(1) },
        Money::new(dec!(100), "USD"),
    );
    let result = LotTracker::new("AAPL", "EUR").replay([&purchase], &no_rates());
    assert!(matches!(result, Err(crate::Error::Fx(_))));
}

#[test]
fn test_foreign_and_unordered_transactions_rejected() {
    let other = buy("b1", "BAS", date(2020, 1, 1), dec!(1), dec!(10));
    assert!(LotTracker::new("SAP", "EUR").replay([&other], &no_rates()).is_err());

    let unordered = vec![
        buy("b1", "SAP", date(2020, 2, 1), dec!(1), dec!(10)),
        buy("b2", "SAP", date(2020, 1, 1), dec!(1), dec!(10)),
    ];
    assert!(LotTracker::new("SAP", "EUR").replay(&unordered, &no_rates()).is_err());
}

#[test]
fn test_cash_transactions_without_security_are_skipped() {
    let cash = Transaction::new(TransactionKind::Fee, at(2020, 1, 1), None, eur(dec!(5)));
    let tracker = LotTracker::new("SAP", "EUR").replay([&cash], &no_rates()).unwrap();
    assert_eq!(tracker.fees(), dec!(0));
}

#[test]
fn test_cost_calculation_summary() {
    let transactions = vec![
        with_fee(buy("b1", "SAP", date(2020, 1, 1), dec!(10), dec!(1005)), dec!(5)),
        buy("b2", "SAP", date(2020, 2, 1), dec!(10), dec!(1200)),
        sell("s1", "SAP", date(2020, 3, 1), dec!(5), dec!(600)),
    ];
    let result = CostCalculation::perform("SAP", "EUR", &transactions, &no_rates()).unwrap();

    assert_eq!(result.shares_held, dec!(15));
    // 1005 * 5/10 = 502.50 remains of the first lot
    assert_eq!(result.fifo_cost().amount, dec!(1702.50));
    assert_eq!(result.net_fifo_cost.amount, dec!(1700));
    assert_eq!(result.fifo_cost_per_share, Some(dec!(113.3333)));
    // pool of 2205 for 20 shares scaled to 15
    assert_eq!(result.moving_average_cost().amount, dec!(1653.75));
    assert_eq!(result.fees.amount, dec!(5));
    assert_eq!(result.fifo_cost_trail.len(), 2);
    let trail_total: Decimal = result.fifo_cost_trail.iter().map(|e| e.amount).sum();
    assert_eq!(trail_total, result.fifo_cost.amount);
}

#[test]
fn test_cost_calculation_of_liquidated_position_is_zero() {
    let transactions = vec![
        buy("b1", "SAP", date(2020, 1, 1), dec!(7), dec!(1000)),
        sell("s1", "SAP", date(2020, 2, 1), dec!(3), dec!(500)),
        sell("s2", "SAP", date(2020, 3, 1), dec!(4), dec!(700)),
    ];
    let result = CostCalculation::perform("SAP", "EUR", &transactions, &no_rates()).unwrap();

    assert!(result.fifo_cost.is_zero());
    assert!(result.moving_average_cost.is_zero());
    assert!(result.net_moving_average_cost.is_zero());
    assert_eq!(result.fifo_cost_per_share, None);
    assert!(result.fifo_cost_trail.is_empty());
}
