use std::collections::HashMap;

use tripledger::config::{ExpenseRecord, TripFile, EXAMPLE_TRIP_TEMPLATE};
use tripledger::ledger::{
    AddOnSelection, PaymentStatus, RejectionReason, UrgencyThresholds, UrgencyTier,
};
use tripledger::trip::{evaluate, summarize, DataWarning, TripSchema};

fn parse(toml_src: &str) -> TripFile {
    toml::from_str(toml_src).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn expense(amount: f64) -> ExpenseRecord {
    ExpenseRecord {
        description: "Guide".to_string(),
        amount,
        category: None,
        date: None,
    }
}

#[test]
fn test_example_trip_rollup() {
    let trip = parse(EXAMPLE_TRIP_TEMPLATE);
    let eval = evaluate(&trip, &UrgencyThresholds::default());
    let summary = &eval.summary;

    assert_eq!(eval.schema, TripSchema::Split);
    assert!(eval.warnings.is_empty());
    assert_eq!(summary.passengers, 3);
    assert_eq!(summary.passengers_with_pending, 2);
    assert_eq!(summary.complimentary_passengers, 1);
    assert_eq!(summary.status_counts.pending, 1);
    assert_eq!(summary.status_counts.partial, 1);
    assert_eq!(summary.status_counts.paid, 1);

    assert_close(summary.total_revenue, 370.0);
    assert_close(summary.total_pending, 220.0);
    assert_close(summary.total_collected, 150.0);
    // carla's wine tour still costs the agency money
    assert_close(summary.add_on_costs, 85.0);
    assert_close(summary.manual_expenses, 200.0);
    assert_close(summary.total_expenses, 285.0);
    assert_close(summary.gross_profit, 85.0);
    assert_close(summary.margin_pct, 85.0 / 370.0 * 100.0);

    assert_close(summary.fare.revenue, 280.0);
    assert_close(summary.add_ons.revenue, 90.0);
    assert_close(summary.fare.expenses + summary.add_ons.expenses, 285.0);
    assert_close(summary.fare.expenses, 200.0 * 280.0 / 370.0);
    assert_close(summary.fare.profit + summary.add_ons.profit, summary.gross_profit);

    let ana = eval.ledger("ana").unwrap();
    assert_eq!(ana.status, PaymentStatus::Partial);
    assert_close(ana.pending_add_ons, 90.0);
    assert_eq!(ana.urgency, UrgencyTier::OnTrack);

    let bruno = eval.ledger("bruno").unwrap();
    assert_close(bruno.pending_fare, 130.0);
    assert_eq!(bruno.urgency, UrgencyTier::Critical);
}

#[test]
fn test_pending_total_counts_only_outstanding_passengers() {
    let trip = parse(
        r#"
[trip]
name = "Coast"

[[passengers]]
id = "p1"
name = "First"
fare = 100.0
discount = 20.0

[[passengers]]
id = "p2"
name = "Second"
fare = 100.0

[[payments]]
passenger = "p2"
amount = 100.0
"#,
    );
    let eval = evaluate(&trip, &UrgencyThresholds::default());

    assert_close(eval.summary.total_pending, 80.0);
    assert_eq!(eval.summary.passengers_with_pending, 1);
    assert_close(eval.summary.collection_rate_pct, 100.0 / 180.0 * 100.0);
}

#[test]
fn test_empty_trip_is_all_zero() {
    let catalog: HashMap<String, f64> = HashMap::new();
    let selections: Vec<AddOnSelection> = Vec::new();
    let summary = summarize(
        TripSchema::SingleStream,
        &[],
        &selections,
        &catalog,
        &[expense(50.0)],
    );

    assert_eq!(summary.passengers, 0);
    assert_eq!(summary.passengers_with_pending, 0);
    assert_eq!(summary.total_revenue, 0.0);
    assert_eq!(summary.total_pending, 0.0);
    assert_eq!(summary.collection_rate_pct, 0.0);
    assert_eq!(summary.margin_pct, 0.0);
    assert_eq!(summary.total_expenses, 50.0);
    assert_eq!(summary.gross_profit, -50.0);
    // no revenue to split by: everything lands on the fare stream
    assert_eq!(summary.fare.expenses, 50.0);
    assert_eq!(summary.add_ons.expenses, 0.0);
}

#[test]
fn test_single_stream_trip() {
    let trip = parse(
        r#"
[trip]
name = "Old Trip"

[[passengers]]
id = "p1"
name = "First"
price = 300.0

[[passengers]]
id = "p2"
name = "Second"
price = 300.0
days_overdue = 4

[[payments]]
passenger = "p1"
amount = 120.0
"#,
    );
    let eval = evaluate(&trip, &UrgencyThresholds::default());

    assert_eq!(eval.schema, TripSchema::SingleStream);
    assert!(eval.warnings.is_empty());
    for ledger in &eval.ledgers {
        assert_eq!(ledger.add_on_owed, 0.0);
        assert_eq!(ledger.pending_add_ons, 0.0);
    }
    assert_close(eval.summary.total_revenue, 600.0);
    assert_close(eval.summary.total_pending, 480.0);
    assert_eq!(eval.summary.add_ons.revenue, 0.0);
    assert_eq!(eval.ledger("p2").unwrap().urgency, UrgencyTier::Attention);
}

#[test]
fn test_cost_catalog_from_map() {
    let catalog = HashMap::from([("kayak".to_string(), 35.0), ("museum".to_string(), -5.0)]);
    let selection = |add_on: &str, active: bool| AddOnSelection {
        passenger: "p1".to_string(),
        add_on: add_on.to_string(),
        name: add_on.to_string(),
        charged: 60.0,
        active,
    };
    let selections = vec![
        selection("kayak", true),
        selection("kayak", false),
        selection("museum", true),
        selection("unlisted", true),
    ];

    let summary = summarize(TripSchema::Split, &[], &selections, &catalog, &[]);
    assert_eq!(summary.add_on_costs, 35.0);
    assert_eq!(summary.add_ons.expenses, 35.0);
    assert_eq!(summary.fare.expenses, 0.0);
}

#[test]
fn test_data_warnings_do_not_stop_evaluation() {
    let trip = parse(
        r#"
[trip]
name = "Messy"

[[add_ons]]
id = "boat"
name = "Boat Ride"
price = 30.0

[[passengers]]
id = "p1"
name = "First"
fare = 100.0

[[passengers]]
id = "p1"
name = "First Again"
fare = 999.0

[[selections]]
passenger = "p1"
add_on = "boat"

[[selections]]
passenger = "p1"
add_on = "boat"

[[selections]]
passenger = "p1"
add_on = "zipline"
amount = 45.0

[[selections]]
passenger = "ghost"
add_on = "boat"

[[payments]]
passenger = "p1"
amount = 20.0
stream = "voucher"

[[payments]]
passenger = "ghost"
amount = 10.0
"#,
    );
    let eval = evaluate(&trip, &UrgencyThresholds::default());

    assert_eq!(eval.ledgers.len(), 1);
    let p1 = eval.ledger("p1").unwrap();
    assert_eq!(p1.fare_owed, 100.0);
    assert_eq!(p1.add_on_owed, 75.0);
    assert_eq!(p1.pending_total, 175.0);
    assert_eq!(p1.status, PaymentStatus::Pending);

    let kinds: Vec<&str> = eval
        .warnings
        .iter()
        .map(|w| match w {
            DataWarning::DuplicatePassenger { .. } => "duplicate_passenger",
            DataWarning::UnknownPassenger { .. } => "unknown_passenger",
            DataWarning::UnknownAddOn { .. } => "unknown_add_on",
            DataWarning::DuplicateSelection { .. } => "duplicate_selection",
            DataWarning::RejectedPayment(_) => "rejected_payment",
        })
        .collect();
    assert_eq!(
        kinds,
        [
            "duplicate_passenger",
            "duplicate_selection",
            "unknown_add_on",
            "unknown_passenger",
            "unknown_passenger",
            "rejected_payment",
        ]
    );
    assert!(eval
        .warnings
        .iter()
        .any(|w| w.to_string() == "payment references unknown passenger 'ghost'"));
}

#[test]
fn test_payments_from_complimentary_passengers_are_ignored_and_reported() {
    let trip = parse(
        r#"
[trip]
name = "Guided"

[[add_ons]]
id = "boat"
name = "Boat Ride"
price = 30.0

[[passengers]]
id = "guide"
name = "Guide"
fare = 150.0
complimentary = true

[[selections]]
passenger = "guide"
add_on = "boat"

[[payments]]
passenger = "guide"
amount = 40.0
stream = "both"
"#,
    );
    let eval = evaluate(&trip, &UrgencyThresholds::default());

    let guide = eval.ledger("guide").unwrap();
    assert_eq!(guide.paid_fare, 0.0);
    assert_eq!(guide.paid_add_ons, 0.0);
    assert_eq!(guide.total_owed(), 0.0);
    assert_eq!(guide.status, PaymentStatus::Paid);
    assert_eq!(eval.summary.total_collected, 0.0);

    assert_eq!(eval.warnings.len(), 1);
    match &eval.warnings[0] {
        DataWarning::RejectedPayment(rejected) => {
            assert_eq!(rejected.passenger, "guide");
            assert_eq!(rejected.amount, 40.0);
            assert_eq!(rejected.reason, RejectionReason::ComplimentaryPassenger);
        }
        other => panic!("unexpected warning: {other}"),
    }
}
