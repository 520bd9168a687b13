use tripledger::ledger::{
    matches_search, urgency_buckets, PassengerLedger, PaymentStatus, PendencyCategory,
    PendencyQuery, SortOrder, UrgencyTier,
};

fn ledger(
    id: &str,
    name: &str,
    phone: Option<&str>,
    owed: (f64, f64),
    pending: (f64, f64),
    urgency: UrgencyTier,
) -> PassengerLedger {
    let pending_total = pending.0 + pending.1;
    PassengerLedger {
        passenger_id: id.to_string(),
        name: name.to_string(),
        phone: phone.map(str::to_string),
        complimentary: false,
        fare_owed: owed.0,
        add_on_owed: owed.1,
        paid_fare: owed.0 - pending.0,
        paid_add_ons: owed.1 - pending.1,
        pending_fare: pending.0,
        pending_add_ons: pending.1,
        pending_total,
        status: if pending_total <= 0.01 {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        },
        urgency,
        days_overdue: 0,
    }
}

fn roster() -> Vec<PassengerLedger> {
    vec![
        ledger(
            "dora",
            "dora Nunes",
            Some("+55 21 5555-0001"),
            (150.0, 90.0),
            (0.0, 90.0),
            UrgencyTier::OnTrack,
        ),
        ledger(
            "beto",
            "Beto Alves",
            Some("+55 21 5555-0002"),
            (150.0, 0.0),
            (150.0, 0.0),
            UrgencyTier::Critical,
        ),
        ledger(
            "ana",
            "Ana Souza",
            None,
            (150.0, 50.0),
            (40.0, 50.0),
            UrgencyTier::Attention,
        ),
        ledger(
            "caio",
            "Caio Reis",
            Some("+55 21 5555-0004"),
            (150.0, 40.0),
            (0.0, 0.0),
            UrgencyTier::OnTrack,
        ),
        ledger(
            "eva",
            "Eva Prado",
            None,
            (240.0, 0.0),
            (0.004, 0.0),
            UrgencyTier::OnTrack,
        ),
    ]
}

fn ids(ledgers: &[&PassengerLedger]) -> Vec<String> {
    ledgers.iter().map(|l| l.passenger_id.clone()).collect()
}

#[test]
fn test_category_filter() {
    let ledgers = roster();
    let select = |category| {
        ids(&PendencyQuery {
            category,
            search: None,
            sort: SortOrder::Name,
        }
        .apply(&ledgers))
    };

    assert_eq!(select(PendencyCategory::TripOnly), ["beto"]);
    assert_eq!(select(PendencyCategory::AddOnsOnly), ["dora"]);
    assert_eq!(select(PendencyCategory::Both), ["ana"]);
    assert_eq!(select(PendencyCategory::All).len(), 5);
}

#[test]
fn test_rounding_noise_is_not_pending() {
    let ledgers = roster();
    let eva = ledgers.iter().find(|l| l.passenger_id == "eva").unwrap();
    assert!(!PendencyCategory::TripOnly.matches(eva));
    assert!(!eva.is_outstanding());
}

#[test]
fn test_search_is_case_insensitive_over_name_and_phone() {
    let ledgers = roster();
    assert!(matches_search(&ledgers[2], "SOUZA"));
    assert!(matches_search(&ledgers[1], "5555-0002"));
    assert!(!matches_search(&ledgers[2], "5555"));
    assert!(matches_search(&ledgers[2], "  "));

    let query = PendencyQuery {
        category: PendencyCategory::All,
        search: Some("5555".to_string()),
        sort: SortOrder::Name,
    };
    assert_eq!(ids(&query.apply(&ledgers)), ["beto", "caio", "dora"]);
}

#[test]
fn test_sort_orders() {
    let ledgers = roster();
    let sorted = |sort| {
        ids(&PendencyQuery {
            category: PendencyCategory::All,
            search: None,
            sort,
        }
        .apply(&ledgers))
    };

    assert_eq!(
        sorted(SortOrder::Name),
        ["ana", "beto", "caio", "dora", "eva"]
    );
    // dora and eva both owe 240; dora comes first in the input and stays first
    assert_eq!(
        sorted(SortOrder::TotalOwed),
        ["dora", "eva", "ana", "caio", "beto"]
    );
    assert_eq!(
        sorted(SortOrder::TotalPending),
        ["beto", "dora", "ana", "eva", "caio"]
    );
}

#[test]
fn test_parse_category_and_sort() {
    assert_eq!(
        "trip-only".parse::<PendencyCategory>().unwrap(),
        PendencyCategory::TripOnly
    );
    assert_eq!(
        "Add-Ons-Only".parse::<PendencyCategory>().unwrap(),
        PendencyCategory::AddOnsOnly
    );
    assert!("late".parse::<PendencyCategory>().is_err());
    assert_eq!("owed".parse::<SortOrder>().unwrap(), SortOrder::TotalOwed);
    assert!("age".parse::<SortOrder>().is_err());
}

#[test]
fn test_urgency_buckets_only_hold_outstanding_passengers() {
    let ledgers = roster();
    let buckets = urgency_buckets(&ledgers);

    assert_eq!(ids(buckets.tier(UrgencyTier::Critical)), ["beto"]);
    assert_eq!(ids(buckets.tier(UrgencyTier::Attention)), ["ana"]);
    assert_eq!(ids(buckets.tier(UrgencyTier::OnTrack)), ["dora"]);
    assert_eq!(buckets.len(), 3);
}

#[test]
fn test_empty_roster() {
    let ledgers: Vec<PassengerLedger> = Vec::new();
    assert!(urgency_buckets(&ledgers).is_empty());
    assert!(PendencyQuery::default().apply(&ledgers).is_empty());
}
