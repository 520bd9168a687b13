use tripledger::config::{AddOn, Passenger, TripFile, TripInfo};
use tripledger::ledger::{PaymentEvent, PaymentStream, StreamTag, UrgencyThresholds};
use tripledger::trip::{
    enroll, evaluate, record_payment, EnrollmentFailure, EnrollmentRequest, LinkFailureReason,
};
use tripledger::TripError;

fn add_on(id: &str, price: f64, active: bool) -> AddOn {
    AddOn {
        id: id.to_string(),
        name: id.to_string(),
        price,
        cost: 0.0,
        active,
    }
}

fn passenger(id: &str, name: &str) -> Passenger {
    Passenger {
        id: id.to_string(),
        name: name.to_string(),
        fare: 200.0,
        ..Default::default()
    }
}

fn request(id: &str, name: &str, add_ons: &[&str]) -> EnrollmentRequest {
    EnrollmentRequest {
        passenger: passenger(id, name),
        add_ons: add_ons.iter().map(|a| a.to_string()).collect(),
    }
}

fn trip() -> TripFile {
    TripFile {
        trip: TripInfo {
            name: "Lakes".to_string(),
            ..Default::default()
        },
        add_ons: vec![add_on("boat", 40.0, true), add_on("spa", 90.0, false)],
        passengers: vec![passenger("ana", "Ana")],
        ..Default::default()
    }
}

#[test]
fn test_enroll_links_add_ons() {
    let mut trip = trip();
    let outcome = enroll(&mut trip, [request("rui", "Rui", &["boat"])]);

    assert!(outcome.is_complete());
    assert!(!outcome.is_degraded());
    assert_eq!(outcome.enrolled, ["rui"]);
    assert_eq!(outcome.linked, 1);

    let eval = evaluate(&trip, &UrgencyThresholds::default());
    let rui = eval.ledger("rui").unwrap();
    assert_eq!(rui.fare_owed, 200.0);
    assert_eq!(rui.add_on_owed, 40.0);
}

#[test]
fn test_failed_links_keep_the_enrollment() {
    let mut trip = trip();
    let outcome = enroll(
        &mut trip,
        [request("rui", "Rui", &["boat", "spa", "zipline", "boat"])],
    );

    assert!(outcome.is_degraded());
    assert_eq!(outcome.enrolled, ["rui"]);
    assert_eq!(outcome.linked, 1);
    let reasons: Vec<LinkFailureReason> = outcome.failed_links.iter().map(|f| f.reason).collect();
    assert_eq!(
        reasons,
        [
            LinkFailureReason::InactiveAddOn,
            LinkFailureReason::UnknownAddOn,
            LinkFailureReason::AlreadyLinked,
        ]
    );
    assert_eq!(
        outcome.failed_links[1].to_string(),
        "rui -> zipline: add-on not in the trip catalog"
    );

    assert!(trip.passenger("rui").is_some());
    assert_eq!(trip.selections.len(), 1);
}

#[test]
fn test_duplicate_and_nameless_passengers_are_rejected() {
    let mut trip = trip();
    let outcome = enroll(
        &mut trip,
        [
            request("ana", "Ana Again", &[]),
            request("lia", "  ", &["boat"]),
            request("rui", "Rui", &[]),
        ],
    );

    assert!(outcome.is_degraded());
    assert_eq!(outcome.enrolled, ["rui"]);
    assert_eq!(
        outcome.rejected,
        [
            EnrollmentFailure::DuplicatePassenger {
                passenger: "ana".to_string()
            },
            EnrollmentFailure::MissingName {
                passenger: "lia".to_string()
            },
        ]
    );
    assert_eq!(trip.passengers.len(), 2);
    assert!(trip.selections.is_empty());
}

#[test]
fn test_nothing_enrolled_is_not_degraded() {
    let mut trip = trip();
    let outcome = enroll(&mut trip, [request("ana", "Ana", &[])]);

    assert!(!outcome.is_complete());
    assert!(!outcome.is_degraded());
    assert!(outcome.enrolled.is_empty());
}

#[test]
fn test_record_payment_appends() {
    let mut trip = trip();
    record_payment(&mut trip, PaymentEvent::new("ana", 50.0, PaymentStream::TripFare)).unwrap();
    record_payment(&mut trip, PaymentEvent::new("ana", 10.0, PaymentStream::Both)).unwrap();

    assert_eq!(trip.payments.len(), 2);
    let eval = evaluate(&trip, &UrgencyThresholds::default());
    assert_eq!(eval.ledger("ana").unwrap().pending_fare, 140.0);
}

#[test]
fn test_record_payment_validation() {
    let mut trip = trip();
    trip.passengers.push(Passenger {
        complimentary: true,
        ..passenger("guide", "Guide")
    });

    let err = record_payment(&mut trip, PaymentEvent::new("ghost", 10.0, PaymentStream::TripFare))
        .unwrap_err();
    assert!(matches!(err, TripError::PassengerNotFound(id) if id == "ghost"));

    let err = record_payment(&mut trip, PaymentEvent::new("guide", 10.0, PaymentStream::TripFare))
        .unwrap_err();
    assert!(matches!(err, TripError::ComplimentaryPassenger(_)));

    for amount in [0.0, -5.0, f64::INFINITY] {
        let err = record_payment(&mut trip, PaymentEvent::new("ana", amount, PaymentStream::AddOns))
            .unwrap_err();
        assert!(matches!(err, TripError::InvalidPaymentAmount));
    }

    let mut odd = PaymentEvent::new("ana", 10.0, PaymentStream::TripFare);
    odd.stream = StreamTag::from("gift".to_string());
    let err = record_payment(&mut trip, odd).unwrap_err();
    assert!(matches!(err, TripError::InvalidStream(tag) if tag == "gift"));

    assert!(trip.payments.is_empty());
}
