//! Turns a stored trip into per-passenger engine inputs.
//!
//! Single-stream trips (no add-on catalog, no selections, untagged payments)
//! come out with empty selection lists, so the same ledger and summary code
//! handles them with every add-on term at zero.

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::DataWarning;
use crate::config::{Passenger, TripFile};
use crate::ledger::{AddOnSelection, PaymentEvent, TripFareRecord};
use crate::money;

/// Pricing layout of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TripSchema {
    /// Fare only; older trips predate add-ons.
    SingleStream,
    /// Fare plus separately charged add-ons.
    Split,
}

impl TripSchema {
    pub fn detect(trip: &TripFile) -> Self {
        if trip.add_ons.is_empty() && trip.selections.is_empty() {
            TripSchema::SingleStream
        } else {
            TripSchema::Split
        }
    }
}

/// One passenger's inputs, ready for the ledger builder.
#[derive(Debug)]
pub struct PassengerInputs<'a> {
    pub passenger: &'a Passenger,
    pub fare: TripFareRecord,
    pub selections: Vec<AddOnSelection>,
    pub payments: Vec<&'a PaymentEvent>,
}

#[derive(Debug)]
pub struct NormalizedTrip<'a> {
    pub schema: TripSchema,
    pub passengers: Vec<PassengerInputs<'a>>,
    pub warnings: Vec<DataWarning>,
}

impl NormalizedTrip<'_> {
    /// Active selections of every passenger, in roster order.
    pub fn selections(&self) -> impl Iterator<Item = &AddOnSelection> {
        self.passengers.iter().flat_map(|p| p.selections.iter())
    }
}

pub fn normalize(trip: &TripFile) -> NormalizedTrip<'_> {
    let schema = TripSchema::detect(trip);
    let mut warnings = Vec::new();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut passengers: Vec<PassengerInputs<'_>> = Vec::with_capacity(trip.passengers.len());
    for passenger in &trip.passengers {
        if index.contains_key(passenger.id.as_str()) {
            warnings.push(DataWarning::DuplicatePassenger {
                passenger: passenger.id.clone(),
            });
            continue;
        }
        index.insert(passenger.id.as_str(), passengers.len());
        passengers.push(PassengerInputs {
            passenger,
            fare: passenger.fare_record(),
            selections: Vec::new(),
            payments: Vec::new(),
        });
    }

    let mut linked: HashSet<(&str, &str)> = HashSet::new();
    for record in trip.selections.iter().filter(|s| s.active) {
        let Some(&slot) = index.get(record.passenger.as_str()) else {
            warnings.push(DataWarning::UnknownPassenger {
                record: "selection",
                passenger: record.passenger.clone(),
            });
            continue;
        };
        if !linked.insert((record.passenger.as_str(), record.add_on.as_str())) {
            warnings.push(DataWarning::DuplicateSelection {
                passenger: record.passenger.clone(),
                add_on: record.add_on.clone(),
            });
            continue;
        }

        let catalog = trip.add_on(&record.add_on);
        if catalog.is_none() {
            warnings.push(DataWarning::UnknownAddOn {
                passenger: record.passenger.clone(),
                add_on: record.add_on.clone(),
            });
        }
        let charged = record
            .amount
            .or_else(|| catalog.map(|a| a.price))
            .unwrap_or_default();

        passengers[slot].selections.push(AddOnSelection {
            passenger: record.passenger.clone(),
            add_on: record.add_on.clone(),
            name: catalog
                .map(|a| a.name.clone())
                .unwrap_or_else(|| record.add_on.clone()),
            charged: money::sanitize(charged),
            active: true,
        });
    }

    for payment in &trip.payments {
        match index.get(payment.passenger.as_str()) {
            Some(&slot) => passengers[slot].payments.push(payment),
            None => warnings.push(DataWarning::UnknownPassenger {
                record: "payment",
                passenger: payment.passenger.clone(),
            }),
        }
    }

    NormalizedTrip {
        schema,
        passengers,
        warnings,
    }
}
