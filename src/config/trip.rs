use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{PaymentEvent, TripFareRecord};

/// Everything recorded about one trip, as stored in `trips/<id>.toml`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TripFile {
    pub trip: TripInfo,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub selections: Vec<SelectionRecord>,
    #[serde(default)]
    pub payments: Vec<PaymentEvent>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl TripFile {
    pub fn passenger(&self, id: &str) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }

    pub fn payments_for<'a>(&'a self, passenger: &'a str) -> impl Iterator<Item = &'a PaymentEvent> {
        self.payments.iter().filter(move |p| p.passenger == passenger)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TripInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Passenger {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Older single-stream trips call this `price`.
    #[serde(default, alias = "price")]
    pub fare: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub complimentary: bool,
    /// Days past the installment due date, from the payment schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_overdue: Option<i64>,
}

impl Passenger {
    pub fn fare_record(&self) -> TripFareRecord {
        TripFareRecord {
            passenger: self.id.clone(),
            base_fare: self.fare,
            discount: self.discount,
            complimentary: self.complimentary,
        }
    }
}

/// Catalog entry for an optional activity.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    /// What the agency pays the supplier per participant.
    #[serde(default, alias = "cost_basis")]
    pub cost: f64,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A passenger's link to an add-on. Without an `amount` the catalog price applies.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SelectionRecord {
    pub passenger: String,
    pub add_on: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExpenseRecord {
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}
