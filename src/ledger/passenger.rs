use serde::{Deserialize, Serialize};
use std::fmt;

use super::allocator::Allocation;
use crate::money;

/// Fare terms for one passenger on one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripFareRecord {
    pub passenger: String,
    pub base_fare: f64,
    pub discount: f64,
    pub complimentary: bool,
}

/// An add-on a passenger has signed up for, with the amount charged to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOnSelection {
    pub passenger: String,
    pub add_on: String,
    pub name: String,
    pub charged: f64,
    pub active: bool,
}

/// Collection status of a passenger.
///
/// Ordered by progress, so `Pending < Partial < Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// Status from what is still pending and what has been credited.
    pub fn derive(pending_total: f64, credited: f64) -> Self {
        if money::is_settled(pending_total) {
            PaymentStatus::Paid
        } else if money::is_settled(credited) {
            PaymentStatus::Pending
        } else {
            PaymentStatus::Partial
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Partial => write!(f, "PARTIAL"),
            PaymentStatus::Paid => write!(f, "PAID"),
        }
    }
}

/// How pressing a passenger's debt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyTier {
    Critical,
    Attention,
    OnTrack,
}

impl UrgencyTier {
    pub fn classify(days_overdue: i64, thresholds: &UrgencyThresholds) -> Self {
        if days_overdue > thresholds.critical_after_days {
            UrgencyTier::Critical
        } else if days_overdue >= thresholds.attention_from_days {
            UrgencyTier::Attention
        } else {
            UrgencyTier::OnTrack
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyTier::Critical => write!(f, "CRITICAL"),
            UrgencyTier::Attention => write!(f, "ATTENTION"),
            UrgencyTier::OnTrack => write!(f, "ON TRACK"),
        }
    }
}

/// Day counts that separate the urgency tiers.
///
/// More than `critical_after_days` overdue is critical; from
/// `attention_from_days` up to that is attention; anything less is on track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct UrgencyThresholds {
    #[serde(default = "default_critical_after_days")]
    pub critical_after_days: i64,
    #[serde(default = "default_attention_from_days")]
    pub attention_from_days: i64,
}

fn default_critical_after_days() -> i64 {
    7
}

fn default_attention_from_days() -> i64 {
    3
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        Self {
            critical_after_days: default_critical_after_days(),
            attention_from_days: default_attention_from_days(),
        }
    }
}

/// Everything a ledger is derived from.
#[derive(Debug, Clone, Copy)]
pub struct LedgerInput<'a> {
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub fare: &'a TripFareRecord,
    pub selections: &'a [AddOnSelection],
    pub allocation: &'a Allocation,
    /// Supplied by the installment schedule; whole days.
    pub days_overdue: i64,
}

/// Derived financial state of one passenger. Never stored; rebuild it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerLedger {
    pub passenger_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub complimentary: bool,
    pub fare_owed: f64,
    pub add_on_owed: f64,
    pub paid_fare: f64,
    pub paid_add_ons: f64,
    pub pending_fare: f64,
    pub pending_add_ons: f64,
    pub pending_total: f64,
    pub status: PaymentStatus,
    pub urgency: UrgencyTier,
    pub days_overdue: i64,
}

impl PassengerLedger {
    pub fn total_owed(&self) -> f64 {
        self.fare_owed + self.add_on_owed
    }

    /// Nominal amount already covered; what is owed minus what is pending.
    pub fn collected(&self) -> f64 {
        self.total_owed() - self.pending_total
    }

    pub fn has_pending_fare(&self) -> bool {
        money::is_outstanding(self.pending_fare)
    }

    pub fn has_pending_add_ons(&self) -> bool {
        money::is_outstanding(self.pending_add_ons)
    }

    pub fn is_outstanding(&self) -> bool {
        money::is_outstanding(self.pending_total)
    }
}

/// Builds a passenger's ledger from fare terms, add-ons and payments.
pub fn build_ledger(input: LedgerInput<'_>, thresholds: &UrgencyThresholds) -> PassengerLedger {
    let fare = input.fare;

    let (fare_owed, add_on_owed) = if fare.complimentary {
        (0.0, 0.0)
    } else {
        let fare_owed = money::outstanding(fare.base_fare, fare.discount);
        let add_on_owed: f64 = input
            .selections
            .iter()
            .filter(|s| s.active)
            .map(|s| money::non_negative(s.charged))
            .sum();
        (fare_owed, add_on_owed)
    };

    let (paid_fare, paid_add_ons) = if fare.complimentary {
        (0.0, 0.0)
    } else {
        (
            money::non_negative(input.allocation.paid_fare),
            money::non_negative(input.allocation.paid_add_ons),
        )
    };

    let pending_fare = money::outstanding(fare_owed, paid_fare);
    let pending_add_ons = money::outstanding(add_on_owed, paid_add_ons);
    let pending_total = pending_fare + pending_add_ons;

    let status = if fare.complimentary {
        PaymentStatus::Paid
    } else {
        PaymentStatus::derive(pending_total, input.allocation.credited())
    };

    let urgency = if status == PaymentStatus::Paid {
        UrgencyTier::OnTrack
    } else {
        UrgencyTier::classify(input.days_overdue, thresholds)
    };

    tracing::debug!(
        passenger = %fare.passenger,
        fare_owed,
        add_on_owed,
        pending_total,
        status = %status,
        "built passenger ledger"
    );

    PassengerLedger {
        passenger_id: fare.passenger.clone(),
        name: input.name.to_string(),
        phone: input.phone.map(str::to_string),
        complimentary: fare.complimentary,
        fare_owed,
        add_on_owed,
        paid_fare,
        paid_add_ons,
        pending_fare,
        pending_add_ons,
        pending_total,
        status,
        urgency,
        days_overdue: input.days_overdue,
    }
}
