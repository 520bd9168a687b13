use serde::Serialize;
use std::fmt;

use crate::config::{Passenger, SelectionRecord, TripFile};

/// A passenger to enroll, with the add-ons they want.
#[derive(Debug, Clone)]
pub struct EnrollmentRequest {
    pub passenger: Passenger,
    pub add_ons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EnrollmentFailure {
    DuplicatePassenger { passenger: String },
    MissingName { passenger: String },
}

impl fmt::Display for EnrollmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnrollmentFailure::DuplicatePassenger { passenger } => {
                write!(f, "passenger '{passenger}' is already enrolled")
            }
            EnrollmentFailure::MissingName { passenger } => {
                write!(f, "passenger '{passenger}' has no name")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkFailureReason {
    UnknownAddOn,
    InactiveAddOn,
    AlreadyLinked,
}

/// An add-on that could not be attached to an enrolled passenger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkFailure {
    pub passenger: String,
    pub add_on: String,
    pub reason: LinkFailureReason,
}

impl fmt::Display for LinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            LinkFailureReason::UnknownAddOn => "add-on not in the trip catalog",
            LinkFailureReason::InactiveAddOn => "add-on is inactive",
            LinkFailureReason::AlreadyLinked => "already linked",
        };
        write!(f, "{} -> {}: {}", self.passenger, self.add_on, reason)
    }
}

/// Result of a bulk enrollment. Enrollments stand even when links fail.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrollmentOutcome {
    pub enrolled: Vec<String>,
    pub linked: usize,
    pub rejected: Vec<EnrollmentFailure>,
    pub failed_links: Vec<LinkFailure>,
}

impl EnrollmentOutcome {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty() && self.failed_links.is_empty()
    }

    /// Something went through, something did not.
    pub fn is_degraded(&self) -> bool {
        !self.is_complete() && !self.enrolled.is_empty()
    }
}

/// Adds passengers and links their add-ons.
///
/// Each passenger is enrolled first and their links attempted afterwards; a
/// failed link is recorded and the enrollment kept.
pub fn enroll<I>(trip: &mut TripFile, requests: I) -> EnrollmentOutcome
where
    I: IntoIterator<Item = EnrollmentRequest>,
{
    let mut outcome = EnrollmentOutcome::default();

    for request in requests {
        let id = request.passenger.id.clone();
        if request.passenger.name.trim().is_empty() {
            outcome
                .rejected
                .push(EnrollmentFailure::MissingName { passenger: id });
            continue;
        }
        if trip.passenger(&id).is_some() {
            outcome
                .rejected
                .push(EnrollmentFailure::DuplicatePassenger { passenger: id });
            continue;
        }

        trip.passengers.push(request.passenger);
        outcome.enrolled.push(id.clone());

        for add_on in request.add_ons {
            match link(trip, &id, &add_on) {
                Ok(()) => outcome.linked += 1,
                Err(reason) => outcome.failed_links.push(LinkFailure {
                    passenger: id.clone(),
                    add_on,
                    reason,
                }),
            }
        }
    }

    if outcome.is_degraded() {
        tracing::warn!(
            enrolled = outcome.enrolled.len(),
            rejected = outcome.rejected.len(),
            failed_links = outcome.failed_links.len(),
            "enrollment completed with failures"
        );
    }

    outcome
}

fn link(trip: &mut TripFile, passenger: &str, add_on: &str) -> Result<(), LinkFailureReason> {
    let entry = trip.add_on(add_on).ok_or(LinkFailureReason::UnknownAddOn)?;
    if !entry.active {
        return Err(LinkFailureReason::InactiveAddOn);
    }
    let already = trip
        .selections
        .iter()
        .any(|s| s.active && s.passenger == passenger && s.add_on == add_on);
    if already {
        return Err(LinkFailureReason::AlreadyLinked);
    }

    trip.selections.push(SelectionRecord {
        passenger: passenger.to_string(),
        add_on: add_on.to_string(),
        amount: None,
        active: true,
    });
    Ok(())
}
