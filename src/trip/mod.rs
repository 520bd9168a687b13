mod adapter;
mod enrollment;
mod payments;
mod summary;

pub use adapter::{normalize, NormalizedTrip, PassengerInputs, TripSchema};
pub use enrollment::{
    enroll, EnrollmentFailure, EnrollmentOutcome, EnrollmentRequest, LinkFailure,
    LinkFailureReason,
};
pub use payments::record_payment;
pub use summary::{summarize, CostCatalog, StatusCounts, StreamSummary, TripSummary};

use serde::Serialize;
use std::fmt;

use crate::config::TripFile;
use crate::ledger::{
    allocate, build_ledger, Allocation, LedgerInput, PassengerLedger, RejectedPayment,
    RejectionReason, UrgencyThresholds,
};

/// Something off in a trip's records. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    DuplicatePassenger {
        passenger: String,
    },
    UnknownPassenger {
        record: &'static str,
        passenger: String,
    },
    UnknownAddOn {
        passenger: String,
        add_on: String,
    },
    DuplicateSelection {
        passenger: String,
        add_on: String,
    },
    RejectedPayment(RejectedPayment),
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::DuplicatePassenger { passenger } => {
                write!(f, "passenger '{passenger}' is listed more than once; later entries ignored")
            }
            DataWarning::UnknownPassenger { record, passenger } => {
                write!(f, "{record} references unknown passenger '{passenger}'")
            }
            DataWarning::UnknownAddOn { passenger, add_on } => {
                write!(f, "'{passenger}' selected add-on '{add_on}' which is not in the catalog")
            }
            DataWarning::DuplicateSelection { passenger, add_on } => {
                write!(f, "'{passenger}' selected add-on '{add_on}' more than once")
            }
            DataWarning::RejectedPayment(rejected) => write!(
                f,
                "payment of {:.2} from '{}' ignored: {}",
                rejected.amount, rejected.passenger, rejected.reason
            ),
        }
    }
}

/// Ledgers, summary and data-quality warnings for one trip snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TripEvaluation {
    pub schema: TripSchema,
    pub ledgers: Vec<PassengerLedger>,
    pub summary: TripSummary,
    pub warnings: Vec<DataWarning>,
}

impl TripEvaluation {
    pub fn ledger(&self, passenger: &str) -> Option<&PassengerLedger> {
        self.ledgers.iter().find(|l| l.passenger_id == passenger)
    }
}

/// Runs the whole engine over a trip snapshot.
pub fn evaluate(trip: &TripFile, thresholds: &UrgencyThresholds) -> TripEvaluation {
    let normalized = normalize(trip);
    let mut warnings = normalized.warnings.clone();

    let ledgers: Vec<PassengerLedger> = normalized
        .passengers
        .iter()
        .map(|inputs| {
            let payments = inputs.payments.iter().copied();
            let allocation = if inputs.fare.complimentary {
                Allocation::refused(payments, RejectionReason::ComplimentaryPassenger)
            } else {
                allocate(payments)
            };
            warnings.extend(
                allocation
                    .rejected
                    .iter()
                    .cloned()
                    .map(DataWarning::RejectedPayment),
            );
            build_ledger(
                LedgerInput {
                    name: &inputs.passenger.name,
                    phone: inputs.passenger.phone.as_deref(),
                    fare: &inputs.fare,
                    selections: &inputs.selections,
                    allocation: &allocation,
                    days_overdue: inputs.passenger.days_overdue.unwrap_or_default(),
                },
                thresholds,
            )
        })
        .collect();

    let summary = summarize(
        normalized.schema,
        &ledgers,
        normalized.selections(),
        trip,
        &trip.expenses,
    );

    for warning in &warnings {
        tracing::warn!(trip = %trip.trip.name, "{warning}");
    }

    TripEvaluation {
        schema: normalized.schema,
        ledgers,
        summary,
        warnings,
    }
}
