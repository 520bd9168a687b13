pub mod config;
pub mod error;
pub mod ledger;
pub mod money;
pub mod trip;

pub use config::{AddOn, Config, ExpenseRecord, Passenger, SelectionRecord, TripFile, TripInfo};
pub use error::{Result, TripError};
pub use ledger::{
    allocate, build_ledger, Allocation, PassengerLedger, PaymentEvent, PaymentStatus,
    PaymentStream, PendencyCategory, PendencyQuery, SortOrder, UrgencyThresholds, UrgencyTier,
};
pub use trip::{evaluate, DataWarning, TripEvaluation, TripSchema, TripSummary};
