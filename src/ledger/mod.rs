mod allocator;
mod classifier;
mod passenger;

pub use allocator::{
    allocate, Allocation, PaymentEvent, PaymentStream, RejectedPayment, RejectionReason,
    StreamTag,
};
pub use classifier::{
    matches_search, outstanding, sort_ledgers, urgency_buckets, PendencyCategory, PendencyQuery,
    SortOrder, UrgencyBuckets,
};
pub use passenger::{
    build_ledger, AddOnSelection, LedgerInput, PassengerLedger, PaymentStatus, TripFareRecord,
    UrgencyThresholds, UrgencyTier,
};
