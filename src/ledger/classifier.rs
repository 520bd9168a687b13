//! Filtering, searching, sorting and urgency bucketing over built ledgers.
//!
//! Nothing here mutates a ledger; views get borrowed, reordered slices back.

use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

use super::passenger::{PassengerLedger, UrgencyTier};
use crate::error::TripError;

/// Which debt stream a pending passenger still owes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendencyCategory {
    #[default]
    All,
    TripOnly,
    AddOnsOnly,
    Both,
}

impl PendencyCategory {
    pub fn matches(self, ledger: &PassengerLedger) -> bool {
        let fare = ledger.has_pending_fare();
        let add_ons = ledger.has_pending_add_ons();
        match self {
            PendencyCategory::All => true,
            PendencyCategory::TripOnly => fare && !add_ons,
            PendencyCategory::AddOnsOnly => add_ons && !fare,
            PendencyCategory::Both => fare && add_ons,
        }
    }
}

impl FromStr for PendencyCategory {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PendencyCategory::All),
            "trip-only" | "trip" | "fare" => Ok(PendencyCategory::TripOnly),
            "add-ons-only" | "addons" | "add-ons" => Ok(PendencyCategory::AddOnsOnly),
            "both" => Ok(PendencyCategory::Both),
            _ => Err(TripError::InvalidCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Name ascending, case-insensitive.
    #[default]
    Name,
    /// Total owed, largest first.
    TotalOwed,
    /// Total pending, largest first.
    TotalPending,
}

impl FromStr for SortOrder {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "owed" | "total-owed" => Ok(SortOrder::TotalOwed),
            "pending" | "total-pending" => Ok(SortOrder::TotalPending),
            _ => Err(TripError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Case-insensitive substring match on name or phone.
pub fn matches_search(ledger: &PassengerLedger, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    ledger.name.to_lowercase().contains(&needle)
        || ledger
            .phone
            .as_deref()
            .is_some_and(|phone| phone.to_lowercase().contains(&needle))
}

/// Stable sort; ties keep their incoming order.
pub fn sort_ledgers(ledgers: &mut [&PassengerLedger], order: SortOrder) {
    match order {
        SortOrder::Name => {
            ledgers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortOrder::TotalOwed => ledgers.sort_by(|a, b| descending(a.total_owed(), b.total_owed())),
        SortOrder::TotalPending => {
            ledgers.sort_by(|a, b| descending(a.pending_total, b.pending_total))
        }
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// A view over ledgers: category filter, search text and order.
#[derive(Debug, Clone, Default)]
pub struct PendencyQuery {
    pub category: PendencyCategory,
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl PendencyQuery {
    pub fn apply<'a>(&self, ledgers: &'a [PassengerLedger]) -> Vec<&'a PassengerLedger> {
        let mut selected: Vec<&PassengerLedger> = ledgers
            .iter()
            .filter(|l| self.category.matches(l))
            .filter(|l| {
                self.search
                    .as_deref()
                    .map_or(true, |query| matches_search(l, query))
            })
            .collect();
        sort_ledgers(&mut selected, self.sort);
        selected
    }
}

/// Ledgers that still owe something.
pub fn outstanding(ledgers: &[PassengerLedger]) -> Vec<&PassengerLedger> {
    ledgers.iter().filter(|l| l.is_outstanding()).collect()
}

/// Outstanding ledgers grouped by urgency, each group largest debt first.
#[derive(Debug, Default, Serialize)]
pub struct UrgencyBuckets<'a> {
    pub critical: Vec<&'a PassengerLedger>,
    pub attention: Vec<&'a PassengerLedger>,
    pub on_track: Vec<&'a PassengerLedger>,
}

impl<'a> UrgencyBuckets<'a> {
    pub fn tier(&self, tier: UrgencyTier) -> &[&'a PassengerLedger] {
        match tier {
            UrgencyTier::Critical => &self.critical,
            UrgencyTier::Attention => &self.attention,
            UrgencyTier::OnTrack => &self.on_track,
        }
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.attention.len() + self.on_track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn urgency_buckets(ledgers: &[PassengerLedger]) -> UrgencyBuckets<'_> {
    let mut buckets = UrgencyBuckets::default();
    for ledger in outstanding(ledgers) {
        match ledger.urgency {
            UrgencyTier::Critical => buckets.critical.push(ledger),
            UrgencyTier::Attention => buckets.attention.push(ledger),
            UrgencyTier::OnTrack => buckets.on_track.push(ledger),
        }
    }
    for bucket in [
        &mut buckets.critical,
        &mut buckets.attention,
        &mut buckets.on_track,
    ] {
        sort_ledgers(bucket, SortOrder::TotalPending);
    }
    buckets
}
