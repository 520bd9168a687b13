use serde::Serialize;
use std::collections::HashMap;

use super::adapter::TripSchema;
use crate::config::{AddOn, ExpenseRecord, TripFile};
use crate::ledger::{AddOnSelection, PassengerLedger, PaymentStatus};
use crate::money;

/// Supplier cost of an add-on, per participant.
pub trait CostCatalog {
    fn cost_basis(&self, add_on: &str) -> Option<f64>;
}

impl CostCatalog for HashMap<String, f64> {
    fn cost_basis(&self, add_on: &str) -> Option<f64> {
        self.get(add_on).copied()
    }
}

impl CostCatalog for [AddOn] {
    fn cost_basis(&self, add_on: &str) -> Option<f64> {
        self.iter().find(|a| a.id == add_on).map(|a| a.cost)
    }
}

impl CostCatalog for TripFile {
    fn cost_basis(&self, add_on: &str) -> Option<f64> {
        self.add_ons.as_slice().cost_basis(add_on)
    }
}

/// Revenue and profit of one debt stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamSummary {
    pub revenue: f64,
    pub pending: f64,
    pub collected: f64,
    pub expenses: f64,
    pub profit: f64,
    pub margin_pct: f64,
}

impl StreamSummary {
    fn new(revenue: f64, pending: f64, expenses: f64) -> Self {
        let profit = revenue - expenses;
        Self {
            revenue,
            pending,
            collected: revenue - pending,
            expenses,
            profit,
            margin_pct: money::percent(profit, revenue),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub partial: usize,
    pub paid: usize,
}

/// Financial rollup of a whole trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub schema: TripSchema,
    pub passengers: usize,
    pub passengers_with_pending: usize,
    pub complimentary_passengers: usize,
    pub status_counts: StatusCounts,
    /// Nominal: everything owed, whether collected or not.
    pub total_revenue: f64,
    pub total_pending: f64,
    pub total_collected: f64,
    pub collection_rate_pct: f64,
    pub manual_expenses: f64,
    pub add_on_costs: f64,
    pub total_expenses: f64,
    pub gross_profit: f64,
    pub margin_pct: f64,
    pub fare: StreamSummary,
    pub add_ons: StreamSummary,
}

/// Sums ledgers, add-on costs and manual expenses into a [`TripSummary`].
///
/// Manual expenses are shared between the streams in proportion to their
/// revenue; add-on supplier costs belong to the add-on stream only. With no
/// revenue at all, manual expenses sit on the fare stream.
pub fn summarize<'a, C>(
    schema: TripSchema,
    ledgers: &[PassengerLedger],
    selections: impl IntoIterator<Item = &'a AddOnSelection>,
    catalog: &C,
    expenses: &[ExpenseRecord],
) -> TripSummary
where
    C: CostCatalog + ?Sized,
{
    let mut status_counts = StatusCounts::default();
    let mut fare_revenue = 0.0;
    let mut fare_pending = 0.0;
    let mut add_on_revenue = 0.0;
    let mut add_on_pending = 0.0;
    let mut passengers_with_pending = 0;
    let mut complimentary_passengers = 0;

    for ledger in ledgers {
        fare_revenue += ledger.fare_owed;
        fare_pending += ledger.pending_fare;
        add_on_revenue += ledger.add_on_owed;
        add_on_pending += ledger.pending_add_ons;

        if ledger.is_outstanding() {
            passengers_with_pending += 1;
        }
        if ledger.complimentary {
            complimentary_passengers += 1;
        }
        match ledger.status {
            PaymentStatus::Pending => status_counts.pending += 1,
            PaymentStatus::Partial => status_counts.partial += 1,
            PaymentStatus::Paid => status_counts.paid += 1,
        }
    }

    let add_on_costs: f64 = selections
        .into_iter()
        .filter(|s| s.active)
        .map(|s| money::non_negative(catalog.cost_basis(&s.add_on).unwrap_or_default()))
        .sum();
    let manual_expenses: f64 = expenses.iter().map(|e| money::sanitize(e.amount)).sum();

    let total_revenue = fare_revenue + add_on_revenue;
    let total_pending = fare_pending + add_on_pending;
    let total_collected = total_revenue - total_pending;
    let total_expenses = manual_expenses + add_on_costs;
    let gross_profit = total_revenue - total_expenses;

    let fare_share = if total_revenue > 0.0 {
        fare_revenue / total_revenue
    } else {
        1.0
    };
    let fare_expenses = manual_expenses * fare_share;
    let add_on_expenses = manual_expenses - fare_expenses + add_on_costs;

    tracing::debug!(
        passengers = ledgers.len(),
        total_revenue,
        total_pending,
        total_expenses,
        "summarized trip"
    );

    TripSummary {
        schema,
        passengers: ledgers.len(),
        passengers_with_pending,
        complimentary_passengers,
        status_counts,
        total_revenue,
        total_pending,
        total_collected,
        collection_rate_pct: money::percent(total_collected, total_revenue),
        manual_expenses,
        add_on_costs,
        total_expenses,
        gross_profit,
        margin_pct: money::percent(gross_profit, total_revenue),
        fare: StreamSummary::new(fare_revenue, fare_pending, fare_expenses),
        add_ons: StreamSummary::new(add_on_revenue, add_on_pending, add_on_expenses),
    }
}
