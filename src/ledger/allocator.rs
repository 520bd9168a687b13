use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TripError;
use crate::money;

/// Which debt a payment settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PaymentStream {
    #[serde(rename = "fare")]
    TripFare,
    #[serde(rename = "addons")]
    AddOns,
    #[serde(rename = "both")]
    Both,
}

impl PaymentStream {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStream::TripFare => "fare",
            PaymentStream::AddOns => "addons",
            PaymentStream::Both => "both",
        }
    }

    pub fn credits_fare(self) -> bool {
        matches!(self, PaymentStream::TripFare | PaymentStream::Both)
    }

    pub fn credits_add_ons(self) -> bool {
        matches!(self, PaymentStream::AddOns | PaymentStream::Both)
    }
}

impl fmt::Display for PaymentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStream {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fare" | "trip" => Ok(PaymentStream::TripFare),
            "addons" | "add-ons" | "add_ons" => Ok(PaymentStream::AddOns),
            "both" => Ok(PaymentStream::Both),
            _ => Err(TripError::InvalidStream(s.to_string())),
        }
    }
}

/// Stream tag as it arrives from a trip file.
///
/// Tags we do not know are kept verbatim so they can be reported instead of
/// being silently dropped or failing the whole trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StreamTag {
    Known(PaymentStream),
    Unrecognized(String),
}

impl Default for StreamTag {
    /// Untagged payments come from single-stream trips and pay the fare.
    fn default() -> Self {
        StreamTag::Known(PaymentStream::TripFare)
    }
}

impl From<String> for StreamTag {
    fn from(raw: String) -> Self {
        match raw.parse::<PaymentStream>() {
            Ok(stream) => StreamTag::Known(stream),
            Err(_) => StreamTag::Unrecognized(raw),
        }
    }
}

impl From<StreamTag> for String {
    fn from(tag: StreamTag) -> Self {
        match tag {
            StreamTag::Known(stream) => stream.as_str().to_string(),
            StreamTag::Unrecognized(raw) => raw,
        }
    }
}

impl From<PaymentStream> for StreamTag {
    fn from(stream: PaymentStream) -> Self {
        StreamTag::Known(stream)
    }
}

impl fmt::Display for StreamTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamTag::Known(stream) => write!(f, "{stream}"),
            StreamTag::Unrecognized(raw) => write!(f, "{raw}?"),
        }
    }
}

/// A single payment received from a passenger. Append-only.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PaymentEvent {
    pub passenger: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub stream: StreamTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl PaymentEvent {
    pub fn new(passenger: impl Into<String>, amount: f64, stream: PaymentStream) -> Self {
        Self {
            passenger: passenger.into(),
            amount,
            stream: stream.into(),
            date: None,
            method: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn via(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectionReason {
    UnrecognizedStream(String),
    InvalidAmount,
    ComplimentaryPassenger,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::UnrecognizedStream(tag) => {
                write!(f, "unrecognized payment stream '{tag}'")
            }
            RejectionReason::InvalidAmount => f.write_str("amount is not a positive number"),
            RejectionReason::ComplimentaryPassenger => {
                f.write_str("passenger is complimentary and owes nothing")
            }
        }
    }
}

/// A payment left out of the per-stream totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedPayment {
    pub passenger: String,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub reason: RejectionReason,
}

/// Per-stream totals collected from one passenger.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Allocation {
    pub paid_fare: f64,
    pub paid_add_ons: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedPayment>,
}

impl Allocation {
    /// Sum of both stream credits. A `both` payment counts twice here.
    pub fn credited(&self) -> f64 {
        self.paid_fare + self.paid_add_ons
    }

    /// Credits nothing and reports every event with the same reason.
    pub fn refused<'a, I>(events: I, reason: RejectionReason) -> Self
    where
        I: IntoIterator<Item = &'a PaymentEvent>,
    {
        Allocation {
            paid_fare: 0.0,
            paid_add_ons: 0.0,
            rejected: events
                .into_iter()
                .map(|event| rejection(event, reason.clone()))
                .collect(),
        }
    }
}

/// Splits payment events into fare and add-on totals.
///
/// A `both` payment credits its full amount to each stream; it is not
/// divided between them.
pub fn allocate<'a, I>(events: I) -> Allocation
where
    I: IntoIterator<Item = &'a PaymentEvent>,
{
    let mut allocation = Allocation::default();

    for event in events {
        let stream = match &event.stream {
            StreamTag::Known(stream) => *stream,
            StreamTag::Unrecognized(tag) => {
                allocation.rejected.push(rejection(
                    event,
                    RejectionReason::UnrecognizedStream(tag.clone()),
                ));
                continue;
            }
        };

        if !event.amount.is_finite() || event.amount <= 0.0 {
            allocation
                .rejected
                .push(rejection(event, RejectionReason::InvalidAmount));
            continue;
        }

        if stream.credits_fare() {
            allocation.paid_fare += event.amount;
        }
        if stream.credits_add_ons() {
            allocation.paid_add_ons += event.amount;
        }
    }

    allocation.paid_fare = money::sanitize(allocation.paid_fare);
    allocation.paid_add_ons = money::sanitize(allocation.paid_add_ons);
    allocation
}

fn rejection(event: &PaymentEvent, reason: RejectionReason) -> RejectedPayment {
    RejectedPayment {
        passenger: event.passenger.clone(),
        amount: event.amount,
        date: event.date,
        reason,
    }
}
