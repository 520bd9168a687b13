use crate::config::TripFile;
use crate::error::{Result, TripError};
use crate::ledger::{PaymentEvent, StreamTag};

/// Appends a payment to the trip. Recorded payments are never edited.
pub fn record_payment(trip: &mut TripFile, event: PaymentEvent) -> Result<()> {
    let passenger = trip
        .passenger(&event.passenger)
        .ok_or_else(|| TripError::PassengerNotFound(event.passenger.clone()))?;

    if passenger.complimentary {
        return Err(TripError::ComplimentaryPassenger(passenger.id.clone()));
    }
    if !event.amount.is_finite() || event.amount <= 0.0 {
        return Err(TripError::InvalidPaymentAmount);
    }
    if let StreamTag::Unrecognized(tag) = &event.stream {
        return Err(TripError::InvalidStream(tag.clone()));
    }

    tracing::info!(
        passenger = %event.passenger,
        amount = event.amount,
        stream = %event.stream,
        "recorded payment"
    );
    trip.payments.push(event);
    Ok(())
}
