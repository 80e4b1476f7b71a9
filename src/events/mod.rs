use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted after a booking transaction commits.
///
/// Delivery is fire-and-forget: the transaction never waits on, or fails
/// because of, event fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    BookingCreated {
        booking_id: Uuid,
        customer_id: Uuid,
        flight_id: i64,
        total_price: Decimal,
        seat_ids: Vec<i64>,
    },
    BookingCancelled {
        booking_id: Uuid,
        customer_id: Uuid,
        flight_id: i64,
        released_seat_ids: Vec<i64>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes the event channel and logs each notification.
///
/// Downstream consumers (mail, analytics) hook in here; the core service only
/// guarantees the notification is emitted after commit.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::BookingCreated {
                booking_id,
                flight_id,
                seat_ids,
                ..
            } => {
                info!(
                    booking_id = %booking_id,
                    flight_id = flight_id,
                    seats = seat_ids.len(),
                    "booking created"
                );
            }
            Event::BookingCancelled {
                booking_id,
                released_seat_ids,
                ..
            } => {
                info!(
                    booking_id = %booking_id,
                    released = released_seat_ids.len(),
                    "booking cancelled"
                );
            }
        }
    }

    warn!("Event channel closed; stopping event processing loop");
}
