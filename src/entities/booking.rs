use serde::{Deserialize, Serialize};

use crate::entities::Identity;

pub const PAYMENT_UNPAID: &str = "unpaid";

/// A passenger's claim on seats, owned by its ride.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub rider: Identity,
    pub seats: u32,
    pub status: BookingStatus,
    /// Opaque outcome reported by the payment collaborator; recorded
    /// verbatim, never interpreted.
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
}

fn default_payment_status() -> String {
    PAYMENT_UNPAID.into()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting the driver's response. `held` records whether the seats
    /// were already debited from the ride when the request was made;
    /// requests made through this service always hold, records migrated
    /// from older data may not.
    Pending { held: bool },
    Confirmed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn name(&self) -> String {
        match self {
            Self::Pending { held: _ } => "pending".into(),
            Self::Confirmed => "confirmed".into(),
            Self::Rejected => "rejected".into(),
            Self::Cancelled => "cancelled".into(),
        }
    }
}

impl Booking {
    pub fn new(rider: Identity, seats: u32) -> Self {
        Self {
            rider,
            seats,
            status: BookingStatus::Pending { held: true },
            payment_status: default_payment_status(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, BookingStatus::Pending { held: _ })
    }

    /// Pending or confirmed; at most one active booking per rider per ride.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            BookingStatus::Pending { held: _ } | BookingStatus::Confirmed
        )
    }

    /// Seats this booking currently holds against the ride's capacity.
    pub fn held_seats(&self) -> u32 {
        match self.status {
            BookingStatus::Pending { held: true } | BookingStatus::Confirmed => self.seats,
            _ => 0,
        }
    }
}
