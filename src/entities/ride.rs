use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Booking, BookingStatus, Identity};
use crate::error::{
    capacity_exceeded_error, conflict_error, forbidden_error, not_found_error, self_booking_error,
    validation_error, Error,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A single offered trip with fixed capacity and schedule.
///
/// All capacity and status invariants are scoped to one ride, so the store
/// serializes mutations per ride and this type never needs to know about
/// its siblings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ride {
    pub id: Uuid,
    pub source: String,
    pub destination: String,
    pub source_coord: Coordinates,
    pub destination_coord: Coordinates,
    pub date: NaiveDate,
    pub departure_time: NaiveTime,
    pub price: f64,
    pub max_seats: u32,
    pub left_seats: u32,
    pub status: Status,
    pub creator: Identity,
    #[serde(default)]
    pub driver: Option<Identity>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Pending => "pending".into(),
            Self::Scheduled => "scheduled".into(),
            Self::Completed => "completed".into(),
            Self::Cancelled => "cancelled".into(),
        }
    }
}

impl Ride {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        creator: Identity,
        source: String,
        destination: String,
        source_coord: Coordinates,
        destination_coord: Coordinates,
        date: NaiveDate,
        departure_time: NaiveTime,
        price: f64,
        max_seats: u32,
    ) -> Result<Self, Error> {
        if source.trim().is_empty() || destination.trim().is_empty() {
            return Err(validation_error("source and destination are required"));
        }

        if !price.is_finite() || price < 0.0 {
            return Err(validation_error("price must be a non-negative number"));
        }

        if max_seats == 0 {
            return Err(validation_error("a ride must offer at least one seat"));
        }

        let ride = Self {
            id: Uuid::new_v4(),
            source,
            destination,
            source_coord,
            destination_coord,
            date,
            departure_time,
            price,
            max_seats,
            left_seats: max_seats,
            status: Status::Pending,
            creator,
            driver: None,
            bookings: Vec::new(),
        };

        ride.ensure_future_departure()?;

        Ok(ride)
    }

    /// The scheduled instant, combined from the calendar date and the
    /// time-of-day.
    pub fn departs_at(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.date.and_time(self.departure_time))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, Status::Completed | Status::Cancelled)
    }

    fn ensure_future_departure(&self) -> Result<(), Error> {
        if self.departs_at() <= Utc::now() {
            return Err(validation_error(
                "departure instant must be strictly in the future",
            ));
        }

        Ok(())
    }

    fn ensure_not_terminal(&self) -> Result<(), Error> {
        if self.is_terminal() {
            return Err(conflict_error("ride is in a terminal status"));
        }

        Ok(())
    }

    /// Moves the departure instant. Re-runs the future-departure guard;
    /// creation-time validation alone is not enough once updates exist.
    #[tracing::instrument]
    pub fn reschedule(&mut self, date: NaiveDate, departure_time: NaiveTime) -> Result<(), Error> {
        self.ensure_not_terminal()?;

        let previous = (self.date, self.departure_time);
        self.date = date;
        self.departure_time = departure_time;

        if let Err(err) = self.ensure_future_departure() {
            (self.date, self.departure_time) = previous;
            return Err(err);
        }

        Ok(())
    }

    /// pending -> scheduled, binding the accepting driver.
    #[tracing::instrument]
    pub fn accept_driver(&mut self, driver: Identity) -> Result<(), Error> {
        match self.status {
            Status::Pending => {
                if self.driver.is_some() {
                    return Err(conflict_error("ride is already claimed by a driver"));
                }

                self.ensure_future_departure()?;

                self.driver = Some(driver);
                self.status = Status::Scheduled;

                Ok(())
            }
            Status::Scheduled => Err(conflict_error("ride is already claimed by a driver")),
            _ => Err(conflict_error("ride is in a terminal status")),
        }
    }

    /// Debits capacity. Fails with the remaining-seat count when the
    /// request cannot be met; that is an expected outcome, not a fault.
    pub fn reserve_seats(&mut self, seats: u32) -> Result<(), Error> {
        if seats > self.left_seats {
            return Err(capacity_exceeded_error(self.left_seats));
        }

        self.left_seats -= seats;
        Ok(())
    }

    /// Credits capacity back, bounded above by `max_seats`.
    pub fn release_seats(&mut self, seats: u32) {
        self.left_seats = (self.left_seats + seats).min(self.max_seats);
    }

    fn active_booking(&self, rider: &Identity) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.is_active() && b.rider.matches(rider))
    }

    fn pending_booking_mut(&mut self, rider: &Identity) -> Option<&mut Booking> {
        self.bookings
            .iter_mut()
            .find(|b| b.is_pending() && b.rider.matches(rider))
    }

    /// Appends a seat request, holding the seats immediately. Holding at
    /// request time means capacity contention is resolved here, and the
    /// driver's later accept can no longer fail for lack of seats.
    #[tracing::instrument]
    pub fn request_seats(&mut self, rider: Identity, seats: u32) -> Result<(), Error> {
        match self.status {
            Status::Scheduled => (),
            Status::Pending => {
                return Err(conflict_error("ride is not yet claimed by a driver"))
            }
            _ => return Err(conflict_error("ride is in a terminal status")),
        }

        if self.creator.matches(&rider) {
            return Err(self_booking_error());
        }

        if let Some(driver) = &self.driver {
            if driver.matches(&rider) {
                return Err(forbidden_error());
            }
        }

        if seats == 0 || seats > self.max_seats {
            return Err(validation_error("requested seats must be between 1 and the ride capacity"));
        }

        if self.active_booking(&rider).is_some() {
            return Err(conflict_error("rider already has an active booking"));
        }

        self.reserve_seats(seats)?;
        self.bookings.push(Booking::new(rider, seats));

        Ok(())
    }

    /// Driver confirms a pending request. Held requests confirm without
    /// touching capacity; unheld ones (migrated records) are debited here
    /// and stay pending if the seats no longer fit.
    #[tracing::instrument]
    pub fn accept_booking(&mut self, rider: &Identity) -> Result<(), Error> {
        self.ensure_not_terminal()?;

        let left_seats = self.left_seats;
        let booking = self
            .pending_booking_mut(rider)
            .ok_or_else(not_found_error)?;

        if booking.status == (BookingStatus::Pending { held: false }) {
            if booking.seats > left_seats {
                return Err(capacity_exceeded_error(left_seats));
            }

            let seats = booking.seats;
            booking.status = BookingStatus::Confirmed;
            self.left_seats -= seats;
            return Ok(());
        }

        booking.status = BookingStatus::Confirmed;
        Ok(())
    }

    /// Driver declines a pending request, releasing its hold if any.
    #[tracing::instrument]
    pub fn reject_booking(&mut self, rider: &Identity) -> Result<(), Error> {
        self.ensure_not_terminal()?;

        let booking = self
            .pending_booking_mut(rider)
            .ok_or_else(not_found_error)?;

        let freed = booking.held_seats();
        booking.status = BookingStatus::Rejected;
        self.release_seats(freed);

        Ok(())
    }

    /// A passenger withdraws their own booking. The ride itself is left
    /// untouched.
    #[tracing::instrument]
    pub fn cancel_booking(&mut self, rider: &Identity) -> Result<(), Error> {
        self.ensure_not_terminal()?;

        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.is_active() && b.rider.matches(rider))
            .ok_or_else(not_found_error)?;

        let freed = booking.held_seats();
        booking.status = BookingStatus::Cancelled;
        self.release_seats(freed);

        Ok(())
    }

    /// pending/scheduled -> cancelled. Pending requests are auto-rejected
    /// and their holds released rather than left orphaned.
    #[tracing::instrument]
    pub fn cancel(&mut self) -> Result<(), Error> {
        self.ensure_not_terminal()?;

        for booking in self.bookings.iter_mut() {
            if booking.is_pending() {
                let freed = booking.held_seats();
                booking.status = BookingStatus::Rejected;
                self.left_seats = (self.left_seats + freed).min(self.max_seats);
            }
        }

        self.status = Status::Cancelled;
        Ok(())
    }

    /// scheduled -> completed, on the bound driver's explicit say-so.
    #[tracing::instrument]
    pub fn complete(&mut self) -> Result<(), Error> {
        match self.status {
            Status::Scheduled => {
                self.status = Status::Completed;
                Ok(())
            }
            Status::Pending => Err(conflict_error("ride has no bound driver yet")),
            _ => Err(conflict_error("ride is in a terminal status")),
        }
    }

    /// Sweep step: age the ride into `completed` once its scheduled
    /// instant is strictly in the past. Returns whether anything changed,
    /// so a second application over unchanged data is a no-op.
    pub fn complete_if_elapsed(&mut self, now: DateTime<Utc>) -> bool {
        match self.status {
            Status::Pending | Status::Scheduled if self.departs_at() < now => {
                self.status = Status::Completed;
                true
            }
            _ => false,
        }
    }

    /// Sum of seats held by pending-held and confirmed bookings; the
    /// capacity invariant ties this to `max_seats - left_seats`.
    pub fn consumed_seats(&self) -> u32 {
        self.bookings.iter().map(|b| b.held_seats()).sum()
    }

    /// Records the payment collaborator's verdict on the rider's booking.
    /// The value is opaque here and may arrive after the ride completed,
    /// so no status guard applies.
    pub fn record_payment(&mut self, rider: &Identity, payment_status: String) -> Result<(), Error> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|b| b.is_active() && b.rider.matches(rider))
            .ok_or_else(not_found_error)?;

        booking.payment_status = payment_status;
        Ok(())
    }
}
