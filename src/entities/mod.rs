mod booking;
mod driver;
mod identity;
mod ride;

pub use booking::{Booking, BookingStatus, PAYMENT_UNPAID};
pub use driver::Driver;
pub use identity::Identity;
pub use ride::{Coordinates, Ride, Status};
