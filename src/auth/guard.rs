use crate::entities::{Identity, Ride};
use crate::error::{forbidden_error, Error};

/// The caller's relationship to a ride. Resolution is read-only; every
/// mutating engine operation consults it before touching the record.
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    Creator,
    Driver,
    Passenger,
    None,
}

/// Determines who the caller is in relation to the ride. Matching goes
/// through `Identity::matches`, so an id hit or an email hit is equally
/// authoritative on records written under either convention.
pub fn resolve_role(caller: &Identity, ride: &Ride) -> Role {
    if ride.creator.matches(caller) {
        return Role::Creator;
    }

    if let Some(driver) = &ride.driver {
        if driver.matches(caller) {
            return Role::Driver;
        }
    }

    if ride
        .bookings
        .iter()
        .any(|b| b.is_active() && b.rider.matches(caller))
    {
        return Role::Passenger;
    }

    Role::None
}

/// Only the driver bound to the ride may resolve its booking requests or
/// complete it.
pub fn ensure_bound_driver(caller: &Identity, ride: &Ride) -> Result<(), Error> {
    match resolve_role(caller, ride) {
        Role::Driver => Ok(()),
        _ => Err(forbidden_error()),
    }
}

pub fn ensure_creator(caller: &Identity, ride: &Ride) -> Result<(), Error> {
    match resolve_role(caller, ride) {
        Role::Creator => Ok(()),
        _ => Err(forbidden_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Coordinates, Identity};
    use crate::error;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn identity(email: &str) -> Identity {
        Identity::new(Uuid::new_v4(), email.into())
    }

    fn ride_with_creator(creator: Identity) -> Ride {
        let departs = Utc::now() + Duration::days(1);

        Ride::new(
            creator,
            "Alexandria".into(),
            "Cairo".into(),
            Coordinates { lat: 31.2, lng: 29.9 },
            Coordinates { lat: 30.0, lng: 31.2 },
            departs.date_naive(),
            departs.time(),
            25.0,
            4,
        )
        .unwrap()
    }

    #[test]
    fn creator_resolves_by_id_and_by_email() {
        let creator = identity("creator@example.com");
        let ride = ride_with_creator(creator.clone());

        let by_id = Identity::new(creator.id.unwrap(), "rotated@example.com".into());
        assert_eq!(resolve_role(&by_id, &ride), Role::Creator);

        let by_email = Identity::new(Uuid::new_v4(), "creator@example.com".into());
        assert_eq!(resolve_role(&by_email, &ride), Role::Creator);
    }

    #[test]
    fn creator_resolves_on_legacy_email_only_records() {
        let mut ride = ride_with_creator(identity("creator@example.com"));
        ride.creator = Identity {
            id: None,
            email: "creator@example.com".into(),
        };

        let caller = Identity::new(Uuid::new_v4(), "creator@example.com".into());
        assert_eq!(resolve_role(&caller, &ride), Role::Creator);
    }

    #[test]
    fn bound_driver_and_passenger_resolve() {
        let mut ride = ride_with_creator(identity("creator@example.com"));
        let driver = identity("driver@example.com");
        let passenger = identity("p@example.com");

        ride.accept_driver(driver.clone()).unwrap();
        ride.request_seats(passenger.clone(), 1).unwrap();

        assert_eq!(resolve_role(&driver, &ride), Role::Driver);
        assert_eq!(resolve_role(&passenger, &ride), Role::Passenger);
        assert_eq!(resolve_role(&identity("nobody@example.com"), &ride), Role::None);
    }

    #[test]
    fn resolved_booking_no_longer_grants_passenger_role() {
        let mut ride = ride_with_creator(identity("creator@example.com"));
        let passenger = identity("p@example.com");

        ride.accept_driver(identity("driver@example.com")).unwrap();
        ride.request_seats(passenger.clone(), 1).unwrap();
        ride.reject_booking(&passenger).unwrap();

        assert_eq!(resolve_role(&passenger, &ride), Role::None);
    }

    #[test]
    fn only_the_bound_driver_passes_the_driver_check() {
        let mut ride = ride_with_creator(identity("creator@example.com"));
        let driver = identity("driver@example.com");
        ride.accept_driver(driver.clone()).unwrap();

        assert!(ensure_bound_driver(&driver, &ride).is_ok());

        let err = ensure_bound_driver(&identity("other@example.com"), &ride).unwrap_err();
        assert_eq!(err.code, error::FORBIDDEN);

        let err = ensure_creator(&driver, &ride).unwrap_err();
        assert_eq!(err.code, error::FORBIDDEN);
    }
}
