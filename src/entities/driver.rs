use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{validation_error, Error};

/// Driver profile, a separate aggregate referenced from rides by identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub rating: f64,
    pub total_trips: u32,
}

impl Driver {
    pub fn new(id: Uuid, name: String, email: String) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(validation_error("driver name is required"));
        }

        Ok(Self {
            id,
            name,
            email,
            rating: 0.0,
            total_trips: 0,
        })
    }

    /// Bumped each time the driver claims a ride; never decremented.
    pub fn record_trip(&mut self) {
        self.total_trips += 1;
    }

    pub fn rate(&mut self, rating: f64) -> Result<(), Error> {
        if !(0.0..=5.0).contains(&rating) {
            return Err(validation_error("rating must be between 0 and 5"));
        }

        self.rating = rating;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_only_go_up() {
        let mut driver =
            Driver::new(Uuid::new_v4(), "Sami".into(), "sami@example.com".into()).unwrap();

        driver.record_trip();
        driver.record_trip();

        assert_eq!(driver.total_trips, 2);
    }

    #[test]
    fn rating_is_bounded() {
        let mut driver =
            Driver::new(Uuid::new_v4(), "Sami".into(), "sami@example.com".into()).unwrap();

        assert!(driver.rate(5.1).is_err());
        assert!(driver.rate(-0.1).is_err());
        driver.rate(4.5).unwrap();
        assert_eq!(driver.rating, 4.5);
    }
}
