use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Caller;
use crate::entities::{Coordinates, Driver, Ride};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRide {
    pub source: String,
    pub destination: String,
    pub source_coord: Coordinates,
    pub destination_coord: Coordinates,
    pub date: NaiveDate,
    pub departure_time: NaiveTime,
    pub price: f64,
    pub max_seats: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RideQuery {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingResponse {
    Accept,
    Reject,
}

#[async_trait]
pub trait RideAPI {
    async fn create_ride(&self, caller: Caller, params: CreateRide) -> Result<Ride, Error>;

    async fn find_ride(&self, id: Uuid) -> Result<Ride, Error>;

    async fn search_rides(&self, query: RideQuery) -> Result<Vec<Ride>, Error>;

    async fn update_schedule(
        &self,
        caller: Caller,
        id: Uuid,
        date: NaiveDate,
        departure_time: NaiveTime,
    ) -> Result<Ride, Error>;

    async fn accept_ride(&self, caller: Caller, id: Uuid) -> Result<Ride, Error>;

    async fn book_seats(&self, caller: Caller, id: Uuid, seats: u32) -> Result<Ride, Error>;

    async fn respond_booking(
        &self,
        caller: Caller,
        id: Uuid,
        rider: crate::entities::Identity,
        response: BookingResponse,
    ) -> Result<Ride, Error>;

    async fn cancel_ride(&self, caller: Caller, id: Uuid) -> Result<Ride, Error>;

    async fn complete_ride(&self, caller: Caller, id: Uuid) -> Result<Ride, Error>;

    async fn record_payment(
        &self,
        caller: Caller,
        id: Uuid,
        payment_status: String,
    ) -> Result<Ride, Error>;
}

#[async_trait]
pub trait DriverAPI {
    async fn create_driver(&self, caller: Caller, name: String) -> Result<Driver, Error>;

    async fn find_driver(&self, id: Uuid) -> Result<Driver, Error>;

    async fn rate_driver(&self, caller: Caller, id: Uuid, rating: f64) -> Result<Driver, Error>;
}

pub trait API: RideAPI + DriverAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
