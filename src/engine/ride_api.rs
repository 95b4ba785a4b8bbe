use super::helpers::{fetch_driver_for_update, fetch_ride_for_update, insert_ride, update_driver, update_ride};
use super::Engine;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::{BookingResponse, CreateRide, RideAPI, RideQuery},
    auth::{guard, Caller, Role},
    db::with_retry,
    entities::{Identity, Ride},
    error::{forbidden_error, not_found_error, Error},
};

#[async_trait]
impl RideAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_ride(&self, caller: Caller, params: CreateRide) -> Result<Ride, Error> {
        let ride = Ride::new(
            caller.identity(),
            params.source,
            params.destination,
            params.source_coord,
            params.destination_coord,
            params.date,
            params.departure_time,
            params.price,
            params.max_seats,
        )?;

        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        insert_ride(&mut tx, &ride).await?;

        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, id: Uuid) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;

        let Json(ride): Json<Ride> = conn
            .fetch_optional(sqlx::query("SELECT data FROM rides WHERE id = $1").bind(&id))
            .await?
            .ok_or_else(not_found_error)?
            .try_get("data")?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn search_rides(&self, query: RideQuery) -> Result<Vec<Ride>, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT data FROM rides \
                     WHERE status IN ('pending', 'scheduled') \
                       AND ($1::text IS NULL OR data->>'source' ILIKE '%' || $1 || '%') \
                       AND ($2::text IS NULL OR data->>'destination' ILIKE '%' || $2 || '%') \
                       AND ($3::date IS NULL OR (data->>'date')::date = $3) \
                     ORDER BY departs_at ASC",
                )
                .bind(&query.source)
                .bind(&query.destination)
                .bind(&query.date),
            )
            .await?;

        let mut rides = Vec::with_capacity(rows.len());
        for row in rows {
            let Json(ride): Json<Ride> = row.try_get("data")?;
            rides.push(ride);
        }

        Ok(rides)
    }

    #[tracing::instrument(skip(self))]
    async fn update_schedule(
        &self,
        caller: Caller,
        id: Uuid,
        date: NaiveDate,
        departure_time: NaiveTime,
    ) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        guard::ensure_creator(&caller.identity(), &ride)?;

        ride.reschedule(date, departure_time)?;

        update_ride(&mut tx, &ride).await?;
        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn accept_ride(&self, caller: Caller, id: Uuid) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        let identity = caller.identity();
        if ride.creator.matches(&identity) {
            return Err(forbidden_error());
        }

        // a driver session is one with a registered driver profile
        let mut driver = match fetch_driver_for_update(&mut tx, &caller.id).await {
            Ok(driver) => driver,
            Err(err) if err.code == crate::error::NOT_FOUND => return Err(forbidden_error()),
            Err(err) => return Err(err),
        };

        ride.accept_driver(identity)?;
        driver.record_trip();

        update_ride(&mut tx, &ride).await?;
        update_driver(&mut tx, &driver).await?;

        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn book_seats(&self, caller: Caller, id: Uuid, seats: u32) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        ride.request_seats(caller.identity(), seats)?;

        update_ride(&mut tx, &ride).await?;
        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn respond_booking(
        &self,
        caller: Caller,
        id: Uuid,
        rider: Identity,
        response: BookingResponse,
    ) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        guard::ensure_bound_driver(&caller.identity(), &ride)?;

        match response {
            BookingResponse::Accept => ride.accept_booking(&rider)?,
            BookingResponse::Reject => ride.reject_booking(&rider)?,
        }

        update_ride(&mut tx, &ride).await?;
        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_ride(&self, caller: Caller, id: Uuid) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;
        let identity = caller.identity();

        match guard::resolve_role(&identity, &ride) {
            Role::Creator | Role::Driver => ride.cancel()?,
            Role::Passenger => ride.cancel_booking(&identity)?,
            Role::None => return Err(forbidden_error()),
        }

        update_ride(&mut tx, &ride).await?;
        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn complete_ride(&self, caller: Caller, id: Uuid) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        guard::ensure_bound_driver(&caller.identity(), &ride)?;

        ride.complete()?;

        update_ride(&mut tx, &ride).await?;
        tx.commit().await?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn record_payment(
        &self,
        caller: Caller,
        id: Uuid,
        payment_status: String,
    ) -> Result<Ride, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut ride = fetch_ride_for_update(&mut tx, &id).await?;

        ride.record_payment(&caller.identity(), payment_status)?;

        update_ride(&mut tx, &ride).await?;
        tx.commit().await?;

        Ok(ride)
    }
}
