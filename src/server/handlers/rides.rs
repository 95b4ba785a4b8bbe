use axum::extract::{Extension, Json, Path, Query};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{BookingResponse, CreateRide, DynAPI, RideQuery};
use crate::auth::Caller;
use crate::entities::{Identity, Ride};
use crate::error::{validation_error, Error};

#[derive(Serialize, Deserialize)]
pub struct UpdateScheduleParams {
    date: NaiveDate,
    departure_time: NaiveTime,
}

#[derive(Serialize, Deserialize)]
pub struct BookParams {
    seats: u32,
}

#[derive(Serialize, Deserialize)]
pub struct RespondParams {
    rider_id: Option<Uuid>,
    rider_email: Option<String>,
    response: BookingResponse,
}

#[derive(Serialize, Deserialize)]
pub struct PaymentParams {
    payment_status: String,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Json(params): Json<CreateRide>,
) -> Result<Json<Ride>, Error> {
    let ride = api.create_ride(caller, params).await?;

    Ok(ride.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.find_ride(id).await?;

    Ok(ride.into())
}

pub async fn search(
    Extension(api): Extension<DynAPI>,
    Query(query): Query<RideQuery>,
) -> Result<Json<Vec<Ride>>, Error> {
    let rides = api.search_rides(query).await?;

    Ok(rides.into())
}

pub async fn update_schedule(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateScheduleParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api
        .update_schedule(caller, id, params.date, params.departure_time)
        .await?;

    Ok(ride.into())
}

pub async fn accept(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.accept_ride(caller, id).await?;

    Ok(ride.into())
}

pub async fn book(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(params): Json<BookParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api.book_seats(caller, id, params.seats).await?;

    Ok(ride.into())
}

pub async fn respond(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(params): Json<RespondParams>,
) -> Result<Json<Ride>, Error> {
    if params.rider_id.is_none() && params.rider_email.is_none() {
        return Err(validation_error("rider_id or rider_email is required"));
    }

    let rider = Identity {
        id: params.rider_id,
        email: params.rider_email.unwrap_or_default(),
    };

    let ride = api.respond_booking(caller, id, rider, params.response).await?;

    Ok(ride.into())
}

pub async fn cancel(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.cancel_ride(caller, id).await?;

    Ok(ride.into())
}

pub async fn complete(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.complete_ride(caller, id).await?;

    Ok(ride.into())
}

pub async fn record_payment(
    Extension(api): Extension<DynAPI>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(params): Json<PaymentParams>,
) -> Result<Json<Ride>, Error> {
    let ride = api.record_payment(caller, id, params.payment_status).await?;

    Ok(ride.into())
}
