use super::Database;

use sqlx::{types::Json, Executor, Row, Transaction};
use uuid::Uuid;

use crate::{
    entities::{Driver, Ride},
    error::{not_found_error, Error},
};

#[tracing::instrument(skip(tx))]
pub async fn fetch_ride_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Ride, Error> {
    let Json(ride): Json<Ride> = tx
        .fetch_optional(sqlx::query("SELECT data FROM rides WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(not_found_error)?
        .try_get("data")?;

    Ok(ride)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_driver_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Driver, Error> {
    let Json(driver): Json<Driver> = tx
        .fetch_optional(sqlx::query("SELECT data FROM drivers WHERE id = $1 FOR UPDATE").bind(id))
        .await?
        .ok_or_else(not_found_error)?
        .try_get("data")?;

    Ok(driver)
}

#[tracing::instrument(skip(tx))]
pub async fn insert_ride(tx: &mut Transaction<'_, Database>, ride: &Ride) -> Result<(), Error> {
    tx.execute(
        sqlx::query("INSERT INTO rides (id, status, departs_at, data) VALUES ($1, $2, $3, $4)")
            .bind(&ride.id)
            .bind(ride.status.name())
            .bind(ride.departs_at())
            .bind(Json(ride)),
    )
    .await?;

    Ok(())
}

/// The denormalized `status` and `departs_at` columns exist only so the
/// search and sweep queries can filter without unpacking every document;
/// they are rewritten on every update to stay consistent with `data`.
#[tracing::instrument(skip(tx))]
pub async fn update_ride(tx: &mut Transaction<'_, Database>, ride: &Ride) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE rides SET status = $2, departs_at = $3, data = $4 WHERE id = $1")
            .bind(&ride.id)
            .bind(ride.status.name())
            .bind(ride.departs_at())
            .bind(Json(ride)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn update_driver(
    tx: &mut Transaction<'_, Database>,
    driver: &Driver,
) -> Result<(), Error> {
    tx.execute(
        sqlx::query("UPDATE drivers SET data = $2 WHERE id = $1")
            .bind(&driver.id)
            .bind(Json(driver)),
    )
    .await?;

    Ok(())
}
