use super::helpers::{fetch_driver_for_update, update_driver};
use super::Engine;

use async_trait::async_trait;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::DriverAPI,
    auth::Caller,
    db::with_retry,
    entities::Driver,
    error::{conflict_error, not_found_error, Error},
};

#[async_trait]
impl DriverAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_driver(&self, caller: Caller, name: String) -> Result<Driver, Error> {
        let driver = Driver::new(caller.id, name, caller.email)?;

        let mut conn = with_retry(|| self.pool.acquire()).await?;

        let result = conn
            .execute(
                sqlx::query(
                    "INSERT INTO drivers (id, data) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
                )
                .bind(&driver.id)
                .bind(Json(&driver)),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(conflict_error("driver profile already exists"));
        }

        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    async fn find_driver(&self, id: Uuid) -> Result<Driver, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;

        let Json(driver): Json<Driver> = conn
            .fetch_optional(sqlx::query("SELECT data FROM drivers WHERE id = $1").bind(&id))
            .await?
            .ok_or_else(not_found_error)?
            .try_get("data")?;

        Ok(driver)
    }

    #[tracing::instrument(skip(self))]
    async fn rate_driver(&self, caller: Caller, id: Uuid, rating: f64) -> Result<Driver, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;
        let mut tx = conn.begin().await?;

        let mut driver = fetch_driver_for_update(&mut tx, &id).await?;

        driver.rate(rating)?;

        update_driver(&mut tx, &driver).await?;
        tx.commit().await?;

        Ok(driver)
    }
}
