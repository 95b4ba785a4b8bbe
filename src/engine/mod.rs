mod driver_api;
mod helpers;
mod ride_api;

use sqlx::{Executor, Pool, Postgres};

use crate::{api::API, db::with_retry, error::Error};

type Database = Postgres;

pub struct Engine {
    pool: Pool<Database>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub async fn new(pool: Pool<Database>) -> Result<Self, Error> {
        // ride service (document store)
        pool.execute(
            "CREATE TABLE IF NOT EXISTS rides (id UUID PRIMARY KEY, status VARCHAR NOT NULL, departs_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)",
        )
        .await?;
        pool.execute(
            "CREATE INDEX IF NOT EXISTS rides_status_departs_at ON rides (status, departs_at)",
        )
        .await?;

        // driver service (document store)
        pool.execute("CREATE TABLE IF NOT EXISTS drivers (id UUID PRIMARY KEY, data JSONB NOT NULL)")
            .await?;

        Ok(Self { pool })
    }

    /// One sweep pass: every non-terminal ride whose scheduled instant is
    /// strictly in the past is flipped to `completed`, column and document
    /// together, in a single bulk conditional update. The filter excludes
    /// already-completed rides, so running the sweep twice over unchanged
    /// data touches zero rows the second time.
    #[tracing::instrument(skip(self))]
    pub async fn sweep_elapsed_rides(&self) -> Result<u64, Error> {
        let mut conn = with_retry(|| self.pool.acquire()).await?;

        let result = conn
            .execute(sqlx::query(
                "UPDATE rides \
                 SET status = 'completed', \
                     data = jsonb_set(data, '{status}', '{\"name\": \"completed\"}'::jsonb) \
                 WHERE status IN ('pending', 'scheduled') AND departs_at < now()",
            ))
            .await?;

        Ok(result.rows_affected())
    }
}

impl API for Engine {}
