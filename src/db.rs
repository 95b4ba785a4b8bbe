use core::future::Future;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

pub struct PgPool(pub Pool<Postgres>);

impl PgPool {
    #[tracing::instrument(skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self(pool))
    }
}

/// Retries `op` once when it fails with a transient storage error.
///
/// Only connection-class failures qualify; every other error is surfaced
/// immediately so callers never re-run an operation that was rejected for
/// application reasons.
pub async fn with_retry<T, F, Fut>(op: F) -> Result<T, sqlx::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match op().await {
        Err(err) if is_transient(&err) => {
            tracing::warn!(?err, "transient storage error, retrying once");
            op().await
        }
        other => other,
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn retries_transient_failures_once() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, sqlx::Error> = tokio_test::block_on(with_retry(|| {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(sqlx::Error::PoolTimedOut)
                } else {
                    Ok(7)
                }
            }
        }));

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn gives_up_after_second_transient_failure() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, sqlx::Error> = tokio_test::block_on(with_retry(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::PoolTimedOut) }
        }));

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn does_not_retry_application_errors() {
        let attempts = AtomicU32::new(0);

        let result: Result<u32, sqlx::Error> = tokio_test::block_on(with_retry(|| {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::RowNotFound) }
        }));

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
