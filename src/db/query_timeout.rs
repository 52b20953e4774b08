// Database query timeout protection
use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use super::waitlistdb::StoreError;

pub struct QueryTimeout;

impl QueryTimeout {
    /// Runs a query, giving up with `StoreError::Timeout` once `timeout_duration` elapses.
    pub async fn execute_with_timeout<F, T>(
        query_fn: F,
        timeout_duration: Duration,
    ) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(timeout_duration, query_fn).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(timeout_duration)),
        }
    }

    /// Default timeout for writes and ranked reads (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Short timeout for single-row lookups (2 seconds)
    pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);
}
