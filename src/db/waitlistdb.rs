// db/waitlistdb.rs
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::{db::DBClient, query_timeout::QueryTimeout};
use crate::models::waitlistmodel::{NewWaitlistEntry, WaitlistEntry};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email is already registered")]
    DuplicateEmail,

    #[error("referral code is already taken")]
    DuplicateReferralCode,

    #[error("waitlist entry {0} not found")]
    NotFound(Uuid),

    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let constraint = err
            .as_database_error()
            .filter(|db_err| db_err.is_unique_violation())
            .and_then(|db_err| db_err.constraint().map(str::to_owned));

        if matches!(err, sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) {
            return StoreError::Unavailable(err.to_string());
        }

        match constraint.as_deref() {
            Some(name) if name.contains("referral_code") => StoreError::DuplicateReferralCode,
            Some(name) if name.contains("email") => StoreError::DuplicateEmail,
            _ => StoreError::Database(err),
        }
    }
}

/// Storage operations behind the waitlist and referral flows.
#[async_trait]
pub trait WaitlistExt: Send + Sync {
    async fn insert_waitlist_entry(
        &self,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, StoreError>;

    async fn find_entry_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<WaitlistEntry>, StoreError>;

    async fn get_entry(&self, entry_id: Uuid) -> Result<Option<WaitlistEntry>, StoreError>;

    /// Single-statement increment. Returns the new count.
    async fn increment_referral_count(&self, entry_id: Uuid) -> Result<i32, StoreError>;

    /// `None` when the entry does not exist; a null count reads as zero.
    async fn get_referral_count(&self, entry_id: Uuid) -> Result<Option<i32>, StoreError>;

    /// Writes `new_count` only if the stored count still equals `expected`.
    async fn compare_and_set_referral_count(
        &self,
        entry_id: Uuid,
        expected: i32,
        new_count: i32,
    ) -> Result<bool, StoreError>;

    async fn list_top_referrers(&self, limit: i64) -> Result<Vec<WaitlistEntry>, StoreError>;

    /// Number of entries with a strictly greater referral count.
    async fn count_entries_ahead(&self, referral_count: i32) -> Result<i64, StoreError>;
}

#[async_trait]
impl WaitlistExt for DBClient {
    async fn insert_waitlist_entry(
        &self,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, StoreError> {
        QueryTimeout::execute_with_timeout(
            sqlx::query_as::<_, WaitlistEntry>(
                r#"
                INSERT INTO waitlist (full_name, email, phone, state, role, referral_code, referral_count, referred_by)
                VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
                RETURNING
                    id, full_name, email, phone, state, role,
                    referral_code, referral_count, referred_by, created_at
                "#,
            )
            .bind(entry.full_name)
            .bind(entry.email)
            .bind(entry.phone)
            .bind(entry.state)
            .bind(entry.role)
            .bind(entry.referral_code)
            .bind(entry.referred_by)
            .fetch_one(&self.pool),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await
    }

    async fn find_entry_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<WaitlistEntry>, StoreError> {
        QueryTimeout::execute_with_timeout(
            sqlx::query_as::<_, WaitlistEntry>(
                r#"
                SELECT
                    id, full_name, email, phone, state, role,
                    referral_code, referral_count, referred_by, created_at
                FROM waitlist
                WHERE referral_code = $1
                "#,
            )
            .bind(referral_code)
            .fetch_optional(&self.pool),
            QueryTimeout::LOOKUP_TIMEOUT,
        )
        .await
    }

    async fn get_entry(&self, entry_id: Uuid) -> Result<Option<WaitlistEntry>, StoreError> {
        QueryTimeout::execute_with_timeout(
            sqlx::query_as::<_, WaitlistEntry>(
                r#"
                SELECT
                    id, full_name, email, phone, state, role,
                    referral_code, referral_count, referred_by, created_at
                FROM waitlist
                WHERE id = $1
                "#,
            )
            .bind(entry_id)
            .fetch_optional(&self.pool),
            QueryTimeout::LOOKUP_TIMEOUT,
        )
        .await
    }

    async fn increment_referral_count(&self, entry_id: Uuid) -> Result<i32, StoreError> {
        let count = QueryTimeout::execute_with_timeout(
            sqlx::query_scalar::<_, i32>(
                r#"
                UPDATE waitlist
                SET referral_count = COALESCE(referral_count, 0) + 1
                WHERE id = $1
                RETURNING COALESCE(referral_count, 0)
                "#,
            )
            .bind(entry_id)
            .fetch_optional(&self.pool),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await?;

        count.ok_or(StoreError::NotFound(entry_id))
    }

    async fn get_referral_count(&self, entry_id: Uuid) -> Result<Option<i32>, StoreError> {
        let count = QueryTimeout::execute_with_timeout(
            sqlx::query_scalar::<_, Option<i32>>(
                "SELECT referral_count FROM waitlist WHERE id = $1",
            )
            .bind(entry_id)
            .fetch_optional(&self.pool),
            QueryTimeout::LOOKUP_TIMEOUT,
        )
        .await?;

        Ok(count.map(|count| count.unwrap_or(0)))
    }

    async fn compare_and_set_referral_count(
        &self,
        entry_id: Uuid,
        expected: i32,
        new_count: i32,
    ) -> Result<bool, StoreError> {
        let result = QueryTimeout::execute_with_timeout(
            sqlx::query(
                r#"
                UPDATE waitlist
                SET referral_count = $3
                WHERE id = $1 AND COALESCE(referral_count, 0) = $2
                "#,
            )
            .bind(entry_id)
            .bind(expected)
            .bind(new_count)
            .execute(&self.pool),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_top_referrers(&self, limit: i64) -> Result<Vec<WaitlistEntry>, StoreError> {
        QueryTimeout::execute_with_timeout(
            sqlx::query_as::<_, WaitlistEntry>(
                r#"
                SELECT
                    id, full_name, email, phone, state, role,
                    referral_code, referral_count, referred_by, created_at
                FROM waitlist
                ORDER BY COALESCE(referral_count, 0) DESC, created_at ASC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await
    }

    async fn count_entries_ahead(&self, referral_count: i32) -> Result<i64, StoreError> {
        QueryTimeout::execute_with_timeout(
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM waitlist WHERE COALESCE(referral_count, 0) > $1",
            )
            .bind(referral_count)
            .fetch_one(&self.pool),
            QueryTimeout::DEFAULT_TIMEOUT,
        )
        .await
    }
}
