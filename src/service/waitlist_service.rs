use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    db::waitlistdb::{StoreError, WaitlistExt},
    dtos::waitlistdtos::{signup_error_message, JoinWaitlistDto},
    error::ErrorMessage,
    models::waitlistmodel::{LeaderboardRow, NewWaitlistEntry, ReferralStats},
    service::{
        error::ServiceError,
        referral::{generate_referral_code, generate_referral_link, mask_user_name},
    },
};

pub const LEADERBOARD_SIZE: i64 = 10;

const REFERRAL_CODE_ATTEMPTS: u32 = 3;
const COUNTER_FALLBACK_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SignupOutcome {
    pub entry_id: Uuid,
    pub referral_code: String,
    pub referral_link: String,
    pub referred_by: Option<Uuid>,
}

pub struct WaitlistService {
    store: Arc<dyn WaitlistExt>,
    app_url: String,
}

impl std::fmt::Debug for WaitlistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistService")
            .field("app_url", &self.app_url)
            .finish()
    }
}

impl WaitlistService {
    pub fn new(store: Arc<dyn WaitlistExt>, app_url: impl Into<String>) -> Self {
        Self {
            store,
            app_url: app_url.into(),
        }
    }

    /// Adds a signup to the waitlist. `link_referral_code` is the code the
    /// visitor arrived with; a code in the form body takes precedence.
    ///
    /// Only validation, duplicate-email and insert failures reach the caller.
    /// Referral attribution and counting are best effort.
    pub async fn join_waitlist(
        &self,
        form: JoinWaitlistDto,
        link_referral_code: Option<String>,
    ) -> Result<SignupOutcome, ServiceError> {
        let form = form.normalized();
        let referral_code = form.referral_code.clone().or_else(|| {
            link_referral_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
        });

        form.validate()
            .map_err(|e| ServiceError::Validation(signup_error_message(&e)))?;

        let role = form
            .waitlist_role()
            .ok_or_else(|| ServiceError::Validation(ErrorMessage::InvalidRole.to_string()))?;
        let state = form
            .canonical_state()
            .ok_or_else(|| ServiceError::Validation(ErrorMessage::InvalidState.to_string()))?;

        let referred_by = match referral_code.as_deref() {
            Some(code) => self.resolve_referrer(code).await,
            None => None,
        };

        let mut attempt = 0;
        let entry = loop {
            attempt += 1;

            let new_entry = NewWaitlistEntry {
                full_name: form.full_name.clone(),
                email: form.email.clone(),
                phone: form.phone.clone(),
                state: state.to_string(),
                role,
                referral_code: generate_referral_code(),
                referred_by,
            };

            match self.store.insert_waitlist_entry(new_entry).await {
                Ok(entry) => break entry,
                Err(StoreError::DuplicateEmail) => return Err(ServiceError::DuplicateEmail),
                Err(StoreError::DuplicateReferralCode) if attempt < REFERRAL_CODE_ATTEMPTS => {
                    tracing::warn!("Referral code collision on attempt {}, regenerating", attempt);
                }
                Err(e) => {
                    tracing::error!("Failed to insert waitlist entry: {}", e);
                    return Err(e.into());
                }
            }
        };

        tracing::info!("New waitlist entry {} ({})", entry.id, entry.role.to_str());

        if let Some(referrer_id) = referred_by {
            match self.credit_referrer(referrer_id).await {
                Ok(count) => tracing::info!(
                    "Referral successful: {} referred {} (referrer now has {})",
                    referrer_id,
                    entry.id,
                    count
                ),
                Err(e) => tracing::error!(
                    "Referral count for {} was not updated after signup {}: {}",
                    referrer_id,
                    entry.id,
                    e
                ),
            }
        }

        Ok(SignupOutcome {
            entry_id: entry.id,
            referral_link: generate_referral_link(&self.app_url, &entry.referral_code),
            referral_code: entry.referral_code,
            referred_by,
        })
    }

    async fn resolve_referrer(&self, code: &str) -> Option<Uuid> {
        match self.store.find_entry_by_referral_code(code).await {
            Ok(Some(referrer)) => Some(referrer.id),
            Ok(None) => {
                tracing::debug!("Referral code {} does not match any entry", code);
                None
            }
            Err(e) => {
                tracing::warn!("Referral lookup for {} failed, continuing without attribution: {}", code, e);
                None
            }
        }
    }

    /// Adds one to the referrer's count. The store's atomic increment is
    /// always tried first; only if it fails do we fall back to a conditional
    /// read-modify-write that retries when another writer got there first.
    pub async fn credit_referrer(&self, referrer_id: Uuid) -> Result<i32, ServiceError> {
        match self.store.increment_referral_count(referrer_id).await {
            Ok(count) => return Ok(count),
            Err(e) => tracing::warn!(
                "Atomic referral increment failed for {}, using conditional fallback: {}",
                referrer_id,
                e
            ),
        }

        for attempt in 1..=COUNTER_FALLBACK_ATTEMPTS {
            let current = self
                .store
                .get_referral_count(referrer_id)
                .await?
                .ok_or(ServiceError::EntryNotFound(referrer_id))?;

            if self
                .store
                .compare_and_set_referral_count(referrer_id, current, current + 1)
                .await?
            {
                return Ok(current + 1);
            }

            tracing::debug!("Referral count for {} changed underneath attempt {}", referrer_id, attempt);
        }

        Err(ServiceError::CounterContention {
            entry_id: referrer_id,
            attempts: COUNTER_FALLBACK_ATTEMPTS,
        })
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardRow>, ServiceError> {
        let entries = self.store.list_top_referrers(LEADERBOARD_SIZE).await?;

        Ok(entries
            .into_iter()
            .map(|entry| LeaderboardRow {
                masked_name: mask_user_name(&entry.full_name),
                full_name: entry.full_name,
                role: entry.role,
                referral_count: entry.referral_count.unwrap_or(0),
            })
            .collect())
    }

    pub async fn is_valid_referral_code(&self, code: &str) -> bool {
        if code.trim().is_empty() {
            return false;
        }

        match self.store.find_entry_by_referral_code(code).await {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                tracing::warn!("Referral code validation failed for {}: {}", code, e);
                false
            }
        }
    }

    pub async fn referral_stats(&self, entry_id: Uuid) -> Result<ReferralStats, ServiceError> {
        let entry = self
            .store
            .get_entry(entry_id)
            .await?
            .ok_or(ServiceError::EntryNotFound(entry_id))?;

        let referral_count = entry.referral_count.unwrap_or(0);

        let rank = match self.store.count_entries_ahead(referral_count).await {
            Ok(ahead) => Some(ahead + 1),
            Err(e) => {
                tracing::warn!("Could not rank entry {}: {}", entry_id, e);
                None
            }
        };

        Ok(ReferralStats {
            referral_count,
            referral_link: generate_referral_link(&self.app_url, &entry.referral_code),
            referral_code: entry.referral_code,
            rank,
        })
    }
}
