// db/memorydb.rs
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::waitlistdb::{StoreError, WaitlistExt};
use crate::models::waitlistmodel::{NewWaitlistEntry, WaitlistEntry};

/// Process-local waitlist table. Entries keep insertion order, which
/// doubles as the tie-break for equal referral counts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<WaitlistEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait]
impl WaitlistExt for MemoryStore {
    async fn insert_waitlist_entry(
        &self,
        entry: NewWaitlistEntry,
    ) -> Result<WaitlistEntry, StoreError> {
        let mut entries = self.entries.lock().await;

        if entries.iter().any(|e| e.email == entry.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if entries.iter().any(|e| e.referral_code == entry.referral_code) {
            return Err(StoreError::DuplicateReferralCode);
        }

        let created = WaitlistEntry {
            id: Uuid::new_v4(),
            full_name: entry.full_name,
            email: entry.email,
            phone: entry.phone,
            state: entry.state,
            role: entry.role,
            referral_code: entry.referral_code,
            referral_count: Some(0),
            referred_by: entry.referred_by,
            created_at: Utc::now(),
        };
        entries.push(created.clone());

        Ok(created)
    }

    async fn find_entry_by_referral_code(
        &self,
        referral_code: &str,
    ) -> Result<Option<WaitlistEntry>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .find(|e| e.referral_code == referral_code)
            .cloned())
    }

    async fn get_entry(&self, entry_id: Uuid) -> Result<Option<WaitlistEntry>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries.iter().find(|e| e.id == entry_id).cloned())
    }

    async fn increment_referral_count(&self, entry_id: Uuid) -> Result<i32, StoreError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or(StoreError::NotFound(entry_id))?;

        let count = entry.referral_count.unwrap_or(0) + 1;
        entry.referral_count = Some(count);
        Ok(count)
    }

    async fn get_referral_count(&self, entry_id: Uuid) -> Result<Option<i32>, StoreError> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .find(|e| e.id == entry_id)
            .map(|e| e.referral_count.unwrap_or(0)))
    }

    async fn compare_and_set_referral_count(
        &self,
        entry_id: Uuid,
        expected: i32,
        new_count: i32,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) if entry.referral_count.unwrap_or(0) == expected => {
                entry.referral_count = Some(new_count);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_top_referrers(&self, limit: i64) -> Result<Vec<WaitlistEntry>, StoreError> {
        let mut ranked = self.entries.lock().await.clone();
        // stable sort keeps insertion order among equal counts
        ranked.sort_by(|a, b| b.referral_count.unwrap_or(0).cmp(&a.referral_count.unwrap_or(0)));
        ranked.truncate(usize::try_from(limit.max(0)).unwrap_or(0));
        Ok(ranked)
    }

    async fn count_entries_ahead(&self, referral_count: i32) -> Result<i64, StoreError> {
        let entries = self.entries.lock().await;
        let ahead = entries
            .iter()
            .filter(|e| e.referral_count.unwrap_or(0) > referral_count)
            .count();
        Ok(ahead as i64)
    }
}
