//! Mock implementations for testing
//!
//! These mocks enable controller tests without a real database.

use super::traits::CashbackStore;
use crate::db::{CashbackEntry, DbResult, StorageError};
use crate::menu::Bank;
use crate::session::{InMemorySessions, SessionError, SessionStore, UserId};
use crate::state_machine::DialogState;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

// ============================================================================
// Mock Cashback Store
// ============================================================================

/// In-memory cashback store with switchable failure
pub struct MockCashbackStore {
    entries: Mutex<BTreeMap<(Bank, String), f64>>,
    failing: AtomicBool,
}

#[allow(dead_code)]
impl MockCashbackStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail with [`StorageError::Closed`]
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn percentage(&self, bank: Bank, category: &str) -> Option<f64> {
        self.entries
            .lock()
            .unwrap()
            .get(&(bank, category.to_string()))
            .copied()
    }

    fn check(&self) -> DbResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }

    fn snapshot(&self) -> Vec<CashbackEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .zip(1..)
            .map(|(((bank, category), percentage), id)| CashbackEntry {
                id,
                bank: *bank,
                category: category.clone(),
                percentage: *percentage,
            })
            .collect()
    }
}

impl Default for MockCashbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CashbackStore for MockCashbackStore {
    async fn upsert(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<()> {
        self.check()?;
        self.entries
            .lock()
            .unwrap()
            .insert((bank, category.to_string()), percentage);
        Ok(())
    }

    async fn update_percentage(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<usize> {
        self.check()?;
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(&(bank, category.to_string())) {
            Some(value) => {
                *value = percentage;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, bank: Bank, category: &str) -> DbResult<usize> {
        self.check()?;
        let removed = self
            .entries
            .lock()
            .unwrap()
            .remove(&(bank, category.to_string()));
        Ok(usize::from(removed.is_some()))
    }

    async fn list_by_bank(&self, bank: Bank) -> DbResult<Vec<CashbackEntry>> {
        self.check()?;
        // BTreeMap order is (bank, category)
        Ok(self.snapshot().into_iter().filter(|e| e.bank == bank).collect())
    }

    async fn list_distinct_categories(&self) -> DbResult<Vec<String>> {
        self.check()?;
        let mut categories: Vec<String> = self.snapshot().into_iter().map(|e| e.category).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn find_one(&self, bank: Bank, category: &str) -> DbResult<Option<CashbackEntry>> {
        self.check()?;
        Ok(self
            .snapshot()
            .into_iter()
            .find(|e| e.bank == bank && e.category == category))
    }

    async fn list_by_category_ranked(&self, category: &str) -> DbResult<Vec<CashbackEntry>> {
        self.check()?;
        let mut entries: Vec<CashbackEntry> = self
            .snapshot()
            .into_iter()
            .filter(|e| e.category == category)
            .collect();
        entries.sort_by(|a, b| b.percentage.total_cmp(&a.percentage).then(a.bank.cmp(&b.bank)));
        Ok(entries)
    }
}

// ============================================================================
// Failing Session Store
// ============================================================================

/// Session backend that is always unavailable
pub struct FailingSessions;

#[async_trait]
impl SessionStore for FailingSessions {
    async fn get(&self, _user: UserId) -> Result<Option<DialogState>, SessionError> {
        Err(SessionError("backend unavailable".to_string()))
    }

    async fn set(&self, _user: UserId, _state: DialogState) -> Result<(), SessionError> {
        Err(SessionError("backend unavailable".to_string()))
    }

    async fn clear(&self, _user: UserId) -> Result<(), SessionError> {
        Err(SessionError("backend unavailable".to_string()))
    }
}

// ============================================================================
// Read-Only Session Store
// ============================================================================

/// Serves a preset state but rejects every update
pub struct ReadOnlySessions {
    inner: InMemorySessions,
}

impl ReadOnlySessions {
    pub async fn with_state(user: UserId, state: DialogState) -> Self {
        let inner = InMemorySessions::new();
        inner.set(user, state).await.unwrap();
        Self { inner }
    }
}

#[async_trait]
impl SessionStore for ReadOnlySessions {
    async fn get(&self, user: UserId) -> Result<Option<DialogState>, SessionError> {
        self.inner.get(user).await
    }

    async fn set(&self, _user: UserId, _state: DialogState) -> Result<(), SessionError> {
        Err(SessionError("session store is read-only".to_string()))
    }

    async fn clear(&self, _user: UserId) -> Result<(), SessionError> {
        Err(SessionError("session store is read-only".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_ranks_like_database() {
        let store = MockCashbackStore::new();
        store.upsert(Bank::Bank3, "Fuel", 2.0).await.unwrap();
        store.upsert(Bank::Bank1, "Fuel", 2.0).await.unwrap();
        store.upsert(Bank::Bank2, "Fuel", 4.0).await.unwrap();

        let banks: Vec<_> = store
            .list_by_category_ranked("Fuel")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.bank)
            .collect();
        assert_eq!(banks, vec![Bank::Bank2, Bank::Bank1, Bank::Bank3]);
    }

    #[tokio::test]
    async fn test_mock_failure_switch() {
        let store = MockCashbackStore::new();
        store.set_failing(true);
        assert!(store.list_distinct_categories().await.is_err());
        store.set_failing(false);
        assert_eq!(store.delete(Bank::Bank1, "x").await.unwrap(), 0);
    }
}
