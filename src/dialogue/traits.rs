//! Trait abstractions for dialogue I/O
//!
//! These traits enable testing the controller with mock implementations.

use crate::db::{CashbackEntry, Database, DbResult};
use crate::menu::Bank;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable cashback records
#[async_trait]
pub trait CashbackStore: Send + Sync {
    /// Insert, or replace the percentage of an existing pair
    async fn upsert(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<()>;

    /// Returns rows affected; zero when the pair is gone
    async fn update_percentage(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<usize>;

    async fn delete(&self, bank: Bank, category: &str) -> DbResult<usize>;

    async fn list_by_bank(&self, bank: Bank) -> DbResult<Vec<CashbackEntry>>;

    async fn list_distinct_categories(&self) -> DbResult<Vec<String>>;

    async fn find_one(&self, bank: Bank, category: &str) -> DbResult<Option<CashbackEntry>>;

    /// Best rate first
    async fn list_by_category_ranked(&self, category: &str) -> DbResult<Vec<CashbackEntry>>;
}

#[async_trait]
impl<T: CashbackStore + ?Sized> CashbackStore for Arc<T> {
    async fn upsert(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<()> {
        (**self).upsert(bank, category, percentage).await
    }

    async fn update_percentage(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<usize> {
        (**self).update_percentage(bank, category, percentage).await
    }

    async fn delete(&self, bank: Bank, category: &str) -> DbResult<usize> {
        (**self).delete(bank, category).await
    }

    async fn list_by_bank(&self, bank: Bank) -> DbResult<Vec<CashbackEntry>> {
        (**self).list_by_bank(bank).await
    }

    async fn list_distinct_categories(&self) -> DbResult<Vec<String>> {
        (**self).list_distinct_categories().await
    }

    async fn find_one(&self, bank: Bank, category: &str) -> DbResult<Option<CashbackEntry>> {
        (**self).find_one(bank, category).await
    }

    async fn list_by_category_ranked(&self, category: &str) -> DbResult<Vec<CashbackEntry>> {
        (**self).list_by_category_ranked(category).await
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

#[async_trait]
impl CashbackStore for Database {
    async fn upsert(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<()> {
        Database::upsert(self, bank, category, percentage)
    }

    async fn update_percentage(&self, bank: Bank, category: &str, percentage: f64) -> DbResult<usize> {
        Database::update_percentage(self, bank, category, percentage)
    }

    async fn delete(&self, bank: Bank, category: &str) -> DbResult<usize> {
        Database::delete(self, bank, category)
    }

    async fn list_by_bank(&self, bank: Bank) -> DbResult<Vec<CashbackEntry>> {
        Database::list_by_bank(self, bank)
    }

    async fn list_distinct_categories(&self) -> DbResult<Vec<String>> {
        Database::list_distinct_categories(self)
    }

    async fn find_one(&self, bank: Bank, category: &str) -> DbResult<Option<CashbackEntry>> {
        Database::find_one(self, bank, category)
    }

    async fn list_by_category_ranked(&self, category: &str) -> DbResult<Vec<CashbackEntry>> {
        Database::list_by_category_ranked(self, category)
    }
}
