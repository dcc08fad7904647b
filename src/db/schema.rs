//! Database schema and types

use crate::menu::Bank;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS cashback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bank TEXT NOT NULL,
    category TEXT NOT NULL,
    percentage REAL NOT NULL,
    UNIQUE(bank, category)
);

CREATE INDEX IF NOT EXISTS idx_cashback_category ON cashback(category);
";

/// One cashback rate for a (bank, category) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashbackEntry {
    pub id: i64,
    pub bank: Bank,
    pub category: String,
    pub percentage: f64,
}

impl ToSql for Bank {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Bank {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
