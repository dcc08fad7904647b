//! Menu labels, bank identifiers and keyboard layouts
//!
//! Every user-visible button label lives here so the state machine only
//! deals with typed commands.

pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MANAGE_CASHBACK: &str = "📝 Manage cashback";
pub const LOOKUP_BY_CATEGORY: &str = "🔍 Cashback by category";
pub const ADD_CATEGORY: &str = "➕ Add category";
pub const VIEW_CATEGORIES: &str = "📋 View categories";
pub const EDIT_CATEGORY: &str = "✏️ Edit category";
pub const DELETE_CATEGORY: &str = "🗑️ Delete category";
pub const BACK: &str = "🔙 Back";

/// Prefix shown on bank buttons
const BANK_BUTTON_PREFIX: &str = "💳 ";

/// Category keyboards wrap after this many buttons per row
pub const CATEGORY_ROW_WIDTH: usize = 2;

/// The fixed set of tracked banks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bank {
    Bank1,
    Bank2,
    Bank3,
    Bank4,
}

impl Bank {
    pub const ALL: [Bank; 4] = [Bank::Bank1, Bank::Bank2, Bank::Bank3, Bank::Bank4];

    /// Identifier stored in the database and shown in messages
    pub fn as_str(self) -> &'static str {
        match self {
            Bank::Bank1 => "Bank1",
            Bank::Bank2 => "Bank2",
            Bank::Bank3 => "Bank3",
            Bank::Bank4 => "Bank4",
        }
    }

    /// Text of the bank's button in the bank-management menu
    pub fn button_label(self) -> String {
        format!("{BANK_BUTTON_PREFIX}{}", self.as_str())
    }

    /// Match either the button label or the bare bank name.
    pub fn from_label(text: &str) -> Option<Bank> {
        let name = text.strip_prefix(BANK_BUTTON_PREFIX).unwrap_or(text);
        name.parse().ok()
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown bank: {0}")]
pub struct UnknownBank(pub String);

impl FromStr for Bank {
    type Err = UnknownBank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bank::ALL
            .into_iter()
            .find(|bank| bank.as_str() == s)
            .ok_or_else(|| UnknownBank(s.to_string()))
    }
}

/// Suggested reply labels, arranged in rows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    fn from_rows(rows: &[&[&str]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|label| (*label).to_string()).collect())
                .collect(),
        }
    }

    /// Top-level menu
    pub fn main_menu() -> Self {
        Self::from_rows(&[&[MANAGE_CASHBACK], &[LOOKUP_BY_CATEGORY]])
    }

    /// Bank buttons two per row, then back
    pub fn bank_management() -> Self {
        let mut rows: Vec<Vec<String>> = Bank::ALL
            .chunks(2)
            .map(|pair| pair.iter().map(|bank| bank.button_label()).collect())
            .collect();
        rows.push(vec![BACK.to_string()]);
        Self { rows }
    }

    /// Actions available once a bank is selected
    pub fn bank_actions() -> Self {
        Self::from_rows(&[
            &[ADD_CATEGORY],
            &[VIEW_CATEGORIES],
            &[EDIT_CATEGORY],
            &[DELETE_CATEGORY],
            &[BACK],
        ])
    }

    pub fn back_only() -> Self {
        Self::from_rows(&[&[BACK]])
    }

    /// Dynamic category picker followed by a back row.
    pub fn categories<S: AsRef<str>>(categories: &[S]) -> Self {
        let mut rows: Vec<Vec<String>> = categories
            .chunks(CATEGORY_ROW_WIDTH)
            .map(|chunk| chunk.iter().map(|c| c.as_ref().to_string()).collect())
            .collect();
        rows.push(vec![BACK.to_string()]);
        Self { rows }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}
