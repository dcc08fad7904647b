//! Events that drive the dialogue

use super::command::Command;
use super::effect::{BankListing, StoreOp};
use crate::db::CashbackEntry;
use crate::menu::Bank;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Classified user message
    Command(Command),
    /// A store request finished
    StoreCompleted(StoreOutcome),
    /// A store request failed; the user gets a generic notice
    StoreFailed { op: StoreOp },
}

/// Result of a store request, with the request context echoed back
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome {
    Upserted {
        bank: Bank,
        category: String,
        percentage: f64,
    },
    Updated {
        bank: Bank,
        category: String,
        percentage: f64,
        rows: usize,
    },
    Deleted {
        bank: Bank,
        category: String,
    },
    BankListed {
        bank: Bank,
        listing: BankListing,
        entries: Vec<CashbackEntry>,
    },
    CategoriesListed {
        categories: Vec<String>,
    },
    EntryLookedUp {
        bank: Bank,
        category: String,
        entry: Option<CashbackEntry>,
    },
    Ranked {
        category: String,
        entries: Vec<CashbackEntry>,
    },
}
