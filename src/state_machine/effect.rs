//! Effects produced by state transitions

use crate::menu::{Bank, Keyboard};

/// Outbound chat message
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Replaces the user's reply keyboard when present
    pub keyboard: Option<Keyboard>,
}

/// Why a bank's categories are being listed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankListing {
    View,
    Edit,
    Delete,
}

/// Failure notice family for a store call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Read,
    Save,
    Update,
    Delete,
}

/// A call into the cashback store. Its result comes back as an event.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    Upsert {
        bank: Bank,
        category: String,
        percentage: f64,
    },
    UpdatePercentage {
        bank: Bank,
        category: String,
        percentage: f64,
    },
    Delete {
        bank: Bank,
        category: String,
    },
    ListByBank {
        bank: Bank,
        listing: BankListing,
    },
    ListDistinctCategories,
    FindOne {
        bank: Bank,
        category: String,
    },
    ListByCategoryRanked {
        category: String,
    },
}

impl StoreRequest {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreRequest::Upsert { .. } => StoreOp::Save,
            StoreRequest::UpdatePercentage { .. } => StoreOp::Update,
            StoreRequest::Delete { .. } => StoreOp::Delete,
            StoreRequest::ListByBank { .. }
            | StoreRequest::ListDistinctCategories
            | StoreRequest::FindOne { .. }
            | StoreRequest::ListByCategoryRanked { .. } => StoreOp::Read,
        }
    }

    pub fn is_write(&self) -> bool {
        self.op() != StoreOp::Read
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Reply(Reply),
    Store(StoreRequest),
}

impl Effect {
    pub fn reply(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Reply(Reply {
            text: text.into(),
            keyboard: Some(keyboard),
        })
    }

    /// Reply that leaves the current keyboard in place
    pub fn text(text: impl Into<String>) -> Self {
        Effect::Reply(Reply {
            text: text.into(),
            keyboard: None,
        })
    }
}
