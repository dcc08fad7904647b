//! Dialogue state types

use crate::menu::Bank;
use serde::{Deserialize, Serialize};

/// Where a user is in the dialogue.
///
/// The top level has no variant: it is represented by the absence of a
/// stored state. Each variant carries exactly the context it needs, so a
/// bank is always present once one has been chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogState {
    SelectingBankForManagement,
    BankSelected { bank: Bank },
    EnteringCategoryName { bank: Bank },
    EnteringPercentage { bank: Bank, category: String },
    SelectingCategoryToEdit { bank: Bank },
    EnteringNewPercentage { bank: Bank, category: String },
    SelectingCategoryToDelete { bank: Bank },
    SelectingCategoryForView,
}

impl DialogState {
    /// Stable snake_case name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            DialogState::SelectingBankForManagement => "selecting_bank_for_management",
            DialogState::BankSelected { .. } => "bank_selected",
            DialogState::EnteringCategoryName { .. } => "entering_category_name",
            DialogState::EnteringPercentage { .. } => "entering_percentage",
            DialogState::SelectingCategoryToEdit { .. } => "selecting_category_to_edit",
            DialogState::EnteringNewPercentage { .. } => "entering_new_percentage",
            DialogState::SelectingCategoryToDelete { .. } => "selecting_category_to_delete",
            DialogState::SelectingCategoryForView => "selecting_category_for_view",
        }
    }

    /// Selected bank, if any
    pub fn bank(&self) -> Option<Bank> {
        match self {
            DialogState::BankSelected { bank }
            | DialogState::EnteringCategoryName { bank }
            | DialogState::EnteringPercentage { bank, .. }
            | DialogState::SelectingCategoryToEdit { bank }
            | DialogState::EnteringNewPercentage { bank, .. }
            | DialogState::SelectingCategoryToDelete { bank } => Some(*bank),
            DialogState::SelectingBankForManagement | DialogState::SelectingCategoryForView => None,
        }
    }

    /// Pending category, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            DialogState::EnteringPercentage { category, .. }
            | DialogState::EnteringNewPercentage { category, .. } => Some(category),
            _ => None,
        }
    }

    /// States in which unlabelled text is meaningful input
    pub fn accepts_free_text(&self) -> bool {
        !matches!(
            self,
            DialogState::SelectingBankForManagement | DialogState::BankSelected { .. }
        )
    }

    /// Target of the back button. `None` means the top level.
    pub fn back_target(&self) -> Option<DialogState> {
        match self {
            DialogState::SelectingBankForManagement | DialogState::SelectingCategoryForView => None,
            DialogState::BankSelected { .. } => Some(DialogState::SelectingBankForManagement),
            DialogState::EnteringCategoryName { bank }
            | DialogState::EnteringPercentage { bank, .. }
            | DialogState::SelectingCategoryToEdit { bank }
            | DialogState::EnteringNewPercentage { bank, .. }
            | DialogState::SelectingCategoryToDelete { bank } => {
                Some(DialogState::BankSelected { bank: *bank })
            }
        }
    }
}
