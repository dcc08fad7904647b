//! Classification of raw user text into commands

use super::DialogState;
use crate::menu::{self, Bank};

/// Fixed menu buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ManageCashback,
    LookupByCategory,
    AddCategory,
    ViewCategories,
    EditCategory,
    DeleteCategory,
    Back,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::ManageCashback,
        MenuAction::LookupByCategory,
        MenuAction::AddCategory,
        MenuAction::ViewCategories,
        MenuAction::EditCategory,
        MenuAction::DeleteCategory,
        MenuAction::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::ManageCashback => menu::MANAGE_CASHBACK,
            MenuAction::LookupByCategory => menu::LOOKUP_BY_CATEGORY,
            MenuAction::AddCategory => menu::ADD_CATEGORY,
            MenuAction::ViewCategories => menu::VIEW_CATEGORIES,
            MenuAction::EditCategory => menu::EDIT_CATEGORY,
            MenuAction::DeleteCategory => menu::DELETE_CATEGORY,
            MenuAction::Back => menu::BACK,
        }
    }

    pub fn from_label(text: &str) -> Option<MenuAction> {
        MenuAction::ALL.into_iter().find(|action| action.label() == text)
    }
}

/// What an inbound message asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `/start`: fresh session
    Start,
    Menu(MenuAction),
    ChooseBank(Bank),
    /// Free text typed while an input or selection is pending
    Input(String),
}

pub const START_COMMAND: &str = "/start";

/// Map raw text to a command given the user's current state.
///
/// Returns `None` when the text means nothing in this state and should be
/// ignored silently. Menu labels always win over free text; bank labels are
/// only recognised while a bank is being chosen.
pub fn classify(text: &str, state: Option<&DialogState>) -> Option<Command> {
    if text == START_COMMAND {
        return Some(Command::Start);
    }
    if let Some(action) = MenuAction::from_label(text) {
        return Some(Command::Menu(action));
    }

    match state {
        Some(DialogState::SelectingBankForManagement) => {
            Bank::from_label(text).map(Command::ChooseBank)
        }
        // a stray bank button is never a category name or a percentage
        _ if is_bank_button(text) => None,
        Some(state) if state.accepts_free_text() && !text.trim().is_empty() => {
            Some(Command::Input(text.to_string()))
        }
        _ => None,
    }
}

fn is_bank_button(text: &str) -> bool {
    Bank::ALL.iter().any(|bank| bank.button_label() == text)
}
