//! Pure state transition function
//!
//! Given the current state and an event, decide the next state and the
//! effects to run. No I/O happens here: store calls are requested as
//! effects and their results come back as [`Event::StoreCompleted`] or
//! [`Event::StoreFailed`]. State only advances once a write succeeded.

use super::command::{Command, MenuAction};
use super::effect::{BankListing, Effect, StoreOp, StoreRequest};
use super::event::{Event, StoreOutcome};
use super::DialogState;
use crate::db::CashbackEntry;
use crate::menu::{text, Bank, Keyboard};
use thiserror::Error;

/// What happens to the stored state
#[derive(Debug, Clone, PartialEq)]
pub enum NextState {
    Keep,
    Set(DialogState),
    /// Back to the top level
    Clear,
}

/// Result of a state transition
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    pub next: NextState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn keep() -> Self {
        Self {
            next: NextState::Keep,
            effects: vec![],
        }
    }

    pub fn set(state: DialogState) -> Self {
        Self {
            next: NextState::Set(state),
            effects: vec![],
        }
    }

    pub fn clear() -> Self {
        Self {
            next: NextState::Clear,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// True when the event had no meaning in the current state
    pub fn is_ignored(&self) -> bool {
        self.next == NextState::Keep && self.effects.is_empty()
    }
}

/// Rejected percentage input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("not a number")]
    NotANumber,
    #[error("{0} is outside 0..=100")]
    OutOfRange(f64),
}

/// Parse a percentage in `[0, 100]`. Accepts a decimal comma and one trailing `%`.
pub fn parse_percentage(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let normalized = number.replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| ValidationError::NotANumber)?;
    if !value.is_finite() {
        return Err(ValidationError::NotANumber);
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange(value));
    }
    // -0 would render as "-0%"
    Ok(value + 0.0)
}

/// Pure transition function
pub fn transition(state: Option<&DialogState>, event: Event) -> TransitionResult {
    match event {
        Event::Command(command) => on_command(state, command),
        Event::StoreCompleted(outcome) => on_store_outcome(outcome),
        Event::StoreFailed { op } => {
            TransitionResult::keep().with_effect(Effect::text(failure_notice(op)))
        }
    }
}

fn on_command(state: Option<&DialogState>, command: Command) -> TransitionResult {
    match (state, command) {
        // ============================================================
        // Available everywhere
        // ============================================================
        (_, Command::Start) => {
            TransitionResult::clear().with_effect(Effect::reply(text::WELCOME, Keyboard::main_menu()))
        }

        (_, Command::Menu(MenuAction::ManageCashback)) => {
            TransitionResult::set(DialogState::SelectingBankForManagement)
                .with_effect(Effect::reply(text::CHOOSE_BANK, Keyboard::bank_management()))
        }

        (_, Command::Menu(MenuAction::LookupByCategory)) => {
            TransitionResult::keep().with_effect(Effect::Store(StoreRequest::ListDistinctCategories))
        }

        (state, Command::Menu(MenuAction::Back)) => back(state),

        // ============================================================
        // Bank management
        // ============================================================
        (Some(DialogState::SelectingBankForManagement), Command::ChooseBank(bank)) => {
            show_bank_actions(bank, text::bank_selected(bank))
        }

        (Some(DialogState::BankSelected { bank }), Command::Menu(MenuAction::AddCategory)) => {
            TransitionResult::set(DialogState::EnteringCategoryName { bank: *bank })
                .with_effect(Effect::reply(text::ENTER_CATEGORY_NAME, Keyboard::back_only()))
        }

        (Some(DialogState::BankSelected { bank }), Command::Menu(action)) => {
            let listing = match action {
                MenuAction::ViewCategories => BankListing::View,
                MenuAction::EditCategory => BankListing::Edit,
                MenuAction::DeleteCategory => BankListing::Delete,
                _ => return TransitionResult::keep(),
            };
            TransitionResult::keep().with_effect(Effect::Store(StoreRequest::ListByBank {
                bank: *bank,
                listing,
            }))
        }

        // ============================================================
        // Free-text input
        // ============================================================
        (Some(DialogState::EnteringCategoryName { bank }), Command::Input(category)) => {
            TransitionResult::set(DialogState::EnteringPercentage {
                bank: *bank,
                category: category.clone(),
            })
            .with_effect(Effect::reply(
                text::enter_percentage(*bank, &category),
                Keyboard::back_only(),
            ))
        }

        (Some(DialogState::EnteringPercentage { bank, category }), Command::Input(input)) => {
            match parse_percentage(&input) {
                Ok(percentage) => TransitionResult::keep().with_effect(Effect::Store(StoreRequest::Upsert {
                    bank: *bank,
                    category: category.clone(),
                    percentage,
                })),
                Err(_) => reprompt_percentage(),
            }
        }

        (Some(DialogState::SelectingCategoryToEdit { bank }), Command::Input(category)) => {
            TransitionResult::keep().with_effect(Effect::Store(StoreRequest::FindOne {
                bank: *bank,
                category,
            }))
        }

        (Some(DialogState::EnteringNewPercentage { bank, category }), Command::Input(input)) => {
            match parse_percentage(&input) {
                Ok(percentage) => {
                    TransitionResult::keep().with_effect(Effect::Store(StoreRequest::UpdatePercentage {
                        bank: *bank,
                        category: category.clone(),
                        percentage,
                    }))
                }
                Err(_) => reprompt_percentage(),
            }
        }

        (Some(DialogState::SelectingCategoryToDelete { bank }), Command::Input(category)) => {
            TransitionResult::keep().with_effect(Effect::Store(StoreRequest::Delete {
                bank: *bank,
                category,
            }))
        }

        (Some(DialogState::SelectingCategoryForView), Command::Input(category)) => {
            TransitionResult::keep()
                .with_effect(Effect::Store(StoreRequest::ListByCategoryRanked { category }))
        }

        // ============================================================
        // Everything else is ignored
        // ============================================================
        _ => TransitionResult::keep(),
    }
}

fn on_store_outcome(outcome: StoreOutcome) -> TransitionResult {
    match outcome {
        StoreOutcome::Upserted {
            bank,
            category,
            percentage,
        } => confirm_and_return(bank, text::added(bank, &category, percentage)),

        StoreOutcome::Updated {
            bank,
            category,
            percentage,
            ..
        } => confirm_and_return(bank, text::updated(bank, &category, percentage)),

        StoreOutcome::Deleted { bank, category } => {
            confirm_and_return(bank, text::deleted(bank, &category))
        }

        StoreOutcome::BankListed {
            bank,
            listing,
            entries,
        } => on_bank_listed(bank, listing, &entries),

        StoreOutcome::CategoriesListed { categories } if categories.is_empty() => {
            TransitionResult::keep().with_effect(Effect::text(text::NO_CATEGORIES))
        }

        StoreOutcome::CategoriesListed { categories } => {
            TransitionResult::set(DialogState::SelectingCategoryForView).with_effect(Effect::reply(
                text::CHOOSE_CATEGORY_TO_VIEW,
                Keyboard::categories(&categories),
            ))
        }

        StoreOutcome::EntryLookedUp { entry: None, .. } => {
            TransitionResult::keep().with_effect(Effect::text(text::CATEGORY_NOT_FOUND))
        }

        StoreOutcome::EntryLookedUp {
            bank,
            category,
            entry: Some(entry),
        } => TransitionResult::set(DialogState::EnteringNewPercentage {
            bank,
            category: category.clone(),
        })
        .with_effect(Effect::reply(
            text::enter_new_percentage(&category, entry.percentage),
            Keyboard::back_only(),
        )),

        StoreOutcome::Ranked { category, entries } if entries.is_empty() => {
            TransitionResult::keep().with_effect(Effect::text(text::not_configured(&category)))
        }

        StoreOutcome::Ranked { category, entries } => {
            TransitionResult::keep().with_effect(Effect::text(text::ranking(&category, &entries)))
        }
    }
}

fn on_bank_listed(bank: Bank, listing: BankListing, entries: &[CashbackEntry]) -> TransitionResult {
    if entries.is_empty() {
        let message = match listing {
            BankListing::View => text::bank_empty(bank),
            BankListing::Edit => text::nothing_to_edit(bank),
            BankListing::Delete => text::nothing_to_delete(bank),
        };
        return TransitionResult::keep().with_effect(Effect::text(message));
    }

    let categories: Vec<&str> = entries.iter().map(|e| e.category.as_str()).collect();
    match listing {
        BankListing::View => {
            TransitionResult::keep().with_effect(Effect::text(text::bank_listing(bank, entries)))
        }
        BankListing::Edit => TransitionResult::set(DialogState::SelectingCategoryToEdit { bank })
            .with_effect(Effect::reply(
                text::CHOOSE_CATEGORY_TO_EDIT,
                Keyboard::categories(&categories),
            )),
        BankListing::Delete => TransitionResult::set(DialogState::SelectingCategoryToDelete { bank })
            .with_effect(Effect::reply(
                text::CHOOSE_CATEGORY_TO_DELETE,
                Keyboard::categories(&categories),
            )),
    }
}

/// Back navigation depends only on the current state.
fn back(state: Option<&DialogState>) -> TransitionResult {
    match state.and_then(DialogState::back_target) {
        None => TransitionResult::clear()
            .with_effect(Effect::reply(text::CHOOSE_ACTION, Keyboard::main_menu())),
        Some(DialogState::BankSelected { bank }) => show_bank_actions(bank, text::bank_selected(bank)),
        Some(target) => {
            TransitionResult::set(target).with_effect(Effect::reply(text::CHOOSE_BANK, Keyboard::bank_management()))
        }
    }
}

fn show_bank_actions(bank: Bank, prompt: String) -> TransitionResult {
    TransitionResult::set(DialogState::BankSelected { bank })
        .with_effect(Effect::reply(prompt, Keyboard::bank_actions()))
}

/// Confirmation first, then the bank-actions menu for the same bank.
fn confirm_and_return(bank: Bank, confirmation: String) -> TransitionResult {
    TransitionResult::set(DialogState::BankSelected { bank }).with_effects([
        Effect::text(confirmation),
        Effect::reply(text::what_next(bank), Keyboard::bank_actions()),
    ])
}

fn reprompt_percentage() -> TransitionResult {
    TransitionResult::keep().with_effect(Effect::reply(text::INVALID_PERCENTAGE, Keyboard::back_only()))
}

fn failure_notice(op: StoreOp) -> &'static str {
    match op {
        StoreOp::Read => text::READ_FAILED,
        StoreOp::Save => text::SAVE_FAILED,
        StoreOp::Update => text::UPDATE_FAILED,
        StoreOp::Delete => text::DELETE_FAILED,
    }
}
