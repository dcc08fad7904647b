//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::command::{classify, Command, MenuAction};
use super::effect::{Effect, StoreOp, StoreRequest};
use super::event::{Event, StoreOutcome};
use super::transition::{transition, NextState, TransitionResult};
use super::DialogState;
use crate::menu::{Bank, Keyboard, CATEGORY_ROW_WIDTH};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_bank() -> impl Strategy<Value = Bank> {
    prop_oneof![
        Just(Bank::Bank1),
        Just(Bank::Bank2),
        Just(Bank::Bank3),
        Just(Bank::Bank4),
    ]
}

fn arb_category() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,15}"
}

fn arb_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        Just(DialogState::SelectingBankForManagement),
        arb_bank().prop_map(|bank| DialogState::BankSelected { bank }),
        arb_bank().prop_map(|bank| DialogState::EnteringCategoryName { bank }),
        (arb_bank(), arb_category())
            .prop_map(|(bank, category)| DialogState::EnteringPercentage { bank, category }),
        arb_bank().prop_map(|bank| DialogState::SelectingCategoryToEdit { bank }),
        (arb_bank(), arb_category())
            .prop_map(|(bank, category)| DialogState::EnteringNewPercentage { bank, category }),
        arb_bank().prop_map(|bank| DialogState::SelectingCategoryToDelete { bank }),
        Just(DialogState::SelectingCategoryForView),
    ]
}

fn arb_optional_state() -> impl Strategy<Value = Option<DialogState>> {
    prop_oneof![Just(None), arb_state().prop_map(Some)]
}

fn arb_percentage_state() -> impl Strategy<Value = DialogState> {
    prop_oneof![
        (arb_bank(), arb_category())
            .prop_map(|(bank, category)| DialogState::EnteringPercentage { bank, category }),
        (arb_bank(), arb_category())
            .prop_map(|(bank, category)| DialogState::EnteringNewPercentage { bank, category }),
    ]
}

fn arb_store_op() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        Just(StoreOp::Read),
        Just(StoreOp::Save),
        Just(StoreOp::Update),
        Just(StoreOp::Delete),
    ]
}

/// Text that can never parse as a number
fn arb_non_numeric() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,10}".prop_filter("parses as float", |s| {
        s.trim().replace(',', ".").parse::<f64>().is_err()
    })
}

fn store_requests(result: &TransitionResult) -> Vec<&StoreRequest> {
    result
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Store(request) => Some(request),
            Effect::Reply(_) => None,
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_back_from_bank_selected_goes_to_bank_selection(bank in arb_bank()) {
        let result = transition(
            Some(&DialogState::BankSelected { bank }),
            Event::Command(Command::Menu(MenuAction::Back)),
        );
        prop_assert_eq!(result.next, NextState::Set(DialogState::SelectingBankForManagement));
    }

    #[test]
    fn prop_back_keeps_selected_bank(state in arb_state()) {
        let result = transition(Some(&state), Event::Command(Command::Menu(MenuAction::Back)));
        match (&state, &result.next) {
            (DialogState::BankSelected { .. }, NextState::Set(DialogState::SelectingBankForManagement)) => {}
            (_, NextState::Set(DialogState::BankSelected { bank })) => {
                prop_assert_eq!(Some(*bank), state.bank());
            }
            (_, NextState::Clear) => prop_assert!(state.bank().is_none()),
            (_, other) => prop_assert!(false, "unexpected back target {:?}", other),
        }
    }

    #[test]
    fn prop_non_numeric_percentage_never_advances(
        state in arb_percentage_state(),
        text in arb_non_numeric(),
    ) {
        let result = transition(Some(&state), Event::Command(Command::Input(text)));
        prop_assert_eq!(&result.next, &NextState::Keep);
        prop_assert!(store_requests(&result).is_empty());
    }

    #[test]
    fn prop_out_of_range_percentage_never_writes(
        state in arb_percentage_state(),
        value in prop_oneof![-1.0e6..-0.001f64, 100.001..1.0e6f64],
    ) {
        let result = transition(Some(&state), Event::Command(Command::Input(value.to_string())));
        prop_assert_eq!(&result.next, &NextState::Keep);
        prop_assert!(store_requests(&result).is_empty());
    }

    #[test]
    fn prop_valid_percentage_requests_single_write(
        state in arb_percentage_state(),
        value in 0.0..=100.0f64,
    ) {
        let result = transition(Some(&state), Event::Command(Command::Input(value.to_string())));
        prop_assert_eq!(&result.next, &NextState::Keep);
        let requests = store_requests(&result);
        prop_assert_eq!(requests.len(), 1);
        prop_assert!(requests[0].is_write());
        match requests[0] {
            StoreRequest::Upsert { percentage, bank, .. }
            | StoreRequest::UpdatePercentage { percentage, bank, .. } => {
                prop_assert!((percentage - value).abs() < 1e-9);
                prop_assert_eq!(Some(*bank), state.bank());
            }
            other => prop_assert!(false, "unexpected request {:?}", other),
        }
    }

    #[test]
    fn prop_store_failure_never_changes_state(
        state in arb_optional_state(),
        op in arb_store_op(),
    ) {
        let result = transition(state.as_ref(), Event::StoreFailed { op });
        prop_assert_eq!(&result.next, &NextState::Keep);
        prop_assert_eq!(result.effects.len(), 1);
        prop_assert!(store_requests(&result).is_empty());
    }

    #[test]
    fn prop_successful_write_returns_to_bank(bank in arb_bank(), category in arb_category()) {
        let outcomes = [
            StoreOutcome::Upserted { bank, category: category.clone(), percentage: 1.0 },
            StoreOutcome::Updated { bank, category: category.clone(), percentage: 1.0, rows: 0 },
            StoreOutcome::Deleted { bank, category },
        ];
        for outcome in outcomes {
            let result = transition(None, Event::StoreCompleted(outcome));
            prop_assert_eq!(result.next, NextState::Set(DialogState::BankSelected { bank }));
        }
    }

    #[test]
    fn prop_bank_label_only_chosen_during_bank_selection(
        state in arb_optional_state(),
        bank in arb_bank(),
    ) {
        let command = classify(&bank.button_label(), state.as_ref());
        if state == Some(DialogState::SelectingBankForManagement) {
            prop_assert_eq!(command, Some(Command::ChooseBank(bank)));
        } else {
            prop_assert_eq!(command, None);
        }
    }

    #[test]
    fn prop_category_keyboard_wraps(categories in prop::collection::vec(arb_category(), 0..12)) {
        let keyboard = Keyboard::categories(&categories);
        let (back_row, category_rows) = keyboard.rows.split_last().unwrap();
        prop_assert_eq!(back_row, &vec![crate::menu::BACK.to_string()]);
        prop_assert!(category_rows.iter().all(|row| !row.is_empty() && row.len() <= CATEGORY_ROW_WIDTH));
        let flattened: Vec<String> = category_rows.iter().flatten().cloned().collect();
        prop_assert_eq!(flattened, categories);
    }
}
