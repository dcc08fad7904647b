//! Reply texts

use crate::db::CashbackEntry;
use crate::menu::Bank;

pub const WELCOME: &str = "Welcome to the cashback tracker! 💳\n\nChoose an action:";
pub const CHOOSE_ACTION: &str = "Choose an action:";
pub const CHOOSE_BANK: &str = "Choose a bank to manage cashback:";
pub const ENTER_CATEGORY_NAME: &str = "Enter the category name:";
pub const INVALID_PERCENTAGE: &str = "Please enter a valid percentage (a number from 0 to 100):";
pub const NO_CATEGORIES: &str =
    "No categories found. Add some under \"Manage cashback\" first.";
pub const CHOOSE_CATEGORY_TO_VIEW: &str = "Choose a category to see cashback:";
pub const CHOOSE_CATEGORY_TO_EDIT: &str = "Choose a category to edit:";
pub const CHOOSE_CATEGORY_TO_DELETE: &str = "Choose a category to delete:";
pub const CATEGORY_NOT_FOUND: &str = "Category not found.";

pub const READ_FAILED: &str = "An error occurred while loading data.";
pub const SAVE_FAILED: &str = "An error occurred while saving data.";
pub const UPDATE_FAILED: &str = "An error occurred while updating data.";
pub const DELETE_FAILED: &str = "An error occurred while deleting data.";
pub const UNEXPECTED_FAILURE: &str = "An error occurred. Please try again.";

/// Render a percentage without a trailing `.0`
pub fn percent(value: f64) -> String {
    format!("{value}%")
}

pub fn bank_selected(bank: Bank) -> String {
    format!("You selected {bank}. What would you like to do?")
}

pub fn what_next(bank: Bank) -> String {
    format!("What else would you like to do with {bank}?")
}

pub fn enter_percentage(bank: Bank, category: &str) -> String {
    format!("Enter the cashback percentage for \"{category}\" in {bank}:")
}

pub fn enter_new_percentage(category: &str, current: f64) -> String {
    format!(
        "Current cashback for \"{category}\": {}\n\nEnter the new percentage:",
        percent(current)
    )
}

pub fn added(bank: Bank, category: &str, percentage: f64) -> String {
    format!(
        "✅ Category \"{category}\" with {} cashback added to {bank}!",
        percent(percentage)
    )
}

pub fn updated(bank: Bank, category: &str, percentage: f64) -> String {
    format!(
        "✅ Cashback for \"{category}\" in {bank} changed to {}!",
        percent(percentage)
    )
}

pub fn deleted(bank: Bank, category: &str) -> String {
    format!("✅ Category \"{category}\" removed from {bank}!")
}

pub fn bank_empty(bank: Bank) -> String {
    format!("{bank} has no categories yet.")
}

pub fn nothing_to_edit(bank: Bank) -> String {
    format!("{bank} has no categories to edit yet.")
}

pub fn nothing_to_delete(bank: Bank) -> String {
    format!("{bank} has no categories to delete yet.")
}

pub fn not_configured(category: &str) -> String {
    format!("No bank has cashback configured for \"{category}\".")
}

/// One line per category, in the order given
pub fn bank_listing(bank: Bank, entries: &[CashbackEntry]) -> String {
    let mut message = format!("📋 Categories in {bank}:\n\n");
    for entry in entries {
        message.push_str(&format!("• {}: {}\n", entry.category, percent(entry.percentage)));
    }
    message
}

/// Medal for the top three, bullet after that
fn rank_marker(index: usize) -> &'static str {
    match index {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "•",
    }
}

/// Ranked lines, best rate first
pub fn ranking(category: &str, entries: &[CashbackEntry]) -> String {
    let mut message = format!("💳 Cashback for \"{category}\":\n\n");
    for (index, entry) in entries.iter().enumerate() {
        message.push_str(&format!(
            "{} {}: {}\n",
            rank_marker(index),
            entry.bank,
            percent(entry.percentage)
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(bank: Bank, category: &str, percentage: f64) -> CashbackEntry {
        CashbackEntry {
            id: 0,
            bank,
            category: category.to_string(),
            percentage,
        }
    }

    #[test]
    fn test_percent_drops_trailing_zero() {
        assert_eq!(percent(5.0), "5%");
        assert_eq!(percent(5.5), "5.5%");
        assert_eq!(percent(0.0), "0%");
    }

    #[test]
    fn test_ranking_medals_then_bullets() {
        let entries = vec![
            entry(Bank::Bank1, "Fuel", 5.5),
            entry(Bank::Bank2, "Fuel", 3.0),
            entry(Bank::Bank3, "Fuel", 2.0),
            entry(Bank::Bank4, "Fuel", 1.0),
        ];
        let text = ranking("Fuel", &entries);
        let lines: Vec<_> = text.lines().skip(2).collect();
        assert_eq!(
            lines,
            vec!["🥇 Bank1: 5.5%", "🥈 Bank2: 3%", "🥉 Bank3: 2%", "• Bank4: 1%"]
        );
    }

    #[test]
    fn test_bank_listing_lines() {
        let text = bank_listing(Bank::Bank2, &[entry(Bank::Bank2, "Cafe", 7.0)]);
        assert!(text.starts_with("📋 Categories in Bank2:"));
        assert!(text.contains("• Cafe: 7%"));
    }
}
