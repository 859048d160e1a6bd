//! The two fixed category enumerations.
//!
//! The input form restricts a record's category to the set matching its kind.
//! The edit and analysis views deliberately offer the union of both sets
//! instead, so category membership is only enforced when a record is first
//! written.

use crate::model::EntryKind;

/// Categories offered when entering income.
pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Rental Income", "Bonus", "Side Income", "Other"];

/// Categories offered when entering an expense.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Groceries",
    "Dining Out",
    "Shopping",
    "Transportation",
    "Housing & Utilities",
    "Medical & Health",
    "Baby & Childcare",
    "Savings",
    "Other",
];

/// The enumeration matching `kind`.
pub fn categories_for(kind: EntryKind) -> &'static [&'static str] {
    match kind {
        EntryKind::Income => INCOME_CATEGORIES,
        EntryKind::Expense => EXPENSE_CATEGORIES,
    }
}

/// The union of both enumerations, order-preserving and without duplicates.
pub fn all_categories() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = Vec::new();
    for category in EXPENSE_CATEGORIES.iter().chain(INCOME_CATEGORIES) {
        if !all.contains(category) {
            all.push(category);
        }
    }
    all
}

/// Write-time rule: the category must belong to the enumeration for `kind`.
pub fn is_valid_for(kind: EntryKind, category: &str) -> bool {
    categories_for(kind).contains(&category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_for_kind() {
        assert!(is_valid_for(EntryKind::Income, "Salary"));
        assert!(is_valid_for(EntryKind::Expense, "Groceries"));
        assert!(!is_valid_for(EntryKind::Income, "Groceries"));
        assert!(!is_valid_for(EntryKind::Expense, "Salary"));
    }

    #[test]
    fn test_other_belongs_to_both() {
        assert!(is_valid_for(EntryKind::Income, "Other"));
        assert!(is_valid_for(EntryKind::Expense, "Other"));
    }

    #[test]
    fn test_union_dedupes() {
        let all = all_categories();
        assert_eq!(
            all.len(),
            EXPENSE_CATEGORIES.len() + INCOME_CATEGORIES.len() - 1,
            "'Other' appears in both sets and should be listed once"
        );
        assert!(all.contains(&"Salary"));
        assert!(all.contains(&"Groceries"));
    }
}
