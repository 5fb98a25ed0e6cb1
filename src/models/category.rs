use crate::models::transaction::TransactionType;

pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Food",
    "Transportation",
    "Housing",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Education",
    "Shopping",
    "Personal Care",
    "Other",
];

pub const INCOME_CATEGORIES: [&str; 5] = ["Salary", "Freelance", "Investments", "Gifts", "Other"];

pub fn categories_for(transaction_type: TransactionType) -> &'static [&'static str] {
    match transaction_type {
        TransactionType::Expense => &EXPENSE_CATEGORIES,
        TransactionType::Income => &INCOME_CATEGORIES,
    }
}

/// Looks a category up in the vocabulary of `transaction_type`, ignoring case,
/// and returns the vocabulary spelling.
pub fn canonical_category(transaction_type: TransactionType, raw: &str) -> Option<&'static str> {
    let raw = raw.trim();
    categories_for(transaction_type)
        .iter()
        .copied()
        .find(|category| category.eq_ignore_ascii_case(raw))
}

/// Categories offered by the list filter.
///
/// With no type filter this is the expense vocabulary followed by the income
/// vocabulary with duplicates dropped, so a label shared by both (`Other`)
/// shows up once and matches either type. With a type filter only that
/// type's vocabulary is offered.
pub fn filter_categories(transaction_type: Option<TransactionType>) -> Vec<&'static str> {
    match transaction_type {
        Some(t) => categories_for(t).to_vec(),
        None => {
            let mut all: Vec<&'static str> = Vec::new();
            for category in EXPENSE_CATEGORIES.iter().chain(INCOME_CATEGORIES.iter()) {
                if !all.contains(category) {
                    all.push(*category);
                }
            }
            all
        }
    }
}
