use crate::models::category::filter_categories;
use crate::models::transaction::{Transaction, TransactionType};

pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions yet. Add your first transaction!";
pub const NO_MATCHES_MESSAGE: &str = "No transactions match your filters.";

/// Active list filters. `None` stands for "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ListOutcome<'a> {
    Rows(Vec<&'a Transaction>),
    NoTransactions,
    NoMatches,
}

impl ListFilter {
    pub fn is_active(&self) -> bool {
        self.transaction_type.is_some() || self.category.is_some()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(t) = self.transaction_type {
            if tx.transaction_type != t {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if !tx.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        true
    }

    /// Matching transactions, newest date first. Same-day entries show the
    /// most recently created first.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let mut rows: Vec<&Transaction> = transactions.iter().filter(|t| self.matches(t)).collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.timestamp.cmp(&a.timestamp)));
        rows
    }

    pub fn outcome<'a>(&self, transactions: &'a [Transaction]) -> ListOutcome<'a> {
        let rows = self.apply(transactions);
        if !rows.is_empty() {
            ListOutcome::Rows(rows)
        } else if self.is_active() {
            ListOutcome::NoMatches
        } else {
            ListOutcome::NoTransactions
        }
    }

    /// Cycles all -> expense -> income -> all. A category filter the new type
    /// does not offer is dropped.
    pub fn cycle_type(&mut self) {
        self.transaction_type = match self.transaction_type {
            None => Some(TransactionType::Expense),
            Some(TransactionType::Expense) => Some(TransactionType::Income),
            Some(TransactionType::Income) => None,
        };
        self.set_type(self.transaction_type);
    }

    pub fn set_type(&mut self, transaction_type: Option<TransactionType>) {
        self.transaction_type = transaction_type;
        if let Some(ref category) = self.category {
            let offered = filter_categories(transaction_type);
            if !offered.iter().any(|c| c.eq_ignore_ascii_case(category)) {
                self.category = None;
            }
        }
    }

    /// Steps through the categories offered for the current type filter,
    /// wrapping back to "all" after the last one.
    pub fn cycle_category(&mut self) {
        let offered = filter_categories(self.transaction_type);
        let next = match self.category {
            None => offered.first().copied(),
            Some(ref current) => offered
                .iter()
                .position(|c| c.eq_ignore_ascii_case(current))
                .and_then(|pos| offered.get(pos + 1).copied()),
        };
        self.category = next.map(str::to_string);
    }

    pub fn clear(&mut self) {
        self.transaction_type = None;
        self.category = None;
    }

    pub fn type_label(&self) -> &'static str {
        self.transaction_type.map(TransactionType::label).unwrap_or("all")
    }

    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("all")
    }
}

impl ListOutcome<'_> {
    pub fn empty_message(&self) -> Option<&'static str> {
        match self {
            ListOutcome::Rows(_) => None,
            ListOutcome::NoTransactions => Some(NO_TRANSACTIONS_MESSAGE),
            ListOutcome::NoMatches => Some(NO_MATCHES_MESSAGE),
        }
    }
}
