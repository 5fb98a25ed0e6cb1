use crate::models::category::canonical_category;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: NaiveDate,
    /// Creation instant in epoch milliseconds.
    pub timestamp: i64,
}

/// User supplied fields of a transaction, before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub name: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: NaiveDate,
}

/// Largest amount a single transaction may carry. Keeps totals over any
/// realistic collection well inside `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Amount must not exceed 1000000000000, got {0}")]
    AmountTooLarge(Decimal),
    #[error("'{category}' is not a valid {transaction_type} category")]
    UnknownCategory {
        category: String,
        transaction_type: TransactionType,
    },
}

impl Transaction {
    /// Validates `new` and stamps it with a fresh id and the given creation instant.
    pub fn create(new: NewTransaction, timestamp: i64) -> Result<Self, TransactionError> {
        let name = new.name.trim().to_string();
        if name.is_empty() {
            return Err(TransactionError::EmptyName);
        }
        if new.amount <= Decimal::ZERO {
            return Err(TransactionError::NonPositiveAmount(new.amount));
        }
        if new.amount > MAX_AMOUNT {
            return Err(TransactionError::AmountTooLarge(new.amount));
        }
        let category = canonical_category(new.transaction_type, &new.category).ok_or_else(|| {
            TransactionError::UnknownCategory {
                category: new.category.clone(),
                transaction_type: new.transaction_type,
            }
        })?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            amount: new.amount,
            transaction_type: new.transaction_type,
            category: category.to_string(),
            date: new.date,
            timestamp,
        })
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}
