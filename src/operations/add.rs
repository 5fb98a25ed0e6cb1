use crate::models::transaction::{NewTransaction, Transaction, TransactionError, TransactionType};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Raw values of the creation form, as typed.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub name: String,
    pub amount: String,
    pub transaction_type: TransactionType,
    pub category: Option<String>,
    pub date: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a name")]
    MissingName,
    #[error("Description too long")]
    NameTooLong,
    #[error("Invalid amount format {0}. Please provide a valid decimal number.")]
    InvalidAmount(String),
    #[error("Please select a category")]
    MissingCategory,
    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDate,
    #[error(transparent)]
    Rejected(#[from] TransactionError),
}

const MAX_NAME_LEN: usize = 255;

pub fn parse_input(input: &TransactionInput) -> Result<NewTransaction, FormError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(FormError::MissingName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(FormError::NameTooLong);
    }

    let amount_raw = input.amount.trim();
    let amount = Decimal::from_str(amount_raw)
        .map_err(|_| FormError::InvalidAmount(amount_raw.to_string()))?;

    let category = match input.category.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => return Err(FormError::MissingCategory),
    };

    let date = NaiveDate::parse_from_str(input.date.trim(), "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate)?;

    Ok(NewTransaction {
        name: name.to_string(),
        amount,
        transaction_type: input.transaction_type,
        category,
        date,
    })
}

/// Parses and validates the form values into a new transaction stamped with `timestamp`.
pub fn create_transaction(input: &TransactionInput, timestamp: i64) -> Result<Transaction, FormError> {
    let new = parse_input(input)?;
    Ok(Transaction::create(new, timestamp)?)
}
