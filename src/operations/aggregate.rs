use crate::models::transaction::{Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const MONTH_WINDOW: usize = 6;

/// Smallest bar height, in percent, so zero-valued bars stay visible.
pub const MIN_BAR_PERCENT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub income_total: Decimal,
    pub expense_total: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotals {
    pub year: i32,
    pub month: u32,
    pub label: &'static str,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTone {
    Negative,
    Zero,
    Positive,
}

/// Totals saturate at the `Decimal` bounds. Stored documents are not
/// re-validated, so amounts can exceed what `Transaction::create` accepts.
pub fn summary(transactions: &[Transaction]) -> Summary {
    let (income_total, expense_total) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), t| match t.transaction_type {
            TransactionType::Income => (income.saturating_add(t.amount), expense),
            TransactionType::Expense => (income, expense.saturating_add(t.amount)),
        },
    );
    Summary {
        income_total,
        expense_total,
        balance: income_total.saturating_sub(expense_total),
    }
}

pub fn balance_tone(balance: Decimal) -> BalanceTone {
    if balance < Decimal::ZERO {
        BalanceTone::Negative
    } else if balance > Decimal::ZERO {
        BalanceTone::Positive
    } else {
        BalanceTone::Zero
    }
}

/// Expense totals per category, largest first. Equal totals keep the order
/// in which their category was first seen.
pub fn by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for t in transactions.iter().filter(|t| t.is_expense()) {
        match totals.iter_mut().find(|c| c.category == t.category) {
            Some(entry) => entry.total = entry.total.saturating_add(t.amount),
            None => totals.push(CategoryTotal {
                category: t.category.clone(),
                total: t.amount,
            }),
        }
    }
    // sort_by is stable, so first-seen order survives among ties
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals
}

/// Income and expense totals for the six calendar months ending with the
/// month of `reference`, oldest first. Every month is present even when empty.
pub fn by_month(transactions: &[Transaction], reference: NaiveDate) -> Vec<MonthTotals> {
    let last = month_index(reference.year(), reference.month());
    let first = last - (MONTH_WINDOW as i32 - 1);

    let mut months: Vec<MonthTotals> = (first..=last)
        .map(|index| {
            let (year, month) = from_month_index(index);
            MonthTotals {
                year,
                month,
                label: month_label(month),
                income_total: Decimal::ZERO,
                expense_total: Decimal::ZERO,
            }
        })
        .collect();

    for t in transactions {
        let index = month_index(t.date.year(), t.date.month());
        if index < first || index > last {
            continue;
        }
        let entry = &mut months[(index - first) as usize];
        match t.transaction_type {
            TransactionType::Income => entry.income_total = entry.income_total.saturating_add(t.amount),
            TransactionType::Expense => entry.expense_total = entry.expense_total.saturating_add(t.amount),
        }
    }
    months
}

/// Transactions dated on or after the first day of the `by_month` window.
/// Future-dated ones count, so they alone still show the (zeroed) chart.
pub fn recent_transactions(transactions: &[Transaction], reference: NaiveDate) -> Vec<&Transaction> {
    let first = month_index(reference.year(), reference.month()) - (MONTH_WINDOW as i32 - 1);
    transactions
        .iter()
        .filter(|t| month_index(t.date.year(), t.date.month()) >= first)
        .collect()
}

/// Scales each value to a percentage of the largest one, never below
/// `MIN_BAR_PERCENT`. A zero or missing maximum gives every bar the minimum.
pub fn scale_bars(values: &[Decimal]) -> Vec<u16> {
    let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
    if max <= Decimal::ZERO {
        return vec![MIN_BAR_PERCENT; values.len()];
    }
    values
        .iter()
        .map(|v| {
            let ratio = (*v / max).to_f64().unwrap_or(0.0);
            let percent = (ratio * 100.0).round().clamp(0.0, 100.0) as u16;
            percent.max(MIN_BAR_PERCENT)
        })
        .collect()
}

pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    if rounded < Decimal::ZERO {
        format!("-${:.2}", rounded.abs())
    } else {
        format!("${:.2}", rounded)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn month_index(year: i32, month: u32) -> i32 {
    year * 12 + (month as i32 - 1)
}

fn from_month_index(index: i32) -> (i32, u32) {
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn month_label(month: u32) -> &'static str {
    const LABELS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    LABELS[(month as usize - 1) % 12]
}
