use crate::models::category::categories_for;
use crate::models::transaction::TransactionType;
use crate::operations::add::TransactionInput;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Amount,
    Type,
    Category,
    Date,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Amount,
        FormField::Type,
        FormField::Category,
        FormField::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Amount => "Amount",
            FormField::Type => "Type",
            FormField::Category => "Category",
            FormField::Date => "Date",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// The transaction creation form. Category choices always come from the
/// vocabulary of the selected type.
#[derive(Debug, Clone)]
pub struct FormState {
    pub name: String,
    pub amount: String,
    pub transaction_type: TransactionType,
    /// Index into `categories_for(transaction_type)`; `None` until chosen.
    pub category: Option<usize>,
    pub date: String,
    pub focus: FormField,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            transaction_type: TransactionType::Expense,
            category: None,
            date: today.format("%Y-%m-%d").to_string(),
            focus: FormField::Name,
            error: None,
        }
    }

    pub fn reset(&mut self, today: NaiveDate) {
        *self = Self::new(today);
    }

    pub fn next_field(&mut self) {
        let next = (self.focus.position() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    pub fn prev_field(&mut self) {
        let len = FormField::ALL.len();
        let prev = (self.focus.position() + len - 1) % len;
        self.focus = FormField::ALL[prev];
    }

    pub fn category_name(&self) -> Option<&'static str> {
        self.category
            .and_then(|idx| categories_for(self.transaction_type).get(idx).copied())
    }

    pub fn set_type(&mut self, transaction_type: TransactionType) {
        if self.transaction_type != transaction_type {
            self.transaction_type = transaction_type;
            self.category = None;
        }
    }

    /// Left/Right on a choice field. Text fields ignore it.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            FormField::Type => {
                let next = match self.transaction_type {
                    TransactionType::Income => TransactionType::Expense,
                    TransactionType::Expense => TransactionType::Income,
                };
                self.set_type(next);
            }
            FormField::Category => {
                let len = categories_for(self.transaction_type).len();
                self.category = Some(match (self.category, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                });
            }
            _ => {}
        }
    }

    pub fn input_char(&mut self, ch: char) {
        match self.focus {
            FormField::Name => self.name.push(ch),
            FormField::Amount => {
                if ch.is_ascii_digit() || ch == '.' {
                    self.amount.push(ch);
                }
            }
            FormField::Date => {
                if ch.is_ascii_digit() || ch == '-' {
                    self.date.push(ch);
                }
            }
            FormField::Type => match ch.to_ascii_lowercase() {
                'i' => self.set_type(TransactionType::Income),
                'e' => self.set_type(TransactionType::Expense),
                _ => {}
            },
            FormField::Category => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Name => {
                self.name.pop();
            }
            FormField::Amount => {
                self.amount.pop();
            }
            FormField::Date => {
                self.date.pop();
            }
            FormField::Category => self.category = None,
            FormField::Type => {}
        }
    }

    pub fn value_of(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.name.clone(),
            FormField::Amount => self.amount.clone(),
            FormField::Type => self.transaction_type.label().to_string(),
            FormField::Category => self
                .category_name()
                .unwrap_or("Select category")
                .to_string(),
            FormField::Date => self.date.clone(),
        }
    }

    pub fn to_input(&self) -> TransactionInput {
        TransactionInput {
            name: self.name.clone(),
            amount: self.amount.clone(),
            transaction_type: self.transaction_type,
            category: self.category_name().map(str::to_string),
            date: self.date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    #[test]
    fn test_new_defaults_date_to_today() {
        let form = FormState::new(today());
        assert_eq!(form.date, "2025-06-14");
        assert_eq!(form.focus, FormField::Name);
        assert_eq!(form.value_of(FormField::Category), "Select category");
    }

    #[test]
    fn test_type_change_resets_category() {
        let mut form = FormState::new(today());
        form.focus = FormField::Category;
        form.cycle(true);
        assert_eq!(form.category_name(), Some("Food"));

        form.focus = FormField::Type;
        form.cycle(true);
        assert_eq!(form.transaction_type, TransactionType::Income);
        assert_eq!(form.category_name(), None);

        form.focus = FormField::Category;
        form.cycle(false);
        assert_eq!(form.category_name(), Some("Other"));
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = FormState::new(today());
        form.prev_field();
        assert_eq!(form.focus, FormField::Date);
        form.next_field();
        assert_eq!(form.focus, FormField::Name);
    }

    #[test]
    fn test_amount_accepts_only_numeric_chars() {
        let mut form = FormState::new(today());
        form.focus = FormField::Amount;
        for ch in "1a2.5x".chars() {
            form.input_char(ch);
        }
        assert_eq!(form.amount, "12.5");
        form.backspace();
        assert_eq!(form.amount, "12.");
    }

    #[test]
    fn test_to_input_carries_selected_category() {
        let mut form = FormState::new(today());
        form.name = "Rent".to_string();
        form.amount = "900".to_string();
        form.focus = FormField::Category;
        form.cycle(true);
        form.cycle(true);
        form.cycle(true);

        let input = form.to_input();
        assert_eq!(input.category.as_deref(), Some("Housing"));
        assert_eq!(input.transaction_type, TransactionType::Expense);
        assert_eq!(input.date, "2025-06-14");
    }
}
