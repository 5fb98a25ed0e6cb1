use crate::models::transaction::TransactionType;
use crate::operations::add::create_transaction;
use crate::operations::filter::ListFilter;
use crate::store::{RecordStore, StoreError};
use crate::ui::form::FormState;
use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{error, info};

const PAGE_STEP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTab {
    Category,
    Month,
}

impl ChartTab {
    pub fn toggle(self) -> Self {
        match self {
            ChartTab::Category => ChartTab::Month,
            ChartTab::Month => ChartTab::Category,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartTab::Category => "By Category",
            ChartTab::Month => "By Month",
        }
    }
}

/// Discrete user actions. Each runs to completion before the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Submit,
    Delete(String),
    SetTypeFilter(Option<TransactionType>),
    SetCategoryFilter(Option<String>),
    ClearFilters,
    SwitchTab(ChartTab),
}

/// All application state. The store is the only thing that mutates the
/// transaction collection.
pub struct App {
    pub store: RecordStore,
    pub filter: ListFilter,
    pub chart_tab: ChartTab,
    pub mode: Mode,
    pub form: FormState,
    pub selected: Option<usize>,
    pub status: Option<String>,
    pub today: NaiveDate,
}

impl App {
    pub fn new(store: RecordStore, today: NaiveDate) -> Self {
        let mut app = Self {
            store,
            filter: ListFilter::default(),
            chart_tab: ChartTab::Category,
            mode: Mode::List,
            form: FormState::new(today),
            selected: None,
            status: None,
            today,
        };
        app.clamp_selection();
        app
    }

    pub fn visible_count(&self) -> usize {
        self.filter.apply(self.store.all()).len()
    }

    pub fn selected_id(&self) -> Option<String> {
        let rows = self.filter.apply(self.store.all());
        self.selected
            .and_then(|idx| rows.get(idx))
            .map(|t| t.id.clone())
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Submit => self.submit(),
            Action::Delete(id) => match self.store.remove(&id) {
                Ok(true) => {
                    info!(%id, "Deleted transaction");
                    self.status = Some("Transaction deleted".to_string());
                }
                Ok(false) => {}
                Err(e) => error!(error = %e, %id, "Failed to persist after delete"),
            },
            Action::SetTypeFilter(transaction_type) => self.filter.set_type(transaction_type),
            Action::SetCategoryFilter(category) => self.filter.category = category,
            Action::ClearFilters => self.filter.clear(),
            Action::SwitchTab(tab) => self.chart_tab = tab,
        }
        self.clamp_selection();
    }

    fn submit(&mut self) {
        let timestamp = Utc::now().timestamp_millis();
        let transaction = match create_transaction(&self.form.to_input(), timestamp) {
            Ok(transaction) => transaction,
            Err(e) => {
                self.form.error = Some(e.to_string());
                return;
            }
        };

        let id = transaction.id.clone();
        match self.store.add(transaction) {
            Ok(()) => info!(%id, "Added transaction"),
            Err(StoreError::DuplicateId(_)) => {
                self.form.error = Some(format!("Transaction with ID {} already exists", id));
                return;
            }
            // The record stays in memory; the next successful save rewrites it.
            Err(e) => error!(error = %e, %id, "Failed to persist new transaction"),
        }
        self.form.reset(self.today);
        self.mode = Mode::List;
        self.status = Some("Transaction added".to_string());
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_count();
        self.selected = if count == 0 {
            None
        } else {
            Some(self.selected.unwrap_or(0).min(count - 1))
        };
    }

    fn move_selection(&mut self, delta: i64) {
        let count = self.visible_count();
        if count == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, count as i64 - 1);
        self.selected = Some(next as usize);
    }

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
        if key.kind == KeyEventKind::Release {
            return false;
        }

        match self.mode {
            Mode::List => return self.handle_list_key(key),
            Mode::Form => self.handle_form_key(key),
        }
        false
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        self.status = None;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.move_selection(i64::MIN / 2),
            KeyCode::End => self.move_selection(i64::MAX / 2),
            KeyCode::Char('a') => {
                self.form.reset(self.today);
                self.mode = Mode::Form;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.dispatch(Action::Delete(id));
                }
            }
            KeyCode::Char('t') => {
                let mut next = self.filter.clone();
                next.cycle_type();
                self.dispatch(Action::SetTypeFilter(next.transaction_type));
            }
            KeyCode::Char('c') => {
                let mut next = self.filter.clone();
                next.cycle_category();
                self.dispatch(Action::SetCategoryFilter(next.category));
            }
            KeyCode::Char('x') => self.dispatch(Action::ClearFilters),
            KeyCode::Tab => self.dispatch(Action::SwitchTab(self.chart_tab.toggle())),
            KeyCode::Char('1') => self.dispatch(Action::SwitchTab(ChartTab::Category)),
            KeyCode::Char('2') => self.dispatch(Action::SwitchTab(ChartTab::Month)),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        // Allow Ctrl+C / Ctrl+Q to cancel
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.mode = Mode::List;
            return;
        }

        match key.code {
            KeyCode::Esc => self.mode = Mode::List,
            KeyCode::Enter => self.dispatch(Action::Submit),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.cycle(false),
            KeyCode::Right => self.form.cycle(true),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) => self.form.input_char(ch),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;
    use crate::operations::aggregate::{by_category, summary};
    use crate::ui::form::FormField;
    use rust_decimal::Decimal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    fn new_app() -> App {
        App::new(RecordStore::open(establish_test_connection().unwrap()), today())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn fill_form(app: &mut App, name: &str, amount: &str, transaction_type: TransactionType, category: &str, date: &str) {
        app.form.name = name.to_string();
        app.form.amount = amount.to_string();
        app.form.set_type(transaction_type);
        app.form.category = crate::models::category::categories_for(transaction_type)
            .iter()
            .position(|c| *c == category);
        app.form.date = date.to_string();
    }

    #[test]
    fn test_add_income_updates_summary() {
        let mut app = new_app();
        fill_form(&mut app, "Paycheck", "1000", TransactionType::Income, "Salary", "2025-06-01");
        app.dispatch(Action::Submit);

        let totals = summary(app.store.all());
        assert_eq!(totals.balance, Decimal::new(1000, 0));
        assert_eq!(totals.income_total, Decimal::new(1000, 0));
        assert_eq!(totals.expense_total, Decimal::ZERO);
        assert_eq!(app.status.as_deref(), Some("Transaction added"));
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_add_income_then_expense() {
        let mut app = new_app();
        fill_form(&mut app, "Paycheck", "1000", TransactionType::Income, "Salary", "2025-06-01");
        app.dispatch(Action::Submit);
        fill_form(&mut app, "Groceries", "400", TransactionType::Expense, "Food", "2025-06-02");
        app.dispatch(Action::Submit);

        assert_eq!(summary(app.store.all()).balance, Decimal::new(600, 0));
        let groups = by_category(app.store.all());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "Food");
        assert_eq!(groups[0].total, Decimal::new(400, 0));
    }

    #[test]
    fn test_submit_persists_and_resets_form() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.mode, Mode::Form);
        type_text(&mut app, "Coffee");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "3.50");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.form.focus, FormField::Category);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::List);
        assert_eq!(app.store.all().len(), 1);
        assert_eq!(app.store.all()[0].category, "Food");
        assert_eq!(app.store.all()[0].date, today());
        assert!(app.form.name.is_empty());
        assert_eq!(app.form.date, "2025-06-14");
    }

    #[test]
    fn test_submit_with_failing_storage_keeps_record_and_resets_form() {
        // No storage table, so every save fails.
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut app = App::new(RecordStore::open(conn), today());
        app.mode = Mode::Form;
        fill_form(&mut app, "Paycheck", "1000", TransactionType::Income, "Salary", "2025-06-01");
        app.dispatch(Action::Submit);

        assert_eq!(app.store.all().len(), 1);
        assert_eq!(app.mode, Mode::List);
        assert!(app.form.name.is_empty());
        assert!(app.form.error.is_none());
        assert_eq!(summary(app.store.all()).income_total, Decimal::new(1000, 0));
    }

    #[test]
    fn test_invalid_submit_keeps_form_open() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Coffee");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, Mode::Form);
        assert!(app.form.error.is_some());
        assert!(app.store.all().is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let mut app = new_app();
        fill_form(&mut app, "Paycheck", "1000", TransactionType::Income, "Salary", "2025-06-01");
        app.dispatch(Action::Submit);
        let before = app.store.all().to_vec();

        app.dispatch(Action::Delete("missing".to_string()));
        assert_eq!(app.store.all(), before.as_slice());
    }

    #[test]
    fn test_delete_selected_row() {
        let mut app = new_app();
        fill_form(&mut app, "Old", "5", TransactionType::Expense, "Food", "2025-05-01");
        app.dispatch(Action::Submit);
        fill_form(&mut app, "New", "7", TransactionType::Expense, "Food", "2025-06-01");
        app.dispatch(Action::Submit);

        // Row 0 is the newest date.
        app.selected = Some(0);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.all().len(), 1);
        assert_eq!(app.store.all()[0].name, "Old");
        assert_eq!(app.selected, Some(0));
    }

    #[test]
    fn test_filter_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.filter.transaction_type, Some(TransactionType::Expense));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.filter.category.as_deref(), Some("Food"));
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.filter.is_active());
    }

    #[test]
    fn test_tab_switching() {
        let mut app = new_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.chart_tab, ChartTab::Month);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.chart_tab, ChartTab::Category);
    }

    #[test]
    fn test_quit_and_release_events() {
        let mut app = new_app();
        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!app.handle_key(release));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_escape_in_form_returns_to_list() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        // 'q' is text inside the form, not quit
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.form.name, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, Mode::List);
    }
}
