//! Builds a complete description of what is on screen from the app state.
//! Nothing here mutates state; `draw` turns the result into widgets.

use crate::models::category::categories_for;
use crate::models::transaction::TransactionType;
use crate::operations::aggregate::{
    BalanceTone, balance_tone, by_category, by_month, format_currency, format_date,
    recent_transactions, scale_bars, summary,
};
use crate::operations::filter::ListOutcome;
use crate::ui::app::{App, ChartTab, Mode};
use crate::ui::form::FormField;
use rust_decimal::Decimal;

pub const NO_DATA_CHART_MESSAGE: &str = "Add transactions to see your spending analysis";
pub const NO_EXPENSES_CHART_MESSAGE: &str = "Add expense transactions to see category analysis";
pub const NO_RECENT_CHART_MESSAGE: &str = "Add transactions to see monthly analysis";

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub summary: SummaryPanel,
    pub list: ListPanel,
    pub chart: ChartPanel,
    pub form: Option<FormPanel>,
    pub status: Option<String>,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPanel {
    pub balance: String,
    pub income: String,
    pub expenses: String,
    pub tone: BalanceTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPanel {
    pub type_label: String,
    pub category_label: String,
    pub body: ListBody,
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListBody {
    Rows(Vec<ListRow>),
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub date: String,
    pub amount: String,
    pub transaction_type: TransactionType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub tab: ChartTab,
    pub body: ChartBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    Empty(&'static str),
    Categories(Vec<Bar>),
    Months(Vec<MonthBars>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: String,
    pub percent: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthBars {
    pub label: &'static str,
    pub income_percent: u16,
    pub expense_percent: u16,
    /// Only set for non-zero totals.
    pub income_value: Option<String>,
    pub expense_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPanel {
    pub fields: Vec<FormFieldView>,
    pub category_choices: Vec<&'static str>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormFieldView {
    pub label: &'static str,
    pub value: String,
    pub focused: bool,
    pub choice: bool,
}

pub fn render(app: &App) -> Screen {
    Screen {
        summary: render_summary(app),
        list: render_list(app),
        chart: render_chart(app),
        form: (app.mode == Mode::Form).then(|| render_form(app)),
        status: app.status.clone(),
        mode: app.mode,
    }
}

fn render_summary(app: &App) -> SummaryPanel {
    let totals = summary(app.store.all());
    SummaryPanel {
        balance: format_currency(totals.balance),
        income: format_currency(totals.income_total),
        expenses: format_currency(totals.expense_total),
        tone: balance_tone(totals.balance),
    }
}

fn render_list(app: &App) -> ListPanel {
    let outcome = app.filter.outcome(app.store.all());
    let body = match outcome {
        ListOutcome::Rows(rows) => ListBody::Rows(
            rows.into_iter()
                .map(|tx| {
                    let sign = match tx.transaction_type {
                        TransactionType::Income => '+',
                        TransactionType::Expense => '-',
                    };
                    ListRow {
                        id: tx.id.clone(),
                        name: tx.name.clone(),
                        category: tx.category.clone(),
                        date: format_date(tx.date),
                        amount: format!("{} {}", sign, format_currency(tx.amount)),
                        transaction_type: tx.transaction_type,
                    }
                })
                .collect(),
        ),
        ref empty => ListBody::Empty(empty.empty_message().unwrap_or_default()),
    };

    ListPanel {
        type_label: app.filter.type_label().to_string(),
        category_label: app.filter.category_label().to_string(),
        body,
        selected: app.selected,
    }
}

fn render_chart(app: &App) -> ChartPanel {
    let transactions = app.store.all();
    let body = if transactions.is_empty() {
        ChartBody::Empty(NO_DATA_CHART_MESSAGE)
    } else {
        match app.chart_tab {
            ChartTab::Category => category_bars(app),
            ChartTab::Month => month_bars(app),
        }
    };
    ChartPanel {
        tab: app.chart_tab,
        body,
    }
}

fn category_bars(app: &App) -> ChartBody {
    let groups = by_category(app.store.all());
    if groups.is_empty() {
        return ChartBody::Empty(NO_EXPENSES_CHART_MESSAGE);
    }
    let totals: Vec<Decimal> = groups.iter().map(|g| g.total).collect();
    let bars = groups
        .iter()
        .zip(scale_bars(&totals))
        .map(|(group, percent)| Bar {
            label: group.category.clone(),
            value: format_currency(group.total),
            percent,
        })
        .collect();
    ChartBody::Categories(bars)
}

fn month_bars(app: &App) -> ChartBody {
    let transactions = app.store.all();
    if recent_transactions(transactions, app.today).is_empty() {
        return ChartBody::Empty(NO_RECENT_CHART_MESSAGE);
    }

    let months = by_month(transactions, app.today);
    // Both series share one scale.
    let values: Vec<Decimal> = months
        .iter()
        .flat_map(|m| [m.income_total, m.expense_total])
        .collect();
    let percents = scale_bars(&values);

    let value_label = |amount: Decimal| (amount > Decimal::ZERO).then(|| format_currency(amount));
    let bars = months
        .iter()
        .zip(percents.chunks(2))
        .map(|(month, pair)| MonthBars {
            label: month.label,
            income_percent: pair[0],
            expense_percent: pair[1],
            income_value: value_label(month.income_total),
            expense_value: value_label(month.expense_total),
        })
        .collect();
    ChartBody::Months(bars)
}

fn render_form(app: &App) -> FormPanel {
    let form = &app.form;
    let fields = FormField::ALL
        .iter()
        .map(|field| FormFieldView {
            label: field.label(),
            value: form.value_of(*field),
            focused: form.focus == *field,
            choice: matches!(field, FormField::Type | FormField::Category),
        })
        .collect();
    FormPanel {
        fields,
        category_choices: categories_for(form.transaction_type).to_vec(),
        error: form.error.clone(),
    }
}
