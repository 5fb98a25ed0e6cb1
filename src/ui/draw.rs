use crate::models::transaction::TransactionType;
use crate::operations::aggregate::BalanceTone;
use crate::ui::app::{ChartTab, Mode};
use crate::ui::view::{Bar, ChartBody, ChartPanel, FormPanel, ListBody, ListPanel, MonthBars, Screen, SummaryPanel};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Stylize,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap},
};

const BAR_GLYPH: &str = "█";

pub fn draw(frame: &mut ratatui::Frame, screen: &Screen) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(size);

    render_summary(frame, layout[0], &screen.summary);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);

    render_list(frame, body[0], &screen.list);
    render_chart(frame, body[1], &screen.chart);
    render_footer(frame, layout[2], screen);

    if let Some(ref form) = screen.form {
        render_form(frame, size, form);
    }
}

fn tone_color(tone: BalanceTone) -> Color {
    match tone {
        BalanceTone::Negative => Color::Red,
        BalanceTone::Zero => Color::Cyan,
        BalanceTone::Positive => Color::Green,
    }
}

fn render_summary(frame: &mut ratatui::Frame, area: Rect, summary: &SummaryPanel) {
    let line = Line::from(vec![
        Span::styled("FINTRACK", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::raw("Balance: "),
        Span::styled(summary.balance.clone(), Style::default().fg(tone_color(summary.tone)).bold()),
        Span::raw("  |  "),
        Span::raw("Income: "),
        Span::styled(summary.income.clone(), Style::default().fg(Color::Green)),
        Span::raw("  |  "),
        Span::raw("Expenses: "),
        Span::styled(summary.expenses.clone(), Style::default().fg(Color::Red)),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block).alignment(Alignment::Left), area);
}

fn render_list(frame: &mut ratatui::Frame, area: Rect, list: &ListPanel) {
    let title = format!(
        "Transactions  [type: {} | category: {}]",
        list.type_label, list.category_label
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = match list.body {
        ListBody::Empty(message) => {
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, inner);
            return;
        }
        ListBody::Rows(ref rows) => rows,
    };

    let header = Row::new([
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Name").style(Style::default().bold()),
        Cell::from("Category").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Id").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let table_rows = rows.iter().map(|row| {
        let mut name = row.name.clone();
        if name.chars().count() > 32 {
            name = name.chars().take(29).collect::<String>() + "...";
        }
        let amount_color = match row.transaction_type {
            TransactionType::Income => Color::Green,
            TransactionType::Expense => Color::Red,
        };
        Row::new([
            Cell::from(row.date.clone()),
            Cell::from(name),
            Cell::from(row.category.clone()),
            Cell::from(row.amount.clone()).style(Style::default().fg(amount_color)),
            Cell::from(row.id.chars().take(8).collect::<String>()),
        ])
    });

    let widths = [
        Constraint::Length(13),
        Constraint::Percentage(40),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(8),
    ];

    let table = Table::new(table_rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    let mut state = TableState::default().with_selected(list.selected);
    frame.render_stateful_widget(table, inner, &mut state);
}

fn render_chart(frame: &mut ratatui::Frame, area: Rect, chart: &ChartPanel) {
    let block = Block::default().title("Spending").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    // Always start from a blank canvas.
    frame.render_widget(Clear, inner);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(inner);

    let selected = match chart.tab {
        ChartTab::Category => 0,
        ChartTab::Month => 1,
    };
    let tabs = Tabs::new(vec![ChartTab::Category.title(), ChartTab::Month.title()])
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).bold());
    frame.render_widget(tabs, layout[0]);

    match chart.body {
        ChartBody::Empty(message) => {
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(empty, layout[1]);
        }
        ChartBody::Categories(ref bars) => render_category_chart(frame, layout[1], bars),
        ChartBody::Months(ref months) => render_month_chart(frame, layout[1], months),
    }
}

/// One column of a bar chart. `gap` blank cells follow it.
struct Column {
    percent: u16,
    color: Color,
    width: usize,
    gap: usize,
}

fn bar_lines(columns: &[Column], height: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let level = (height - row) as f64;
        let mut spans = Vec::new();
        for column in columns {
            let scaled = (column.percent as f64 / 100.0 * height as f64).ceil().max(1.0);
            if level <= scaled {
                spans.push(Span::styled(BAR_GLYPH.repeat(column.width), Style::default().fg(column.color)));
            } else {
                spans.push(Span::raw(" ".repeat(column.width)));
            }
            if column.gap > 0 {
                spans.push(Span::raw(" ".repeat(column.gap)));
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn fit(label: &str, width: usize) -> String {
    let truncated: String = label.chars().take(width).collect();
    format!("{:width$}", truncated, width = width)
}

fn render_category_chart(frame: &mut ratatui::Frame, area: Rect, bars: &[Bar]) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(area);

    let slot = std::cmp::max(2, area.width as usize / bars.len().max(1));
    let columns: Vec<Column> = bars
        .iter()
        .map(|bar| Column {
            percent: bar.percent,
            color: Color::Magenta,
            width: slot - 1,
            gap: 1,
        })
        .collect();

    let height = layout[0].height as usize;
    frame.render_widget(Paragraph::new(bar_lines(&columns, height)), layout[0]);

    let values: Vec<Span> = bars.iter().map(|b| Span::raw(fit(&b.value, slot))).collect();
    let labels: Vec<Span> = bars
        .iter()
        .map(|b| Span::styled(fit(&b.label, slot), Style::default().fg(Color::White)))
        .collect();
    frame.render_widget(
        Paragraph::new(vec![Line::from(values), Line::from(labels)]),
        layout[1],
    );
}

fn render_month_chart(frame: &mut ratatui::Frame, area: Rect, months: &[MonthBars]) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let slot = std::cmp::max(3, area.width as usize / months.len().max(1));
    let bar_width = std::cmp::max(1, (slot - 1) / 2);
    let mut columns = Vec::with_capacity(months.len() * 2);
    for month in months {
        columns.push(Column {
            percent: month.income_percent,
            color: Color::Green,
            width: bar_width,
            gap: 0,
        });
        columns.push(Column {
            percent: month.expense_percent,
            color: Color::Red,
            width: slot - bar_width - 1,
            gap: 1,
        });
    }

    // Income and expense bars of the same month sit side by side.
    let height = layout[0].height as usize;
    let lines = bar_lines(&columns, height);
    frame.render_widget(Paragraph::new(lines), layout[0]);

    let value_row = |values: Vec<Option<&str>>, color: Color| {
        let spans: Vec<Span> = values
            .into_iter()
            .map(|v| Span::styled(fit(v.unwrap_or(""), slot), Style::default().fg(color)))
            .collect();
        Line::from(spans)
    };
    let labels: Vec<Span> = months
        .iter()
        .map(|m| Span::styled(fit(m.label, slot), Style::default().fg(Color::White).bold()))
        .collect();
    frame.render_widget(
        Paragraph::new(vec![
            value_row(months.iter().map(|m| m.income_value.as_deref()).collect(), Color::Green),
            value_row(months.iter().map(|m| m.expense_value.as_deref()).collect(), Color::Red),
            Line::from(labels),
        ]),
        layout[1],
    );

    let legend = Line::from(vec![
        Span::styled(BAR_GLYPH, Style::default().fg(Color::Green)),
        Span::raw(" Income   "),
        Span::styled(BAR_GLYPH, Style::default().fg(Color::Red)),
        Span::raw(" Expense"),
    ]);
    frame.render_widget(Paragraph::new(legend).alignment(Alignment::Center), layout[2]);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, screen: &Screen) {
    let hint = match screen.mode {
        Mode::List => "a add  d delete  t type  c category  x clear  Tab/1/2 chart  ↑/↓ move  q/Esc exit",
        Mode::Form => "Tab/↑/↓ field  ←/→ choose  Enter save  Esc cancel",
    };

    let mut spans = vec![Span::raw(hint)];
    if let Some(ref status) = screen.status {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Yellow)));
    }

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_form(frame: &mut ratatui::Frame, area: Rect, form: &FormPanel) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(vec![Span::styled("New Transaction", Style::default().bold())]),
        Line::from(""),
    ];

    for field in &form.fields {
        let marker = if field.focused { "➤ " } else { "  " };
        let value = if field.choice {
            format!("◀ {} ▶", field.value)
        } else {
            field.value.clone()
        };
        let style = if field.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:10}", field.label), Style::default().bold()),
            Span::styled(value, style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Categories: {}", form.category_choices.join(", ")),
        Style::default().fg(Color::DarkGray),
    )));

    if let Some(ref err) = form.error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )]));
    }

    let block = Block::default().borders(Borders::ALL).title("Add");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
