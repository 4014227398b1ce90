//! Drawing
//!
//! Pure function of (UI state, store snapshot) to a frame.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Tabs},
    Frame,
};

use super::app::UiApp;
use crate::dashboard::{format_money, DashboardTotals};
use crate::forms::{Form, SelectContext};
use crate::models::EntityKind;
use crate::nav::Tab;
use crate::store::{AppState, BannerKind};
use crate::table::{self, RenderedTable, TableRow};

const ACCENT: Color = Color::Blue;

pub fn draw(frame: &mut Frame, app: &UiApp, state: &AppState) {
    let banner_height = if state.message.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_tabs(frame, app, chunks[0]);
    if let Some(banner) = &state.message {
        let color = match banner.kind {
            BannerKind::Success => Color::Green,
            BannerKind::Error => Color::Red,
        };
        let paragraph = Paragraph::new(banner.text.as_str())
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, chunks[1]);
    }

    match app.current_tab() {
        Tab::Dashboard => draw_dashboard(frame, app, state, chunks[2]),
        Tab::Customers => draw_entity_tab(
            frame,
            app,
            state,
            chunks[2],
            "Customers",
            &table::render_customers(&state.customers),
        ),
        Tab::Partners => draw_entity_tab(
            frame,
            app,
            state,
            chunks[2],
            "Referral Partners",
            &table::render_partners(&state.partners),
        ),
        Tab::Loans => draw_entity_tab(
            frame,
            app,
            state,
            chunks[2],
            "Loans",
            &table::render_loans(&state.loans),
        ),
    }

    draw_footer(frame, state, chunks[3]);
}

fn draw_tabs(frame: &mut Frame, app: &UiApp, area: Rect) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.label())).collect();
    let tabs = Tabs::new(titles)
        .select(app.current_tab().index())
        .block(Block::default().borders(Borders::ALL).title(" Loan Tracker "))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_dashboard(frame: &mut Frame, app: &UiApp, state: &AppState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let totals = state.totals();
    draw_cards(frame, &totals, rows[0]);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let ctx = state.select_context();
    for (kind, panel) in [(EntityKind::Customer, panels[0]), (EntityKind::Partner, panels[1])] {
        let focused = app.active_kind() == kind;
        let title = format!(" Quick Add: {} ", app.form(kind).title());
        frame.render_widget(form_widget(app.form(kind), &ctx, focused, title), panel);
    }
}

fn draw_cards(frame: &mut Frame, totals: &DashboardTotals, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let figures = [
        ("Funded Loans", totals.funded_count.to_string()),
        ("Funded Volume", format_money(totals.funded_amount)),
        ("Commission", format_money(totals.commission)),
    ];

    for ((label, value), card) in figures.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(label));
        frame.render_widget(paragraph, *card);
    }
}

fn draw_entity_tab(
    frame: &mut Frame,
    app: &UiApp,
    state: &AppState,
    area: Rect,
    title: &str,
    rendered: &RenderedTable,
) {
    let kind = app.active_kind();
    let form = app.form(kind);
    let form_height = u16::try_from(form.fields().len() + 2).unwrap_or(u16::MAX);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(0)])
        .split(area);

    let ctx = state.select_context();
    let form_title = format!(" New {} ", form.title());
    frame.render_widget(form_widget(form, &ctx, true, form_title), rows[0]);
    frame.render_widget(table_widget(rendered, title), rows[1]);
    if let Some(placeholder) = placeholder_widget(rendered) {
        frame.render_widget(placeholder, table_body_line(rows[1]));
    }
}

/// One line per field; the focused field is highlighted
pub fn form_widget(form: &Form, ctx: &SelectContext<'_>, focused: bool, title: String) -> Paragraph<'static> {
    let lines: Vec<Line> = form
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let active = focused && form.focus() == i;
            let value = form.display_value(i, ctx);
            let value = match (field.is_select(), active) {
                (true, true) => format!("‹ {} ›", value),
                (false, true) => format!("{}▏", value),
                _ => value,
            };
            let label_style = if active {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{:<22}", field.label), label_style),
                Span::raw(value),
            ])
        })
        .collect();

    let border = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };

    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    )
}

/// ratatui table from a rendered table
///
/// Placeholder rows are left out; [`placeholder_widget`] draws the empty
/// message across the whole table body.
pub fn table_widget(rendered: &RenderedTable, title: &str) -> Table<'static> {
    let header = Row::new(rendered.headers.clone())
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let columns = rendered.headers.len().max(1);
    let rows: Vec<Row> = rendered
        .rows
        .iter()
        .filter_map(|row| match row {
            TableRow::Cells(cells) => Some(Row::new(cells.clone())),
            TableRow::Placeholder { .. } => None,
        })
        .collect();

    let ratio = u32::try_from(columns).unwrap_or(1);
    let widths = vec![Constraint::Ratio(1, ratio); columns];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)))
}

/// Empty-state message for a table, if it has one
pub fn placeholder_widget(rendered: &RenderedTable) -> Option<Paragraph<'static>> {
    rendered.rows.iter().find_map(|row| match row {
        TableRow::Placeholder { message, .. } => Some(
            Paragraph::new(message.clone())
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray)),
        ),
        TableRow::Cells(_) => None,
    })
}

/// First body line of a bordered table: inside the borders, below the header
fn table_body_line(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(2),
        width: area.width.saturating_sub(2),
        height: u16::from(area.height > 3),
    }
}

fn draw_footer(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![Span::styled(
        "Tab switch · F1-F4 jump · ↑↓ field · ←→ choose · Enter save · F5 refresh · Esc quit",
        Style::default().fg(Color::DarkGray),
    )];
    if state.loading() {
        spans.push(Span::styled(
            "  Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Loan, LoanStatus, RecordId};
    use crate::store::Banner;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &UiApp, state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app, state)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn funded_loan(amount: f64) -> Loan {
        Loan {
            id: RecordId::Int(1),
            customer_id: Some(RecordId::Int(1)),
            partner_id: None,
            amount: Some(amount),
            status: LoanStatus::Funded,
            application_date: Some("2024-01-02".to_string()),
            funded_date: None,
            commission_amount: Some(amount * 0.05),
        }
    }

    #[test]
    fn test_dashboard_cards() {
        let app = UiApp::new();
        let state = AppState {
            loans: vec![funded_loan(120_000.0)],
            ..Default::default()
        };

        let text = screen(&app, &state);
        assert!(text.contains("Funded Loans"));
        assert!(text.contains("$120,000"));
        assert!(text.contains("$6,000"));
        assert!(text.contains("Quick Add: Customer"));
        assert!(text.contains("Quick Add: Partner"));
    }

    #[test]
    fn test_customers_tab_rows_and_banner() {
        let mut app = UiApp::new();
        app.handle_key(KeyEvent::new(KeyCode::F(2), KeyModifiers::NONE), &AppState::default());

        let state = AppState {
            customers: vec![Customer {
                id: RecordId::Int(1),
                first_name: "Ann".to_string(),
                last_name: "Lee".to_string(),
                email: Some("ann@example.com".to_string()),
                phone: None,
                address: None,
                city: None,
                state: None,
                postal_code: None,
            }],
            message: Some(Banner::success("Saved successfully")),
            ..Default::default()
        };

        let text = screen(&app, &state);
        assert!(text.contains("Saved successfully"));
        assert!(text.contains("Ann"));
        assert!(text.contains("ann@example.com"));
        assert!(!text.contains("No customers yet"));
    }

    #[test]
    fn test_empty_loans_placeholder() {
        let mut app = UiApp::new();
        app.handle_key(KeyEvent::new(KeyCode::F(4), KeyModifiers::NONE), &AppState::default());

        let text = screen(&app, &AppState::default());
        assert!(text.contains("No loans yet"));
        assert!(text.contains("Select customer"));
    }

    #[test]
    fn test_placeholder_centered_across_table() {
        let mut app = UiApp::new();
        app.handle_key(KeyEvent::new(KeyCode::F(3), KeyModifiers::NONE), &AppState::default());

        let text = screen(&app, &AppState::default());
        let line = text
            .lines()
            .find(|line| line.contains("No partners yet"))
            .unwrap();
        let start = line.find("No partners yet").unwrap();
        let end = start + "No partners yet".len();

        // the first of four columns ends around x=30; centered text sits mid-screen
        assert!(start > 40, "placeholder starts at {}", start);
        assert!(end < 80, "placeholder ends at {}", end);
    }
}
