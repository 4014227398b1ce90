//! Table rendering
//!
//! Turns a list of records plus column descriptors into rows of display
//! strings. The output is frontend-agnostic: the CLI prints it as aligned
//! text and the TUI converts it into a ratatui table.

use serde::Serialize;
use serde_json::Value;

use crate::dashboard::format_money;
use crate::models::{Customer, Loan, Partner};

/// Formats one field value for display
pub type RenderFn = fn(&Value) -> String;

/// Column descriptor
#[derive(Clone, Copy)]
pub struct Column {
    /// Field name looked up on each record
    pub key: &'static str,
    /// Header text
    pub label: &'static str,
    /// Custom formatter; raw value is shown when absent
    pub render: Option<RenderFn>,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            render: None,
        }
    }

    pub const fn with_render(mut self, render: RenderFn) -> Self {
        self.render = Some(render);
        self
    }
}

impl std::fmt::Debug for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("render", &self.render.is_some())
            .finish()
    }
}

/// One rendered body row
#[derive(Debug, Clone, PartialEq)]
pub enum TableRow {
    /// One display string per column
    Cells(Vec<String>),
    /// Single cell spanning `span` columns, used when there are no records
    Placeholder { span: usize, message: String },
}

/// Rendered table: header labels plus body rows
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl RenderedTable {
    /// Plain-text rendering with columns padded to their widest cell
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            if let TableRow::Cells(cells) = row {
                for (width, cell) in widths.iter_mut().zip(cells) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        out.push_str(&join_padded(&self.headers, &widths));
        out.push('\n');
        let total: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1) * 3;
        out.push_str(&"-".repeat(total));
        out.push('\n');

        for row in &self.rows {
            match row {
                TableRow::Cells(cells) => out.push_str(&join_padded(cells, &widths)),
                TableRow::Placeholder { message, .. } => {
                    let pad = total.saturating_sub(message.chars().count()) / 2;
                    out.push_str(&" ".repeat(pad));
                    out.push_str(message);
                }
            }
            out.push('\n');
        }

        out
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

/// Columns plus the message shown when there is nothing to list
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub columns: Vec<Column>,
    pub empty: &'static str,
}

impl TableSpec {
    pub fn new(columns: Vec<Column>, empty: &'static str) -> Self {
        Self { columns, empty }
    }

    /// Render records into display rows
    pub fn render<T: Serialize>(&self, records: &[T]) -> RenderedTable {
        let headers = self.columns.iter().map(|c| c.label.to_string()).collect();

        let rows = if records.is_empty() {
            vec![TableRow::Placeholder {
                span: self.columns.len(),
                message: self.empty.to_string(),
            }]
        } else {
            records
                .iter()
                .map(|record| {
                    let value = serde_json::to_value(record).unwrap_or(Value::Null);
                    TableRow::Cells(self.columns.iter().map(|c| render_cell(c, &value)).collect())
                })
                .collect()
        };

        RenderedTable { headers, rows }
    }
}

fn render_cell(column: &Column, record: &Value) -> String {
    let field = record.get(column.key).unwrap_or(&Value::Null);
    match column.render {
        Some(render) => render(field),
        None => raw_display(field),
    }
}

/// Display a JSON value the way it would appear unformatted
pub fn raw_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < 1e15)
            .map(|f| format!("{}", f as i64))
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

fn render_money(value: &Value) -> String {
    format_money(value.as_f64().unwrap_or(0.0))
}

/// Customers tab columns
pub fn customer_table() -> TableSpec {
    TableSpec::new(
        vec![
            Column::new("first_name", "First"),
            Column::new("last_name", "Last"),
            Column::new("email", "Email"),
            Column::new("phone", "Phone"),
        ],
        "No customers yet",
    )
}

/// Partners tab columns
pub fn partner_table() -> TableSpec {
    TableSpec::new(
        vec![
            Column::new("name", "Name"),
            Column::new("contact_name", "Contact"),
            Column::new("email", "Email"),
            Column::new("commission_rate", "Rate (%)"),
        ],
        "No partners yet",
    )
}

/// Loans tab columns
pub fn loan_table() -> TableSpec {
    TableSpec::new(
        vec![
            Column::new("status", "Status"),
            Column::new("amount", "Amount").with_render(render_money),
            Column::new("commission_amount", "Commission").with_render(render_money),
            Column::new("application_date", "Applied"),
            Column::new("funded_date", "Funded"),
        ],
        "No loans yet",
    )
}

pub fn render_customers(customers: &[Customer]) -> RenderedTable {
    customer_table().render(customers)
}

pub fn render_partners(partners: &[Partner]) -> RenderedTable {
    partner_table().render(partners)
}

pub fn render_loans(loans: &[Loan]) -> RenderedTable {
    loan_table().render(loans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_columns() -> TableSpec {
        TableSpec::new(
            vec![Column::new("a", "A"), Column::new("b", "B")],
            "Nothing here",
        )
    }

    #[test]
    fn test_empty_renders_single_placeholder() {
        let table = two_columns().render::<Value>(&[]);

        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(
            table.rows,
            vec![TableRow::Placeholder {
                span: 2,
                message: "Nothing here".to_string()
            }]
        );
    }

    #[test]
    fn test_one_row_per_record_one_cell_per_column() {
        let records = vec![json!({"a": 1, "b": "x"}), json!({"a": 2}), json!({"b": "z"})];
        let table = two_columns().render(&records);

        assert_eq!(table.rows.len(), 3);
        for row in &table.rows {
            match row {
                TableRow::Cells(cells) => assert_eq!(cells.len(), 2),
                other => panic!("unexpected row {:?}", other),
            }
        }
        assert_eq!(table.rows[1], TableRow::Cells(vec!["2".into(), "".into()]));
    }

    #[test]
    fn test_render_function_applied() {
        let spec = TableSpec::new(
            vec![
                Column::new("amount", "Amount").with_render(render_money),
                Column::new("amount", "Raw"),
            ],
            "",
        );
        let table = spec.render(&[json!({"amount": 12500.5})]);
        assert_eq!(
            table.rows[0],
            TableRow::Cells(vec!["$12,500.5".into(), "12500.5".into()])
        );
    }

    #[test]
    fn test_money_render_treats_missing_as_zero() {
        let table = loan_table().render(&[json!({"status": "applied"})]);
        match &table.rows[0] {
            TableRow::Cells(cells) => {
                assert_eq!(cells[0], "applied");
                assert_eq!(cells[1], "$0");
                assert_eq!(cells[2], "$0");
                assert_eq!(cells[3], "");
            }
            other => panic!("unexpected row {:?}", other),
        }
    }

    #[test]
    fn test_loans_table_shows_unrecognised_status_verbatim() {
        let loans: Vec<Loan> =
            serde_json::from_value(json!([{"id": 9, "status": "withdrawn", "amount": "1200.00"}])).unwrap();
        let table = render_loans(&loans);
        assert_eq!(
            table.rows[0],
            TableRow::Cells(vec![
                "withdrawn".into(),
                "$1,200".into(),
                "$0".into(),
                "".into(),
                "".into()
            ])
        );
    }

    #[test]
    fn test_raw_display() {
        assert_eq!(raw_display(&json!(null)), "");
        assert_eq!(raw_display(&json!(5.0)), "5");
        assert_eq!(raw_display(&json!(7.25)), "7.25");
        assert_eq!(raw_display(&json!("Ann")), "Ann");
    }

    #[test]
    fn test_to_text() {
        let table = two_columns().render(&[json!({"a": "Ann", "b": "Lee"})]);
        let text = table.to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "A   | B");
        assert_eq!(lines[2], "Ann | Lee");

        let empty = two_columns().render::<Value>(&[]).to_text();
        assert!(empty.contains("Nothing here"));
    }
}
