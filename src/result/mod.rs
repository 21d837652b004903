use crate::core::{DaoError, Result, Row, Value};
use serde::Serialize;
use std::io::{self, Write};

/// Rows produced by a SELECT, with their column labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_labels(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in the row at `row`, by label.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|label| label == column)?;
        self.rows.get(row)?.get(idx)
    }

    /// One tab-joined line per row.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DaoError::ExecutionError(format!("Failed to encode result: {}", e)))
    }

    /// Writes the labels row, a separator and one aligned line per row.
    pub fn write_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.columns.is_empty() {
            return writeln!(out, "Empty result set");
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(value.to_string().len());
                }
            }
        }

        let header: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{:width$}", col, width = widths[i]))
            .collect();
        writeln!(out, "{}", header.join(" | "))?;

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-");
        writeln!(out, "{}", separator)?;

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, val)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    format!("{:width$}", val.to_string(), width = width)
                })
                .collect();
            writeln!(out, "{}", line.join(" | "))?;
        }

        writeln!(out, "\n{} row(s)", self.rows.len())
    }

    pub fn print(&self) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        let _ = self.write_table(&mut handle);
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
