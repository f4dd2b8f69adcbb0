//! Rectangular named-column tables built from HTML `<table>` elements

use scraper::ElementRef;
use serde::Serialize;
use std::ops::Range;

/// Row-oriented table; every row has exactly `columns.len()` cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Table { columns, rows }
    }

    /// Convert an HTML table.
    ///
    /// Header rows are the `<thead>` rows, or without a thead the leading rows
    /// made only of `<th>` cells. Multi-row headers are joined per column and
    /// `colspan` cells are repeated across the columns they span.
    pub fn from_element(table: &ElementRef) -> Self {
        let mut header_rows: Vec<Vec<String>> = Vec::new();
        let mut body_rows: Vec<Vec<String>> = Vec::new();
        let rows = own_rows(table);
        let has_thead = rows.iter().any(|(_, in_thead)| *in_thead);

        for (row, in_thead) in rows {
            let cells = row_cells(&row);
            let is_header = if has_thead {
                in_thead
            } else {
                body_rows.is_empty() && !cells.is_empty() && cells.iter().all(|(th, _)| *th)
            };

            let texts = cells.into_iter().map(|(_, text)| text).collect();
            if is_header {
                header_rows.push(texts);
            } else {
                body_rows.push(texts);
            }
        }

        let width = header_rows
            .iter()
            .chain(body_rows.iter())
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        let columns = (0..width)
            .map(|i| column_name(&header_rows, i))
            .collect();

        Table::new(columns, body_rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// All values of one column, top to bottom
    pub fn column(&self, column: &str) -> Option<Vec<&str>> {
        let idx = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Copy of a row range; the range is clamped to the rows present
    pub fn slice_rows(&self, range: Range<usize>) -> Table {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    /// Keep the leading columns and rename them
    pub fn with_columns(&self, names: &[&str]) -> Table {
        Table::new(
            names.iter().map(|n| n.to_string()).collect(),
            self.rows
                .iter()
                .map(|r| r.iter().take(names.len()).cloned().collect())
                .collect(),
        )
    }
}

/// Rows belonging to this table, not to tables nested in its cells,
/// paired with whether they sit in the `<thead>`
fn own_rows<'a>(table: &ElementRef<'a>) -> Vec<(ElementRef<'a>, bool)> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push((child, false)),
            section @ ("thead" | "tbody" | "tfoot") => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr")
                    .map(|tr| (tr, section == "thead")),
            ),
            _ => {}
        }
    }
    rows
}

/// Direct `th`/`td` children of a row, expanded by colspan
fn row_cells(row: &ElementRef) -> Vec<(bool, String)> {
    let mut cells = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        let is_th = match cell.value().name() {
            "th" => true,
            "td" => false,
            _ => continue,
        };
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let text = normalize_text(cell.text());
        for _ in 0..span {
            cells.push((is_th, text.clone()));
        }
    }
    cells
}

fn column_name(header_rows: &[Vec<String>], idx: usize) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for label in header_rows.iter().filter_map(|r| r.get(idx)) {
        if !label.is_empty() && parts.last() != Some(&label.as_str()) {
            parts.push(label);
        }
    }
    if parts.is_empty() {
        format!("col_{}", idx)
    } else {
        parts.join(" ")
    }
}

/// Join text fragments and collapse whitespace runs
pub(crate) fn normalize_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    fragments
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
