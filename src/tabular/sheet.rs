//! In-memory worksheet model
//!
//! The template importer operates on a [`Workbook`] of [`Sheet`]s rather than
//! on a spreadsheet file directly. Workbooks are either loaded from disk
//! (see [`crate::tabular::reader`]) or assembled in code.
//!
//! Rows and columns are 0-based and absolute, i.e. row 0 / column 0 is cell
//! `A1` of the sheet regardless of where its data starts.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::template::error::TemplateError;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Whether the cell counts as missing.
    ///
    /// Empty cells, whitespace-only strings, `NaN` numbers and the textual
    /// sentinel `nan` are all missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(value) => value.is_nan(),
            Cell::Text(text) => {
                let text = text.trim();
                text.is_empty() || text.eq_ignore_ascii_case("nan")
            }
            Cell::Bool(_) => false,
        }
    }

    /// Returns the trimmed text of the cell, or `None` if it is missing.
    ///
    /// Numbers are rendered without a trailing `.0` when integral, which
    /// keeps identifiers such as PubMed IDs stable.
    pub fn as_text(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }

        match self {
            Cell::Text(text) => Some(text.trim().to_string()),
            Cell::Number(value) => Some(format_number(*value)),
            Cell::Bool(value) => Some(value.to_string()),
            Cell::Empty => None,
        }
    }

    /// Returns the numeric value of the cell.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The cell is missing
    /// * `Ok(Some(value))` - The cell holds a number or numeric text
    /// * `Err(message)` - The cell holds something that is not a number
    pub fn as_f64(&self) -> Result<Option<f64>, String> {
        if self.is_missing() {
            return Ok(None);
        }

        match self {
            Cell::Number(value) => Ok(Some(*value)),
            Cell::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("expected a number, found '{}'", text.trim())),
            Cell::Bool(value) => Err(format!("expected a number, found '{value}'")),
            Cell::Empty => Ok(None),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, ""),
            Cell::Number(value) => write!(f, "{}", format_number(*value)),
            Cell::Text(text) => write!(f, "{text}"),
            Cell::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

/// A named, ragged grid of cells.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Returns the cell at the given position. Cells outside of the written
    /// area are [`Cell::Empty`].
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(EMPTY)
    }

    /// Writes a cell, growing the grid as needed.
    pub fn set(&mut self, row: usize, col: usize, value: impl Into<Cell>) -> &mut Self {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }

        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, Cell::Empty);
        }

        cells[col] = value.into();
        self
    }

    /// Writes consecutive cells of one row, starting at `col`.
    pub fn set_row<I, C>(&mut self, row: usize, col: usize, values: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        for (offset, value) in values.into_iter().enumerate() {
            self.set(row, col + offset, value);
        }
        self
    }

    /// Number of rows up to and including the last written row.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Iterates over all non-missing cells as `(row, col, cell)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_missing())
                .map(move |(col, cell)| (row, col, cell))
        })
    }
}

/// An ordered collection of sheets, addressed by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Workbook {
    sheets: IndexMap<String, Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, replacing any sheet of the same name.
    pub fn add_sheet(&mut self, sheet: Sheet) -> &mut Self {
        self.sheets.insert(sheet.name.clone(), sheet);
        self
    }

    /// Returns the sheet of the given name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingSheet`] if no such sheet exists.
    pub fn sheet(&self, name: &str) -> Result<&Sheet, TemplateError> {
        self.sheets
            .get(name)
            .ok_or_else(|| TemplateError::MissingSheet(name.to_string()))
    }

    /// Returns a mutable reference to the sheet, creating it if absent.
    pub fn sheet_mut(&mut self, name: &str) -> &mut Sheet {
        self.sheets
            .entry(name.to_string())
            .or_insert_with(|| Sheet::new(name))
    }

    /// Removes a sheet, keeping the order of the remaining ones.
    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        self.sheets.shift_remove(name)
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn sheets(&self) -> impl Iterator<Item = &Sheet> {
        self.sheets.values()
    }
}

/// Converts a 0-based `(row, col)` position into A1 notation.
pub fn cell_ref(row: usize, col: usize) -> String {
    format!("{}{}", column_name(col), row + 1)
}

/// Converts a 0-based column index into its spreadsheet letters (`0` -> `A`,
/// `26` -> `AA`).
pub fn column_name(col: usize) -> String {
    let mut letters = Vec::new();
    let mut index = col + 1;

    while index > 0 {
        let rem = (index - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        index = (index - 1) / 26;
    }

    letters.iter().rev().collect()
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
