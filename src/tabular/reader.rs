//! Reading workbooks from spreadsheet files
//!
//! Sheets are loaded with `calamine` into the in-memory [`Workbook`] model.
//! Cells keep their absolute positions, so a sheet whose first used cell is
//! `C3` still has that cell at row 2, column 2.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};

use crate::tabular::sheet::{Cell, Sheet, Workbook};
use crate::template::error::TemplateError;

/// Reads all sheets of an `.xlsx`, `.xlsm`, `.xls` or `.ods` file.
///
/// # Arguments
///
/// * `path` - The path to the spreadsheet file.
///
/// # Returns
///
/// Returns the workbook with one [`Sheet`] per worksheet, in file order.
///
/// # Errors
///
/// Returns [`TemplateError::Workbook`] if the file cannot be opened or a
/// sheet cannot be read.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Workbook, TemplateError> {
    let path = path.as_ref();
    let mut source = open_workbook_auto(path)?;
    let mut workbook = Workbook::new();

    for name in source.sheet_names() {
        let range = source.worksheet_range(&name)?;
        workbook.add_sheet(sheet_from_range(&name, &range));
    }

    log::debug!(
        "Read {} sheet(s) from {}",
        workbook.sheets().count(),
        path.display()
    );

    Ok(workbook)
}

/// Converts a calamine range into a [`Sheet`] with absolute positions.
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    for (row, col, data) in range.used_cells() {
        sheet.set(row_offset + row, col_offset + col, cell_from_data(data));
    }

    sheet
}

/// Converts a calamine cell value into a [`Cell`].
///
/// Dates are rendered as `YYYY-MM-DD`. Cell errors such as `#DIV/0!` become
/// text, so that numeric fields holding them are reported as malformed.
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::String(value) => Cell::Text(value.clone()),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(_) => match data.as_datetime() {
            Some(datetime) => Cell::Text(datetime.format("%Y-%m-%d").to_string()),
            None => Cell::Text(data.to_string()),
        },
        Data::DateTimeIso(value) | Data::DurationIso(value) => Cell::Text(value.clone()),
        Data::Error(error) => Cell::Text(error.to_string()),
        Data::Empty => Cell::Empty,
    }
}
