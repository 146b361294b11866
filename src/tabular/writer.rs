//! Writing workbooks to spreadsheet files
//!
//! Any in-memory [`Workbook`] can be written to `.xlsx`. Sheets of the plate
//! template get their header rows highlighted and their plate grids
//! restricted to non-negative numbers, so that a blank template produced by
//! [`blank_template`] can be handed out for filling in.

use std::path::Path;

use rust_xlsxwriter::{
    DataValidation, DataValidationErrorStyle, DataValidationRule, Format, FormatAlign,
    FormatBorder, Workbook as XlsxWorkbook, Worksheet,
};

use crate::tabular::sheet::{Cell, Sheet, Workbook};
use crate::template::error::TemplateError;
use crate::template::layout::{
    blank_template, CHEMICALS_SHEET, CONDITIONS_BLOCK, CREATORS_BLOCK, DATA_SHEET,
    GENERAL_INFO_SHEET, PLATE_BLOCK, PLATE_COLUMNS, PLATE_ROWS, PROTEINS_SHEET, REACTIONS_SHEET,
    TIMECOURSE_BLOCK, VESSEL_BLOCK,
};

/// Error message for data validation
const ERROR_MESSAGE: &str = "Only positive numbers are allowed in this cell.";

/// Default column width
const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

/// Border color for cells
const BORDER_COLOR: u32 = 0xB0B0B0;

/// Header background color
const HEADER_BG_COLOR: u32 = 0xD9EAD3;

/// Writes a workbook to an `.xlsx` file.
///
/// # Arguments
///
/// * `workbook` - The workbook to write
/// * `path` - Path of the file to create
///
/// # Errors
///
/// Returns [`TemplateError::Xlsx`] if a sheet name is invalid or the file
/// cannot be written.
pub fn write_workbook(workbook: &Workbook, path: impl AsRef<Path>) -> Result<(), TemplateError> {
    let mut xlsx = XlsxWorkbook::new();

    for sheet in workbook.sheets() {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_sheet(sheet, worksheet)?;
    }

    xlsx.save(path.as_ref())?;
    log::info!("Wrote workbook to {}", path.as_ref().display());

    Ok(())
}

/// Writes a blank plate template for the given species to an `.xlsx` file.
pub fn write_blank_template(
    path: impl AsRef<Path>,
    proteins: &[&str],
    reactants: &[&str],
) -> Result<(), TemplateError> {
    write_workbook(&blank_template(proteins, reactants), path)
}

fn write_sheet(sheet: &Sheet, worksheet: &mut Worksheet) -> Result<(), TemplateError> {
    let headers = header_rows(&sheet.name);
    let header_format = get_header_format();

    for (row, col, cell) in sheet.cells() {
        let (row_idx, col_idx) = (row as u32, col as u16);
        let is_header = headers.contains(&row);

        match (cell, is_header) {
            (Cell::Number(value), true) => {
                worksheet.write_number_with_format(row_idx, col_idx, *value, &header_format)?
            }
            (Cell::Number(value), false) => worksheet.write_number(row_idx, col_idx, *value)?,
            (Cell::Bool(value), _) => worksheet.write_boolean(row_idx, col_idx, *value)?,
            (cell, true) => worksheet.write_string_with_format(
                row_idx,
                col_idx,
                cell.to_string(),
                &header_format,
            )?,
            (cell, false) => worksheet.write_string(row_idx, col_idx, cell.to_string())?,
        };
    }

    for col in 0..sheet.width().max(1) {
        worksheet.set_column_width(col as u16, DEFAULT_COLUMN_WIDTH)?;
    }

    if is_plate_sheet(&sheet.name) {
        add_plate_validation(worksheet)?;
    }

    Ok(())
}

/// Rows holding column headers on the sheets of the template.
fn header_rows(name: &str) -> Vec<usize> {
    match name {
        GENERAL_INFO_SHEET => vec![CREATORS_BLOCK.header_row, VESSEL_BLOCK.header_row],
        PROTEINS_SHEET | CHEMICALS_SHEET | REACTIONS_SHEET => vec![2],
        DATA_SHEET => vec![CONDITIONS_BLOCK.header_row, TIMECOURSE_BLOCK.header_row],
        _ => vec![PLATE_BLOCK.header_row],
    }
}

fn is_plate_sheet(name: &str) -> bool {
    ![
        GENERAL_INFO_SHEET,
        PROTEINS_SHEET,
        CHEMICALS_SHEET,
        REACTIONS_SHEET,
        DATA_SHEET,
    ]
    .contains(&name)
}

/// Restricts the plate grid to non-negative numbers
fn add_plate_validation(worksheet: &mut Worksheet) -> Result<(), TemplateError> {
    let validation = DataValidation::new()
        .allow_decimal_number(DataValidationRule::GreaterThanOrEqualTo(0.0))
        .ignore_blank(true)
        .set_error_style(DataValidationErrorStyle::Stop)
        .set_error_title("Invalid input")?
        .set_error_message(ERROR_MESSAGE)?;

    let first_row = (PLATE_BLOCK.header_row + 1) as u32;
    let last_row = first_row + PLATE_ROWS.len() as u32 - 1;
    worksheet.add_data_validation(first_row, 1, last_row, PLATE_COLUMNS as u16, &validation)?;

    Ok(())
}

/// Returns a format for header cells
fn get_header_format() -> Format {
    Format::new()
        .set_background_color(HEADER_BG_COLOR)
        .set_bold()
        .set_border_left(FormatBorder::Thin)
        .set_border_left_color(BORDER_COLOR)
        .set_border_right(FormatBorder::Thin)
        .set_border_right_color(BORDER_COLOR)
        .set_border_top(FormatBorder::Thin)
        .set_border_top_color(BORDER_COLOR)
        .set_border_bottom(FormatBorder::Double)
        .set_border_bottom_color(BORDER_COLOR)
        .set_align(FormatAlign::Center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_rows() {
        assert_eq!(header_rows(GENERAL_INFO_SHEET), vec![9, 18]);
        assert_eq!(header_rows(DATA_SHEET), vec![2, 4]);
        assert_eq!(header_rows("ABTS"), vec![3]);
    }

    #[test]
    fn test_plate_sheets() {
        assert!(is_plate_sheet("ABTS"));
        assert!(is_plate_sheet("pH"));
        assert!(!is_plate_sheet(REACTIONS_SHEET));
    }

    #[test]
    fn test_invalid_sheet_name() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut workbook = Workbook::new();
        workbook.sheet_mut("Invalid [name]");

        let result = write_workbook(&workbook, dir.path().join("invalid.xlsx"));
        assert!(matches!(result, Err(TemplateError::Xlsx(_))));
    }
}
