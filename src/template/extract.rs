//! Extraction of tables and plate grids from template sheets
//!
//! The functions in this module turn regions of a [`Sheet`] into keyed
//! intermediate records. They never touch the document; resolving names and
//! building entities is left to [`crate::template::resolve`] and the importer.

use indexmap::IndexMap;

use crate::prelude::DataTypes;
use crate::tabular::sheet::{cell_ref, Cell, Sheet};
use crate::template::error::TemplateError;
use crate::template::layout::{
    AliasMap, Block, CONDITIONS_ALIASES, CONDITIONS_BLOCK, DATA_TYPE_MAPPING, INFO_CREATED_ROW,
    INFO_DOI_ROW, INFO_NAME_ROW, INFO_PUBMED_ROW, INFO_URL_ROW, INFO_VALUE_COLUMN, PLATE_BLOCK,
    SPECIES_UNIT_CELL, TIMECOURSE_BLOCK, TIME_COLUMN,
};

/// A retained row of a table, holding only mapped, non-missing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    sheet: String,
    /// 0-based row of the sheet the record was read from
    pub row: usize,
    /// Field name to `(column, cell)`
    pub fields: IndexMap<&'static str, (usize, Cell)>,
}

impl TableRow {
    pub fn get(&self, field: &str) -> Option<&Cell> {
        self.fields.get(field).map(|(_, cell)| cell)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Trimmed text of a field, `None` if the field is missing.
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(Cell::as_text)
    }

    /// Trimmed text of a field that must be present.
    pub fn required_text(&self, field: &str) -> Result<String, TemplateError> {
        self.text(field).ok_or_else(|| TemplateError::MissingField {
            sheet: self.sheet.clone(),
            row: self.row + 1,
            field: field.to_string(),
        })
    }

    /// Numeric value of a field.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MalformedCell`] with the cell location if the
    /// field holds something other than a number.
    pub fn number(&self, field: &str) -> Result<Option<f64>, TemplateError> {
        match self.fields.get(field) {
            Some((col, cell)) => cell
                .as_f64()
                .map_err(|message| self.malformed(*col, message)),
            None => Ok(None),
        }
    }

    /// Numeric value of a field that must be present.
    pub fn required_number(&self, field: &str) -> Result<f64, TemplateError> {
        self.number(field)?
            .ok_or_else(|| TemplateError::MissingField {
                sheet: self.sheet.clone(),
                row: self.row + 1,
                field: field.to_string(),
            })
    }

    /// Builds a [`TemplateError::MalformedCell`] pointing at a field of this row.
    pub fn malformed_field(&self, field: &str, message: impl Into<String>) -> TemplateError {
        let col = self.fields.get(field).map_or(0, |(col, _)| *col);
        self.malformed(col, message.into())
    }

    fn malformed(&self, col: usize, message: String) -> TemplateError {
        TemplateError::MalformedCell {
            sheet: self.sheet.clone(),
            cell: cell_ref(self.row, col),
            message,
        }
    }
}

/// Rows of a table region together with the headers found above them.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet: String,
    /// Named headers in column order
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Ensures a column of the given header exists.
    pub fn require_column(&self, header: &str) -> Result<(), TemplateError> {
        if self.headers.iter().any(|h| h == header) {
            Ok(())
        } else {
            Err(TemplateError::MissingColumn {
                sheet: self.sheet.clone(),
                column: header.to_string(),
            })
        }
    }
}

/// Extracts the rows of a table region into keyed records.
///
/// Columns with an empty or whitespace-only header are ignored. A row is
/// retained if it holds at least `aliases.len() - row_tolerance` non-missing
/// values among the named columns; rows without any value are always dropped.
/// Retained rows keep only fields listed in `aliases` whose cell is not
/// missing.
///
/// # Arguments
///
/// * `sheet` - The sheet to read from
/// * `block` - Position of the header row and data rows
/// * `aliases` - Header text to field name
/// * `row_tolerance` - Number of mapped fields a row may leave blank
pub fn extract_table(
    sheet: &Sheet,
    block: &Block,
    aliases: AliasMap,
    row_tolerance: usize,
) -> Table {
    let named: Vec<(usize, String)> = block
        .column_range(sheet)
        .filter_map(|col| {
            sheet
                .cell(block.header_row, col)
                .as_text()
                .map(|header| (col, header))
        })
        .collect();

    let threshold = aliases.len().saturating_sub(row_tolerance);
    let mut rows = Vec::new();

    for row in block.data_rows(sheet) {
        let present = named
            .iter()
            .filter(|(col, _)| !sheet.cell(row, *col).is_missing())
            .count();

        if present == 0 {
            continue;
        }

        if present < threshold {
            log::debug!(
                "Dropping row {} of sheet '{}': {} of {} required values present",
                row + 1,
                sheet.name,
                present,
                threshold
            );
            continue;
        }

        let fields = named
            .iter()
            .filter_map(|(col, header)| {
                let (_, field) = aliases.iter().find(|(alias, _)| alias == header)?;
                let cell = sheet.cell(row, *col);
                (!cell.is_missing()).then(|| (*field, (*col, cell.clone())))
            })
            .collect();

        rows.push(TableRow {
            sheet: sheet.name.clone(),
            row,
            fields,
        });
    }

    Table {
        sheet: sheet.name.clone(),
        headers: named.into_iter().map(|(_, header)| header).collect(),
        rows,
    }
}

/// Flattens the 8 x 12 plate grid of a sheet into well label to value.
///
/// Keys are `{row label}{column label}` in row-major order. Missing cells are
/// omitted rather than filled. Column labels default to the 1-based column
/// number if the header cell is blank.
///
/// # Errors
///
/// Returns [`TemplateError::MalformedCell`] if a cell holds non-numeric text,
/// a row holds values without a row label or a row and column label pair
/// names the same well twice.
pub fn extract_plate_grid(sheet: &Sheet) -> Result<IndexMap<String, f64>, TemplateError> {
    let columns: Vec<(usize, String)> = PLATE_BLOCK
        .column_range(sheet)
        .skip(1)
        .map(|col| {
            let label = sheet
                .cell(PLATE_BLOCK.header_row, col)
                .as_text()
                .unwrap_or_else(|| col.to_string());
            (col, label)
        })
        .collect();

    let mut grid = IndexMap::new();

    for row in PLATE_BLOCK.data_rows(sheet) {
        let label = sheet.cell(row, 0).as_text();

        for (col, col_label) in columns.iter() {
            let value = sheet
                .cell(row, *col)
                .as_f64()
                .map_err(|message| TemplateError::MalformedCell {
                    sheet: sheet.name.clone(),
                    cell: cell_ref(row, *col),
                    message,
                })?;

            let Some(value) = value else {
                continue;
            };

            let Some(label) = label.as_deref() else {
                return Err(TemplateError::MalformedCell {
                    sheet: sheet.name.clone(),
                    cell: cell_ref(row, 0),
                    message: "plate row holds values but has no row label".to_string(),
                });
            };

            let well = format!("{label}{col_label}");
            if grid.contains_key(&well) {
                return Err(TemplateError::MalformedCell {
                    sheet: sheet.name.clone(),
                    cell: cell_ref(row, *col),
                    message: format!("well '{well}' appears more than once in the plate grid"),
                });
            }
            grid.insert(well, value);
        }
    }

    Ok(grid)
}

/// Reads the concentration unit of a species sheet.
pub fn extract_species_unit(sheet: &Sheet) -> Option<String> {
    let (row, col) = SPECIES_UNIT_CELL;
    sheet.cell(row, col).as_text()
}

/// Document header values of the general information sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralInfo {
    pub name: Option<String>,
    pub created: Option<String>,
    pub doi: Option<String>,
    pub pubmedid: Option<String>,
    pub url: Option<String>,
}

/// Reads the document header block.
pub fn extract_general_info(sheet: &Sheet) -> GeneralInfo {
    let value = |row: usize| sheet.cell(row, INFO_VALUE_COLUMN).as_text();

    GeneralInfo {
        name: value(INFO_NAME_ROW),
        created: value(INFO_CREATED_ROW),
        doi: value(INFO_DOI_ROW),
        pubmedid: value(INFO_PUBMED_ROW),
        url: value(INFO_URL_ROW),
    }
}

/// Measurement conditions declared above the time-course table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementConditions {
    /// Name of the readout reactant
    pub reactant: String,
    pub data_type: DataTypes,
    pub time_unit: String,
    pub temperature: Option<f64>,
    /// Raw temperature unit, not yet normalised
    pub temperature_unit: Option<String>,
}

/// Reads the measurement conditions of the data sheet.
///
/// # Errors
///
/// * [`TemplateError::MissingField`] - Reactant, data type or time unit are blank
/// * [`TemplateError::MalformedCell`] - The data type is unknown or the temperature is not a number
pub fn extract_conditions(sheet: &Sheet) -> Result<MeasurementConditions, TemplateError> {
    let table = extract_table(
        sheet,
        &CONDITIONS_BLOCK,
        CONDITIONS_ALIASES,
        CONDITIONS_ALIASES.len(),
    );
    table.require_column("Reactant")?;

    let row = table
        .rows
        .first()
        .ok_or_else(|| TemplateError::MissingField {
            sheet: sheet.name.clone(),
            row: CONDITIONS_BLOCK.header_row + 2,
            field: "reactant".to_string(),
        })?;

    let data_type_label = row.required_text("data_type")?;
    let data_type = DATA_TYPE_MAPPING
        .get(data_type_label.as_str())
        .copied()
        .ok_or_else(|| {
            row.malformed_field(
                "data_type",
                format!("unknown data type '{data_type_label}'"),
            )
        })?;

    Ok(MeasurementConditions {
        reactant: row.required_text("reactant")?,
        data_type,
        time_unit: row.required_text("time_unit")?,
        temperature: row.number("temperature")?,
        temperature_unit: row.text("temperature_unit"),
    })
}

/// Wide time-course table: one shared time axis and one column per well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeCourse {
    pub time: Vec<f64>,
    /// Well label to values aligned with `time`
    pub wells: IndexMap<String, Vec<Option<f64>>>,
}

impl TimeCourse {
    /// Returns the time points and values of a well, dropping time points
    /// without a value.
    pub fn series(&self, well: &str) -> Option<(Vec<f64>, Vec<f64>)> {
        let values = self.wells.get(well)?;
        let (time, data) = self
            .time
            .iter()
            .zip(values)
            .filter_map(|(t, value)| value.map(|v| (*t, v)))
            .unzip();

        Some((time, data))
    }
}

/// Reads the time-course table of the data sheet.
///
/// Rows without a time value are skipped.
///
/// # Errors
///
/// * [`TemplateError::MissingColumn`] - The table has no `Time` column
/// * [`TemplateError::MalformedCell`] - A time or data cell is not a number, or
///   a well label heads more than one column
pub fn extract_timecourse(sheet: &Sheet) -> Result<TimeCourse, TemplateError> {
    let header_row = TIMECOURSE_BLOCK.header_row;
    let mut time_col = None;
    let mut well_cols = Vec::new();

    for col in TIMECOURSE_BLOCK.column_range(sheet) {
        match sheet.cell(header_row, col).as_text() {
            Some(header) if header == TIME_COLUMN => time_col = Some(col),
            Some(header) if well_cols.iter().any(|(_, well)| *well == header) => {
                return Err(TemplateError::MalformedCell {
                    sheet: sheet.name.clone(),
                    cell: cell_ref(header_row, col),
                    message: format!("duplicate well column '{header}'"),
                });
            }
            Some(header) => well_cols.push((col, header)),
            None => {}
        }
    }

    let time_col = time_col.ok_or_else(|| TemplateError::MissingColumn {
        sheet: sheet.name.clone(),
        column: TIME_COLUMN.to_string(),
    })?;

    let number = |row: usize, col: usize| {
        sheet
            .cell(row, col)
            .as_f64()
            .map_err(|message| TemplateError::MalformedCell {
                sheet: sheet.name.clone(),
                cell: cell_ref(row, col),
                message,
            })
    };

    let mut course = TimeCourse {
        time: Vec::new(),
        wells: well_cols
            .iter()
            .map(|(_, well)| (well.clone(), Vec::new()))
            .collect(),
    };

    for row in TIMECOURSE_BLOCK.data_rows(sheet) {
        let Some(time) = number(row, time_col)? else {
            log::debug!("Skipping row {} of sheet '{}' without time", row + 1, sheet.name);
            continue;
        };

        course.time.push(time);
        for (col, well) in well_cols.iter() {
            let value = number(row, *col)?;
            if let Some(values) = course.wells.get_mut(well) {
                values.push(value);
            }
        }
    }

    Ok(course)
}
