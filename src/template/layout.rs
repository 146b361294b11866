//! Layout of the 96-well plate template
//!
//! The positions below are a fixed contract of the spreadsheet template. All
//! rows and columns are 0-based and absolute. A [`Block`] names the row that
//! holds the column headers; its data rows follow directly below.

use std::collections::HashMap;

use crate::prelude::DataTypes;
use crate::tabular::sheet::{Sheet, Workbook};

pub const GENERAL_INFO_SHEET: &str = "General Information";
pub const PROTEINS_SHEET: &str = "Proteins";
pub const CHEMICALS_SHEET: &str = "Chemicals";
pub const REACTIONS_SHEET: &str = "Reactions";
pub const DATA_SHEET: &str = "Data";
pub const PH_SHEET: &str = "pH";

/// Column of the general information sheet holding the document header values
pub const INFO_VALUE_COLUMN: usize = 1;
pub const INFO_NAME_ROW: usize = 2;
pub const INFO_CREATED_ROW: usize = 3;
pub const INFO_DOI_ROW: usize = 4;
pub const INFO_PUBMED_ROW: usize = 5;
pub const INFO_URL_ROW: usize = 6;

/// Cell of a species sheet holding the concentration unit
pub const SPECIES_UNIT_CELL: (usize, usize) = (2, 3);

/// Header of the time column of the time-course table
pub const TIME_COLUMN: &str = "Time";

/// A rectangular table region: one header row followed by data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Row holding the column headers
    pub header_row: usize,
    /// Number of data rows below the header. `None` reads to the end of the sheet.
    pub nrows: Option<usize>,
    /// Half-open column range `(start, end)`. `None` reads all columns.
    pub columns: Option<(usize, usize)>,
}

impl Block {
    /// Rows holding data, clamped to the height of the sheet.
    pub fn data_rows(&self, sheet: &Sheet) -> std::ops::Range<usize> {
        let start = self.header_row + 1;
        let end = match self.nrows {
            Some(nrows) => (start + nrows).min(sheet.height()),
            None => sheet.height(),
        };
        start..end.max(start)
    }

    /// Columns of the block, clamped to the width of the sheet.
    pub fn column_range(&self, sheet: &Sheet) -> std::ops::Range<usize> {
        match self.columns {
            Some((start, end)) => start..end.min(sheet.width()).max(start),
            None => 0..sheet.width(),
        }
    }
}

pub const CREATORS_BLOCK: Block = Block {
    header_row: 9,
    nrows: Some(8),
    columns: None,
};

pub const VESSEL_BLOCK: Block = Block {
    header_row: 18,
    nrows: Some(2),
    columns: None,
};

pub const PROTEINS_BLOCK: Block = Block {
    header_row: 2,
    nrows: None,
    columns: None,
};

/// Columns A:E
pub const CHEMICALS_BLOCK: Block = Block {
    header_row: 2,
    nrows: None,
    columns: Some((0, 5)),
};

/// Columns A:J
pub const REACTIONS_BLOCK: Block = Block {
    header_row: 2,
    nrows: None,
    columns: Some((0, 10)),
};

/// Measurement conditions of the data sheet, columns A:E
pub const CONDITIONS_BLOCK: Block = Block {
    header_row: 2,
    nrows: Some(1),
    columns: Some((0, 5)),
};

pub const TIMECOURSE_BLOCK: Block = Block {
    header_row: 4,
    nrows: None,
    columns: None,
};

/// 8 x 12 plate grid with row labels in column A, columns A:M
pub const PLATE_BLOCK: Block = Block {
    header_row: 3,
    nrows: Some(8),
    columns: Some((0, 13)),
};

/// Maps sheet column headers to record field names.
pub type AliasMap = &'static [(&'static str, &'static str)];

pub const CREATOR_ALIASES: AliasMap = &[
    ("Given Name", "given_name"),
    ("Family Name", "family_name"),
    ("Mail", "mail"),
];

pub const VESSEL_ALIASES: AliasMap = &[
    ("ID", "id"),
    ("Name", "name"),
    ("Volume value", "volume"),
    ("Volume unit", "unit"),
];

pub const PROTEIN_ALIASES: AliasMap = &[
    ("Name", "name"),
    ("Sequence", "sequence"),
    ("Vessel", "vessel_id"),
    ("Constant", "constant"),
    ("EC Number", "ecnumber"),
    ("Source organism", "organism"),
    ("UniProt ID", "uniprotid"),
];

pub const REACTANT_ALIASES: AliasMap = &[
    ("Name", "name"),
    ("Vessel", "vessel_id"),
    ("Constant", "constant"),
    ("SMILES", "smiles"),
    ("InCHI", "inchi"),
];

pub const REACTION_ALIASES: AliasMap = &[
    ("Name", "name"),
    ("Temperature value", "temperature"),
    ("Temperature unit", "temperature_unit"),
    ("pH value", "ph"),
    ("Reversible", "reversible"),
    ("Educts", "educts"),
    ("Products", "products"),
    ("Proteins", "proteins"),
    ("Modifiers", "modifiers"),
];

pub const CONDITIONS_ALIASES: AliasMap = &[
    ("Reactant", "reactant"),
    ("Data type", "data_type"),
    ("Time unit", "time_unit"),
    ("Temperature", "temperature"),
    ("Temperature unit", "temperature_unit"),
];

lazy_static::lazy_static! {
    /// Data type labels offered by the template
    pub static ref DATA_TYPE_MAPPING: HashMap<&'static str, DataTypes> = {
        let mut m = HashMap::new();
        m.insert("Concentration", DataTypes::Concentration);
        m.insert("Absorption", DataTypes::Absorption);
        m.insert("Fluorescence", DataTypes::Fluorescence);
        m.insert("Luminescence", DataTypes::Luminescence);
        m.insert("Conversion [%]", DataTypes::Conversion);
        m.insert("Peak Area", DataTypes::PeakArea);
        m.insert("Total concentration after addition", DataTypes::Concentration);
        m
    };
}

/// Row labels of a 96-well plate
pub const PLATE_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Number of columns of a 96-well plate
pub const PLATE_COLUMNS: usize = 12;

/// Creates an empty template workbook for the given species.
///
/// Every sheet carries its headers at the positions the importer reads from.
/// One plate sheet is created per protein and reactant, plus the `pH` sheet.
///
/// # Arguments
///
/// * `proteins` - Names of the proteins, each gets a plate sheet
/// * `reactants` - Names of the reactants, each gets a plate sheet
pub fn blank_template(proteins: &[&str], reactants: &[&str]) -> Workbook {
    let mut workbook = Workbook::new();

    let info = workbook.sheet_mut(GENERAL_INFO_SHEET);
    info.set_row(INFO_NAME_ROW - 1, 0, ["General information", ""]);
    info.set(INFO_NAME_ROW, 0, "Title");
    info.set(INFO_CREATED_ROW, 0, "Date");
    info.set(INFO_DOI_ROW, 0, "DOI");
    info.set(INFO_PUBMED_ROW, 0, "PubMed ID");
    info.set(INFO_URL_ROW, 0, "URL");
    write_headers(info, &CREATORS_BLOCK, CREATOR_ALIASES);
    write_headers(info, &VESSEL_BLOCK, VESSEL_ALIASES);

    write_headers(
        workbook.sheet_mut(PROTEINS_SHEET),
        &PROTEINS_BLOCK,
        PROTEIN_ALIASES,
    );
    write_headers(
        workbook.sheet_mut(CHEMICALS_SHEET),
        &CHEMICALS_BLOCK,
        REACTANT_ALIASES,
    );

    let reactions = workbook.sheet_mut(REACTIONS_SHEET);
    reactions.set(REACTIONS_BLOCK.header_row, 0, "ID");
    reactions.set_row(
        REACTIONS_BLOCK.header_row,
        1,
        REACTION_ALIASES.iter().map(|(header, _)| *header),
    );

    let data = workbook.sheet_mut(DATA_SHEET);
    write_headers(data, &CONDITIONS_BLOCK, CONDITIONS_ALIASES);
    data.set(TIMECOURSE_BLOCK.header_row, 0, TIME_COLUMN);
    data.set_row(TIMECOURSE_BLOCK.header_row, 1, plate_wells());

    for name in proteins.iter().chain(reactants).chain([PH_SHEET].iter()) {
        write_plate_labels(workbook.sheet_mut(name));
    }

    workbook
}

/// Writes the row and column labels of a plate grid.
pub fn write_plate_labels(sheet: &mut Sheet) {
    let (unit_row, unit_col) = SPECIES_UNIT_CELL;
    sheet.set(unit_row, unit_col - 1, "Unit");
    sheet.set_row(
        PLATE_BLOCK.header_row,
        1,
        (1..=PLATE_COLUMNS).map(|col| col as f64),
    );

    for (offset, row) in PLATE_ROWS.iter().enumerate() {
        sheet.set(PLATE_BLOCK.header_row + 1 + offset, 0, row.to_string());
    }
}

/// All 96 well labels in row-major order (`A1`, `A2`, ..., `H12`).
pub fn plate_wells() -> Vec<String> {
    PLATE_ROWS
        .iter()
        .flat_map(|row| (1..=PLATE_COLUMNS).map(move |col| format!("{row}{col}")))
        .collect()
}

fn write_headers(sheet: &mut Sheet, block: &Block, aliases: AliasMap) {
    let start = block.columns.map_or(0, |(start, _)| start);
    sheet.set_row(
        block.header_row,
        start,
        aliases.iter().map(|(header, _)| *header),
    );
}
