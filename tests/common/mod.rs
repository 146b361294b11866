#![allow(dead_code)]

use enzymeml_mtp::prelude::*;
use enzymeml_mtp::template::layout::{
    blank_template, CHEMICALS_SHEET, DATA_SHEET, GENERAL_INFO_SHEET, PH_SHEET, PROTEINS_SHEET,
    REACTIONS_SHEET,
};

pub const PROTEINS: [&str; 1] = ["Enzyme1"];
pub const REACTANTS: [&str; 3] = ["ABTS", "ABTS radical", "Buffer"];

/// Populated wells with their ABTS concentrations
pub const ABTS_WELLS: [(&str, f64); 4] = [("A1", 0.1), ("A2", 0.2), ("B1", 0.3), ("B2", 0.4)];

/// Row of the first data row of the time-course table
pub const TIMECOURSE_FIRST_ROW: usize = 5;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A filled-in template of an ABTS oxidation assay on four wells.
///
/// - Enzyme1 catalyses `ABTS -> ABTS radical` with Buffer as modifier
/// - ABTS is the readout, measured as concentration in mM at t = 0, 1, 2 min
/// - The `pH` sheet holds 7.5 for every populated well
pub fn plate_workbook() -> Workbook {
    init_logger();

    let mut workbook = blank_template(&PROTEINS, &REACTANTS);

    let info = workbook.sheet_mut(GENERAL_INFO_SHEET);
    info.set(2, 1, "ABTS oxidation")
        .set(3, 1, "2024-05-01")
        .set(4, 1, "10.1000/182")
        .set(5, 1, 12345.0);
    info.set_row(10, 0, ["Jane", "Doe", "jane.doe@example.org"]);
    info.set_row(19, 1, ["MTP 96 well"]);
    info.set(19, 2, 200.0).set(19, 3, "ul");

    workbook.sheet_mut(PROTEINS_SHEET).set_row(
        3,
        0,
        [
            "Enzyme1",
            "MKVLAAGIVALLLAAGCSS",
            "MTP 96 well",
            "Constant",
            "1.11.1.7",
            "Escherichia coli",
            "P12345",
        ],
    );

    let chemicals = workbook.sheet_mut(CHEMICALS_SHEET);
    chemicals.set_row(3, 0, ["ABTS", "MTP 96 well", "Not constant", "CCN1C2=CC=C(C=C2)S"]);
    chemicals.set_row(4, 0, ["ABTS radical", "MTP 96 well", "Not constant"]);
    chemicals.set_row(5, 0, ["Buffer", "MTP 96 well", "Constant"]);

    let reactions = workbook.sheet_mut(REACTIONS_SHEET);
    reactions.set_row(3, 0, ["r0", "Oxidation"]);
    reactions.set(3, 2, 25.0).set(3, 3, "°C").set(3, 4, 7.0);
    reactions.set_row(3, 5, ["irreversible", "ABTS", "ABTS radical", "Enzyme1", "Buffer"]);

    for (name, value) in [("Enzyme1", 0.01), ("ABTS radical", 0.0), ("Buffer", 10.0)] {
        fill_plate(&mut workbook, name, |_| value);
    }
    fill_plate(&mut workbook, "ABTS", abts_conc);
    fill_plate(&mut workbook, PH_SHEET, |_| 7.5);

    let data = workbook.sheet_mut(DATA_SHEET);
    data.set_row(3, 0, ["ABTS", "Concentration", "min"]);
    data.set(3, 3, 25.0).set(3, 4, "°C");

    for (offset, time) in [0.0, 1.0, 2.0].into_iter().enumerate() {
        let row = TIMECOURSE_FIRST_ROW + offset;
        data.set(row, 0, time);

        for (well, conc) in ABTS_WELLS {
            data.set(row, timecourse_column(well), conc * (1.0 - 0.25 * time));
        }
    }

    workbook
}

/// Writes the unit and the populated wells of a plate sheet.
pub fn fill_plate(workbook: &mut Workbook, name: &str, value: impl Fn(&str) -> f64) {
    let sheet = workbook.sheet_mut(name);
    sheet.set(2, 3, "mM");

    for (well, _) in ABTS_WELLS {
        let (row, col) = plate_cell(well);
        sheet.set(row, col, value(well));
    }
}

pub fn abts_conc(well: &str) -> f64 {
    ABTS_WELLS
        .iter()
        .find(|(w, _)| *w == well)
        .map_or(0.0, |(_, conc)| *conc)
}

/// Absolute cell of a well on a plate sheet.
pub fn plate_cell(well: &str) -> (usize, usize) {
    let row = match &well[..1] {
        "A" => 4,
        "B" => 5,
        _ => panic!("Fixture only uses rows A and B"),
    };
    let col: usize = well[1..].parse().expect("Invalid well label");
    (row, col)
}

/// Column of a well in the time-course table of the data sheet.
pub fn timecourse_column(well: &str) -> usize {
    let (row, col) = plate_cell(well);
    (row - 4) * 12 + col
}
