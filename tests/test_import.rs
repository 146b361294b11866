mod common;

use approx::assert_relative_eq;
use pretty_assertions::assert_eq;

use enzymeml_mtp::prelude::*;
use enzymeml_mtp::template::layout::{
    CHEMICALS_SHEET, DATA_SHEET, GENERAL_INFO_SHEET, PH_SHEET, REACTIONS_SHEET,
};
use enzymeml_mtp::validation::{check_consistency, validate_document, Severity};

use common::{abts_conc, plate_cell, plate_workbook, timecourse_column, TIMECOURSE_FIRST_ROW};

fn import(workbook: &Workbook) -> TemplateImport {
    read_96well_template(workbook, &ImportOptions::default()).expect("Failed to import template")
}

#[test]
fn test_import_document_header() {
    let doc = import(&plate_workbook()).document;

    assert_eq!(doc.name, "ABTS oxidation");
    assert_eq!(doc.created.as_deref(), Some("2024-05-01"));
    assert_eq!(doc.doi.as_deref(), Some("10.1000/182"));
    assert_eq!(doc.pubmedid.as_deref(), Some("12345"));
    assert_eq!(doc.url, None);

    assert_eq!(doc.creators.len(), 1);
    assert_eq!(doc.creators[0].given_name, "Jane");
    assert_eq!(doc.creators[0].mail, "jane.doe@example.org");

    assert_eq!(doc.vessels.len(), 1);
    assert_eq!(doc.vessels[0].id, "v0");
    assert_eq!(doc.vessels[0].name, "MTP 96 well");
    assert_eq!(doc.vessels[0].unit, "ul");
    assert_relative_eq!(doc.vessels[0].volume, 200.0);
}

#[test]
fn test_import_species() {
    let doc = import(&plate_workbook()).document;

    assert_eq!(doc.proteins.len(), 1);
    let protein = &doc.proteins[0];
    assert_eq!(protein.id, "p0");
    assert_eq!(protein.vessel_id, "v0");
    assert!(protein.constant);
    assert_eq!(protein.ecnumber.as_deref(), Some("1.11.1.7"));
    assert_eq!(protein.uniprotid.as_deref(), Some("P12345"));

    let reactants: Vec<(&str, &str, bool)> = doc
        .reactants
        .iter()
        .map(|r| (r.id.as_str(), r.name.as_str(), r.constant))
        .collect();
    assert_eq!(
        reactants,
        vec![
            ("s0", "ABTS", false),
            ("s1", "ABTS radical", false),
            ("s2", "Buffer", true),
        ]
    );
    assert_eq!(doc.reactants[0].smiles.as_deref(), Some("CCN1C2=CC=C(C=C2)S"));
}

#[test]
fn test_import_reaction() {
    let import = import(&plate_workbook());
    let doc = import.document;

    assert!(import.warnings.is_empty());
    assert_eq!(doc.reactions.len(), 1);

    let reaction = &doc.reactions[0];
    assert_eq!(reaction.id, "r0");
    assert_eq!(reaction.name, "Oxidation");
    assert!(!reaction.reversible);
    assert_eq!(reaction.temperature, Some(25.0));
    assert_eq!(reaction.temperature_unit.as_deref(), Some("C"));
    assert_eq!(reaction.ph, Some(7.0));

    assert_eq!(reaction.educts.len(), 1);
    assert_eq!(reaction.educts[0].species_id, "s0");
    assert_eq!(reaction.educts[0].ontology, Some(SBOTerm::Substrate));
    assert_eq!(reaction.products[0].species_id, "s1");
    assert_eq!(reaction.products[0].ontology, Some(SBOTerm::Product));

    let modifiers: Vec<(&str, Option<SBOTerm>)> = reaction
        .modifiers
        .iter()
        .map(|m| (m.species_id.as_str(), m.ontology))
        .collect();
    assert_eq!(
        modifiers,
        vec![
            ("p0", Some(SBOTerm::Catalyst)),
            ("s2", Some(SBOTerm::Modifier)),
        ]
    );
}

#[test]
fn test_import_measurements() {
    let doc = import(&plate_workbook()).document;

    let names: Vec<&str> = doc.measurements.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["A1", "A2", "B1", "B2"]);

    let ids: Vec<&str> = doc.measurements.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m0", "m1", "m2", "m3"]);

    for measurement in doc.measurements.iter() {
        assert_eq!(measurement.ph, Some(7.5));
        assert_eq!(measurement.temperature, Some(25.0));
        assert_eq!(measurement.temperature_unit.as_deref(), Some("C"));
        assert_eq!(measurement.global_time, vec![0.0, 1.0, 2.0]);
        assert_eq!(measurement.global_time_unit.as_deref(), Some("min"));

        let species: Vec<&str> = measurement
            .species_data
            .iter()
            .map(|data| data.species_id.as_str())
            .collect();
        assert_eq!(species, vec!["p0", "s0", "s1", "s2"]);

        let abts = &measurement.species_data[1];
        assert_relative_eq!(abts.init_conc, abts_conc(&measurement.name));
        assert_eq!(abts.unit, "mM");
        assert_eq!(abts.replicates.len(), 1);

        for data in measurement.species_data.iter().filter(|d| d.species_id != "s0") {
            assert!(data.replicates.is_empty());
        }
    }
}

#[test]
fn test_one_protein_one_reactant_plate() {
    let mut workbook = plate_workbook();

    let chemicals = workbook.sheet_mut(CHEMICALS_SHEET);
    for row in [4, 5] {
        chemicals.set_row(row, 0, [Cell::Empty, Cell::Empty, Cell::Empty]);
    }
    workbook
        .sheet_mut(REACTIONS_SHEET)
        .set(3, 7, Cell::Empty)
        .set(3, 9, Cell::Empty);
    workbook.remove_sheet("ABTS radical");
    workbook.remove_sheet("Buffer");

    let import = import(&workbook);
    let doc = import.document;

    assert!(import.warnings.is_empty());
    assert_eq!(doc.reactants.len(), 1);
    assert_eq!(doc.measurements.len(), 4);

    for measurement in doc.measurements.iter() {
        assert_eq!(measurement.species_data.len(), 2);

        let replicates: usize = measurement
            .species_data
            .iter()
            .map(|data| data.replicates.len())
            .sum();
        assert_eq!(replicates, 1);
        assert_eq!(measurement.species_data[1].replicates.len(), 1);
    }
}

#[test]
fn test_readout_replicate() {
    let doc = import(&plate_workbook()).document;
    let measurement = &doc.measurements[2];
    let replicate = &measurement.species_data[1].replicates[0];

    assert_eq!(replicate.id, "B1");
    assert_eq!(replicate.species_id, "s0");
    assert_eq!(replicate.measurement_id, "m2");
    assert_eq!(replicate.data_type, DataTypes::Concentration);
    assert_eq!(replicate.data_unit, "mM");
    assert_eq!(replicate.time_unit, "min");
    assert_eq!(replicate.time, vec![0.0, 1.0, 2.0]);

    let expected: Vec<f64> = [0.0, 1.0, 2.0]
        .iter()
        .map(|t| 0.3 * (1.0 - 0.25 * t))
        .collect();
    assert_eq!(replicate.data, expected);
}

#[test]
fn test_sparse_timecourse_drops_points() {
    let mut workbook = plate_workbook();
    workbook
        .sheet_mut(DATA_SHEET)
        .set(TIMECOURSE_FIRST_ROW + 1, timecourse_column("A2"), Cell::Empty);

    let doc = import(&workbook).document;
    let replicate = &doc.measurements[1].species_data[1].replicates[0];

    assert_eq!(replicate.time, vec![0.0, 2.0]);
    assert_eq!(replicate.data.len(), 2);
    assert_eq!(doc.measurements[1].global_time, vec![0.0, 1.0, 2.0]);
}

#[test]
fn test_unresolved_modifier_is_a_warning() {
    let mut workbook = plate_workbook();
    workbook
        .sheet_mut(REACTIONS_SHEET)
        .set(3, 9, "['Buffer', 'Glucose']");

    let import = import(&workbook);

    assert_eq!(
        import.warnings,
        vec![ImportWarning::UnresolvedSpecies {
            reaction: "Oxidation".to_string(),
            role: ElementRole::Modifier,
            name: "Glucose".to_string(),
        }]
    );

    let modifiers: Vec<&str> = import.document.reactions[0]
        .modifiers
        .iter()
        .map(|m| m.species_id.as_str())
        .collect();
    assert_eq!(modifiers, vec!["p0", "s2"]);
}

#[test]
fn test_unresolved_modifier_in_strict_mode() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(REACTIONS_SHEET).set(3, 9, "Buffer, Glucose");

    let options = ImportOptionsBuilder::default()
        .strict_references(true)
        .build()
        .expect("Failed to build options");

    match read_96well_template(&workbook, &options) {
        Err(TemplateError::UnresolvedReference { name, .. }) => assert_eq!(name, "Glucose"),
        other => panic!("Expected unresolved reference, got {other:?}"),
    }
}

#[test]
fn test_custom_delimiter() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(REACTIONS_SHEET).set(3, 9, "Buffer; ABTS");

    let options = ImportOptionsBuilder::default()
        .delimiter(';')
        .build()
        .expect("Failed to build options");
    let import = read_96well_template(&workbook, &options).expect("Failed to import template");

    let modifiers: Vec<&str> = import.document.reactions[0]
        .modifiers
        .iter()
        .map(|m| m.species_id.as_str())
        .collect();
    assert_eq!(modifiers, vec!["p0", "s2", "s0"]);
    assert!(import.warnings.is_empty());
}

#[test]
fn test_readout_not_found() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(DATA_SHEET).set(3, 0, "NADH");

    let result = read_96well_template(&workbook, &ImportOptions::default());
    assert!(matches!(
        result,
        Err(TemplateError::ReadoutNotFound(name)) if name == "NADH"
    ));
}

#[test]
fn test_layout_inconsistency() {
    let mut workbook = plate_workbook();
    let (row, col) = plate_cell("B2");
    workbook.sheet_mut("ABTS").set(row, col, Cell::Empty);

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::LayoutInconsistency { species, wells }) => {
            assert_eq!(species, "ABTS");
            assert_eq!(wells, vec!["B2".to_string()]);
        }
        other => panic!("Expected layout inconsistency, got {other:?}"),
    }
}

#[test]
fn test_malformed_plate_cell() {
    let mut workbook = plate_workbook();
    let (row, col) = plate_cell("A2");
    workbook.sheet_mut("Buffer").set(row, col, "ten");

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::MalformedCell { sheet, cell, .. }) => {
            assert_eq!(sheet, "Buffer");
            assert_eq!(cell, "C5");
        }
        other => panic!("Expected malformed cell, got {other:?}"),
    }
}

#[test]
fn test_duplicate_timecourse_column() {
    let mut workbook = plate_workbook();
    let data = workbook.sheet_mut(DATA_SHEET);
    data.set(4, 40, "A1");
    for offset in 0..3 {
        data.set(TIMECOURSE_FIRST_ROW + offset, 40, 999.0);
    }

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::MalformedCell { sheet, cell, .. }) => {
            assert_eq!(sheet, DATA_SHEET);
            assert_eq!(cell, "AO5");
        }
        other => panic!("Expected malformed cell, got {other:?}"),
    }
}

#[test]
fn test_unknown_species_vessel() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(CHEMICALS_SHEET).set(4, 1, "Flask");

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::UnresolvedReference { kind, name, .. }) => {
            assert_eq!(kind, ReferenceKind::Vessel);
            assert_eq!(name, "Flask");
        }
        other => panic!("Expected unresolved vessel, got {other:?}"),
    }
}

#[test]
fn test_malformed_table_cell() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(REACTIONS_SHEET).set(3, 2, "warm");

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::MalformedCell { sheet, cell, .. }) => {
            assert_eq!(sheet, REACTIONS_SHEET);
            assert_eq!(cell, "C4");
        }
        other => panic!("Expected malformed cell, got {other:?}"),
    }

    let mut workbook = plate_workbook();
    workbook.sheet_mut(GENERAL_INFO_SHEET).set(19, 2, "abc");

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::MalformedCell { sheet, cell, .. }) => {
            assert_eq!(sheet, GENERAL_INFO_SHEET);
            assert_eq!(cell, "C20");
        }
        other => panic!("Expected malformed cell, got {other:?}"),
    }
}

#[test]
fn test_fahrenheit_reaction_temperature() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(REACTIONS_SHEET).set(3, 3, "°F");

    let doc = import(&workbook).document;
    assert_eq!(doc.reactions[0].temperature_unit.as_deref(), Some("F"));
}

#[test]
fn test_ph_falls_back_to_reaction() {
    let mut workbook = plate_workbook();
    workbook.remove_sheet(PH_SHEET);

    let doc = import(&workbook).document;
    assert!(doc.measurements.iter().all(|m| m.ph == Some(7.0)));
}

#[test]
fn test_ph_sheet_missing_well() {
    let mut workbook = plate_workbook();
    let (row, col) = plate_cell("B2");
    workbook.sheet_mut(PH_SHEET).set(row, col, Cell::Empty);

    match read_96well_template(&workbook, &ImportOptions::default()) {
        Err(TemplateError::MissingWell { sheet, well }) => {
            assert_eq!(sheet, PH_SHEET);
            assert_eq!(well, "B2");
        }
        other => panic!("Expected missing well, got {other:?}"),
    }
}

#[test]
fn test_data_unit_of_non_concentrations() {
    let mut workbook = plate_workbook();
    workbook.sheet_mut(DATA_SHEET).set(3, 1, "Absorption");

    let doc = import(&workbook).document;
    let replicate = &doc.measurements[0].species_data[1].replicates[0];
    assert_eq!(replicate.data_type, DataTypes::Absorption);
    assert_eq!(replicate.data_unit, "dimensionless");

    let options = ImportOptionsBuilder::default()
        .data_unit("AU")
        .build()
        .expect("Failed to build options");
    let doc = read_96well_template(&workbook, &options)
        .expect("Failed to import template")
        .document;
    assert_eq!(doc.measurements[0].species_data[1].replicates[0].data_unit, "AU");
}

#[test]
fn test_missing_species_sheet() {
    let mut workbook = plate_workbook();
    workbook.remove_sheet("Buffer");

    assert!(matches!(
        read_96well_template(&workbook, &ImportOptions::default()),
        Err(TemplateError::MissingSheet(name)) if name == "Buffer"
    ));
}

#[test]
fn test_imported_document_is_consistent() {
    let doc = import(&plate_workbook()).document;

    let report = check_consistency(&doc);
    assert!(report.is_valid, "{report}");
    assert_eq!(report.count(Severity::Warning), 0, "{report}");

    let schema = validate_document(&doc).expect("Failed to validate");
    assert!(schema.valid, "{:?}", schema.errors);
}

#[test]
fn test_json_round_trip() {
    let doc = import(&plate_workbook()).document;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("plate.json");
    save_enzmldoc(&path, &doc).expect("Failed to save document");

    assert_eq!(load_enzmldoc(&path).expect("Failed to load document"), doc);

    let content = std::fs::read_to_string(&path).expect("Failed to read document");
    assert_eq!(parse_enzmldoc(&content).expect("Failed to parse document"), doc);
}

#[cfg(feature = "tabular")]
#[test]
fn test_measurement_dataframe() {
    let doc = import(&plate_workbook()).document;

    let df = doc.measurements[0]
        .to_dataframe(false)
        .expect("Failed to convert measurement");
    assert_eq!(df.shape(), (3, 2));

    let conditions = doc.initial_conditions().expect("Failed to convert document");
    assert_eq!(conditions.shape(), (4, 5));
}
