//! Import of 96-well plate templates into an [`EnzymeMLDocument`]
//!
//! The importer walks the template in a fixed order:
//!
//! 1. Document header, creators and the plate vessel (`General Information`)
//! 2. Proteins and reactants (`Proteins`, `Chemicals`)
//! 3. Reactions with resolved educts, products and modifiers (`Reactions`)
//! 4. One measurement per populated well, after validating that all species
//!    plate grids agree on the populated wells
//! 5. Initial concentrations per well and species
//! 6. One replicate per well for the readout reactant (`Data`)
//!
//! Any error aborts the import. Problems that do not prevent a consistent
//! document, such as unknown names in modifier lists, are collected as
//! [`ImportWarning`]s and logged.

use std::fmt;

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::document::{IdPrefix, SpeciesPool};
use crate::prelude::{
    CreatorBuilder, DataTypes, EnzymeMLDocument, EnzymeMLDocumentBuilder, MeasurementBuilder,
    MeasurementDataBuilder, ProteinBuilder, ReactantBuilder, ReactionBuilder, ReactionElement,
    ReactionElementBuilder, Replicate, ReplicateBuilder, SBOTerm, VesselBuilder,
};
use crate::tabular::sheet::{cell_ref, Sheet, Workbook};
use crate::template::error::{ReferenceKind, TemplateError};
use crate::template::extract::{
    extract_conditions, extract_general_info, extract_plate_grid, extract_species_unit,
    extract_table, extract_timecourse, MeasurementConditions, TableRow, TimeCourse,
};
use crate::template::layout::{
    CHEMICALS_BLOCK, CHEMICALS_SHEET, CONDITIONS_BLOCK, CREATORS_BLOCK, CREATOR_ALIASES,
    DATA_SHEET, GENERAL_INFO_SHEET, INFO_NAME_ROW, PH_SHEET, PROTEINS_BLOCK, PROTEINS_SHEET,
    PROTEIN_ALIASES, REACTANT_ALIASES, REACTIONS_BLOCK, REACTIONS_SHEET, REACTION_ALIASES,
    SPECIES_UNIT_CELL, VESSEL_ALIASES, VESSEL_BLOCK,
};
use crate::template::plate::validate_plate_layout;
use crate::template::resolve::{
    clean_optional, clean_temperature_unit, merge_modifier_lists, parse_constant,
    parse_reversible, resolve_species_list, resolve_vessel,
};

/// Unit of replicate data that is not a concentration
const DIMENSIONLESS: &str = "dimensionless";

/// Options of a template import.
///
/// # Examples
///
/// ```
/// use enzymeml_mtp::prelude::ImportOptionsBuilder;
///
/// let options = ImportOptionsBuilder::default()
///     .delimiter('|')
///     .strict_references(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(options.row_tolerance, 2);
/// ```
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq)]
pub struct ImportOptions {
    /// Separator of names in the educt, product and modifier columns
    #[builder(default = "','")]
    pub delimiter: char,
    /// Number of mapped fields a table row may leave blank before it is dropped
    #[builder(default = "2")]
    pub row_tolerance: usize,
    /// Fail on names in reaction lists that match no species
    #[builder(default = "false")]
    pub strict_references: bool,
    /// Unit of the replicate data. Defaults to the readout unit for
    /// concentrations and `dimensionless` otherwise.
    #[builder(default, setter(into, strip_option))]
    pub data_unit: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            row_tolerance: 2,
            strict_references: false,
            data_unit: None,
        }
    }
}

/// Role of a species within a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementRole {
    Educt,
    Product,
    Modifier,
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRole::Educt => write!(f, "educt"),
            ElementRole::Product => write!(f, "product"),
            ElementRole::Modifier => write!(f, "modifier"),
        }
    }
}

/// Non-fatal findings of an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportWarning {
    /// A name in a reaction list matched no species and was left out
    UnresolvedSpecies {
        reaction: String,
        role: ElementRole,
        name: String,
    },
    /// A creator row lacked a name or mail address and was skipped
    IncompleteCreator { row: usize },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportWarning::UnresolvedSpecies {
                reaction,
                role,
                name,
            } => write!(
                f,
                "Reaction '{reaction}': {role} '{name}' matches no protein or reactant and was skipped"
            ),
            ImportWarning::IncompleteCreator { row } => {
                write!(f, "Creator in row {row} is incomplete and was skipped")
            }
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateImport {
    pub document: EnzymeMLDocument,
    pub warnings: Vec<ImportWarning>,
}

/// Imports a 96-well plate template workbook.
///
/// # Arguments
///
/// * `workbook` - The template workbook
/// * `options` - Import options
///
/// # Returns
///
/// Returns the assembled document together with the warnings raised during
/// the import.
///
/// # Errors
///
/// Returns a [`TemplateError`] if a sheet, column or required value is
/// missing, a cell cannot be parsed, a reference cannot be resolved or the
/// species plate grids disagree. No partial document is returned.
pub fn read_96well_template(
    workbook: &Workbook,
    options: &ImportOptions,
) -> Result<TemplateImport, TemplateError> {
    let mut importer = Importer::new(workbook, options)?;

    importer.read_creators()?;
    importer.read_vessel()?;
    importer.read_proteins()?;
    importer.read_reactants()?;
    importer.read_reactions()?;
    importer.read_measurements()?;

    log::info!(
        "Imported {} measurement(s) with {} warning(s)",
        importer.doc.measurements.len(),
        importer.warnings.len()
    );

    Ok(TemplateImport {
        document: importer.doc,
        warnings: importer.warnings,
    })
}

/// Loads a template workbook from disk and imports it.
///
/// # Arguments
///
/// * `path` - Path to an `.xlsx`, `.xls` or `.ods` file
/// * `options` - Import options
#[cfg(feature = "tabular")]
pub fn read_96well_template_from_path(
    path: impl AsRef<std::path::Path>,
    options: &ImportOptions,
) -> Result<TemplateImport, TemplateError> {
    let workbook = crate::tabular::reader::read_workbook(path)?;
    read_96well_template(&workbook, options)
}

/// State of a running import: the document under construction.
struct Importer<'a> {
    workbook: &'a Workbook,
    options: &'a ImportOptions,
    doc: EnzymeMLDocument,
    warnings: Vec<ImportWarning>,
}

impl<'a> Importer<'a> {
    /// Reads the document header.
    fn new(workbook: &'a Workbook, options: &'a ImportOptions) -> Result<Self, TemplateError> {
        let sheet = workbook.sheet(GENERAL_INFO_SHEET)?;
        let info = extract_general_info(sheet);

        log::info!("Reading general information");

        let name = info.name.ok_or_else(|| TemplateError::MissingField {
            sheet: sheet.name.clone(),
            row: INFO_NAME_ROW + 1,
            field: "name".to_string(),
        })?;

        let doc = EnzymeMLDocumentBuilder::default()
            .name(name)
            .created(info.created)
            .doi(info.doi)
            .pubmedid(info.pubmedid)
            .url(info.url)
            .build()?;

        Ok(Self {
            workbook,
            options,
            doc,
            warnings: Vec::new(),
        })
    }

    fn read_creators(&mut self) -> Result<(), TemplateError> {
        let workbook = self.workbook;
        let sheet = workbook.sheet(GENERAL_INFO_SHEET)?;
        let table = extract_table(
            sheet,
            &CREATORS_BLOCK,
            CREATOR_ALIASES,
            self.options.row_tolerance,
        );

        for row in table.rows.iter() {
            let (Some(given_name), Some(family_name), Some(mail)) = (
                row.text("given_name"),
                row.text("family_name"),
                row.text("mail"),
            ) else {
                log::debug!("Skipping incomplete creator in row {}", row.row + 1);
                self.warnings
                    .push(ImportWarning::IncompleteCreator { row: row.row + 1 });
                continue;
            };

            let creator = CreatorBuilder::default()
                .given_name(given_name)
                .family_name(family_name)
                .mail(mail)
                .build()?;

            self.doc.add_to_creators(creator);
        }

        Ok(())
    }

    /// Adds the vessel of the plate. The first row naming a vessel is used.
    fn read_vessel(&mut self) -> Result<(), TemplateError> {
        let workbook = self.workbook;
        let sheet = workbook.sheet(GENERAL_INFO_SHEET)?;
        let table = extract_table(
            sheet,
            &VESSEL_BLOCK,
            VESSEL_ALIASES,
            self.options.row_tolerance,
        );

        let row = table
            .rows
            .iter()
            .find(|row| row.contains("name"))
            .ok_or_else(|| TemplateError::MissingVessel(sheet.name.clone()))?;

        let name = row.required_text("name")?;
        let mut vessel = VesselBuilder::default();
        vessel
            .name(name.as_str())
            .volume(row.required_number("volume")?)
            .unit(row.required_text("unit")?);

        match row.text("id") {
            Some(id) => {
                let vessel = vessel.id(id).build()?;
                self.doc.vessels.push(vessel);
            }
            None => {
                self.doc.add_to_vessels(vessel)?;
            }
        }

        log::info!("Added vessel '{name}'");

        Ok(())
    }

    fn read_proteins(&mut self) -> Result<(), TemplateError> {
        let workbook = self.workbook;
        let sheet = workbook.sheet(PROTEINS_SHEET)?;
        let table = extract_table(
            sheet,
            &PROTEINS_BLOCK,
            PROTEIN_ALIASES,
            self.options.row_tolerance,
        );
        table.require_column("Name")?;

        for row in table.rows.iter() {
            let mut protein = ProteinBuilder::default();
            protein
                .name(row.required_text("name")?)
                .vessel_id(self.species_vessel(row)?)
                .constant(self.species_constant(row, true)?)
                .sequence(clean_optional(row.text("sequence")))
                .ecnumber(clean_optional(row.text("ecnumber")))
                .organism(clean_optional(row.text("organism")))
                .uniprotid(clean_optional(row.text("uniprotid")));

            self.doc.add_to_proteins(protein)?;
        }

        log::info!("Added {} protein(s)", self.doc.proteins.len());

        Ok(())
    }

    fn read_reactants(&mut self) -> Result<(), TemplateError> {
        let workbook = self.workbook;
        let sheet = workbook.sheet(CHEMICALS_SHEET)?;
        let table = extract_table(
            sheet,
            &CHEMICALS_BLOCK,
            REACTANT_ALIASES,
            self.options.row_tolerance,
        );
        table.require_column("Name")?;

        for row in table.rows.iter() {
            let mut reactant = ReactantBuilder::default();
            reactant
                .name(row.required_text("name")?)
                .vessel_id(self.species_vessel(row)?)
                .constant(self.species_constant(row, false)?)
                .smiles(clean_optional(row.text("smiles")))
                .inchi(clean_optional(row.text("inchi")));

            self.doc.add_to_reactants(reactant)?;
        }

        log::info!("Added {} reactant(s)", self.doc.reactants.len());

        Ok(())
    }

    /// Resolves the vessel column of a species row. Rows without a vessel
    /// refer to the plate.
    fn species_vessel(&self, row: &TableRow) -> Result<String, TemplateError> {
        match row.text("vessel_id") {
            Some(name) => resolve_vessel(&self.doc, &name),
            None => self
                .doc
                .vessels
                .first()
                .map(|vessel| vessel.id.clone())
                .ok_or_else(|| TemplateError::MissingVessel(GENERAL_INFO_SHEET.to_string())),
        }
    }

    fn species_constant(&self, row: &TableRow, default: bool) -> Result<bool, TemplateError> {
        match row.text("constant") {
            Some(text) => parse_constant(&text).map_err(|msg| row.malformed_field("constant", msg)),
            None => Ok(default),
        }
    }

    fn read_reactions(&mut self) -> Result<(), TemplateError> {
        let workbook = self.workbook;
        let sheet = workbook.sheet(REACTIONS_SHEET)?;
        let table = extract_table(
            sheet,
            &REACTIONS_BLOCK,
            REACTION_ALIASES,
            self.options.row_tolerance,
        );
        table.require_column("Name")?;

        for row in table.rows.iter() {
            let name = row.required_text("name")?;

            let reversible = match row.text("reversible") {
                Some(text) => parse_reversible(&text)
                    .map_err(|msg| row.malformed_field("reversible", msg))?,
                None => false,
            };

            let temperature_unit = match row.text("temperature_unit") {
                Some(text) => Some(
                    clean_temperature_unit(&text)
                        .map_err(|msg| row.malformed_field("temperature_unit", msg))?,
                ),
                None => None,
            };

            let modifiers = merge_modifier_lists(
                row.text("proteins").as_deref(),
                row.text("modifiers").as_deref(),
                self.options.delimiter,
            );

            let educts = self.reaction_elements(
                &name,
                ElementRole::Educt,
                row.text("educts").as_deref(),
            )?;
            let products = self.reaction_elements(
                &name,
                ElementRole::Product,
                row.text("products").as_deref(),
            )?;
            let modifiers =
                self.reaction_elements(&name, ElementRole::Modifier, Some(&modifiers))?;

            let mut reaction = ReactionBuilder::default();
            reaction
                .name(name)
                .reversible(reversible)
                .temperature(row.number("temperature")?)
                .temperature_unit(temperature_unit)
                .ph(row.number("ph")?)
                .educts(educts)
                .products(products)
                .modifiers(modifiers);

            self.doc.add_to_reactions(reaction)?;
        }

        log::info!("Added {} reaction(s)", self.doc.reactions.len());

        Ok(())
    }

    /// Resolves a list cell of a reaction into reaction elements.
    ///
    /// Educts and products are resolved against the reactants, modifiers
    /// against proteins and reactants. Unresolved names become warnings, or
    /// errors if references are strict.
    fn reaction_elements(
        &mut self,
        reaction: &str,
        role: ElementRole,
        raw: Option<&str>,
    ) -> Result<Vec<ReactionElement>, TemplateError> {
        let pool = match role {
            ElementRole::Educt | ElementRole::Product => SpeciesPool::Reactants,
            ElementRole::Modifier => SpeciesPool::ProteinsAndReactants,
        };

        let resolution = resolve_species_list(
            raw,
            &self.doc.species_pool(pool),
            self.options.delimiter,
        );

        for name in resolution.unresolved {
            if self.options.strict_references {
                return Err(TemplateError::UnresolvedReference {
                    kind: ReferenceKind::Species,
                    name,
                    context: format!("{role} of reaction '{reaction}'"),
                });
            }

            log::warn!("Reaction '{reaction}': {role} '{name}' matches no species, skipping");
            self.warnings.push(ImportWarning::UnresolvedSpecies {
                reaction: reaction.to_string(),
                role,
                name,
            });
        }

        resolution
            .ids
            .into_iter()
            .map(|species_id| -> Result<ReactionElement, TemplateError> {
                let ontology = match role {
                    ElementRole::Educt => SBOTerm::Substrate,
                    ElementRole::Product => SBOTerm::Product,
                    ElementRole::Modifier if self.is_protein(&species_id) => SBOTerm::Catalyst,
                    ElementRole::Modifier => SBOTerm::Modifier,
                };

                Ok(ReactionElementBuilder::default()
                    .species_id(species_id)
                    .stoichiometry(1.0)
                    .constant(false)
                    .ontology(ontology)
                    .build()?)
            })
            .collect()
    }

    fn is_protein(&self, species_id: &str) -> bool {
        self.doc.proteins.iter().any(|p| p.id == species_id)
    }

    /// Creates one measurement per populated well with the initial
    /// concentrations of all species and the readout time course.
    fn read_measurements(&mut self) -> Result<(), TemplateError> {
        let workbook = self.workbook;
        let species: Vec<(String, String)> = self
            .doc
            .species_pool(SpeciesPool::ProteinsAndReactants)
            .into_iter()
            .map(|(name, id)| (name.to_string(), id.to_string()))
            .collect();

        let mut grids = IndexMap::new();
        let mut units = IndexMap::new();
        for (name, _) in species.iter() {
            let sheet = workbook.sheet(name)?;
            grids.insert(name.clone(), extract_plate_grid(sheet)?);
            units.insert(name.clone(), species_unit(sheet)?);
        }

        let wells = validate_plate_layout(&grids)?;
        log::info!("Plate layout holds {} well(s)", wells.len());

        let data_sheet = workbook.sheet(DATA_SHEET)?;
        let conditions = extract_conditions(data_sheet)?;
        let readout = self
            .doc
            .reactant_by_name(&conditions.reactant)
            .map(|reactant| reactant.id.clone())
            .ok_or_else(|| TemplateError::ReadoutNotFound(conditions.reactant.clone()))?;
        let timecourse = extract_timecourse(data_sheet)?;

        let ph_grid = if workbook.has_sheet(PH_SHEET) {
            let sheet = workbook.sheet(PH_SHEET)?;
            Some((sheet, extract_plate_grid(sheet)?))
        } else {
            None
        };

        let (temperature, temperature_unit) = self.measurement_temperature(&conditions)?;
        let data_unit = self.options.data_unit.clone().unwrap_or_else(|| {
            match conditions.data_type {
                DataTypes::Concentration => units
                    .get(&conditions.reactant)
                    .cloned()
                    .unwrap_or_else(|| DIMENSIONLESS.to_string()),
                _ => DIMENSIONLESS.to_string(),
            }
        });

        for well in wells.iter() {
            let measurement_id = self.doc.generate_id(IdPrefix::Measurement);

            let ph = match &ph_grid {
                Some((sheet, grid)) => Some(grid.get(well).copied().ok_or_else(|| {
                    TemplateError::MissingWell {
                        sheet: sheet.name.clone(),
                        well: well.clone(),
                    }
                })?),
                None => self.doc.reactions.first().and_then(|r| r.ph),
            };

            let mut species_data = Vec::with_capacity(species.len());
            for (name, species_id) in species.iter() {
                let mut data = MeasurementDataBuilder::default();
                data.species_id(species_id.as_str())
                    .measurement_id(measurement_id.as_str())
                    .init_conc(grids[name][well])
                    .unit(units[name].as_str());

                if *species_id == readout {
                    data.to_replicates(readout_replicate(
                        well,
                        &readout,
                        &measurement_id,
                        &conditions,
                        &data_unit,
                        &timecourse,
                        data_sheet,
                    )?);
                }

                species_data.push(data.build()?);
            }

            let measurement = MeasurementBuilder::default()
                .id(measurement_id)
                .name(well.as_str())
                .temperature(temperature)
                .temperature_unit(temperature_unit.clone())
                .ph(ph)
                .species_data(species_data)
                .global_time(timecourse.time.clone())
                .global_time_unit(conditions.time_unit.clone())
                .build()?;

            log::debug!("Added measurement '{}' for well {}", measurement.id, well);
            self.doc.measurements.push(measurement);
        }

        Ok(())
    }

    /// Temperature of the measurements. Values declared on the data sheet
    /// take precedence over those of the first reaction.
    fn measurement_temperature(
        &self,
        conditions: &MeasurementConditions,
    ) -> Result<(Option<f64>, Option<String>), TemplateError> {
        let reaction = self.doc.reactions.first();

        let temperature = conditions
            .temperature
            .or_else(|| reaction.and_then(|r| r.temperature));

        let unit = match &conditions.temperature_unit {
            Some(unit) => Some(clean_temperature_unit(unit).map_err(|message| {
                TemplateError::MalformedCell {
                    sheet: DATA_SHEET.to_string(),
                    cell: cell_ref(CONDITIONS_BLOCK.header_row + 1, 4),
                    message,
                }
            })?),
            None => reaction.and_then(|r| r.temperature_unit.clone()),
        };

        Ok((temperature, unit))
    }
}

fn species_unit(sheet: &Sheet) -> Result<String, TemplateError> {
    extract_species_unit(sheet).ok_or_else(|| TemplateError::MissingField {
        sheet: sheet.name.clone(),
        row: SPECIES_UNIT_CELL.0 + 1,
        field: "unit".to_string(),
    })
}

/// Builds the replicate of the readout reactant for one well.
fn readout_replicate(
    well: &str,
    species_id: &str,
    measurement_id: &str,
    conditions: &MeasurementConditions,
    data_unit: &str,
    timecourse: &TimeCourse,
    data_sheet: &Sheet,
) -> Result<Replicate, TemplateError> {
    let (time, data) = timecourse
        .series(well)
        .ok_or_else(|| TemplateError::MissingColumn {
            sheet: data_sheet.name.clone(),
            column: well.to_string(),
        })?;

    if time.len() < timecourse.time.len() {
        log::debug!(
            "Well {well}: dropped {} time point(s) without a value",
            timecourse.time.len() - time.len()
        );
    }

    Ok(ReplicateBuilder::default()
        .id(well)
        .species_id(species_id)
        .measurement_id(measurement_id)
        .data_type(conditions.data_type)
        .data_unit(data_unit)
        .time_unit(conditions.time_unit.as_str())
        .time(time)
        .data(data)
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let built = ImportOptionsBuilder::default()
            .build()
            .expect("Failed to build options");

        assert_eq!(built, ImportOptions::default());
        assert_eq!(built.delimiter, ',');
        assert!(!built.strict_references);
    }

    #[test]
    fn test_warning_display() {
        let warning = ImportWarning::UnresolvedSpecies {
            reaction: "Oxidation".to_string(),
            role: ElementRole::Modifier,
            name: "Glucose".to_string(),
        };

        assert_eq!(
            warning.to_string(),
            "Reaction 'Oxidation': modifier 'Glucose' matches no protein or reactant and was skipped"
        );
    }

    #[test]
    fn test_missing_general_information() {
        let result = read_96well_template(&Workbook::new(), &ImportOptions::default());
        assert!(matches!(
            result,
            Err(TemplateError::MissingSheet(name)) if name == GENERAL_INFO_SHEET
        ));
    }
}
