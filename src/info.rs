//! Information display module for EnzymeML documents
//!
//! This module provides functionality for displaying EnzymeML documents and their components
//! in a human-readable format. It implements the `Display` trait for `EnzymeMLDocument` and
//! provides helper functions to format various components as tables.

use std::fmt::{self, Display};

use indexmap::IndexSet;
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::prelude::{
    Complex, EnzymeMLDocument, KineticParameter, Measurement, Protein, Reactant, Reaction,
    ReactionElement, Vessel,
};

/// Trait for converting model components to table records
///
/// Implementors provide the column headers and the string values of one row.
trait TableRecord {
    /// Get the column headers for the table
    fn columns() -> Vec<String>;

    /// Convert the instance to a record for display in a table
    fn to_record(&self) -> Vec<String>;
}

impl Display for EnzymeMLDocument {
    /// Formats an EnzymeML document for display
    ///
    /// Creates a formatted table representation of the document, including every
    /// non-empty component collection.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(vec![format!("EnzymeML Document: {}", self.name)]);

        if !self.vessels.is_empty() {
            builder.push_record(vec!["Vessels"]);
            builder.push_record(vec![to_table(&self.vessels)]);
        }

        if !self.proteins.is_empty() {
            builder.push_record(vec!["Proteins"]);
            builder.push_record(vec![to_table(&self.proteins)]);
        }

        if !self.complexes.is_empty() {
            builder.push_record(vec!["Complexes"]);
            builder.push_record(vec![to_table(&self.complexes)]);
        }

        if !self.reactants.is_empty() {
            builder.push_record(vec!["Reactants"]);
            builder.push_record(vec![to_table(&self.reactants)]);
        }

        if !self.reactions.is_empty() {
            builder.push_record(vec!["Reactions"]);
            builder.push_record(vec![to_table(&self.reactions)]);
        }

        if !self.measurements.is_empty() {
            builder.push_record(vec!["Measurements"]);
            builder.push_record(vec![measurement_table(&self.measurements)]);
        }

        if !self.global_parameters.is_empty() {
            builder.push_record(vec!["Parameters"]);
            builder.push_record(vec![to_table(&self.global_parameters)]);
        }

        let mut table = builder.build();
        table.with(Style::sharp());
        write!(f, "{table}")
    }
}

/// Converts a collection of TableRecord implementors to a formatted table string
fn to_table<T: TableRecord>(records: &[T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(T::columns());

    for record in records {
        builder.push_record(record.to_record());
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or("-".to_string(), |v| v.to_string())
}

fn concentration(value: Option<f64>, unit: Option<&str>) -> String {
    match (value, unit) {
        (Some(value), Some(unit)) => format!("{value} {unit}"),
        (Some(value), None) => value.to_string(),
        _ => "-".to_string(),
    }
}

impl TableRecord for Vessel {
    fn columns() -> Vec<String> {
        vec!["ID".to_string(), "Name".to_string(), "Volume".to_string()]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            format!("{} {}", self.volume, self.unit),
        ]
    }
}

impl TableRecord for Protein {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Vessel ID".to_string(),
            "EC Number".to_string(),
            "Organism".to_string(),
            "Initial".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.vessel_id.to_string(),
            or_dash(self.ecnumber.as_ref()),
            or_dash(self.organism.as_ref()),
            concentration(self.init_conc, self.unit.as_deref()),
        ]
    }
}

impl TableRecord for Complex {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Vessel ID".to_string(),
            "Participants".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.vessel_id.to_string(),
            self.participants.join(", "),
        ]
    }
}

impl TableRecord for Reactant {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Constant".to_string(),
            "Vessel ID".to_string(),
            "Initial".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.constant.to_string(),
            self.vessel_id.to_string(),
            concentration(self.init_conc, self.unit.as_deref()),
        ]
    }
}

impl TableRecord for Reaction {
    fn columns() -> Vec<String> {
        vec![
            "ID".to_string(),
            "Name".to_string(),
            "Scheme".to_string(),
            "Modifiers".to_string(),
            "Conditions".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        let conditions = match (self.temperature, self.ph) {
            (None, None) => "-".to_string(),
            (temperature, ph) => format!(
                "T = {} {}, pH = {}",
                or_dash(temperature),
                self.temperature_unit.as_deref().unwrap_or_default(),
                or_dash(ph)
            ),
        };

        let modifiers = if self.modifiers.is_empty() {
            "-".to_string()
        } else {
            self.modifiers.iter().map(|m| &m.species_id).join(", ")
        };

        vec![
            self.id.to_string(),
            self.name.to_string(),
            self.reaction_scheme(),
            modifiers,
            conditions,
        ]
    }
}

impl TableRecord for KineticParameter {
    fn columns() -> Vec<String> {
        vec![
            "Name".to_string(),
            "Value".to_string(),
            "Unit".to_string(),
            "Initial".to_string(),
            "Lower Bound".to_string(),
            "Upper Bound".to_string(),
        ]
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.name.to_string(),
            self.value.to_string(),
            self.unit.to_string(),
            or_dash(self.initial_value),
            or_dash(self.lower),
            or_dash(self.upper),
        ]
    }
}

/// Creates a formatted table of the initial concentrations per measurement
///
/// Each row represents a measurement, the species columns appear in the order
/// they are first measured. Species missing in a measurement are shown as `-`.
fn measurement_table(measurements: &[Measurement]) -> String {
    let measured_species: IndexSet<&str> = measurements
        .iter()
        .flat_map(|m| m.species_data.iter().map(|s| s.species_id.as_str()))
        .collect();

    let mut builder = Builder::default();
    let mut header = vec!["ID".to_string(), "Name".to_string(), "pH".to_string()];
    header.extend(measured_species.iter().map(|s| s.to_string()));
    builder.push_record(header);

    for measurement in measurements {
        let mut row = vec![
            measurement.id.to_string(),
            measurement.name.to_string(),
            or_dash(measurement.ph),
        ];

        for species_id in &measured_species {
            let value = measurement
                .species_data
                .iter()
                .find(|data| data.species_id == *species_id)
                .map_or("-".to_string(), |data| data.init_conc.to_string());

            row.push(value);
        }

        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

impl Reaction {
    /// Converts a reaction to a human-readable reaction scheme string
    ///
    /// Reversible reactions use `⇄`, irreversible ones `→`. Stoichiometries
    /// other than one are written in front of the species.
    fn reaction_scheme(&self) -> String {
        let side = |elements: &[ReactionElement]| {
            elements
                .iter()
                .map(|e| {
                    if e.stoichiometry == 1.0 {
                        e.species_id.clone()
                    } else {
                        format!("{} {}", e.stoichiometry, e.species_id)
                    }
                })
                .join(" + ")
        };

        let arrow = if self.reversible { "⇄" } else { "→" };
        format!("{} {} {}", side(&self.educts), arrow, side(&self.products))
    }
}
