use std::fmt;

use thiserror::Error;

use crate::prelude::{
    ComplexBuilderError, CreatorBuilderError, EnzymeMLDocumentBuilderError,
    MeasurementBuilderError, MeasurementDataBuilderError, ProteinBuilderError,
    ReactantBuilderError, ReactionBuilderError, ReactionElementBuilderError,
    ReplicateBuilderError, VesselBuilderError,
};

/// Errors that can occur while importing a plate template.
///
/// Every error aborts the import; no partial document is returned.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A sheet required by the template is absent
    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    /// A column required by the template is absent
    #[error("Missing column '{column}' in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// A required field of a table row is blank
    #[error("Missing value for '{field}' in sheet '{sheet}' at row {row}")]
    MissingField {
        sheet: String,
        row: usize,
        field: String,
    },

    /// The vessel block of the general information sheet is empty
    #[error("No vessel defined in sheet '{0}'")]
    MissingVessel(String),

    /// A cell could not be interpreted as the expected type
    #[error("Malformed cell {cell} in sheet '{sheet}': {message}")]
    MalformedCell {
        sheet: String,
        cell: String,
        message: String,
    },

    /// A name could not be matched against the document
    #[error("Could not resolve {kind} '{name}' ({context})")]
    UnresolvedReference {
        kind: ReferenceKind,
        name: String,
        context: String,
    },

    /// The readout reactant of the data sheet is not a known reactant
    #[error("Reactant '{0}' not found in excel template sheet 'Chemicals'")]
    ReadoutNotFound(String),

    /// Species plate grids disagree on which wells hold values
    #[error("Initial concentration for plate position(s) {wells:?} of '{species}' not specified")]
    LayoutInconsistency { species: String, wells: Vec<String> },

    /// A well of the validated layout has no value in a per-well sheet
    #[error("No value for well '{well}' in sheet '{sheet}'")]
    MissingWell { sheet: String, well: String },

    /// Neither proteins nor reactants are defined, so no wells can be derived
    #[error("No species defined, cannot derive the plate layout")]
    EmptyLayout,

    /// A record could not be built from the extracted values
    #[error("Invalid {entity}: {message}")]
    Model {
        entity: &'static str,
        message: String,
    },

    /// Reading the workbook file failed
    #[cfg(feature = "tabular")]
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    /// Writing the workbook file failed
    #[cfg(feature = "tabular")]
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

/// Kind of entity a name was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Vessel,
    Species,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Vessel => write!(f, "vessel"),
            ReferenceKind::Species => write!(f, "species"),
        }
    }
}

/// Implements `From<$error>` for [`TemplateError::Model`], labelling the
/// message with the entity the builder constructs.
macro_rules! model_error {
    ($($error:ty => $entity:literal),+ $(,)?) => {
        $(
            impl From<$error> for TemplateError {
                fn from(error: $error) -> Self {
                    TemplateError::Model {
                        entity: $entity,
                        message: error.to_string(),
                    }
                }
            }
        )+
    };
}

model_error!(
    EnzymeMLDocumentBuilderError => "document",
    CreatorBuilderError => "creator",
    VesselBuilderError => "vessel",
    ProteinBuilderError => "protein",
    ComplexBuilderError => "complex",
    ReactantBuilderError => "reactant",
    ReactionBuilderError => "reaction",
    ReactionElementBuilderError => "reaction element",
    MeasurementBuilderError => "measurement",
    MeasurementDataBuilderError => "measurement data",
    ReplicateBuilderError => "replicate",
);
