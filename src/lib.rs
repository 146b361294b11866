//! EnzymeML 96-well plate template library
//!
//! This library provides the EnzymeML document model together with an
//! importer for the 96-well microtiter plate spreadsheet template:
//! - Typed records with builders for vessels, species, reactions and measurements
//! - Extraction of tables and plate grids from template sheets
//! - Resolution of names in the template to document identifiers
//! - Validation of plate layouts and of the assembled document
//! - Reading/writing spreadsheet workbooks and JSON documents

#![warn(unused_imports)]

pub mod versions {
    pub use crate::versions::v1 as latest;
    pub mod v1;
}

/// Commonly used types and functionality re-exported for convenience
pub mod prelude {
    pub use crate::document::*;
    pub use crate::io::*;
    pub use crate::template::error::*;
    pub use crate::template::importer::*;
    pub use crate::versions::latest::*;

    pub use crate::tabular::sheet::{Cell, Sheet, Workbook};

    #[cfg(feature = "tabular")]
    pub use crate::tabular::reader::read_workbook;
    #[cfg(feature = "tabular")]
    pub use crate::tabular::writer::write_workbook;
}

/// Construction and lookup helpers of documents
pub mod document;

/// Import of the 96-well plate template
pub mod template {
    pub use crate::template::importer::{read_96well_template, ImportOptions, TemplateImport};

    /// Error types of the import
    pub mod error;
    /// Table and plate grid extraction
    pub mod extract;
    /// The import pipeline
    pub mod importer;
    /// Fixed positions of the template
    pub mod layout;
    /// Plate layout validation
    pub mod plate;
    /// Name resolution and cell normalisers
    pub mod resolve;
}

/// Validation of EnzymeML documents and components
pub mod validation {
    pub use crate::validation::consistency::*;
    pub use crate::validation::schema::*;
    /// Main consistency interface
    pub mod consistency;
    /// Validation of measurement data
    mod measurements;
    /// Validation of kinetic parameters
    mod parameters;
    /// Validation of reaction specifications
    mod reactions;
    /// Main schema validation interface
    pub mod schema;
    /// Validation of species references
    mod species;
}

/// Tabular data handling
pub mod tabular {
    /// DataFrame export of measurements
    #[cfg(feature = "tabular")]
    mod dataframe;
    /// Reading workbooks from files
    #[cfg(feature = "tabular")]
    pub mod reader;
    /// In-memory worksheet model
    pub mod sheet;
    /// Writing workbooks to files
    #[cfg(feature = "tabular")]
    pub mod writer;
}

/// IO functionality
pub mod io;

/// Display of documents as tables
pub mod info;
