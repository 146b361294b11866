use std::path::Path;

use thiserror::Error;

use crate::prelude::EnzymeMLDocument;
use crate::validation::schema::{validate_json, ValidationError};

/// Loads an EnzymeML document from a JSON file.
///
/// # Arguments
///
/// * `path` - Path to the JSON file
///
/// # Errors
///
/// * `IOError::FileNotFound` - The file cannot be opened
/// * `IOError::JsonParseError` - The file is not a valid EnzymeML document
pub fn load_enzmldoc(path: impl AsRef<Path>) -> Result<EnzymeMLDocument, IOError> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

/// Saves an EnzymeML document as pretty-printed JSON.
///
/// # Arguments
///
/// * `path` - Path of the JSON file to create
/// * `doc` - The document to save
pub fn save_enzmldoc(path: impl AsRef<Path>, doc: &EnzymeMLDocument) -> Result<(), IOError> {
    let file = std::fs::File::create(path)?;
    Ok(serde_json::to_writer_pretty(file, doc)?)
}

/// Parses an EnzymeML document from a JSON string.
///
/// The content is validated against the document schema first, so that
/// malformed documents are reported with the location of every violation.
///
/// # Errors
///
/// * `IOError::SchemaViolation` - The content does not match the schema
/// * `IOError::JsonParseError` - The content is not JSON
pub fn parse_enzmldoc(content: &str) -> Result<EnzymeMLDocument, IOError> {
    let report =
        validate_json(content).map_err(|e| IOError::Schema(e.to_string()))?;

    if !report.valid {
        return Err(IOError::SchemaViolation(report.errors));
    }

    Ok(serde_json::from_str(content)?)
}

/// Errors of reading and writing EnzymeML documents.
#[derive(Error, Debug)]
pub enum IOError {
    /// The file could not be opened or created.
    #[error("File not found: {0}")]
    FileNotFound(#[from] std::io::Error),

    /// The content could not be (de)serialized.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// The content could not be checked against the schema.
    #[error("Failed to validate JSON: {0}")]
    Schema(String),

    /// The content violates the document schema.
    #[error("Document violates the schema:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    SchemaViolation(Vec<ValidationError>),
}
