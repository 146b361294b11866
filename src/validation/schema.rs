//! Schema module for validating EnzymeML documents.
//!
//! The JSON schema of [`EnzymeMLDocument`] is derived from the record types
//! with `schemars`. Serialized documents are checked against it before they
//! are deserialized, which yields located error messages instead of the
//! first serde failure.

use std::{error::Error, fmt};

use colored::Colorize;
use jsonschema::validator_for;
use schemars::schema_for;
use serde_json::Value;

use crate::prelude::EnzymeMLDocument;

/// Report containing validation results
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    /// Whether the document is valid
    pub valid: bool,
    /// List of validation errors if any
    pub errors: Vec<ValidationError>,
}

/// Individual validation error details
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationError {
    /// JSON path where the error occurred
    pub location: String,
    /// Description of the validation error
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n\t└── {}",
            self.location.bold(),
            self.message.bold().red()
        )
    }
}

/// Returns the JSON schema of [`EnzymeMLDocument`].
pub fn document_schema() -> Result<Value, serde_json::Error> {
    serde_json::to_value(schema_for!(EnzymeMLDocument))
}

/// Validates an EnzymeML document against its JSON schema
///
/// # Arguments
/// * `content` - JSON string containing the EnzymeML document
///
/// # Returns
/// * `Result<ValidationReport, Box<dyn Error>>` - Validation report, or an error if
///   the content is not JSON or the schema cannot be compiled
pub fn validate_json(content: &str) -> Result<ValidationReport, Box<dyn Error>> {
    let json: Value = serde_json::from_str(content)?;
    validate_value(&json)
}

/// Validates an in-memory document against the JSON schema.
pub fn validate_document(enzmldoc: &EnzymeMLDocument) -> Result<ValidationReport, Box<dyn Error>> {
    validate_value(&serde_json::to_value(enzmldoc)?)
}

fn validate_value(json: &Value) -> Result<ValidationReport, Box<dyn Error>> {
    let schema = document_schema()?;
    let validator = validator_for(&schema).map_err(|e| format!("Error compiling schema: {e}"))?;

    let errors: Vec<ValidationError> = validator
        .iter_errors(json)
        .map(|error| ValidationError {
            location: error.instance_path.to_string(),
            message: error.to_string().replace('"', "'"),
        })
        .collect();

    Ok(ValidationReport {
        valid: errors.is_empty(),
        errors,
    })
}
