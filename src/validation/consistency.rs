//! Consistency checks of assembled EnzymeML documents.
//!
//! Documents built by the template importer are consistent by construction.
//! Documents loaded from JSON or edited by hand are not, so this module
//! checks the reference integrity of a document after the fact:
//! - Species refer to an existing vessel
//! - Reaction elements refer to an existing species
//! - Measurement data and replicates refer to existing species and to the
//!   measurement they are part of
//! - Kinetic parameter bounds are ordered
//!
//! The main entry point is [`check_consistency`], which returns a [`Report`].

use std::collections::HashSet;
use std::fmt;

use colored::Colorize;

use crate::prelude::EnzymeMLDocument;
use crate::validation::measurements::check_measurements;
use crate::validation::parameters::check_parameters;
use crate::validation::reactions::check_reactions;
use crate::validation::species::check_species;

/// Runs all consistency checks on a document.
///
/// # Arguments
///
/// * `enzmldoc` - The document to check
///
/// # Returns
///
/// Returns a [`Report`] listing every issue found.
pub fn check_consistency(enzmldoc: &EnzymeMLDocument) -> Report {
    let mut report = Report::new();

    check_duplicate_ids(enzmldoc, &mut report);
    check_species(enzmldoc, &mut report);
    check_reactions(enzmldoc, &mut report);
    check_measurements(enzmldoc, &mut report);
    check_parameters(enzmldoc, &mut report);

    report
}

/// Results of the consistency checks.
///
/// The document is considered invalid if any result has [`Severity::Error`].
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Default)]
pub struct Report {
    /// Whether the document is valid overall. False if any errors were found.
    pub is_valid: bool,
    /// Individual results found during the checks.
    pub errors: Vec<ValidationResult>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds a result, marking the report invalid if it is an error.
    pub fn add_result(&mut self, result: ValidationResult) {
        if result.severity == Severity::Error {
            self.is_valid = false;
        }
        self.errors.push(result);
    }

    /// Returns the results attached to the object of the given identifier.
    pub fn filter_results(&self, identifier: &str) -> Vec<&ValidationResult> {
        self.errors
            .iter()
            .filter(|result| result.identifier.as_deref() == Some(identifier))
            .collect()
    }

    /// Number of results of the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.errors
            .iter()
            .filter(|result| result.severity == severity)
            .count()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "{}", "Document is consistent".bold().green());
        }

        for result in &self.errors {
            writeln!(f, "{result}")?;
        }
        Ok(())
    }
}

/// A single issue found during the checks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    /// JSON pointer to the location of the issue
    location: String,
    /// Human readable description of the issue
    message: String,
    severity: Severity,
    /// Identifier of the affected object, if any
    identifier: Option<String>,
}

impl ValidationResult {
    pub fn new(
        location: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        identifier: Option<String>,
    ) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            severity,
            identifier,
        }
    }

    /// JSON pointer to the location of the issue, e.g. `/reactions/0/educts/1`.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> &Severity {
        &self.severity
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (severity, message) = match self.severity {
            Severity::Error => ("Error".bold().red(), self.message.bold().red()),
            Severity::Warning => ("Warning".bold().yellow(), self.message.bold().yellow()),
            Severity::Info => ("Info".bold().green(), self.message.bold().green()),
        };

        write!(
            f,
            "[{}] {}:\n\t└── {}",
            self.location.bold(),
            severity,
            message
        )
    }
}

/// Severity levels of validation issues.
#[derive(Debug, Clone, PartialEq, Eq, Copy, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// The document is invalid and should not be used
    Error,
    /// The document may have issues but is still valid
    Warning,
    /// Informational message about potential improvements
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "Error"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Info => write!(f, "Info"),
        }
    }
}

/// Collects the identifiers of all proteins, complexes and reactants.
pub fn get_species_ids(enzmldoc: &EnzymeMLDocument) -> HashSet<&str> {
    enzmldoc
        .proteins
        .iter()
        .map(|p| p.id.as_str())
        .chain(enzmldoc.complexes.iter().map(|c| c.id.as_str()))
        .chain(enzmldoc.reactants.iter().map(|r| r.id.as_str()))
        .collect()
}

/// Reports identifiers used by more than one entity of the document.
fn check_duplicate_ids(enzmldoc: &EnzymeMLDocument, report: &mut Report) {
    let collections: [(&str, Vec<&str>); 6] = [
        ("vessels", enzmldoc.vessels.iter().map(|v| v.id.as_str()).collect()),
        ("proteins", enzmldoc.proteins.iter().map(|p| p.id.as_str()).collect()),
        ("complexes", enzmldoc.complexes.iter().map(|c| c.id.as_str()).collect()),
        ("reactants", enzmldoc.reactants.iter().map(|r| r.id.as_str()).collect()),
        ("reactions", enzmldoc.reactions.iter().map(|r| r.id.as_str()).collect()),
        (
            "measurements",
            enzmldoc.measurements.iter().map(|m| m.id.as_str()).collect(),
        ),
    ];

    let mut seen = HashSet::new();
    for (collection, ids) in collections.iter() {
        for (idx, id) in ids.iter().enumerate() {
            if !seen.insert(*id) {
                report.add_result(ValidationResult::new(
                    format!("/{collection}/{idx}"),
                    format!("Identifier '{id}' is used more than once."),
                    Severity::Error,
                    Some(id.to_string()),
                ));
            }
        }
    }
}
