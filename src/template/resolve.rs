//! Name-to-id resolution and cell normalisers
//!
//! Sheets refer to vessels and species by name. This module tokenizes the
//! free-text lists of the reaction sheet, matches names against the document
//! and normalises the few enumerated text values the template uses.

use itertools::Itertools;
use regex::Regex;

use crate::prelude::EnzymeMLDocument;
use crate::template::error::{ReferenceKind, TemplateError};

lazy_static::lazy_static! {
    static ref TEMPERATURE_UNIT: Regex =
        Regex::new(r"^(kelvin|Kelvin|k|K|celsius|Celsius|C|c|fahrenheit|Fahrenheit|F|f)$").unwrap();
}

const QUOTES: [char; 4] = ['\'', '"', '[', ']'];

/// Whether a token is the textual sentinel of a missing value.
fn is_missing_token(token: &str) -> bool {
    token.is_empty() || token.eq_ignore_ascii_case("nan") || token.eq_ignore_ascii_case("none")
}

/// Splits a delimiter-joined list of names into its tokens.
///
/// Tokens are trimmed of whitespace and quote characters. Empty tokens and
/// missing-value sentinels are dropped, duplicates keep their first position.
///
/// ```
/// use enzymeml_mtp::template::resolve::tokenize;
///
/// let tokens = tokenize(" 'BufferA', Enzyme1,, nan, BufferA", ',');
/// assert_eq!(tokens, vec!["BufferA", "Enzyme1"]);
/// ```
pub fn tokenize(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(|token| token.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c)))
        .filter(|token| !is_missing_token(token))
        .map(str::to_string)
        .unique()
        .collect()
}

/// Joins the protein column and the modifier column of a reaction row.
///
/// Missing parts are skipped, so the result is empty if both are missing.
/// Protein entries come first.
pub fn merge_modifier_lists(
    protein_cell: Option<&str>,
    modifier_cell: Option<&str>,
    delimiter: char,
) -> String {
    [protein_cell, modifier_cell]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !is_missing_token(part))
        .join(&delimiter.to_string())
}

/// Resolves a vessel name to its identifier.
///
/// # Errors
///
/// Returns [`TemplateError::UnresolvedReference`] if no vessel of that name exists.
pub fn resolve_vessel(doc: &EnzymeMLDocument, name: &str) -> Result<String, TemplateError> {
    doc.vessel_by_name(name.trim())
        .map(|vessel| vessel.id.clone())
        .ok_or_else(|| TemplateError::UnresolvedReference {
            kind: ReferenceKind::Vessel,
            name: name.trim().to_string(),
            context: "vessel of a species".to_string(),
        })
}

/// Outcome of resolving a list of species names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Resolved identifiers in token order, each at most once
    pub ids: Vec<String>,
    /// Tokens that matched no species of the pool
    pub unresolved: Vec<String>,
}

/// Resolves a delimiter-joined list of species names against a pool of
/// `(name, id)` pairs.
///
/// A missing cell yields an empty resolution. Names are matched exactly after
/// tokenizing; the first pool entry of a name wins.
pub fn resolve_species_list(
    raw: Option<&str>,
    pool: &[(&str, &str)],
    delimiter: char,
) -> Resolution {
    let mut resolution = Resolution::default();

    let Some(raw) = raw else {
        return resolution;
    };

    for token in tokenize(raw, delimiter) {
        match pool.iter().find(|(name, _)| *name == token) {
            Some((_, id)) if !resolution.ids.iter().any(|known| known == id) => {
                resolution.ids.push(id.to_string())
            }
            Some(_) => {}
            None => resolution.unresolved.push(token),
        }
    }

    resolution
}

/// Parses the "Constant" column.
pub fn parse_constant(text: &str) -> Result<bool, String> {
    match text.trim().to_lowercase().as_str() {
        "constant" | "true" | "yes" => Ok(true),
        "not constant" | "false" | "no" => Ok(false),
        other => Err(format!(
            "expected 'Constant' or 'Not constant', found '{other}'"
        )),
    }
}

/// Parses the "Reversible" column.
pub fn parse_reversible(text: &str) -> Result<bool, String> {
    match text.trim().to_lowercase().as_str() {
        "reversible" | "true" | "yes" => Ok(true),
        "irreversible" | "false" | "no" => Ok(false),
        other => Err(format!(
            "expected 'reversible' or 'irreversible', found '{other}'"
        )),
    }
}

/// Strips degree symbols (including their mis-encoded form `Â°`) from a
/// temperature unit and checks that a Kelvin, Celsius or Fahrenheit unit
/// remains.
pub fn clean_temperature_unit(text: &str) -> Result<String, String> {
    let cleaned = text.replace('Â', "").replace('°', "");
    let cleaned = cleaned.trim();

    if TEMPERATURE_UNIT.is_match(cleaned) {
        Ok(cleaned.to_string())
    } else {
        Err(format!("unknown temperature unit '{}'", text.trim()))
    }
}

/// Maps missing-value sentinels of optional identifier fields to `None`.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !is_missing_token(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("ABTS", ','), vec!["ABTS"]);
        assert_eq!(tokenize("['ABTS', \"H2O2\"]", ','), vec!["ABTS", "H2O2"]);
        assert_eq!(tokenize("ABTS | H2O2 |", '|'), vec!["ABTS", "H2O2"]);
        assert!(tokenize("nan", ',').is_empty());
        assert!(tokenize(" , ,", ',').is_empty());
    }

    #[test]
    fn test_merge_modifier_lists() {
        assert_eq!(
            merge_modifier_lists(Some("Enzyme1"), Some("BufferA, Enzyme1"), ','),
            "Enzyme1,BufferA, Enzyme1"
        );
        assert_eq!(merge_modifier_lists(Some("nan"), Some("BufferA"), ','), "BufferA");
        assert_eq!(merge_modifier_lists(Some("Enzyme1"), None, ','), "Enzyme1");
        assert_eq!(merge_modifier_lists(None, Some("NaN"), ','), "");
    }

    #[test]
    fn test_resolve_species_list() {
        let pool = [("Enzyme1", "p0"), ("BufferA", "s0"), ("ABTS", "s1")];
        let merged = merge_modifier_lists(Some("Enzyme1"), Some("BufferA, Enzyme1"), ',');

        let resolution = resolve_species_list(Some(&merged), &pool, ',');
        assert_eq!(resolution.ids, vec!["p0", "s0"]);
        assert!(resolution.unresolved.is_empty());

        let resolution = resolve_species_list(Some("ABTS, Glucose"), &pool, ',');
        assert_eq!(resolution.ids, vec!["s1"]);
        assert_eq!(resolution.unresolved, vec!["Glucose"]);

        assert_eq!(resolve_species_list(None, &pool, ','), Resolution::default());
    }

    #[test]
    fn test_resolve_vessel() {
        let mut doc = EnzymeMLDocumentBuilder::default()
            .name("test")
            .build()
            .expect("Failed to build document");
        doc.add_to_vessels(
            VesselBuilder::default()
                .name("MTP 96 well")
                .volume(200.0)
                .unit("ul")
                .clone(),
        )
        .expect("Failed to add vessel");

        assert_eq!(
            resolve_vessel(&doc, "MTP 96 well").expect("Failed to resolve"),
            "v0"
        );
        assert!(matches!(
            resolve_vessel(&doc, "Cuvette"),
            Err(TemplateError::UnresolvedReference { kind: ReferenceKind::Vessel, name, .. }) if name == "Cuvette"
        ));
    }

    #[test]
    fn test_normalisers() {
        assert_eq!(parse_constant("Constant"), Ok(true));
        assert_eq!(parse_constant("Not constant"), Ok(false));
        assert!(parse_constant("sometimes").is_err());

        assert_eq!(parse_reversible("irreversible"), Ok(false));
        assert_eq!(parse_reversible("Reversible"), Ok(true));

        assert_eq!(clean_temperature_unit("Â°C"), Ok("C".to_string()));
        assert_eq!(clean_temperature_unit("K"), Ok("K".to_string()));
        assert_eq!(clean_temperature_unit("°F"), Ok("F".to_string()));
        assert!(clean_temperature_unit("warm").is_err());

        assert_eq!(clean_optional(Some("nan".to_string())), None);
        assert_eq!(clean_optional(Some(" P12345 ".to_string())), Some("P12345".to_string()));
    }
}
