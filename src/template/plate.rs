//! Plate layout validation
//!
//! Every species of an experiment has its own plate grid of initial
//! concentrations. Measurements are only generated once all grids agree on
//! the set of populated wells.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};

use crate::template::error::TemplateError;
use crate::template::layout::{PLATE_COLUMNS, PLATE_ROWS};

/// Splits a well label such as `B7` into its 0-based `(row, column)`.
///
/// Returns `None` for labels outside of a 96-well plate.
pub fn well_position(label: &str) -> Option<(usize, usize)> {
    let mut chars = label.trim().chars();
    let row_label = chars.next()?.to_ascii_uppercase();
    let row = PLATE_ROWS.iter().position(|r| *r == row_label)?;
    let col: usize = chars.as_str().parse().ok()?;

    (1..=PLATE_COLUMNS)
        .contains(&col)
        .then_some((row, col - 1))
}

/// Orders well labels row-major (`A1` < `A2` < `A10` < `B1`). Labels that are
/// not plate positions sort after all wells, alphabetically.
pub fn plate_order(a: &str, b: &str) -> Ordering {
    match (well_position(a), well_position(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Validates that all species grids are populated at the same wells.
///
/// # Arguments
///
/// * `grids` - Species name to its plate grid (well label to value)
///
/// # Returns
///
/// Returns the union of populated wells in plate order.
///
/// # Errors
///
/// * [`TemplateError::EmptyLayout`] - No grids were given
/// * [`TemplateError::LayoutInconsistency`] - A species lacks wells populated
///   in another grid. The error names the first such species and the wells
///   it lacks, in plate order.
pub fn validate_plate_layout(
    grids: &IndexMap<String, IndexMap<String, f64>>,
) -> Result<Vec<String>, TemplateError> {
    if grids.is_empty() {
        return Err(TemplateError::EmptyLayout);
    }

    let union: IndexSet<&str> = grids
        .values()
        .flat_map(|grid| grid.keys().map(String::as_str))
        .collect();

    for (species, grid) in grids {
        let mut missing: Vec<String> = union
            .iter()
            .filter(|well| !grid.contains_key(**well))
            .map(|well| well.to_string())
            .collect();

        if !missing.is_empty() {
            missing.sort_by(|a, b| plate_order(a, b));
            return Err(TemplateError::LayoutInconsistency {
                species: species.clone(),
                wells: missing,
            });
        }
    }

    let mut wells: Vec<String> = union.into_iter().map(str::to_string).collect();
    wells.sort_by(|a, b| plate_order(a, b));

    if wells.is_empty() {
        log::warn!("No well of the plate holds an initial concentration");
    }

    Ok(wells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(wells: &[&str]) -> IndexMap<String, f64> {
        wells.iter().map(|w| (w.to_string(), 1.0)).collect()
    }

    #[test]
    fn test_well_position() {
        assert_eq!(well_position("A1"), Some((0, 0)));
        assert_eq!(well_position("h12"), Some((7, 11)));
        assert_eq!(well_position("I1"), None);
        assert_eq!(well_position("A13"), None);
        assert_eq!(well_position("A"), None);
    }

    #[test]
    fn test_plate_order() {
        let mut wells = vec!["B1", "A10", "A2", "X", "A1"];
        wells.sort_by(|a, b| plate_order(a, b));
        assert_eq!(wells, vec!["A1", "A2", "A10", "B1", "X"]);
    }

    #[test]
    fn test_homogeneous_layout() {
        let mut grids = IndexMap::new();
        grids.insert("ABTS".to_string(), grid(&["B1", "A1", "A2"]));
        grids.insert("Enzyme1".to_string(), grid(&["A1", "A2", "B1"]));

        let wells = validate_plate_layout(&grids).expect("Layout should be valid");
        assert_eq!(wells, vec!["A1", "A2", "B1"]);
    }

    #[test]
    fn test_reports_missing_wells() {
        let mut grids = IndexMap::new();
        grids.insert("X".to_string(), grid(&["A1", "A2", "B1"]));
        grids.insert("Y".to_string(), grid(&["A1", "B1"]));

        match validate_plate_layout(&grids) {
            Err(TemplateError::LayoutInconsistency { species, wells }) => {
                assert_eq!(species, "Y");
                assert_eq!(wells, vec!["A2"]);
            }
            other => panic!("Expected layout inconsistency, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_layout() {
        assert!(matches!(
            validate_plate_layout(&IndexMap::new()),
            Err(TemplateError::EmptyLayout)
        ));
    }
}
