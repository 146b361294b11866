use std::collections::HashSet;

use crate::prelude::EnzymeMLDocument;
use crate::validation::consistency::{Report, Severity, ValidationResult};

/// Validates that every protein, complex and reactant sits in a vessel of the
/// document and that complexes are made of known species.
pub(super) fn check_species(enzmldoc: &EnzymeMLDocument, report: &mut Report) {
    let vessels: HashSet<&str> = enzmldoc.vessels.iter().map(|v| v.id.as_str()).collect();

    let species = enzmldoc
        .proteins
        .iter()
        .enumerate()
        .map(|(idx, p)| ("proteins", idx, p.id.as_str(), p.vessel_id.as_str()))
        .chain(
            enzmldoc
                .complexes
                .iter()
                .enumerate()
                .map(|(idx, c)| ("complexes", idx, c.id.as_str(), c.vessel_id.as_str())),
        )
        .chain(
            enzmldoc
                .reactants
                .iter()
                .enumerate()
                .map(|(idx, r)| ("reactants", idx, r.id.as_str(), r.vessel_id.as_str())),
        );

    for (collection, idx, id, vessel_id) in species {
        if !vessels.contains(vessel_id) {
            report.add_result(ValidationResult::new(
                format!("/{collection}/{idx}/vessel_id"),
                format!("Species '{id}' refers to vessel '{vessel_id}', which is not defined in the document."),
                Severity::Error,
                Some(id.to_string()),
            ));
        }
    }

    check_complex_participants(enzmldoc, report);
}

fn check_complex_participants(enzmldoc: &EnzymeMLDocument, report: &mut Report) {
    let known: HashSet<&str> = enzmldoc
        .proteins
        .iter()
        .map(|p| p.id.as_str())
        .chain(enzmldoc.reactants.iter().map(|r| r.id.as_str()))
        .collect();

    for (complex_idx, complex) in enzmldoc.complexes.iter().enumerate() {
        for (idx, participant) in complex.participants.iter().enumerate() {
            if !known.contains(participant.as_str()) {
                report.add_result(ValidationResult::new(
                    format!("/complexes/{complex_idx}/participants/{idx}"),
                    format!(
                        "Participant '{participant}' of complex '{}' is not a protein or reactant of the document.",
                        complex.id
                    ),
                    Severity::Error,
                    Some(complex.id.clone()),
                ));
            }
        }
    }
}
