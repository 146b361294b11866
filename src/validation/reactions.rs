use std::collections::HashSet;

use crate::prelude::{EnzymeMLDocument, Reaction, ReactionElement};
use crate::validation::consistency::{get_species_ids, Report, Severity, ValidationResult};

/// Validates that every educt, product and modifier of a reaction refers to
/// a species of the document.
pub(super) fn check_reactions(enzmldoc: &EnzymeMLDocument, report: &mut Report) {
    let all_species = get_species_ids(enzmldoc);

    for (reaction_idx, reaction) in enzmldoc.reactions.iter().enumerate() {
        check_reaction_species(report, reaction, &all_species, reaction_idx);

        if reaction.educts.is_empty() && reaction.products.is_empty() {
            report.add_result(ValidationResult::new(
                format!("/reactions/{reaction_idx}"),
                format!("Reaction '{}' has neither educts nor products.", reaction.id),
                Severity::Warning,
                Some(reaction.id.clone()),
            ));
        }
    }
}

fn check_reaction_species(
    report: &mut Report,
    reaction: &Reaction,
    all_species: &HashSet<&str>,
    reaction_idx: usize,
) {
    let lists: [(&str, &Vec<ReactionElement>); 3] = [
        ("educts", &reaction.educts),
        ("products", &reaction.products),
        ("modifiers", &reaction.modifiers),
    ];

    for (list, elements) in lists {
        for (elem_idx, element) in elements.iter().enumerate() {
            if !all_species.contains(element.species_id.as_str()) {
                report.add_result(ValidationResult::new(
                    format!("/reactions/{reaction_idx}/{list}/{elem_idx}"),
                    format!(
                        "Species '{}' in reaction '{}' is not defined in the document.",
                        element.species_id, reaction.id
                    ),
                    Severity::Error,
                    Some(reaction.id.clone()),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn element(species_id: &str) -> ReactionElement {
        ReactionElementBuilder::default()
            .species_id(species_id)
            .build()
            .expect("Failed to build element")
    }

    #[test]
    fn test_undefined_modifier() {
        let enzmldoc = EnzymeMLDocumentBuilder::default()
            .name("test")
            .to_reactants(
                ReactantBuilder::default()
                    .id("s0")
                    .name("ABTS")
                    .vessel_id("v0")
                    .build()
                    .expect("Failed to build reactant"),
            )
            .to_reactions(
                ReactionBuilder::default()
                    .id("r0")
                    .name("Oxidation")
                    .to_educts(element("s0"))
                    .to_modifiers(element("p0"))
                    .build()
                    .expect("Failed to build reaction"),
            )
            .build()
            .expect("Failed to build document");

        let mut report = Report::new();
        check_reactions(&enzmldoc, &mut report);

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].location(), "/reactions/0/modifiers/0");
    }

    #[test]
    fn test_empty_reaction_warns() {
        let enzmldoc = EnzymeMLDocumentBuilder::default()
            .name("test")
            .to_reactions(
                ReactionBuilder::default()
                    .id("r0")
                    .name("Nothing")
                    .build()
                    .expect("Failed to build reaction"),
            )
            .build()
            .expect("Failed to build document");

        let mut report = Report::new();
        check_reactions(&enzmldoc, &mut report);

        assert!(report.is_valid);
        assert_eq!(report.count(Severity::Warning), 1);
    }
}
