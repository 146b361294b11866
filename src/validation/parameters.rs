use crate::prelude::{EnzymeMLDocument, KineticParameter};
use crate::validation::consistency::{Report, Severity, ValidationResult};

/// Validates the global parameters and the parameters of every kinetic model
///
/// # Details
/// Lower bounds above upper bounds are errors. Values and initial values
/// outside of their bounds are warnings.
pub(super) fn check_parameters(enzmldoc: &EnzymeMLDocument, report: &mut Report) {
    for (idx, parameter) in enzmldoc.global_parameters.iter().enumerate() {
        check_bounds(report, parameter, format!("/global_parameters/{idx}"));
    }

    for (reaction_idx, reaction) in enzmldoc.reactions.iter().enumerate() {
        let Some(model) = &reaction.model else {
            continue;
        };

        for (idx, parameter) in model.parameters.iter().enumerate() {
            check_bounds(
                report,
                parameter,
                format!("/reactions/{reaction_idx}/model/parameters/{idx}"),
            );
        }
    }
}

fn check_bounds(report: &mut Report, parameter: &KineticParameter, location: String) {
    let (Some(lower), Some(upper)) = (parameter.lower, parameter.upper) else {
        return;
    };

    if lower > upper {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Parameter '{}' has a lower bound ({lower}) above its upper bound ({upper}).",
                parameter.name
            ),
            Severity::Error,
            Some(parameter.name.clone()),
        ));
        return;
    }

    let outside = |value: f64| value < lower || value > upper;
    if outside(parameter.value) || parameter.initial_value.is_some_and(outside) {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Parameter '{}' lies outside of its bounds [{lower}, {upper}].",
                parameter.name
            ),
            Severity::Warning,
            Some(parameter.name.clone()),
        ));
    }
}
