use std::collections::HashSet;

use crate::prelude::{DataTypes, EnzymeMLDocument, Measurement, MeasurementData, Replicate};

use super::consistency::{get_species_ids, Report, Severity, ValidationResult};

/// Validates measurements in an EnzymeML document by checking:
/// - Referenced species exist in the document
/// - Species data and replicates point back to their measurement
/// - Replicate time and data vectors have consistent lengths
/// - Initial concentrations match the first concentration at t=0
pub(super) fn check_measurements(enzmldoc: &EnzymeMLDocument, report: &mut Report) {
    let all_species = get_species_ids(enzmldoc);

    for (meas_idx, measurement) in enzmldoc.measurements.iter().enumerate() {
        let mut seen = HashSet::new();

        for (data_idx, meas_data) in measurement.species_data.iter().enumerate() {
            let location = format!("/measurements/{meas_idx}/species_data/{data_idx}");

            if !seen.insert(meas_data.species_id.as_str()) {
                report.add_result(ValidationResult::new(
                    location.as_str(),
                    format!(
                        "Species '{}' has more than one dataset in measurement '{}'.",
                        meas_data.species_id, measurement.id
                    ),
                    Severity::Warning,
                    Some(measurement.id.clone()),
                ));
            }

            check_species_reference(report, measurement, meas_data, &all_species, &location);

            for (rep_idx, replicate) in meas_data.replicates.iter().enumerate() {
                let location = format!("{location}/replicates/{rep_idx}");
                check_replicate_references(report, measurement, meas_data, replicate, &location);
                check_time_data_consistency(report, measurement, replicate, &location);
                check_initial_concentration(report, measurement, meas_data, replicate, &location);
            }
        }
    }
}

fn check_species_reference(
    report: &mut Report,
    measurement: &Measurement,
    meas_data: &MeasurementData,
    all_species: &HashSet<&str>,
    location: &str,
) {
    if !all_species.contains(meas_data.species_id.as_str()) {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Species '{}' in measurement '{}' is not defined in the document.",
                meas_data.species_id, measurement.id
            ),
            Severity::Error,
            Some(measurement.id.clone()),
        ));
    }

    if meas_data.measurement_id != measurement.id {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Dataset of species '{}' refers to measurement '{}' but is part of '{}'.",
                meas_data.species_id, meas_data.measurement_id, measurement.id
            ),
            Severity::Error,
            Some(measurement.id.clone()),
        ));
    }
}

fn check_replicate_references(
    report: &mut Report,
    measurement: &Measurement,
    meas_data: &MeasurementData,
    replicate: &Replicate,
    location: &str,
) {
    if replicate.species_id != meas_data.species_id {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Replicate '{}' refers to species '{}' but belongs to the dataset of '{}'.",
                replicate.id, replicate.species_id, meas_data.species_id
            ),
            Severity::Error,
            Some(measurement.id.clone()),
        ));
    }

    if replicate.measurement_id != measurement.id {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Replicate '{}' refers to measurement '{}' but is part of '{}'.",
                replicate.id, replicate.measurement_id, measurement.id
            ),
            Severity::Error,
            Some(measurement.id.clone()),
        ));
    }
}

fn check_time_data_consistency(
    report: &mut Report,
    measurement: &Measurement,
    replicate: &Replicate,
    location: &str,
) {
    if replicate.time.len() != replicate.data.len() {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Data and time vectors of replicate '{}' have different lengths. \
                Got {} data points and {} time points.",
                replicate.id,
                replicate.data.len(),
                replicate.time.len()
            ),
            Severity::Error,
            Some(measurement.id.clone()),
        ));
    }
}

/// Only concentration data can be compared against the initial concentration.
fn check_initial_concentration(
    report: &mut Report,
    measurement: &Measurement,
    meas_data: &MeasurementData,
    replicate: &Replicate,
    location: &str,
) {
    if replicate.data_type != DataTypes::Concentration {
        return;
    }

    let (Some(t0), Some(first)) = (replicate.time.first(), replicate.data.first()) else {
        return;
    };

    if *t0 == 0.0 && *first != meas_data.init_conc {
        report.add_result(ValidationResult::new(
            location,
            format!(
                "Initial concentration ({}) does not match first data point at t=0 ({first}) for species '{}'.",
                meas_data.init_conc, meas_data.species_id
            ),
            Severity::Warning,
            Some(measurement.id.clone()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    fn document(data: MeasurementData) -> EnzymeMLDocument {
        EnzymeMLDocumentBuilder::default()
            .name("test")
            .to_reactants(
                ReactantBuilder::default()
                    .id("s0")
                    .name("ABTS")
                    .vessel_id("v0")
                    .build()
                    .expect("Failed to build reactant"),
            )
            .to_measurements(
                MeasurementBuilder::default()
                    .id("m0")
                    .name("A1")
                    .to_species_data(data)
                    .build()
                    .expect("Failed to build measurement"),
            )
            .build()
            .expect("Failed to build document")
    }

    fn replicate(species_id: &str, measurement_id: &str, first: f64) -> Replicate {
        ReplicateBuilder::default()
            .id("A1")
            .species_id(species_id)
            .measurement_id(measurement_id)
            .data_unit("mM")
            .time_unit("min")
            .time(vec![0.0, 1.0])
            .data(vec![first, 0.5])
            .build()
            .expect("Failed to build replicate")
    }

    fn data(species_id: &str, measurement_id: &str, replicate: Replicate) -> MeasurementData {
        MeasurementDataBuilder::default()
            .species_id(species_id)
            .measurement_id(measurement_id)
            .init_conc(1.0)
            .unit("mM")
            .to_replicates(replicate)
            .build()
            .expect("Failed to build measurement data")
    }

    #[test]
    fn test_valid_measurement() {
        let enzmldoc = document(data("s0", "m0", replicate("s0", "m0", 1.0)));

        let mut report = Report::new();
        check_measurements(&enzmldoc, &mut report);

        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_undefined_species() {
        let enzmldoc = document(data("s1", "m0", replicate("s1", "m0", 1.0)));

        let mut report = Report::new();
        check_measurements(&enzmldoc, &mut report);

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].location(), "/measurements/0/species_data/0");
    }

    #[test]
    fn test_replicate_points_elsewhere() {
        let enzmldoc = document(data("s0", "m0", replicate("s0", "m1", 1.0)));

        let mut report = Report::new();
        check_measurements(&enzmldoc, &mut report);

        assert!(!report.is_valid);
        assert_eq!(
            report.errors[0].location(),
            "/measurements/0/species_data/0/replicates/0"
        );
    }

    #[test]
    fn test_initial_concentration_mismatch() {
        let enzmldoc = document(data("s0", "m0", replicate("s0", "m0", 2.0)));

        let mut report = Report::new();
        check_measurements(&enzmldoc, &mut report);

        assert!(report.is_valid);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_unequal_lengths_from_json() {
        let mut enzmldoc = document(data("s0", "m0", replicate("s0", "m0", 1.0)));
        enzmldoc.measurements[0].species_data[0].replicates[0]
            .data
            .push(0.1);

        let mut report = Report::new();
        check_measurements(&enzmldoc, &mut report);

        assert!(!report.is_valid);
        assert_eq!(report.count(Severity::Error), 1);
    }
}
