//! Tabular Data Conversion Module
//!
//! Converts measurements into Polars DataFrames for analysis:
//!
//! - [`Measurement::to_dataframe`] puts every replicate next to the global
//!   time axis of the measurement. Time points a replicate has no value for
//!   become nulls.
//! - [`EnzymeMLDocument::initial_conditions`] lays out the initial
//!   concentrations of all species, one row per measurement (i.e. per well).

use polars::prelude::*;

use crate::prelude::{EnzymeMLDocument, Measurement, MeasurementData, Replicate};

impl Measurement {
    /// Converts the Measurement into a DataFrame.
    ///
    /// # Arguments
    ///
    /// * `include_non_measured` - Adds a null column for every species without
    ///   replicates. Defaults to `true`.
    ///
    /// # Returns
    ///
    /// Returns a DataFrame with a `time` column and one column per replicate,
    /// named after the species. Species with several replicates get columns
    /// named `{species_id}_{replicate_id}`.
    pub fn to_dataframe(
        &self,
        include_non_measured: impl Into<Option<bool>>,
    ) -> PolarsResult<DataFrame> {
        let include_non_measured = include_non_measured.into().unwrap_or(true);
        let time = self.time_axis();

        let mut columns = vec![Series::new("time", time.clone())];

        for data in self.species_data.iter() {
            if data.replicates.is_empty() {
                if include_non_measured {
                    columns.push(Series::new_null(&data.species_id, time.len()));
                }
                continue;
            }

            for replicate in data.replicates.iter() {
                columns.push(Series::new(
                    &column_name(data, replicate),
                    align(&time, replicate),
                ));
            }
        }

        DataFrame::new(columns)
    }

    /// The global time axis, or the time points of the first replicate if
    /// the measurement has none.
    fn time_axis(&self) -> Vec<f64> {
        if !self.global_time.is_empty() {
            return self.global_time.clone();
        }

        self.species_data
            .iter()
            .flat_map(|data| data.replicates.iter())
            .map(|replicate| replicate.time.clone())
            .next()
            .unwrap_or_default()
    }
}

impl EnzymeMLDocument {
    /// Lays out the initial concentrations of all measurements.
    ///
    /// # Returns
    ///
    /// Returns a DataFrame with a `measurement` column holding the measurement
    /// names and one column per species. Species without data in a
    /// measurement are null.
    pub fn initial_conditions(&self) -> PolarsResult<DataFrame> {
        let names: Vec<&str> = self.measurements.iter().map(|m| m.name.as_str()).collect();
        let mut columns = vec![Series::new("measurement", names)];

        let species = self
            .proteins
            .iter()
            .map(|p| p.id.as_str())
            .chain(self.complexes.iter().map(|c| c.id.as_str()))
            .chain(self.reactants.iter().map(|r| r.id.as_str()));

        for species_id in species {
            let values: Vec<Option<f64>> = self
                .measurements
                .iter()
                .map(|m| {
                    m.species_data
                        .iter()
                        .find(|data| data.species_id == species_id)
                        .map(|data| data.init_conc)
                })
                .collect();

            if values.iter().any(Option::is_some) {
                columns.push(Series::new(species_id, values));
            }
        }

        DataFrame::new(columns)
    }
}

fn column_name(data: &MeasurementData, replicate: &Replicate) -> String {
    if data.replicates.len() > 1 {
        format!("{}_{}", data.species_id, replicate.id)
    } else {
        data.species_id.clone()
    }
}

/// Places the values of a replicate at the matching points of the time axis.
fn align(time: &[f64], replicate: &Replicate) -> Vec<Option<f64>> {
    time.iter()
        .map(|t| {
            replicate
                .time
                .iter()
                .position(|rt| rt == t)
                .and_then(|idx| replicate.data.get(idx).copied())
        })
        .collect()
}
