//! Record types of the EnzymeML document graph.
//!
//! One set of records covers every template revision the importer reads. Each
//! record derives a `derive_builder` builder; builders that guard an invariant
//! (positive stoichiometry, positive volume, pH range, replicate shape) run a
//! validation step in `build()`.
//!
//! Cross references between records are plain string identifiers
//! (`vessel_id`, `species_id`, `measurement_id`). Whether they resolve is
//! checked by [`crate::validation::consistency::check_consistency`].

use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

//
// Type definitions
//

/// The EnzymeMLDocument is the root object that composes all objects of an
/// enzymatic experiment. Besides general metadata such as the name of the
/// document, creation/modification dates and references to publications, it
/// contains the vessels, species, reactions and measurements of the
/// experiment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct EnzymeMLDocument {
    /// Title of the EnzymeML Document.
    #[builder(setter(into))]
    pub name: String,

    /// Date the EnzymeML Document was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub created: Option<String>,

    /// Date the EnzymeML Document was modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub modified: Option<String>,

    /// Digital Object Identifier of the referenced publication or the
    /// EnzymeML document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub doi: Option<String>,

    /// PubMed ID reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub pubmedid: Option<String>,

    /// Arbitrary type of URL that is related to the EnzymeML document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub url: Option<String>,

    /// Contains all authors that are part of the experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_creators")))]
    pub creators: Vec<Creator>,

    /// Contains all vessels that are part of the experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_vessels")))]
    pub vessels: Vec<Vessel>,

    /// Contains all proteins that are part of the experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_proteins")))]
    pub proteins: Vec<Protein>,

    /// Contains all complexes that are part of the experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_complexes")))]
    pub complexes: Vec<Complex>,

    /// Contains all reactants (small molecules) that are part of the
    /// experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_reactants")))]
    pub reactants: Vec<Reactant>,

    /// Contains all reactions that are part of the experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_reactions")))]
    pub reactions: Vec<Reaction>,

    /// Contains measurements that describe outcomes of an experiment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_measurements")))]
    pub measurements: Vec<Measurement>,

    /// Kinetic parameters that are shared between reactions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_global_parameters")))]
    pub global_parameters: Vec<KineticParameter>,
}

/// The Creator object represents an individual author or contributor who
/// has participated in creating or modifying the EnzymeML Document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct Creator {
    /// Given name of the author or contributor.
    #[builder(setter(into))]
    pub given_name: String,

    /// Family name of the author or contributor.
    #[builder(setter(into))]
    pub family_name: String,

    /// Email address of the author or contributor.
    #[builder(setter(into))]
    pub mail: String,
}

/// The Vessel object represents the container an experiment has been
/// carried out in. For plate-reader experiments one 96-well plate is one
/// vessel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Vessel {
    /// Unique identifier of the vessel.
    #[builder(setter(into))]
    pub id: String,

    /// Name of the used vessel.
    #[builder(setter(into))]
    pub name: String,

    /// Volumetric value of the vessel. Must be positive.
    #[builder(setter(into))]
    pub volume: f64,

    /// Volumetric unit of the vessel.
    #[builder(setter(into))]
    pub unit: String,

    /// Whether the volume of the vessel is constant or not. Default is True.
    #[serde(default = "default_true")]
    #[builder(default = "true")]
    pub constant: bool,
}

impl VesselBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.volume {
            Some(volume) if !(volume > 0.0) => Err(format!(
                "Vessel volume must be positive, got {volume}"
            )),
            _ => Ok(()),
        }
    }
}

/// The Protein object describes enzymes and other proteins that were used
/// or produced in the course of the experiment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, PartialEq)]
pub struct Protein {
    /// Unique identifier of the protein.
    #[builder(setter(into))]
    pub id: String,

    /// Name of the protein.
    #[builder(setter(into))]
    pub name: String,

    /// Identifier of the vessel this protein has been applied to.
    #[builder(setter(into))]
    pub vessel_id: String,

    /// Whether the concentration of the protein is constant through the
    /// experiment or not. Default is True.
    #[serde(default = "default_true")]
    #[builder(default = "true")]
    pub constant: bool,

    /// Initial concentration of the protein.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub init_conc: Option<f64>,

    /// Unit of the initial concentration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub unit: Option<String>,

    /// Amino acid sequence of the protein.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub sequence: Option<String>,

    /// EC number of the protein.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub ecnumber: Option<String>,

    /// Organism the protein was expressed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub organism: Option<String>,

    /// Taxonomy identifier of the expression host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub organism_tax_id: Option<String>,

    /// Unique identifier referencing a protein entry at UniProt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub uniprotid: Option<String>,

    /// Ontology term describing the species.
    #[serde(default = "SBOTerm::protein")]
    #[builder(default = "SBOTerm::Protein")]
    pub ontology: SBOTerm,
}

/// The Complex object groups multiple species, such as enzyme-substrate
/// complexes or buffer mixtures, by referencing their identifiers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, PartialEq)]
pub struct Complex {
    /// Unique identifier of the complex.
    #[builder(setter(into))]
    pub id: String,

    /// Name of the complex.
    #[builder(setter(into))]
    pub name: String,

    /// Identifier of the vessel this complex has been used in.
    #[builder(setter(into))]
    pub vessel_id: String,

    /// Whether the concentration of the complex is constant through the
    /// experiment or not. Default is False.
    #[serde(default)]
    #[builder(default)]
    pub constant: bool,

    /// Initial concentration of the complex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub init_conc: Option<f64>,

    /// Unit of the initial concentration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub unit: Option<String>,

    /// Identifiers of the species the complex consists of.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_participants", into)))]
    pub participants: Vec<String>,

    /// Ontology term describing the species.
    #[serde(default = "SBOTerm::complex")]
    #[builder(default = "SBOTerm::MacromolecularComplex")]
    pub ontology: SBOTerm,
}

/// The Reactant object describes small molecules that participate in the
/// experiment as educts, products or modifiers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, PartialEq)]
pub struct Reactant {
    /// Unique identifier of the reactant.
    #[builder(setter(into))]
    pub id: String,

    /// Name of the reactant.
    #[builder(setter(into))]
    pub name: String,

    /// Identifier of the vessel this reactant has been used in.
    #[builder(setter(into))]
    pub vessel_id: String,

    /// Whether the concentration of the reactant is constant through the
    /// experiment or not. Default is False.
    #[serde(default)]
    #[builder(default)]
    pub constant: bool,

    /// Initial concentration of the reactant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub init_conc: Option<f64>,

    /// Unit of the initial concentration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub unit: Option<String>,

    /// Simplified Molecular Input Line Entry System (SMILES) encoding of the
    /// reactant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub smiles: Option<String>,

    /// International Chemical Identifier (InChI) encoding of the reactant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub inchi: Option<String>,

    /// Identifier of the reactant at ChEBI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub chebi_id: Option<String>,

    /// Ontology term describing the species.
    #[serde(default = "SBOTerm::small_molecule")]
    #[builder(default = "SBOTerm::SmallMolecule")]
    pub ontology: SBOTerm,
}

/// The Reaction object describes a chemical or enzymatic reaction that was
/// investigated in the course of the experiment. All species referenced by
/// its elements need to be part of the document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Reaction {
    /// Unique identifier of the reaction.
    #[builder(setter(into))]
    pub id: String,

    /// Name of the reaction.
    #[builder(setter(into))]
    pub name: String,

    /// Whether the reaction is reversible or irreversible. Default is False.
    #[serde(default)]
    #[builder(default)]
    pub reversible: bool,

    /// Numeric value of the temperature of the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub temperature: Option<f64>,

    /// Unit of the temperature of the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub temperature_unit: Option<String>,

    /// pH value of the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub ph: Option<f64>,

    /// Ontology defining the type of reaction.
    #[serde(default)]
    #[builder(default)]
    pub ontology: SBOTerm,

    /// Kinetic model describing the reaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub model: Option<KineticModel>,

    /// Species consumed by the reaction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_educts")))]
    pub educts: Vec<ReactionElement>,

    /// Species produced by the reaction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_products")))]
    pub products: Vec<ReactionElement>,

    /// Species that influence the reaction without being converted, such as
    /// enzymes, inhibitors, buffers or counter-ions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_modifiers")))]
    pub modifiers: Vec<ReactionElement>,
}

impl ReactionBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_ph(self.ph.flatten())
    }
}

/// Describes a species taking part in a reaction, either as educt, product
/// or modifier.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ReactionElement {
    /// Internal identifier to either a protein, complex or reactant defined
    /// in the EnzymeMLDocument.
    #[builder(setter(into))]
    pub species_id: String,

    /// Positive float number representing the associated stoichiometry.
    #[serde(default = "default_stoichiometry")]
    #[builder(default = "1.0")]
    pub stoichiometry: f64,

    /// Whether or not the concentration of this species remains constant.
    #[serde(default)]
    #[builder(default)]
    pub constant: bool,

    /// Ontology defining the role of the given species.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub ontology: Option<SBOTerm>,
}

impl ReactionElementBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.stoichiometry {
            Some(stoichiometry) if !(stoichiometry > 0.0) || !stoichiometry.is_finite() => {
                Err(format!(
                    "Stoichiometry must be a positive number, got {stoichiometry}"
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Describes a kinetic model that was derived from the experiment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct KineticModel {
    /// Name of the kinetic law.
    #[builder(setter(into))]
    pub name: String,

    /// Equation of the kinetic law.
    #[builder(setter(into))]
    pub equation: String,

    /// List of estimated parameters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_parameters")))]
    pub parameters: Vec<KineticParameter>,

    /// Type of the kinetic law.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub ontology: Option<SBOTerm>,
}

/// Describes a parameter of a kinetic model, including the estimated value,
/// the bounds used for the estimation and its uncertainty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct KineticParameter {
    /// Name of the estimated parameter.
    #[builder(setter(into))]
    pub name: String,

    /// Numerical value of the estimated parameter.
    #[builder(setter(into))]
    pub value: f64,

    /// Unit of the estimated parameter.
    #[builder(setter(into))]
    pub unit: String,

    /// Initial value that was used for the parameter estimation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub initial_value: Option<f64>,

    /// Upper bound of the estimated parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub upper: Option<f64>,

    /// Lower bound of the estimated parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub lower: Option<f64>,

    /// Standard error of the estimated parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub stderr: Option<f64>,

    /// Specifies if this parameter is a global parameter.
    #[serde(default)]
    #[builder(default)]
    pub is_global: bool,

    /// Specifies if this parameter is constant.
    #[serde(default)]
    #[builder(default)]
    pub constant: bool,

    /// Type of the estimated parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub ontology: Option<SBOTerm>,
}

/// Describes a single measurement, i.e. the conditions and data recorded
/// for one well of a plate. It holds the initial concentrations of all
/// species and the measured time courses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Measurement {
    /// Unique identifier of the measurement.
    #[builder(setter(into))]
    pub id: String,

    /// Name of the measurement. For plate imports this is the well label.
    #[builder(setter(into))]
    pub name: String,

    /// Numeric value of the temperature of the measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub temperature: Option<f64>,

    /// Unit of the temperature of the measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub temperature_unit: Option<String>,

    /// pH value of the measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub ph: Option<f64>,

    /// Measurement data of all species that were part of the measurement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_species_data")))]
    pub species_data: Vec<MeasurementData>,

    /// Global time of the measurement all replicates agree on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into))]
    pub global_time: Vec<f64>,

    /// Unit of the global time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into))]
    pub global_time_unit: Option<String>,
}

impl MeasurementBuilder {
    fn validate(&self) -> Result<(), String> {
        validate_ph(self.ph.flatten())
    }
}

/// Describes the data of one species within one measurement: its initial
/// concentration and any number of replicate time courses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
pub struct MeasurementData {
    /// The identifier of the described species.
    #[builder(setter(into))]
    pub species_id: String,

    /// Identifier of the measurement this dataset belongs to.
    #[builder(setter(into))]
    pub measurement_id: String,

    /// Initial concentration of the species.
    #[builder(setter(into))]
    pub init_conc: f64,

    /// Unit of the initial concentration.
    #[builder(setter(into))]
    pub unit: String,

    /// Replicates holding the raw time course data of the species.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default, setter(into, each(name = "to_replicates")))]
    pub replicates: Vec<Replicate>,
}

/// Contains the measured time course data of one species together with the
/// metadata of the replicate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Builder, Default, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Replicate {
    /// Unique identifier of the replicate.
    #[builder(setter(into))]
    pub id: String,

    /// Identifier of the species that has been measured.
    #[builder(setter(into))]
    pub species_id: String,

    /// Identifier of the measurement the replicate is part of.
    #[builder(setter(into))]
    pub measurement_id: String,

    /// Type of data that was measured.
    #[serde(default)]
    #[builder(default)]
    pub data_type: DataTypes,

    /// Unit of the measured data.
    #[builder(setter(into))]
    pub data_unit: String,

    /// Unit of the time points.
    #[builder(setter(into))]
    pub time_unit: String,

    /// Time points of the replicate.
    #[serde(default)]
    #[builder(default, setter(into))]
    pub time: Vec<f64>,

    /// Data that was measured at the time points.
    #[serde(default)]
    #[builder(default, setter(into))]
    pub data: Vec<f64>,

    /// Whether or not the data has been generated by simulation.
    #[serde(default)]
    #[builder(default)]
    pub is_calculated: bool,
}

impl ReplicateBuilder {
    fn validate(&self) -> Result<(), String> {
        let time = self.time.as_ref().map_or(0, Vec::len);
        let data = self.data.as_ref().map_or(0, Vec::len);

        if time != data {
            return Err(format!(
                "Replicate time and data must have the same length. Got {time} time points and {data} data points"
            ));
        }

        Ok(())
    }
}

//
// Enum definitions
//

/// Type of data a replicate holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq, Hash)]
pub enum DataTypes {
    #[default]
    #[serde(rename = "conc")]
    Concentration,

    #[serde(rename = "abs")]
    Absorption,

    #[serde(rename = "fluorescence")]
    Fluorescence,

    #[serde(rename = "luminescence")]
    Luminescence,

    #[serde(rename = "conversion")]
    Conversion,

    #[serde(rename = "peak-area")]
    PeakArea,

    #[serde(rename = "feed")]
    Feed,

    #[serde(rename = "biomass")]
    Biomass,
}

/// Systems Biology Ontology terms used to annotate species, reactions and
/// the roles of reaction elements.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq, Hash)]
pub enum SBOTerm {
    #[default]
    #[serde(rename = "SBO:0000176")]
    BiochemicalReaction,

    #[serde(rename = "SBO:0000208")]
    AcidBaseReaction,

    #[serde(rename = "SBO:0000181")]
    ConformationalTransition,

    #[serde(rename = "SBO:0000182")]
    ConversionReaction,

    #[serde(rename = "SBO:0000179")]
    DegradationReaction,

    #[serde(rename = "SBO:0000180")]
    Dissociation,

    #[serde(rename = "SBO:0000209")]
    Ionisation,

    #[serde(rename = "SBO:0000377")]
    Isomerisation,

    #[serde(rename = "SBO:0000177")]
    NonCovalentBinding,

    #[serde(rename = "SBO:0000200")]
    RedoxReaction,

    #[serde(rename = "SBO:0000672")]
    SpontaneousReaction,

    #[serde(rename = "SBO:0000252")]
    Protein,

    #[serde(rename = "SBO:0000247")]
    SmallMolecule,

    #[serde(rename = "SBO:0000327")]
    Ion,

    #[serde(rename = "SBO:0000296")]
    MacromolecularComplex,

    #[serde(rename = "SBO:0000015")]
    Substrate,

    #[serde(rename = "SBO:0000011")]
    Product,

    #[serde(rename = "SBO:0000013")]
    Catalyst,

    #[serde(rename = "SBO:0000020")]
    Inhibitor,

    #[serde(rename = "SBO:0000461")]
    EssentialActivator,

    #[serde(rename = "SBO:0000462")]
    NonEssentialActivator,

    #[serde(rename = "SBO:0000019")]
    Modifier,
}

impl SBOTerm {
    fn protein() -> Self {
        SBOTerm::Protein
    }

    fn small_molecule() -> Self {
        SBOTerm::SmallMolecule
    }

    fn complex() -> Self {
        SBOTerm::MacromolecularComplex
    }
}

impl Default for ReactionElement {
    fn default() -> Self {
        Self {
            species_id: String::new(),
            stoichiometry: default_stoichiometry(),
            constant: false,
            ontology: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_stoichiometry() -> f64 {
    1.0
}

fn validate_ph(ph: Option<f64>) -> Result<(), String> {
    match ph {
        Some(ph) if !(0.0..=14.0).contains(&ph) => {
            Err(format!("pH must be within 0 and 14, got {ph}"))
        }
        _ => Ok(()),
    }
}
