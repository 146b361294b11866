//! Construction and lookup helpers on [`EnzymeMLDocument`].
//!
//! Documents are assembled append-only: every `add_to_*` method takes a builder
//! of the entity, assigns the next free identifier of the entity's kind and
//! pushes the built record. Identifiers follow the `{prefix}{index}` scheme
//! (`v0`, `p0`, `c0`, `s0`, `r0`, `m0`), using the smallest free index.

use crate::prelude::{
    Complex, ComplexBuilder, ComplexBuilderError, Creator, EnzymeMLDocument, Measurement,
    MeasurementBuilder, MeasurementBuilderError, Protein, ProteinBuilder, ProteinBuilderError,
    Reactant, ReactantBuilder, ReactantBuilderError, Reaction, ReactionBuilder,
    ReactionBuilderError, Vessel, VesselBuilder, VesselBuilderError,
};

/// Identifier prefixes of the entity kinds held by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Vessel,
    Protein,
    Complex,
    Reactant,
    Reaction,
    Measurement,
}

impl IdPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Vessel => "v",
            IdPrefix::Protein => "p",
            IdPrefix::Complex => "c",
            IdPrefix::Reactant => "s",
            IdPrefix::Reaction => "r",
            IdPrefix::Measurement => "m",
        }
    }
}

/// Selects which species a name may be resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesPool {
    /// Only reactants (small molecules).
    Reactants,
    /// Proteins first, then reactants.
    ProteinsAndReactants,
    /// Proteins, complexes and reactants.
    All,
}

impl EnzymeMLDocument {
    /// Generates the next free identifier for the given entity kind.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The kind of entity the identifier is generated for.
    ///
    /// # Returns
    ///
    /// Returns the identifier `{prefix}{index}` with the smallest index that
    /// is not yet taken by an entity of that kind.
    pub fn generate_id(&self, prefix: IdPrefix) -> String {
        let taken: Vec<&str> = match prefix {
            IdPrefix::Vessel => self.vessels.iter().map(|v| v.id.as_str()).collect(),
            IdPrefix::Protein => self.proteins.iter().map(|p| p.id.as_str()).collect(),
            IdPrefix::Complex => self.complexes.iter().map(|c| c.id.as_str()).collect(),
            IdPrefix::Reactant => self.reactants.iter().map(|r| r.id.as_str()).collect(),
            IdPrefix::Reaction => self.reactions.iter().map(|r| r.id.as_str()).collect(),
            IdPrefix::Measurement => self.measurements.iter().map(|m| m.id.as_str()).collect(),
        };

        let mut index = 0;
        loop {
            let candidate = format!("{}{}", prefix.as_str(), index);
            if !taken.contains(&candidate.as_str()) {
                return candidate;
            }
            index += 1;
        }
    }

    /// Appends a creator to the document.
    pub fn add_to_creators(&mut self, creator: Creator) {
        self.creators.push(creator);
    }

    /// Builds a vessel with a generated identifier and appends it.
    ///
    /// # Returns
    ///
    /// Returns the identifier of the new vessel.
    pub fn add_to_vessels(&mut self, mut vessel: VesselBuilder) -> Result<String, VesselBuilderError> {
        let vessel = vessel.id(self.generate_id(IdPrefix::Vessel)).build()?;
        let id = vessel.id.clone();
        self.vessels.push(vessel);
        Ok(id)
    }

    /// Builds a protein with a generated identifier and appends it.
    ///
    /// # Returns
    ///
    /// Returns the identifier of the new protein.
    pub fn add_to_proteins(
        &mut self,
        mut protein: ProteinBuilder,
    ) -> Result<String, ProteinBuilderError> {
        let protein = protein.id(self.generate_id(IdPrefix::Protein)).build()?;
        let id = protein.id.clone();
        self.proteins.push(protein);
        Ok(id)
    }

    /// Builds a complex with a generated identifier and appends it.
    pub fn add_to_complexes(
        &mut self,
        mut complex: ComplexBuilder,
    ) -> Result<String, ComplexBuilderError> {
        let complex = complex.id(self.generate_id(IdPrefix::Complex)).build()?;
        let id = complex.id.clone();
        self.complexes.push(complex);
        Ok(id)
    }

    /// Builds a reactant with a generated identifier and appends it.
    pub fn add_to_reactants(
        &mut self,
        mut reactant: ReactantBuilder,
    ) -> Result<String, ReactantBuilderError> {
        let reactant = reactant.id(self.generate_id(IdPrefix::Reactant)).build()?;
        let id = reactant.id.clone();
        self.reactants.push(reactant);
        Ok(id)
    }

    /// Builds a reaction with a generated identifier and appends it.
    pub fn add_to_reactions(
        &mut self,
        mut reaction: ReactionBuilder,
    ) -> Result<String, ReactionBuilderError> {
        let reaction = reaction.id(self.generate_id(IdPrefix::Reaction)).build()?;
        let id = reaction.id.clone();
        self.reactions.push(reaction);
        Ok(id)
    }

    /// Builds a measurement with a generated identifier and appends it.
    pub fn add_to_measurements(
        &mut self,
        mut measurement: MeasurementBuilder,
    ) -> Result<String, MeasurementBuilderError> {
        let measurement = measurement
            .id(self.generate_id(IdPrefix::Measurement))
            .build()?;
        let id = measurement.id.clone();
        self.measurements.push(measurement);
        Ok(id)
    }

    /// Finds a vessel by its name.
    pub fn vessel_by_name(&self, name: &str) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.name == name)
    }

    /// Finds a protein by its name.
    pub fn protein_by_name(&self, name: &str) -> Option<&Protein> {
        self.proteins.iter().find(|p| p.name == name)
    }

    /// Finds a reactant by its name.
    pub fn reactant_by_name(&self, name: &str) -> Option<&Reactant> {
        self.reactants.iter().find(|r| r.name == name)
    }

    /// Finds a complex by its name.
    pub fn complex_by_name(&self, name: &str) -> Option<&Complex> {
        self.complexes.iter().find(|c| c.name == name)
    }

    /// Finds a reaction by its identifier.
    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.iter().find(|r| r.id == id)
    }

    /// Finds a measurement by its name or identifier.
    pub fn measurement_mut(&mut self, name_or_id: &str) -> Option<&mut Measurement> {
        self.measurements
            .iter_mut()
            .find(|m| m.id == name_or_id || m.name == name_or_id)
    }

    /// Returns the name of the species with the given identifier.
    pub fn species_name(&self, id: &str) -> Option<&str> {
        self.species_pool(SpeciesPool::All)
            .into_iter()
            .find(|(_, species_id)| *species_id == id)
            .map(|(name, _)| name)
    }

    /// Collects `(name, id)` pairs of the species in the given pool.
    ///
    /// Proteins always come before complexes and reactants, so name lookups
    /// against the pool are deterministic when names repeat across kinds.
    pub fn species_pool(&self, pool: SpeciesPool) -> Vec<(&str, &str)> {
        let proteins = self
            .proteins
            .iter()
            .map(|p| (p.name.as_str(), p.id.as_str()));
        let complexes = self
            .complexes
            .iter()
            .map(|c| (c.name.as_str(), c.id.as_str()));
        let reactants = self
            .reactants
            .iter()
            .map(|r| (r.name.as_str(), r.id.as_str()));

        match pool {
            SpeciesPool::Reactants => reactants.collect(),
            SpeciesPool::ProteinsAndReactants => proteins.chain(reactants).collect(),
            SpeciesPool::All => proteins.chain(complexes).chain(reactants).collect(),
        }
    }
}
