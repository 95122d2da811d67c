//! The top-level driver: owns the atoms and the environment, and turns
//! them into bonds and molecules one resolution pass at a time.

use std::sync::mpsc::Sender;

use serde::Serialize;

use crate::atom::{Atom, AtomId};
use crate::bond::Bond;
use crate::bonding::bond_graph;
use crate::catalog::ElementCatalog;
use crate::config::{Environment, SandboxConfig};
use crate::electronic::assign_electronic_state;
use crate::enrichment::{EnrichmentCache, LookupCompleted, LookupRequested};
use crate::error::SandboxError;
use crate::geometry::relax_overlaps;
use crate::molecule::{assemble, Molecule, MoleculeReport};
use crate::resonance::set_aromaticity;

/// Everything one resolution pass produced.
///
/// Molecules are rebuilt from scratch every pass, so consumers should match
/// them across passes by their atom ids rather than by position in the
/// list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    /// Atoms with relaxed positions and fresh electronic state, in spawn
    /// order.
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub molecules: Vec<Molecule>,
}

impl Resolution {
    pub fn molecule_of(&self, id: AtomId) -> Option<&Molecule> {
        self.molecules.iter().find(|m| m.contains(id))
    }
}

/// An interactive chemistry sandbox.
///
/// ```
/// use chemsandbox::Sandbox;
///
/// let mut sandbox = Sandbox::new();
/// sandbox.spawn("H", [0.0, 0.0]).unwrap();
/// sandbox.spawn("H", [40.0, 0.0]).unwrap();
/// let pass = sandbox.resolve();
/// assert_eq!(pass.bonds.len(), 1);
/// assert_eq!(pass.molecules[0].display_formula, "H2");
/// ```
#[derive(Debug)]
pub struct Sandbox {
    catalog: ElementCatalog,
    config: SandboxConfig,
    environment: Environment,
    atoms: Vec<Atom>,
    next_id: u64,
    enrichment: EnrichmentCache,
    last: Resolution,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Sandbox {
    /// A sandbox over the embedded element table with default tunables.
    pub fn new() -> Self {
        Self::with_config(ElementCatalog::embedded(), SandboxConfig::default())
    }

    pub fn with_config(catalog: ElementCatalog, config: SandboxConfig) -> Self {
        Self {
            catalog,
            config,
            environment: Environment::default(),
            atoms: Vec::new(),
            next_id: 1,
            enrichment: EnrichmentCache::new(),
            last: Resolution::default(),
        }
    }

    /// Build from a TOML tunables document.
    pub fn from_toml(catalog: ElementCatalog, toml: &str) -> Result<Self, SandboxError> {
        Ok(Self::with_config(catalog, SandboxConfig::from_toml_str(toml)?))
    }

    pub fn catalog(&self) -> &ElementCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.id == id)
    }

    /// Result of the most recent [`resolve`](Self::resolve).
    pub fn last_resolution(&self) -> &Resolution {
        &self.last
    }

    fn index_of(&self, id: AtomId) -> Result<usize, SandboxError> {
        self.atoms
            .iter()
            .position(|a| a.id == id)
            .ok_or(SandboxError::AtomNotFound(id))
    }

    fn check_position(position: [f64; 2]) -> Result<(), SandboxError> {
        if position.iter().all(|c| c.is_finite()) {
            Ok(())
        } else {
            Err(SandboxError::InvalidPosition(position[0], position[1]))
        }
    }

    /// Place a new, uncharged atom of `symbol` at `position`.
    pub fn spawn(&mut self, symbol: &str, position: [f64; 2]) -> Result<AtomId, SandboxError> {
        Self::check_position(position)?;
        let element = self
            .catalog
            .get(symbol)
            .ok_or_else(|| SandboxError::UnknownElement(symbol.to_string()))?
            .clone();
        let id = AtomId(self.next_id);
        self.next_id += 1;
        self.atoms.push(Atom::new(id, element, position));
        log::trace!("spawned {symbol} {id} at ({}, {})", position[0], position[1]);
        Ok(id)
    }

    pub fn remove(&mut self, id: AtomId) -> Result<Atom, SandboxError> {
        let i = self.index_of(id)?;
        Ok(self.atoms.remove(i))
    }

    /// Drag an atom to `position`.
    pub fn move_atom(&mut self, id: AtomId, position: [f64; 2]) -> Result<(), SandboxError> {
        Self::check_position(position)?;
        let i = self.index_of(id)?;
        self.atoms[i].position = position;
        Ok(())
    }

    /// Remove every atom. Ids are not reused.
    pub fn clear(&mut self) {
        self.atoms.clear();
    }

    /// Set the temperature in kelvin.
    pub fn set_temperature(&mut self, kelvin: f64) -> Result<(), SandboxError> {
        if !kelvin.is_finite() {
            return Err(SandboxError::InvalidTemperature(kelvin));
        }
        self.environment.temperature = kelvin;
        Ok(())
    }

    /// Set the pressure in atmospheres.
    pub fn set_pressure(&mut self, atm: f64) -> Result<(), SandboxError> {
        if !atm.is_finite() || atm <= 0.0 {
            return Err(SandboxError::InvalidPressure(atm));
        }
        self.environment.pressure = atm;
        Ok(())
    }

    /// Run one resolution pass.
    ///
    /// Enrichment results that arrived since the previous pass are merged
    /// first. Then overlapping atoms are pushed apart, bonds are rebuilt
    /// from scratch, electronic state and aromaticity are assigned, and the
    /// graph is split into molecules. Formulas with no enrichment yet are
    /// queued for lookup, see [`take_lookup_requests`](Self::take_lookup_requests).
    pub fn resolve(&mut self) -> &Resolution {
        let merged = self.enrichment.merge_completed();
        let relaxed = relax_overlaps(&mut self.atoms, &self.config.geometry);

        let mut mol = bond_graph(&self.atoms, &self.config.geometry, &self.config.bonding);
        assign_electronic_state(&mut mol);
        let aromatic = set_aromaticity(&mut mol);

        let mut molecules = assemble(&mol, &self.environment);
        for molecule in &mut molecules {
            molecule.enrichment = self
                .enrichment
                .resolve(&molecule.display_formula, &molecule.hill_formula);
        }

        self.atoms = mol.atoms().map(|idx| mol.atom(idx).clone()).collect();
        let bonds: Vec<Bond> = mol.bonds().map(|edge| mol.bond(edge).clone()).collect();

        log::debug!(
            "resolved {} atoms: {} bonds ({} aromatic), {} molecules; {} overlaps relaxed, {} lookups merged",
            self.atoms.len(),
            bonds.len(),
            aromatic,
            molecules.len(),
            relaxed,
            merged
        );

        self.last = Resolution {
            atoms: self.atoms.clone(),
            bonds,
            molecules,
        };
        &self.last
    }

    /// Inspector payload for the molecule containing `id`, from the most
    /// recent pass.
    pub fn inspect(&self, id: AtomId) -> Option<MoleculeReport> {
        self.last.molecule_of(id).map(Molecule::report)
    }

    /// Drain formulas queued for enrichment since the last call.
    pub fn take_lookup_requests(&mut self) -> Vec<LookupRequested> {
        self.enrichment.take_requests()
    }

    /// Where lookup results should be sent. They take effect on the next
    /// [`resolve`](Self::resolve).
    pub fn lookup_sender(&self) -> Sender<LookupCompleted> {
        self.enrichment.completion_sender()
    }

    pub fn enrichment_cache(&self) -> &EnrichmentCache {
        &self.enrichment
    }
}
