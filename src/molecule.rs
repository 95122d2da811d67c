//! Molecules: connected components of the bond graph, with everything a
//! consumer wants to show about them.

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::atom::{Atom, AtomId};
use crate::bond::{Bond, BondKind};
use crate::bond_energy::weakest_bond_energy;
use crate::config::Environment;
use crate::enrichment::Enrichment;
use crate::formula::{
    charge_suffix, composition, hill_formula, molecular_weight, structural_formula, Composition,
};
use crate::mol::Mol;
use crate::nomenclature::systematic_name;
use crate::thermo::{
    decomposition_temperature, predict_phase, BondingType, MolecularDescriptors, Phase,
    PhaseDiagnostics,
};
use crate::traits::{HasBondOrder, HasElement, HasFormalCharge};

/// Stability credited to a free atom that wants to bond.
const UNBONDED_STABILITY: f64 = 0.5;

/// Rate at which stability collapses above the decomposition temperature.
const DECOMPOSITION_DAMPING: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Species {
    Molecule,
    Radical,
    Cation,
    Anion,
}

impl Species {
    pub fn label(self) -> &'static str {
        match self {
            Species::Molecule => "molecule",
            Species::Radical => "radical",
            Species::Cation => "cation",
            Species::Anion => "anion",
        }
    }
}

/// Classify a species by its net charge and electron count.
///
/// A net charge of at least half a unit makes an ion. A neutral species
/// with an odd electron count is a radical. The returned flag reports the
/// odd count independently of the species, so a radical cation is
/// `(Cation, true)`.
pub fn classify_species(electron_count: i64, net_charge: f64) -> (Species, bool) {
    let odd = electron_count.rem_euclid(2) == 1;
    let species = if net_charge >= 0.5 {
        Species::Cation
    } else if net_charge <= -0.5 {
        Species::Anion
    } else if odd {
        Species::Radical
    } else {
        Species::Molecule
    };
    (species, odd)
}

/// Dominant bonding of a molecule, used for its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BondCharacter {
    Unbonded,
    Covalent,
    Ionic,
    Metallic,
    Aromatic,
}

/// Internal bond counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BondSummary {
    pub single: usize,
    pub double: usize,
    pub triple: usize,
    pub ionic: usize,
    pub aromatic: usize,
}

impl BondSummary {
    pub fn total(&self) -> usize {
        self.single + self.double + self.triple + self.ionic + self.aromatic
    }

    fn count(&mut self, kind: BondKind) {
        match kind {
            BondKind::Single => self.single += 1,
            BondKind::Double => self.double += 1,
            BondKind::Triple => self.triple += 1,
            BondKind::Ionic => self.ionic += 1,
            BondKind::Aromatic => self.aromatic += 1,
        }
    }
}

/// Undamped stability of a component on a 0-100 scale.
///
/// Each atom scores how close its bond order sum is to its target bond
/// count: `achieved / target` capped at 1, or `target / achieved` when it
/// is over-bonded. A free atom scores 1 if it wants no bonds and 0.5
/// otherwise. The score is the mean, and 0 for an empty component.
pub fn stability_score<A, B>(mol: &Mol<A, B>, atoms: &[NodeIndex]) -> f64
where
    A: HasElement,
    B: HasBondOrder,
{
    if atoms.is_empty() {
        return 0.0;
    }
    let total: f64 = atoms
        .iter()
        .map(|&idx| {
            let target = mol.atom(idx).element().target_bonds() as f64;
            let achieved = mol.bond_order_sum(idx) as f64;
            if achieved == 0.0 {
                if target == 0.0 {
                    1.0
                } else {
                    UNBONDED_STABILITY
                }
            } else if achieved > target {
                target / achieved
            } else {
                achieved / target
            }
        })
        .sum();
    100.0 * total / atoms.len() as f64
}

/// Stability after thermal decomposition: unchanged at or below the
/// decomposition temperature, decaying exponentially above it.
pub fn damped_stability(score: f64, decomposition_temperature: Option<f64>, temperature: f64) -> f64 {
    match decomposition_temperature {
        Some(td) if td > 0.0 && temperature > td => {
            score * (-DECOMPOSITION_DAMPING * (temperature - td) / td).exp()
        }
        _ => score,
    }
}

/// One connected component of a resolution pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    pub atom_ids: Vec<AtomId>,
    /// Indices into the pass's bond list.
    pub bond_indices: Vec<usize>,
    pub composition: Composition,
    pub hill_formula: String,
    pub structural_formula: String,
    /// Formula shown to the user, with its charge suffix.
    pub display_formula: String,
    /// Total electrons, `Σ Z - net_charge`.
    pub electron_count: i64,
    pub net_charge: i32,
    pub is_radical: bool,
    pub species: Species,
    pub molecular_weight: f64,
    pub stability: f64,
    pub decomposition_temperature: Option<f64>,
    pub phase: Phase,
    pub diagnostics: Option<PhaseDiagnostics>,
    pub bond_summary: BondSummary,
    pub bond_character: BondCharacter,
    pub systematic_name: String,
    /// Locally generated description.
    pub description: String,
    pub enrichment: Option<Enrichment>,
}

impl Molecule {
    /// Common name when one has been looked up, else the systematic name.
    pub fn name(&self) -> &str {
        self.enrichment
            .as_ref()
            .and_then(|e| e.name.as_deref())
            .unwrap_or(&self.systematic_name)
    }

    pub fn description(&self) -> &str {
        self.enrichment
            .as_ref()
            .and_then(|e| e.description.as_deref())
            .unwrap_or(&self.description)
    }

    pub fn aliases(&self) -> &[String] {
        self.enrichment.as_ref().map_or(&[], |e| e.aliases.as_slice())
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.atom_ids.contains(&id)
    }

    /// Inspector payload.
    pub fn report(&self) -> MoleculeReport {
        MoleculeReport {
            formula: self.display_formula.clone(),
            hill_formula: self.hill_formula.clone(),
            name: self.name().to_string(),
            systematic_name: self.systematic_name.clone(),
            description: self.description().to_string(),
            aliases: self.aliases().to_vec(),
            species: self.species,
            phase: self.phase,
            stability: self.stability,
            molecular_weight: self.molecular_weight,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// What an inspector panel shows for one molecule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeReport {
    pub formula: String,
    pub hill_formula: String,
    pub name: String,
    pub systematic_name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub species: Species,
    pub phase: Phase,
    pub stability: f64,
    pub molecular_weight: f64,
    pub diagnostics: Option<PhaseDiagnostics>,
}

fn bond_character(summary: &BondSummary, bonding: BondingType) -> BondCharacter {
    if summary.total() == 0 {
        BondCharacter::Unbonded
    } else if bonding == BondingType::Metallic {
        BondCharacter::Metallic
    } else if summary.aromatic > 0 {
        BondCharacter::Aromatic
    } else if summary.ionic > 0 {
        BondCharacter::Ionic
    } else {
        BondCharacter::Covalent
    }
}

fn describe(
    name: &str,
    character: BondCharacter,
    atom_count: usize,
    species: Species,
    phase: Phase,
    env: &Environment,
) -> String {
    let what = match character {
        BondCharacter::Unbonded if atom_count == 1 => "a free atom",
        BondCharacter::Unbonded => "a loose cluster of atoms",
        BondCharacter::Covalent => "a covalent molecule",
        BondCharacter::Ionic => "an ionic compound",
        BondCharacter::Metallic => "a metallic alloy",
        BondCharacter::Aromatic => "an aromatic compound",
    };
    let charge = match species {
        Species::Molecule => "",
        Species::Radical => " with an unpaired electron",
        Species::Cation => " carrying a positive charge",
        Species::Anion => " carrying a negative charge",
    };
    let state = match phase {
        Phase::Decomposed => format!("breaking apart at {:.0} K", env.temperature),
        other => format!(
            "{} at {:.0} K and {:.2} atm",
            other.label().to_lowercase(),
            env.temperature,
            env.pressure
        ),
    };
    format!("{name} is {what}{charge}, {state}.")
}

/// Split a resolved graph into molecules.
///
/// Bond indices refer to the graph's edge indices, which line up with the
/// pass's bond list. Electronic state must already be assigned.
pub fn assemble(mol: &Mol<Atom, Bond>, env: &Environment) -> Vec<Molecule> {
    let fragments = mol.fragments();

    let mut owner = vec![0usize; mol.atom_count()];
    for (f, atoms) in fragments.iter().enumerate() {
        for idx in atoms {
            owner[idx.index()] = f;
        }
    }
    let mut edges: Vec<Vec<EdgeIndex>> = vec![Vec::new(); fragments.len()];
    for edge in mol.bonds() {
        if let Some((a, _)) = mol.bond_endpoints(edge) {
            edges[owner[a.index()]].push(edge);
        }
    }

    fragments
        .iter()
        .zip(&edges)
        .map(|(atoms, bonds)| build_molecule(mol, atoms, bonds, env))
        .collect()
}

fn build_molecule(
    mol: &Mol<Atom, Bond>,
    atoms: &[NodeIndex],
    bonds: &[EdgeIndex],
    env: &Environment,
) -> Molecule {
    let counts = composition(mol, atoms);
    let hill = hill_formula(&counts);
    let structural = structural_formula(mol, atoms);
    let has_metal = atoms.iter().any(|&i| mol.atom(i).element().is_metal());

    let net_charge: i32 = atoms.iter().map(|&i| mol.atom(i).formal_charge()).sum();
    let protons: i64 = atoms
        .iter()
        .map(|&i| mol.atom(i).element().atomic_number as i64)
        .sum();
    let electron_count = protons - net_charge as i64;
    let (species, is_radical) = classify_species(electron_count, net_charge as f64);

    let base = if has_metal { &structural } else { &hill };
    let display_formula = format!("{base}{}", charge_suffix(net_charge));

    let mw = molecular_weight(mol, atoms);
    let td = weakest_bond_energy(mol, bonds).map(decomposition_temperature);
    let stability = damped_stability(stability_score(mol, atoms), td, env.temperature);

    let descriptors = MolecularDescriptors::from_component(mol, atoms, bonds, mw);
    let (phase, diagnostics) = predict_phase(&descriptors, stability, td, env);

    let mut bond_summary = BondSummary::default();
    for &edge in bonds {
        bond_summary.count(mol.bond(edge).kind);
    }
    let character = bond_character(&bond_summary, descriptors.bonding);

    let name = systematic_name(mol, atoms);
    let description = describe(&name, character, atoms.len(), species, phase, env);

    Molecule {
        atom_ids: atoms.iter().map(|&i| mol.atom(i).id).collect(),
        bond_indices: bonds.iter().map(|e| e.index()).collect(),
        composition: counts,
        hill_formula: hill,
        structural_formula: structural,
        display_formula,
        electron_count,
        net_charge,
        is_radical,
        species,
        molecular_weight: mw,
        stability,
        decomposition_temperature: td,
        phase,
        diagnostics,
        bond_summary,
        bond_character: character,
        systematic_name: name,
        description,
        enrichment: None,
    }
}
