pub mod atom;
pub mod bond;
pub mod bond_energy;
pub mod bonding;
pub mod catalog;
pub mod config;
pub mod electronic;
pub mod element;
pub mod enrichment;
pub mod error;
pub mod formula;
pub mod geometry;
pub mod kinetics;
pub mod mol;
pub mod molecule;
pub mod nomenclature;
pub mod resonance;
pub mod rings;
pub mod sandbox;
pub mod thermo;
pub mod traits;

pub use atom::{Atom, AtomId};
pub use bond::{Bond, BondKind, BondOrder};
pub use catalog::{CatalogError, ElementCatalog};
pub use config::{BondingConfig, Environment, GeometryConfig, SandboxConfig};
pub use element::{Category, Element};
pub use enrichment::{
    CacheEntry, Enrichment, EnrichmentCache, EnrichmentError, EnrichmentProvider, LookupCompleted,
    LookupRequested, ThreadedDispatcher,
};
pub use error::SandboxError;
pub use formula::{hill_formula, parse_formula, FormulaError};
pub use kinetics::{KineticsConfig, KineticsError, KineticsSimulator, ReactionTemplate};
pub use mol::Mol;
pub use molecule::{Molecule, MoleculeReport, Species};
pub use sandbox::{Resolution, Sandbox};
pub use thermo::{Phase, PhaseDiagnostics};
pub use traits::{
    HasAtomId, HasBondOrder, HasElement, HasFormalCharge, HasLonePairs, HasPosition2D,
};
