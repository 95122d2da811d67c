//! Distance and electronegativity driven bond assignment.
//!
//! Bond formation is a deterministic greedy walk, not a constraint solver:
//! candidate pairs are committed in order of decreasing electronegativity
//! difference (ionic attraction first), then increasing distance, and a
//! committed bond is never revisited. This does not guarantee optimal
//! valence saturation; it reproduces what a user sees when dropping atoms
//! next to each other.

use std::cmp::Ordering;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::config::{BondingConfig, GeometryConfig};
use crate::geometry::{distance, SpatialGrid};
use crate::mol::Mol;
use crate::traits::{HasAtomId, HasElement, HasPosition2D};

/// A pair of atoms close enough to be considered for bonding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondCandidate {
    pub i: usize,
    pub j: usize,
    pub distance: f64,
    pub delta_en: f64,
}

/// Every pair (i < j) within its candidate distance, in commit order.
pub fn bond_candidates<A>(
    atoms: &[A],
    geometry: &GeometryConfig,
    config: &BondingConfig,
) -> Vec<BondCandidate>
where
    A: HasElement + HasPosition2D,
{
    if atoms.len() < 2 {
        return Vec::new();
    }
    let positions: Vec<[f64; 2]> = atoms.iter().map(|a| a.position_2d()).collect();
    let radii: Vec<f64> = atoms.iter().map(|a| a.element().visual_radius()).collect();
    let max_radius = radii.iter().copied().fold(0.0_f64, f64::max);
    let reach = config.thresholds(max_radius, max_radius).candidate;
    let grid = SpatialGrid::from_positions(&positions, geometry.cell_size);

    let mut candidates = Vec::new();
    for i in 0..atoms.len() {
        for j in grid.nearby(positions[i], reach) {
            if j <= i {
                continue;
            }
            let d = distance(positions[i], positions[j]);
            if d <= f64::EPSILON {
                continue;
            }
            if d > config.thresholds(radii[i], radii[j]).candidate {
                continue;
            }
            let delta_en =
                (atoms[i].element().electronegativity - atoms[j].element().electronegativity).abs();
            candidates.push(BondCandidate {
                i,
                j,
                distance: d,
                delta_en,
            });
        }
    }
    candidates.sort_by(commit_order);
    candidates
}

fn commit_order(a: &BondCandidate, b: &BondCandidate) -> Ordering {
    b.delta_en
        .total_cmp(&a.delta_en)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| (a.i, a.j).cmp(&(b.i, b.j)))
}

/// Commit bonds greedily under each atom's valence capacity.
///
/// Returns `(i, j, bond)` triples with `i < j` indexing into `atoms`.
pub fn resolve_bonds<A>(
    atoms: &[A],
    geometry: &GeometryConfig,
    config: &BondingConfig,
) -> Vec<(usize, usize, Bond)>
where
    A: HasElement + HasPosition2D + HasAtomId,
{
    let mut remaining: Vec<u8> = atoms.iter().map(|a| a.element().max_bonds()).collect();
    let mut bonds = Vec::new();

    for c in bond_candidates(atoms, geometry, config) {
        let (ra, rb) = (remaining[c.i], remaining[c.j]);
        if ra == 0 || rb == 0 {
            continue;
        }
        let t = config.thresholds(
            atoms[c.i].element().visual_radius(),
            atoms[c.j].element().visual_radius(),
        );
        if c.distance >= t.single {
            continue;
        }
        let (a_id, b_id) = (atoms[c.i].atom_id(), atoms[c.j].atom_id());
        let bond = if c.delta_en > config.ionic_threshold {
            Bond::ionic(a_id, b_id)
        } else {
            let order = if c.distance < t.triple && ra >= 3 && rb >= 3 {
                BondOrder::Triple
            } else if c.distance < t.double && ra >= 2 && rb >= 2 {
                BondOrder::Double
            } else {
                BondOrder::Single
            };
            Bond::covalent(a_id, b_id, order)
        };
        let used = bond.order.value();
        remaining[c.i] -= used;
        remaining[c.j] -= used;
        log::trace!(
            "bond {}-{} {} (d={:.1}, dEN={:.2})",
            atoms[c.i].element().symbol,
            atoms[c.j].element().symbol,
            bond.kind.label(),
            c.distance,
            c.delta_en
        );
        bonds.push((c.i, c.j, bond));
    }
    bonds
}

/// Build the per-pass bond graph. Node `i` is a copy of `atoms[i]` with
/// its electronic state cleared.
pub fn bond_graph(atoms: &[Atom], geometry: &GeometryConfig, config: &BondingConfig) -> Mol<Atom, Bond> {
    let planned = resolve_bonds(atoms, geometry, config);
    let mut mol = Mol::with_capacity(atoms.len(), planned.len());
    for atom in atoms {
        let mut node = atom.clone();
        node.reset_electronic_state();
        mol.add_atom(node);
    }
    for (i, j, bond) in planned {
        mol.add_bond(NodeIndex::new(i), NodeIndex::new(j), bond);
    }
    mol
}
