use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;
use crate::rings::{ring_edges, RingInfo, RING_SIZE};
use crate::traits::{HasBondOrder, HasLonePairs};

/// Alternating double bonds expected in an aromatic six-ring.
const AROMATIC_DOUBLE_BONDS: usize = 3;

/// Electron domains of an sp2 center: bonded neighbors plus lone pairs.
const SP2_DOMAINS: usize = 3;

/// Six-membered rings that qualify as aromatic.
///
/// Reads lone pairs from the atoms, so electronic state must already be
/// assigned.
pub fn find_aromatic_rings<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>>
where
    A: HasLonePairs,
    B: HasBondOrder,
{
    RingInfo::six_membered(mol)
        .rings()
        .iter()
        .filter(|ring| is_aromatic_ring(mol, ring))
        .cloned()
        .collect()
}

pub fn is_aromatic_ring<A, B>(mol: &Mol<A, B>, ring: &[NodeIndex]) -> bool
where
    A: HasLonePairs,
    B: HasBondOrder,
{
    if ring.len() != RING_SIZE {
        return false;
    }

    let mut doubles = 0;
    for (a, b) in ring_edges(ring) {
        match mol.bond_between(a, b) {
            Some(edge) => {
                if mol.bond(edge).bond_order() == BondOrder::Double {
                    doubles += 1;
                }
            }
            None => return false,
        }
    }
    if doubles != AROMATIC_DOUBLE_BONDS {
        return false;
    }

    ring.iter()
        .all(|&idx| mol.degree(idx) + mol.atom(idx).lone_pairs() as usize == SP2_DOMAINS)
}

/// Retag the bonds of every aromatic ring. Bond orders are left as they
/// were assigned. Returns the number of bonds retagged.
pub fn set_aromaticity(mol: &mut Mol<Atom, Bond>) -> usize {
    let rings = find_aromatic_rings(mol);
    let mut retagged = 0;
    for ring in &rings {
        for (a, b) in ring_edges(ring) {
            let Some(edge) = mol.bond_between(a, b) else {
                continue;
            };
            let bond = mol.bond_mut(edge);
            if !bond.is_aromatic {
                bond.mark_aromatic();
                retagged += 1;
            }
        }
    }
    if !rings.is_empty() {
        log::trace!("{} aromatic ring(s), {} bond(s) retagged", rings.len(), retagged);
    }
    retagged
}
