//! Per-atom electronic bookkeeping derived from the bond graph.
//!
//! Electrons of a polar bond are booked to the more electronegative
//! partner. This is an approximation: for hypervalent or multi-center
//! species the result can disagree with a rigorous formal assignment.

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElectronicState {
    pub oxidation_state: i32,
    pub formal_charge: i32,
    pub partial_charge: f64,
    pub lone_pairs: u32,
}

/// Pauling's fraction of ionic character for an electronegativity gap.
pub fn ionic_character(delta_en: f64) -> f64 {
    1.0 - (-(delta_en * delta_en) / 4.0).exp()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Compute the electronic state of one atom from its incident bonds.
pub fn electronic_state<A, B>(mol: &Mol<A, B>, idx: NodeIndex) -> ElectronicState
where
    A: HasElement,
    B: HasBondOrder,
{
    let element = mol.atom(idx).element();
    let valence = element.valence_electrons() as i32;
    let en = element.electronegativity;

    let mut oxidation_state = 0i32;
    let mut formal_charge = 0i32;
    let mut partial_charge = 0.0f64;
    let mut bonded_electrons = 0i32;
    let mut bonded = false;

    for edge in mol.bonds_of(idx) {
        let Some(other) = mol.partner(edge, idx) else {
            continue;
        };
        bonded = true;
        let bond = mol.bond(edge);
        let order = bond.bond_order().value() as i32;
        bonded_electrons += order;

        let other_en = mol.atom(other).element().electronegativity;
        let sign = match en.total_cmp(&other_en) {
            std::cmp::Ordering::Greater => -1,
            std::cmp::Ordering::Less => 1,
            std::cmp::Ordering::Equal => 0,
        };
        oxidation_state += sign * order;
        if bond.is_ionic() {
            formal_charge += sign * order;
        }
        partial_charge += sign as f64 * ionic_character((en - other_en).abs());
    }

    if !bonded {
        return ElectronicState {
            oxidation_state: 0,
            formal_charge: 0,
            partial_charge: 0.0,
            lone_pairs: (valence / 2) as u32,
        };
    }

    let free = valence - formal_charge - bonded_electrons;
    ElectronicState {
        oxidation_state,
        formal_charge,
        partial_charge: round2(partial_charge),
        lone_pairs: free.div_euclid(2).max(0) as u32,
    }
}

/// Overwrite every atom's electronic fields in place.
pub fn assign_electronic_state(mol: &mut Mol<Atom, Bond>) {
    let states: Vec<(NodeIndex, ElectronicState)> = mol
        .atoms()
        .map(|idx| (idx, electronic_state(mol, idx)))
        .collect();
    for (idx, s) in states {
        let atom = mol.atom_mut(idx);
        atom.oxidation_state = s.oxidation_state;
        atom.formal_charge = s.formal_charge;
        atom.partial_charge = s.partial_charge;
        atom.lone_pairs = s.lone_pairs;
    }
}
