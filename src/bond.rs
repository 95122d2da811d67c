use serde::Serialize;

use crate::atom::AtomId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
}

impl BondOrder {
    /// Number of shared electron pairs.
    pub fn value(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }

    pub fn from_value(v: u8) -> Option<BondOrder> {
        match v {
            1 => Some(BondOrder::Single),
            2 => Some(BondOrder::Double),
            3 => Some(BondOrder::Triple),
            _ => None,
        }
    }
}

/// Classification tag of a bond.
///
/// Assigned by the bonding resolver, then possibly rewritten to
/// [`BondKind::Aromatic`] by resonance perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BondKind {
    Single,
    Double,
    Triple,
    Ionic,
    Aromatic,
}

impl BondKind {
    pub fn covalent(order: BondOrder) -> BondKind {
        match order {
            BondOrder::Single => BondKind::Single,
            BondOrder::Double => BondKind::Double,
            BondOrder::Triple => BondKind::Triple,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BondKind::Single => "single",
            BondKind::Double => "double",
            BondKind::Triple => "triple",
            BondKind::Ionic => "ionic",
            BondKind::Aromatic => "aromatic",
        }
    }
}

/// A bond between two atoms, identified by id so it can be handed to a
/// renderer without the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bond {
    pub atoms: (AtomId, AtomId),
    pub order: BondOrder,
    pub kind: BondKind,
    pub is_ionic: bool,
    pub is_aromatic: bool,
}

impl Bond {
    pub fn covalent(a: AtomId, b: AtomId, order: BondOrder) -> Self {
        Self {
            atoms: (a, b),
            order,
            kind: BondKind::covalent(order),
            is_ionic: false,
            is_aromatic: false,
        }
    }

    /// Ionic bonds always carry order 1.
    pub fn ionic(a: AtomId, b: AtomId) -> Self {
        Self {
            atoms: (a, b),
            order: BondOrder::Single,
            kind: BondKind::Ionic,
            is_ionic: true,
            is_aromatic: false,
        }
    }

    pub fn involves(&self, id: AtomId) -> bool {
        self.atoms.0 == id || self.atoms.1 == id
    }

    pub(crate) fn mark_aromatic(&mut self) {
        self.kind = BondKind::Aromatic;
        self.is_aromatic = true;
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }

    fn is_ionic(&self) -> bool {
        self.is_ionic
    }
}
