use crate::atom::AtomId;
use crate::bond::BondOrder;
use crate::element::Element;

pub trait HasElement {
    fn element(&self) -> &Element;
}

pub trait HasAtomId {
    fn atom_id(&self) -> AtomId;
}

pub trait HasPosition2D {
    fn position_2d(&self) -> [f64; 2];
    fn set_position_2d(&mut self, pos: [f64; 2]);
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i32;
}

pub trait HasLonePairs {
    fn lone_pairs(&self) -> u32;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
    fn is_ionic(&self) -> bool;
}
