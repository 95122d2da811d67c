use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::element::Element;

/// Stable identifier of a spawned atom. Issued by the sandbox and never
/// reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AtomId(pub u64);

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An atom placed in the sandbox.
///
/// `position` is owned by the sandbox (spawn, drag, collision relaxation).
/// The electronic fields are outputs: every resolution pass overwrites
/// them from the freshly built bond graph.
///
/// # Examples
///
/// ```
/// use chemsandbox::{Atom, AtomId, ElementCatalog};
///
/// let catalog = ElementCatalog::embedded();
/// let carbon = Atom::new(AtomId(1), catalog.get("C").unwrap().clone(), [10.0, 20.0]);
/// assert_eq!(carbon.symbol(), "C");
/// assert_eq!(carbon.formal_charge, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    pub id: AtomId,
    pub position: [f64; 2],
    #[serde(rename = "symbol", serialize_with = "serialize_symbol")]
    pub element: Arc<Element>,
    pub oxidation_state: i32,
    pub formal_charge: i32,
    /// Summed partial charge, rounded to two decimals.
    pub partial_charge: f64,
    pub lone_pairs: u32,
}

fn serialize_symbol<S: Serializer>(element: &Arc<Element>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&element.symbol)
}

impl Atom {
    /// A freshly spawned atom with no charge and no oxidation state.
    pub fn new(id: AtomId, element: Arc<Element>, position: [f64; 2]) -> Self {
        Self {
            id,
            position,
            element,
            oxidation_state: 0,
            formal_charge: 0,
            partial_charge: 0.0,
            lone_pairs: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.element.symbol
    }

    pub fn distance_to(&self, other: &Atom) -> f64 {
        let dx = other.position[0] - self.position[0];
        let dy = other.position[1] - self.position[1];
        (dx * dx + dy * dy).sqrt()
    }

    pub(crate) fn reset_electronic_state(&mut self) {
        self.oxidation_state = 0;
        self.formal_charge = 0;
        self.partial_charge = 0.0;
        self.lone_pairs = 0;
    }
}

impl crate::traits::HasElement for Atom {
    fn element(&self) -> &Element {
        &self.element
    }
}

impl crate::traits::HasAtomId for Atom {
    fn atom_id(&self) -> AtomId {
        self.id
    }
}

impl crate::traits::HasPosition2D for Atom {
    fn position_2d(&self) -> [f64; 2] {
        self.position
    }

    fn set_position_2d(&mut self, pos: [f64; 2]) {
        self.position = pos;
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i32 {
        self.formal_charge
    }
}

impl crate::traits::HasLonePairs for Atom {
    fn lone_pairs(&self) -> u32 {
        self.lone_pairs
    }
}
