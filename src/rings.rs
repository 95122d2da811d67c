use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::mol::Mol;

/// Ring size perceived by the resonance detector.
pub const RING_SIZE: usize = 6;

/// Simple six-membered cycles of a bond graph.
///
/// Each ring is stored in traversal order (consecutive members are bonded,
/// and the last closes back to the first). Rings are unique by member set.
#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingInfo {
    /// Depth-limited search from every atom for paths of exactly
    /// [`RING_SIZE`] distinct atoms that close back to the start.
    pub fn six_membered<A, B>(mol: &Mol<A, B>) -> Self {
        let mut found: BTreeMap<Vec<NodeIndex>, Vec<NodeIndex>> = BTreeMap::new();
        for start in mol.atoms() {
            if mol.degree(start) < 2 {
                continue;
            }
            extend_path(mol, vec![start], &mut found);
        }
        Self {
            rings: found.into_values().collect(),
        }
    }

    pub fn num_rings(&self) -> usize {
        self.rings.len()
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.rings.iter().any(|ring| ring.contains(&atom))
    }

    pub fn is_ring_bond(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.rings.iter().any(|ring| {
            ring_edges(ring).any(|(x, y)| (x == a && y == b) || (x == b && y == a))
        })
    }

    pub fn atom_rings(&self, atom: NodeIndex) -> Vec<&Vec<NodeIndex>> {
        self.rings
            .iter()
            .filter(|ring| ring.contains(&atom))
            .collect()
    }
}

/// Consecutive member pairs of a ring, including the closing pair.
pub fn ring_edges(ring: &[NodeIndex]) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
    let len = ring.len();
    (0..len).map(move |i| (ring[i], ring[(i + 1) % len]))
}

// `path` is owned by this branch; siblings each get their own copy, so no
// visited state leaks between branches.
fn extend_path<A, B>(
    mol: &Mol<A, B>,
    path: Vec<NodeIndex>,
    found: &mut BTreeMap<Vec<NodeIndex>, Vec<NodeIndex>>,
) {
    let Some(&last) = path.last() else {
        return;
    };
    let start = path[0];

    if path.len() == RING_SIZE {
        if mol.bond_between(last, start).is_some() {
            let mut key = path.clone();
            key.sort_unstable();
            found.entry(key).or_insert(path);
        }
        return;
    }

    for nb in mol.neighbors(last) {
        if path.contains(&nb) {
            continue;
        }
        let mut next = path.clone();
        next.push(nb);
        extend_path(mol, next, found);
    }
}
