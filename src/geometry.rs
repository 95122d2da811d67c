//! Spatial partitioning and overlap relaxation for atom positions.
//!
//! Atoms are bucketed into a uniform 2D grid so neighbor queries only touch
//! nearby cells. Relaxation is a fixed number of symmetric push-apart
//! sweeps; it carries no velocity between sweeps and is not an integrator.

use std::collections::HashMap;

use crate::config::GeometryConfig;
use crate::traits::{HasElement, HasPosition2D};

/// Uniform-cell spatial index over 2D points.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    inv_cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    /// Non-positive or non-finite cell sizes are clamped to 1.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn from_positions(positions: &[[f64; 2]], cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, pos) in positions.iter().enumerate() {
            grid.insert(idx, *pos);
        }
        grid
    }

    // Float-to-int casts saturate, so far-away points share the edge cells.
    fn cell_coords(&self, pos: [f64; 2]) -> (i64, i64) {
        (
            (pos[0] * self.inv_cell_size).floor() as i64,
            (pos[1] * self.inv_cell_size).floor() as i64,
        )
    }

    pub fn insert(&mut self, idx: usize, pos: [f64; 2]) {
        let cell = self.cell_coords(pos);
        self.cells.entry(cell).or_default().push(idx);
    }

    /// Every index stored in a cell that could hold a point within
    /// `reach` of `query`. Sorted and unique; no distance filtering.
    pub fn nearby(&self, query: [f64; 2], reach: f64) -> Vec<usize> {
        let span = (reach * self.inv_cell_size).ceil().max(1.0) as i64;
        let (cx, cy) = self.cell_coords(query);
        let mut out = Vec::new();
        for dx in -span..=span {
            for dy in -span..=span {
                let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                if let Some(indices) = self.cells.get(&cell) {
                    out.extend_from_slice(indices);
                }
            }
        }
        // Saturated offsets can visit an edge cell more than once.
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Indices whose position lies within `cutoff` of `query`, sorted.
    pub fn query_radius(&self, query: [f64; 2], positions: &[[f64; 2]], cutoff: f64) -> Vec<usize> {
        let cutoff_sq = cutoff * cutoff;
        self.nearby(query, cutoff)
            .into_iter()
            .filter(|&idx| distance_sq(positions[idx], query) <= cutoff_sq)
            .collect()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

pub fn distance_sq(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    dx * dx + dy * dy
}

pub fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    distance_sq(a, b).sqrt()
}

/// Push overlapping atoms apart.
///
/// Runs `relaxation_passes` sweeps. In each sweep every pair closer than
/// its minimum separation is moved apart by half the overlap each, along
/// the line joining them. Coincident atoms have no normal and are left
/// alone. Returns the number of pair adjustments made.
pub fn relax_overlaps<A>(atoms: &mut [A], config: &GeometryConfig) -> usize
where
    A: HasElement + HasPosition2D,
{
    if atoms.len() < 2 {
        return 0;
    }
    let radii: Vec<f64> = atoms.iter().map(|a| a.element().visual_radius()).collect();
    let max_radius = radii.iter().copied().fold(0.0_f64, f64::max);
    let reach = config.min_separation(max_radius, max_radius);

    let mut adjustments = 0;
    for _ in 0..config.relaxation_passes {
        let snapshot: Vec<[f64; 2]> = atoms.iter().map(|a| a.position_2d()).collect();
        let grid = SpatialGrid::from_positions(&snapshot, config.cell_size);
        let mut moved = 0;
        for i in 0..atoms.len() {
            for j in grid.nearby(snapshot[i], reach) {
                if j <= i {
                    continue;
                }
                let pi = atoms[i].position_2d();
                let pj = atoms[j].position_2d();
                let d = distance(pi, pj);
                let min_sep = config.min_separation(radii[i], radii[j]);
                if d >= min_sep || d <= f64::EPSILON {
                    continue;
                }
                let push = (min_sep - d) / 2.0;
                let nx = (pj[0] - pi[0]) / d;
                let ny = (pj[1] - pi[1]) / d;
                atoms[i].set_position_2d([pi[0] - nx * push, pi[1] - ny * push]);
                atoms[j].set_position_2d([pj[0] + nx * push, pj[1] + ny * push]);
                moved += 1;
            }
        }
        adjustments += moved;
        if moved == 0 {
            break;
        }
    }
    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomId};
    use crate::catalog::ElementCatalog;

    fn atom(catalog: &ElementCatalog, id: u64, symbol: &str, pos: [f64; 2]) -> Atom {
        Atom::new(AtomId(id), catalog.get(symbol).unwrap().clone(), pos)
    }

    #[test]
    fn grid_query_radius() {
        let positions = [[0.0, 0.0], [50.0, 0.0], [150.0, 0.0], [-90.0, 10.0], [500.0, 500.0]];
        let grid = SpatialGrid::from_positions(&positions, 100.0);
        assert_eq!(grid.query_radius([0.0, 0.0], &positions, 100.0), vec![0, 1, 3]);
        assert_eq!(grid.query_radius([500.0, 500.0], &positions, 10.0), vec![4]);
    }

    #[test]
    fn grid_query_crosses_several_cells() {
        let positions = [[0.0, 0.0], [240.0, 0.0]];
        let grid = SpatialGrid::from_positions(&positions, 100.0);
        assert_eq!(grid.query_radius([0.0, 0.0], &positions, 250.0), vec![0, 1]);
    }

    #[test]
    fn grid_handles_far_away_points() {
        let positions = [[0.0, 0.0], [1e12, 0.0], [1e300, -1e300], [1e300, -1e300]];
        let grid = SpatialGrid::from_positions(&positions, 100.0);
        assert_eq!(grid.query_radius([1e12, 0.0], &positions, 100.0), vec![1]);
        assert_eq!(grid.query_radius([1e300, -1e300], &positions, 100.0), vec![2, 3]);
        assert_eq!(grid.query_radius([0.0, 0.0], &positions, 100.0), vec![0]);
    }

    #[test]
    fn invalid_cell_size_clamped() {
        assert_eq!(SpatialGrid::new(0.0).cell_size(), 1.0);
        assert_eq!(SpatialGrid::new(f64::NAN).cell_size(), 1.0);
    }

    #[test]
    fn overlapping_pair_pushed_to_min_separation() {
        let catalog = ElementCatalog::embedded();
        let mut atoms = vec![
            atom(&catalog, 1, "H", [0.0, 0.0]),
            atom(&catalog, 2, "H", [40.0, 0.0]),
        ];
        let n = relax_overlaps(&mut atoms, &GeometryConfig::default());
        assert_eq!(n, 1);
        assert!((atoms[0].position[0] + 10.0).abs() < 1e-9);
        assert!((atoms[1].position[0] - 50.0).abs() < 1e-9);
        assert!((atoms[0].distance_to(&atoms[1]) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn separated_pair_untouched() {
        let catalog = ElementCatalog::embedded();
        let mut atoms = vec![
            atom(&catalog, 1, "C", [0.0, 0.0]),
            atom(&catalog, 2, "O", [80.0, 0.0]),
        ];
        assert_eq!(relax_overlaps(&mut atoms, &GeometryConfig::default()), 0);
        assert_eq!(atoms[1].position, [80.0, 0.0]);
    }

    #[test]
    fn coincident_atoms_skipped() {
        let catalog = ElementCatalog::embedded();
        let mut atoms = vec![
            atom(&catalog, 1, "C", [5.0, 5.0]),
            atom(&catalog, 2, "C", [5.0, 5.0]),
        ];
        assert_eq!(relax_overlaps(&mut atoms, &GeometryConfig::default()), 0);
        assert_eq!(atoms[0].position, atoms[1].position);
        assert!(atoms.iter().all(|a| a.position[0].is_finite()));
    }

    #[test]
    fn crowd_spreads_out() {
        let catalog = ElementCatalog::embedded();
        let mut atoms: Vec<Atom> = (0..5)
            .map(|i| atom(&catalog, i, "C", [i as f64 * 10.0, (i % 2) as f64 * 7.0]))
            .collect();
        let before: f64 = atoms[0].distance_to(&atoms[4]);
        relax_overlaps(&mut atoms, &GeometryConfig::default());
        assert!(atoms[0].distance_to(&atoms[4]) > before);
    }
}
