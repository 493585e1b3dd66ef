//! Exhaustive bond search over a uniform spatial hash.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{bond_between, Bond};
use crate::options::BondOptions;
use crate::structure::AtomRecord;

type CellKey = (i32, i32, i32);

/// Uniform cubic cells, each holding the indices of the points inside it.
///
/// A 3×3×3 neighbourhood query returns every point within `cell_size` of
/// the query position.
pub struct SpatialGrid {
    cells: FxHashMap<CellKey, Vec<usize>>,
    cell_size: f32,
}

impl SpatialGrid {
    /// Empty grid with the given cell edge length.
    #[must_use]
    pub fn with_capacity(cell_size: f32, expected_points: usize) -> Self {
        let mut cells = FxHashMap::default();
        cells.reserve(expected_points);
        Self { cells, cell_size }
    }

    /// Grid holding every position, keyed by its slice index.
    #[must_use]
    pub fn from_positions<I>(cell_size: f32, positions: I) -> Self
    where
        I: ExactSizeIterator<Item = Vec3>,
    {
        let mut grid = Self::with_capacity(cell_size, positions.len());
        for (idx, pos) in positions.enumerate() {
            grid.insert(pos, idx);
        }
        grid
    }

    fn cell_key(&self, pos: Vec3) -> CellKey {
        let c = (pos / self.cell_size).floor();
        (c.x as i32, c.y as i32, c.z as i32)
    }

    /// Add `idx` at `pos`.
    pub fn insert(&mut self, pos: Vec3, idx: usize) {
        let key = self.cell_key(pos);
        self.cells.entry(key).or_default().push(idx);
    }

    /// Collect every index in the 27 cells around `pos` into `out`.
    pub fn query_neighbors(&self, pos: Vec3, out: &mut Vec<usize>) {
        out.clear();
        let (cx, cy, cz) = self.cell_key(pos);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(indices) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) {
                        out.extend_from_slice(indices);
                    }
                }
            }
        }
    }
}

/// Every bonded pair, found by testing each atom against its own and the
/// 26 surrounding cells.
#[must_use]
pub fn spatial_hash_bonds(atoms: &[AtomRecord], options: &BondOptions) -> Vec<Bond> {
    if atoms.len() < 2 {
        return Vec::new();
    }

    let cell_size = options.max_bond_length * options.tolerance.max(1.0);
    if !(cell_size.is_finite() && cell_size > 0.0) {
        log::warn!("bond search skipped: invalid cell size {cell_size}");
        return Vec::new();
    }

    let grid = SpatialGrid::from_positions(cell_size, atoms.iter().map(|a| a.position));
    let mut bonds = Vec::new();
    let mut neighbors = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        grid.query_neighbors(atom.position, &mut neighbors);
        bonds.extend(
            neighbors
                .iter()
                .filter(|&&j| j > i)
                .filter_map(|&j| bond_between(atoms, i, j, options)),
        );
    }
    bonds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbourhood_covers_adjacent_cells() {
        let mut grid = SpatialGrid::with_capacity(2.0, 4);
        grid.insert(Vec3::new(-1.0, -1.0, -1.0), 0);
        grid.insert(Vec3::new(1.0, 1.0, 1.0), 1);
        grid.insert(Vec3::new(9.0, 0.0, 0.0), 2);

        let mut neighbors = Vec::new();
        grid.query_neighbors(Vec3::ZERO, &mut neighbors);
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 1]);
    }

    #[test]
    fn query_clears_previous_results() {
        let grid = SpatialGrid::from_positions(1.0, [Vec3::ZERO].into_iter());
        let mut neighbors = vec![42];
        grid.query_neighbors(Vec3::splat(100.0), &mut neighbors);
        assert!(neighbors.is_empty());
    }
}
