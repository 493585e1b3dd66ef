//! Covalent bond inference from atom positions and elements.
//!
//! Two atoms are bonded when their distance is within `tolerance` times the
//! sum of their covalent radii and no longer than `max_bond_length`. The
//! [`BondStrategy`] only decides which pairs get tested.

pub mod backbone;
pub mod radii;
pub mod spatial;

use crate::options::{BondOptions, BondStrategy};
use crate::structure::{group_residues, AtomRecord, Residue};

pub use radii::covalent_radius;
pub use spatial::SpatialGrid;

/// An inferred covalent bond between two atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    /// Lower atom index.
    pub a: usize,
    /// Higher atom index.
    pub b: usize,
    /// Measured distance in angstroms.
    pub length: f32,
}

impl Bond {
    /// Bond between atoms `i` and `j`, stored with `a < b`.
    #[must_use]
    pub fn new(i: usize, j: usize, length: f32) -> Self {
        Self {
            a: i.min(j),
            b: i.max(j),
            length,
        }
    }
}

/// Distance predicate shared by every strategy.
#[must_use]
pub fn is_bonded(
    element_a: &str,
    element_b: &str,
    distance: f32,
    options: &BondOptions,
) -> bool {
    let threshold =
        options.tolerance * (covalent_radius(element_a) + covalent_radius(element_b));
    distance <= threshold && distance <= options.max_bond_length
}

/// Test one atom pair.
pub(crate) fn bond_between(
    atoms: &[AtomRecord],
    i: usize,
    j: usize,
    options: &BondOptions,
) -> Option<Bond> {
    if i == j {
        return None;
    }
    let (x, y) = (&atoms[i], &atoms[j]);
    let distance = x.position.distance(y.position);
    is_bonded(&x.element, &y.element, distance, options).then(|| Bond::new(i, j, distance))
}

/// Infer covalent bonds with the configured strategy.
///
/// Output is sorted by `(a, b)` with no duplicates.
#[must_use]
pub fn detect_bonds(atoms: &[AtomRecord], options: &BondOptions) -> Vec<Bond> {
    let mut bonds = match options.strategy {
        BondStrategy::ResidueScoped => {
            residue_scoped_bonds(atoms, &group_residues(atoms), options)
        }
        BondStrategy::SpatialHash => spatial::spatial_hash_bonds(atoms, options),
        BondStrategy::Backbone => {
            backbone::backbone_bonds(atoms, &group_residues(atoms), options)
        }
    };
    bonds.sort_unstable_by_key(|bond| (bond.a, bond.b));
    bonds.dedup_by_key(|bond| (bond.a, bond.b));
    log::debug!(
        "{:?} bond search: {} bonds over {} atoms",
        options.strategy,
        bonds.len(),
        atoms.len()
    );
    bonds
}

/// Pairs inside each residue and between chain-consecutive residues.
///
/// Bonds between residues further apart in sequence (disulfides, ligand
/// links) are not considered.
#[must_use]
pub fn residue_scoped_bonds(
    atoms: &[AtomRecord],
    residues: &[Residue],
    options: &BondOptions,
) -> Vec<Bond> {
    let mut bonds = Vec::new();
    for (ri, residue) in residues.iter().enumerate() {
        let own = residue.atoms.clone();
        for i in own.clone() {
            bonds.extend(
                (i + 1..own.end)
                    .filter_map(|j| bond_between(atoms, i, j, options)),
            );
        }

        let Some(next) = residues.get(ri + 1) else {
            continue;
        };
        if next.chain_id != residue.chain_id {
            continue;
        }
        for i in own {
            bonds.extend(
                next.atoms
                    .clone()
                    .filter_map(|j| bond_between(atoms, i, j, options)),
            );
        }
    }
    bonds
}
