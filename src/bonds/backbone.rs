//! Fixed backbone topology: N-CA, CA-C, C-O and the peptide bond.

use super::{bond_between, Bond};
use crate::options::BondOptions;
use crate::structure::{AtomRecord, Residue};

/// Accepted C(i)-N(i+1) distance range in angstroms.
pub const PEPTIDE_BOND_RANGE: (f32, f32) = (1.2, 1.5);

/// Named backbone atoms of one residue; any may be absent.
#[derive(Debug, Clone, Copy, Default)]
struct BackboneAtoms {
    n: Option<usize>,
    ca: Option<usize>,
    c: Option<usize>,
    o: Option<usize>,
}

impl BackboneAtoms {
    fn locate(residue: &Residue, atoms: &[AtomRecord]) -> Self {
        Self {
            n: residue.find_atom(atoms, "N"),
            ca: residue.find_atom(atoms, "CA"),
            c: residue.find_atom(atoms, "C"),
            o: residue.find_atom(atoms, "O"),
        }
    }
}

/// Backbone bonds per residue plus peptide bonds between chain-consecutive
/// residues whose C-N distance falls in [`PEPTIDE_BOND_RANGE`].
#[must_use]
pub fn backbone_bonds(
    atoms: &[AtomRecord],
    residues: &[Residue],
    options: &BondOptions,
) -> Vec<Bond> {
    let located: Vec<BackboneAtoms> = residues
        .iter()
        .map(|r| BackboneAtoms::locate(r, atoms))
        .collect();

    let mut bonds = Vec::new();
    for (ri, bb) in located.iter().enumerate() {
        for pair in [(bb.n, bb.ca), (bb.ca, bb.c), (bb.c, bb.o)] {
            if let (Some(i), Some(j)) = pair {
                bonds.extend(bond_between(atoms, i, j, options));
            }
        }

        let Some(next) = residues.get(ri + 1) else {
            continue;
        };
        if next.chain_id != residues[ri].chain_id {
            continue;
        }
        if let (Some(c), Some(n)) = (bb.c, located[ri + 1].n) {
            let length = atoms[c].position.distance(atoms[n].position);
            let (lo, hi) = PEPTIDE_BOND_RANGE;
            if (lo..=hi).contains(&length) {
                bonds.push(Bond::new(c, n, length));
            }
        }
    }
    bonds
}
