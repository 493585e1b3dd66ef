//! Read-only structure snapshot supplied by the host application.
//!
//! Parsing happens elsewhere; this module only groups already-parsed atom
//! records into residues and pulls out the per-residue alpha-carbon anchors
//! that drive the ribbon spline.

use std::ops::Range;

use glam::Vec3;

/// A single parsed atom.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Serial number from the source file.
    pub serial: u32,
    /// Atom name (e.g. `CA`, `OG1`).
    pub name: String,
    /// Element symbol (e.g. `C`, `Fe`).
    pub element: String,
    /// Three-letter residue name.
    pub residue_name: String,
    /// Chain identifier.
    pub chain_id: String,
    /// Residue sequence number.
    pub residue_seq: i32,
    /// Cartesian position in angstroms.
    pub position: Vec3,
    /// Occupancy in `[0, 1]`.
    pub occupancy: f32,
}

impl AtomRecord {
    /// Convenience constructor for a fully-occupied atom.
    #[must_use]
    pub fn new(
        serial: u32,
        name: &str,
        element: &str,
        residue_name: &str,
        chain_id: &str,
        residue_seq: i32,
        position: Vec3,
    ) -> Self {
        Self {
            serial,
            name: name.to_owned(),
            element: element.to_owned(),
            residue_name: residue_name.to_owned(),
            chain_id: chain_id.to_owned(),
            residue_seq,
            position,
            occupancy: 1.0,
        }
    }
}

/// An annotated helix or sheet range (inclusive, by sequence number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryRange {
    /// Chain identifier.
    pub chain_id: String,
    /// First residue sequence number.
    pub start: i32,
    /// Last residue sequence number (inclusive).
    pub end: i32,
}

impl SecondaryRange {
    /// Build a range on `chain_id` covering `start..=end`.
    #[must_use]
    pub fn new(chain_id: &str, start: i32, end: i32) -> Self {
        Self {
            chain_id: chain_id.to_owned(),
            start,
            end,
        }
    }

    /// Whether the range covers residue `seq` of `chain_id`.
    #[must_use]
    pub fn contains(&self, chain_id: &str, seq: i32) -> bool {
        self.chain_id == chain_id && (self.start..=self.end).contains(&seq)
    }
}

/// A residue: a contiguous run of atoms sharing chain, number and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Chain identifier.
    pub chain_id: String,
    /// Residue sequence number.
    pub seq_num: i32,
    /// Three-letter residue name.
    pub name: String,
    /// Indices of this residue's atoms in the snapshot atom list.
    pub atoms: Range<usize>,
}

impl Residue {
    /// Index (into `atoms`) of the atom called `name`, if present.
    #[must_use]
    pub fn find_atom(&self, atoms: &[AtomRecord], name: &str) -> Option<usize> {
        let slice = atoms.get(self.atoms.clone())?;
        slice
            .iter()
            .position(|a| a.name.trim() == name)
            .map(|i| self.atoms.start + i)
    }
}

/// The alpha-carbon control point of one residue.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// CA position.
    pub position: Vec3,
    /// Index of the residue in [`StructureSnapshot::residues`].
    pub residue_idx: usize,
    /// Chain identifier.
    pub chain_id: String,
}

/// Immutable atom + annotation snapshot for one loaded structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureSnapshot {
    /// Atoms in file order.
    pub atoms: Vec<AtomRecord>,
    /// Helix annotations.
    pub helices: Vec<SecondaryRange>,
    /// Sheet strand annotations.
    pub sheets: Vec<SecondaryRange>,
}

impl StructureSnapshot {
    /// Group contiguous atoms into residues, in file order.
    #[must_use]
    pub fn residues(&self) -> Vec<Residue> {
        group_residues(&self.atoms)
    }

    /// One anchor per residue holding a CA atom, in residue order.
    #[must_use]
    pub fn anchors(&self, residues: &[Residue]) -> Vec<Anchor> {
        extract_anchors(&self.atoms, residues)
    }
}

/// Group contiguous atoms sharing (chain, sequence number, residue name).
#[must_use]
pub fn group_residues(atoms: &[AtomRecord]) -> Vec<Residue> {
    let mut residues: Vec<Residue> = Vec::new();
    for (i, atom) in atoms.iter().enumerate() {
        match residues.last_mut() {
            Some(r)
                if r.chain_id == atom.chain_id
                    && r.seq_num == atom.residue_seq
                    && r.name == atom.residue_name =>
            {
                r.atoms.end = i + 1;
            }
            _ => residues.push(Residue {
                chain_id: atom.chain_id.clone(),
                seq_num: atom.residue_seq,
                name: atom.residue_name.clone(),
                atoms: i..i + 1,
            }),
        }
    }
    residues
}

/// One anchor per residue that has a CA atom. Residues without one are
/// skipped rather than guessed.
#[must_use]
pub fn extract_anchors(atoms: &[AtomRecord], residues: &[Residue]) -> Vec<Anchor> {
    residues
        .iter()
        .enumerate()
        .filter_map(|(residue_idx, residue)| {
            let ca = residue.find_atom(atoms, "CA")?;
            Some(Anchor {
                position: atoms[ca].position,
                residue_idx,
                chain_id: residue.chain_id.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str, resn: &str, chain: &str, seq: i32, x: f32) -> AtomRecord {
        let element = &name[..1];
        AtomRecord::new(0, name, element, resn, chain, seq, Vec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn groups_contiguous_atoms() {
        let atoms = vec![
            atom("N", "ALA", "A", 1, 0.0),
            atom("CA", "ALA", "A", 1, 1.0),
            atom("N", "GLY", "A", 2, 2.0),
            atom("CA", "GLY", "A", 2, 3.0),
            atom("N", "GLY", "B", 2, 4.0),
        ];
        let residues = group_residues(&atoms);
        assert_eq!(residues.len(), 3);
        assert_eq!(residues[0].atoms, 0..2);
        assert_eq!(residues[1].atoms, 2..4);
        assert_eq!(residues[2].chain_id, "B");
    }

    #[test]
    fn anchors_skip_residues_without_ca() {
        let atoms = vec![
            atom("CA", "ALA", "A", 1, 0.0),
            atom("O", "HOH", "A", 2, 5.0),
            atom("CA", "GLY", "A", 3, 7.6),
        ];
        let residues = group_residues(&atoms);
        let anchors = extract_anchors(&atoms, &residues);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[1].residue_idx, 2);
        assert_eq!(anchors[1].position, Vec3::new(7.6, 0.0, 0.0));
    }

    #[test]
    fn missing_atom_is_none() {
        let atoms = vec![atom("CA", "GLY", "A", 1, 0.0)];
        let residues = group_residues(&atoms);
        assert_eq!(residues[0].find_atom(&atoms, "CA"), Some(0));
        assert_eq!(residues[0].find_atom(&atoms, "CB"), None);
    }

    #[test]
    fn secondary_range_is_inclusive() {
        let range = SecondaryRange::new("A", 2, 4);
        assert!(range.contains("A", 2));
        assert!(range.contains("A", 4));
        assert!(!range.contains("A", 5));
        assert!(!range.contains("B", 3));
    }
}
