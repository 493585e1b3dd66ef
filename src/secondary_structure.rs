//! Secondary structure classification from helix/sheet annotations.
//!
//! Resolves each residue to helix, sheet or coil from the annotated ranges
//! and groups consecutive residues of one chain and one type into segments.

use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::options::OverlapPolicy;
use crate::structure::{Residue, SecondaryRange};

/// Secondary structure type for a residue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SSType {
    /// Alpha helix (or any annotated helix class).
    Helix,
    /// Beta strand.
    Sheet,
    /// Everything else.
    #[default]
    Coil,
}

/// A maximal run of residues in one chain sharing one [`SSType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureSegment {
    /// Chain the run belongs to.
    pub chain_id: String,
    /// First residue index (into the classified residue list).
    pub start: usize,
    /// Last residue index, inclusive.
    pub end: usize,
    /// Structure type shared by every residue in the run.
    pub ss_type: SSType,
}

impl StructureSegment {
    /// Number of residues in the segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    /// Always false; a segment holds at least one residue.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The residues covered by this segment.
    #[must_use]
    pub fn residues<'a>(&self, all: &'a [Residue]) -> &'a [Residue] {
        all.get(self.start..=self.end).unwrap_or(&[])
    }

    /// Whether residue index `idx` falls inside the segment.
    #[must_use]
    pub fn contains(&self, idx: usize) -> bool {
        (self.start..=self.end).contains(&idx)
    }
}

/// Classify residues and group them into contiguous per-chain segments.
///
/// Residues not covered by any record are coil. With
/// [`OverlapPolicy::SheetWins`] sheet records are applied after helix
/// records and therefore override them; [`OverlapPolicy::HelixWins`]
/// reverses the order. The result covers every residue exactly once, in
/// input order, and is identical for identical input.
#[must_use]
pub fn classify(
    residues: &[Residue],
    helices: &[SecondaryRange],
    sheets: &[SecondaryRange],
    policy: OverlapPolicy,
) -> Vec<StructureSegment> {
    let ordered: [(&[SecondaryRange], SSType); 2] = match policy {
        OverlapPolicy::SheetWins => {
            [(helices, SSType::Helix), (sheets, SSType::Sheet)]
        }
        OverlapPolicy::HelixWins => {
            [(sheets, SSType::Sheet), (helices, SSType::Helix)]
        }
    };
    // Ranges per chain in application order; the last match wins.
    let mut by_chain: FxHashMap<&str, Vec<(&SecondaryRange, SSType)>> =
        FxHashMap::default();
    for (ranges, ss) in ordered {
        for range in ranges {
            if range.start > range.end {
                log::warn!(
                    "ignoring inverted {ss:?} range {}..{} on chain {}",
                    range.start,
                    range.end,
                    range.chain_id
                );
                continue;
            }
            by_chain
                .entry(range.chain_id.as_str())
                .or_default()
                .push((range, ss));
        }
    }
    let resolve = |residue: &Residue| {
        by_chain
            .get(residue.chain_id.as_str())
            .and_then(|ranges| {
                ranges
                    .iter()
                    .rev()
                    .find(|(range, _)| {
                        range.contains(&residue.chain_id, residue.seq_num)
                    })
            })
            .map_or(SSType::Coil, |&(_, ss)| ss)
    };

    let mut segments: Vec<StructureSegment> = Vec::new();
    for (i, residue) in residues.iter().enumerate() {
        let ss = resolve(residue);
        match segments.last_mut() {
            Some(seg) if seg.ss_type == ss && seg.chain_id == residue.chain_id => {
                seg.end = i;
            }
            _ => segments.push(StructureSegment {
                chain_id: residue.chain_id.clone(),
                start: i,
                end: i,
                ss_type: ss,
            }),
        }
    }
    segments
}

/// Expand segments back into one [`SSType`] per residue index.
///
/// Indices not covered by any segment (only possible when `n_residues`
/// exceeds what was classified) are coil.
#[must_use]
pub fn per_residue_types(
    segments: &[StructureSegment],
    n_residues: usize,
) -> Vec<SSType> {
    let mut types = vec![SSType::Coil; n_residues];
    for seg in segments {
        let end = (seg.end + 1).min(n_residues);
        if seg.start < end {
            types[seg.start..end].fill(seg.ss_type);
        }
    }
    types
}
