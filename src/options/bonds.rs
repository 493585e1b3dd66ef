use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Candidate-pruning strategy for covalent bond inference.
///
/// Every strategy applies the same distance predicate; they differ only in
/// which atom pairs are tested.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum BondStrategy {
    /// Pairs within a residue and across chain-consecutive residues.
    ///
    /// Linear time, but long-range bonds such as disulfide bridges are
    /// never found. Pick [`BondStrategy::SpatialHash`] when those matter.
    #[default]
    ResidueScoped,
    /// Exhaustive search accelerated by a uniform spatial hash.
    SpatialHash,
    /// Fixed backbone topology (N-CA, CA-C, C-O and peptide C-N).
    Backbone,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Bonds", inline)]
#[serde(default)]
/// Covalent bond inference options.
pub struct BondOptions {
    /// Candidate-pruning strategy.
    #[schemars(title = "Strategy")]
    pub strategy: BondStrategy,
    /// Multiplier applied to the covalent radius sum.
    #[schemars(title = "Tolerance", range(min = 1.0, max = 2.0))]
    pub tolerance: f32,
    /// Absolute bond length cutoff in angstroms.
    #[schemars(title = "Max Bond Length", range(min = 1.0, max = 4.0))]
    pub max_bond_length: f32,
}

impl Default for BondOptions {
    fn default() -> Self {
        Self {
            strategy: BondStrategy::ResidueScoped,
            tolerance: 1.3,
            max_bond_length: 2.5,
        }
    }
}
