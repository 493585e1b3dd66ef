use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which annotation wins when a residue is inside both a helix and a sheet
/// record.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Sheet records override helix records.
    #[default]
    SheetWins,
    /// Helix records override sheet records.
    HelixWins,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[schemars(title = "Classifier", inline)]
#[serde(default)]
/// Secondary structure classification options.
pub struct ClassifierOptions {
    /// Precedence between overlapping helix and sheet records.
    #[schemars(title = "Overlap Policy")]
    pub overlap_policy: OverlapPolicy,
}
