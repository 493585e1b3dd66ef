use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::secondary_structure::SSType;

/// Color palette for backbone ribbons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct ColorOptions {
    /// RGB color for helix residues.
    pub helix: [f32; 3],
    /// RGB color for sheet residues.
    pub sheet: [f32; 3],
    /// RGB color for coil residues.
    pub coil: [f32; 3],
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            helix: [0.9, 0.3, 0.5],
            sheet: [0.95, 0.85, 0.3],
            coil: [0.6, 0.85, 0.6],
        }
    }
}

impl ColorOptions {
    /// Palette color for a secondary structure type.
    #[must_use]
    pub fn for_ss(&self, ss: SSType) -> [f32; 3] {
        match ss {
            SSType::Helix => self.helix,
            SSType::Sheet => self.sheet,
            SSType::Coil => self.coil,
        }
    }
}

/// How residue colors are chosen for the ribbon.
///
/// The palette itself belongs to the caller; the ribbon only looks colors
/// up per residue and interpolates them along the curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Color each residue by its secondary structure type.
    #[default]
    SecondaryStructure,
    /// One color for the whole ribbon.
    Uniform([f32; 3]),
    /// Explicit color per residue, indexed like
    /// [`StructureSnapshot::residues`](crate::structure::StructureSnapshot::residues).
    /// Residues past the end fall back to the structure color.
    PerResidue(Vec<[f32; 3]>),
}

impl ColorScheme {
    /// Resolve the color of residue `residue_idx` with structure `ss`.
    #[must_use]
    pub fn residue_color(
        &self,
        residue_idx: usize,
        ss: SSType,
        palette: &ColorOptions,
    ) -> [f32; 3] {
        match self {
            Self::SecondaryStructure => palette.for_ss(ss),
            Self::Uniform(color) => *color,
            Self::PerResidue(colors) => colors
                .get(residue_idx)
                .copied()
                .unwrap_or_else(|| palette.for_ss(ss)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_residue_falls_back_to_structure_color() {
        let palette = ColorOptions::default();
        let scheme = ColorScheme::PerResidue(vec![[1.0, 0.0, 0.0]]);
        assert_eq!(
            scheme.residue_color(0, SSType::Helix, &palette),
            [1.0, 0.0, 0.0]
        );
        assert_eq!(
            scheme.residue_color(5, SSType::Sheet, &palette),
            palette.sheet
        );
    }

    #[test]
    fn uniform_ignores_structure() {
        let palette = ColorOptions::default();
        let scheme = ColorScheme::Uniform([0.1, 0.2, 0.3]);
        for ss in [SSType::Helix, SSType::Sheet, SSType::Coil] {
            assert_eq!(scheme.residue_color(3, ss, &palette), [0.1, 0.2, 0.3]);
        }
    }
}
