//! Centralized geometry/bond/color options with TOML preset support.
//!
//! All tweakable settings (spline and frame parameters, cross-section
//! dimensions, arrow heads, bond inference, classifier policy, palette) are
//! consolidated here. Options serialize to/from TOML so presets can be stored
//! next to the host application's other view presets.

mod bonds;
mod classifier;
mod colors;
mod geometry;

use std::path::Path;

pub use bonds::{BondOptions, BondStrategy};
pub use classifier::{ClassifierOptions, OverlapPolicy};
pub use colors::{ColorOptions, ColorScheme};
pub use geometry::{CrossSectionMode, GeometryOptions, SplineKind};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RibbonError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[bonds]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Spline, frame, profile and tessellation options.
    pub geometry: GeometryOptions,
    /// Secondary structure classification options.
    pub classifier: ClassifierOptions,
    /// Covalent bond inference options.
    pub bonds: BondOptions,
    /// Ribbon palette.
    #[schemars(skip)]
    pub colors: ColorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`RibbonError::Io`] if the file cannot be read,
    /// [`RibbonError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, RibbonError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`RibbonError::OptionsParse`] on malformed TOML or mistyped fields.
    pub fn from_toml(content: &str) -> Result<Self, RibbonError> {
        toml::from_str(content)
            .map_err(|e| RibbonError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed), creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// [`RibbonError::OptionsParse`] if serialization fails,
    /// [`RibbonError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RibbonError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RibbonError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[bonds]
strategy = "spatial_hash"
tolerance = 1.2

[classifier]
overlap_policy = "helix_wins"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.bonds.strategy, BondStrategy::SpatialHash);
        assert_eq!(opts.bonds.tolerance, 1.2);
        assert_eq!(opts.bonds.max_bond_length, 2.5);
        assert_eq!(opts.classifier.overlap_policy, OverlapPolicy::HelixWins);
        assert_eq!(opts.geometry, GeometryOptions::default());
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[geometry\nhelix_width = ").unwrap_err();
        assert!(matches!(err, RibbonError::OptionsParse(_)));
    }

    #[test]
    fn save_then_load_preset() {
        let dir = std::env::temp_dir()
            .join(format!("viso-ribbon-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.geometry.cross_section_mode = CrossSectionMode::Circle;
        opts.geometry.segments_per_residue = 4;
        opts.save(&dir.join("tube.toml")).unwrap();

        let loaded = Options::load(&dir.join("tube.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir), vec!["tube".to_owned()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("geometry"));
        assert!(props.contains_key("bonds"));
        assert!(props.contains_key("classifier"));
        assert!(!props.contains_key("colors"));

        let geometry = &props["geometry"]["properties"];
        assert!(geometry.get("helix_width").is_some());
        assert!(geometry.get("sheet_arrows").is_some());
    }
}
