// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (default thresholds)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Protein backbone ribbon geometry and covalent bond inference.
//!
//! Turns per-residue alpha-carbon anchors and helix/sheet annotations into a
//! tessellated triangle mesh, and infers covalent bonds from atom positions
//! and elements. Everything here is CPU-side and renderer-agnostic; the
//! caller uploads [`geometry::PreparedMesh`] buffers however it likes.
//!
//! # Key entry points
//!
//! - [`ribbon::build_ribbon`] - whole-structure ribbon mesh, one
//!   [`ribbon::ChainRange`] per chain
//! - [`bonds::detect_bonds`] - covalent bonds with a configurable
//!   [`options::BondStrategy`]
//! - [`secondary_structure::classify`] - helix/sheet/coil segments
//! - [`options::Options`] - geometry, classifier, bond and palette settings
//!   with TOML presets
//!
//! # Pipeline
//!
//! Per chain: [`geometry::spline`] fits a curve through the anchors,
//! [`geometry::frame`] propagates rotation-minimizing frames along it,
//! [`geometry::profile`] sizes each cross-section from the structure type,
//! and [`geometry::tessellate`] extrudes rings, end caps and sheet arrow
//! heads into a [`geometry::Mesh`]. Chains run in parallel and are merged in
//! chain order.

pub mod bonds;
pub mod error;
pub mod geometry;
pub mod options;
pub mod ribbon;
pub mod secondary_structure;
pub mod structure;
pub mod util;

pub use error::RibbonError;
pub use options::Options;
