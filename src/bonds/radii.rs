//! Covalent radii by element symbol.

/// Covalent radius used for elements missing from the table (carbon).
pub const FALLBACK_RADIUS: f32 = 0.76;

/// Single-bond covalent radii in angstroms (Cordero et al. 2008).
pub const COVALENT_RADII: &[(&str, f32)] = &[
    ("H", 0.31),
    ("C", 0.76),
    ("N", 0.71),
    ("O", 0.66),
    ("S", 1.05),
    ("P", 1.07),
    ("F", 0.57),
    ("CL", 1.02),
    ("BR", 1.20),
    ("I", 1.39),
    ("SE", 1.20),
    ("NA", 1.66),
    ("K", 2.03),
    ("MG", 1.41),
    ("CA", 1.76),
    ("MN", 1.39),
    ("FE", 1.32),
    ("CO", 1.26),
    ("NI", 1.24),
    ("CU", 1.32),
    ("ZN", 1.22),
];

/// Covalent radius for `element`, matched case-insensitively after
/// trimming. Unknown symbols get [`FALLBACK_RADIUS`].
#[must_use]
pub fn covalent_radius(element: &str) -> f32 {
    let symbol = element.trim();
    COVALENT_RADII
        .iter()
        .find(|(sym, _)| sym.eq_ignore_ascii_case(symbol))
        .map_or(FALLBACK_RADIUS, |&(_, r)| r)
}
