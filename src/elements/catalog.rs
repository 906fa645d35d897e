//! Small built-in catalog of common materials and rolled profiles.
//!
//! Profile properties are the usual European tables (A in m², I_z in m⁴,
//! depth in m). The catalog is a convenience for model builders; any
//! [`Section::Profile`] with explicit properties works the same way.

use super::{Material, Section};

/// Look up a catalog material by name.
pub fn material(name: &str) -> Option<Material> {
    match name {
        "Steel A-36" => Some(Material::steel()),
        "Steel S-275" => Some(
            Material::new("Steel S-275", 210e6, 1.2e-5)
                .with_nu(0.3)
                .with_rho(7.85)
                .with_fy(275e3),
        ),
        "Concrete H-30" => Some(Material::concrete()),
        "Aluminum 6061" => Some(
            Material::new("Aluminum 6061", 68.9e6, 2.3e-5)
                .with_nu(0.33)
                .with_rho(2.70)
                .with_fy(276e3),
        ),
        _ => None,
    }
}

/// Look up a catalog profile by designation.
pub fn section(name: &str) -> Option<Section> {
    let (a, iz, h) = match name {
        "IPE 100" => (10.3e-4, 171e-8, 0.100),
        "IPE 160" => (20.1e-4, 869e-8, 0.160),
        "IPE 200" => (28.5e-4, 1943e-8, 0.200),
        "IPE 220" => (33.4e-4, 2772e-8, 0.220),
        "IPE 300" => (53.8e-4, 8356e-8, 0.300),
        "IPE 400" => (84.5e-4, 23130e-8, 0.400),
        "HEB 200" => (78.1e-4, 5696e-8, 0.200),
        "HEB 300" => (149.1e-4, 25170e-8, 0.300),
        _ => return None,
    };
    Some(Section::profile(name, a, iz, h))
}

/// Designations available from [`section`].
pub fn section_names() -> Vec<&'static str> {
    vec![
        "IPE 100", "IPE 160", "IPE 200", "IPE 220", "IPE 300", "IPE 400", "HEB 200", "HEB 300",
    ]
}
