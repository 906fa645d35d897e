//! Cross-section properties.

use serde::{Deserialize, Serialize};

/// Cross-section of a prismatic bar.
///
/// Each variant can produce the three properties the analysis needs:
/// area `a()`, strong-axis inertia `iz()` and depth `depth()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Section {
    /// Solid rectangle, width `b` × depth `h` in metres.
    Rectangular { name: String, b: f64, h: f64 },
    /// Solid circle of diameter `d`.
    Circular { name: String, d: f64 },
    /// Hollow circle with outer diameter `d` and wall thickness `t`.
    Pipe { name: String, d: f64, t: f64 },
    /// Catalog profile with explicit properties (e.g. an IPE shape).
    Profile { name: String, a: f64, iz: f64, h: f64 },
}

impl Section {
    /// Rectangular section.
    pub fn rectangular(name: &str, b: f64, h: f64) -> Self {
        Section::Rectangular {
            name: name.to_string(),
            b,
            h,
        }
    }

    /// Solid circular section.
    pub fn circular(name: &str, d: f64) -> Self {
        Section::Circular {
            name: name.to_string(),
            d,
        }
    }

    /// Hollow circular (pipe) section.
    pub fn pipe(name: &str, d: f64, t: f64) -> Self {
        Section::Pipe {
            name: name.to_string(),
            d,
            t,
        }
    }

    /// Catalog profile with explicit A, I_z and depth.
    pub fn profile(name: &str, a: f64, iz: f64, h: f64) -> Self {
        Section::Profile {
            name: name.to_string(),
            a,
            iz,
            h,
        }
    }

    /// IPE 220 catalog entry (A = 33.4 cm², I_z = 2772 cm⁴, h = 220 mm).
    pub fn ipe_220() -> Self {
        Section::profile("IPE 220", 33.4e-4, 2772e-8, 0.220)
    }

    /// Section name.
    pub fn name(&self) -> &str {
        match self {
            Section::Rectangular { name, .. }
            | Section::Circular { name, .. }
            | Section::Pipe { name, .. }
            | Section::Profile { name, .. } => name,
        }
    }

    /// Cross-sectional area in m².
    pub fn a(&self) -> f64 {
        match *self {
            Section::Rectangular { b, h, .. } => b * h,
            Section::Circular { d, .. } => {
                let r = d / 2.0;
                std::f64::consts::PI * r * r
            }
            Section::Pipe { d, t, .. } => {
                let ro = d / 2.0;
                let ri = ro - t;
                std::f64::consts::PI * (ro * ro - ri * ri)
            }
            Section::Profile { a, .. } => a,
        }
    }

    /// Strong-axis moment of inertia in m⁴.
    pub fn iz(&self) -> f64 {
        match *self {
            Section::Rectangular { b, h, .. } => b * h.powi(3) / 12.0,
            Section::Circular { d, .. } => {
                let r = d / 2.0;
                std::f64::consts::PI * r.powi(4) / 4.0
            }
            Section::Pipe { d, t, .. } => {
                let ro = d / 2.0;
                let ri = ro - t;
                std::f64::consts::PI * (ro.powi(4) - ri.powi(4)) / 4.0
            }
            Section::Profile { iz, .. } => iz,
        }
    }

    /// Section depth in metres, used by the thermal gradient term.
    pub fn depth(&self) -> f64 {
        match *self {
            Section::Rectangular { h, .. } => h,
            Section::Circular { d, .. } | Section::Pipe { d, .. } => d,
            Section::Profile { h, .. } => h,
        }
    }

    /// Elastic section modulus W_z = I_z / (h/2) in m³.
    pub fn wz(&self) -> f64 {
        self.iz() / (self.depth() / 2.0)
    }

    /// Radius of gyration r_z = √(I_z/A) in metres.
    pub fn rz(&self) -> f64 {
        (self.iz() / self.a()).sqrt()
    }

    /// Check the section invariants: A > 0, I_z > 0, depth > 0.
    pub fn validate(&self) -> Result<(), String> {
        if self.a() <= 0.0 {
            return Err(format!("section '{}': area must be positive", self.name()));
        }
        if self.iz() <= 0.0 {
            return Err(format!("section '{}': inertia must be positive", self.name()));
        }
        if self.depth() <= 0.0 {
            return Err(format!("section '{}': depth must be positive", self.name()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular("30x50", 0.3, 0.5);
        assert_relative_eq!(section.a(), 0.15, epsilon = 1e-12);
        assert_relative_eq!(section.iz(), 0.3 * 0.5f64.powi(3) / 12.0, epsilon = 1e-12);
        assert_relative_eq!(section.depth(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular("D50", 0.5);
        let r: f64 = 0.25;
        assert_relative_eq!(section.a(), std::f64::consts::PI * r * r, epsilon = 1e-12);
    }

    #[test]
    fn test_pipe_section_thinner_than_solid() {
        let solid = Section::circular("D30", 0.3);
        let pipe = Section::pipe("D30x10", 0.3, 0.01);
        assert!(pipe.a() < solid.a());
        assert!(pipe.iz() < solid.iz());
    }

    #[test]
    fn test_derived_properties() {
        let section = Section::ipe_220();
        assert_relative_eq!(section.wz(), 2772e-8 / 0.110, epsilon = 1e-12);
        assert_relative_eq!(section.rz(), (2772e-8 / 33.4e-4_f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_profile() {
        assert!(Section::profile("bad", 0.0, 1e-5, 0.2).validate().is_err());
    }
}
