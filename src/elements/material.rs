//! Material properties.

use serde::{Deserialize, Serialize};

/// Material properties for frame bars.
///
/// Units follow the rest of the crate: kN and metres, so `e` is in kN/m²
/// and `alpha` in 1/°C.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Young's modulus in kN/m²
    pub e: f64,
    /// Thermal expansion coefficient in 1/°C
    pub alpha: f64,
    /// Poisson's ratio (optional)
    pub nu: Option<f64>,
    /// Density in t/m³ (optional)
    pub rho: Option<f64>,
    /// Yield strength in kN/m² (optional)
    pub fy: Option<f64>,
}

impl Material {
    /// Create a material from the two properties the analysis needs.
    pub fn new(name: &str, e: f64, alpha: f64) -> Self {
        Self {
            name: name.to_string(),
            e,
            alpha,
            nu: None,
            rho: None,
            fy: None,
        }
    }

    /// Set Poisson's ratio.
    pub fn with_nu(mut self, nu: f64) -> Self {
        self.nu = Some(nu);
        self
    }

    /// Set the density.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = Some(rho);
        self
    }

    /// Set the yield strength.
    pub fn with_fy(mut self, fy: f64) -> Self {
        self.fy = Some(fy);
        self
    }

    /// Structural steel (A-36): E = 200·10⁶ kN/m², α = 1.2·10⁻⁵ 1/°C.
    pub fn steel() -> Self {
        Self {
            name: "Steel A-36".to_string(),
            e: 200e6,
            alpha: 1.2e-5,
            nu: Some(0.3),
            rho: Some(7.85),
            fy: Some(250e3),
        }
    }

    /// Normal-weight concrete with E = 30·10⁶ kN/m².
    pub fn concrete() -> Self {
        Self {
            name: "Concrete H-30".to_string(),
            e: 30e6,
            alpha: 1.0e-5,
            nu: Some(0.2),
            rho: Some(2.4),
            fy: None,
        }
    }

    /// Shear modulus G = E / (2(1+ν)), assuming ν = 0.3 when not set.
    pub fn g(&self) -> f64 {
        let nu = self.nu.unwrap_or(0.3);
        self.e / (2.0 * (1.0 + nu))
    }

    /// Check the material invariants: E > 0, α ≥ 0, −1 < ν < 0.5.
    pub fn validate(&self) -> Result<(), String> {
        if self.e <= 0.0 {
            return Err(format!("material '{}': E must be positive", self.name));
        }
        if self.alpha < 0.0 {
            return Err(format!("material '{}': alpha must be non-negative", self.name));
        }
        if let Some(nu) = self.nu {
            if nu <= -1.0 || nu >= 0.5 {
                return Err(format!("material '{}': nu must lie in (-1, 0.5)", self.name));
            }
        }
        Ok(())
    }
}
