//! Thermal actions on bars.

use serde::{Deserialize, Serialize};

/// A thermal action on a bar: a uniform temperature change plus a linear
/// gradient across the section depth.
///
/// Thermal loads carry no mechanical resultant; they enter the analysis
/// only through the virtual-work independent terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThermalLoad {
    /// Target bar id
    pub bar: u32,
    /// Uniform temperature change ΔT_u in °C
    pub delta_t_uniform: f64,
    /// Linear gradient ΔT_∇ across the depth, in °C
    pub delta_t_gradient: f64,
}

impl ThermalLoad {
    /// Create a new thermal load.
    pub fn new(bar: u32, delta_t_uniform: f64, delta_t_gradient: f64) -> Self {
        Self {
            bar,
            delta_t_uniform,
            delta_t_gradient,
        }
    }

    /// Uniform heating/cooling only.
    pub fn uniform(bar: u32, delta_t: f64) -> Self {
        Self::new(bar, delta_t, 0.0)
    }

    /// Free axial elongation α·ΔT_u·L of an unrestrained bar.
    pub fn free_elongation(&self, alpha: f64, length: f64) -> f64 {
        alpha * self.delta_t_uniform * length
    }

    /// Thermal curvature κ = α·ΔT_∇ / h of an unrestrained bar.
    pub fn curvature(&self, alpha: f64, depth: f64) -> f64 {
        alpha * self.delta_t_gradient / depth
    }
}
