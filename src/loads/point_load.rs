//! Concentrated loads on bars.

use serde::{Deserialize, Serialize};

/// A concentrated force on a bar at local position `a` from the i end.
///
/// The angle is measured in the bar's local frame, in degrees: 0° acts
/// along the bar toward j, +90° along the clockwise perpendicular (which
/// is "downward" for a horizontal bar, Y being positive downward).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BarPointLoad {
    /// Target bar id
    pub bar: u32,
    /// Magnitude in kN
    pub p: f64,
    /// Position from the i end in metres, within [0, L]
    pub a: f64,
    /// Local angle in degrees
    pub phi_deg: f64,
}

impl BarPointLoad {
    /// Create a new bar point load.
    pub fn new(bar: u32, p: f64, a: f64, phi_deg: f64) -> Self {
        Self { bar, p, a, phi_deg }
    }

    /// Load perpendicular to the bar (φ = +90°).
    pub fn perpendicular(bar: u32, p: f64, a: f64) -> Self {
        Self::new(bar, p, a, 90.0)
    }

    /// Load along the bar toward j (φ = 0°).
    pub fn axial(bar: u32, p: f64, a: f64) -> Self {
        Self::new(bar, p, a, 0.0)
    }

    /// Global force components given the bar angle in radians.
    pub fn global_components(&self, bar_angle: f64) -> (f64, f64) {
        let dir = bar_angle + self.phi_deg.to_radians();
        (self.p * dir.cos(), self.p * dir.sin())
    }
}
