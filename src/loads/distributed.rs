//! Distributed line loads on bars.

use serde::{Deserialize, Serialize};

/// A linearly varying line load over the stretch `[x1, x2]` of a bar.
///
/// Intensities are in kN/m; uniform when `q1 == q2`, triangular when one
/// of them is zero, trapezoidal otherwise. The angle follows the same
/// local-frame convention as [`super::BarPointLoad`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BarDistributedLoad {
    /// Target bar id
    pub bar: u32,
    /// Intensity at `x1` (kN/m)
    pub q1: f64,
    /// Start position from the i end (m)
    pub x1: f64,
    /// Intensity at `x2` (kN/m)
    pub q2: f64,
    /// End position from the i end (m)
    pub x2: f64,
    /// Local angle in degrees
    pub phi_deg: f64,
}

impl BarDistributedLoad {
    /// Create a new distributed load.
    pub fn new(bar: u32, q1: f64, x1: f64, q2: f64, x2: f64, phi_deg: f64) -> Self {
        Self {
            bar,
            q1,
            x1,
            q2,
            x2,
            phi_deg,
        }
    }

    /// Uniform perpendicular load over `[x1, x2]`.
    pub fn uniform(bar: u32, q: f64, x1: f64, x2: f64) -> Self {
        Self::new(bar, q, x1, q, x2, 90.0)
    }

    /// Triangular perpendicular load, zero at `x1`, `q_max` at `x2`.
    pub fn triangular(bar: u32, q_max: f64, x1: f64, x2: f64) -> Self {
        Self::new(bar, 0.0, x1, q_max, x2, 90.0)
    }

    /// True when the intensity is constant.
    pub fn is_uniform(&self) -> bool {
        (self.q1 - self.q2).abs() < 1e-12
    }

    /// Loaded length.
    pub fn span(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Intensity at position `x` (clamped to the loaded stretch).
    pub fn intensity_at(&self, x: f64) -> f64 {
        if self.span() <= 0.0 {
            return 0.0;
        }
        let t = ((x - self.x1) / self.span()).clamp(0.0, 1.0);
        self.q1 + t * (self.q2 - self.q1)
    }

    /// Total resultant magnitude over the loaded stretch.
    pub fn resultant(&self) -> f64 {
        (self.q1 + self.q2) / 2.0 * self.span()
    }

    /// Position of the resultant from the i end of the bar.
    pub fn resultant_position(&self) -> f64 {
        let len = self.span();
        if len <= 0.0 {
            return self.x1;
        }
        let total = self.q1 + self.q2;
        if total.abs() < 1e-12 {
            return self.x1 + len / 2.0;
        }
        // Trapezoid centroid measured from x1
        self.x1 + len * (self.q1 + 2.0 * self.q2) / (3.0 * total)
    }

    /// Global direction components (unit) given the bar angle in radians.
    pub fn global_direction(&self, bar_angle: f64) -> (f64, f64) {
        let dir = bar_angle + self.phi_deg.to_radians();
        (dir.cos(), dir.sin())
    }
}
