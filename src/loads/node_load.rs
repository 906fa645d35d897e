//! Loads applied directly to nodes.

use serde::{Deserialize, Serialize};

/// A concentrated force/moment applied at a node, in global components.
///
/// Fy is positive downward and Mz positive clockwise (§ global convention).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NodalLoad {
    /// Target node id
    pub node: u32,
    /// Force in global X (kN)
    pub fx: f64,
    /// Force in global Y, positive downward (kN)
    pub fy: f64,
    /// Moment about Z, positive clockwise (kNm)
    pub mz: f64,
}

impl NodalLoad {
    /// Create a new nodal load.
    pub fn new(node: u32, fx: f64, fy: f64, mz: f64) -> Self {
        Self { node, fx, fy, mz }
    }

    /// Horizontal force only.
    pub fn fx(node: u32, value: f64) -> Self {
        Self::new(node, value, 0.0, 0.0)
    }

    /// Vertical force only (positive downward).
    pub fn fy(node: u32, value: f64) -> Self {
        Self::new(node, 0.0, value, 0.0)
    }

    /// Moment only (positive clockwise).
    pub fn mz(node: u32, value: f64) -> Self {
        Self::new(node, 0.0, 0.0, value)
    }
}
