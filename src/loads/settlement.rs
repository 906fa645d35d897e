//! Prescribed support movements.

use serde::{Deserialize, Serialize};

/// A prescribed movement of a supported node: settlement, horizontal slip
/// or imposed rotation.
///
/// Components follow the global convention (Y positive downward, rotation
/// positive clockwise). Movements enter the compatibility equations: on
/// the right-hand side when the moved DOF is a redundant, through the
/// independent term otherwise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrescribedMovement {
    /// Target node id
    pub node: u32,
    /// Imposed horizontal displacement (m)
    pub dx: f64,
    /// Imposed vertical displacement (m, positive downward)
    pub dy: f64,
    /// Imposed rotation (rad, positive clockwise)
    pub dtheta: f64,
}

impl PrescribedMovement {
    /// Create a new prescribed movement.
    pub fn new(node: u32, dx: f64, dy: f64, dtheta: f64) -> Self {
        Self {
            node,
            dx,
            dy,
            dtheta,
        }
    }

    /// Vertical settlement only.
    pub fn settlement(node: u32, dy: f64) -> Self {
        Self::new(node, 0.0, dy, 0.0)
    }

    /// Components as a `[dx, dy, dtheta]` triple.
    pub fn as_array(&self) -> [f64; 3] {
        [self.dx, self.dy, self.dtheta]
    }
}
