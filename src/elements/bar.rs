//! Bar - prismatic frame element joining two nodes.

use serde::{Deserialize, Serialize};

/// End of a bar, used to address internal hinges and redundant positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarEnd {
    I,
    J,
}

/// A straight prismatic bar between two nodes.
///
/// Nodes are referenced by id and material/section by name; the model
/// resolves them. An internal hinge flag at an end releases the bending
/// moment continuity there (translations stay coupled) and lowers the
/// degree of static indeterminacy by one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    /// Unique id
    pub id: u32,
    /// Id of the start node
    pub i_node: u32,
    /// Id of the end node
    pub j_node: u32,
    /// Material name
    pub material: String,
    /// Section name
    pub section: String,
    /// Internal hinge at the i end
    pub hinge_i: bool,
    /// Internal hinge at the j end
    pub hinge_j: bool,
}

impl Bar {
    /// Create a new bar without hinges.
    pub fn new(id: u32, i_node: u32, j_node: u32, material: &str, section: &str) -> Self {
        Self {
            id,
            i_node,
            j_node,
            material: material.to_string(),
            section: section.to_string(),
            hinge_i: false,
            hinge_j: false,
        }
    }

    /// Add an internal hinge at the i end.
    pub fn with_hinge_i(mut self) -> Self {
        self.hinge_i = true;
        self
    }

    /// Add an internal hinge at the j end.
    pub fn with_hinge_j(mut self) -> Self {
        self.hinge_j = true;
        self
    }

    /// Number of internal hinges on this bar.
    pub fn num_hinges(&self) -> usize {
        usize::from(self.hinge_i) + usize::from(self.hinge_j)
    }

    /// True if the bar touches the given node.
    pub fn touches(&self, node_id: u32) -> bool {
        self.i_node == node_id || self.j_node == node_id
    }

    /// The opposite end node of `node_id`, if the bar touches it.
    pub fn other_node(&self, node_id: u32) -> Option<u32> {
        if self.i_node == node_id {
            Some(self.j_node)
        } else if self.j_node == node_id {
            Some(self.i_node)
        } else {
            None
        }
    }

    /// Which end of the bar sits on `node_id`, if any.
    pub fn end_at(&self, node_id: u32) -> Option<BarEnd> {
        if self.i_node == node_id {
            Some(BarEnd::I)
        } else if self.j_node == node_id {
            Some(BarEnd::J)
        } else {
            None
        }
    }
}

/// Resolved geometric and stiffness properties of a bar, captured once per
/// analysis from the immutable model snapshot.
#[derive(Debug, Clone)]
pub struct BarProps {
    pub id: u32,
    pub i_node: u32,
    pub j_node: u32,
    /// Start coordinates
    pub xi: f64,
    pub yi: f64,
    /// Length in metres
    pub length: f64,
    /// Angle atan2(Δy, Δx) in radians
    pub angle: f64,
    /// Direction cosines
    pub cos: f64,
    pub sin: f64,
    /// Axial stiffness EA in kN
    pub ea: f64,
    /// Bending stiffness EI in kNm²
    pub ei: f64,
    /// Shear rigidity GA in kN
    pub ga: f64,
    /// Thermal expansion coefficient in 1/°C
    pub alpha: f64,
    /// Section depth in metres
    pub depth: f64,
    /// Internal hinge at the i end
    pub hinge_i: bool,
    /// Internal hinge at the j end
    pub hinge_j: bool,
}

impl BarProps {
    /// Global coordinates of the point a distance `x` from the i end.
    pub fn point_at(&self, x: f64) -> (f64, f64) {
        (self.xi + x * self.cos, self.yi + x * self.sin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_creation() {
        let bar = Bar::new(1, 10, 20, "Steel", "IPE 220");
        assert_eq!(bar.i_node, 10);
        assert_eq!(bar.j_node, 20);
        assert_eq!(bar.num_hinges(), 0);
    }

    #[test]
    fn test_hinges() {
        let bar = Bar::new(1, 1, 2, "m", "s").with_hinge_j();
        assert!(!bar.hinge_i);
        assert!(bar.hinge_j);
        assert_eq!(bar.num_hinges(), 1);
    }

    #[test]
    fn test_end_queries() {
        let bar = Bar::new(1, 1, 2, "m", "s");
        assert_eq!(bar.other_node(1), Some(2));
        assert_eq!(bar.other_node(3), None);
        assert_eq!(bar.end_at(2), Some(BarEnd::J));
    }
}
