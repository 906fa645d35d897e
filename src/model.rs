//! Structural model - the container every analysis snapshots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consts::LENGTH_TOLERANCE;
use crate::elements::{Bar, BarEnd, Material, Node, Section, Support};
use crate::error::{AnalysisError, FlexResult};
use crate::loads::{Load, PrescribedMovement, ThermalLoad};

/// The planar frame model: nodes, bars, materials, sections and loads.
///
/// The model is built incrementally by an editor and sealed conceptually
/// when handed to [`crate::analysis::analyze`]; the pipeline never mutates
/// it. Serde derives across the aggregate define the persisted textual
/// shape, which external serializers round-trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    /// Project name
    pub name: String,
    /// Nodes by id
    pub nodes: HashMap<u32, Node>,
    /// Bars by id
    pub bars: HashMap<u32, Bar>,
    /// Materials by name
    pub materials: HashMap<String, Material>,
    /// Sections by name
    pub sections: HashMap<String, Section>,
    /// All applied loads
    pub loads: Vec<Load>,
}

impl Model {
    /// Create an empty model.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    // ========================
    // Building methods
    // ========================

    /// Add a material. Duplicate names are rejected.
    pub fn add_material(&mut self, material: Material) -> FlexResult<()> {
        if self.materials.contains_key(&material.name) {
            return Err(AnalysisError::DuplicateName(material.name.clone()));
        }
        self.materials.insert(material.name.clone(), material);
        Ok(())
    }

    /// Add a section. Duplicate names are rejected.
    pub fn add_section(&mut self, section: Section) -> FlexResult<()> {
        if self.sections.contains_key(section.name()) {
            return Err(AnalysisError::DuplicateName(section.name().to_string()));
        }
        self.sections.insert(section.name().to_string(), section);
        Ok(())
    }

    /// Add a node. Rejects duplicate ids and positions coinciding with an
    /// existing node within the length tolerance.
    pub fn add_node(&mut self, node: Node) -> FlexResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(AnalysisError::DuplicateId(node.id));
        }
        if let Some(existing) = self.node_at(node.x, node.y, LENGTH_TOLERANCE) {
            return Err(AnalysisError::ModelInvalid(format!(
                "node {} coincides with node {}",
                node.id, existing
            )));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    /// Remove a node, along with every bar and load referencing it.
    pub fn remove_node(&mut self, id: u32) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        let orphaned: Vec<u32> = self
            .bars
            .values()
            .filter(|b| b.touches(id))
            .map(|b| b.id)
            .collect();
        for bar_id in orphaned {
            self.remove_bar(bar_id);
        }
        self.loads.retain(|l| l.node_id() != Some(id));
        true
    }

    /// Add a bar. Both nodes must exist and differ, material and section
    /// must exist, and no other bar may join the same endpoint pair.
    pub fn add_bar(&mut self, bar: Bar) -> FlexResult<()> {
        if self.bars.contains_key(&bar.id) {
            return Err(AnalysisError::DuplicateId(bar.id));
        }
        if !self.nodes.contains_key(&bar.i_node) {
            return Err(AnalysisError::NodeNotFound(bar.i_node));
        }
        if !self.nodes.contains_key(&bar.j_node) {
            return Err(AnalysisError::NodeNotFound(bar.j_node));
        }
        if bar.i_node == bar.j_node {
            return Err(AnalysisError::ModelInvalid(format!(
                "bar {} joins node {} to itself",
                bar.id, bar.i_node
            )));
        }
        if !self.materials.contains_key(&bar.material) {
            return Err(AnalysisError::MaterialNotFound(bar.material.clone()));
        }
        if !self.sections.contains_key(&bar.section) {
            return Err(AnalysisError::SectionNotFound(bar.section.clone()));
        }
        let duplicate = self.bars.values().any(|b| {
            (b.i_node == bar.i_node && b.j_node == bar.j_node)
                || (b.i_node == bar.j_node && b.j_node == bar.i_node)
        });
        if duplicate {
            return Err(AnalysisError::ModelInvalid(format!(
                "a bar already joins nodes {} and {}",
                bar.i_node, bar.j_node
            )));
        }
        self.bars.insert(bar.id, bar);
        Ok(())
    }

    /// Remove a bar and the loads attached to it.
    pub fn remove_bar(&mut self, id: u32) -> bool {
        if self.bars.remove(&id).is_none() {
            return false;
        }
        self.loads.retain(|l| l.bar_id() != Some(id));
        true
    }

    /// Set (or replace) the support on a node.
    pub fn set_support(&mut self, node_id: u32, support: Support) -> FlexResult<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(AnalysisError::NodeNotFound(node_id))?;
        node.support = Some(support);
        Ok(())
    }

    /// Clear the support on a node, returning the previous one.
    pub fn clear_support(&mut self, node_id: u32) -> Option<Support> {
        self.nodes.get_mut(&node_id).and_then(|n| n.support.take())
    }

    /// Add a load. Referenced nodes and bars must exist.
    pub fn add_load(&mut self, load: impl Into<Load>) -> FlexResult<()> {
        let load = load.into();
        if let Some(node) = load.node_id() {
            if !self.nodes.contains_key(&node) {
                return Err(AnalysisError::NodeNotFound(node));
            }
        }
        if let Some(bar) = load.bar_id() {
            if !self.bars.contains_key(&bar) {
                return Err(AnalysisError::BarNotFound(bar));
            }
        }
        self.loads.push(load);
        Ok(())
    }

    /// Remove the load at `index`.
    pub fn remove_load(&mut self, index: usize) -> Option<Load> {
        (index < self.loads.len()).then(|| self.loads.remove(index))
    }

    /// Drop every load.
    pub fn clear_loads(&mut self) {
        self.loads.clear();
    }

    /// Toggle the internal hinge flag at one end of a bar.
    pub fn set_hinge(&mut self, bar_id: u32, end: BarEnd, hinged: bool) -> FlexResult<()> {
        let bar = self
            .bars
            .get_mut(&bar_id)
            .ok_or(AnalysisError::BarNotFound(bar_id))?;
        match end {
            BarEnd::I => bar.hinge_i = hinged,
            BarEnd::J => bar.hinge_j = hinged,
        }
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    /// Look up a node.
    pub fn node(&self, id: u32) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a bar.
    pub fn bar(&self, id: u32) -> Option<&Bar> {
        self.bars.get(&id)
    }

    /// Find the node at a position, within `tol`.
    pub fn node_at(&self, x: f64, y: f64, tol: f64) -> Option<u32> {
        self.nodes
            .values()
            .find(|n| (n.x - x).hypot(n.y - y) < tol)
            .map(|n| n.id)
    }

    /// Bars incident to a node, sorted by id.
    pub fn bars_at_node(&self, node_id: u32) -> Vec<&Bar> {
        let mut bars: Vec<&Bar> = self.bars.values().filter(|b| b.touches(node_id)).collect();
        bars.sort_by_key(|b| b.id);
        bars
    }

    /// Resolved length of a bar.
    pub fn bar_length(&self, bar_id: u32) -> FlexResult<f64> {
        let bar = self.bar(bar_id).ok_or(AnalysisError::BarNotFound(bar_id))?;
        let i = self
            .node(bar.i_node)
            .ok_or(AnalysisError::NodeNotFound(bar.i_node))?;
        let j = self
            .node(bar.j_node)
            .ok_or(AnalysisError::NodeNotFound(bar.j_node))?;
        Ok(i.distance_to(j))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_bars(&self) -> usize {
        self.bars.len()
    }

    pub fn num_loads(&self) -> usize {
        self.loads.len()
    }

    /// Total restrained DOFs across all supports.
    pub fn num_reactions(&self) -> usize {
        self.nodes.values().map(|n| n.num_reactions()).sum()
    }

    /// Total internal hinges across all bars.
    pub fn num_hinges(&self) -> usize {
        self.bars.values().map(|b| b.num_hinges()).sum()
    }

    /// Thermal loads in insertion order.
    pub fn thermal_loads(&self) -> Vec<ThermalLoad> {
        self.loads
            .iter()
            .filter_map(|l| match l {
                Load::Thermal(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Prescribed movements in insertion order.
    pub fn prescribed_movements(&self) -> Vec<PrescribedMovement> {
        self.loads
            .iter()
            .filter_map(|l| match l {
                Load::Movement(m) => Some(*m),
                _ => None,
            })
            .collect()
    }

    /// Axis-aligned bounding box `(x_min, y_min, x_max, y_max)`.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let mut it = self.nodes.values();
        let first = it.next()?;
        let mut bb = (first.x, first.y, first.x, first.y);
        for n in it {
            bb.0 = bb.0.min(n.x);
            bb.1 = bb.1.min(n.y);
            bb.2 = bb.2.max(n.x);
            bb.3 = bb.3.max(n.y);
        }
        Some(bb)
    }

    /// Degree of static indeterminacy `GH = r + 3b − 3n − h`.
    pub fn degree_of_indeterminacy(&self) -> i32 {
        let r = self.num_reactions() as i32;
        let b = self.num_bars() as i32;
        let n = self.num_nodes() as i32;
        let h = self.num_hinges() as i32;
        r + 3 * b - 3 * n - h
    }

    /// GH < 0: the structure is a mechanism.
    pub fn is_unstable(&self) -> bool {
        self.degree_of_indeterminacy() < 0
    }

    /// GH = 0: solvable by equilibrium alone.
    pub fn is_isostatic(&self) -> bool {
        self.degree_of_indeterminacy() == 0
    }

    /// GH > 0: requires the force method.
    pub fn is_indeterminate(&self) -> bool {
        self.degree_of_indeterminacy() > 0
    }

    // ========================
    // Validation
    // ========================

    /// Run every validation gate and return the violations found.
    ///
    /// An empty list means the model is ready for analysis.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.num_nodes() < 2 {
            problems.push("model needs at least 2 nodes".to_string());
        }
        if self.num_bars() < 1 {
            problems.push("model needs at least 1 bar".to_string());
        }
        if self.num_reactions() == 0 {
            problems.push("model has no external supports".to_string());
        }

        for material in self.materials.values() {
            if let Err(msg) = material.validate() {
                problems.push(msg);
            }
        }
        for section in self.sections.values() {
            if let Err(msg) = section.validate() {
                problems.push(msg);
            }
        }
        for node in self.nodes.values() {
            if let Some(support) = &node.support {
                if let Err(msg) = support.validate() {
                    problems.push(format!("node {}: {}", node.id, msg));
                }
            }
        }

        let mut ids: Vec<u32> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        for (k, &a) in ids.iter().enumerate() {
            for &b in &ids[k + 1..] {
                let na = &self.nodes[&a];
                let nb = &self.nodes[&b];
                if na.distance_to(nb) < LENGTH_TOLERANCE {
                    problems.push(format!("nodes {a} and {b} share the same position"));
                }
            }
        }

        for bar in self.bars.values() {
            if bar.i_node == bar.j_node {
                problems.push(format!("bar {} joins node {} to itself", bar.id, bar.i_node));
            }
            match self.bar_length(bar.id) {
                Ok(length) if length < LENGTH_TOLERANCE => {
                    problems.push(format!("bar {} has zero length", bar.id));
                }
                Err(e) => problems.push(format!("bar {}: {}", bar.id, e)),
                _ => {}
            }
            if !self.materials.contains_key(&bar.material) {
                problems.push(format!("bar {}: unknown material '{}'", bar.id, bar.material));
            }
            if !self.sections.contains_key(&bar.section) {
                problems.push(format!("bar {}: unknown section '{}'", bar.id, bar.section));
            }
        }

        let mut bar_ids: Vec<u32> = self.bars.keys().copied().collect();
        bar_ids.sort_unstable();
        for (k, &a) in bar_ids.iter().enumerate() {
            for &b in &bar_ids[k + 1..] {
                let ba = &self.bars[&a];
                let bb = &self.bars[&b];
                let same_pair = (ba.i_node == bb.i_node && ba.j_node == bb.j_node)
                    || (ba.i_node == bb.j_node && ba.j_node == bb.i_node);
                if same_pair {
                    problems.push(format!("bars {a} and {b} join the same node pair"));
                }
            }
        }

        problems
    }

    /// True when every validation gate passes.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loads::NodalLoad;

    fn base_model() -> Model {
        let mut model = Model::new("test");
        model.add_material(Material::steel()).unwrap();
        model.add_section(Section::ipe_220()).unwrap();
        model.add_node(Node::new(1, 0.0, 0.0)).unwrap();
        model.add_node(Node::new(2, 6.0, 0.0)).unwrap();
        model
            .add_bar(Bar::new(1, 1, 2, "Steel A-36", "IPE 220"))
            .unwrap();
        model
    }

    #[test]
    fn test_validation_gates() {
        let mut model = base_model();
        // No support yet
        assert!(!model.is_valid());
        model.set_support(1, Support::fixed()).unwrap();
        assert!(model.is_valid());
    }

    #[test]
    fn test_duplicate_bar_rejected() {
        let mut model = base_model();
        assert!(model.add_bar(Bar::new(2, 2, 1, "Steel A-36", "IPE 220")).is_err());
    }

    #[test]
    fn test_coincident_nodes_rejected() {
        let mut model = base_model();
        assert!(model.add_node(Node::new(3, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_indeterminacy_degree() {
        let mut model = base_model();
        model.set_support(1, Support::fixed()).unwrap();
        model.set_support(2, Support::roller_y()).unwrap();
        // r=4, b=1, n=2: GH = 4 + 3 - 6 = 1
        assert_eq!(model.degree_of_indeterminacy(), 1);
        assert!(model.is_indeterminate());

        model.set_hinge(1, BarEnd::J, true).unwrap();
        assert_eq!(model.degree_of_indeterminacy(), 0);
        assert!(model.is_isostatic());
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut model = base_model();
        model.add_load(NodalLoad::fy(2, 10.0)).unwrap();
        assert_eq!(model.num_loads(), 1);
        model.remove_node(2);
        assert_eq!(model.num_bars(), 0);
        assert_eq!(model.num_loads(), 0);
    }

    #[test]
    fn test_bounding_box() {
        let model = base_model();
        assert_eq!(model.bounding_box(), Some((0.0, 0.0, 6.0, 0.0)));
    }
}
