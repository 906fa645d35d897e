//! Immutable analysis snapshot of a model.
//!
//! Resolving ids and names once up front keeps the pipeline free of
//! lookups into the mutable model and guarantees the whole run sees one
//! consistent structure.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::consts::LENGTH_TOLERANCE;
use crate::elements::{BarProps, Dof, Support};
use crate::error::{AnalysisError, FlexResult};
use crate::loads::{BarDistributedLoad, BarPointLoad, Load, NodalLoad, PrescribedMovement, ThermalLoad};
use crate::mechanics::{MomentCondition, PointAction, Reactions, Restraint, SectionSeed};
use crate::model::Model;

/// A node as the pipeline sees it.
#[derive(Debug, Clone)]
pub(crate) struct FrameNode {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub support: Option<Support>,
}

/// An internal hinge resolved to its host bar and the node it sits on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameHinge {
    pub bar: u32,
    pub node: u32,
}

/// Resolved, immutable snapshot of the structure under analysis.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    /// Nodes sorted by id
    pub nodes: Vec<FrameNode>,
    /// Bars sorted by id, with resolved geometry and stiffness
    pub bars: Vec<BarProps>,
    pub nodal_loads: Vec<NodalLoad>,
    pub point_loads: Vec<BarPointLoad>,
    pub dist_loads: Vec<BarDistributedLoad>,
    pub thermal_loads: Vec<ThermalLoad>,
    pub movements: Vec<PrescribedMovement>,
    /// Hinges that still act as moment releases inside the structure
    pub hinges: Vec<FrameHinge>,
    /// Supported nodes whose rotational restraint is cut off by hinges on
    /// every incident bar end (the Rz reaction has no load path there)
    pub hinge_released_rz: HashSet<u32>,
    /// node id → incident (bar id, far node id)
    adjacency: HashMap<u32, Vec<(u32, u32)>>,
}

impl Frame {
    /// Build the snapshot, resolving geometry and checking load positions.
    pub fn from_model(model: &Model) -> FlexResult<Self> {
        let mut nodes: Vec<FrameNode> = model
            .nodes
            .values()
            .map(|n| FrameNode {
                id: n.id,
                x: n.x,
                y: n.y,
                support: n.support,
            })
            .collect();
        nodes.sort_by_key(|n| n.id);

        let mut bars = Vec::with_capacity(model.bars.len());
        let mut bar_ids: Vec<u32> = model.bars.keys().copied().collect();
        bar_ids.sort_unstable();
        for id in bar_ids {
            let bar = &model.bars[&id];
            let i = model
                .node(bar.i_node)
                .ok_or(AnalysisError::NodeNotFound(bar.i_node))?;
            let j = model
                .node(bar.j_node)
                .ok_or(AnalysisError::NodeNotFound(bar.j_node))?;
            let material = model
                .materials
                .get(&bar.material)
                .ok_or_else(|| AnalysisError::MaterialNotFound(bar.material.clone()))?;
            let section = model
                .sections
                .get(&bar.section)
                .ok_or_else(|| AnalysisError::SectionNotFound(bar.section.clone()))?;

            let length = i.distance_to(j);
            if length < LENGTH_TOLERANCE {
                return Err(AnalysisError::ModelInvalid(format!(
                    "bar {} has zero length",
                    bar.id
                )));
            }
            let angle = (j.y - i.y).atan2(j.x - i.x);
            bars.push(BarProps {
                id: bar.id,
                i_node: bar.i_node,
                j_node: bar.j_node,
                xi: i.x,
                yi: i.y,
                length,
                angle,
                cos: angle.cos(),
                sin: angle.sin(),
                ea: material.e * section.a(),
                ei: material.e * section.iz(),
                ga: material.g() * section.a(),
                alpha: material.alpha,
                depth: section.depth(),
                hinge_i: bar.hinge_i,
                hinge_j: bar.hinge_j,
            });
        }

        let mut adjacency: HashMap<u32, Vec<(u32, u32)>> = HashMap::new();
        for bar in &bars {
            adjacency
                .entry(bar.i_node)
                .or_default()
                .push((bar.id, bar.j_node));
            adjacency
                .entry(bar.j_node)
                .or_default()
                .push((bar.id, bar.i_node));
        }

        let mut hinges: Vec<FrameHinge> = Vec::new();
        for bar in &bars {
            if bar.hinge_i {
                hinges.push(FrameHinge {
                    bar: bar.id,
                    node: bar.i_node,
                });
            }
            if bar.hinge_j {
                hinges.push(FrameHinge {
                    bar: bar.id,
                    node: bar.j_node,
                });
            }
        }

        // A supported rotational restraint whose every incident bar end is
        // hinged can never develop a moment reaction: drop the restraint
        // and let one of the hinges stand for that release.
        let mut hinge_released_rz: HashSet<u32> = HashSet::new();
        for node in &nodes {
            let restrains_rz = node
                .support
                .as_ref()
                .map_or(false, |s| s.restrains(Dof::Rz));
            if !restrains_rz {
                continue;
            }
            let incident: Vec<&BarProps> = bars
                .iter()
                .filter(|b| b.i_node == node.id || b.j_node == node.id)
                .collect();
            let all_hinged = !incident.is_empty()
                && incident.iter().all(|b| {
                    (b.i_node == node.id && b.hinge_i) || (b.j_node == node.id && b.hinge_j)
                });
            if all_hinged {
                hinge_released_rz.insert(node.id);
                if let Some(pos) = hinges.iter().position(|h| h.node == node.id) {
                    hinges.remove(pos);
                }
            }
        }

        let mut frame = Self {
            nodes,
            bars,
            nodal_loads: Vec::new(),
            point_loads: Vec::new(),
            dist_loads: Vec::new(),
            thermal_loads: Vec::new(),
            movements: Vec::new(),
            hinges,
            hinge_released_rz,
            adjacency,
        };

        for load in &model.loads {
            match load {
                Load::Nodal(l) => frame.nodal_loads.push(*l),
                Load::BarPoint(l) => {
                    let length = frame
                        .bar(l.bar)
                        .ok_or(AnalysisError::BarNotFound(l.bar))?
                        .length;
                    if l.a < -LENGTH_TOLERANCE || l.a > length + LENGTH_TOLERANCE {
                        return Err(AnalysisError::ModelInvalid(format!(
                            "point load position {} outside bar {} of length {}",
                            l.a, l.bar, length
                        )));
                    }
                    frame.point_loads.push(*l);
                }
                Load::BarDistributed(l) => {
                    let length = frame
                        .bar(l.bar)
                        .ok_or(AnalysisError::BarNotFound(l.bar))?
                        .length;
                    if l.x1 < -LENGTH_TOLERANCE
                        || l.x2 > length + LENGTH_TOLERANCE
                        || l.x1 >= l.x2
                    {
                        return Err(AnalysisError::ModelInvalid(format!(
                            "distributed load stretch [{}, {}] invalid on bar {} of length {}",
                            l.x1, l.x2, l.bar, length
                        )));
                    }
                    frame.dist_loads.push(*l);
                }
                Load::Thermal(l) => {
                    if frame.bar(l.bar).is_none() {
                        return Err(AnalysisError::BarNotFound(l.bar));
                    }
                    frame.thermal_loads.push(*l);
                }
                Load::Movement(l) => {
                    if frame.node(l.node).is_none() {
                        return Err(AnalysisError::NodeNotFound(l.node));
                    }
                    frame.movements.push(*l);
                }
            }
        }

        Ok(frame)
    }

    pub fn node(&self, id: u32) -> Option<&FrameNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn bar(&self, id: u32) -> Option<&BarProps> {
        self.bars.iter().find(|b| b.id == id)
    }

    pub fn support(&self, node_id: u32) -> Option<&Support> {
        self.node(node_id).and_then(|n| n.support.as_ref())
    }

    /// Bars incident to a node, in id order.
    pub fn bars_at(&self, node_id: u32) -> Vec<&BarProps> {
        self.bars
            .iter()
            .filter(|b| b.i_node == node_id || b.j_node == node_id)
            .collect()
    }

    /// Restrained DOFs a support can actually mobilize: the nominal set,
    /// minus a rotational restraint cut off by hinges on every incident
    /// bar end.
    pub fn effective_restrained_dofs(&self, node_id: u32) -> Vec<Dof> {
        let Some(support) = self.support(node_id) else {
            return Vec::new();
        };
        support
            .restrained_dofs()
            .into_iter()
            .filter(|dof| !(*dof == Dof::Rz && self.hinge_released_rz.contains(&node_id)))
            .collect()
    }

    /// Effective restraint list of the model's supports, nodes in id
    /// order and DOFs in Ux, Uy, Rz order.
    pub fn restraints(&self) -> Vec<Restraint> {
        let mut list = Vec::new();
        for node in &self.nodes {
            for dof in self.effective_restrained_dofs(node.id) {
                list.push(Restraint {
                    node: node.id,
                    x: node.x,
                    y: node.y,
                    dof,
                });
            }
        }
        list
    }

    /// Every mechanical load reduced to a point action at its true global
    /// application point.
    pub fn mechanical_actions(&self) -> Vec<PointAction> {
        let mut actions = Vec::new();
        for l in &self.nodal_loads {
            if let Some(node) = self.node(l.node) {
                actions.push(PointAction {
                    x: node.x,
                    y: node.y,
                    fx: l.fx,
                    fy: l.fy,
                    mz: l.mz,
                });
            }
        }
        for l in &self.point_loads {
            if let Some(bar) = self.bar(l.bar) {
                let (x, y) = bar.point_at(l.a);
                let (fx, fy) = l.global_components(bar.angle);
                actions.push(PointAction::force(x, y, fx, fy));
            }
        }
        for l in &self.dist_loads {
            if let Some(bar) = self.bar(l.bar) {
                let (x, y) = bar.point_at(l.resultant_position());
                let r = l.resultant();
                let (dx, dy) = l.global_direction(bar.angle);
                actions.push(PointAction::force(x, y, r * dx, r * dy));
            }
        }
        actions
    }

    /// Point loads acting on one bar.
    pub fn point_loads_on(&self, bar_id: u32) -> Vec<BarPointLoad> {
        self.point_loads
            .iter()
            .filter(|l| l.bar == bar_id)
            .copied()
            .collect()
    }

    /// Distributed loads acting on one bar.
    pub fn dist_loads_on(&self, bar_id: u32) -> Vec<BarDistributedLoad> {
        self.dist_loads
            .iter()
            .filter(|l| l.bar == bar_id)
            .copied()
            .collect()
    }

    /// Free body on the i side of a bar: the connected component reached
    /// from the i node with the bar removed. Returns the reduced seed for
    /// the section method, or `None` when the bar closes a loop.
    ///
    /// `node_actions` carries node-attributed external actions (nodal
    /// loads, unit redundant actions); `reactions` the solved support
    /// reactions of the substructure. `include_bar_loads` folds in the
    /// real loads on the component's bars; unit substructures carry only
    /// the unit action and pass false.
    pub fn i_side_seed(
        &self,
        bar_id: u32,
        node_actions: &[(u32, PointAction)],
        reactions: &Reactions,
        include_bar_loads: bool,
    ) -> Option<SectionSeed> {
        let bar = self.bar(bar_id)?;

        let component = self.component_excluding(bar_id, bar.i_node);
        if component.contains(&bar.j_node) {
            return None;
        }

        let mut actions: Vec<PointAction> = Vec::new();
        for &node_id in &component {
            let node = self.node(node_id)?;
            if let Some(r) = reactions.get(&node_id) {
                actions.push(PointAction {
                    x: node.x,
                    y: node.y,
                    fx: r[0],
                    fy: r[1],
                    mz: r[2],
                });
            }
            for (target, action) in node_actions {
                if *target == node_id {
                    actions.push(*action);
                }
            }
        }
        for other in &self.bars {
            if !include_bar_loads
                || other.id == bar_id
                || !component.contains(&other.i_node)
                || !component.contains(&other.j_node)
            {
                continue;
            }
            for l in self.point_loads_on(other.id) {
                let (x, y) = other.point_at(l.a);
                let (fx, fy) = l.global_components(other.angle);
                actions.push(PointAction::force(x, y, fx, fy));
            }
            for l in self.dist_loads_on(other.id) {
                let (x, y) = other.point_at(l.resultant_position());
                let r = l.resultant();
                let (dx, dy) = l.global_direction(other.angle);
                actions.push(PointAction::force(x, y, r * dx, r * dy));
            }
        }

        let mut seed = SectionSeed::default();
        for action in &actions {
            seed.fx += action.fx;
            seed.fy += action.fy;
            seed.m += action.moment_at(bar.xi, bar.yi);
        }
        Some(seed)
    }

    /// One moment condition per acting hinge: the free body reached from
    /// the hinge node with the host bar removed must have zero moment
    /// about the hinge point. Hinges sitting on a loop are skipped (the
    /// section method already degrades there).
    pub fn moment_conditions(
        &self,
        node_actions: &[(u32, PointAction)],
        include_bar_loads: bool,
    ) -> Vec<MomentCondition> {
        let mut conditions = Vec::new();
        for hinge in &self.hinges {
            let Some(bar) = self.bar(hinge.bar) else {
                continue;
            };
            let far = if bar.i_node == hinge.node {
                bar.j_node
            } else {
                bar.i_node
            };
            let Some(here) = self.node(hinge.node) else {
                continue;
            };
            let side = self.component_excluding(hinge.bar, hinge.node);
            if side.contains(&far) {
                continue;
            }

            let mut load_moment = 0.0;
            for (target, action) in node_actions {
                if side.contains(target) {
                    load_moment += action.moment_at(here.x, here.y);
                }
            }
            if include_bar_loads {
                for other in &self.bars {
                    if other.id == hinge.bar
                        || !side.contains(&other.i_node)
                        || !side.contains(&other.j_node)
                    {
                        continue;
                    }
                    for l in self.point_loads_on(other.id) {
                        let (x, y) = other.point_at(l.a);
                        let (fx, fy) = l.global_components(other.angle);
                        load_moment += PointAction::force(x, y, fx, fy).moment_at(here.x, here.y);
                    }
                    for l in self.dist_loads_on(other.id) {
                        let (x, y) = other.point_at(l.resultant_position());
                        let r = l.resultant();
                        let (dx, dy) = l.global_direction(other.angle);
                        load_moment +=
                            PointAction::force(x, y, r * dx, r * dy).moment_at(here.x, here.y);
                    }
                }
            }

            conditions.push(MomentCondition {
                x: here.x,
                y: here.y,
                nodes: side,
                load_moment,
            });
        }
        conditions
    }

    /// Connected component reached from `start` with `bar_id` removed.
    fn component_excluding(&self, bar_id: u32, start: u32) -> HashSet<u32> {
        let mut component: HashSet<u32> = HashSet::new();
        let mut queue = VecDeque::new();
        component.insert(start);
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if let Some(edges) = self.adjacency.get(&current) {
                for &(edge_bar, far) in edges {
                    if edge_bar == bar_id {
                        continue;
                    }
                    if component.insert(far) {
                        queue.push_back(far);
                    }
                }
            }
        }
        component
    }
}
