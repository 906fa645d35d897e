//! Redundant unknowns and their selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::elements::{BarEnd, Dof};
use crate::error::{AnalysisError, FlexResult};
use crate::mechanics::{restraints_are_stable, Restraint};

use super::frame::Frame;

/// The kind of generalized force chosen as an unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedundantKind {
    /// Horizontal support reaction
    ReactionX,
    /// Vertical support reaction
    ReactionY,
    /// Support reaction moment
    ReactionMoment,
    /// Bending moment at a bar end (virtual hinge)
    InternalMoment,
}

impl RedundantKind {
    /// True for the kinds that release a support DOF.
    pub fn is_reaction(self) -> bool {
        !matches!(self, RedundantKind::InternalMoment)
    }

    /// The support DOF a reaction kind releases.
    pub fn dof(self) -> Option<Dof> {
        match self {
            RedundantKind::ReactionX => Some(Dof::Ux),
            RedundantKind::ReactionY => Some(Dof::Uy),
            RedundantKind::ReactionMoment => Some(Dof::Rz),
            RedundantKind::InternalMoment => None,
        }
    }

    /// Heuristic priority: reaction moments first, then vertical, then
    /// horizontal reactions, internal moments last.
    fn priority(self) -> u8 {
        match self {
            RedundantKind::ReactionMoment => 0,
            RedundantKind::ReactionY => 1,
            RedundantKind::ReactionX => 2,
            RedundantKind::InternalMoment => 3,
        }
    }
}

/// A chosen redundant unknown Xᵢ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redundant {
    pub kind: RedundantKind,
    /// Node of the released support (reaction kinds) or the hinge node
    pub node: Option<u32>,
    /// Host bar (internal moments only)
    pub bar: Option<u32>,
    /// Release position on the host bar: 0 or L
    pub position: f64,
    /// Human-readable description
    pub description: String,
    /// 1-based index in the compatibility system
    pub index: usize,
}

impl Redundant {
    /// Horizontal reaction at a supported node.
    pub fn reaction_x(node: u32) -> Self {
        Self::reaction(RedundantKind::ReactionX, node)
    }

    /// Vertical reaction at a supported node.
    pub fn reaction_y(node: u32) -> Self {
        Self::reaction(RedundantKind::ReactionY, node)
    }

    /// Reaction moment at a supported node.
    pub fn reaction_moment(node: u32) -> Self {
        Self::reaction(RedundantKind::ReactionMoment, node)
    }

    fn reaction(kind: RedundantKind, node: u32) -> Self {
        let label = match kind {
            RedundantKind::ReactionX => "Rx",
            RedundantKind::ReactionY => "Ry",
            _ => "Mz",
        };
        Self {
            kind,
            node: Some(node),
            bar: None,
            position: 0.0,
            description: format!("{label} at node {node}"),
            index: 0,
        }
    }

    /// Internal bending moment released at a bar end.
    pub fn internal_moment(bar: u32, end: BarEnd, node: u32, position: f64) -> Self {
        let end_name = match end {
            BarEnd::I => "i",
            BarEnd::J => "j",
        };
        Self {
            kind: RedundantKind::InternalMoment,
            node: Some(node),
            bar: Some(bar),
            position,
            description: format!("internal M in bar {bar} at end {end_name} (x={position:.2} m)"),
            index: 0,
        }
    }

    /// Short name used in reports: X1, X2, ...
    pub fn short_name(&self) -> String {
        format!("X{}", self.index)
    }

    fn dedup_key(&self) -> (RedundantKind, Option<u32>, Option<u32>, i64) {
        (self.kind, self.node, self.bar, (self.position * 1e6) as i64)
    }
}

/// Selects the redundant unknowns, automatically or from a user list.
pub(crate) struct RedundantSelector<'a> {
    frame: &'a Frame,
}

impl<'a> RedundantSelector<'a> {
    pub fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    /// Automatic heuristic selection of `degree` stable redundants.
    pub fn select_automatic(&self, degree: usize) -> FlexResult<Vec<Redundant>> {
        let mut candidates = self.candidates();
        candidates.sort_by_key(|c| c.kind.priority());

        let total_restraints = self.frame.restraints().len();
        let mut selected: Vec<Redundant> = Vec::new();
        let mut used: HashSet<_> = HashSet::new();

        for candidate in candidates {
            if selected.len() >= degree {
                break;
            }
            if !used.insert(candidate.dedup_key()) {
                continue;
            }
            let mut tentative = selected.clone();
            tentative.push(candidate.clone());
            if self.creates_instability(&tentative, total_restraints) {
                used.remove(&candidate.dedup_key());
                continue;
            }
            selected = tentative;
        }

        if selected.len() < degree {
            return Err(AnalysisError::CannotSelectRedundants(format!(
                "found only {} stable redundants out of the {} required",
                selected.len(),
                degree
            )));
        }

        for (i, redundant) in selected.iter_mut().enumerate() {
            redundant.index = i + 1;
        }
        Ok(selected)
    }

    /// Validate a user-supplied selection and assign indices in the given
    /// order.
    pub fn validate_manual(
        &self,
        degree: usize,
        redundants: Vec<Redundant>,
    ) -> FlexResult<Vec<Redundant>> {
        if redundants.len() != degree {
            return Err(AnalysisError::CannotSelectRedundants(format!(
                "{} redundants supplied but the degree of indeterminacy is {}",
                redundants.len(),
                degree
            )));
        }

        let mut seen = HashSet::new();
        for redundant in &redundants {
            if !seen.insert(redundant.dedup_key()) {
                return Err(AnalysisError::CannotSelectRedundants(format!(
                    "duplicate redundant: {}",
                    redundant.description
                )));
            }
            match redundant.kind {
                kind if kind.is_reaction() => {
                    let node = redundant.node.ok_or_else(|| {
                        AnalysisError::CannotSelectRedundants(
                            "reaction redundant without a node".to_string(),
                        )
                    })?;
                    let support = self.frame.support(node).ok_or_else(|| {
                        AnalysisError::CannotSelectRedundants(format!(
                            "node {node} has no support"
                        ))
                    })?;
                    let dof = kind.dof().expect("reaction kind has a DOF");
                    if !support.restrains(dof) {
                        return Err(AnalysisError::CannotSelectRedundants(format!(
                            "support at node {node} does not restrain {dof:?}"
                        )));
                    }
                }
                _ => {
                    let bar_id = redundant.bar.ok_or_else(|| {
                        AnalysisError::CannotSelectRedundants(
                            "internal moment redundant without a bar".to_string(),
                        )
                    })?;
                    let bar = self.frame.bar(bar_id).ok_or_else(|| {
                        AnalysisError::CannotSelectRedundants(format!("bar {bar_id} does not exist"))
                    })?;
                    let at_i = redundant.position.abs() < 1e-9;
                    let at_j = (redundant.position - bar.length).abs() < 1e-9;
                    if !at_i && !at_j {
                        return Err(AnalysisError::CannotSelectRedundants(format!(
                            "internal moment on bar {bar_id} must release an end (x=0 or x=L)"
                        )));
                    }
                }
            }
        }

        let mut redundants = redundants;
        for (i, redundant) in redundants.iter_mut().enumerate() {
            redundant.index = i + 1;
        }
        Ok(redundants)
    }

    /// All selectable redundants: every effectively restrained support
    /// DOF (a rotational restraint cut off by hinges cannot carry a
    /// redundant) plus internal moments where at least two bars meet at
    /// an unsupported node.
    fn candidates(&self) -> Vec<Redundant> {
        let mut list = Vec::new();

        for node in &self.frame.nodes {
            for dof in self.frame.effective_restrained_dofs(node.id) {
                list.push(match dof {
                    Dof::Ux => Redundant::reaction_x(node.id),
                    Dof::Uy => Redundant::reaction_y(node.id),
                    Dof::Rz => Redundant::reaction_moment(node.id),
                });
            }
        }

        for node in &self.frame.nodes {
            if node.support.is_some() {
                continue;
            }
            let incident = self.frame.bars_at(node.id);
            if incident.len() < 2 {
                continue;
            }
            for bar in incident {
                let (end, position) = if bar.i_node == node.id {
                    (BarEnd::I, 0.0)
                } else {
                    (BarEnd::J, bar.length)
                };
                list.push(Redundant::internal_moment(bar.id, end, node.id, position));
            }
        }

        list
    }

    /// Stability filter: a tentative set is rejected when (i) fewer than
    /// three restraints would remain, (ii) it strips every restrained DOF
    /// of a single support, or (iii) the remaining restraints form a
    /// singular equilibrium arrangement.
    fn creates_instability(&self, redundants: &[Redundant], total_restraints: usize) -> bool {
        let released = redundants.iter().filter(|r| r.kind.is_reaction()).count();
        if total_restraints - released < 3 {
            return true;
        }

        for node in &self.frame.nodes {
            let effective = self.frame.effective_restrained_dofs(node.id).len();
            if effective == 0 {
                continue;
            }
            let released_here = redundants
                .iter()
                .filter(|r| r.kind.is_reaction() && r.node == Some(node.id))
                .count();
            if released_here >= effective {
                return true;
            }
        }

        let remaining = remaining_restraints(self.frame, redundants);
        !restraints_are_stable(&remaining)
    }
}

/// The effective support restraints that survive releasing the given
/// redundants, nodes in id order.
pub(crate) fn remaining_restraints(frame: &Frame, redundants: &[Redundant]) -> Vec<Restraint> {
    let mut list = Vec::new();
    for node in &frame.nodes {
        for dof in frame.effective_restrained_dofs(node.id) {
            let released = redundants.iter().any(|r| {
                r.kind.is_reaction() && r.node == Some(node.id) && r.kind.dof() == Some(dof)
            });
            if !released {
                list.push(Restraint {
                    node: node.id,
                    x: node.x,
                    y: node.y,
                    dof,
                });
            }
        }
    }
    list
}
