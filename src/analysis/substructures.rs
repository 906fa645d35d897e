//! Primary and unit substructures of the released structure.

use log::debug;

use crate::elements::Dof;
use crate::error::FlexResult;
use crate::mechanics::{
    build_section_diagram, solve_isostatic_reactions, Diagram, DiagramSet, PointAction, Reactions,
};

use super::frame::Frame;
use super::redundants::{remaining_restraints, Redundant, RedundantKind};

/// One loading state of the released structure: the primary under the real
/// loads, or a unit substructure under Xᵢ = 1.
#[derive(Debug, Clone)]
pub struct Substructure {
    /// Identifier: "Primary" or "X1", "X2", ...
    pub name: String,
    /// The redundant this substructure belongs to (None for the primary)
    pub redundant: Option<Redundant>,
    /// Internal-force diagrams per bar; absent bars carry zero
    pub diagrams: DiagramSet,
    /// Support reactions per node as (Rx, Ry, Mz).
    ///
    /// For a unit substructure the released DOF itself carries a unit
    /// entry, so superposing `R⁰ + Σ Xᵢ·Rⁱ` reproduces the redundant as
    /// the final reaction there.
    pub reactions: Reactions,
}

impl Substructure {
    /// Bending moment of bar `bar_id` at `x`; zero when the substructure
    /// leaves the bar unloaded.
    pub fn m(&self, bar_id: u32, x: f64) -> f64 {
        self.diagrams.get(&bar_id).map_or(0.0, |d| d.m(x))
    }

    /// Shear force at `x`.
    pub fn v(&self, bar_id: u32, x: f64) -> f64 {
        self.diagrams.get(&bar_id).map_or(0.0, |d| d.v(x))
    }

    /// Axial force at `x`.
    pub fn n(&self, bar_id: u32, x: f64) -> f64 {
        self.diagrams.get(&bar_id).map_or(0.0, |d| d.n(x))
    }

    /// Diagram of one bar, when present.
    pub fn diagram(&self, bar_id: u32) -> Option<&Diagram> {
        self.diagrams.get(&bar_id)
    }

    /// Reactions at a node.
    pub fn reaction(&self, node_id: u32) -> [f64; 3] {
        self.reactions.get(&node_id).copied().unwrap_or([0.0; 3])
    }
}

/// Builds the primary substructure and one unit substructure per
/// redundant by solving the released structure.
pub(crate) struct SubstructureGenerator<'a> {
    frame: &'a Frame,
    redundants: &'a [Redundant],
}

impl<'a> SubstructureGenerator<'a> {
    pub fn new(frame: &'a Frame, redundants: &'a [Redundant]) -> Self {
        Self { frame, redundants }
    }

    /// Generate the primary and every unit substructure. Warnings record
    /// degraded paths; only frame-level inconsistencies are errors.
    pub fn generate(&self) -> FlexResult<(Substructure, Vec<Substructure>, Vec<String>)> {
        let mut warnings = Vec::new();
        let restraints = remaining_restraints(self.frame, self.redundants);

        for node in &self.frame.nodes {
            let remaining: Vec<Dof> = restraints
                .iter()
                .filter(|r| r.node == node.id)
                .map(|r| r.dof)
                .collect();
            if remaining == [Dof::Rz] {
                warnings.push(format!(
                    "released support at node {} retains only the rotation; \
                     handled as a generalized restraint pattern",
                    node.id
                ));
            }
        }

        let primary = self.primary(&restraints, &mut warnings);
        let units = self
            .redundants
            .iter()
            .map(|redundant| self.unit(redundant, &restraints, &mut warnings))
            .collect();

        Ok((primary, units, warnings))
    }

    fn primary(
        &self,
        restraints: &[crate::mechanics::Restraint],
        warnings: &mut Vec<String>,
    ) -> Substructure {
        let actions = self.frame.mechanical_actions();
        let node_actions = self.nodal_load_actions();
        let conditions = self.frame.moment_conditions(&node_actions, true);
        let reactions = match solve_isostatic_reactions(restraints, &actions, &conditions) {
            Ok((r, solve_warnings)) => {
                warnings.extend(solve_warnings);
                r
            }
            Err(e) => {
                warnings.push(format!(
                    "primary structure is not strictly isostatic ({e}); \
                     falling back to null reactions"
                ));
                Reactions::new()
            }
        };

        let diagrams = self.section_diagrams("primary", true, &node_actions, &reactions, warnings);

        debug!("primary substructure solved: {} reactions", reactions.len());
        Substructure {
            name: "Primary".to_string(),
            redundant: None,
            diagrams,
            reactions,
        }
    }

    fn unit(
        &self,
        redundant: &Redundant,
        restraints: &[crate::mechanics::Restraint],
        warnings: &mut Vec<String>,
    ) -> Substructure {
        let name = redundant.short_name();

        if redundant.kind == RedundantKind::InternalMoment {
            return self.unit_internal_moment(redundant, name);
        }

        let node_id = redundant.node.expect("reaction redundant carries a node");
        let node = self.frame.node(node_id).expect("redundant node resolved");
        let unit_action = match redundant.kind {
            RedundantKind::ReactionX => PointAction::force(node.x, node.y, 1.0, 0.0),
            RedundantKind::ReactionY => PointAction::force(node.x, node.y, 0.0, 1.0),
            _ => PointAction::moment(node.x, node.y, 1.0),
        };

        let node_actions = vec![(node_id, unit_action)];
        let conditions = self.frame.moment_conditions(&node_actions, false);
        let solved = match solve_isostatic_reactions(restraints, &[unit_action], &conditions) {
            Ok((r, solve_warnings)) => {
                warnings.extend(solve_warnings);
                r
            }
            Err(e) => {
                warnings.push(format!(
                    "unit substructure {name} could not be solved ({e}); \
                     falling back to null reactions"
                ));
                Reactions::new()
            }
        };

        let diagrams = self.section_diagrams(&name, false, &node_actions, &solved, warnings);

        // Record the unit itself as the reaction at the released DOF.
        let mut reactions = solved;
        let dof = redundant.kind.dof().expect("reaction kind has a DOF");
        reactions.entry(node_id).or_insert([0.0; 3])[dof.index()] += 1.0;

        Substructure {
            name,
            redundant: Some(redundant.clone()),
            diagrams,
            reactions,
        }
    }

    /// Released bending moment at a bar end: the host bar carries a
    /// linear moment from 1 at the hinge to 0 at the opposite end; the
    /// ±1 pair is self-equilibrated so no support reactions appear.
    fn unit_internal_moment(&self, redundant: &Redundant, name: String) -> Substructure {
        let bar_id = redundant.bar.expect("internal redundant carries a bar");
        let bar = self.frame.bar(bar_id).expect("redundant bar resolved");

        let at_i = redundant.position.abs() < 1e-9;
        let (mi, mj) = if at_i { (1.0, 0.0) } else { (0.0, 1.0) };

        let mut diagrams = DiagramSet::new();
        diagrams.insert(bar_id, Diagram::linear_moment(bar_id, bar.length, mi, mj));

        Substructure {
            name,
            redundant: Some(redundant.clone()),
            diagrams,
            reactions: Reactions::new(),
        }
    }

    fn nodal_load_actions(&self) -> Vec<(u32, PointAction)> {
        self.frame
            .nodal_loads
            .iter()
            .filter_map(|l| {
                self.frame.node(l.node).map(|n| {
                    (
                        l.node,
                        PointAction {
                            x: n.x,
                            y: n.y,
                            fx: l.fx,
                            fy: l.fy,
                            mz: l.mz,
                        },
                    )
                })
            })
            .collect()
    }

    fn section_diagrams(
        &self,
        context: &str,
        include_bar_loads: bool,
        node_actions: &[(u32, PointAction)],
        reactions: &Reactions,
        warnings: &mut Vec<String>,
    ) -> DiagramSet {
        let mut diagrams = DiagramSet::new();

        for bar in &self.frame.bars {
            let seed = match self
                .frame
                .i_side_seed(bar.id, node_actions, reactions, include_bar_loads)
            {
                Some(seed) => seed,
                None => {
                    warnings.push(format!(
                        "bar {} closes a loop; section method skipped in {} substructure",
                        bar.id, context
                    ));
                    diagrams.insert(bar.id, Diagram::zero(bar.id, bar.length));
                    continue;
                }
            };
            let (points, dists) = if include_bar_loads {
                (
                    self.frame.point_loads_on(bar.id),
                    self.frame.dist_loads_on(bar.id),
                )
            } else {
                (Vec::new(), Vec::new())
            };
            diagrams.insert(
                bar.id,
                build_section_diagram(bar, seed, &points, &dists),
            );
        }
        diagrams
    }
}
