//! Global equilibrium primitives and the isostatic reaction solver.

use std::collections::{HashMap, HashSet};

use crate::consts::EQUILIBRIUM_TOLERANCE;
use crate::elements::Dof;
use crate::error::{AnalysisError, FlexResult};
use crate::math::{self, Mat, Vec as FVec};

/// Moment of a force about a point, in the crate-wide convention
/// (Y positive downward, moments positive clockwise):
///
/// `M = −Fy·(xₚ − x_F) + Fx·(yₚ − y_F)`
pub fn moment_about(fx: f64, fy: f64, x_force: f64, y_force: f64, x_point: f64, y_point: f64) -> f64 {
    -fy * (x_point - x_force) + fx * (y_point - y_force)
}

/// An external action reduced to a point: force components plus a couple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointAction {
    pub x: f64,
    pub y: f64,
    pub fx: f64,
    pub fy: f64,
    pub mz: f64,
}

impl PointAction {
    pub fn force(x: f64, y: f64, fx: f64, fy: f64) -> Self {
        Self {
            x,
            y,
            fx,
            fy,
            mz: 0.0,
        }
    }

    pub fn moment(x: f64, y: f64, mz: f64) -> Self {
        Self {
            x,
            y,
            fx: 0.0,
            fy: 0.0,
            mz,
        }
    }

    /// Moment of this action about a point.
    pub fn moment_at(&self, x: f64, y: f64) -> f64 {
        moment_about(self.fx, self.fy, self.x, self.y, x, y) + self.mz
    }
}

/// One unknown reaction component: a restrained DOF at a supported node.
#[derive(Debug, Clone, Copy)]
pub struct Restraint {
    pub node: u32,
    pub x: f64,
    pub y: f64,
    pub dof: Dof,
}

/// Reactions per node as `[Rx, Ry, Mz]` triples.
pub type Reactions = HashMap<u32, [f64; 3]>;

/// One internal-hinge condition: the moments of everything on one side of
/// the release, taken about the hinge point, must vanish.
///
/// `nodes` names the free body on that side; the solver adds the
/// coefficients of the side's unknown reactions, `load_moment` carries
/// the already-reduced moment of the side's external actions.
#[derive(Debug, Clone)]
pub struct MomentCondition {
    pub x: f64,
    pub y: f64,
    pub nodes: HashSet<u32>,
    pub load_moment: f64,
}

/// Solve the reactions of a released structure from the three global
/// equilibrium equations (ΣFx = 0, ΣFy = 0, ΣM = 0 about the first
/// restrained node) plus one moment condition per internal hinge.
///
/// Fails with [`AnalysisError::Unstable`] when fewer than three components
/// remain, when a hinge-free system is singular (collinear or otherwise
/// improper arrangements), or when no equilibrium set exists at all; and
/// with [`AnalysisError::SubstructureFailure`] when the restraint count
/// exceeds the available equations. A hinge that releases a moment which
/// is already free makes its condition row dependent; the solver then
/// falls back to least-squares reactions and reports it as a warning.
pub fn solve_isostatic_reactions(
    restraints: &[Restraint],
    actions: &[PointAction],
    conditions: &[MomentCondition],
) -> FlexResult<(Reactions, Vec<String>)> {
    let n = restraints.len();
    let rows = 3 + conditions.len();
    if n < 3 {
        return Err(AnalysisError::Unstable(format!(
            "only {n} reaction components remain, at least 3 are required"
        )));
    }
    if n > rows {
        return Err(AnalysisError::SubstructureFailure(format!(
            "{n} reaction components exceed the {rows} available equilibrium equations"
        )));
    }

    let x_ref = restraints[0].x;
    let y_ref = restraints[0].y;

    let mut fx_total = 0.0;
    let mut fy_total = 0.0;
    let mut mz_total = 0.0;
    for action in actions {
        fx_total += action.fx;
        fy_total += action.fy;
        mz_total += action.moment_at(x_ref, y_ref);
    }

    let mut a = Mat::zeros(rows, n);
    let mut b = FVec::zeros(rows);
    b[0] = -fx_total;
    b[1] = -fy_total;
    b[2] = mz_total;
    for (j, r) in restraints.iter().enumerate() {
        match r.dof {
            Dof::Ux => {
                a[(0, j)] = 1.0;
                a[(2, j)] = r.y - y_ref;
            }
            Dof::Uy => {
                a[(1, j)] = 1.0;
                a[(2, j)] = -(r.x - x_ref);
            }
            Dof::Rz => {
                a[(2, j)] = -1.0;
            }
        }
    }
    for (k, cond) in conditions.iter().enumerate() {
        let row = 3 + k;
        b[row] = cond.load_moment;
        for (j, r) in restraints.iter().enumerate() {
            if !cond.nodes.contains(&r.node) {
                continue;
            }
            match r.dof {
                Dof::Ux => a[(row, j)] = r.y - cond.y,
                Dof::Uy => a[(row, j)] = -(r.x - cond.x),
                Dof::Rz => a[(row, j)] = -1.0,
            }
        }
    }

    let mut warnings = Vec::new();
    let solution = if rows == n {
        match math::solve_linear_system(&a, &b) {
            Some(s) => Some(s),
            None if conditions.is_empty() => {
                return Err(AnalysisError::Unstable(
                    "equilibrium system is singular, the arrangement of restraints is a mechanism"
                        .to_string(),
                ));
            }
            None => {
                warnings.push(
                    "equilibrium system is rank-deficient (a hinge releases a moment that is \
                     already free); using least-squares reactions"
                        .to_string(),
                );
                math::solve_least_squares(&a, &b)
            }
        }
    } else {
        math::solve_least_squares(&a, &b)
    };
    let solution = solution.ok_or_else(|| {
        AnalysisError::Unstable("equilibrium system has no solution".to_string())
    })?;

    // A least-squares fit of an inconsistent system is a mechanism, not
    // an equilibrium state.
    let residual = (&a * &solution - &b).norm();
    if residual > EQUILIBRIUM_TOLERANCE {
        return Err(AnalysisError::Unstable(format!(
            "no reaction set satisfies equilibrium (residual {residual:.3e})"
        )));
    }

    let mut reactions: Reactions = HashMap::new();
    for (j, r) in restraints.iter().enumerate() {
        let entry = reactions.entry(r.node).or_insert([0.0; 3]);
        entry[r.dof.index()] = solution[j];
    }
    Ok((reactions, warnings))
}

/// Rank check on a restraint arrangement: true when the three equilibrium
/// rows are independent, so the arrangement can actually hold a rigid body.
pub fn restraints_are_stable(restraints: &[Restraint]) -> bool {
    if restraints.len() < 3 {
        return false;
    }
    let x_ref = restraints[0].x;
    let y_ref = restraints[0].y;

    let mut a = Mat::zeros(3, restraints.len());
    for (j, r) in restraints.iter().enumerate() {
        match r.dof {
            Dof::Ux => {
                a[(0, j)] = 1.0;
                a[(2, j)] = r.y - y_ref;
            }
            Dof::Uy => {
                a[(1, j)] = 1.0;
                a[(2, j)] = -(r.x - x_ref);
            }
            Dof::Rz => {
                a[(2, j)] = -1.0;
            }
        }
    }

    let svd = a.svd(false, false);
    let max = svd.singular_values.max();
    if max <= 0.0 {
        return false;
    }
    let min = svd
        .singular_values
        .iter()
        .fold(f64::INFINITY, |acc, &v| acc.min(v));
    min > 1e-9 * max
}

/// Residuals `[ΣFx, ΣFy, ΣMz]` of external actions plus reactions, taken
/// about the origin.
pub fn equilibrium_residuals(
    actions: &[PointAction],
    reactions: &[(f64, f64, [f64; 3])],
) -> [f64; 3] {
    let mut fx = 0.0;
    let mut fy = 0.0;
    let mut mz = 0.0;
    for action in actions {
        fx += action.fx;
        fy += action.fy;
        mz += action.moment_at(0.0, 0.0);
    }
    for &(x, y, r) in reactions {
        fx += r[0];
        fy += r[1];
        mz += moment_about(r[0], r[1], x, y, 0.0, 0.0) + r[2];
    }
    [fx, fy, mz]
}
