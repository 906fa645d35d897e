//! Virtual-work assembly of the flexibility matrix F and the independent
//! vector e₀.

use log::debug;

use crate::consts::{CONDITION_NUMBER_WARNING, SYMMETRY_TOLERANCE};
use crate::elements::Dof;
use crate::math::{
    condition_number, mohr_trapezoid_trapezoid, simpson, virtual_work_integral, Mat, Vec as FVec,
};

use super::frame::Frame;
use super::redundants::Redundant;
use super::substructures::Substructure;

/// Assembled compatibility coefficients.
#[derive(Debug, Clone)]
pub struct FlexibilityCoefficients {
    /// GH×GH flexibility matrix
    pub f: Mat,
    /// Independent terms, length GH
    pub e0: FVec,
    /// Maxwell-Betti symmetry within tolerance
    pub symmetric: bool,
    /// Largest entry of |F − Fᵀ|
    pub max_asymmetry: f64,
    /// Spectral condition number of F
    pub condition: f64,
}

/// Assemble F and e₀ for the released structure.
///
/// Bending products of two linear unit diagrams integrate by the Mohr
/// trapezoid row; everything else (the primary diagram, thermal shapes,
/// axial/shear terms) goes through composite Simpson with `n_points`
/// samples. Returns the coefficients plus the non-fatal findings.
pub(crate) fn assemble(
    frame: &Frame,
    primary: &Substructure,
    units: &[Substructure],
    redundants: &[Redundant],
    include_axial: bool,
    include_shear: bool,
    n_points: usize,
) -> (FlexibilityCoefficients, Vec<String>) {
    let n = units.len();
    let mut f = Mat::zeros(n, n);
    let mut e0 = FVec::zeros(n);
    let mut warnings = Vec::new();

    for i in 0..n {
        for j in i..n {
            let fij = coefficient(frame, &units[i], &units[j], include_axial, include_shear, n_points);
            f[(i, j)] = fij;
            f[(j, i)] = fij;
        }
    }

    add_spring_flexibility(frame, redundants, &mut f);

    for (i, unit) in units.iter().enumerate() {
        e0[i] = independent_term(
            frame,
            primary,
            unit,
            &redundants[i],
            redundants,
            include_axial,
            include_shear,
            n_points,
        );
    }

    let has_foreign_movement = frame.movements.iter().any(|movement| {
        !redundants
            .iter()
            .any(|r| r.node == Some(movement.node))
    });
    if has_foreign_movement {
        warnings.push(
            "prescribed movements at non-redundant supports enter e0 as Rⁱ·δ; verify the \
             resulting signs against the global axes (imposed rotations clockwise positive)"
                .to_string(),
        );
    }

    let mut max_asymmetry = 0.0f64;
    for i in 0..n {
        for j in 0..n {
            max_asymmetry = max_asymmetry.max((f[(i, j)] - f[(j, i)]).abs());
        }
    }
    let symmetric = max_asymmetry < SYMMETRY_TOLERANCE;
    if !symmetric {
        warnings.push(format!(
            "flexibility matrix violates Maxwell-Betti symmetry (max |F - Ft| = {max_asymmetry:.3e})"
        ));
    }

    for i in 0..n {
        if f[(i, i)] <= 0.0 {
            warnings.push(format!(
                "non-positive diagonal flexibility f{}{} = {:.3e}",
                i + 1,
                i + 1,
                f[(i, i)]
            ));
        }
    }

    let condition = condition_number(&f);
    if condition > CONDITION_NUMBER_WARNING {
        warnings.push(format!(
            "flexibility matrix is ill-conditioned (cond = {condition:.2e}); \
             consider a different redundant selection"
        ));
    }

    debug!("assembled {n}x{n} flexibility matrix, cond = {condition:.3e}");

    (
        FlexibilityCoefficients {
            f,
            e0,
            symmetric,
            max_asymmetry,
            condition,
        },
        warnings,
    )
}

/// fᵢⱼ = Σ_bars ∫ Mⁱ·Mʲ/(EI) dx (+ optional axial and shear terms).
fn coefficient(
    frame: &Frame,
    unit_i: &Substructure,
    unit_j: &Substructure,
    include_axial: bool,
    include_shear: bool,
    n_points: usize,
) -> f64 {
    let mut fij = 0.0;

    for bar in &frame.bars {
        let diag_i = unit_i.diagram(bar.id);
        let diag_j = unit_j.diagram(bar.id);
        let (diag_i, diag_j) = match (diag_i, diag_j) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        let closed_form = !include_axial
            && !include_shear
            && diag_i.is_single_linear_m()
            && diag_j.is_single_linear_m();

        if closed_form {
            let (mi0, mil) = diag_i.m_ends();
            let (mj0, mjl) = diag_j.m_ends();
            fij += mohr_trapezoid_trapezoid(bar.length, mi0, mil, mj0, mjl) / bar.ei;
        } else {
            fij += virtual_work_integral(
                |x| diag_i.m(x),
                |x| diag_j.m(x),
                bar.length,
                bar.ei,
                n_points,
            );
            if include_axial {
                fij += virtual_work_integral(
                    |x| diag_i.n(x),
                    |x| diag_j.n(x),
                    bar.length,
                    bar.ea,
                    n_points,
                );
            }
            if include_shear {
                fij += virtual_work_integral(
                    |x| diag_i.v(x),
                    |x| diag_j.v(x),
                    bar.length,
                    bar.ga,
                    n_points,
                );
            }
        }
    }

    fij
}

/// A redundant releasing an elastic spring DOF adds the spring's own
/// flexibility 1/k to its diagonal entry. Springs couple only to their
/// own direction, so off-diagonal entries are untouched.
fn add_spring_flexibility(frame: &Frame, redundants: &[Redundant], f: &mut Mat) {
    for (i, redundant) in redundants.iter().enumerate() {
        let (Some(node_id), Some(dof)) = (redundant.node, redundant.kind.dof()) else {
            continue;
        };
        if let Some(support) = frame.support(node_id) {
            if let Some(k) = support.spring_stiffness(dof) {
                f[(i, i)] += 1.0 / k;
            }
        }
    }
}

/// e₀ᵢ: mechanical virtual work of the primary diagrams, plus thermal,
/// kept-spring and foreign prescribed-movement contributions.
#[allow(clippy::too_many_arguments)]
fn independent_term(
    frame: &Frame,
    primary: &Substructure,
    unit: &Substructure,
    redundant: &Redundant,
    all_redundants: &[Redundant],
    include_axial: bool,
    include_shear: bool,
    n_points: usize,
) -> f64 {
    let mut e0i = 0.0;

    // Mechanical part. The primary bending diagram is parabolic under
    // distributed loads, so this always integrates numerically.
    for bar in &frame.bars {
        let Some(diag_i) = unit.diagram(bar.id) else {
            continue;
        };
        e0i += virtual_work_integral(
            |x| diag_i.m(x),
            |x| primary.m(bar.id, x),
            bar.length,
            bar.ei,
            n_points,
        );
        if include_axial {
            e0i += virtual_work_integral(
                |x| diag_i.n(x),
                |x| primary.n(bar.id, x),
                bar.length,
                bar.ea,
                n_points,
            );
        }
        if include_shear {
            e0i += virtual_work_integral(
                |x| diag_i.v(x),
                |x| primary.v(bar.id, x),
                bar.length,
                bar.ga,
                n_points,
            );
        }
    }

    // Thermal part: α·ΔTu·∫Nⁱ dx and (α·ΔT∇/h)·∫Mⁱ dx, both numerical.
    // The axial diagram of an inclined-frame unit is not constant, so the
    // end-average shortcut is not used.
    for thermal in &frame.thermal_loads {
        let Some(bar) = frame.bar(thermal.bar) else {
            continue;
        };
        if thermal.delta_t_uniform != 0.0 {
            let n_integral = simpson(|x| unit.n(bar.id, x), 0.0, bar.length, n_points);
            e0i += bar.alpha * thermal.delta_t_uniform * n_integral;
        }
        if thermal.delta_t_gradient != 0.0 {
            let m_integral = simpson(|x| unit.m(bar.id, x), 0.0, bar.length, n_points);
            e0i += bar.alpha * thermal.delta_t_gradient / bar.depth * m_integral;
        }
    }

    // Kept springs: the primary reaction flows through the spring, and
    // the real displacement R⁰/k works against the unit reaction.
    for node in &frame.nodes {
        let Some(support) = &node.support else {
            continue;
        };
        if !support.is_spring() {
            continue;
        }
        for dof in [Dof::Ux, Dof::Uy, Dof::Rz] {
            let Some(k) = support.spring_stiffness(dof) else {
                continue;
            };
            let released = all_redundants
                .iter()
                .any(|r| r.node == Some(node.id) && r.kind.dof() == Some(dof));
            if released {
                continue;
            }
            let r0 = primary.reaction(node.id)[dof.index()];
            let ri = unit.reaction(node.id)[dof.index()];
            e0i += ri * r0 / k;
        }
    }

    // Prescribed movements at nodes other than the redundant's own: the
    // unit reactions work through the imposed displacements, Rⁱ·δ
    // component-wise. A movement at the redundant's node belongs to e_h
    // instead.
    for movement in &frame.movements {
        if redundant.node == Some(movement.node) {
            continue;
        }
        let ri = unit.reaction(movement.node);
        e0i += ri[0] * movement.dx + ri[1] * movement.dy + ri[2] * movement.dtheta;
    }

    e0i
}
