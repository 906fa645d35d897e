//! The force-method analysis pipeline.
//!
//! `analyze` is a pure function over an immutable model snapshot:
//! indeterminacy, redundant selection, substructures, virtual-work
//! coefficients, the compatibility solve and superposition, in that
//! order. Fatal conditions abort and come back tagged in the result;
//! non-fatal findings accumulate as warnings.

mod flexibility;
mod frame;
mod redundants;
mod sece;
mod substructures;

use std::collections::HashMap;

use log::{debug, warn};

use crate::consts::{COMPATIBILITY_TOLERANCE, DEFAULT_INTEGRATION_POINTS, EQUILIBRIUM_TOLERANCE};
use crate::error::{AnalysisError, FlexResult};
use crate::math::Vec as FVec;
use crate::mechanics::{
    equilibrium_residuals, solve_isostatic_reactions, Diagram, PointAction, Reactions,
};
use crate::model::Model;
use crate::results::AnalysisResult;

use frame::Frame;
use substructures::SubstructureGenerator;

pub use flexibility::FlexibilityCoefficients;
pub use redundants::{Redundant, RedundantKind};
pub use sece::{solve_sece, SeceSolution, SolverKind};
pub use substructures::Substructure;

/// Options controlling one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// User-chosen redundants; automatic heuristic selection when `None`.
    pub manual_redundants: Option<Vec<Redundant>>,
    /// Include the axial term ∫NⁱNʲ/EA in the flexibility coefficients.
    pub include_axial_flexibility: bool,
    /// Include the shear term ∫VⁱVʲ/(GA) in the flexibility coefficients.
    pub include_shear_flexibility: bool,
    /// Compatibility solve strategy.
    pub solver: SolverKind,
    /// Simpson sample count (odd, ≥ 5); 0 selects the default.
    pub integration_points: usize,
    /// Iteration cap for the iterative solver; 0 selects 1000.
    pub max_iterations: usize,
    /// Convergence tolerance for the iterative solver; 0.0 selects 1e-10.
    pub tolerance: f64,
}

impl AnalysisOptions {
    /// Supply a manual redundant selection.
    pub fn with_redundants(mut self, redundants: Vec<Redundant>) -> Self {
        self.manual_redundants = Some(redundants);
        self
    }

    /// Enable the axial flexibility term.
    pub fn with_axial(mut self) -> Self {
        self.include_axial_flexibility = true;
        self
    }

    /// Enable the shear flexibility term.
    pub fn with_shear(mut self) -> Self {
        self.include_shear_flexibility = true;
        self
    }

    /// Choose the compatibility solver.
    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    /// Set the Simpson sample count (normalized to an odd value ≥ 5).
    pub fn with_integration_points(mut self, n: usize) -> Self {
        self.integration_points = n;
        self
    }

    fn simpson_points(&self) -> usize {
        let n = if self.integration_points == 0 {
            DEFAULT_INTEGRATION_POINTS
        } else {
            self.integration_points
        };
        let n = n.max(5);
        if n % 2 == 0 {
            n + 1
        } else {
            n
        }
    }

    fn iteration_cap(&self) -> usize {
        if self.max_iterations == 0 {
            1000
        } else {
            self.max_iterations
        }
    }

    fn iteration_tolerance(&self) -> f64 {
        if self.tolerance > 0.0 {
            self.tolerance
        } else {
            1e-10
        }
    }
}

/// Run the complete force-method analysis of a model.
///
/// Never panics on bad input: fatal conditions produce a result with
/// `success = false`, the tagged errors, and whatever was computed up to
/// the failure.
pub fn analyze(model: &Model, options: &AnalysisOptions) -> AnalysisResult {
    let violations = model.validate();
    if !violations.is_empty() {
        return AnalysisResult::failed(
            0,
            violations
                .into_iter()
                .map(AnalysisError::ModelInvalid)
                .collect(),
            Vec::new(),
        );
    }

    let mut engine = Engine::new(model, options);
    match engine.run() {
        Ok(result) => result,
        Err(error) => {
            warn!("analysis failed: {error}");
            let mut result =
                AnalysisResult::failed(engine.degree, vec![error], engine.warnings.clone());
            result.redundants = engine.redundants.clone();
            if let Some(coeffs) = &engine.coefficients {
                result.f_matrix = Some(coeffs.f.clone());
                result.e0 = Some(coeffs.e0.clone());
                result.condition_number = coeffs.condition;
            }
            result
        }
    }
}

struct Engine<'a> {
    model: &'a Model,
    options: &'a AnalysisOptions,
    warnings: Vec<String>,
    degree: i32,
    redundants: Vec<Redundant>,
    coefficients: Option<FlexibilityCoefficients>,
}

impl<'a> Engine<'a> {
    fn new(model: &'a Model, options: &'a AnalysisOptions) -> Self {
        Self {
            model,
            options,
            warnings: Vec::new(),
            degree: 0,
            redundants: Vec::new(),
            coefficients: None,
        }
    }

    fn push_warning(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    fn run(&mut self) -> FlexResult<AnalysisResult> {
        let frame = Frame::from_model(self.model)?;

        self.degree = self.model.degree_of_indeterminacy();
        debug!("degree of static indeterminacy: {}", self.degree);
        if self.degree < 0 {
            return Err(AnalysisError::Unstable(format!(
                "GH = {}, the structure is a mechanism missing {} restraints",
                self.degree,
                -self.degree
            )));
        }

        if self.degree == 0 {
            return self.solve_isostatic(&frame);
        }

        // Redundant selection
        let selector = redundants::RedundantSelector::new(&frame);
        self.redundants = match self.options.manual_redundants.clone() {
            Some(manual) => selector.validate_manual(self.degree as usize, manual)?,
            None => selector.select_automatic(self.degree as usize)?,
        };
        for redundant in &self.redundants {
            debug!("redundant {}: {}", redundant.short_name(), redundant.description);
        }

        // Substructures of the released structure
        let generator = SubstructureGenerator::new(&frame, &self.redundants);
        let (primary, units, sub_warnings) = generator.generate()?;
        for warning in sub_warnings {
            self.push_warning(warning);
        }

        // Flexibility coefficients by virtual work
        let (coefficients, flex_warnings) = flexibility::assemble(
            &frame,
            &primary,
            &units,
            &self.redundants,
            self.options.include_axial_flexibility,
            self.options.include_shear_flexibility,
            self.options.simpson_points(),
        );
        for warning in flex_warnings {
            self.push_warning(warning);
        }
        self.coefficients = Some(coefficients.clone());

        // Compatibility solve: F·X = e_h − e₀
        let eh = self.prescribed_movement_rhs(&frame);
        let solution = solve_sece(
            &coefficients.f,
            &coefficients.e0,
            &eh,
            self.options.solver,
            self.options.iteration_cap(),
            self.options.iteration_tolerance(),
        );
        for warning in solution.warnings.clone() {
            self.push_warning(warning);
        }
        if !solution.converged {
            return Err(AnalysisError::SolverFailure(
                "no solve strategy produced a solution".to_string(),
            ));
        }
        if solution.x.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::NonFiniteResult);
        }
        if solution.residual > COMPATIBILITY_TOLERANCE {
            return Err(AnalysisError::SolverFailure(format!(
                "compatibility residual {:.3e} exceeds tolerance",
                solution.residual
            )));
        }

        // Superposition and final verification
        let result = self.superpose(&frame, &primary, &units, &coefficients, &eh, solution);
        Ok(result)
    }

    /// GH = 0: direct equilibrium plus the section method, no force-method
    /// body.
    fn solve_isostatic(&mut self, frame: &Frame) -> FlexResult<AnalysisResult> {
        let restraints = frame.restraints();
        let actions = frame.mechanical_actions();

        let node_actions: Vec<(u32, PointAction)> = frame
            .nodal_loads
            .iter()
            .filter_map(|l| {
                frame.node(l.node).map(|n| {
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
            .collect();

        let conditions = frame.moment_conditions(&node_actions, true);
        let (reactions, solve_warnings) =
            solve_isostatic_reactions(&restraints, &actions, &conditions)?;
        for warning in solve_warnings {
            self.push_warning(warning);
        }

        let mut diagrams = HashMap::new();
        for bar in &frame.bars {
            match frame.i_side_seed(bar.id, &node_actions, &reactions, true) {
                Some(seed) => {
                    let points = frame.point_loads_on(bar.id);
                    let dists = frame.dist_loads_on(bar.id);
                    diagrams.insert(
                        bar.id,
                        crate::mechanics::build_section_diagram(bar, seed, &points, &dists),
                    );
                }
                None => {
                    self.push_warning(format!(
                        "bar {} closes a loop; diagrams unavailable on the isostatic path",
                        bar.id
                    ));
                    diagrams.insert(bar.id, Diagram::zero(bar.id, bar.length));
                }
            }
        }

        self.check_global_equilibrium(frame, &reactions);

        Ok(AnalysisResult {
            success: true,
            degree: 0,
            reactions,
            diagrams,
            condition_number: 1.0,
            warnings: self.warnings.clone(),
            ..Default::default()
        })
    }

    /// Right-hand side e_h: a prescribed movement at the node of a
    /// reaction redundant enters the matching component directly.
    fn prescribed_movement_rhs(&self, frame: &Frame) -> FVec {
        let n = self.redundants.len();
        let mut eh = FVec::zeros(n);
        for (i, redundant) in self.redundants.iter().enumerate() {
            let (Some(node), Some(dof)) = (redundant.node, redundant.kind.dof()) else {
                continue;
            };
            for movement in &frame.movements {
                if movement.node == node {
                    eh[i] = movement.as_array()[dof.index()];
                }
            }
        }
        eh
    }

    fn superpose(
        &mut self,
        frame: &Frame,
        primary: &Substructure,
        units: &[Substructure],
        coefficients: &FlexibilityCoefficients,
        eh: &FVec,
        solution: SeceSolution,
    ) -> AnalysisResult {
        let x = &solution.x;

        // Final diagrams: N_f = N⁰ + Σ Xᵢ·Nⁱ, exactly, per bar.
        let mut diagrams = HashMap::new();
        for bar in &frame.bars {
            let base = primary
                .diagram(bar.id)
                .cloned()
                .unwrap_or_else(|| Diagram::zero(bar.id, bar.length));
            let terms: Vec<(f64, Option<&Diagram>)> = units
                .iter()
                .enumerate()
                .map(|(i, unit)| (x[i], unit.diagram(bar.id)))
                .collect();
            diagrams.insert(bar.id, Diagram::superpose(&base, &terms));
        }

        // Final reactions: R_f = R⁰ + Σ Xᵢ·Rⁱ, component-wise.
        let mut reactions: Reactions = HashMap::new();
        for node in &frame.nodes {
            if node.support.is_none() {
                continue;
            }
            let mut total = primary.reaction(node.id);
            for (i, unit) in units.iter().enumerate() {
                let ri = unit.reaction(node.id);
                for c in 0..3 {
                    total[c] += x[i] * ri[c];
                }
            }
            reactions.insert(node.id, total);
        }

        // Released elastic springs: the redundant is the spring reaction
        // and the node moves by -Xᵢ/k in that direction.
        let mut spring_displacements: HashMap<u32, [f64; 3]> = HashMap::new();
        for (i, redundant) in self.redundants.iter().enumerate() {
            let (Some(node_id), Some(dof)) = (redundant.node, redundant.kind.dof()) else {
                continue;
            };
            if let Some(k) = frame
                .support(node_id)
                .and_then(|s| s.spring_stiffness(dof))
            {
                let entry = spring_displacements.entry(node_id).or_insert([0.0; 3]);
                entry[dof.index()] = -x[i] / k;
            }
        }

        self.check_global_equilibrium(frame, &reactions);

        // Compatibility: e₀ + F·X must return to e_h.
        let closure = (&coefficients.e0 + &coefficients.f * x - eh).norm();
        if closure > COMPATIBILITY_TOLERANCE {
            self.push_warning(format!(
                "compatibility closure ‖e₀ + F·X − e_h‖ = {closure:.3e} exceeds tolerance"
            ));
        }

        AnalysisResult {
            success: true,
            degree: self.degree,
            redundants: self.redundants.clone(),
            x: Some(solution.x),
            reactions,
            diagrams,
            f_matrix: Some(coefficients.f.clone()),
            e0: Some(coefficients.e0.clone()),
            condition_number: coefficients.condition,
            sece_residual: solution.residual,
            spring_displacements,
            warnings: self.warnings.clone(),
            errors: Vec::new(),
        }
    }

    fn check_global_equilibrium(&mut self, frame: &Frame, reactions: &Reactions) {
        let actions = frame.mechanical_actions();
        let placed: Vec<(f64, f64, [f64; 3])> = reactions
            .iter()
            .filter_map(|(&node_id, &r)| frame.node(node_id).map(|n| (n.x, n.y, r)))
            .collect();
        let residuals = equilibrium_residuals(&actions, &placed);
        if residuals.iter().any(|r| r.abs() > EQUILIBRIUM_TOLERANCE) {
            self.push_warning(format!(
                "global equilibrium residuals ΣFx={:.3e}, ΣFy={:.3e}, ΣMz={:.3e}",
                residuals[0], residuals[1], residuals[2]
            ));
        }
    }
}
