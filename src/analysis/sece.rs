//! Solver for the System of Elastic Compatibility Equations,
//! `F·X = e_h − e₀`.

use serde::{Deserialize, Serialize};

use crate::consts::COMPATIBILITY_TOLERANCE;
use crate::math::{self, Mat, Vec as FVec};

/// Strategy for the compatibility solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverKind {
    /// LU with partial pivoting; least-squares fallback on singularity.
    #[default]
    Direct,
    /// Cholesky for the SPD case; direct fallback on failure.
    Cholesky,
    /// Conjugate gradient, for large systems.
    Iterative,
}

/// Solution of the compatibility system.
#[derive(Debug, Clone)]
pub struct SeceSolution {
    /// Redundant values X₁..X_GH
    pub x: FVec,
    /// ‖F·X − (e_h − e₀)‖
    pub residual: f64,
    /// True when a solve produced finite values
    pub converged: bool,
    /// Non-fatal findings (fallbacks taken, residual quality)
    pub warnings: Vec<String>,
}

impl SeceSolution {
    /// Redundant value Xᵢ, 1-indexed.
    pub fn x_value(&self, i: usize) -> f64 {
        self.x[i - 1]
    }

    /// True when the solution satisfies compatibility numerically.
    pub fn is_valid(&self) -> bool {
        self.converged
            && self.residual < COMPATIBILITY_TOLERANCE
            && self.x.iter().all(|v| v.is_finite())
    }
}

/// Solve `F·X = e_h − e₀` with the requested strategy.
pub fn solve_sece(
    f: &Mat,
    e0: &FVec,
    eh: &FVec,
    kind: SolverKind,
    max_iterations: usize,
    tolerance: f64,
) -> SeceSolution {
    let mut warnings = Vec::new();
    let b = eh - e0;
    let n = b.len();

    let x = match kind {
        SolverKind::Direct => solve_direct(f, &b, &mut warnings),
        SolverKind::Cholesky => match math::solve_cholesky(f, &b) {
            Some(x) => Some(x),
            None => {
                warnings.push(
                    "Cholesky failed (matrix not positive definite); using direct solve"
                        .to_string(),
                );
                solve_direct(f, &b, &mut warnings)
            }
        },
        SolverKind::Iterative => match math::solve_cg(f, &b, tolerance, max_iterations) {
            Some(x) => Some(x),
            None => {
                warnings.push("conjugate gradient broke down; using direct solve".to_string());
                solve_direct(f, &b, &mut warnings)
            }
        },
    };

    let (x, converged) = match x {
        Some(x) => (x, true),
        None => (FVec::zeros(n), false),
    };

    let residual = (f * &x - &b).norm();
    if residual > COMPATIBILITY_TOLERANCE {
        warnings.push(format!(
            "compatibility residual is high ({residual:.3e}); the solution may be inaccurate"
        ));
    }

    SeceSolution {
        x,
        residual,
        converged,
        warnings,
    }
}

fn solve_direct(f: &Mat, b: &FVec, warnings: &mut Vec<String>) -> Option<FVec> {
    if let Some(x) = math::solve_linear_system(f, b) {
        return Some(x);
    }
    warnings.push("flexibility matrix is singular; using least squares".to_string());
    math::solve_least_squares(f, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_system() -> (Mat, FVec, FVec) {
        // F = [2 1; 1 2], e0 = [22.5, 22.5], eh = 0 -> X = [-7.5, -7.5]
        let f = Mat::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let e0 = FVec::from_vec(vec![22.5, 22.5]);
        let eh = FVec::zeros(2);
        (f, e0, eh)
    }

    #[test]
    fn test_direct_solve() {
        let (f, e0, eh) = sample_system();
        let solution = solve_sece(&f, &e0, &eh, SolverKind::Direct, 100, 1e-10);
        assert!(solution.is_valid());
        assert_relative_eq!(solution.x_value(1), -7.5, epsilon = 1e-10);
        assert_relative_eq!(solution.x_value(2), -7.5, epsilon = 1e-10);
        assert!(solution.residual < 1e-10);
    }

    #[test]
    fn test_cholesky_matches_direct() {
        let (f, e0, eh) = sample_system();
        let direct = solve_sece(&f, &e0, &eh, SolverKind::Direct, 100, 1e-10);
        let cholesky = solve_sece(&f, &e0, &eh, SolverKind::Cholesky, 100, 1e-10);
        assert_relative_eq!(cholesky.x_value(1), direct.x_value(1), epsilon = 1e-10);
    }

    #[test]
    fn test_iterative_matches_direct() {
        let (f, e0, eh) = sample_system();
        let direct = solve_sece(&f, &e0, &eh, SolverKind::Direct, 100, 1e-10);
        let cg = solve_sece(&f, &e0, &eh, SolverKind::Iterative, 1000, 1e-12);
        assert_relative_eq!(cg.x_value(1), direct.x_value(1), epsilon = 1e-8);
    }

    #[test]
    fn test_singular_falls_back_to_least_squares() {
        // Zero row/column: the axial redundant with axial flexibility off
        let f = Mat::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 0.0]);
        let e0 = FVec::from_vec(vec![4.0, 0.0]);
        let eh = FVec::zeros(2);
        let solution = solve_sece(&f, &e0, &eh, SolverKind::Direct, 100, 1e-10);
        assert!(solution.converged);
        assert_relative_eq!(solution.x_value(1), -2.0, epsilon = 1e-9);
        assert_relative_eq!(solution.x_value(2), 0.0, epsilon = 1e-9);
        assert!(solution
            .warnings
            .iter()
            .any(|w| w.contains("least squares")));
    }

    #[test]
    fn test_prescribed_movement_rhs() {
        let f = Mat::from_row_slice(1, 1, &[2.0]);
        let e0 = FVec::from_vec(vec![1.0]);
        let eh = FVec::from_vec(vec![-0.01]);
        let solution = solve_sece(&f, &e0, &eh, SolverKind::Direct, 100, 1e-10);
        assert_relative_eq!(solution.x_value(1), (-0.01 - 1.0) / 2.0, epsilon = 1e-12);
    }
}
