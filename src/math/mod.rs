//! Mathematical utilities for the force-method pipeline.

pub mod integration;
pub mod poly;

use nalgebra::{DMatrix, DVector, Matrix2, Matrix3, Matrix6, Vector3};

pub use integration::{mohr_trapezoid_trapezoid, simpson, virtual_work_integral};
pub use poly::Poly;

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat2 = Matrix2<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;

/// 2x2 rotation matrix mapping local bar vectors to global coordinates.
pub fn rotation_2d(angle: f64) -> Mat2 {
    let c = angle.cos();
    let s = angle.sin();
    Mat2::new(c, -s, s, c)
}

/// 3x3 transformation for one node's `[ux, uy, rz]` triple. The rotation
/// component is invariant under the in-plane frame change.
pub fn bar_transformation_3(angle: f64) -> Mat3 {
    let c = angle.cos();
    let s = angle.sin();
    Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

/// 6x6 transformation covering both bar ends.
pub fn bar_transformation_6(angle: f64) -> Mat6 {
    let t3 = bar_transformation_3(angle);
    let mut t6 = Mat6::zeros();
    t6.fixed_view_mut::<3, 3>(0, 0).copy_from(&t3);
    t6.fixed_view_mut::<3, 3>(3, 3).copy_from(&t3);
    t6
}

/// Map a global force pair into the bar-local frame.
pub fn global_to_local(fx: f64, fy: f64, angle: f64) -> (f64, f64) {
    let c = angle.cos();
    let s = angle.sin();
    (c * fx + s * fy, -s * fx + c * fy)
}

/// Map a local force pair into the global frame.
pub fn local_to_global(fx_local: f64, fy_local: f64, angle: f64) -> (f64, f64) {
    let c = angle.cos();
    let s = angle.sin();
    (c * fx_local - s * fy_local, s * fx_local + c * fy_local)
}

/// Solve a dense linear system by LU with partial pivoting.
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().lu().solve(b)
}

/// Least-squares solve through SVD; returns the minimum-norm solution for
/// rank-deficient systems.
pub fn solve_least_squares(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().svd(true, true).solve(b, 1e-12).ok()
}

/// Solve a symmetric positive definite system by Cholesky.
pub fn solve_cholesky(a: &Mat, b: &Vec) -> Option<Vec> {
    a.clone().cholesky().map(|chol| chol.solve(b))
}

/// Conjugate gradient for symmetric positive definite systems.
///
/// Returns the best iterate when the cap is reached; `None` only on
/// numerical breakdown.
pub fn solve_cg(a: &Mat, b: &Vec, tol: f64, max_iter: usize) -> Option<Vec> {
    let n = b.len();
    let mut x = Vec::zeros(n);
    let mut r = b.clone();
    let mut p = r.clone();
    let mut r_dot_r = r.dot(&r);

    if r_dot_r.sqrt() < tol {
        return Some(x);
    }

    for _iter in 0..max_iter {
        let ap = a * &p;

        let p_dot_ap = p.dot(&ap);
        if p_dot_ap.abs() < 1e-300 {
            return None; // Breakdown
        }

        let alpha = r_dot_r / p_dot_ap;

        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);

        let r_dot_r_new = r.dot(&r);
        if r_dot_r_new.sqrt() < tol {
            return Some(x);
        }

        let beta = r_dot_r_new / r_dot_r;
        r_dot_r = r_dot_r_new;

        p = &r + beta * &p;
    }

    Some(x)
}

/// Spectral condition number from the singular values of `a`.
pub fn condition_number(a: &Mat) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let svd = a.clone().svd(false, false);
    let max = svd.singular_values.max();
    let min = svd.singular_values.min();
    if min <= 0.0 || !min.is_finite() {
        f64::INFINITY
    } else {
        max / min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_round_trip() {
        let angle = 0.7;
        let (lx, ly) = global_to_local(3.0, -2.0, angle);
        let (gx, gy) = local_to_global(lx, ly, angle);
        assert_relative_eq!(gx, 3.0, epsilon = 1e-12);
        assert_relative_eq!(gy, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transformation_blocks() {
        let t6 = bar_transformation_6(0.3);
        let t3 = bar_transformation_3(0.3);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(t6[(i, j)], t3[(i, j)], epsilon = 1e-15);
                assert_relative_eq!(t6[(i + 3, j + 3)], t3[(i, j)], epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn test_lu_solve() {
        let a = Mat::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let b = Vec::from_vec(vec![3.0, 3.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_least_squares_minimum_norm() {
        // Singular system with a consistent RHS: x + y = 2 twice
        let a = Mat::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let b = Vec::from_vec(vec![2.0, 2.0]);
        let x = solve_least_squares(&a, &b).unwrap();
        assert_relative_eq!(x[0] + x[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cg_matches_direct() {
        let a = Mat::from_row_slice(3, 3, &[4.0, 1.0, 0.0, 1.0, 3.0, 1.0, 0.0, 1.0, 2.0]);
        let b = Vec::from_vec(vec![1.0, 2.0, 3.0]);
        let direct = solve_linear_system(&a, &b).unwrap();
        let cg = solve_cg(&a, &b, 1e-12, 100).unwrap();
        for i in 0..3 {
            assert_relative_eq!(cg[i], direct[i], epsilon = 1e-8);
        }
    }

    #[test]
    fn test_condition_number_identity() {
        let a = Mat::identity(4, 4);
        assert_relative_eq!(condition_number(&a), 1.0, epsilon = 1e-12);
    }
}
