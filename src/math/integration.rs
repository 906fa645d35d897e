//! Numerical integration and the Mohr table closed forms.
//!
//! The Mohr integrals cover products of the simple diagram shapes that
//! appear in virtual-work sums; the trapezoid×trapezoid row is the one the
//! flexibility assembler leans on, because unit diagrams are piecewise
//! linear. Everything else goes through composite Simpson with an odd
//! sample count, which is exact through cubics — the highest degree a
//! linearly varying line load can produce.

/// Composite Simpson integration of `f` over `[a, b]` using `n` samples.
///
/// `n` must be odd and at least 3; even counts are bumped by one.
pub fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let n = if n < 3 {
        3
    } else if n % 2 == 0 {
        n + 1
    } else {
        n
    };
    let h = (b - a) / (n - 1) as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n - 1 {
        let x = a + i as f64 * h;
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * f(x);
    }
    sum * h / 3.0
}

/// Virtual-work integral ∫ f(x)·g(x) / stiffness dx over `[0, length]`.
///
/// The diagrams are treated as black boxes sampled at `n` Simpson points.
pub fn virtual_work_integral<F, G>(f: F, g: G, length: f64, stiffness: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
    G: Fn(f64) -> f64,
{
    simpson(|x| f(x) * g(x), 0.0, length, n) / stiffness
}

/// Mohr table: rectangle × rectangle, ∫ j·k dx = j·k·L.
pub fn mohr_rectangle_rectangle(length: f64, j: f64, k: f64) -> f64 {
    j * k * length
}

/// Mohr table: triangles peaking at the same end, ∫ = j·k·L/3.
pub fn mohr_triangle_triangle_same(length: f64, j: f64, k: f64) -> f64 {
    j * k * length / 3.0
}

/// Mohr table: triangles peaking at opposite ends, ∫ = j·k·L/6.
pub fn mohr_triangle_triangle_opposite(length: f64, j: f64, k: f64) -> f64 {
    j * k * length / 6.0
}

/// Mohr table: trapezoid × trapezoid over a shared stretch of length `L`:
///
/// ∫ j(x)·k(x) dx = (L/6)·[j₁·(2k₁ + k₂) + j₂·(k₁ + 2k₂)]
///
/// with `j1`, `j2` the end values of the first diagram and `k1`, `k2` of
/// the second. Exact for any pair of linear diagrams; every other linear
/// row of the table is a special case of this one.
pub fn mohr_trapezoid_trapezoid(length: f64, j1: f64, j2: f64, k1: f64, k2: f64) -> f64 {
    length / 6.0 * (j1 * (2.0 * k1 + k2) + j2 * (k1 + 2.0 * k2))
}

/// Mohr table: trapezoid × symmetric parabola of mid sag `k`,
/// ∫ = (j₁ + j₂)·k·L/3.
pub fn mohr_trapezoid_parabola(length: f64, j1: f64, j2: f64, k: f64) -> f64 {
    (j1 + j2) * k * length / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simpson_exact_for_cubic() {
        let exact = 6.0f64.powi(4) / 4.0;
        assert_relative_eq!(simpson(|x| x * x * x, 0.0, 6.0, 5), exact, epsilon = 1e-9);
    }

    #[test]
    fn test_simpson_even_count_bumped() {
        let a = simpson(|x| x * x, 0.0, 1.0, 20);
        let b = simpson(|x| x * x, 0.0, 1.0, 21);
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoid_formula_reduces_to_special_rows() {
        let length = 4.0;
        // rectangle × rectangle
        assert_relative_eq!(
            mohr_trapezoid_trapezoid(length, 2.0, 2.0, 3.0, 3.0),
            mohr_rectangle_rectangle(length, 2.0, 3.0),
            epsilon = 1e-12
        );
        // triangle × triangle, same end
        assert_relative_eq!(
            mohr_trapezoid_trapezoid(length, 0.0, 2.0, 0.0, 3.0),
            mohr_triangle_triangle_same(length, 2.0, 3.0),
            epsilon = 1e-12
        );
        // triangle × triangle, opposite ends
        assert_relative_eq!(
            mohr_trapezoid_trapezoid(length, 2.0, 0.0, 0.0, 3.0),
            mohr_triangle_triangle_opposite(length, 2.0, 3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_trapezoid_matches_simpson() {
        let length = 6.0;
        let j = |x: f64| 1.0 - x / length;
        let k = |x: f64| 0.5 + x / 3.0;
        let closed = mohr_trapezoid_trapezoid(length, j(0.0), j(length), k(0.0), k(length));
        let numeric = simpson(|x| j(x) * k(x), 0.0, length, 21);
        assert_relative_eq!(closed, numeric, epsilon = 1e-10);
    }

    #[test]
    fn test_virtual_work_integral() {
        let ei = 2.0;
        let value = virtual_work_integral(|x| x, |x| x, 3.0, ei, 21);
        assert_relative_eq!(value, 9.0 / 2.0, epsilon = 1e-10);
    }
}
