//! Knot vector utilities for B-spline/NURBS evaluation.

use curvix_core::{CurvixError, Result};

/// Parameter domain `[knots[degree], knots[len - degree - 1]]` of a knot vector.
///
/// Returns `(NaN, NaN)` when the knot vector is too short to define a domain,
/// so that every domain test on an unconfigured entity fails.
pub fn knot_domain(degree: usize, knots: &[f64]) -> (f64, f64) {
    if knots.len() < 2 * (degree + 1) {
        return (f64::NAN, f64::NAN);
    }
    (knots[degree], knots[knots.len() - degree - 1])
}

/// Check the size invariants tying a knot vector to its degree and control points.
pub fn validate_knots(degree: usize, num_control_points: usize, knots: &[f64]) -> Result<()> {
    if num_control_points <= degree {
        return Err(CurvixError::configuration(format!(
            "Degree {} needs at least {} control points, got {}",
            degree,
            degree + 1,
            num_control_points
        )));
    }
    if knots.len() != num_control_points + degree + 1 {
        return Err(CurvixError::configuration(format!(
            "Knot vector length must be n + p + 1, got {} knots for {} control points with degree {}",
            knots.len(),
            num_control_points,
            degree
        )));
    }
    if knots.iter().any(|k| !k.is_finite()) {
        return Err(CurvixError::configuration("Knot vector must be finite"));
    }
    if knots.windows(2).any(|w| w[0] > w[1]) {
        return Err(CurvixError::configuration("Knot vector must be non-decreasing"));
    }
    let (lower, upper) = knot_domain(degree, knots);
    if lower.is_nan() || upper.is_nan() || lower >= upper {
        return Err(CurvixError::configuration(format!(
            "Knot vector has an empty domain [{}, {}]",
            lower, upper
        )));
    }
    Ok(())
}

/// Number of non-empty knot spans inside the domain.
pub fn num_spans(degree: usize, knots: &[f64]) -> usize {
    if knots.len() < 2 * (degree + 1) {
        return 0;
    }
    (degree..knots.len() - degree - 1)
        .filter(|&i| knots[i + 1] > knots[i])
        .count()
}

/// Find the knot span index for parameter `t` in the knot vector.
///
/// Returns the index `i` such that `knots[i] <= t < knots[i+1]`,
/// with special handling for the upper boundary.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector
/// * `n` - Number of control points minus 1
/// * `t` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[degree] {
        return degree;
    }

    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Compute the non-vanishing basis functions at parameter `t`.
///
/// Returns a vector of `degree + 1` basis function values N_{span-degree,degree}(t)
/// through N_{span,degree}(t).
pub fn basis_functions(degree: usize, knots: &[f64], span: usize, t: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];

    n[0] = 1.0;

    for j in 1..=degree {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;

        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }

        n[j] = saved;
    }

    n
}

/// Compute basis functions and their derivatives up to `order` at parameter `t`.
///
/// Row `k` of the result holds the `k`-th derivatives of the `degree + 1`
/// non-vanishing basis functions. Rows with `k > degree` are zero.
#[allow(clippy::needless_range_loop)]
pub fn ders_basis_functions(
    degree: usize,
    knots: &[f64],
    span: usize,
    t: f64,
    order: usize,
) -> Vec<Vec<f64>> {
    let p = degree;
    let n = order.min(p);
    let mut ders = vec![vec![0.0; p + 1]; order + 1];

    // Triangular table: basis values in the upper triangle, knot differences in the lower
    let mut ndu = vec![vec![0.0; p + 1]; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];

    ndu[0][0] = 1.0;

    for j in 1..=p {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;

        for r in 0..j {
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ndu[r][j - 1] / ndu[j][r];

            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }

    let mut a = vec![vec![0.0; p + 1]; 2];

    for r in 0..=p {
        let mut s1 = 0usize;
        let mut s2 = 1usize;
        a[0][0] = 1.0;

        for k in 1..=n {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = p - k;

            if rk >= 0 {
                let rk = rk as usize;
                a[s2][0] = a[s1][0] / ndu[pk + 1][rk];
                d = a[s2][0] * ndu[rk][pk];
            }

            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r <= pk + 1 { k - 1 } else { p - r };

            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                a[s2][j] = (a[s1][j] - a[s1][j - 1]) / ndu[pk + 1][idx];
                d += a[s2][j] * ndu[idx][pk];
            }

            if r <= pk {
                a[s2][k] = -a[s1][k - 1] / ndu[pk + 1][r];
                d += a[s2][k] * ndu[r][pk];
            }

            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    // Multiply through by p! / (p - k)!
    let mut factor = p as f64;
    for k in 1..=n {
        for val in &mut ders[k] {
            *val *= factor;
        }
        factor *= (p - k) as f64;
    }

    ders
}
