//! Bernstein-basis evaluation for Bezier curves and patches.

use curvix_math::ControlPoint;

/// Evaluate a Bezier polygon at `t` with de Casteljau's algorithm.
///
/// An empty polygon evaluates to zero.
pub fn de_casteljau<P: ControlPoint>(points: &[P], t: f64) -> P {
    if points.is_empty() {
        return P::zero();
    }
    let mut work = points.to_vec();
    let s = 1.0 - t;
    for level in (1..work.len()).rev() {
        for i in 0..level {
            work[i] = work[i] * s + work[i + 1] * t;
        }
    }
    work[0]
}

/// Control polygon of the derivative curve: `n * (P_{i+1} - P_i)`.
pub fn hodograph<P: ControlPoint>(points: &[P]) -> Vec<P> {
    if points.len() < 2 {
        return Vec::new();
    }
    let degree = (points.len() - 1) as f64;
    points.windows(2).map(|w| (w[1] - w[0]) * degree).collect()
}

/// Position followed by derivatives `1..=order` at `t`.
pub fn derivatives<P: ControlPoint>(points: &[P], t: f64, order: usize) -> Vec<P> {
    let mut out = Vec::with_capacity(order + 1);
    let mut polygon = points.to_vec();
    out.push(de_casteljau(&polygon, t));
    for _ in 0..order {
        polygon = hodograph(&polygon);
        out.push(de_casteljau(&polygon, t));
    }
    out
}

/// Power-basis coefficients `c_k` with `C(t) = sum c_k t^k`.
pub fn power_coefficients<P: ControlPoint>(points: &[P]) -> Vec<P> {
    let n = match points.len() {
        0 => return Vec::new(),
        len => len - 1,
    };
    (0..=n)
        .map(|k| {
            let mut sum = P::zero();
            for (i, p) in points.iter().enumerate().take(k + 1) {
                let sign = if (k - i) % 2 == 0 { 1.0 } else { -1.0 };
                sum = sum + *p * (sign * binomial(k, i));
            }
            sum * binomial(n, k)
        })
        .collect()
}

/// Partial derivatives `S^(k,l)` of a Bezier patch with `k + l <= order`.
///
/// `control_grid` is u-major with `num_v` points per u-row. Entries with
/// `k + l > order` are left at zero.
pub fn surface_derivatives<P: ControlPoint>(
    control_grid: &[P],
    num_v: usize,
    u: f64,
    v: f64,
    order: usize,
) -> Vec<Vec<P>> {
    // Row derivatives along v, then each derivative column along u
    let rows: Vec<Vec<P>> = control_grid
        .chunks(num_v)
        .map(|row| derivatives(row, v, order))
        .collect();

    let mut skl = vec![vec![P::zero(); order + 1]; order + 1];
    for l in 0..=order {
        let column: Vec<P> = rows.iter().map(|r| r[l]).collect();
        let along_u = derivatives(&column, u, order - l);
        for (k, d) in along_u.into_iter().enumerate() {
            skl[k][l] = d;
        }
    }
    skl
}

/// Control polygon of the curve running along u at fixed `v`.
pub fn iso_curve_u<P: ControlPoint>(control_grid: &[P], num_v: usize, v: f64) -> Vec<P> {
    control_grid
        .chunks(num_v)
        .map(|row| de_casteljau(row, v))
        .collect()
}

/// Control polygon of the curve running along v at fixed `u`.
pub fn iso_curve_v<P: ControlPoint>(control_grid: &[P], num_v: usize, u: f64) -> Vec<P> {
    (0..num_v)
        .map(|j| {
            let column: Vec<P> = control_grid.iter().skip(j).step_by(num_v).copied().collect();
            de_casteljau(&column, u)
        })
        .collect()
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
