//! Curvature, turning angle, and the planar polynomial root finding behind
//! the topological queries of low-degree Bezier curves.

use curvix_core::{CurvixError, Result, Tolerance};
use curvix_math::{Point, Point2};
use log::debug;

use super::Curve;

/// Curvature vector `(d2 - d1 (d1.d2)/|d1|^2) / |d1|^2`.
///
/// Returns the zero vector at a stationary point (`|d1| == 0`).
pub fn curvature<const D: usize>(d1: &Point<D>, d2: &Point<D>) -> Point<D> {
    let sq_speed = d1.norm_squared();
    if sq_speed == 0.0 {
        return Point::<D>::zeros();
    }
    (*d2 - *d1 * (d1.dot(d2) / sq_speed)) / sq_speed
}

/// Signed angle from `C'(t0)` to `C'(t1)` for a planar curve.
///
/// A vanishing end derivative is retried a bounded number of times, moving
/// that end towards the other by a small fraction of the interval. When the
/// retries run out the angle is computed from whatever derivative remains.
pub fn turning_angle<const D: usize, C>(curve: &C, mut t0: f64, mut t1: f64) -> Result<f64>
where
    C: Curve<D> + ?Sized,
{
    if D != 2 {
        return Err(CurvixError::Dimensionality {
            expected: 2,
            actual: D,
        });
    }

    let tol = curve.tolerance();
    let mut d0 = curve.evaluate_derivative(t0)?;
    let mut d1 = curve.evaluate_derivative(t1)?;

    let mut retries = 0;
    while retries < Tolerance::TURNING_ANGLE_RETRIES && tol.is_degenerate(d0.norm()) {
        t0 += (t1 - t0) * Tolerance::TURNING_ANGLE_NUDGE;
        d0 = curve.evaluate_derivative(t0)?;
        retries += 1;
    }
    if tol.is_degenerate(d0.norm()) {
        debug!("turning angle: start derivative still degenerate at t={}", t0);
    }

    let mut retries = 0;
    while retries < Tolerance::TURNING_ANGLE_RETRIES && tol.is_degenerate(d1.norm()) {
        t1 -= (t1 - t0) * Tolerance::TURNING_ANGLE_NUDGE;
        d1 = curve.evaluate_derivative(t1)?;
        retries += 1;
    }
    if tol.is_degenerate(d1.norm()) {
        debug!("turning angle: end derivative still degenerate at t={}", t1);
    }

    Ok((d0[0] * d1[1] - d0[1] * d1[0]).atan2(d0[0] * d1[0] + d0[1] * d1[1]))
}

fn cross(a: &Point2, b: &Point2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Real roots of `a t^2 + b t + c`, ascending. Degenerates to the linear case
/// when `a` vanishes; an identically zero polynomial has no isolated roots.
pub(crate) fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    let scale = a.abs().max(b.abs()).max(c.abs());
    if scale == 0.0 {
        return Vec::new();
    }
    let eps = scale * 1e-12;

    if a.abs() <= eps {
        if b.abs() <= eps {
            return Vec::new();
        }
        return vec![-c / b];
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    // Citardauq form avoids cancellation between -b and sqrt(disc)
    let q = -0.5 * (b + b.signum() * disc.sqrt());
    let mut roots = if q == 0.0 {
        vec![0.0]
    } else {
        vec![q / a, c / q]
    };
    roots.sort_by(|x, y| x.total_cmp(y));
    roots.dedup_by(|x, y| (*x - *y).abs() <= 1e-12);
    roots
}

/// Pads power coefficients of a degree <= 3 planar curve to `[d, c, b, a]`
/// with `C(t) = a t^3 + b t^2 + c t + d`.
fn cubic_coefficients(power: &[Point2]) -> [Point2; 4] {
    let mut out = [Point2::zeros(); 4];
    for (slot, coeff) in out.iter_mut().zip(power) {
        *slot = *coeff;
    }
    out
}

/// Inflection parameters of a planar polynomial of degree <= 3, strictly
/// inside `(lower, upper)`.
///
/// `C' x C''` reduces to `-6 (a x b) t^2 + 6 (c x a) t + 2 (c x b)`; only
/// simple roots change the sign of the curvature.
pub(crate) fn planar_cubic_inflections(power: &[Point2], lower: f64, upper: f64) -> Vec<f64> {
    let [_, c, b, a] = cubic_coefficients(power);
    let qa = -6.0 * cross(&a, &b);
    let qb = 6.0 * cross(&c, &a);
    let qc = 2.0 * cross(&c, &b);

    let disc = qb * qb - 4.0 * qa * qc;
    let scale = (qb * qb).max((4.0 * qa * qc).abs());
    if qa != 0.0 && disc.abs() <= scale * 1e-12 {
        // Double root: the curvature touches zero without changing sign
        return Vec::new();
    }

    quadratic_roots(qa, qb, qc)
        .into_iter()
        .filter(|&t| t > lower && t < upper)
        .collect()
}

/// Parameters in `[lower, upper]` where both components of `C'` vanish.
pub(crate) fn planar_cubic_singularities(power: &[Point2], lower: f64, upper: f64) -> Vec<f64> {
    let [_, c, b, a] = cubic_coefficients(power);
    // C'(t) = 3a t^2 + 2b t + c, per component
    let dx = [3.0 * a.x, 2.0 * b.x, c.x];
    let dy = [3.0 * a.y, 2.0 * b.y, c.y];
    let eval = |q: &[f64; 3], t: f64| (q[0] * t + q[1]) * t + q[2];
    let scale = dx.iter().chain(&dy).fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return Vec::new();
    }
    let eps = scale * 1e-9;

    let x_flat = dx.iter().all(|v| v.abs() <= eps);
    let (roots, other) = if x_flat {
        (quadratic_roots(dy[0], dy[1], dy[2]), dx)
    } else {
        (quadratic_roots(dx[0], dx[1], dx[2]), dy)
    };

    roots
        .into_iter()
        .filter(|&t| t >= lower && t <= upper)
        .filter(|&t| eval(&other, t).abs() <= eps)
        .collect()
}

/// Parameters strictly inside `(lower, upper)` where the tangent is
/// axis-aligned. Between consecutive split points the curve is monotone in
/// both x and y, so its tangent stays within one quadrant.
pub(crate) fn planar_cubic_axis_splits(power: &[Point2], lower: f64, upper: f64) -> Vec<f64> {
    let [_, c, b, a] = cubic_coefficients(power);
    let mut splits: Vec<f64> = quadratic_roots(3.0 * a.x, 2.0 * b.x, c.x)
        .into_iter()
        .chain(quadratic_roots(3.0 * a.y, 2.0 * b.y, c.y))
        .filter(|&t| t > lower && t < upper)
        .collect();
    splits.sort_by(|x, y| x.total_cmp(y));
    splits.dedup_by(|x, y| (*x - *y).abs() <= 1e-12);
    splits
}
