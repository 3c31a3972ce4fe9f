//! Point projection onto curves: coarse-to-fine sampling plus Newton-Raphson.
//!
//! Only the public [`Curve`] contract is used, so the same search serves
//! polynomial and rational variants alike.

use curvix_core::{Result, Tolerance};
use curvix_math::Point;
use log::trace;

use super::Curve;

/// Find the parameter in `[lower, upper]` minimizing `|point - C(t)|^2`.
///
/// Samples `num_samples + 1` evenly spaced parameters, keeps the closest,
/// and recurses on the bracket one sample spacing either side of it until
/// `level` reaches zero. The final best sample seeds [`newton_raphson`].
pub fn approximate_inverse_evaluate<const D: usize, C>(
    curve: &C,
    point: &Point<D>,
    num_samples: usize,
    lower: f64,
    upper: f64,
    level: u32,
) -> Result<f64>
where
    C: Curve<D> + ?Sized,
{
    let num_samples = num_samples.max(1);
    let delta_t = (upper - lower) / num_samples as f64;

    let mut min_t = lower;
    let mut min_dist = f64::INFINITY;
    for i in 0..=num_samples {
        let t = lower + i as f64 / num_samples as f64 * (upper - lower);
        let dist = (point - curve.evaluate(t)?).norm_squared();
        if dist < min_dist {
            min_dist = dist;
            min_t = t;
        }
    }

    if level == 0 {
        newton_raphson(
            curve,
            point,
            min_t,
            Tolerance::NEWTON_MAX_ITERATIONS,
            curve.tolerance(),
            lower,
            upper,
        )
    } else {
        approximate_inverse_evaluate(
            curve,
            point,
            num_samples,
            (min_t - delta_t).max(lower),
            (min_t + delta_t).min(upper),
            level - 1,
        )
    }
}

/// Polish a seed parameter by Newton-Raphson on the orthogonality residual
/// `f(t) = (point - C(t)) . C'(t)`.
///
/// Never fails numerically; it stops with the best parameter it has when
/// * `|f(t)|` is below `tol.residual` (converged),
/// * `|f(t)|` grew since the previous step (returns the previous `t`),
/// * a step lands on or beyond `lower`/`upper` (returns that bound),
/// * `f'(t)` is zero or not finite,
/// * `max_iterations` is spent (returns the last `t`).
pub fn newton_raphson<const D: usize, C>(
    curve: &C,
    point: &Point<D>,
    mut t: f64,
    max_iterations: usize,
    tol: Tolerance,
    lower: f64,
    upper: f64,
) -> Result<f64>
where
    C: Curve<D> + ?Sized,
{
    let mut prev_t = t;
    let mut prev_err: Option<f64> = None;

    for _ in 0..max_iterations {
        let d0 = curve.evaluate(t)?;
        let d1 = curve.evaluate_derivative(t)?;
        let d2 = curve.evaluate_2nd_derivative(t)?;

        let diff = point - d0;
        let f = diff.dot(&d1);
        let df = diff.dot(&d2) - d1.norm_squared();
        let err = f.abs();

        if tol.is_converged(err) {
            trace!("newton_raphson converged at t={} (residual {:e})", t, err);
            return Ok(t);
        }
        if let Some(prev) = prev_err {
            if err > prev {
                trace!("newton_raphson diverged at t={}, keeping t={}", t, prev_t);
                return Ok(prev_t);
            }
        }
        if df == 0.0 || !df.is_finite() {
            trace!("newton_raphson stalled at t={}: f'={}", t, df);
            return Ok(t);
        }

        prev_err = Some(err);
        prev_t = t;

        t -= f / df;
        if t <= lower {
            trace!("newton_raphson left the bracket, clamped to {}", lower);
            return Ok(lower);
        }
        if t >= upper {
            trace!("newton_raphson left the bracket, clamped to {}", upper);
            return Ok(upper);
        }
    }

    trace!("newton_raphson spent {} iterations, t={}", max_iterations, t);
    Ok(t)
}
