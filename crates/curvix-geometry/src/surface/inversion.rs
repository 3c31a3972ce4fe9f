//! Point projection onto surfaces: grid sampling plus a 2x2 Newton step.

use curvix_core::{Result, Tolerance};
use curvix_math::{Matrix2, Point, Vector2};
use log::trace;

use super::Surface;

/// Find `(u, v)` in the box `u_range x v_range` minimizing `|point - S(u, v)|^2`.
///
/// Samples a `(nu + 1) x (nv + 1)` grid, keeps the closest sample and
/// recurses on the box one spacing around it `level` times, then polishes
/// with [`newton_raphson`].
pub fn approximate_inverse_evaluate<const D: usize, S>(
    surface: &S,
    point: &Point<D>,
    (num_u, num_v): (usize, usize),
    (u_lower, u_upper): (f64, f64),
    (v_lower, v_upper): (f64, f64),
    level: u32,
) -> Result<(f64, f64)>
where
    S: Surface<D> + ?Sized,
{
    let num_u = num_u.max(1);
    let num_v = num_v.max(1);
    let delta_u = (u_upper - u_lower) / num_u as f64;
    let delta_v = (v_upper - v_lower) / num_v as f64;

    let mut min_uv = (u_lower, v_lower);
    let mut min_dist = f64::INFINITY;
    for i in 0..=num_u {
        let u = u_lower + i as f64 / num_u as f64 * (u_upper - u_lower);
        for j in 0..=num_v {
            let v = v_lower + j as f64 / num_v as f64 * (v_upper - v_lower);
            let dist = (point - surface.evaluate(u, v)?).norm_squared();
            if dist < min_dist {
                min_dist = dist;
                min_uv = (u, v);
            }
        }
    }

    if level == 0 {
        newton_raphson(
            surface,
            point,
            min_uv,
            Tolerance::NEWTON_MAX_ITERATIONS,
            surface.tolerance(),
            (u_lower, u_upper),
            (v_lower, v_upper),
        )
    } else {
        let (u, v) = min_uv;
        approximate_inverse_evaluate(
            surface,
            point,
            (num_u, num_v),
            ((u - delta_u).max(u_lower), (u + delta_u).min(u_upper)),
            ((v - delta_v).max(v_lower), (v + delta_v).min(v_upper)),
            level - 1,
        )
    }
}

/// Newton-Raphson on the gradient of `|S(u, v) - point|^2 / 2`.
///
/// Stops when the gradient norm drops below `tol.residual`, when it grows
/// (returning the previous iterate), when the Jacobian is singular, when a
/// step lands on or beyond the box (returning the step clamped onto it), or
/// when `max_iterations` is spent.
pub fn newton_raphson<const D: usize, S>(
    surface: &S,
    point: &Point<D>,
    (mut u, mut v): (f64, f64),
    max_iterations: usize,
    tol: Tolerance,
    (u_lower, u_upper): (f64, f64),
    (v_lower, v_upper): (f64, f64),
) -> Result<(f64, f64)>
where
    S: Surface<D> + ?Sized,
{
    let mut prev = (u, v);
    let mut prev_err: Option<f64> = None;

    for _ in 0..max_iterations {
        let r = surface.evaluate(u, v)? - point;
        let su = surface.evaluate_derivative_u(u, v)?;
        let sv = surface.evaluate_derivative_v(u, v)?;
        let [suu, suv, svv] = surface.evaluate_2nd_derivatives(u, v)?;

        let f = Vector2::new(r.dot(&su), r.dot(&sv));
        let err = f.norm();
        if tol.is_converged(err) {
            trace!("surface newton converged at ({}, {}) (residual {:e})", u, v, err);
            return Ok((u, v));
        }
        if let Some(prev_err) = prev_err {
            if err > prev_err {
                trace!("surface newton diverged at ({}, {}), keeping {:?}", u, v, prev);
                return Ok(prev);
            }
        }

        let cross = su.dot(&sv) + r.dot(&suv);
        let jacobian = Matrix2::new(
            su.norm_squared() + r.dot(&suu),
            cross,
            cross,
            sv.norm_squared() + r.dot(&svv),
        );
        let Some(inverse) = jacobian.try_inverse() else {
            trace!("surface newton stalled at ({}, {}): singular jacobian", u, v);
            return Ok((u, v));
        };
        let step = inverse * f;
        if !step.iter().all(|s| s.is_finite()) {
            trace!("surface newton stalled at ({}, {}): non-finite step", u, v);
            return Ok((u, v));
        }

        prev_err = Some(err);
        prev = (u, v);
        u -= step.x;
        v -= step.y;

        let clamped_u = u.max(u_lower).min(u_upper);
        let clamped_v = v.max(v_lower).min(v_upper);
        let on_boundary = u <= u_lower || u >= u_upper || v <= v_lower || v >= v_upper;
        if on_boundary {
            trace!(
                "surface newton reached the box at ({}, {}), clamped to ({}, {})",
                u,
                v,
                clamped_u,
                clamped_v
            );
            return Ok((clamped_u, clamped_v));
        }
    }

    trace!("surface newton spent {} iterations at ({}, {})", max_iterations, u, v);
    Ok((u, v))
}
