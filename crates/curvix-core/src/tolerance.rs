/// Numeric tolerances shared by evaluation, inversion and differential queries.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Slack allowed outside a parameter domain before it is rejected
    pub parameter: f64,
    /// Newton-Raphson convergence threshold on the orthogonality residual
    pub residual: f64,
    /// Derivative norms below this are treated as zero
    pub degenerate: f64,
}

impl Tolerance {
    pub const DEFAULT_PARAMETER: f64 = f64::EPSILON * 16.0;
    pub const DEFAULT_RESIDUAL: f64 = f64::EPSILON * 100.0;
    pub const DEFAULT_DEGENERATE: f64 = f64::EPSILON;

    /// Recursion depth of the coarse-to-fine inversion search.
    pub const DEFAULT_INVERSION_LEVEL: u32 = 3;
    pub const NEWTON_MAX_ITERATIONS: usize = 10;

    /// Retry budget for nudging a degenerate turning-angle derivative.
    pub const TURNING_ANGLE_RETRIES: usize = 10;
    /// Fraction of the interval a degenerate end parameter is moved per retry.
    pub const TURNING_ANGLE_NUDGE: f64 = 1e-3;

    pub fn default_precision() -> Self {
        Self {
            parameter: Self::DEFAULT_PARAMETER,
            residual: Self::DEFAULT_RESIDUAL,
            degenerate: Self::DEFAULT_DEGENERATE,
        }
    }

    /// Check if `t` lies in `[lower, upper]` widened by the parameter slack
    pub fn in_interval(self, t: f64, lower: f64, upper: f64) -> bool {
        t >= lower - self.parameter && t <= upper + self.parameter
    }

    /// Check if a residual is small enough to stop iterating
    pub fn is_converged(self, residual: f64) -> bool {
        residual.abs() < self.residual
    }

    /// Check if a vector norm is effectively zero
    pub fn is_degenerate(self, norm: f64) -> bool {
        norm < self.degenerate
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
