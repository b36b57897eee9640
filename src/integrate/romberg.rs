use crate::error::IntegrationError;
use crate::roots::ObjFn;
use std::fmt;
use tracing::{debug, trace};

/// Result of a Romberg integration
#[derive(Debug, Clone, PartialEq)]
pub struct RombergResult {
    pub area: f64,
    /// Number of trapezoid refinements performed
    pub levels: usize,
    pub fn_evals: usize,
    pub converged: bool,
}

#[derive(Clone)]
pub struct Romberg {
    f: Box<dyn ObjFn>,
    area: f64,
    converged: bool,
}

impl Romberg {
    /// Maximum number of rows in the Romberg table
    pub const MAX_LEVELS: usize = 20;

    pub fn new<F>(f: F) -> Self
    where
        F: ObjFn + 'static,
    {
        Self::new_boxed(Box::new(f))
    }

    pub fn new_boxed(f: Box<dyn ObjFn>) -> Self {
        Romberg {
            f,
            area: 0.0,
            converged: false,
        }
    }

    fn eval(&self, x: f64) -> Result<f64, IntegrationError> {
        let fx = self.f.call_scalar(x);
        if !fx.is_finite() {
            return Err(IntegrationError::FunctionEvaluationError { x });
        }
        Ok(fx)
    }

    /// Integrate `f` over `[a, b]`.
    ///
    /// Halves the trapezoid step at every level and extrapolates the row with
    /// Richardson's `4^m` weights. Stops once two successive extrapolated
    /// values agree to `tol` relative to the latest one.
    ///
    /// # Errors
    /// * `InvalidTolerance` if `tol <= 0`
    /// * `FunctionEvaluationError` if the integrand is not finite at a node
    pub fn integrate(&mut self, a: f64, b: f64, tol: f64) -> Result<RombergResult, IntegrationError> {
        if !(tol > 0.0) {
            return Err(IntegrationError::InvalidTolerance);
        }
        self.converged = false;

        // row[m] holds the m-times extrapolated value of the current level
        let mut row = [0.0; Self::MAX_LEVELS];
        let mut h = b - a;
        row[0] = 0.5 * (self.eval(a)? + self.eval(b)?) * h;
        let mut fn_evals = 2;
        let mut area = row[0];
        let mut nodes = 1;
        trace!(level = 0, area, "romberg");

        for level in 1..Self::MAX_LEVELS {
            let previous = area;
            let mut sum = 0.0;
            let mut x = a + 0.5 * h;
            for _ in 0..nodes {
                sum += self.eval(x)?;
                x += h;
            }
            fn_evals += nodes;

            let mut trapezoid = 0.5 * (row[0] + h * sum);
            let mut weight = 1.0;
            for m in 1..=level {
                weight *= 4.0;
                let extrapolated = trapezoid + (trapezoid - row[m - 1]) / (weight - 1.0);
                row[m - 1] = trapezoid;
                trapezoid = extrapolated;
            }
            row[level] = trapezoid;
            area = trapezoid;
            trace!(level, ?row, "romberg");

            if (previous - area).abs() < tol * area.abs() {
                debug!(level, area, fn_evals, "romberg converged");
                self.area = area;
                self.converged = true;
                return Ok(RombergResult {
                    area,
                    levels: level,
                    fn_evals,
                    converged: true,
                });
            }
            h *= 0.5;
            nodes *= 2;
        }

        debug!(area, fn_evals, "romberg did not converge");
        self.area = area;
        Ok(RombergResult {
            area,
            levels: Self::MAX_LEVELS - 1,
            fn_evals,
            converged: false,
        })
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl fmt::Debug for Romberg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Romberg( area: {}, converged: {})",
            self.area, self.converged
        )
    }
}

/// Area under `f` on `[a, b]`, best effort.
///
/// Returns `NaN` when the integrand is not finite at a node or `tol` is not
/// positive.
pub fn integrate<F>(a: f64, b: f64, f: F, tol: f64) -> f64
where
    F: ObjFn + 'static,
{
    Romberg::new(f)
        .integrate(a, b, tol)
        .map_or(f64::NAN, |result| result.area)
}
