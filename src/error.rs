use std::fmt;

/// Error types for the root finders
///
/// Failures raised after the target function has been evaluated carry the
/// last evaluated pair, see [`RootError::point`].
#[derive(Debug, Clone, PartialEq)]
pub enum RootError {
    /// `|f(x)|` exceeded the caller supplied limit, most likely a pole.
    Discontinuity { x: f64, fx: f64, limit: f64 },
    /// The forward scan ran past `xmax` without a sign change.
    NoRoot { xmin: f64, xmax: f64, x: f64, fx: f64 },
    /// Bracket refinement used more than `icut` extra evaluations.
    IterationLimit { icut: usize, x: f64, fx: f64 },
    /// The bracket-first driver left `[x_init, x_final]`.
    OutOfRange {
        x_init: f64,
        x_final: f64,
        x: f64,
        fx: f64,
    },
    /// Plain direct substitution ran out of iterations; `residual` is
    /// `|g(x) - x|` at the last evaluated `x`.
    NotConverged {
        iters: usize,
        x: f64,
        gx: f64,
        residual: f64,
    },
    InvalidStepSize,
    InvalidTolerance,
}

impl RootError {
    /// Last evaluated `(x, f(x))`, if the failure happened after an evaluation
    pub fn point(&self) -> Option<(f64, f64)> {
        match *self {
            RootError::Discontinuity { x, fx, .. }
            | RootError::NoRoot { x, fx, .. }
            | RootError::IterationLimit { x, fx, .. }
            | RootError::OutOfRange { x, fx, .. } => Some((x, fx)),
            RootError::NotConverged { x, gx, .. } => Some((x, gx)),
            RootError::InvalidStepSize | RootError::InvalidTolerance => None,
        }
    }

    pub fn is_discontinuity(&self) -> bool {
        matches!(self, RootError::Discontinuity { .. })
    }
}

impl fmt::Display for RootError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RootError::Discontinuity { x, fx, limit } => write!(
                f,
                "f({:15.6e}) = {:15.6e} exceeds limit {:15.6e}, may be a discontinuous point",
                x, fx, limit
            ),
            RootError::NoRoot { xmin, xmax, .. } => {
                write!(f, "No root between {:15.6e} and {:15.6e}", xmin, xmax)
            }
            RootError::IterationLimit { icut, .. } => {
                write!(f, "The number of iterations exceeds icut = {:4}", icut)
            }
            RootError::OutOfRange { x_init, x_final, x, .. } => write!(
                f,
                "Point {:15.6e} left the search interval [{:15.6e}, {:15.6e}]",
                x, x_init, x_final
            ),
            RootError::NotConverged {
                iters, x, residual, ..
            } => write!(
                f,
                "Not converged in {:4} iterations, last x = {:13.6e}, last change = {:10.3e}",
                iters, x, residual
            ),
            RootError::InvalidStepSize => write!(f, "Step size must be non-zero and finite"),
            RootError::InvalidTolerance => write!(f, "Tolerance must be positive"),
        }
    }
}

impl std::error::Error for RootError {}

/// Error types for the quadrature routines
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError {
    FunctionEvaluationError { x: f64 },
    InvalidTolerance,
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntegrationError::FunctionEvaluationError { x } => {
                write!(f, "Integrand returned a non-finite value at x = {}", x)
            }
            IntegrationError::InvalidTolerance => write!(f, "Tolerance must be positive"),
        }
    }
}

impl std::error::Error for IntegrationError {}
