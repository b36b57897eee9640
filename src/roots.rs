//! Scalar root finding: `f(x) = 0` and `x = g(x)`.
//!
//! [`BracketSearch`] scans forward for a sign change and refines it.
//! [`RootFinder`] and [`FixedPoint`] iterate [`estimate`] from a starting
//! guess, optionally inside an interval.

pub mod driver;
pub mod estimator;
pub mod objective;
pub mod search;
pub mod substitution;

pub use self::driver::{RootFinder, RootOptions, RootResult};
pub use self::estimator::{
    estimate, Bracket, EstimatorState, History, Method, Sample, Step, ACCELERATION_MIN_STEPS,
};
pub use self::objective::{ObjFn, SingleDimFn};
pub use self::search::{BracketSearch, Refinement, ScanEntry, ScanKind, SearchResult};
pub use self::substitution::FixedPoint;
