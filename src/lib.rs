//! Small numerical toolkit: scalar root finding and Romberg quadrature.
//!
//! ```
//! use numkit::prelude::*;
//!
//! let mut finder = RootFinder::new(|x: f64| x * x - 2.0)
//!     .with_options(RootOptions::new().with_step(0.1));
//! let result = finder.solve(1.0).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.x - 2_f64.sqrt()).abs() < 1e-6);
//! ```
pub mod error;
pub mod integrate;
pub mod prelude;
pub mod roots;
