//! numkit prelude.
//!
//! This module contains the most used types, traits and functions that you
//! can import easily as a group.
//!
//! ```
//! use numkit::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use crate::error::{IntegrationError, RootError};

#[doc(no_inline)]
pub use crate::integrate::{integrate, Romberg, RombergResult};

#[doc(no_inline)]
pub use crate::roots::{
    estimate, BracketSearch, EstimatorState, FixedPoint, Method, ObjFn, Refinement, RootFinder,
    RootOptions, RootResult, ScanEntry, ScanKind, SearchResult, SingleDimFn, Step,
};
