//! # adjbqm
//!
//! Storage engines for binary quadratic models (BQMs): sparse weighted undirected graphs
//! where every variable carries a linear bias and every interaction between two distinct
//! variables carries a quadratic bias.
//!
//! This crate provides:
//! - [`AdjVectorBqm`], a mutable model stored as per-variable sorted neighborhoods. Each
//!   interaction is stored in both endpoints' neighborhoods, so neighbor scans are a single
//!   contiguous sweep and point lookups are binary searches.
//! - [`AdjArrayBqm`], a frozen compressed layout with a fixed interaction structure.
//! - [`BqmView`], the read contract both implement, used for copying between
//!   representations and for validation.
//!
//! ## Quick Start
//!
//! ```
//! use adjbqm::AdjVectorBqm;
//!
//! let mut bqm = AdjVectorBqm::<usize, f64>::new();
//! let a = bqm.add_variable();
//! let b = bqm.add_variable();
//! let c = bqm.add_variable();
//!
//! bqm.set_linear(a, 1.5);
//! bqm.set_quadratic(a, b, 2.0);
//! bqm.set_quadratic(b, c, -1.0);
//!
//! assert_eq!(bqm.degree(b), 2);
//! assert_eq!(bqm.get_quadratic(c, b), (-1.0, true));
//! assert_eq!(bqm.get_quadratic(a, c), (0.0, false));
//!
//! // Only the last variable can be removed; its interactions go with it.
//! assert_eq!(bqm.pop_variable(), 2);
//! assert_eq!(bqm.shape(), (2, 1));
//! ```
//!
//! ## Dense Construction
//!
//! ```
//! use adjbqm::AdjVectorBqm;
//!
//! // Upper and lower triangles are summed; zero sums create no interaction.
//! let dense = [
//!     1.0, 0.5, 0.0,
//!     0.5, 2.0, 1.0,
//!     0.0, -1.0, 3.0,
//! ];
//! let bqm = AdjVectorBqm::<usize, f64>::from_dense(&dense, 3, false).unwrap();
//! assert_eq!(bqm.get_quadratic(0, 1), (1.0, true));
//! assert_eq!(bqm.get_quadratic(1, 2), (0.0, false));
//! assert_eq!(bqm.get_linear(2), 3.0);
//! ```
//!
//! ## Modules
//!
//! - [`adjvector`]: the mutable adjacency-vector model.
//! - [`adjarray`]: the frozen adjacency-array model.
//! - [`sorted`]: sorted-map-as-contiguous-sequence helpers used by every neighborhood.
//! - [`validate`]: structural invariant checks for any [`BqmView`].
//!
//! ## Contracts
//!
//! Index-range checks, `u != v` for interactions, and non-empty `pop_variable` are caller
//! contracts asserted only in debug builds. The `try_*` methods validate at runtime and
//! return [`BqmError`] instead. Mutation is not synchronized; share a model across threads
//! behind a lock.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)] // Intentional for hot-path code
#![allow(clippy::many_single_char_names)] // Mathematical variable names
#![allow(clippy::multiple_crate_versions)] // Cargo.lock management is external

pub mod adjarray;
pub mod adjvector;
pub mod error;
pub mod sorted;
pub mod types;
pub mod validate;
pub mod view;

pub use adjarray::AdjArrayBqm;
pub use adjvector::{AdjVectorBqm, NeighborhoodMut, NeighborsMut};
pub use error::{BqmError, InvariantViolation};
pub use types::{Bias, Variable};
pub use view::BqmView;

/// Re-export commonly used types for convenience.
pub mod prelude {
    pub use crate::adjarray::AdjArrayBqm;
    pub use crate::adjvector::AdjVectorBqm;
    pub use crate::error::{BqmError, InvariantViolation};
    pub use crate::types::{Bias, Variable};
    pub use crate::validate::check_invariants;
    pub use crate::view::BqmView;
}
