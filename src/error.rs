//! Error types for checked model access and structural validation.

use thiserror::Error;

/// Errors returned by the checked (`try_*`) operations and fallible constructors.
///
/// The unchecked hot-path operations never return these; they treat the same conditions
/// as caller contracts and only assert them in debug builds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BqmError {
    /// A variable index is outside `0..num_variables`.
    #[error("variable {variable} is out of range for a model with {num_variables} variables")]
    VariableOutOfRange {
        /// The offending index.
        variable: usize,
        /// Number of variables in the model.
        num_variables: usize,
    },

    /// An interaction was requested between a variable and itself.
    #[error("variable {variable} cannot interact with itself")]
    SelfInteraction {
        /// The repeated index.
        variable: usize,
    },

    /// No interaction exists between `u` and `v`.
    #[error("no interaction between {u} and {v}")]
    MissingInteraction {
        /// First endpoint.
        u: usize,
        /// Second endpoint.
        v: usize,
    },

    /// The model has no variables to remove.
    #[error("model has no variables")]
    Empty,

    /// A dense bias array does not hold `num_variables * num_variables` entries.
    #[error("dense array has {len} entries; expected {num_variables}^2")]
    DenseShape {
        /// Length of the supplied array.
        len: usize,
        /// Requested number of variables.
        num_variables: usize,
    },
}

/// A broken structural invariant, reported by [`crate::validate::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A neighborhood references a variable that does not exist.
    #[error("variable {variable} lists neighbor {neighbor}, but the model has {num_variables} variables")]
    NeighborOutOfRange {
        /// Owner of the neighborhood.
        variable: usize,
        /// The out-of-range neighbor.
        neighbor: usize,
        /// Number of variables in the model.
        num_variables: usize,
    },

    /// A variable appears in its own neighborhood.
    #[error("variable {variable} lists itself as a neighbor")]
    SelfLoop {
        /// The offending variable.
        variable: usize,
    },

    /// A neighborhood is not strictly increasing by neighbor index.
    #[error("neighborhood of {variable} is not strictly sorted at position {position}")]
    Unsorted {
        /// Owner of the neighborhood.
        variable: usize,
        /// First position `i` with `neighbor[i] >= neighbor[i + 1]`.
        position: usize,
    },

    /// The two stored copies of an interaction disagree, or one is missing.
    #[error("interaction ({u}, {v}) is not mirrored with an identical bias in {v}'s neighborhood")]
    Asymmetric {
        /// Endpoint whose entry was inspected.
        u: usize,
        /// Endpoint missing the matching entry.
        v: usize,
    },
}
