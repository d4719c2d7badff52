//! Read contract shared by every BQM representation.

use crate::types::{Bias, Variable};

/// Read-only access to a binary quadratic model.
///
/// Anything implementing this trait can seed a new [`crate::AdjVectorBqm`] or
/// [`crate::AdjArrayBqm`] and can be checked with [`crate::validate::check_invariants`].
///
/// Implementors must return each neighborhood sorted strictly ascending by neighbor,
/// without self-loops, and with every entry mirrored in the neighbor's neighborhood.
pub trait BqmView<V: Variable, B: Bias> {
    /// Number of variables.
    fn num_variables(&self) -> usize;

    /// Linear bias of `v`.
    fn get_linear(&self, v: V) -> B;

    /// Sorted `(neighbor, bias)` entries of `v`.
    fn neighborhood(&self, v: V) -> &[(V, B)];

    /// Number of distinct interactions.
    ///
    /// The default sums every neighborhood length and halves it.
    fn num_interactions(&self) -> usize {
        let total: usize = (0..self.num_variables())
            .map(|v| self.neighborhood(V::from_index(v)).len())
            .sum();
        total / 2
    }
}
