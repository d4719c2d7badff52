//! Adjacency-array BQM: a frozen, compressed layout of a model.
//!
//! All neighborhoods live back to back in one flat array; each variable keeps only an
//! offset into it plus its linear bias. Biases can be rewritten in place, but the
//! interaction structure is fixed at construction.

use crate::adjvector::AdjVectorBqm;
use crate::sorted;
use crate::types::{Bias, Variable};
use crate::view::BqmView;

/// A binary quadratic model with a fixed interaction structure.
///
/// Representation:
/// - `invars[v] = (offset, linear)`: `v`'s neighborhood starts at `outvars[offset]`.
/// - `outvars` holds every neighborhood contiguously, each sorted by neighbor.
///
/// The neighborhood of `v` ends where `v + 1`'s begins (or at the end of `outvars`).
#[derive(Clone, Debug, PartialEq)]
pub struct AdjArrayBqm<V = usize, B = f64> {
    invars: Vec<(usize, B)>,
    outvars: Vec<(V, B)>,
}

impl<V: Variable, B: Bias> Default for AdjArrayBqm<V, B> {
    fn default() -> Self {
        Self {
            invars: Vec::new(),
            outvars: Vec::new(),
        }
    }
}

impl<V: Variable, B: Bias> AdjArrayBqm<V, B> {
    /// Freezes any model exposing the [`BqmView`] contract.
    pub fn from_bqm<Q: BqmView<V, B> + ?Sized>(bqm: &Q) -> Self {
        let num_variables = bqm.num_variables();
        let mut invars = Vec::with_capacity(num_variables);
        let mut outvars = Vec::with_capacity(2 * bqm.num_interactions());

        for i in 0..num_variables {
            let v = V::from_index(i);
            invars.push((outvars.len(), bqm.get_linear(v)));
            outvars.extend_from_slice(bqm.neighborhood(v));
        }

        tracing::debug!(
            num_variables,
            num_interactions = outvars.len() / 2,
            "froze model into adjacency array"
        );
        Self { invars, outvars }
    }

    /// Number of variables.
    #[inline(always)]
    pub fn num_variables(&self) -> usize {
        self.invars.len()
    }

    /// Number of interactions, `O(1)`.
    #[inline(always)]
    pub fn num_interactions(&self) -> usize {
        self.outvars.len() / 2
    }

    /// Returns `(num_variables, num_interactions)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_variables(), self.num_interactions())
    }

    /// Number of distinct neighbors of `v`.
    #[inline]
    pub fn degree(&self, v: V) -> usize {
        let (start, end) = self.span(v);
        end - start
    }

    /// Linear bias of `v`.
    #[inline(always)]
    pub fn get_linear(&self, v: V) -> B {
        debug_assert!(v.index() < self.invars.len(), "variable {v} out of range");
        self.invars[v.index()].1
    }

    /// Overwrites the linear bias of `v`.
    #[inline(always)]
    pub fn set_linear(&mut self, v: V, bias: B) {
        debug_assert!(v.index() < self.invars.len(), "variable {v} out of range");
        self.invars[v.index()].1 = bias;
    }

    /// Returns `(bias, true)` if `u` and `v` interact, `(0, false)` otherwise.
    ///
    /// # Panics
    /// Panics in debug builds if `u == v` or either index is out of range.
    #[inline]
    pub fn get_quadratic(&self, u: V, v: V) -> (B, bool) {
        debug_assert!(v.index() < self.invars.len(), "variable {v} out of range");
        debug_assert!(u != v, "variable {u} cannot interact with itself");
        match sorted::get(self.neighborhood(u), v) {
            Some(&(_, bias)) => (bias, true),
            None => (B::ZERO, false),
        }
    }

    /// Overwrites both copies of an existing interaction.
    ///
    /// Returns `false` without modifying anything if `u` and `v` do not interact: the
    /// structure of an adjacency array cannot grow.
    ///
    /// # Panics
    /// Panics in debug builds if `u == v` or either index is out of range.
    pub fn set_quadratic(&mut self, u: V, v: V, bias: B) -> bool {
        debug_assert!(u != v, "variable {u} cannot interact with itself");

        let (start, end) = self.span(u);
        let Ok(pos_uv) = sorted::search(&self.outvars[start..end], v) else {
            return false;
        };
        let (start_v, end_v) = self.span(v);
        let pos_vu = sorted::search(&self.outvars[start_v..end_v], u);
        debug_assert!(pos_vu.is_ok(), "interaction ({u}, {v}) is not mirrored");
        let Ok(pos_vu) = pos_vu else {
            return false;
        };

        self.outvars[start + pos_uv].1 = bias;
        self.outvars[start_v + pos_vu].1 = bias;
        true
    }

    /// Sorted `(neighbor, bias)` entries of `u`.
    #[inline]
    pub fn neighborhood(&self, u: V) -> &[(V, B)] {
        let (start, end) = self.span(u);
        &self.outvars[start..end]
    }

    /// Returns the `(offset, linear)` records and the flat neighbor array.
    pub fn to_lists(&self) -> (Vec<(usize, B)>, Vec<(V, B)>) {
        (self.invars.clone(), self.outvars.clone())
    }

    #[inline(always)]
    fn span(&self, v: V) -> (usize, usize) {
        let i = v.index();
        debug_assert!(i < self.invars.len(), "variable {v} out of range");
        let start = self.invars[i].0;
        let end = self
            .invars
            .get(i + 1)
            .map_or(self.outvars.len(), |&(offset, _)| offset);
        (start, end)
    }
}

impl<V: Variable, B: Bias> BqmView<V, B> for AdjArrayBqm<V, B> {
    #[inline]
    fn num_variables(&self) -> usize {
        AdjArrayBqm::num_variables(self)
    }

    #[inline]
    fn get_linear(&self, v: V) -> B {
        AdjArrayBqm::get_linear(self, v)
    }

    #[inline]
    fn neighborhood(&self, v: V) -> &[(V, B)] {
        AdjArrayBqm::neighborhood(self, v)
    }

    fn num_interactions(&self) -> usize {
        AdjArrayBqm::num_interactions(self)
    }
}

impl<V: Variable, B: Bias> From<&AdjVectorBqm<V, B>> for AdjArrayBqm<V, B> {
    fn from(bqm: &AdjVectorBqm<V, B>) -> Self {
        Self::from_bqm(bqm)
    }
}

impl<V: Variable, B: Bias> From<&AdjArrayBqm<V, B>> for AdjVectorBqm<V, B> {
    fn from(bqm: &AdjArrayBqm<V, B>) -> Self {
        Self::from_bqm(bqm)
    }
}

// ============================================================================
// Tests
// ============================================================================
