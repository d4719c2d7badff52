//! Adjacency-vector BQM: one record per variable holding its linear bias and its
//! neighborhood, a vector of `(neighbor, quadratic bias)` pairs sorted by neighbor.
//!
//! Every interaction `(u, v)` is stored twice, once in `u`'s neighborhood and once in
//! `v`'s, so a full neighbor scan is a single contiguous sweep. All mutating operations
//! update both copies.

use crate::error::BqmError;
use crate::sorted;
use crate::types::{Bias, Variable};
use crate::view::BqmView;
use std::iter::FusedIterator;

// ============================================================================
// AdjVectorBqm
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
struct VariableRecord<V, B> {
    neighbors: Vec<(V, B)>,
    linear: B,
}

impl<V, B> VariableRecord<V, B> {
    fn new(linear: B) -> Self {
        Self {
            neighbors: Vec::new(),
            linear,
        }
    }
}

/// A mutable binary quadratic model stored as per-variable sorted adjacency vectors.
///
/// Representation:
/// - `adj[v].linear` is the linear bias of `v`.
/// - `adj[v].neighbors` holds `(u, bias)` for every neighbor `u`, strictly ascending by `u`,
///   never containing `v` itself.
/// - `(u, b)` in `adj[v].neighbors` iff `(v, b)` in `adj[u].neighbors`, with bit-identical `b`.
///
/// Variables are dense indices `0..num_variables()`. New variables are appended and only the
/// last one can be removed, so no surviving variable is ever relabeled.
///
/// Index-range and `u != v` preconditions are checked with `debug_assert!` only. Use the
/// `try_*` methods when inputs are untrusted.
#[derive(Clone, Debug, PartialEq)]
pub struct AdjVectorBqm<V = usize, B = f64> {
    adj: Vec<VariableRecord<V, B>>,
}

impl<V: Variable, B: Bias> Default for AdjVectorBqm<V, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variable, B: Bias> AdjVectorBqm<V, B> {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self { adj: Vec::new() }
    }

    /// Creates a model with `num_variables` disconnected variables, all with zero bias.
    pub fn with_variables(num_variables: usize) -> Self {
        let mut adj = Vec::with_capacity(num_variables);
        adj.resize_with(num_variables, || VariableRecord::new(B::ZERO));
        Self { adj }
    }

    /// Copies any model exposing the [`BqmView`] contract.
    ///
    /// Every linear bias and every neighborhood entry is reproduced exactly.
    pub fn from_bqm<Q: BqmView<V, B> + ?Sized>(bqm: &Q) -> Self {
        let adj: Vec<_> = (0..bqm.num_variables())
            .map(|i| {
                let v = V::from_index(i);
                VariableRecord {
                    neighbors: bqm.neighborhood(v).to_vec(),
                    linear: bqm.get_linear(v),
                }
            })
            .collect();
        let out = Self { adj };
        tracing::debug!(
            num_variables = out.num_variables(),
            num_interactions = out.num_interactions(),
            "copied model"
        );
        out
    }

    /// Builds a model from a row-major `num_variables x num_variables` bias matrix.
    ///
    /// The diagonal gives the linear biases unless `ignore_diagonal` is set. For every pair
    /// `i < j` the upper and lower triangle are summed, `M[i][j] + M[j][i]`, and an
    /// interaction is created only when that sum is nonzero.
    ///
    /// # Errors
    /// Returns [`BqmError::DenseShape`] if `dense.len() != num_variables^2`.
    pub fn from_dense<D>(
        dense: &[D],
        num_variables: usize,
        ignore_diagonal: bool,
    ) -> Result<Self, BqmError>
    where
        D: Copy + Into<B>,
    {
        let n = num_variables;
        if n.checked_mul(n) != Some(dense.len()) {
            return Err(BqmError::DenseShape {
                len: dense.len(),
                num_variables: n,
            });
        }

        let mut bqm = Self::with_variables(n);

        if !ignore_diagonal {
            for (v, record) in bqm.adj.iter_mut().enumerate() {
                record.linear = dense[v * (n + 1)].into();
            }
        }

        // Pairs are visited in row-major order, so both neighborhoods receive their
        // entries in ascending neighbor order and plain pushes keep them sorted.
        for u in 0..n {
            for v in (u + 1)..n {
                let upper: B = dense[u * n + v].into();
                let lower: B = dense[v * n + u].into();
                let qbias = upper + lower;
                if qbias != B::ZERO {
                    bqm.adj[u].neighbors.push((V::from_index(v), qbias));
                    bqm.adj[v].neighbors.push((V::from_index(u), qbias));
                }
            }
        }

        tracing::debug!(
            num_variables = n,
            num_interactions = bqm.num_interactions(),
            ignore_diagonal,
            "built model from dense matrix"
        );
        Ok(bqm)
    }

    // ------------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------------

    /// Appends a disconnected variable with zero bias and returns its index.
    #[inline]
    pub fn add_variable(&mut self) -> V {
        self.adj.push(VariableRecord::new(B::ZERO));
        V::from_index(self.adj.len() - 1)
    }

    /// Removes the highest-indexed variable and all of its interactions.
    ///
    /// Returns the new number of variables. Each neighbor loses its entry for the removed
    /// variable via binary search, so the cost is `O(deg(v) * log(max neighbor degree))`.
    ///
    /// # Panics
    /// Panics in debug builds if the model is empty.
    pub fn pop_variable(&mut self) -> usize {
        debug_assert!(!self.adj.is_empty(), "pop_variable called on an empty model");
        let Some(record) = self.adj.pop() else {
            return 0;
        };

        let v = V::from_index(self.adj.len());
        for &(u, _) in &record.neighbors {
            let removed = sorted::remove(&mut self.adj[u.index()].neighbors, v);
            debug_assert!(removed.is_some(), "interaction ({v}, {u}) is not mirrored");
        }

        self.adj.len()
    }

    /// Number of variables.
    #[inline(always)]
    pub fn num_variables(&self) -> usize {
        self.adj.len()
    }

    /// Returns `true` if the model has no variables.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Number of interactions, `O(num_variables)`.
    pub fn num_interactions(&self) -> usize {
        self.adj.iter().map(|r| r.neighbors.len()).sum::<usize>() / 2
    }

    /// Returns `(num_variables, num_interactions)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.num_variables(), self.num_interactions())
    }

    /// Number of distinct neighbors of `v`.
    #[inline(always)]
    pub fn degree(&self, v: V) -> usize {
        self.debug_check_variable(v);
        self.adj[v.index()].neighbors.len()
    }

    // ------------------------------------------------------------------------
    // Linear biases
    // ------------------------------------------------------------------------

    /// Linear bias of `v`.
    #[inline(always)]
    pub fn get_linear(&self, v: V) -> B {
        self.debug_check_variable(v);
        self.adj[v.index()].linear
    }

    /// Overwrites the linear bias of `v`.
    #[inline(always)]
    pub fn set_linear(&mut self, v: V, bias: B) {
        self.debug_check_variable(v);
        self.adj[v.index()].linear = bias;
    }

    /// Adds `bias` to the linear bias of `v`.
    #[inline(always)]
    pub fn add_linear(&mut self, v: V, bias: B) {
        self.debug_check_variable(v);
        self.adj[v.index()].linear += bias;
    }

    // ------------------------------------------------------------------------
    // Quadratic biases
    // ------------------------------------------------------------------------

    /// Returns `(bias, true)` if `u` and `v` interact, `(0, false)` otherwise.
    ///
    /// `O(log deg(u))`.
    ///
    /// # Panics
    /// Panics in debug builds if `u == v` or either index is out of range.
    #[inline]
    pub fn get_quadratic(&self, u: V, v: V) -> (B, bool) {
        self.debug_check_pair(u, v);
        match sorted::get(&self.adj[u.index()].neighbors, v) {
            Some(&(_, bias)) => (bias, true),
            None => (B::ZERO, false),
        }
    }

    /// Sets the quadratic bias between `u` and `v`, creating the interaction if needed.
    ///
    /// Overwriting is `O(log deg)`; creating an interaction shifts both neighborhoods and
    /// is `O(deg(u) + deg(v))`. Always returns `true`: the value was applied. The return
    /// exists for parity with [`crate::AdjArrayBqm::set_quadratic`], which cannot create
    /// interactions.
    ///
    /// # Panics
    /// Panics in debug builds if `u == v` or either index is out of range.
    #[inline]
    pub fn set_quadratic(&mut self, u: V, v: V, bias: B) -> bool {
        self.debug_check_pair(u, v);
        self.write_interaction(u, v, |_| bias);
        true
    }

    /// Adds `bias` to the quadratic bias between `u` and `v`, creating the interaction
    /// with `bias` if it does not exist.
    ///
    /// # Panics
    /// Panics in debug builds if `u == v` or either index is out of range.
    #[inline]
    pub fn add_quadratic(&mut self, u: V, v: V, bias: B) {
        self.debug_check_pair(u, v);
        self.write_interaction(u, v, |old| old.map_or(bias, |old| old + bias));
    }

    /// Removes the interaction between `u` and `v`.
    ///
    /// Returns `true` if it existed. When it does not, nothing is modified.
    ///
    /// # Panics
    /// Panics in debug builds if either index is out of range.
    pub fn remove_interaction(&mut self, u: V, v: V) -> bool {
        self.debug_check_variable(u);
        self.debug_check_variable(v);

        if sorted::remove(&mut self.adj[u.index()].neighbors, v).is_none() {
            return false;
        }
        let mirrored = sorted::remove(&mut self.adj[v.index()].neighbors, u);
        debug_assert!(mirrored.is_some(), "interaction ({u}, {v}) is not mirrored");
        true
    }

    /// Writes `f(old)` into both copies of the `(u, v)` interaction.
    ///
    /// `f` sees the current bias or `None` if the interaction is new. The value is computed
    /// once, so both copies are bit-identical.
    #[inline]
    fn write_interaction(&mut self, u: V, v: V, f: impl FnOnce(Option<B>) -> B) {
        let nbrs = &mut self.adj[u.index()].neighbors;
        let (value, existed) = match sorted::search(nbrs, v) {
            Ok(pos) => {
                let value = f(Some(nbrs[pos].1));
                nbrs[pos].1 = value;
                (value, true)
            }
            Err(pos) => {
                let value = f(None);
                nbrs.insert(pos, (v, value));
                (value, false)
            }
        };

        let (pos, inserted) =
            sorted::insert_if_absent(&mut self.adj[v.index()].neighbors, (u, value));
        debug_assert_eq!(
            inserted, !existed,
            "interaction ({u}, {v}) is stored on one side only"
        );
        if !inserted {
            self.adj[v.index()].neighbors[pos].1 = value;
        }
    }

    // ------------------------------------------------------------------------
    // Neighborhoods
    // ------------------------------------------------------------------------

    /// Sorted `(neighbor, bias)` entries of `u`.
    #[inline(always)]
    pub fn neighborhood(&self, u: V) -> &[(V, B)] {
        self.debug_check_variable(u);
        &self.adj[u.index()].neighbors
    }

    /// Mutable view of `u`'s neighborhood.
    ///
    /// Biases may be rewritten in place; neighbor indices are read-only, so the ordering
    /// cannot be broken. Only `u`'s copy of each interaction is reachable through this
    /// view: the caller must write the same value into the mirrored entry (for example
    /// with [`Self::set_quadratic`]) before relying on symmetric reads.
    #[inline]
    pub fn neighborhood_mut(&mut self, u: V) -> NeighborhoodMut<'_, V, B> {
        self.debug_check_variable(u);
        NeighborhoodMut {
            entries: &mut self.adj[u.index()].neighbors,
        }
    }

    /// Iterates `(linear, neighborhood)` for every variable in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (B, &[(V, B)])> + '_ {
        self.adj.iter().map(|r| (r.linear, r.neighbors.as_slice()))
    }

    /// Owned listing of `(neighborhood, linear)` per variable.
    pub fn to_lists(&self) -> Vec<(Vec<(V, B)>, B)> {
        self.adj
            .iter()
            .map(|r| (r.neighbors.clone(), r.linear))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Checked access
    // ------------------------------------------------------------------------

    /// Checked [`Self::get_quadratic`].
    ///
    /// # Errors
    /// Returns [`BqmError::VariableOutOfRange`] or [`BqmError::SelfInteraction`] on bad
    /// indices and [`BqmError::MissingInteraction`] if `u` and `v` do not interact.
    pub fn try_get_quadratic(&self, u: V, v: V) -> Result<B, BqmError> {
        self.check_pair(u, v)?;
        match self.get_quadratic(u, v) {
            (bias, true) => Ok(bias),
            (_, false) => Err(BqmError::MissingInteraction {
                u: u.index(),
                v: v.index(),
            }),
        }
    }

    /// Checked [`Self::set_quadratic`].
    ///
    /// # Errors
    /// Returns [`BqmError::VariableOutOfRange`] or [`BqmError::SelfInteraction`] on bad
    /// indices; the model is left unchanged.
    pub fn try_set_quadratic(&mut self, u: V, v: V, bias: B) -> Result<(), BqmError> {
        self.check_pair(u, v)?;
        self.set_quadratic(u, v, bias);
        Ok(())
    }

    /// Checked [`Self::remove_interaction`].
    ///
    /// # Errors
    /// Returns [`BqmError::VariableOutOfRange`] or [`BqmError::SelfInteraction`] on bad
    /// indices.
    pub fn try_remove_interaction(&mut self, u: V, v: V) -> Result<bool, BqmError> {
        self.check_pair(u, v)?;
        Ok(self.remove_interaction(u, v))
    }

    /// Checked [`Self::pop_variable`].
    ///
    /// # Errors
    /// Returns [`BqmError::Empty`] if there is nothing to remove.
    pub fn try_pop_variable(&mut self) -> Result<usize, BqmError> {
        if self.adj.is_empty() {
            return Err(BqmError::Empty);
        }
        Ok(self.pop_variable())
    }

    fn check_variable(&self, v: V) -> Result<(), BqmError> {
        if v.index() < self.adj.len() {
            Ok(())
        } else {
            Err(BqmError::VariableOutOfRange {
                variable: v.index(),
                num_variables: self.adj.len(),
            })
        }
    }

    fn check_pair(&self, u: V, v: V) -> Result<(), BqmError> {
        self.check_variable(u)?;
        self.check_variable(v)?;
        if u == v {
            return Err(BqmError::SelfInteraction {
                variable: u.index(),
            });
        }
        Ok(())
    }

    #[inline(always)]
    fn debug_check_variable(&self, v: V) {
        debug_assert!(
            v.index() < self.adj.len(),
            "variable {v} out of range (num_variables = {})",
            self.adj.len()
        );
    }

    #[inline(always)]
    fn debug_check_pair(&self, u: V, v: V) {
        self.debug_check_variable(u);
        self.debug_check_variable(v);
        debug_assert!(u != v, "variable {u} cannot interact with itself");
    }
}

impl<V: Variable, B: Bias> BqmView<V, B> for AdjVectorBqm<V, B> {
    #[inline]
    fn num_variables(&self) -> usize {
        AdjVectorBqm::num_variables(self)
    }

    #[inline]
    fn get_linear(&self, v: V) -> B {
        AdjVectorBqm::get_linear(self, v)
    }

    #[inline]
    fn neighborhood(&self, v: V) -> &[(V, B)] {
        AdjVectorBqm::neighborhood(self, v)
    }

    fn num_interactions(&self) -> usize {
        AdjVectorBqm::num_interactions(self)
    }
}

// ============================================================================
// Mutable neighborhood view
// ============================================================================

/// Mutable view of one variable's neighborhood, returned by
/// [`AdjVectorBqm::neighborhood_mut`].
#[derive(Debug)]
pub struct NeighborhoodMut<'a, V, B> {
    entries: &'a mut [(V, B)],
}

impl<V: Variable, B: Bias> NeighborhoodMut<'_, V, B> {
    /// Number of neighbors.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the variable has no neighbors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read-only view of the entries.
    #[inline]
    pub fn as_slice(&self) -> &[(V, B)] {
        &*self.entries
    }

    /// Binary-searches for `neighbor` and returns its bias mutably.
    #[inline]
    pub fn get_mut(&mut self, neighbor: V) -> Option<&mut B> {
        sorted::get_mut(self.entries, neighbor).map(|e| &mut e.1)
    }

    /// Iterates `(neighbor, &mut bias)` in ascending neighbor order.
    #[inline]
    pub fn iter_mut(&mut self) -> NeighborsMut<'_, V, B> {
        NeighborsMut {
            inner: self.entries.iter_mut(),
        }
    }
}

impl<'a, V: Variable, B: Bias> IntoIterator for NeighborhoodMut<'a, V, B> {
    type Item = (V, &'a mut B);
    type IntoIter = NeighborsMut<'a, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        NeighborsMut {
            inner: self.entries.iter_mut(),
        }
    }
}

/// Iterator over `(neighbor, &mut bias)` pairs.
#[derive(Debug)]
pub struct NeighborsMut<'a, V, B> {
    inner: std::slice::IterMut<'a, (V, B)>,
}

impl<'a, V: Copy, B> Iterator for NeighborsMut<'a, V, B> {
    type Item = (V, &'a mut B);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, b)| (*v, b))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V: Copy, B> DoubleEndedIterator for NeighborsMut<'_, V, B> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(v, b)| (*v, b))
    }
}

impl<V: Copy, B> ExactSizeIterator for NeighborsMut<'_, V, B> {}

impl<V: Copy, B> FusedIterator for NeighborsMut<'_, V, B> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::check_invariants;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use std::collections::BTreeMap;

    /// Reference model: linear biases plus a map keyed by `(min, max)`.
    #[derive(Default)]
    struct Oracle {
        linear: Vec<f64>,
        quadratic: BTreeMap<(usize, usize), f64>,
    }

    impl Oracle {
        fn key(u: usize, v: usize) -> (usize, usize) {
            (u.min(v), u.max(v))
        }

        fn neighbors(&self, u: usize) -> Vec<(usize, f64)> {
            let mut out: Vec<(usize, f64)> = self
                .quadratic
                .iter()
                .filter_map(|(&(a, b), &bias)| match (a == u, b == u) {
                    (true, _) => Some((b, bias)),
                    (_, true) => Some((a, bias)),
                    _ => None,
                })
                .collect();
            out.sort_by_key(|e| e.0);
            out
        }
    }

    fn assert_matches_oracle(bqm: &AdjVectorBqm, oracle: &Oracle) {
        assert_eq!(bqm.num_variables(), oracle.linear.len());
        assert_eq!(bqm.num_interactions(), oracle.quadratic.len());
        for v in 0..bqm.num_variables() {
            assert_eq!(bqm.get_linear(v), oracle.linear[v], "linear mismatch at {v}");
            assert_eq!(
                bqm.neighborhood(v),
                oracle.neighbors(v).as_slice(),
                "neighborhood mismatch at {v}"
            );
        }
        check_invariants(bqm).unwrap();
    }

    fn three_variable_model() -> AdjVectorBqm {
        let mut bqm = AdjVectorBqm::new();
        for expected in 0..3 {
            assert_eq!(bqm.add_variable(), expected);
        }
        bqm.set_linear(0, 1.5);
        bqm.set_quadratic(0, 1, 2.0);
        bqm.set_quadratic(1, 2, -1.0);
        bqm
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    #[test]
    fn empty_model_has_zero_shape() {
        let bqm = AdjVectorBqm::<usize, f64>::default();
        assert_eq!(bqm.shape(), (0, 0));
        assert!(bqm.is_empty());
    }

    #[test]
    fn with_variables_creates_disconnected_zero_bias_variables() {
        let bqm = AdjVectorBqm::<usize, f64>::with_variables(5);
        assert_eq!(bqm.shape(), (5, 0));
        assert_eq!(bqm.to_lists(), vec![(vec![], 0.0); 5]);
    }

    #[test]
    fn from_dense_upper_triangle_of_ones() {
        let n = 5;
        let mut dense = vec![0.0f64; n * n];
        for i in 0..n {
            for j in i..n {
                dense[i * n + j] = 1.0;
            }
        }
        let bqm = AdjVectorBqm::<usize, f64>::from_dense(&dense, n, false).unwrap();

        assert_eq!(bqm.shape(), (5, 10));
        for (v, (linear, nbrs)) in bqm.iter().enumerate() {
            assert_eq!(linear, 1.0);
            let expected: Vec<(usize, f64)> =
                (0..n).filter(|&u| u != v).map(|u| (u, 1.0)).collect();
            assert_eq!(nbrs, expected.as_slice());
        }
    }

    #[test]
    fn from_dense_symmetric_matrix_doubles_off_diagonal() {
        let n = 4;
        let w = |i: usize, j: usize| if (i + j) % 3 == 0 { 0.0 } else { (i * j) as f64 + 0.5 };
        let mut dense = vec![0.0f64; n * n];
        for i in 0..n {
            for j in 0..n {
                dense[i * n + j] = if i == j { i as f64 - 1.0 } else { w(i, j) };
            }
        }
        let bqm = AdjVectorBqm::<usize, f64>::from_dense(&dense, n, false).unwrap();

        for i in 0..n {
            assert_eq!(bqm.get_linear(i), i as f64 - 1.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let expected = if w(i, j) == 0.0 { (0.0, false) } else { (2.0 * w(i, j), true) };
                assert_eq!(bqm.get_quadratic(i, j), expected, "pair ({i}, {j})");
            }
        }
        check_invariants(&bqm).unwrap();
    }

    #[test]
    fn from_dense_cancelling_triangles_create_no_edge() {
        #[rustfmt::skip]
        let dense = [
            3.0, 1.0,
            -1.0, 4.0,
        ];
        let bqm = AdjVectorBqm::<usize, f64>::from_dense(&dense, 2, false).unwrap();
        assert_eq!(bqm.num_interactions(), 0);
        assert_eq!(bqm.get_linear(0), 3.0);
        assert_eq!(bqm.get_linear(1), 4.0);
    }

    #[test]
    fn from_dense_can_ignore_diagonal() {
        let dense = [7i32, 2, 1, 9];
        let bqm = AdjVectorBqm::<u32, i64>::from_dense(&dense, 2, true).unwrap();
        assert_eq!(bqm.get_linear(0), 0);
        assert_eq!(bqm.get_linear(1), 0);
        assert_eq!(bqm.get_quadratic(0, 1), (3, true));
    }

    #[test]
    fn from_dense_rejects_wrong_length() {
        let err = AdjVectorBqm::<usize, f64>::from_dense(&[1.0f64; 5], 2, false).unwrap_err();
        assert_eq!(
            err,
            BqmError::DenseShape {
                len: 5,
                num_variables: 2
            }
        );
    }

    #[test]
    fn from_bqm_reproduces_source_exactly() {
        let mut rng = XorShiftRng::seed_from_u64(0xD1CE);
        let mut src = AdjVectorBqm::<u32, f32>::with_variables(20);
        for v in 0..20u32 {
            src.set_linear(v, rng.random_range(-1.0..1.0));
        }
        for _ in 0..60 {
            let u = rng.random_range(0..20u32);
            let v = rng.random_range(0..20u32);
            if u != v {
                src.set_quadratic(u, v, rng.random_range(-1.0..1.0));
            }
        }

        let copy = AdjVectorBqm::from_bqm(&src);
        assert_eq!(copy, src);
    }

    // -------------------------------------------------------------------------
    // Operation semantics
    // -------------------------------------------------------------------------

    #[test]
    fn three_variable_scenario() {
        let mut bqm = three_variable_model();
        assert_eq!(bqm.get_linear(0), 1.5);
        assert_eq!((bqm.degree(0), bqm.degree(1), bqm.degree(2)), (1, 2, 1));
        assert_eq!(bqm.num_interactions(), 2);
        assert_eq!(bqm.get_quadratic(0, 2), (0.0, false));

        assert!(bqm.remove_interaction(0, 1));
        assert_eq!(bqm.degree(0), 0);
        assert_eq!(bqm.degree(1), 1);
        assert_eq!(bqm.num_interactions(), 1);

        assert_eq!(bqm.pop_variable(), 2);
        assert_eq!(bqm.degree(1), 0);
        assert_eq!(bqm.num_variables(), 2);
        check_invariants(&bqm).unwrap();
    }

    #[test]
    fn get_quadratic_is_symmetric() {
        let bqm = three_variable_model();
        assert_eq!(bqm.get_quadratic(0, 1), (2.0, true));
        assert_eq!(bqm.get_quadratic(1, 0), (2.0, true));
        assert_eq!(bqm.get_quadratic(2, 1), (-1.0, true));
    }

    #[test]
    fn set_quadratic_twice_is_idempotent() {
        let mut bqm = three_variable_model();
        assert!(bqm.set_quadratic(0, 1, 4.0));
        let before = bqm.num_interactions();
        assert!(bqm.set_quadratic(1, 0, 4.0));
        assert_eq!(bqm.num_interactions(), before);
        assert_eq!(bqm.get_quadratic(0, 1), (4.0, true));
    }

    #[test]
    fn neighborhoods_stay_sorted_under_out_of_order_inserts() {
        let mut bqm = AdjVectorBqm::<usize, f64>::with_variables(6);
        for v in [5, 2, 4, 1, 3] {
            bqm.set_quadratic(0, v, v as f64);
        }
        let nbrs: Vec<usize> = bqm.neighborhood(0).iter().map(|e| e.0).collect();
        assert_eq!(nbrs, vec![1, 2, 3, 4, 5]);
        assert_eq!(bqm.neighborhood(4), &[(0, 4.0)]);
    }

    #[test]
    fn remove_interaction_repeatedly() {
        let mut bqm = AdjVectorBqm::<usize, f64>::with_variables(3);
        bqm.set_quadratic(0, 1, 0.5);
        bqm.set_quadratic(0, 2, 1.0);

        assert!(bqm.remove_interaction(0, 2));
        assert!(!bqm.remove_interaction(0, 2));
        assert!(!bqm.remove_interaction(2, 0));

        assert_eq!(bqm.shape(), (3, 1));
        assert_eq!(bqm.get_quadratic(1, 0), (0.5, true));
        assert_eq!(bqm.get_quadratic(2, 0), (0.0, false));
    }

    #[test]
    fn add_then_pop_restores_previous_state() {
        let before = three_variable_model();
        let mut bqm = before.clone();

        let v = bqm.add_variable();
        assert_eq!(v, 3);
        bqm.set_linear(v, 9.0);
        bqm.set_quadratic(v, 0, 1.0);
        bqm.set_quadratic(2, v, 1.0);
        assert_eq!(bqm.pop_variable(), 3);

        assert_eq!(bqm, before);
    }

    #[test]
    fn pop_variable_detaches_every_neighbor() {
        let mut bqm = AdjVectorBqm::<usize, f64>::with_variables(5);
        for u in 0..4 {
            bqm.set_quadratic(u, 4, 1.0);
        }
        bqm.set_quadratic(0, 1, 2.0);

        assert_eq!(bqm.pop_variable(), 4);
        assert_eq!(bqm.num_interactions(), 1);
        assert_eq!((0..4).map(|v| bqm.degree(v)).collect::<Vec<_>>(), vec![1, 1, 0, 0]);
    }

    #[test]
    fn add_quadratic_accumulates_on_both_sides() {
        let mut bqm = AdjVectorBqm::<usize, f64>::with_variables(2);
        bqm.add_quadratic(0, 1, 0.25);
        bqm.add_quadratic(1, 0, 0.5);
        bqm.add_linear(1, -2.0);
        bqm.add_linear(1, 0.5);

        assert_eq!(bqm.get_quadratic(0, 1), (0.75, true));
        assert_eq!(bqm.get_quadratic(1, 0), (0.75, true));
        assert_eq!(bqm.get_linear(1), -1.5);
        assert_eq!(bqm.num_interactions(), 1);
    }

    #[test]
    fn neighborhood_mut_rewrites_biases() {
        let mut bqm = three_variable_model();

        for (_, bias) in bqm.neighborhood_mut(1) {
            *bias *= 10.0;
        }
        // Mirror the writes so both copies agree again.
        let updated: Vec<(usize, f64)> = bqm.neighborhood(1).to_vec();
        for (v, bias) in updated {
            bqm.set_quadratic(v, 1, bias);
        }

        assert_eq!(bqm.get_quadratic(0, 1), (20.0, true));
        assert_eq!(bqm.get_quadratic(2, 1), (-10.0, true));
        check_invariants(&bqm).unwrap();
    }

    #[test]
    fn neighborhood_mut_get_mut_and_reverse_iteration() {
        let mut bqm = three_variable_model();
        let mut view = bqm.neighborhood_mut(1);
        assert_eq!(view.len(), 2);
        assert!(view.get_mut(1).is_none());
        if let Some(bias) = view.get_mut(2) {
            *bias = 3.0;
        }
        let rev: Vec<usize> = view.iter_mut().rev().map(|(v, _)| v).collect();
        assert_eq!(rev, vec![2, 0]);
        assert_eq!(view.as_slice(), &[(0, 2.0), (2, 3.0)]);
    }

    // -------------------------------------------------------------------------
    // Checked access
    // -------------------------------------------------------------------------

    #[test]
    fn try_get_quadratic_reports_missing_interaction() {
        let bqm = three_variable_model();
        assert_eq!(bqm.try_get_quadratic(1, 2), Ok(-1.0));
        assert_eq!(
            bqm.try_get_quadratic(0, 2),
            Err(BqmError::MissingInteraction { u: 0, v: 2 })
        );
        assert_eq!(
            bqm.try_get_quadratic(1, 1),
            Err(BqmError::SelfInteraction { variable: 1 })
        );
        assert_eq!(
            bqm.try_get_quadratic(0, 7),
            Err(BqmError::VariableOutOfRange {
                variable: 7,
                num_variables: 3
            })
        );
    }

    #[test]
    fn try_mutators_leave_model_untouched_on_error() {
        let mut bqm = three_variable_model();
        let before = bqm.clone();
        assert!(bqm.try_set_quadratic(3, 0, 1.0).is_err());
        assert!(bqm.try_set_quadratic(2, 2, 1.0).is_err());
        assert!(bqm.try_remove_interaction(0, 9).is_err());
        assert_eq!(bqm, before);

        assert_eq!(bqm.try_remove_interaction(2, 1), Ok(true));
        assert_eq!(bqm.try_remove_interaction(2, 1), Ok(false));
        assert_eq!(bqm.try_set_quadratic(0, 2, 5.0), Ok(()));
        assert_eq!(bqm.get_quadratic(2, 0), (5.0, true));
    }

    #[test]
    fn try_pop_variable_on_empty_model() {
        let mut bqm = AdjVectorBqm::<usize, f64>::with_variables(1);
        assert_eq!(bqm.try_pop_variable(), Ok(0));
        assert_eq!(bqm.try_pop_variable(), Err(BqmError::Empty));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cannot interact with itself")]
    fn self_interaction_asserts_in_debug() {
        let mut bqm = AdjVectorBqm::<usize, f64>::with_variables(2);
        bqm.set_quadratic(1, 1, 1.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "empty model")]
    fn pop_on_empty_asserts_in_debug() {
        AdjVectorBqm::<usize, f64>::new().pop_variable();
    }

    // -------------------------------------------------------------------------
    // Randomized invariant tests
    // -------------------------------------------------------------------------

    #[test]
    fn random_operations_match_oracle() {
        let mut rng = XorShiftRng::seed_from_u64(0xC0FFEE);
        let mut bqm = AdjVectorBqm::<usize, f64>::new();
        let mut oracle = Oracle::default();

        for step in 0..4_000 {
            let n = bqm.num_variables();
            match rng.random_range(0..10) {
                0 => {
                    let v = bqm.add_variable();
                    assert_eq!(v, oracle.linear.len());
                    oracle.linear.push(0.0);
                }
                1 if n > 0 && rng.random_bool(0.3) => {
                    let last = n - 1;
                    assert_eq!(bqm.pop_variable(), last);
                    oracle.linear.pop();
                    oracle.quadratic.retain(|&(a, b), _| a != last && b != last);
                }
                2 if n > 0 => {
                    let v = rng.random_range(0..n);
                    let b = f64::from(rng.random_range(-8i32..8)) / 4.0;
                    bqm.set_linear(v, b);
                    oracle.linear[v] = b;
                }
                3..=6 if n > 1 => {
                    let u = rng.random_range(0..n);
                    let v = (u + rng.random_range(1..n)) % n;
                    let b = f64::from(rng.random_range(-8i32..8)) / 4.0;
                    assert!(bqm.set_quadratic(u, v, b));
                    oracle.quadratic.insert(Oracle::key(u, v), b);
                }
                7 if n > 1 => {
                    let u = rng.random_range(0..n);
                    let v = (u + rng.random_range(1..n)) % n;
                    let b = f64::from(rng.random_range(-8i32..8)) / 4.0;
                    bqm.add_quadratic(u, v, b);
                    *oracle.quadratic.entry(Oracle::key(u, v)).or_insert(0.0) += b;
                }
                8 | 9 if n > 1 => {
                    let u = rng.random_range(0..n);
                    let v = (u + rng.random_range(1..n)) % n;
                    let existed = oracle.quadratic.remove(&Oracle::key(u, v)).is_some();
                    assert_eq!(bqm.remove_interaction(u, v), existed);
                }
                _ => {}
            }
            if step % 100 == 0 {
                assert_matches_oracle(&bqm, &oracle);
            }
        }
        assert_matches_oracle(&bqm, &oracle);
    }

    #[test]
    fn degree_sum_is_twice_interaction_count() {
        let mut rng = XorShiftRng::seed_from_u64(0xBEEF);
        let mut bqm = AdjVectorBqm::<u32, f64>::with_variables(40);
        for _ in 0..500 {
            let u = rng.random_range(0..40u32);
            let v = rng.random_range(0..40u32);
            if u == v {
                continue;
            }
            if rng.random_bool(0.7) {
                bqm.set_quadratic(u, v, 1.0);
            } else {
                bqm.remove_interaction(u, v);
            }
            let degree_sum: usize = (0..40u32).map(|v| bqm.degree(v)).sum();
            assert_eq!(degree_sum, 2 * bqm.num_interactions());
        }
    }
}
