//! Structural validation of any [`BqmView`].
//!
//! Checks, for every variable `u`:
//! - every neighbor is in `0..num_variables` and differs from `u`;
//! - the neighborhood is strictly increasing by neighbor;
//! - every entry `(v, b)` is mirrored by `(u, b)` in `v`'s neighborhood, bit for bit.
//!
//! With the `parallel` feature, variables are checked on the rayon pool once the model is
//! large enough to amortize the fork/join overhead.

use crate::error::InvariantViolation;
use crate::sorted;
use crate::types::{Bias, Variable};
use crate::view::BqmView;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Minimum number of variables before validation fans out across threads.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4_096;

// ============================================================================
// Public API
// ============================================================================

/// Verifies every structural invariant of `bqm`.
///
/// # Errors
/// Returns the first violation found. With the `parallel` feature and a large model,
/// "first" is whichever worker reports first.
pub fn check_invariants<V, B, Q>(bqm: &Q) -> Result<(), InvariantViolation>
where
    V: Variable,
    B: Bias,
    Q: BqmView<V, B> + Sync + ?Sized,
{
    let result = check_all(bqm);
    if let Err(violation) = &result {
        tracing::warn!(%violation, "model failed structural validation");
    }
    result
}

/// Verifies the invariants touching a single variable's neighborhood.
///
/// # Errors
/// Returns the violation found in `u`'s neighborhood, if any.
///
/// # Panics
/// Panics if `u` is out of range.
pub fn check_variable<V, B, Q>(bqm: &Q, u: usize) -> Result<(), InvariantViolation>
where
    V: Variable,
    B: Bias,
    Q: BqmView<V, B> + ?Sized,
{
    let n = bqm.num_variables();
    let u_label = V::from_index(u);
    let nbrs = bqm.neighborhood(u_label);

    if let Some(position) = sorted::first_unsorted(nbrs) {
        return Err(InvariantViolation::Unsorted {
            variable: u,
            position,
        });
    }

    for &(v, bias) in nbrs {
        let vi = v.index();
        if vi >= n {
            return Err(InvariantViolation::NeighborOutOfRange {
                variable: u,
                neighbor: vi,
                num_variables: n,
            });
        }
        if vi == u {
            return Err(InvariantViolation::SelfLoop { variable: u });
        }
        match sorted::get(bqm.neighborhood(v), u_label) {
            Some(&(_, mirror)) if mirror.same_bits(bias) => {}
            _ => return Err(InvariantViolation::Asymmetric { u, v: vi }),
        }
    }

    Ok(())
}

// ============================================================================
// Internal
// ============================================================================

#[cfg(feature = "parallel")]
fn check_all<V, B, Q>(bqm: &Q) -> Result<(), InvariantViolation>
where
    V: Variable,
    B: Bias,
    Q: BqmView<V, B> + Sync + ?Sized,
{
    let n = bqm.num_variables();
    if n < PARALLEL_THRESHOLD {
        return (0..n).try_for_each(|u| check_variable(bqm, u));
    }
    (0..n)
        .into_par_iter()
        .try_for_each(|u| check_variable(bqm, u))
}

#[cfg(not(feature = "parallel"))]
fn check_all<V, B, Q>(bqm: &Q) -> Result<(), InvariantViolation>
where
    V: Variable,
    B: Bias,
    Q: BqmView<V, B> + Sync + ?Sized,
{
    (0..bqm.num_variables()).try_for_each(|u| check_variable(bqm, u))
}

// ============================================================================
// Tests
// ============================================================================
