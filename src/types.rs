//! Scalar traits for variable indices and biases.
//!
//! Both containers are generic over the integer type used to label variables and the
//! numeric type used for biases. Narrow index types (e.g. `u32`) shrink every
//! neighborhood entry, which matters for large sparse models.

use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign};

// ============================================================================
// Variable
// ============================================================================

/// Integer type used to label variables.
///
/// Variables are dense zero-based indices, so every label converts losslessly to
/// and from a `usize` position as long as it fits the target type.
pub trait Variable: Copy + Ord + Debug + Display + Send + Sync + 'static {
    /// Converts a position in the variable array into a label.
    ///
    /// # Panics
    /// Panics in debug builds if `index` does not fit in `Self`.
    fn from_index(index: usize) -> Self;

    /// Returns the position of this label in the variable array.
    fn index(self) -> usize;
}

macro_rules! impl_variable {
    ($($t:ty),* $(,)?) => {
        $(
            impl Variable for $t {
                #[inline(always)]
                fn from_index(index: usize) -> Self {
                    debug_assert!(
                        <$t>::try_from(index).is_ok(),
                        "variable index {index} does not fit in {}",
                        stringify!($t)
                    );
                    index as $t
                }

                #[inline(always)]
                fn index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_variable!(u16, u32, u64, usize);

// ============================================================================
// Bias
// ============================================================================

/// Numeric type used for linear and quadratic biases.
pub trait Bias:
    Copy + PartialEq + Debug + Add<Output = Self> + AddAssign + Send + Sync + 'static
{
    /// The additive identity; the bias of a freshly created variable.
    const ZERO: Self;

    /// Bitwise equality. Unlike `==`, a NaN bias equals itself and `-0.0 != 0.0`.
    ///
    /// The two stored copies of a quadratic bias must match under this relation.
    fn same_bits(self, other: Self) -> bool;
}

macro_rules! impl_float_bias {
    ($($t:ty),* $(,)?) => {
        $(
            impl Bias for $t {
                const ZERO: Self = 0.0;

                #[inline(always)]
                fn same_bits(self, other: Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }
        )*
    };
}

macro_rules! impl_int_bias {
    ($($t:ty),* $(,)?) => {
        $(
            impl Bias for $t {
                const ZERO: Self = 0;

                #[inline(always)]
                fn same_bits(self, other: Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_float_bias!(f32, f64);
impl_int_bias!(i8, i16, i32, i64);

// ============================================================================
// Tests
// ============================================================================
