//! Numeric element bound shared by every matrix operation.

use num_traits::Zero;

/// A numeric value that can be stored in a [`Matrix`](crate::Matrix).
///
/// Requires a zero value and `+` (through [`Zero`]), and must be shareable
/// across worker tasks. Operations that need `-` or `*` ask for
/// [`Neg`](std::ops::Neg) or [`Mul`](std::ops::Mul) on top of this bound,
/// so unsigned integers can still be added and multiplied.
pub trait Element: Zero + Copy + Send + Sync + 'static {}

impl<T> Element for T where T: Zero + Copy + Send + Sync + 'static {}
