//! Errors raised while building a target allocation.

use crate::Symbol;

/// Errors returned by [`resolve_weights`](crate::resolve_weights) and
/// [`TargetAllocation::from_pct`](crate::TargetAllocation::from_pct).
///
/// Numeric inputs are never rejected; the per-ticker cap is the only clamp.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WeightError {
    /// A ticker appeared more than once under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
    #[error("duplicate ticker in target list: {0}")]
    DuplicateSymbol(Symbol),
}
