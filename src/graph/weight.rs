//! Edge weight normalization.
//!
//! Input weights are signed: the reachability data this engine was built for
//! encodes dissimilarity as negative values. Every algorithm in this crate
//! works on the non-negative magnitude instead, and this module is the only
//! place that conversion happens. Preserving the sign for a future algorithm
//! means reading [`Edge::weight`](crate::graph::Edge::weight) directly rather
//! than going through [`magnitude`].

/// Signed weight as read from the input.
pub type Weight = i64;

/// Non-negative value the algorithms compute with: path length, tree weight
/// or flow capacity.
pub type Magnitude = u64;

/// Drop the sign of an input weight.
#[inline]
pub fn magnitude(weight: Weight) -> Magnitude {
    weight.unsigned_abs()
}
