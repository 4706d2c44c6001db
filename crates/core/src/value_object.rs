//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Everything the engine produces (forecast points, EOQ results, ABC entries,
/// stock projections) is a value object: constructed per call, compared by
/// value, and discarded once the caller has consumed it. Nothing inside the
/// engine keeps them between calls.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
